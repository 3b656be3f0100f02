use crate::errors::AppError;
use crate::models::{
    AddExerciseRequest, AddUserRequest, AddWeightRequest, ExerciseRecord, Settings, SweepResponse,
    UpdateProfileRequest, UpdateSettingsRequest, User, UserIdQuery, UserScopedQuery,
    UserStatsResponse, WeightRecord,
};
use crate::state::AppState;
use crate::store::persist_data;
use crate::streak;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate, Utc};

const DEFAULT_EXERCISE_LIMIT: usize = 50;
const DEFAULT_WEIGHT_LIMIT: usize = 30;

pub async fn index() -> Html<&'static str> {
    Html(render_index())
}

// ---- users ----

/// Leaderboard order: highest current streak first.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let data = state.data.lock().await;
    let mut users: Vec<User> = data.users.values().cloned().collect();
    users.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));
    Ok(Json(users))
}

pub async fn add_user(
    State(state): State<AppState>,
    Json(payload): Json<AddUserRequest>,
) -> Result<Json<User>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }

    let mut data = state.data.lock().await;
    let id = data.alloc_id();
    let user = User::new(id, name.to_string(), payload.profile_image);
    data.users.insert(id, user.clone());

    persist_data(&state.data_path, &data).await?;
    Ok(Json(user))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, AppError> {
    let data = state.data.lock().await;
    let user = data
        .users
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("no user with id {id}")))?;
    Ok(Json(user))
}

/// Removing a user takes their exercise and weight rows with them.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    if data.users.remove(&id).is_none() {
        return Err(AppError::not_found(format!("no user with id {id}")));
    }
    data.exercises.retain(|_, record| record.user_id != id);
    data.weights.retain(|_, record| record.user_id != id);

    persist_data(&state.data_path, &data).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::bad_request("name must not be empty"));
        }
    }

    let mut data = state.data.lock().await;
    let updated = {
        let user = data
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("no user with id {id}")))?;
        if let Some(name) = payload.name {
            user.name = name.trim().to_string();
        }
        if let Some(image) = payload.profile_image {
            user.profile_image = if image.is_empty() { None } else { Some(image) };
        }
        user.clone()
    };

    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

pub async fn user_stats(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<UserStatsResponse>, AppError> {
    let today = today();
    let data = state.data.lock().await;
    let user = data
        .users
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("no user with id {id}")))?;

    Ok(Json(UserStatsResponse {
        total_calories: data.total_calories(id),
        latest_weight: data.latest_weight(id).cloned(),
        exercised_today: data.has_exercised_on(id, today),
        user,
    }))
}

pub async fn reset_streak(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, AppError> {
    let mut data = state.data.lock().await;
    streak::full_reset(&mut data, id)?;
    let user = data.users[&id].clone();

    persist_data(&state.data_path, &data).await?;
    Ok(Json(user))
}

// ---- exercises ----

pub async fn add_exercise(
    State(state): State<AppState>,
    Json(payload): Json<AddExerciseRequest>,
) -> Result<Json<ExerciseRecord>, AppError> {
    let activity = payload.activity.trim();
    if activity.is_empty() {
        return Err(AppError::bad_request("activity must not be empty"));
    }

    let day = today();
    let mut data = state.data.lock().await;
    if !data.users.contains_key(&payload.user_id) {
        return Err(AppError::not_found(format!(
            "no user with id {}",
            payload.user_id
        )));
    }

    let id = data.alloc_id();
    let record = ExerciseRecord {
        id,
        user_id: payload.user_id,
        activity: activity.to_string(),
        distance: payload.distance.unwrap_or(0.0),
        duration: payload.duration.unwrap_or(0),
        calories: payload.calories.unwrap_or(0.0),
        image_url: payload.image_url,
        date: day,
        created_at: Utc::now(),
    };
    data.exercises.insert(id, record.clone());

    // Row first, then the derived streak fields.
    streak::record_exercise(&mut data, payload.user_id, day)?;

    persist_data(&state.data_path, &data).await?;
    Ok(Json(record))
}

pub async fn list_exercises(
    State(state): State<AppState>,
    Query(query): Query<UserScopedQuery>,
) -> Result<Json<Vec<ExerciseRecord>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_EXERCISE_LIMIT);
    let data = state.data.lock().await;
    let mut records: Vec<ExerciseRecord> = data
        .exercises
        .values()
        .filter(|record| query.user_id.is_none_or(|id| record.user_id == id))
        .cloned()
        .collect();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records.truncate(limit);
    Ok(Json(records))
}

pub async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, AppError> {
    let mut data = state.data.lock().await;
    let record = data
        .exercises
        .remove(&id)
        .ok_or_else(|| AppError::not_found(format!("no exercise with id {id}")))?;

    streak::reconcile_on_delete(&mut data, record.user_id)?;
    let user = data.users[&record.user_id].clone();

    persist_data(&state.data_path, &data).await?;
    Ok(Json(user))
}

// ---- weights ----

pub async fn add_weight(
    State(state): State<AppState>,
    Json(payload): Json<AddWeightRequest>,
) -> Result<Json<WeightRecord>, AppError> {
    if !payload.weight.is_finite() || payload.weight <= 0.0 {
        return Err(AppError::invalid_state("weight must be a positive number"));
    }

    let day = today();
    let mut data = state.data.lock().await;
    if !data.users.contains_key(&payload.user_id) {
        return Err(AppError::not_found(format!(
            "no user with id {}",
            payload.user_id
        )));
    }

    let id = data.alloc_id();
    let record = WeightRecord {
        id,
        user_id: payload.user_id,
        weight: payload.weight,
        muscle_percent: payload.muscle_percent,
        fat_percent: payload.fat_percent,
        image_url: payload.image_url,
        date: day,
        created_at: Utc::now(),
    };
    data.weights.insert(id, record.clone());

    persist_data(&state.data_path, &data).await?;
    Ok(Json(record))
}

pub async fn list_weights(
    State(state): State<AppState>,
    Query(query): Query<UserScopedQuery>,
) -> Result<Json<Vec<WeightRecord>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_WEIGHT_LIMIT);
    let data = state.data.lock().await;
    let mut records: Vec<WeightRecord> = data
        .weights
        .values()
        .filter(|record| query.user_id.is_none_or(|id| record.user_id == id))
        .cloned()
        .collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records.truncate(limit);
    Ok(Json(records))
}

pub async fn latest_weight(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Option<WeightRecord>>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(data.latest_weight(query.user_id).cloned()))
}

pub async fn delete_weight(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    if data.weights.remove(&id).is_none() {
        return Err(AppError::not_found(format!("no weight record with id {id}")));
    }

    persist_data(&state.data_path, &data).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

// ---- settings & sweep ----

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(data.settings.clone()))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<Settings>, AppError> {
    if payload.max_days_without_exercise == Some(0) {
        return Err(AppError::invalid_state(
            "max_days_without_exercise must be at least 1",
        ));
    }

    let mut data = state.data.lock().await;
    if let Some(max_days) = payload.max_days_without_exercise {
        data.settings.max_days_without_exercise = max_days;
    }
    if let Some(activities) = payload.activities {
        data.settings.activities = activities;
    }
    let settings = data.settings.clone();

    persist_data(&state.data_path, &data).await?;
    Ok(Json(settings))
}

pub async fn sweep_streaks(State(state): State<AppState>) -> Result<Json<SweepResponse>, AppError> {
    let today = today();
    let mut data = state.data.lock().await;
    let reset_count = streak::reconcile_sweep(&mut data, today);
    if reset_count > 0 {
        persist_data(&state.data_path, &data).await?;
    }
    Ok(Json(SweepResponse { reset_count }))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
