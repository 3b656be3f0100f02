use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub profile_image: Option<String>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_exercise_date: Option<NaiveDate>,
    pub total_exercises: u64,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: u64, name: String, profile_image: Option<String>) -> Self {
        Self {
            id,
            name,
            profile_image,
            current_streak: 0,
            longest_streak: 0,
            last_exercise_date: None,
            total_exercises: 0,
            created_at: Utc::now(),
        }
    }
}

/// Immutable once written; only deletion is allowed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: u64,
    pub user_id: u64,
    pub activity: String,
    pub distance: f64,
    pub duration: u32,
    pub calories: f64,
    pub image_url: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: u64,
    pub user_id: u64,
    pub weight: f64,
    pub muscle_percent: Option<f64>,
    pub fat_percent: Option<f64>,
    pub image_url: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Activities are stored as "icon:name" strings; a bare name is accepted
/// for entries written before icons existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub max_days_without_exercise: u32,
    pub activities: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_days_without_exercise: 3,
            activities: vec![
                "🏃:Running".to_string(),
                "🏊:Swimming".to_string(),
                "🚴:Cycling".to_string(),
                "🚶:Walking".to_string(),
                "🏋️:Weight training".to_string(),
                "🧘:Yoga".to_string(),
                "💪:Other".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppData {
    pub users: BTreeMap<u64, User>,
    pub exercises: BTreeMap<u64, ExerciseRecord>,
    pub weights: BTreeMap<u64, WeightRecord>,
    pub settings: Settings,
    pub next_id: u64,
}

impl AppData {
    pub fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn count_exercises(&self, user_id: u64) -> u64 {
        self.exercises
            .values()
            .filter(|record| record.user_id == user_id)
            .count() as u64
    }

    pub fn max_exercise_date(&self, user_id: u64) -> Option<NaiveDate> {
        self.exercises
            .values()
            .filter(|record| record.user_id == user_id)
            .map(|record| record.date)
            .max()
    }

    pub fn total_calories(&self, user_id: u64) -> f64 {
        self.exercises
            .values()
            .filter(|record| record.user_id == user_id)
            .map(|record| record.calories)
            .sum()
    }

    pub fn has_exercised_on(&self, user_id: u64, day: NaiveDate) -> bool {
        self.exercises
            .values()
            .any(|record| record.user_id == user_id && record.date == day)
    }

    pub fn latest_weight(&self, user_id: u64) -> Option<&WeightRecord> {
        self.weights
            .values()
            .filter(|record| record.user_id == user_id)
            .max_by_key(|record| record.created_at)
    }
}

// ---- request payloads ----

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub name: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddExerciseRequest {
    pub user_id: u64,
    pub activity: String,
    pub distance: Option<f64>,
    pub duration: Option<u32>,
    pub calories: Option<f64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddWeightRequest {
    pub user_id: u64,
    pub weight: f64,
    pub muscle_percent: Option<f64>,
    pub fat_percent: Option<f64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub max_days_without_exercise: Option<u32>,
    pub activities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UserScopedQuery {
    pub user_id: Option<u64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: u64,
}

// ---- response payloads ----

#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    #[serde(flatten)]
    pub user: User,
    pub total_calories: f64,
    pub latest_weight: Option<WeightRecord>,
    pub exercised_today: bool,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub reset_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn exercise(data: &mut AppData, user_id: u64, date: NaiveDate) {
        let id = data.alloc_id();
        data.exercises.insert(
            id,
            ExerciseRecord {
                id,
                user_id,
                activity: "🏃:Running".to_string(),
                distance: 5.0,
                duration: 30,
                calories: 250.0,
                image_url: None,
                date,
                created_at: Utc::now(),
            },
        );
    }

    #[test]
    fn settings_default_when_absent() {
        let data: AppData = serde_json::from_str("{}").expect("parse empty document");
        assert_eq!(data.settings.max_days_without_exercise, 3);
        assert!(!data.settings.activities.is_empty());
    }

    #[test]
    fn max_exercise_date_picks_latest_per_user() {
        let mut data = AppData::default();
        let early = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        exercise(&mut data, 1, late);
        exercise(&mut data, 1, early);
        exercise(&mut data, 2, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());

        assert_eq!(data.max_exercise_date(1), Some(late));
        assert_eq!(data.count_exercises(1), 2);
        assert_eq!(data.max_exercise_date(3), None);
    }
}
