pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod store;
pub mod streak;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use store::{load_data, persist_data, resolve_data_path};
