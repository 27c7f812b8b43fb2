pub mod api;
pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod schedule;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use state::AppState;
pub use storage::{open_db, resolve_db_path};
