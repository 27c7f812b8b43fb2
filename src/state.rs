use std::{path::PathBuf, sync::Arc};

/// Shared handler state. Only the database path is shared; every unit of
/// work opens its own connection, so all coordination stays in SQLite.
#[derive(Clone)]
pub struct AppState {
    pub db_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path: Arc::new(db_path),
        }
    }
}
