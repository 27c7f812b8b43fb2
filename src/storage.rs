use crate::errors::AppError;
use crate::models::{Plant, PlantSummary, WaterLog};
use crate::schedule;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};

// The ON DELETE CASCADE clause documents the relationship; the delete path
// removes child rows itself and never enables the foreign-key pragma.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS plants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    species TEXT,
    location TEXT,
    water_interval_days INTEGER DEFAULT 7,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS water_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plant_id INTEGER NOT NULL,
    watered_at TEXT NOT NULL,
    note TEXT,
    FOREIGN KEY(plant_id) REFERENCES plants(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_water_logs_plant ON water_logs(plant_id);
";

pub fn resolve_db_path() -> PathBuf {
    env::var("PLANT_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/plants.db"))
}

/// Open the database file and make sure the schema exists. Safe to call on
/// every open.
pub fn open_db(path: &Path) -> Result<Connection, rusqlite::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = fs::create_dir_all(parent);
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

/// Run one unit of store work on the blocking pool with a fresh connection.
/// The connection lives for the closure only and is dropped on the way out
/// whether or not the closure succeeds.
pub async fn with_conn<T, F>(db_path: Arc<PathBuf>, op: F) -> Result<T, AppError>
where
    F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = open_db(&db_path)?;
        op(&conn)
    })
    .await
    .map_err(AppError::internal)?
    .map_err(AppError::from)
}

fn plant_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Plant> {
    Ok(Plant {
        id: row.get(0)?,
        name: row.get(1)?,
        species: row.get(2)?,
        location: row.get(3)?,
        water_interval_days: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const PLANT_COLUMNS: &str =
    "id, name, species, location, water_interval_days, notes, created_at, updated_at";

pub fn list_plants(conn: &Connection) -> rusqlite::Result<Vec<Plant>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLANT_COLUMNS} FROM plants ORDER BY name COLLATE NOCASE"
    ))?;
    let rows = stmt.query_map([], plant_from_row)?;
    rows.collect()
}

pub fn get_plant(conn: &Connection, plant_id: i64) -> rusqlite::Result<Option<Plant>> {
    conn.query_row(
        &format!("SELECT {PLANT_COLUMNS} FROM plants WHERE id = ?1"),
        params![plant_id],
        plant_from_row,
    )
    .optional()
}

#[allow(clippy::too_many_arguments)]
pub fn insert_plant(
    conn: &Connection,
    name: &str,
    species: Option<&str>,
    location: Option<&str>,
    water_interval_days: i64,
    notes: &str,
    now_iso: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO plants (name, species, location, water_interval_days, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![name, species, location, water_interval_days, notes, now_iso, now_iso],
    )?;
    Ok(conn.last_insert_rowid())
}

#[allow(clippy::too_many_arguments)]
pub fn update_plant(
    conn: &Connection,
    plant_id: i64,
    name: &str,
    species: Option<&str>,
    location: Option<&str>,
    water_interval_days: i64,
    notes: Option<&str>,
    now_iso: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE plants SET name = ?1, species = ?2, location = ?3, water_interval_days = ?4,
         notes = ?5, updated_at = ?6 WHERE id = ?7",
        params![name, species, location, water_interval_days, notes, now_iso, plant_id],
    )?;
    Ok(())
}

/// Remove a plant and, explicitly, every watering event that references it.
pub fn delete_plant(conn: &Connection, plant_id: i64) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM plants WHERE id = ?1", params![plant_id])?;
    conn.execute("DELETE FROM water_logs WHERE plant_id = ?1", params![plant_id])?;
    Ok(())
}

pub fn last_watered(conn: &Connection, plant_id: i64) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT watered_at FROM water_logs WHERE plant_id = ?1 ORDER BY watered_at DESC LIMIT 1",
        params![plant_id],
        |row| row.get(0),
    )
    .optional()
}

pub fn insert_water_log(
    conn: &Connection,
    plant_id: i64,
    watered_at: &str,
    note: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO water_logs (plant_id, watered_at, note) VALUES (?1, ?2, ?3)",
        params![plant_id, watered_at, note],
    )?;
    Ok(())
}

pub fn water_logs_for(conn: &Connection, plant_id: i64) -> rusqlite::Result<Vec<WaterLog>> {
    let mut stmt = conn.prepare(
        "SELECT id, plant_id, watered_at, note FROM water_logs
         WHERE plant_id = ?1 ORDER BY watered_at DESC",
    )?;
    let rows = stmt.query_map(params![plant_id], |row| {
        Ok(WaterLog {
            id: row.get(0)?,
            plant_id: row.get(1)?,
            watered_at: row.get(2)?,
            note: row.get(3)?,
        })
    })?;
    rows.collect()
}

/// Wipe every watering event and every plant. Returns
/// `(deleted_plants, deleted_logs)`.
pub fn clear_all(conn: &Connection) -> rusqlite::Result<(usize, usize)> {
    let deleted_logs = conn.execute("DELETE FROM water_logs", [])?;
    let deleted_plants = conn.execute("DELETE FROM plants", [])?;
    Ok((deleted_plants, deleted_logs))
}

/// Attach the derived watering fields to a plant row.
pub fn decorate(conn: &Connection, plant: Plant) -> rusqlite::Result<PlantSummary> {
    let last_watered = last_watered(conn, plant.id)?;
    let next_watering = {
        let base = last_watered.as_deref().unwrap_or(plant.created_at.as_str());
        schedule::next_watering_from(base, plant.water_interval_days)
    };
    Ok(PlantSummary {
        plant,
        last_watered,
        next_watering,
    })
}

pub fn list_summaries(conn: &Connection) -> rusqlite::Result<Vec<PlantSummary>> {
    list_plants(conn)?
        .into_iter()
        .map(|plant| decorate(conn, plant))
        .collect()
}
