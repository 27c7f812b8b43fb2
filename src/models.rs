use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Plant {
    pub id: i64,
    pub name: String,
    pub species: Option<String>,
    pub location: Option<String>,
    pub water_interval_days: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterLog {
    pub id: i64,
    pub plant_id: i64,
    pub watered_at: String,
    pub note: Option<String>,
}

/// A plant decorated with the derived watering fields. `next_watering` is
/// absent only when the base timestamp fails to parse.
#[derive(Debug, Clone, Serialize)]
pub struct PlantSummary {
    #[serde(flatten)]
    pub plant: Plant,
    pub last_watered: Option<String>,
    pub next_watering: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub q: Option<String>,
    pub show: Option<String>,
    pub detail: Option<String>,
}

/// Form payload shared by the page-based create and update handlers. Every
/// field is optional; the handlers decide the fallback per operation.
#[derive(Debug, Default, Deserialize)]
pub struct PlantForm {
    pub name: Option<String>,
    pub species: Option<String>,
    pub location: Option<String>,
    pub water_interval_days: Option<String>,
    pub notes: Option<String>,
}

/// JSON payload for the API create and update handlers. The interval is kept
/// as a raw value so numeric and string encodings are both accepted.
#[derive(Debug, Default, Deserialize)]
pub struct PlantPayload {
    pub name: Option<String>,
    pub species: Option<String>,
    pub location: Option<String>,
    pub water_interval_days: Option<serde_json::Value>,
    pub notes: Option<String>,
}

/// Normalized body for watering-log inserts, whether the bytes arrived as
/// JSON or as a form submission.
#[derive(Debug, Default, Deserialize)]
pub struct WaterInput {
    pub watered_at: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BackdateForm {
    pub date: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: String,
    pub deleted_plants: usize,
    pub deleted_logs: usize,
}

/// Parse a watering interval out of a raw form value. A parsed value is
/// clamped to at least one day; anything unparsable keeps the fallback.
pub fn interval_or(raw: Option<&str>, fallback: i64) -> i64 {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => match s.parse::<i64>() {
            Ok(days) => days.max(1),
            Err(_) => fallback,
        },
        None => fallback,
    }
}

/// Same as [`interval_or`] for JSON values, which may carry the interval as
/// a number or a string.
pub fn interval_from_value(raw: Option<&serde_json::Value>, fallback: i64) -> i64 {
    match raw {
        Some(serde_json::Value::Number(n)) => n.as_i64().map(|d| d.max(1)).unwrap_or(fallback),
        Some(serde_json::Value::String(s)) => interval_or(Some(s.as_str()), fallback),
        _ => fallback,
    }
}
