use crate::errors::AppError;
use crate::models::{
    ClearResponse, CreatedResponse, OkResponse, PlantPayload, PlantSummary, WaterInput,
    interval_from_value,
};
use crate::schedule;
use crate::state::AppState;
use crate::storage::{self, with_conn};
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::{StatusCode, header};
use axum::{Form, Json};

pub async fn list_plants(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlantSummary>>, AppError> {
    let summaries = with_conn(state.db_path.clone(), storage::list_summaries).await?;
    Ok(Json(summaries))
}

pub async fn create_plant(
    State(state): State<AppState>,
    Json(payload): Json<PlantPayload>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let name = payload.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(AppError::api_bad_request("name required"));
    }
    let interval = interval_from_value(payload.water_interval_days.as_ref(), 7);
    let species = payload.species;
    let location = payload.location;
    let notes = payload.notes.unwrap_or_default();
    let now = schedule::now_iso();

    let id = with_conn(state.db_path.clone(), move |conn| {
        storage::insert_plant(
            conn,
            &name,
            species.as_deref(),
            location.as_deref(),
            interval,
            &notes,
            &now,
        )
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn get_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
) -> Result<Json<PlantSummary>, AppError> {
    let summary = with_conn(state.db_path.clone(), move |conn| {
        match storage::get_plant(conn, plant_id)? {
            Some(plant) => Ok(Some(storage::decorate(conn, plant)?)),
            None => Ok(None),
        }
    })
    .await?
    .ok_or_else(AppError::api_not_found)?;
    Ok(Json(summary))
}

pub async fn update_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
    Json(payload): Json<PlantPayload>,
) -> Result<Json<OkResponse>, AppError> {
    let updated = with_conn(state.db_path.clone(), move |conn| {
        let Some(prior) = storage::get_plant(conn, plant_id)? else {
            return Ok(false);
        };
        let name = match payload.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => prior.name.clone(),
        };
        let species = payload.species.clone().or_else(|| prior.species.clone());
        let location = payload.location.clone().or_else(|| prior.location.clone());
        let interval = interval_from_value(
            payload.water_interval_days.as_ref(),
            prior.water_interval_days,
        );
        let notes = payload.notes.clone().or_else(|| prior.notes.clone());
        storage::update_plant(
            conn,
            plant_id,
            &name,
            species.as_deref(),
            location.as_deref(),
            interval,
            notes.as_deref(),
            &schedule::now_iso(),
        )?;
        Ok(true)
    })
    .await?;

    if !updated {
        return Err(AppError::api_not_found());
    }
    Ok(Json(OkResponse { ok: true }))
}

/// Idempotent: deleting an id that does not exist still answers `ok`.
pub async fn delete_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
) -> Result<Json<OkResponse>, AppError> {
    with_conn(state.db_path.clone(), move |conn| {
        storage::delete_plant(conn, plant_id)
    })
    .await?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn log_water(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
    req: Request,
) -> Result<Json<OkResponse>, AppError> {
    let input = water_input(req).await;
    let watered_at = input
        .watered_at
        .as_deref()
        .and_then(schedule::parse_iso)
        .map(schedule::format_iso)
        .unwrap_or_else(schedule::now_iso);
    let note = input.note.unwrap_or_default();

    let logged = with_conn(state.db_path.clone(), move |conn| {
        if storage::get_plant(conn, plant_id)?.is_none() {
            return Ok(false);
        }
        storage::insert_water_log(conn, plant_id, &watered_at, &note)?;
        Ok(true)
    })
    .await?;

    if !logged {
        return Err(AppError::api_not_found());
    }
    Ok(Json(OkResponse { ok: true }))
}

/// Accept the watering payload as JSON or as a form body and normalize it
/// into one structure before any domain logic runs.
async fn water_input(req: Request) -> WaterInput {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("json"));
    if is_json {
        match Json::<WaterInput>::from_request(req, &()).await {
            Ok(Json(input)) => input,
            Err(_) => WaterInput::default(),
        }
    } else {
        match Form::<WaterInput>::from_request(req, &()).await {
            Ok(Form(input)) => input,
            Err(_) => WaterInput::default(),
        }
    }
}

pub async fn clear(State(state): State<AppState>) -> Result<Json<ClearResponse>, AppError> {
    let (deleted_plants, deleted_logs) =
        with_conn(state.db_path.clone(), storage::clear_all).await?;
    Ok(Json(ClearResponse {
        status: "ok".to_string(),
        deleted_plants,
        deleted_logs,
    }))
}
