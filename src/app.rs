use crate::state::AppState;
use crate::{api, handlers};
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{get, post},
};

/// Cap on incoming form/JSON payloads.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/plants/new", get(handlers::new_plant))
        .route("/plants/create", post(handlers::create_plant))
        .route("/plants/:plant_id", get(handlers::view_plant))
        .route("/plants/:plant_id/edit", get(handlers::edit_plant))
        .route("/plants/:plant_id/update", post(handlers::update_plant))
        .route("/plants/:plant_id/delete", post(handlers::delete_plant))
        .route("/plants/:plant_id/water", post(handlers::log_water))
        .route("/plants/:plant_id/water/date", post(handlers::log_water_backdate))
        .route("/export.csv", get(handlers::export_csv))
        .route("/api/plants", get(api::list_plants).post(api::create_plant))
        .route(
            "/api/plants/:plant_id",
            get(api::get_plant).put(api::update_plant).delete(api::delete_plant),
        )
        .route("/api/plants/:plant_id/water", post(api::log_water))
        .route("/api/clear", post(api::clear))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
