use crate::errors::AppError;
use crate::models::{BackdateForm, DashboardQuery, PlantForm, PlantSummary, WaterInput, interval_or};
use crate::schedule;
use crate::state::AppState;
use crate::storage::{self, with_conn};
use crate::ui;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use chrono::{DateTime, Utc};

pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Html<String>, AppError> {
    let q = params.q.unwrap_or_default().trim().to_string();
    let show = params.show.unwrap_or_else(|| "all".to_string());
    let detail_id = params.detail.as_deref().and_then(|s| s.parse::<i64>().ok());

    let (summaries, detail) = with_conn(state.db_path.clone(), move |conn| {
        let summaries = storage::list_summaries(conn)?;
        let detail = match detail_id {
            Some(id) => match storage::get_plant(conn, id)? {
                Some(plant) => {
                    let logs = storage::water_logs_for(conn, id)?;
                    Some((plant, logs))
                }
                None => None,
            },
            None => None,
        };
        Ok((summaries, detail))
    })
    .await?;

    let now = Utc::now();
    let visible = filter_plants(&summaries, &q, &show, now);
    let detail_ref = detail
        .as_ref()
        .map(|(plant, logs)| (plant, logs.as_slice()));

    Ok(Html(ui::render_dashboard(
        &visible,
        summaries.len(),
        detail_ref,
        &q,
        &show,
        now,
    )))
}

/// Combined text and status filter over the decorated list. Text matches
/// case-insensitively against name, species and location; `due` keeps only
/// plants whose next watering is computable and not after `now`.
pub fn filter_plants<'a>(
    plants: &'a [PlantSummary],
    q: &str,
    show: &str,
    now: DateTime<Utc>,
) -> Vec<&'a PlantSummary> {
    let needle = q.trim().to_lowercase();
    plants
        .iter()
        .filter(|summary| {
            if !needle.is_empty() {
                let fields = [
                    Some(summary.plant.name.as_str()),
                    summary.plant.species.as_deref(),
                    summary.plant.location.as_deref(),
                ];
                let hit = fields
                    .iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
            if show == "due" {
                return summary
                    .next_watering
                    .as_deref()
                    .is_some_and(|next| schedule::is_due(next, now));
            }
            true
        })
        .collect()
}

pub async fn new_plant() -> Redirect {
    Redirect::to("/#new")
}

pub async fn create_plant(
    State(state): State<AppState>,
    Form(form): Form<PlantForm>,
) -> Result<Redirect, AppError> {
    let name = form.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        // silent no-op for the form flow
        return Ok(Redirect::to("/"));
    }
    let species = form.species.as_deref().unwrap_or("").trim().to_string();
    let location = form.location.as_deref().unwrap_or("").trim().to_string();
    let interval = interval_or(form.water_interval_days.as_deref(), 7);
    let notes = form.notes.unwrap_or_default();
    let now = schedule::now_iso();

    with_conn(state.db_path.clone(), move |conn| {
        storage::insert_plant(
            conn,
            &name,
            Some(&species),
            Some(&location),
            interval,
            &notes,
            &now,
        )
    })
    .await?;

    Ok(Redirect::to("/"))
}

pub async fn view_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
) -> Result<Redirect, AppError> {
    let plant = with_conn(state.db_path.clone(), move |conn| {
        storage::get_plant(conn, plant_id)
    })
    .await?;
    if plant.is_none() {
        return Err(AppError::not_found());
    }
    Ok(Redirect::to(&format!("/?detail={plant_id}")))
}

pub async fn edit_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let plant = with_conn(state.db_path.clone(), move |conn| {
        storage::get_plant(conn, plant_id)
    })
    .await?
    .ok_or_else(AppError::not_found)?;
    Ok(Html(ui::render_edit(&plant)))
}

pub async fn update_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
    Form(form): Form<PlantForm>,
) -> Result<Redirect, AppError> {
    let updated = with_conn(state.db_path.clone(), move |conn| {
        let Some(prior) = storage::get_plant(conn, plant_id)? else {
            return Ok(false);
        };
        // Partial update: anything absent keeps its stored value, and an
        // empty trimmed name keeps the stored name.
        let name = match form.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => prior.name.clone(),
        };
        let species = match form.species.as_deref() {
            Some(s) => Some(s.trim().to_string()),
            None => prior.species.clone(),
        };
        let location = match form.location.as_deref() {
            Some(l) => Some(l.trim().to_string()),
            None => prior.location.clone(),
        };
        let interval = interval_or(
            form.water_interval_days.as_deref(),
            prior.water_interval_days,
        );
        let notes = form.notes.clone().or_else(|| prior.notes.clone());
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
        return Err(AppError::not_found());
    }
    Ok(Redirect::to(&format!("/?detail={plant_id}")))
}

pub async fn delete_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
) -> Result<Redirect, AppError> {
    with_conn(state.db_path.clone(), move |conn| {
        storage::delete_plant(conn, plant_id)
    })
    .await?;
    Ok(Redirect::to("/"))
}

pub async fn log_water(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
    Form(form): Form<WaterInput>,
) -> Result<Redirect, AppError> {
    let watered_at = form
        .watered_at
        .as_deref()
        .and_then(schedule::parse_iso)
        .map(schedule::format_iso)
        .unwrap_or_else(schedule::now_iso);
    let note = form.note.unwrap_or_default();

    let logged = with_conn(state.db_path.clone(), move |conn| {
        if storage::get_plant(conn, plant_id)?.is_none() {
            return Ok(false);
        }
        storage::insert_water_log(conn, plant_id, &watered_at, &note)?;
        Ok(true)
    })
    .await?;

    if !logged {
        return Err(AppError::not_found());
    }
    Ok(Redirect::to(&format!("/?detail={plant_id}")))
}

pub async fn log_water_backdate(
    State(state): State<AppState>,
    Path(plant_id): Path<i64>,
    Form(form): Form<BackdateForm>,
) -> Result<Redirect, AppError> {
    let watered_at = form
        .date
        .as_deref()
        .and_then(schedule::backdate_to_iso)
        .unwrap_or_else(schedule::now_iso);
    let note = match form.note {
        Some(note) if !note.is_empty() => note,
        _ => "backdated".to_string(),
    };

    let logged = with_conn(state.db_path.clone(), move |conn| {
        if storage::get_plant(conn, plant_id)?.is_none() {
            return Ok(false);
        }
        storage::insert_water_log(conn, plant_id, &watered_at, &note)?;
        Ok(true)
    })
    .await?;

    if !logged {
        return Err(AppError::not_found());
    }
    Ok(Redirect::to(&format!("/?detail={plant_id}")))
}

pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summaries = with_conn(state.db_path.clone(), storage::list_summaries).await?;
    let body = export_csv_string(&summaries);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"plants_export.csv\"",
            ),
        ],
        body,
    ))
}

/// One header row, one row per plant. Raw stored and derived UTC strings are
/// written verbatim; no timezone conversion.
pub fn export_csv_string(summaries: &[PlantSummary]) -> String {
    let mut out = String::from(
        "id,name,species,location,water_interval_days,created_at,updated_at,last_watered,next_watering\n",
    );
    for summary in summaries {
        let plant = &summary.plant;
        let fields = [
            plant.id.to_string(),
            plant.name.clone(),
            plant.species.clone().unwrap_or_default(),
            plant.location.clone().unwrap_or_default(),
            plant.water_interval_days.to_string(),
            plant.created_at.clone(),
            plant.updated_at.clone(),
            summary.last_watered.clone().unwrap_or_default(),
            summary.next_watering.clone().unwrap_or_default(),
        ];
        let row = fields
            .iter()
            .map(|field| csv_field(field))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plant;

    fn summary(name: &str, species: Option<&str>, location: Option<&str>, next: Option<&str>) -> PlantSummary {
        PlantSummary {
            plant: Plant {
                id: 1,
                name: name.to_string(),
                species: species.map(str::to_string),
                location: location.map(str::to_string),
                water_interval_days: 7,
                notes: None,
                created_at: "2026-01-01T00:00:00+00:00".to_string(),
                updated_at: "2026-01-01T00:00:00+00:00".to_string(),
            },
            last_watered: None,
            next_watering: next.map(str::to_string),
        }
    }

    fn frozen_now() -> DateTime<Utc> {
        schedule::parse_iso("2026-02-01T00:00:00+00:00").unwrap()
    }

    #[test]
    fn text_filter_matches_any_of_three_fields() {
        let plants = vec![
            summary("Fern", Some("Nephrolepis"), Some("Kitchen"), None),
            summary("Cactus", None, Some("Office desk"), None),
        ];
        assert_eq!(filter_plants(&plants, "kitchen", "all", frozen_now()).len(), 1);
        assert_eq!(filter_plants(&plants, "NEPHRO", "all", frozen_now()).len(), 1);
        assert_eq!(filter_plants(&plants, "desk", "all", frozen_now()).len(), 1);
        assert_eq!(filter_plants(&plants, "orchid", "all", frozen_now()).len(), 0);
        assert_eq!(filter_plants(&plants, "", "all", frozen_now()).len(), 2);
    }

    #[test]
    fn due_filter_requires_computable_past_or_present_projection() {
        let plants = vec![
            summary("Overdue", None, None, Some("2026-01-20T00:00:00+00:00")),
            summary("Boundary", None, None, Some("2026-02-01T00:00:00+00:00")),
            summary("Upcoming", None, None, Some("2026-02-10T00:00:00+00:00")),
            summary("NoData", None, None, None),
        ];
        let due: Vec<&str> = filter_plants(&plants, "", "due", frozen_now())
            .iter()
            .map(|p| p.plant.name.as_str())
            .collect();
        assert_eq!(due, vec!["Overdue", "Boundary"]);
    }

    #[test]
    fn filters_combine_with_logical_and() {
        let plants = vec![
            summary("Fern", None, Some("Kitchen"), Some("2026-01-20T00:00:00+00:00")),
            summary("Fern Two", None, Some("Kitchen"), Some("2026-03-01T00:00:00+00:00")),
        ];
        let hits = filter_plants(&plants, "fern", "due", frozen_now());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].plant.name, "Fern");
    }

    #[test]
    fn csv_has_header_and_one_row_per_plant() {
        let plants = vec![
            summary("Fern", Some("Nephrolepis"), None, Some("2026-01-08T00:00:00+00:00")),
            summary("Cactus", None, None, None),
        ];
        let csv = export_csv_string(&plants);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "id,name,species,location,water_interval_days,created_at,updated_at,last_watered,next_watering"
        );
        assert!(lines[1].ends_with(",2026-01-08T00:00:00+00:00"));
        assert!(lines[2].ends_with(",,"));
    }

    #[test]
    fn csv_quotes_fields_with_commas_and_quotes() {
        let plants = vec![summary("Ficus, the \"big\" one", None, None, None)];
        let csv = export_csv_string(&plants);
        assert!(csv.contains(r#""Ficus, the ""big"" one""#));
    }
}
