//! Public read access to the event catalog, plus registration creation.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Convention, Event, EventType, Registration, Sponsor};
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::AppState;

const CONVENTION_COLUMNS: &str =
    "id, name, description, start_at, end_at, published, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, convention_id, event_type, name, description, start_at, end_at, \
     size, published, group_event, require_game_id, game_id_name, image, sponsor_id, organizer, \
     prizes, rules, created_at, updated_at";

pub async fn list_conventions(State(state): State<AppState>) -> Result<Response, AppError> {
    let conventions = sqlx::query_as::<_, Convention>(&format!(
        "SELECT {CONVENTION_COLUMNS} FROM conventions WHERE published ORDER BY start_at"
    ))
    .fetch_all(&state.pool)
    .await?;

    Ok(success(conventions, "Published conventions").into_response())
}

pub async fn list_event_types(State(state): State<AppState>) -> Result<Response, AppError> {
    let event_types = sqlx::query_as::<_, EventType>(
        "SELECT code, name, overlapping FROM event_types ORDER BY code",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(success(event_types, "Event types").into_response())
}

#[derive(Serialize)]
struct EventPayload {
    #[serde(flatten)]
    event: Event,
    /// Ticket options that satisfy participation in this event.
    valid_option_ids: Vec<Uuid>,
}

async fn published_convention(
    state: &AppState,
    convention_id: Uuid,
) -> Result<Convention, AppError> {
    sqlx::query_as::<_, Convention>(&format!(
        "SELECT {CONVENTION_COLUMNS} FROM conventions WHERE id = $1 AND published"
    ))
    .bind(convention_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Convention '{convention_id}' was not found")))
}

pub async fn list_events(
    State(state): State<AppState>,
    Path(convention_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let convention = published_convention(&state, convention_id).await?;

    let events = sqlx::query_as::<_, Event>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events
         WHERE convention_id = $1 AND published
         ORDER BY start_at"
    ))
    .bind(convention.id)
    .fetch_all(&state.pool)
    .await?;

    let event_ids: Vec<Uuid> = events.iter().map(|event| event.id).collect();
    let links: Vec<(Uuid, Uuid)> = sqlx::query_as(
        "SELECT event_id, ticket_option_id FROM event_valid_options WHERE event_id = ANY($1)",
    )
    .bind(&event_ids)
    .fetch_all(&state.pool)
    .await?;

    let mut options_by_event: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (event_id, option_id) in links {
        options_by_event.entry(event_id).or_default().push(option_id);
    }

    let payload: Vec<EventPayload> = events
        .into_iter()
        .map(|event| {
            let valid_option_ids = options_by_event.remove(&event.id).unwrap_or_default();
            EventPayload {
                event,
                valid_option_ids,
            }
        })
        .collect();

    Ok(success(payload, "Published events").into_response())
}

pub async fn list_sponsors(
    State(state): State<AppState>,
    Path(convention_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let convention = published_convention(&state, convention_id).await?;

    let sponsors = sqlx::query_as::<_, Sponsor>(
        "SELECT id, convention_id, name, description, logo, level, created_at, updated_at
         FROM sponsors WHERE convention_id = $1 ORDER BY level, name",
    )
    .bind(convention.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(success(sponsors, "Convention sponsors").into_response())
}

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub user_id: Uuid,
    pub group_name: Option<String>,
    #[serde(default)]
    pub group_captain: bool,
    pub game_id: Option<String>,
}

/// Creates a Registration for a published event. Capacity (`size`) is
/// advisory and deliberately not checked here.
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(input): Json<RegisterInput>,
) -> Result<Response, AppError> {
    let event = sqlx::query_as::<_, Event>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND published"
    ))
    .bind(event_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Event '{event_id}' was not found")))?;

    if event.require_game_id
        && input
            .game_id
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .is_empty()
    {
        let label = event.game_id_name.as_deref().unwrap_or("Game ID");
        return Err(AppError::ValidationError(format!(
            "{label} is required for this event"
        )));
    }

    let user_exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(input.user_id)
        .fetch_one(&state.pool)
        .await?;
    if !user_exists {
        return Err(AppError::NotFound(format!(
            "User '{}' was not found",
            input.user_id
        )));
    }

    // date_added comes from the column default and is never written again.
    let registration = sqlx::query_as::<_, Registration>(
        "INSERT INTO registrations (id, user_id, event_id, group_name, group_captain, game_id)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, user_id, event_id, date_added, group_name, group_captain, game_id",
    )
    .bind(Uuid::new_v4())
    .bind(input.user_id)
    .bind(event.id)
    .bind(&input.group_name)
    .bind(input.group_captain)
    .bind(&input.game_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(success(registration, "Registered for event").into_response())
}
