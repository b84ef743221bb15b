//! Administrative CRUD for the event catalog, consumed by the external
//! admin UI. All endpoints require the "Site Admin" group.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::admin::admin_schema;
use crate::auth::{GroupRequired, SiteAdmin};
use crate::models::convention::schedule_is_valid;
use crate::models::{Convention, Event, Registration, RegistrationUpdate};
use crate::thumbs;
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::AppState;

const CONVENTION_COLUMNS: &str =
    "id, name, description, start_at, end_at, published, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, convention_id, event_type, name, description, start_at, end_at, \
     size, published, group_event, require_game_id, game_id_name, image, sponsor_id, organizer, \
     prizes, rules, created_at, updated_at";

const REGISTRATION_COLUMNS: &str =
    "id, user_id, event_id, date_added, group_name, group_captain, game_id";

pub async fn schema(_admin: GroupRequired<SiteAdmin>) -> Response {
    success(admin_schema(), "Admin schema").into_response()
}

#[derive(Debug, Deserialize)]
pub struct ConventionInput {
    pub name: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub published: bool,
}

pub async fn create_convention(
    _admin: GroupRequired<SiteAdmin>,
    State(state): State<AppState>,
    Json(input): Json<ConventionInput>,
) -> Result<Response, AppError> {
    if !schedule_is_valid(input.start_at, input.end_at) {
        return Err(AppError::ValidationError(
            "Convention end must not be before its start".to_string(),
        ));
    }

    let convention = sqlx::query_as::<_, Convention>(&format!(
        "INSERT INTO conventions (id, name, description, start_at, end_at, published)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {CONVENTION_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.start_at)
    .bind(input.end_at)
    .bind(input.published)
    .fetch_one(&state.pool)
    .await?;

    Ok(success(convention, "Convention created").into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct ConventionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub published: Option<bool>,
}

pub async fn update_convention(
    _admin: GroupRequired<SiteAdmin>,
    State(state): State<AppState>,
    Path(convention_id): Path<Uuid>,
    Json(patch): Json<ConventionPatch>,
) -> Result<Response, AppError> {
    let mut convention = sqlx::query_as::<_, Convention>(&format!(
        "SELECT {CONVENTION_COLUMNS} FROM conventions WHERE id = $1"
    ))
    .bind(convention_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Convention '{convention_id}' was not found")))?;

    if let Some(name) = patch.name {
        convention.name = name;
    }
    if let Some(description) = patch.description {
        convention.description = Some(description);
    }
    if let Some(start_at) = patch.start_at {
        convention.start_at = start_at;
    }
    if let Some(end_at) = patch.end_at {
        convention.end_at = end_at;
    }
    if let Some(published) = patch.published {
        convention.published = published;
    }

    if !schedule_is_valid(convention.start_at, convention.end_at) {
        return Err(AppError::ValidationError(
            "Convention end must not be before its start".to_string(),
        ));
    }

    let convention = sqlx::query_as::<_, Convention>(&format!(
        "UPDATE conventions
         SET name = $1, description = $2, start_at = $3, end_at = $4, published = $5,
             updated_at = now()
         WHERE id = $6
         RETURNING {CONVENTION_COLUMNS}"
    ))
    .bind(&convention.name)
    .bind(&convention.description)
    .bind(convention.start_at)
    .bind(convention.end_at)
    .bind(convention.published)
    .bind(convention.id)
    .fetch_one(&state.pool)
    .await?;

    Ok(success(convention, "Convention updated").into_response())
}

#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub convention_id: Uuid,
    pub event_type: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub size: Option<i32>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub group_event: bool,
    #[serde(default)]
    pub require_game_id: bool,
    pub game_id_name: Option<String>,
    pub sponsor_id: Option<Uuid>,
    pub organizer: Option<String>,
    pub prizes: Option<String>,
    pub rules: Option<String>,
    /// Ticket options that count as valid admission for this event.
    #[serde(default)]
    pub valid_option_ids: Vec<Uuid>,
}

pub async fn create_event(
    _admin: GroupRequired<SiteAdmin>,
    State(state): State<AppState>,
    Json(input): Json<EventInput>,
) -> Result<Response, AppError> {
    let convention_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM conventions WHERE id = $1)")
            .bind(input.convention_id)
            .fetch_one(&state.pool)
            .await?;
    if !convention_exists {
        return Err(AppError::ValidationError(format!(
            "Convention '{}' does not exist",
            input.convention_id
        )));
    }

    let mut tx = state.pool.begin().await?;

    let event = sqlx::query_as::<_, Event>(&format!(
        "INSERT INTO events (id, convention_id, event_type, name, description, start_at, end_at,
                             size, published, group_event, require_game_id, game_id_name,
                             sponsor_id, organizer, prizes, rules)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
         RETURNING {EVENT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(input.convention_id)
    .bind(&input.event_type)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.start_at)
    .bind(input.end_at)
    .bind(input.size)
    .bind(input.published)
    .bind(input.group_event)
    .bind(input.require_game_id)
    .bind(&input.game_id_name)
    .bind(input.sponsor_id)
    .bind(&input.organizer)
    .bind(&input.prizes)
    .bind(&input.rules)
    .fetch_one(&mut *tx)
    .await?;

    for option_id in &input.valid_option_ids {
        sqlx::query(
            "INSERT INTO event_valid_options (event_id, ticket_option_id) VALUES ($1, $2)",
        )
        .bind(event.id)
        .bind(option_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(success(event, "Event created").into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct EventPatch {
    pub event_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub size: Option<i32>,
    pub published: Option<bool>,
    pub group_event: Option<bool>,
    pub require_game_id: Option<bool>,
    pub game_id_name: Option<String>,
    pub sponsor_id: Option<Uuid>,
    pub organizer: Option<String>,
    pub prizes: Option<String>,
    pub rules: Option<String>,
    /// When present, replaces the event's valid ticket options outright.
    pub valid_option_ids: Option<Vec<Uuid>>,
}

pub async fn update_event(
    _admin: GroupRequired<SiteAdmin>,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(patch): Json<EventPatch>,
) -> Result<Response, AppError> {
    let mut event = sqlx::query_as::<_, Event>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
    ))
    .bind(event_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Event '{event_id}' was not found")))?;

    if let Some(event_type) = patch.event_type {
        event.event_type = Some(event_type);
    }
    if let Some(name) = patch.name {
        event.name = name;
    }
    if let Some(description) = patch.description {
        event.description = Some(description);
    }
    if let Some(start_at) = patch.start_at {
        event.start_at = start_at;
    }
    if let Some(end_at) = patch.end_at {
        event.end_at = end_at;
    }
    if let Some(size) = patch.size {
        event.size = Some(size);
    }
    if let Some(published) = patch.published {
        event.published = published;
    }
    if let Some(group_event) = patch.group_event {
        event.group_event = group_event;
    }
    if let Some(require_game_id) = patch.require_game_id {
        event.require_game_id = require_game_id;
    }
    if let Some(game_id_name) = patch.game_id_name {
        event.game_id_name = Some(game_id_name);
    }
    if let Some(sponsor_id) = patch.sponsor_id {
        event.sponsor_id = Some(sponsor_id);
    }
    if let Some(organizer) = patch.organizer {
        event.organizer = Some(organizer);
    }
    if let Some(prizes) = patch.prizes {
        event.prizes = Some(prizes);
    }
    if let Some(rules) = patch.rules {
        event.rules = Some(rules);
    }

    let mut tx = state.pool.begin().await?;

    let event = sqlx::query_as::<_, Event>(&format!(
        "UPDATE events
         SET event_type = $1, name = $2, description = $3, start_at = $4, end_at = $5,
             size = $6, published = $7, group_event = $8, require_game_id = $9,
             game_id_name = $10, sponsor_id = $11, organizer = $12, prizes = $13, rules = $14,
             updated_at = now()
         WHERE id = $15
         RETURNING {EVENT_COLUMNS}"
    ))
    .bind(&event.event_type)
    .bind(&event.name)
    .bind(&event.description)
    .bind(event.start_at)
    .bind(event.end_at)
    .bind(event.size)
    .bind(event.published)
    .bind(event.group_event)
    .bind(event.require_game_id)
    .bind(&event.game_id_name)
    .bind(event.sponsor_id)
    .bind(&event.organizer)
    .bind(&event.prizes)
    .bind(&event.rules)
    .bind(event.id)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(option_ids) = &patch.valid_option_ids {
        sqlx::query("DELETE FROM event_valid_options WHERE event_id = $1")
            .bind(event.id)
            .execute(&mut *tx)
            .await?;
        for option_id in option_ids {
            sqlx::query(
                "INSERT INTO event_valid_options (event_id, ticket_option_id) VALUES ($1, $2)",
            )
            .bind(event.id)
            .bind(option_id)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    Ok(success(event, "Event updated").into_response())
}

/// Stores an uploaded event image under a uuid filename, writes the path
/// onto the event row, then runs the thumbnail hook on the stored file.
pub async fn upload_event_image(
    _admin: GroupRequired<SiteAdmin>,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    body: Bytes,
) -> Result<Response, AppError> {
    let event_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
            .bind(event_id)
            .fetch_one(&state.pool)
            .await?;
    if !event_exists {
        return Err(AppError::NotFound(format!(
            "Event '{event_id}' was not found"
        )));
    }

    let format = image::guess_format(&body)
        .map_err(|_| AppError::ValidationError("Body is not a recognized image".to_string()))?;
    let extension = format
        .extensions_str()
        .first()
        .copied()
        .unwrap_or("img");

    let relative = thumbs::media_filename(extension);
    let absolute = state.config.media_dir.join(&relative);
    if let Some(parent) = absolute.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::InternalServerError(format!("media dir: {e}")))?;
    }
    tokio::fs::write(&absolute, &body)
        .await
        .map_err(|e| AppError::InternalServerError(format!("media write: {e}")))?;

    let relative_str = relative.to_string_lossy().to_string();
    let event = sqlx::query_as::<_, Event>(&format!(
        "UPDATE events SET image = $1, updated_at = now() WHERE id = $2
         RETURNING {EVENT_COLUMNS}"
    ))
    .bind(&relative_str)
    .bind(event_id)
    .fetch_one(&state.pool)
    .await?;

    // Post-persist hook: shrink oversized uploads in place.
    thumbs::shrink_in_place(&absolute).map_err(|e| match e {
        thumbs::ThumbError::Image(_) => {
            AppError::ValidationError("Uploaded image could not be processed".to_string())
        }
        thumbs::ThumbError::Io(e) => AppError::InternalServerError(format!("thumbnail: {e}")),
    })?;

    Ok(success(event, "Event image uploaded").into_response())
}

pub async fn update_registration(
    _admin: GroupRequired<SiteAdmin>,
    State(state): State<AppState>,
    Path(registration_id): Path<Uuid>,
    Json(update): Json<RegistrationUpdate>,
) -> Result<Response, AppError> {
    let mut registration = sqlx::query_as::<_, Registration>(&format!(
        "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1"
    ))
    .bind(registration_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!("Registration '{registration_id}' was not found"))
    })?;

    update.apply(&mut registration);

    // date_added is readonly: the update never lists it.
    let registration = sqlx::query_as::<_, Registration>(&format!(
        "UPDATE registrations
         SET group_name = $1, group_captain = $2, game_id = $3
         WHERE id = $4
         RETURNING {REGISTRATION_COLUMNS}"
    ))
    .bind(&registration.group_name)
    .bind(registration.group_captain)
    .bind(&registration.game_id)
    .bind(registration.id)
    .fetch_one(&state.pool)
    .await?;

    Ok(success(registration, "Registration updated").into_response())
}
