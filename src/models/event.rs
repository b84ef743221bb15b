use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub convention_id: Uuid,
    pub event_type: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    /// Advisory maximum number of participants. Never enforced against the
    /// registration count; listings surface it so clients can warn.
    pub size: Option<i32>,
    pub published: bool,
    pub group_event: bool,
    /// Some events need a game-specific identity (Battle.net ID, Summoner
    /// ID, ...). `game_id_name` is the label shown for it.
    pub require_game_id: bool,
    pub game_id_name: Option<String>,
    /// Media-relative path of the uploaded thumbnail, if any.
    pub image: Option<String>,
    pub sponsor_id: Option<Uuid>,
    pub organizer: Option<String>,
    pub prizes: Option<String>,
    pub rules: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
