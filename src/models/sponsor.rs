use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sponsor {
    pub id: Uuid,
    pub convention_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Media-relative path of the sponsor logo, if uploaded.
    pub logo: Option<String>,
    /// Sponsorship tier, e.g. "gold", "silver".
    pub level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
