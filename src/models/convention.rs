use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Convention {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A convention may not end before it starts. Checked on admin create and
/// update.
pub fn schedule_is_valid(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> bool {
    end_at >= start_at
}

/// Category of event. Originally a fixed enumeration (LAN, Miniatures, RPG,
/// Tabletop); the schema was later loosened to a free-form code so new
/// categories can be added without a migration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventType {
    pub code: String,
    pub name: String,
    /// Whether events of this type may overlap other scheduled events.
    pub overlapping: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn end_before_start_is_invalid() {
        let start = Utc.with_ymd_and_hms(2016, 1, 15, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2016, 1, 14, 18, 0, 0).unwrap();
        assert!(!schedule_is_valid(start, end));
    }

    #[test]
    fn zero_length_convention_is_allowed() {
        let t = Utc.with_ymd_and_hms(2016, 1, 15, 9, 0, 0).unwrap();
        assert!(schedule_is_valid(t, t));
    }
}
