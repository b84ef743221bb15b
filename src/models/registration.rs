use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    /// Set once at insert time and readonly everywhere after.
    pub date_added: DateTime<Utc>,
    pub group_name: Option<String>,
    pub group_captain: bool,
    pub game_id: Option<String>,
}

/// The only fields an admin edit may touch. `date_added`, `user_id` and
/// `event_id` are deliberately absent so an update cannot rewrite them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationUpdate {
    pub group_name: Option<String>,
    pub group_captain: Option<bool>,
    pub game_id: Option<String>,
}

impl RegistrationUpdate {
    pub fn apply(&self, registration: &mut Registration) {
        if let Some(group_name) = &self.group_name {
            registration.group_name = Some(group_name.clone());
        }
        if let Some(group_captain) = self.group_captain {
            registration.group_captain = group_captain;
        }
        if let Some(game_id) = &self.game_id {
            registration.game_id = Some(game_id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Registration {
        Registration {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            date_added: Utc::now(),
            group_name: None,
            group_captain: false,
            game_id: None,
        }
    }

    #[test]
    fn update_sets_optional_fields() {
        let mut registration = sample();
        let update = RegistrationUpdate {
            group_name: Some("Red Team".to_string()),
            group_captain: Some(true),
            game_id: Some("player#1234".to_string()),
        };
        update.apply(&mut registration);

        assert_eq!(registration.group_name.as_deref(), Some("Red Team"));
        assert!(registration.group_captain);
        assert_eq!(registration.game_id.as_deref(), Some("player#1234"));
    }

    #[test]
    fn update_never_touches_date_added_or_references() {
        let mut registration = sample();
        let before = registration.clone();

        let update = RegistrationUpdate {
            group_name: Some("Blue Team".to_string()),
            group_captain: Some(true),
            game_id: Some("player#5678".to_string()),
        };
        update.apply(&mut registration);

        assert_eq!(registration.date_added, before.date_added);
        assert_eq!(registration.user_id, before.user_id);
        assert_eq!(registration.event_id, before.event_id);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let mut registration = sample();
        let before = registration.clone();
        RegistrationUpdate::default().apply(&mut registration);

        assert_eq!(registration.group_name, before.group_name);
        assert_eq!(registration.group_captain, before.group_captain);
        assert_eq!(registration.game_id, before.game_id);
        assert_eq!(registration.date_added, before.date_added);
    }
}
