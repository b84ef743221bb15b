//! Structural configuration for the external admin renderer: how each
//! entity's edit screen groups its fields, which columns its list view
//! shows, and which fields are readonly.

use serde_json::{json, Value};

pub fn admin_schema() -> Value {
    json!({
        "convention": {
            "fieldsets": [
                { "title": null, "fields": [["name", "published"], ["start_at", "end_at"]] },
                { "title": "Details", "fields": [["description"]] },
            ],
            "list_display": ["name", "start_at", "end_at"],
            "list_filter": [],
            "readonly_fields": [],
        },
        "event_type": {
            "fieldsets": [
                { "title": null, "fields": [["code", "name", "overlapping"]] },
            ],
            "list_display": ["code", "name", "overlapping"],
            "list_filter": [],
            "readonly_fields": [],
        },
        "event": {
            "fieldsets": [
                {
                    "title": null,
                    "fields": [
                        ["name"],
                        ["convention_id", "event_type"],
                        ["published"],
                        ["start_at", "end_at"],
                        ["description"],
                    ],
                },
                {
                    "title": "Details",
                    "fields": [
                        ["size"],
                        ["valid_options"],
                        ["group_event"],
                        ["require_game_id", "game_id_name"],
                    ],
                },
                { "title": "Image", "fields": [["image"]] },
                {
                    "title": "Other Details",
                    "fields": [["sponsor_id"], ["organizer"], ["prizes"], ["rules"]],
                },
            ],
            "list_display": ["name", "event_type", "convention_id", "size", "start_at", "end_at"],
            "list_filter": ["name", "event_type", "convention_id"],
            "readonly_fields": [],
        },
        "registration": {
            "fieldsets": [
                { "title": "Required", "fields": [["user_id", "event_id"], ["date_added"]] },
                { "title": "Optional", "fields": [["group_name", "group_captain"], ["game_id"]] },
            ],
            "list_display": ["id", "user_id", "event_id", "date_added", "game_id", "group_name", "group_captain"],
            "list_filter": ["user_id", "event_id"],
            "readonly_fields": ["date_added"],
        },
        "sponsor": {
            "fieldsets": [
                {
                    "title": "Required",
                    "fields": [["name"], ["description"], ["logo"], ["level"], ["convention_id"]],
                },
            ],
            "list_display": ["id", "name", "level", "convention_id"],
            "list_filter": ["level", "convention_id"],
            "readonly_fields": [],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_date_added_is_readonly() {
        let schema = admin_schema();
        let readonly = &schema["registration"]["readonly_fields"];
        assert_eq!(readonly, &json!(["date_added"]));
    }

    #[test]
    fn every_entity_describes_a_list_view() {
        let schema = admin_schema();
        for entity in ["convention", "event_type", "event", "registration", "sponsor"] {
            let columns = schema[entity]["list_display"]
                .as_array()
                .unwrap_or_else(|| panic!("{entity} missing list_display"));
            assert!(!columns.is_empty());
        }
    }
}
