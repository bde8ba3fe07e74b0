//! Normalizes whatever is on disk into the full document shape.
//!
//! Files written by older versions may lack top-level keys, entry fields or
//! ids, and may carry values the typed model rejects. Everything is repaired
//! here once, so the rest of the crate works with a complete [`Document`].

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Document, Motivation, Profile, Settings, TaskStatus, TaskType, Theme, DOCUMENT_VERSION,
};

pub struct Migration {
    pub document: Document,
    /// One line per repaired field or dropped entry.
    pub repairs: Vec<String>,
}

pub fn migrate(raw: &str) -> Result<Migration> {
    let value: Value = serde_json::from_str(raw)?;
    migrate_value(value)
}

pub fn migrate_value(value: Value) -> Result<Migration> {
    let Value::Object(mut root) = value else {
        return Err(AppError::CorruptDocument {
            path: String::new(),
            reason: "top level is not a JSON object".to_string(),
        });
    };

    let mut repairs = Vec::new();

    let version_ok = matches!(root.get("version").and_then(Value::as_u64), Some(v) if v == DOCUMENT_VERSION as u64);
    if !version_ok {
        root.insert("version".to_string(), Value::from(DOCUMENT_VERSION));
        repairs.push(format!("version set to {}", DOCUMENT_VERSION));
    }

    let schedules = take_entries(&mut root, "schedules", &mut repairs)
        .into_iter()
        .map(|mut entry| {
            let ctx = entry_context("schedule", &entry);
            ensure_id(&mut entry, &ctx, &mut repairs);
            for key in ["name", "subject", "description", "time", "date"] {
                ensure_string(&mut entry, key, "", &ctx, &mut repairs);
            }
            ensure_bool(&mut entry, "notification", false, &ctx, &mut repairs);
            Value::Object(entry)
        })
        .collect();
    root.insert("schedules".to_string(), Value::Array(schedules));

    let tasks = take_entries(&mut root, "tasks", &mut repairs)
        .into_iter()
        .map(|mut entry| {
            let ctx = entry_context("task", &entry);
            ensure_id(&mut entry, &ctx, &mut repairs);
            for key in ["name", "description", "due_date", "created_at"] {
                ensure_string(&mut entry, key, "", &ctx, &mut repairs);
            }
            let types: Vec<&str> = TaskType::ALL.iter().map(|t| t.as_str()).collect();
            ensure_choice(&mut entry, "task_type", &types, TaskType::default().as_str(), &ctx, &mut repairs);
            let statuses: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
            ensure_choice(&mut entry, "status", &statuses, TaskStatus::default().as_str(), &ctx, &mut repairs);
            Value::Object(entry)
        })
        .collect();
    root.insert("tasks".to_string(), Value::Array(tasks));

    let defaults = Profile::default();
    let mut profile = take_section(&mut root, "profile", &mut repairs);
    ensure_string(&mut profile, "name", &defaults.name, "profile", &mut repairs);
    ensure_string(&mut profile, "title", &defaults.title, "profile", &mut repairs);
    ensure_string(&mut profile, "avatar_path", &defaults.avatar_path, "profile", &mut repairs);
    root.insert("profile".to_string(), Value::Object(profile));

    let defaults = Settings::default();
    let mut settings = take_section(&mut root, "settings", &mut repairs);
    ensure_bool(&mut settings, "notifications_enabled", defaults.notifications_enabled, "settings", &mut repairs);
    ensure_choice(
        &mut settings,
        "theme",
        &[Theme::Light.as_str(), Theme::Dark.as_str()],
        defaults.theme.as_str(),
        "settings",
        &mut repairs,
    );
    ensure_string(&mut settings, "primary_color", &defaults.primary_color, "settings", &mut repairs);
    root.insert("settings".to_string(), Value::Object(settings));

    let defaults = Motivation::default();
    let mut motivation = take_section(&mut root, "motivation", &mut repairs);
    ensure_string(&mut motivation, "last_studied", &defaults.last_studied, "motivation", &mut repairs);
    ensure_string(&mut motivation, "last_sent_date", &defaults.last_sent_date, "motivation", &mut repairs);
    ensure_string(&mut motivation, "time", &defaults.time, "motivation", &mut repairs);
    let streak_ok = motivation
        .get("current_streak")
        .and_then(Value::as_u64)
        .is_some_and(|n| n <= u32::MAX as u64);
    if !streak_ok {
        motivation.insert("current_streak".to_string(), Value::from(defaults.current_streak));
        repairs.push("motivation: current_streak reset to 0".to_string());
    }
    root.insert("motivation".to_string(), Value::Object(motivation));

    let document: Document = serde_json::from_value(Value::Object(root))?;
    Ok(Migration { document, repairs })
}

fn take_entries(root: &mut Map<String, Value>, key: &str, repairs: &mut Vec<String>) -> Vec<Map<String, Value>> {
    match root.remove(key) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(entry) => Some(entry),
                other => {
                    repairs.push(format!("{}: dropped non-object entry {}", key, other));
                    None
                }
            })
            .collect(),
        Some(other) => {
            repairs.push(format!("{}: replaced {} with an empty list", key, type_name(&other)));
            Vec::new()
        }
        None => {
            repairs.push(format!("{}: added missing list", key));
            Vec::new()
        }
    }
}

fn take_section(root: &mut Map<String, Value>, key: &str, repairs: &mut Vec<String>) -> Map<String, Value> {
    match root.remove(key) {
        Some(Value::Object(section)) => section,
        Some(other) => {
            repairs.push(format!("{}: replaced {} with defaults", key, type_name(&other)));
            Map::new()
        }
        None => {
            repairs.push(format!("{}: added missing section", key));
            Map::new()
        }
    }
}

fn entry_context(kind: &str, entry: &Map<String, Value>) -> String {
    match entry.get("name").and_then(Value::as_str) {
        Some(name) => format!("{} '{}'", kind, name),
        None => kind.to_string(),
    }
}

fn ensure_id(entry: &mut Map<String, Value>, ctx: &str, repairs: &mut Vec<String>) {
    let valid = entry
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| Uuid::parse_str(id).is_ok());
    if !valid {
        entry.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        repairs.push(format!("{}: assigned id", ctx));
    }
}

fn ensure_string(entry: &mut Map<String, Value>, key: &str, default: &str, ctx: &str, repairs: &mut Vec<String>) {
    match entry.get(key) {
        Some(Value::String(_)) => {}
        // Numbers and booleans keep their text rather than being thrown away
        Some(v @ (Value::Number(_) | Value::Bool(_))) => {
            let text = v.to_string();
            repairs.push(format!("{}: {} converted to text", ctx, key));
            entry.insert(key.to_string(), Value::String(text));
        }
        _ => {
            repairs.push(format!("{}: {} defaulted", ctx, key));
            entry.insert(key.to_string(), Value::String(default.to_string()));
        }
    }
}

fn ensure_bool(entry: &mut Map<String, Value>, key: &str, default: bool, ctx: &str, repairs: &mut Vec<String>) {
    if !matches!(entry.get(key), Some(Value::Bool(_))) {
        repairs.push(format!("{}: {} defaulted to {}", ctx, key, default));
        entry.insert(key.to_string(), Value::Bool(default));
    }
}

fn ensure_choice(
    entry: &mut Map<String, Value>,
    key: &str,
    allowed: &[&str],
    default: &str,
    ctx: &str,
    repairs: &mut Vec<String>,
) {
    let ok = entry
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|v| allowed.contains(&v));
    if !ok {
        repairs.push(format!("{}: {} defaulted to {}", ctx, key, default));
        entry.insert(key.to_string(), Value::String(default.to_string()));
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_AVATAR_PATH;
    use serde_json::json;

    #[test]
    fn empty_object_becomes_default_document() {
        let migration = migrate("{}").unwrap();
        assert_eq!(migration.document, Document::default());
        assert!(!migration.repairs.is_empty());
    }

    #[test]
    fn default_document_needs_no_repairs() {
        let raw = serde_json::to_string(&Document::default()).unwrap();
        let migration = migrate(&raw).unwrap();
        assert!(migration.repairs.is_empty(), "{:?}", migration.repairs);
    }

    #[test]
    fn legacy_file_gets_ids_and_keeps_data() {
        let legacy = json!({
            "schedules": [{
                "name": "Algebra",
                "subject": "Maths",
                "description": "",
                "time": "09:00",
                "date": "10-03-2025",
                "notification": true
            }],
            "tasks": [{
                "name": "Essay",
                "description": "History",
                "due_date": "12-03-2025",
                "task_type": "Weekly",
                "status": "In Progress",
                "created_at": "01-03-2025"
            }],
            "motivation": {"last_studied": "09-03-2025", "current_streak": 4}
        });
        let doc = migrate_value(legacy).unwrap().document;

        assert_eq!(doc.schedules.len(), 1);
        assert_eq!(doc.schedules[0].name, "Algebra");
        assert!(doc.schedules[0].notification);
        assert_eq!(doc.tasks[0].status, TaskStatus::InProgress);
        assert_eq!(doc.tasks[0].task_type, TaskType::Weekly);
        assert_eq!(doc.motivation.current_streak, 4);
        assert_eq!(doc.motivation.time, "09:00");
        assert_eq!(doc.profile.avatar_path, DEFAULT_AVATAR_PATH);
        assert!(doc.settings.notifications_enabled);
    }

    #[test]
    fn repairs_bad_values_and_drops_garbage_entries() {
        let raw = json!({
            "schedules": [42, {"name": "Lab", "notification": "yes"}],
            "tasks": "nope",
            "settings": {"theme": "Solarized", "notifications_enabled": false},
            "motivation": {"current_streak": -3}
        });
        let migration = migrate_value(raw).unwrap();
        let doc = migration.document;

        assert_eq!(doc.schedules.len(), 1);
        assert!(!doc.schedules[0].notification);
        assert_eq!(doc.schedules[0].time, "");
        assert!(doc.tasks.is_empty());
        assert_eq!(doc.settings.theme, Theme::Light);
        assert!(!doc.settings.notifications_enabled);
        assert_eq!(doc.motivation.current_streak, 0);
        assert!(migration.repairs.iter().any(|r| r.contains("non-object")));
    }

    #[test]
    fn keeps_existing_ids() {
        let id = Uuid::new_v4();
        let raw = json!({"tasks": [{
            "id": id.to_string(),
            "name": "t",
            "description": "d",
            "due_date": "01-01-2025",
            "task_type": "Daily",
            "status": "Done",
            "created_at": "01-01-2025"
        }]});
        let doc = migrate_value(raw).unwrap().document;
        assert_eq!(doc.tasks[0].id, id);
    }

    #[test]
    fn non_object_root_is_corrupt() {
        assert!(matches!(
            migrate("[1, 2, 3]"),
            Err(AppError::CorruptDocument { .. })
        ));
        assert!(matches!(migrate("{not json"), Err(AppError::Json(_))));
    }
}
