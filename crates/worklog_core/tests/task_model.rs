use chrono::NaiveDate;
use worklog_core::{FieldValue, Task, TaskField, ValidationError};

fn date(day: u32, month: u32, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn from_raw_coerces_all_fields() {
    let task = Task::from_raw("05/05/2024", "Fix bug", "45", "").unwrap();

    assert_eq!(task.date, date(5, 5, 2024));
    assert_eq!(task.title, "Fix bug");
    assert_eq!(task.duration, 45);
    assert_eq!(task.notes, "");
}

#[test]
fn from_raw_reports_first_invalid_field() {
    let err = Task::from_raw("31/02/2024", "", "abc", "").unwrap_err();
    assert!(matches!(err, ValidationError::InvalidDate { .. }));

    let err = Task::from_raw("01/02/2024", "", "abc", "").unwrap_err();
    assert_eq!(err, ValidationError::EmptyTitle);

    let err = Task::from_raw("01/02/2024", "Write docs", "abc", "").unwrap_err();
    assert!(matches!(err, ValidationError::InvalidDuration { input } if input == "abc"));
}

#[test]
fn field_text_uses_display_formats() {
    let task = Task::new(date(1, 1, 2023), "Standup", 30, "daily sync");

    assert_eq!(task.field_text(TaskField::Date), "01/01/2023");
    assert_eq!(task.field_text(TaskField::Title), "Standup");
    assert_eq!(task.field_text(TaskField::Duration), "30");
    assert_eq!(task.field_text(TaskField::Notes), "daily sync");
}

#[test]
fn apply_replaces_exactly_one_field() {
    let original = Task::new(date(1, 1, 2023), "Standup", 30, "daily sync");
    let mut task = original.clone();

    task.apply(FieldValue::Duration(15));

    assert_eq!(task.duration, 15);
    assert_eq!(task.date, original.date);
    assert_eq!(task.title, original.title);
    assert_eq!(task.notes, original.notes);
}

#[test]
fn field_coercion_follows_creation_rules() {
    assert_eq!(
        TaskField::Date.coerce("02/01/2023").unwrap(),
        FieldValue::Date(date(2, 1, 2023))
    );
    assert_eq!(
        TaskField::Title.coerce(""),
        Err(ValidationError::EmptyTitle)
    );
    assert!(TaskField::Duration.coerce("ten").is_err());
    assert_eq!(
        TaskField::Notes.coerce("").unwrap(),
        FieldValue::Notes(String::new())
    );
    assert_eq!(
        TaskField::Duration.coerce("10").unwrap().field(),
        TaskField::Duration
    );
}

#[test]
fn serialization_uses_canonical_fields() {
    let task = Task::new(date(5, 5, 2024), "Fix bug", 45, "");

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["date"], "05/05/2024");
    assert_eq!(json["title"], "Fix bug");
    assert_eq!(json["duration"], 45);
    assert_eq!(json["notes"], "");

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn deserialization_defaults_missing_notes() {
    let decoded: Task = serde_json::from_str(
        r#"{"date":"02/01/2023","title":"Review","duration":20}"#,
    )
    .unwrap();

    assert_eq!(decoded.notes, "");
    assert_eq!(decoded.date, date(2, 1, 2023));
}

#[test]
fn deserialization_rejects_malformed_date() {
    let result = serde_json::from_str::<Task>(
        r#"{"date":"2023-01-02","title":"Review","duration":20,"notes":""}"#,
    );
    assert!(result.is_err());
}
