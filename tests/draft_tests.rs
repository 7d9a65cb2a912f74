use chrono::{TimeZone, Utc};
use taskhub::draft::{encode, encode_recurrence, DraftError, TaskDraft, RECURRING_INTERVALS};
use taskhub::models::UserProfile;
use taskhub::toast::ToastType;

fn profile() -> UserProfile {
    UserProfile {
        id: 7,
        username: "mara".into(),
        name: "Mara".into(),
        groups: vec!["Backend".into()],
    }
}

#[test]
fn test_empty_date_and_time_encode_no_deadline() {
    let draft = TaskDraft {
        description: "Water the plants".into(),
        ..TaskDraft::default()
    };
    let task = encode(&draft, &profile()).unwrap();
    assert_eq!(task.deadline, 0);
    assert_eq!(task.recurring_interval, None);
    assert_eq!(task.assigned_group, None);
    assert_eq!(task.assigned_user, 7);
    assert_eq!(task.description, "Water the plants");
}

#[test]
fn test_date_without_time_is_an_info_notice() {
    let draft = TaskDraft {
        description: "File the report".into(),
        date: "2024-06-01".into(),
        ..TaskDraft::default()
    };
    let err = encode(&draft, &profile()).unwrap_err();
    assert_eq!(err, DraftError::IncompleteDueDate);
    // A gentle prompt, not a hard error.
    assert_eq!(err.notice().0, ToastType::Info);

    let draft = TaskDraft {
        description: "File the report".into(),
        time: "17:00".into(),
        ..TaskDraft::default()
    };
    assert_eq!(encode(&draft, &profile()).unwrap_err(), DraftError::IncompleteDueDate);
}

#[test]
fn test_invalid_month_is_rejected_before_any_request() {
    let draft = TaskDraft {
        description: "File the report".into(),
        date: "2024-13-01".into(),
        time: "10:00".into(),
        ..TaskDraft::default()
    };
    let err = encode(&draft, &profile()).unwrap_err();
    assert_eq!(err, DraftError::DateFormat);
    assert_eq!(err.notice().0, ToastType::Error);
}

#[test]
fn test_bad_time_entry() {
    let draft = TaskDraft {
        description: "File the report".into(),
        date: "2024-06-01".into(),
        time: "late".into(),
        ..TaskDraft::default()
    };
    assert_eq!(encode(&draft, &profile()).unwrap_err(), DraftError::TimeFormat);
}

#[test]
fn test_full_deadline_is_encoded_at_the_fixed_offset() {
    let draft = TaskDraft {
        description: "File the report".into(),
        date: "2024-06-01".into(),
        time: "09:30".into(),
        ..TaskDraft::default()
    };
    let task = encode(&draft, &profile()).unwrap();
    // 09:30 at UTC+1 is 08:30 UTC
    let expected = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap().timestamp();
    assert_eq!(task.deadline, expected);
}

#[test]
fn test_recurrence_encodes_as_zero_based_index() {
    assert_eq!(encode_recurrence("").unwrap(), None);
    assert_eq!(encode_recurrence("hourly").unwrap(), Some(0));
    assert_eq!(encode_recurrence("weekly").unwrap(), Some(2));
    assert_eq!(encode_recurrence("yearly").unwrap(), Some(4));
    // Labels are matched case-insensitively
    assert_eq!(encode_recurrence("Monthly").unwrap(), Some(3));
    assert_eq!(RECURRING_INTERVALS.len(), 5);

    match encode_recurrence("fortnightly").unwrap_err() {
        DraftError::UnknownInterval(label) => assert_eq!(label, "fortnightly"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_explicit_assignments_pass_through() {
    let draft = TaskDraft {
        description: "Review the deploy".into(),
        recurring: "daily".into(),
        assigned_group: Some(3),
        assigned_user: Some(42),
        ..TaskDraft::default()
    };
    let task = encode(&draft, &profile()).unwrap();
    assert_eq!(task.recurring_interval, Some(1));
    assert_eq!(task.assigned_group, Some(3));
    assert_eq!(task.assigned_user, 42);
}
