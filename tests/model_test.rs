use serde_json::{Value, json};

use issue_lens::types::{Event, Issue, Label, State, normalize_event, normalize_issue};

#[test]
fn state_compares_by_raw_value() {
    assert_eq!(State::from_raw(Some(&json!("open"))), State::Open);
    assert_eq!(State::from_raw(Some(&json!("closed"))), State::Closed);
    assert_eq!(State::from_raw(Some(&json!("OPEN"))), State::Unknown);
    assert_eq!(State::from_raw(Some(&json!("merged"))), State::Unknown);
    assert_eq!(State::from_raw(None), State::Unknown);
    assert_eq!(State::Open.as_str(), "open");
    assert_eq!(State::Closed.as_str(), "closed");
}

#[test]
fn create_event() {
    let e = normalize_event(&json!({
        "event_type": "labeled",
        "author": "dev_user",
        "event_date": "2025-01-01T12:00:00",
        "label": "bug",
        "comment": "needs fix"
    }));

    assert_eq!(e.event_type.as_deref(), Some("labeled"));
    assert_eq!(e.author.as_deref(), Some("dev_user"));
    assert!(e.event_date.is_some());
    assert_eq!(e.label.as_deref(), Some("bug"));
    assert_eq!(e.comment.as_deref(), Some("needs fix"));
}

#[test]
fn event_with_broken_date_keeps_other_fields() {
    let e = normalize_event(&json!({
        "event_type": "labeled",
        "event_date": "garbage-date-string"
    }));
    assert!(e.event_date.is_none());
    assert_eq!(e.event_type.as_deref(), Some("labeled"));
}

#[test]
fn event_from_null_or_junk_is_empty() {
    for raw in [Value::Null, json!({}), json!("text"), json!([1, 2]), json!(5)] {
        assert_eq!(normalize_event(&raw), Event::default(), "input: {raw}");
    }
}

#[test]
fn create_full_issue() {
    let i = normalize_issue(&json!({
        "url": "http://test.com",
        "creator": "admin",
        "labels": ["bug"],
        "state": "open",
        "assignees": ["me"],
        "title": "Broken login",
        "text": "Fix it",
        "number": "42",
        "created_date": "2025-01-01T10:00:00",
        "updated_date": "2025-01-02T10:00:00",
        "timeline_url": "http://test.com/timeline",
        "events": [{"event_type": "commented", "event_date": "2025-01-01T12:00:00"}]
    }));

    assert_eq!(i.number, 42);
    assert_eq!(i.state, State::Open);
    assert_eq!(i.url.as_deref(), Some("http://test.com"));
    assert_eq!(i.creator.as_deref(), Some("admin"));
    assert_eq!(i.assignees, ["me"]);
    assert_eq!(i.title.as_deref(), Some("Broken login"));
    assert_eq!(i.timeline_url.as_deref(), Some("http://test.com/timeline"));
    assert!(i.created_date.is_some());
    assert!(i.updated_date > i.created_date);
    assert_eq!(i.events.len(), 1);
    assert_eq!(i.events[0].event_type.as_deref(), Some("commented"));
}

#[test]
fn malformed_fields_degrade_to_sentinels() {
    let i = normalize_issue(&json!({
        "state": "closed",
        "number": "not-a-number",
        "created_date": "bad-date",
        "updated_date": "bad-date",
        "events": "not a list",
        "labels": {"name": "not a list either"},
        "assignees": 3
    }));

    assert_eq!(i.state, State::Closed);
    assert_eq!(i.number, -1);
    assert!(i.created_date.is_none());
    assert!(i.updated_date.is_none());
    assert!(i.events.is_empty());
    assert!(i.labels.is_empty());
    assert!(i.assignees.is_empty());
}

#[test]
fn null_issue_is_fully_defaulted() {
    for raw in [Value::Null, json!({}), json!([]), json!("issue")] {
        let i = normalize_issue(&raw);
        assert_eq!(i, Issue::default(), "input: {raw}");
        assert!(i.url.is_none());
        assert_eq!(i.number, -1);
        assert_eq!(i.state, State::Unknown);
    }
}

#[test]
fn null_fields_are_unset() {
    let i = normalize_issue(&json!({"title": null, "number": null, "events": null}));
    assert!(i.title.is_none());
    assert_eq!(i.number, -1);
    assert!(i.events.is_empty());
}

#[test]
fn date_parse_is_repeatable() {
    let raw = json!({"created_date": "2020-01-01T00:00:00Z"});
    let a = normalize_issue(&raw).created_date;
    let b = normalize_issue(&raw).created_date;
    assert!(a.is_some());
    assert_eq!(a, b);
}

#[test]
fn labels_accept_both_shapes() {
    let i = normalize_issue(&json!({
        "labels": ["bug", {"name": "ui", "color": "ededed"}, {"color": "nameless"}, null, 7]
    }));

    assert_eq!(
        i.labels,
        [
            Label::Plain("bug".into()),
            Label::Named {
                name: "ui".into(),
                color: Some("ededed".into())
            },
            Label::Plain("7".into()),
        ]
    );
    assert_eq!(i.label_names().collect::<Vec<_>>(), ["bug", "ui", "7"]);
}

#[test]
fn assignees_accept_logins_and_user_objects() {
    let i = normalize_issue(&json!({
        "assignees": ["alice", {"login": "bob"}, {"id": 3}, 4]
    }));
    assert_eq!(i.assignees, ["alice", "bob"]);
}

#[test]
fn malformed_events_inside_list_are_tolerated() {
    let i = normalize_issue(&json!({
        "events": [null, "oops", {"event_type": "closed", "event_date": 12}]
    }));
    assert_eq!(i.events.len(), 3);
    assert_eq!(i.events[0], Event::default());
    assert_eq!(i.events[2].event_type.as_deref(), Some("closed"));
    assert!(i.events[2].event_date.is_none());
}

#[test]
fn resolution_time_only_for_closed_issues_with_dates() {
    let closed = normalize_issue(&json!({
        "state": "closed",
        "created_date": "2020-01-01T00:00:00Z",
        "updated_date": "2020-01-16T00:00:00Z"
    }));
    assert_eq!(closed.resolution_time().map(|d| d.num_days()), Some(15));

    let open = normalize_issue(&json!({
        "state": "open",
        "created_date": "2020-01-01T00:00:00Z",
        "updated_date": "2020-01-16T00:00:00Z"
    }));
    assert!(open.resolution_time().is_none());

    let missing = normalize_issue(&json!({
        "state": "closed",
        "updated_date": "2020-01-16T00:00:00Z"
    }));
    assert!(missing.resolution_time().is_none());
}
