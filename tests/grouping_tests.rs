use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use taskday::grouping::*;
use taskday::models::Task;

fn at(s: &str) -> DateTime<Utc> {
    Utc.from_utc_datetime(&NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap())
}

fn pending(id: u64, due: Option<&str>) -> Task {
    Task {
        id,
        name: format!("Task {}", id),
        description: None,
        due_date: due.map(|d| NaiveDateTime::parse_from_str(d, "%Y-%m-%dT%H:%M").unwrap()),
        has_time: false,
        is_completed: false,
        completed_at: None,
        created_at: at("2024-01-01T09:00"),
    }
}

fn completed(id: u64, completed_at: &str) -> Task {
    let mut t = pending(id, None);
    t.mark_completed(at(completed_at));
    t
}

fn titles(buckets: &[Bucket]) -> Vec<&str> {
    buckets.iter().map(|b| b.title.as_str()).collect()
}

fn ids(bucket: &Bucket) -> Vec<u64> {
    bucket.tasks.iter().map(|t| t.task.id).collect()
}

#[test]
fn test_due_today_is_today_and_not_overdue() {
    let now = at("2024-01-10T00:00");
    let buckets = group(&[pending(1, Some("2024-01-10T00:00"))], View::Pending, &now);

    assert_eq!(titles(&buckets), vec!["Today"]);
    assert!(!buckets[0].tasks[0].is_overdue);
}

#[test]
fn test_past_due_gets_its_own_day_and_is_overdue() {
    let now = at("2024-01-10T00:00");
    let buckets = group(&[pending(1, Some("2024-01-08T00:00"))], View::Pending, &now);

    assert_eq!(titles(&buckets), vec!["Mon, Jan 8"]);
    assert!(buckets[0].tasks[0].is_overdue);
}

#[test]
fn test_completed_yesterday() {
    let now = at("2024-01-10T15:00");
    let buckets = group(&[completed(1, "2024-01-09T10:00")], View::Completed, &now);

    assert_eq!(titles(&buckets), vec!["Yesterday's completed"]);
}

#[test]
fn test_empty_collection_gives_no_buckets() {
    let now = at("2024-01-10T15:00");
    assert!(group(&[], View::Pending, &now).is_empty());
    assert!(group(&[], View::Completed, &now).is_empty());
}

#[test]
fn test_pending_buckets_sorted_ascending_with_no_date_last() {
    let now = at("2024-01-10T08:00");
    let tasks = vec![
        pending(0, None),
        pending(1, Some("2024-01-14T09:00")),
        pending(2, Some("2024-01-11T09:00")),
        pending(3, Some("2024-01-10T18:00")),
        pending(4, Some("2024-01-07T09:00")),
    ];
    let buckets = group(&tasks, View::Pending, &now);

    assert_eq!(
        titles(&buckets),
        vec!["Sun, Jan 7", "Today", "Tomorrow", "Sun, Jan 14", "No Date"]
    );
    assert_eq!(buckets.last().unwrap().key, BucketKey::NoDate);
    assert!(!buckets.last().unwrap().tasks[0].is_overdue);
}

#[test]
fn test_same_day_tasks_merge_in_due_time_order() {
    let now = at("2024-01-10T08:00");
    let tasks = vec![
        pending(1, Some("2024-01-12T17:30")),
        pending(2, Some("2024-01-12T08:00")),
        pending(3, Some("2024-01-12T12:00")),
    ];
    let buckets = group(&tasks, View::Pending, &now);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].title, "Fri, Jan 12");
    assert_eq!(ids(&buckets[0]), vec![2, 3, 1]);
}

#[test]
fn test_undated_today_policy_merges_into_today() {
    let now = at("2024-01-10T08:00");
    let tasks = vec![pending(1, None), pending(2, Some("2024-01-10T09:00"))];
    let buckets = group_with(&tasks, View::Pending, &now, UndatedPolicy::Today);

    assert_eq!(titles(&buckets), vec!["Today"]);
    assert_eq!(ids(&buckets[0]), vec![2, 1]);
    assert!(buckets[0].tasks.iter().all(|t| !t.is_overdue));
}

#[test]
fn test_completed_buckets_always_today_yesterday_previous() {
    let now = at("2024-01-10T15:00");
    let tasks = vec![
        completed(1, "2023-12-01T10:00"),
        completed(2, "2024-01-09T23:00"),
        completed(3, "2024-01-10T09:00"),
        completed(4, "2024-01-08T10:00"),
    ];
    let buckets = group(&tasks, View::Completed, &now);

    assert_eq!(
        titles(&buckets),
        vec!["Today's completed", "Yesterday's completed", "Previous days"]
    );
    assert_eq!(buckets.iter().map(|b| b.sort_value).collect::<Vec<_>>(), vec![3, 2, 1]);
    // newest completion first inside a bucket
    assert_eq!(ids(&buckets[2]), vec![4, 1]);
}

#[test]
fn test_future_completion_counts_as_previous_days() {
    let now = at("2024-01-10T15:00");
    let buckets = group(&[completed(1, "2024-01-12T10:00")], View::Completed, &now);

    assert_eq!(titles(&buckets), vec!["Previous days"]);
}

#[test]
fn test_completed_without_timestamp_is_skipped() {
    let now = at("2024-01-10T15:00");
    let mut broken = pending(1, None);
    broken.is_completed = true;
    let tasks = vec![broken, completed(2, "2024-01-10T10:00")];
    let buckets = group(&tasks, View::Completed, &now);

    assert_eq!(buckets.len(), 1);
    assert_eq!(ids(&buckets[0]), vec![2]);
}

#[test]
fn test_grouping_is_a_partition_of_the_view() {
    let now = at("2024-01-10T15:00");
    let mut tasks = vec![
        pending(0, None),
        pending(1, Some("2024-01-09T10:00")),
        pending(2, Some("2024-01-10T10:00")),
        pending(3, Some("2024-01-11T10:00")),
        pending(4, Some("2024-02-01T10:00")),
        completed(5, "2024-01-10T10:00"),
        completed(6, "2024-01-09T10:00"),
        completed(7, "2024-01-01T10:00"),
    ];
    tasks.push(pending(8, Some("2024-01-10T07:00")));

    for view in [View::Pending, View::Completed] {
        let buckets = group(&tasks, view, &now);
        let mut seen: Vec<u64> = buckets.iter().flat_map(ids).collect();
        seen.sort();
        let mut expected: Vec<u64> = tasks
            .iter()
            .filter(|t| t.is_completed == (view == View::Completed))
            .map(|t| t.id)
            .collect();
        expected.sort();
        assert_eq!(seen, expected);
    }
}

#[test]
fn test_grouping_is_deterministic() {
    let now = at("2024-01-10T15:00");
    let tasks = vec![
        pending(1, Some("2024-01-09T10:00")),
        pending(2, None),
        completed(3, "2024-01-10T10:00"),
    ];
    assert_eq!(group(&tasks, View::Pending, &now), group(&tasks, View::Pending, &now));
    assert_eq!(group(&tasks, View::Completed, &now), group(&tasks, View::Completed, &now));
}

#[test]
fn test_overdue_ignores_completion_status() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let mut t = pending(1, Some("2024-01-09T23:59"));
    assert!(is_overdue(&t, today));
    t.mark_completed(at("2024-01-10T10:00"));
    assert!(is_overdue(&t, today));

    let now = at("2024-01-10T15:00");
    let buckets = group(&[t], View::Completed, &now);
    assert!(buckets[0].tasks[0].is_overdue);
}

#[test]
fn test_completion_day_uses_reference_zone() {
    // 22:00 UTC on the 9th is already the 10th at +05:00.
    let zone = FixedOffset::east_opt(5 * 3600).unwrap();
    let now = zone.with_ymd_and_hms(2024, 1, 10, 1, 0, 0).unwrap();
    let buckets = group(&[completed(1, "2024-01-09T22:00")], View::Completed, &now);

    assert_eq!(titles(&buckets), vec!["Today's completed"]);
}

#[test]
fn test_older_completed_excludes_today_and_yesterday() {
    let now = at("2024-01-10T15:00");
    let tasks = vec![
        completed(1, "2024-01-10T09:00"),
        completed(2, "2024-01-09T09:00"),
        completed(3, "2024-01-08T23:00"),
        pending(4, Some("2024-01-01T09:00")),
    ];
    let older = older_completed(&tasks, &now);

    assert_eq!(older.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3]);
}

#[test]
fn test_classify_reports_sort_value_of_due_day() {
    let now = at("2024-01-10T15:00");
    let reference = ReferenceDay::new(&now);
    let a = classify(&pending(1, Some("2024-01-11T10:00")), &reference, UndatedPolicy::NoDate).unwrap();
    let b = classify(&pending(2, Some("2024-01-12T10:00")), &reference, UndatedPolicy::NoDate).unwrap();

    assert_eq!(a.title, "Tomorrow");
    assert_eq!(b.sort_value - a.sort_value, 1);
    assert_eq!(reference.tomorrow(), NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
}
