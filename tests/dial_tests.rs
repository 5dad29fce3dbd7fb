use taskday::clock::{ClockTime, Period};
use taskday::dial::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_hand_angle_hours() {
    let twelve = ClockTime::new(12, 0, Period::Am).unwrap();
    let three = ClockTime::new(3, 0, Period::Pm).unwrap();
    let eleven = ClockTime::new(11, 0, Period::Am).unwrap();

    assert_eq!(hand_angle(DialMode::Hours, &twelve), 0.0);
    assert_eq!(hand_angle(DialMode::Hours, &three), 90.0);
    assert_eq!(hand_angle(DialMode::Hours, &eleven), 330.0);
}

#[test]
fn test_hand_angle_minutes() {
    let t = ClockTime::new(4, 7, Period::Am).unwrap();
    assert_eq!(hand_angle(DialMode::Minutes, &t), 42.0);
    let t = ClockTime::new(4, 45, Period::Am).unwrap();
    assert_eq!(hand_angle(DialMode::Minutes, &t), 270.0);
}

#[test]
fn test_marks_sit_at_clock_positions() {
    let marks = dial_marks(DialMode::Hours, 90.0);
    assert_eq!(marks.len(), 12);

    let three = &marks[2];
    assert_eq!(three.slot, 3);
    assert!(close(three.x, 90.0) && close(three.y, 0.0));

    let six = &marks[5];
    assert!(close(six.x, 0.0) && close(six.y, 90.0));

    let twelve = &marks[11];
    assert_eq!(twelve.label, "12");
    assert!(close(twelve.x, 0.0) && close(twelve.y, -90.0));
}

#[test]
fn test_minute_marks_show_five_minute_steps() {
    let marks = dial_marks(DialMode::Minutes, 50.0);
    let values: Vec<u8> = marks.iter().map(|m| m.value).collect();
    assert_eq!(values, vec![5, 10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 0]);
    assert_eq!(marks[0].label, "05");
    assert_eq!(marks[11].label, "00");

    // Same angular slots as the hour face.
    let hours = dial_marks(DialMode::Hours, 50.0);
    for (m, h) in marks.iter().zip(hours.iter()) {
        assert!(close(m.x, h.x) && close(m.y, h.y));
    }
}

#[test]
fn test_hand_tip_matches_mark_for_selected_hour() {
    let t = ClockTime::new(8, 0, Period::Pm).unwrap();
    let (x, y) = polar_offset(hand_angle(DialMode::Hours, &t), 90.0);
    let mark = &dial_marks(DialMode::Hours, 90.0)[7];
    assert!(close(x, mark.x) && close(y, mark.y));
    assert!(is_selected(mark, DialMode::Hours, &t));
}

#[test]
fn test_selection_in_minute_mode() {
    let t = ClockTime::new(1, 0, Period::Am).unwrap();
    let marks = dial_marks(DialMode::Minutes, 90.0);
    let selected: Vec<u8> = marks
        .iter()
        .filter(|m| is_selected(m, DialMode::Minutes, &t))
        .map(|m| m.slot)
        .collect();
    assert_eq!(selected, vec![12]);
}

#[test]
fn test_step_slot_wraps_around() {
    assert_eq!(step_slot(12, 1), 1);
    assert_eq!(step_slot(1, -1), 12);
    assert_eq!(step_slot(6, 3), 9);
    assert_eq!(step_slot(3, -27), 12);
}

#[test]
fn test_current_slot() {
    let t = ClockTime::new(12, 7, Period::Pm).unwrap();
    assert_eq!(current_slot(DialMode::Hours, &t), 12);
    assert_eq!(current_slot(DialMode::Minutes, &t), 1);
    let t = ClockTime::new(2, 3, Period::Pm).unwrap();
    assert_eq!(current_slot(DialMode::Minutes, &t), 12);
}
