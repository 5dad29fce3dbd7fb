use chrono::NaiveTime;
use taskday::clock::*;

#[test]
fn test_decode_midnight_and_afternoon() {
    let midnight = decode("00:00").unwrap().unwrap();
    assert_eq!((midnight.hour12(), midnight.minute(), midnight.period()), (12, 0, Period::Am));

    let afternoon = decode("13:05").unwrap().unwrap();
    assert_eq!((afternoon.hour12(), afternoon.minute(), afternoon.period()), (1, 5, Period::Pm));

    let noon = decode("12:00").unwrap().unwrap();
    assert_eq!((noon.hour12(), noon.period()), (12, Period::Pm));

    let morning = decode("11:59").unwrap().unwrap();
    assert_eq!((morning.hour12(), morning.period()), (11, Period::Am));
}

#[test]
fn test_every_24_hour_string_round_trips() {
    for h in 0..24 {
        for m in 0..60 {
            let s = format!("{:02}:{:02}", h, m);
            let decoded = decode(&s).unwrap().unwrap();
            assert_eq!(encode(&decoded), s);
        }
    }
}

#[test]
fn test_every_12_hour_selection_round_trips() {
    for period in [Period::Am, Period::Pm] {
        for h in 1..=12 {
            for m in 0..60 {
                let t = ClockTime::new(h, m, period).unwrap();
                assert_eq!(decode(&encode(&t)).unwrap(), Some(t));
            }
        }
    }
}

#[test]
fn test_encode_pads_and_shifts() {
    assert_eq!(encode(&ClockTime::new(12, 0, Period::Am).unwrap()), "00:00");
    assert_eq!(encode(&ClockTime::new(12, 30, Period::Pm).unwrap()), "12:30");
    assert_eq!(encode(&ClockTime::new(3, 5, Period::Pm).unwrap()), "15:05");
    assert_eq!(encode(&ClockTime::new(9, 7, Period::Am).unwrap()), "09:07");
}

#[test]
fn test_empty_input_means_no_time() {
    assert_eq!(decode(""), Ok(None));
    assert_eq!(decode("   "), Ok(None));
}

#[test]
fn test_malformed_input_is_an_error() {
    for bad in ["24:00", "7:30", "07:3", "07-30", "ab:cd", "07:60", "0730", "+1:00"] {
        assert!(decode(bad).is_err(), "{} should not decode", bad);
    }
    assert_eq!(decode("24:00"), Err(TimeFormatError::HourOutOfRange(24)));
    assert_eq!(decode("07:60"), Err(TimeFormatError::MinuteOutOfRange(60)));
}

#[test]
fn test_new_rejects_out_of_range_values() {
    assert_eq!(ClockTime::new(0, 0, Period::Am), Err(TimeFormatError::HourOutOfRange(0)));
    assert_eq!(ClockTime::new(13, 0, Period::Pm), Err(TimeFormatError::HourOutOfRange(13)));
    assert_eq!(ClockTime::new(5, 60, Period::Pm), Err(TimeFormatError::MinuteOutOfRange(60)));
}

#[test]
fn test_display_and_parse_12_hour_text() {
    let t = ClockTime::new(3, 5, Period::Pm).unwrap();
    assert_eq!(t.to_string(), "3:05 PM");
    assert_eq!("3:05 PM".parse::<ClockTime>(), Ok(t));
    assert_eq!("3:05pm".parse::<ClockTime>(), Ok(t));
    assert_eq!("12:00 am".parse::<ClockTime>(), Ok(ClockTime::midnight()));
    assert!("15:05 PM".parse::<ClockTime>().is_err());
    assert!("3:05".parse::<ClockTime>().is_err());
}

#[test]
fn test_parse_user_time_accepts_both_forms() {
    let expected = ClockTime::new(9, 30, Period::Pm).unwrap();
    assert_eq!(parse_user_time("21:30"), Ok(Some(expected)));
    assert_eq!(parse_user_time("9:30 PM"), Ok(Some(expected)));
    assert_eq!(parse_user_time(""), Ok(None));
    assert!(parse_user_time("half past nine").is_err());
}

#[test]
fn test_naive_time_conversion() {
    let t = ClockTime::new(12, 45, Period::Am).unwrap();
    assert_eq!(t.to_naive_time(), NaiveTime::from_hms_opt(0, 45, 0).unwrap());
    assert_eq!(ClockTime::from_naive_time(NaiveTime::from_hms_opt(23, 15, 0).unwrap()).to_string(), "11:15 PM");
}

#[test]
fn test_period_toggle_keeps_clock_reading() {
    let t = ClockTime::new(7, 15, Period::Am).unwrap();
    let flipped = t.with_period(t.period().toggled());
    assert_eq!(encode(&flipped), "19:15");
}
