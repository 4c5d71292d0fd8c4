use chrono::{FixedOffset, NaiveDate, Timelike};

use super::*;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

#[test]
fn parses_hh_mm() {
    let t = DailyTrigger::parse("07:30").unwrap();
    assert_eq!((t.time().hour(), t.time().minute()), (7, 30));
    assert_eq!(t.to_string(), "07:30");
    assert_eq!(DailyTrigger::parse(" 23:59 ").unwrap().to_string(), "23:59");
}

#[test]
fn rejects_malformed_times() {
    for bad in ["24:00", "7.30", "07:60", "", "07:30:00", "noon"] {
        assert!(
            matches!(DailyTrigger::parse(bad), Err(DaybreakError::Config(_))),
            "{bad:?}"
        );
    }
}

#[test]
fn fires_today_when_time_is_ahead() {
    let t = DailyTrigger::parse("07:30").unwrap();
    assert_eq!(
        t.next_fire_after(at(2026, 3, 1, 6, 0, 0)),
        at(2026, 3, 1, 7, 30, 0)
    );
}

#[test]
fn fires_tomorrow_when_time_has_passed_or_is_now() {
    let t = DailyTrigger::parse("07:30").unwrap();
    assert_eq!(
        t.next_fire_after(at(2026, 3, 1, 7, 30, 0)),
        at(2026, 3, 2, 7, 30, 0)
    );
    assert_eq!(
        t.next_fire_after(at(2026, 3, 1, 22, 0, 0)),
        at(2026, 3, 2, 7, 30, 0)
    );
}

#[test]
fn month_and_year_rollover() {
    let t = DailyTrigger::parse("00:05").unwrap();
    assert_eq!(
        t.next_fire_after(at(2026, 12, 31, 23, 59, 0)),
        at(2027, 1, 1, 0, 5, 0)
    );
}

#[test]
fn consecutive_fires_are_one_day_apart() {
    let t = DailyTrigger::parse("07:30").unwrap();
    let first = t.next_fire_after(at(2026, 5, 10, 12, 0, 0));
    let second = t.next_fire_after(first);
    assert_eq!(second - first, TimeDelta::days(1));
}

#[test]
fn fixed_offset_resolution_is_direct() {
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let naive = at(2026, 6, 1, 7, 30, 0);
    let resolved = resolve_local(&tz, naive);
    assert_eq!(resolved.naive_local(), naive);
}

#[test]
fn next_local_fire_is_in_the_future() {
    let t = DailyTrigger::parse("12:00").unwrap();
    let now = Local::now();
    let fire = t.next_local_fire(now);
    assert!(fire > now);
    assert!(fire - now <= TimeDelta::days(1) + TimeDelta::hours(2));
}
