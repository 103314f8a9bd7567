//! Index-name resolver tests

use chrono::{TimeZone, Utc};

use super::index_name::resolve;

#[test]
fn test_daily_rolling_pattern() {
    let at = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
    assert_eq!(resolve("fluentd-{YYYY}.{MM}.{DD}", at), "fluentd-2024.03.07");
}

#[test]
fn test_all_padded_tokens() {
    let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
    assert_eq!(
        resolve("{YYYY}-{MM}-{DD} {hh}:{mm}:{ss}", at),
        "2024-03-07 09:05:02"
    );
}

#[test]
fn test_unpadded_tokens() {
    let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
    assert_eq!(resolve("{YY}/{M}/{D} {h}:{m}:{s}", at), "24/3/7 9:5:2");
}

#[test]
fn test_twelve_hour_clock() {
    let afternoon = Utc.with_ymd_and_hms(2024, 3, 7, 15, 0, 0).unwrap();
    assert_eq!(resolve("{hh}|{h}", afternoon), "15|3");

    let midnight = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
    assert_eq!(resolve("{hh}|{h}", midnight), "00|12");
}

#[test]
fn test_no_tokens_passes_through() {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(resolve("static-index", at), "static-index");
}

#[test]
fn test_no_placeholder_tokens_remain() {
    let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
    let resolved = resolve("a{YYYY}b{YY}c{MM}d{M}e{DD}f{D}g{hh}h{h}i{mm}j{m}k{ss}l{s}", at);
    assert!(!resolved.contains('{'), "unresolved token in {resolved}");
    assert!(!resolved.contains('}'), "unresolved token in {resolved}");
}

#[test]
fn test_repeated_tokens() {
    let at = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
    assert_eq!(resolve("{MM}{MM}", at), "0303");
}
