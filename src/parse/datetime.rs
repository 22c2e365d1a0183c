use chrono::{DateTime, Local};

/// Reduce a date or datetime string to `YYYY-MM-DD`.
///
/// A bare date is returned unchanged — it is never routed through a
/// timezone-aware parse, which would shift it by a day for users west
/// of UTC. A timezone-qualified datetime converts to the local
/// wall-clock date. A timezone-naive datetime has its date component
/// read by substring. Malformed input degrades to best-effort
/// substring extraction; this never fails, because the document must
/// stay editable even with corrupt metadata.
pub fn to_date_only(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }
    if is_bare_date(input) {
        return input.to_string();
    }

    if let Some(t_pos) = input.find('T') {
        if has_timezone(&input[t_pos..])
            && let Ok(dt) = DateTime::parse_from_rfc3339(input)
        {
            return dt.with_timezone(&Local).format("%Y-%m-%d").to_string();
        }
        // Timezone-naive (or unparseable): the date component is the
        // literal prefix.
        let date_part = &input[..t_pos];
        if is_bare_date(date_part) {
            return date_part.to_string();
        }
    }

    // Best-effort: leading ten characters if they look like a date.
    if let Some(prefix) = input.get(..10)
        && is_bare_date(prefix)
    {
        return prefix.to_string();
    }
    input.to_string()
}

/// Reduce a datetime string to `HH:MM`, or `""` for date-only input.
/// Mirrors `to_date_only`: timezone-qualified input converts to local
/// wall-clock time, naive input is read by substring.
pub fn to_time_only(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() || is_bare_date(input) {
        return String::new();
    }

    if let Some(t_pos) = input.find('T') {
        if has_timezone(&input[t_pos..])
            && let Ok(dt) = DateTime::parse_from_rfc3339(input)
        {
            return dt.with_timezone(&Local).format("%H:%M").to_string();
        }
        if let Some(time) = input.get(t_pos + 1..t_pos + 6)
            && looks_like_time(time)
        {
            return time.to_string();
        }
    }
    String::new()
}

/// `YYYY-MM-DD`, checked by shape rather than parsed.
pub(crate) fn is_bare_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|&i| b[i].is_ascii_digit())
}

/// Whether the time portion (starting at `T`) carries a UTC or offset
/// suffix. Any `-` after the `T` can only be an offset sign.
fn has_timezone(time_part: &str) -> bool {
    time_part[1..].contains(['Z', 'z', '+', '-'])
}

fn looks_like_time(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 5
        && b[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| b[i].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bare_date_passes_through_unchanged() {
        // The regression this guards: a bare date reparsed through a
        // timezone-aware date object shifts by one day west of UTC.
        assert_eq!(to_date_only("2024-03-05"), "2024-03-05");
        assert_eq!(to_date_only("1999-12-31"), "1999-12-31");
    }

    #[test]
    fn test_naive_datetime_reads_date_by_substring() {
        assert_eq!(to_date_only("2024-03-05T23:30:00"), "2024-03-05");
        assert_eq!(to_time_only("2024-03-05T23:30:00"), "23:30");
    }

    #[test]
    fn test_timezone_qualified_converts_to_local() {
        let input = "2024-03-05T23:30:00-05:00";
        let expected = DateTime::parse_from_rfc3339(input)
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(to_date_only(input), expected.format("%Y-%m-%d").to_string());
        assert_eq!(to_time_only(input), expected.format("%H:%M").to_string());
    }

    #[test]
    fn test_utc_suffix_converts_to_local() {
        let input = "2024-06-01T00:15:00Z";
        let expected = chrono::Utc
            .with_ymd_and_hms(2024, 6, 1, 0, 15, 0)
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(to_date_only(input), expected.format("%Y-%m-%d").to_string());
    }

    #[test]
    fn test_time_only_empty_for_date_only() {
        assert_eq!(to_time_only("2024-03-05"), "");
        assert_eq!(to_time_only(""), "");
    }

    #[test]
    fn test_malformed_input_best_effort() {
        assert_eq!(to_date_only("2024-03-05 09:00"), "2024-03-05");
        assert_eq!(to_date_only("not a date"), "not a date");
        assert_eq!(to_date_only(""), "");
        assert_eq!(to_time_only("not a date"), "");
        // Truncated time part after T: no panic, no garbage.
        assert_eq!(to_time_only("2024-03-05T09"), "");
        assert_eq!(to_date_only("2024-03-05T09"), "2024-03-05");
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        assert_eq!(to_date_only("日付なし"), "日付なし");
        assert_eq!(to_time_only("日付なし"), "");
    }
}
