use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClockTimeError {
    #[error("expected HH:MM:SS, got {0:?}")]
    Format(String),
}

/// Parse a remote clock reading (`HH:MM:SS`) into whole seconds.
///
/// A leading `-` yields a negative value; ProPresenter reports one while a
/// timer with `allows_overrun` runs past zero.
pub fn parse_clock_time(raw: &str) -> Result<i64, ClockTimeError> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let parts: Vec<&str> = digits.split(':').collect();
    if parts.len() != 3 {
        return Err(ClockTimeError::Format(raw.to_string()));
    }

    let mut total: i64 = 0;
    for part in parts {
        let value: i64 = part
            .parse()
            .map_err(|_| ClockTimeError::Format(raw.to_string()))?;
        total = total * 60 + value;
    }

    Ok(if negative { -total } else { total })
}

/// Format whole seconds as a zero-padded `HH:MM:SS` string, sign preserved.
pub fn format_clock_time(total_seconds: i64) -> String {
    let sign = if total_seconds < 0 { "-" } else { "" };
    let secs = total_seconds.unsigned_abs();
    format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_reading() {
        assert_eq!(parse_clock_time("00:05:00"), Ok(300));
        assert_eq!(parse_clock_time("01:01:01"), Ok(3661));
    }

    #[test]
    fn parses_overrun_reading_as_negative() {
        assert_eq!(parse_clock_time("-00:00:45"), Ok(-45));
        assert_eq!(parse_clock_time("-01:00:00"), Ok(-3600));
    }

    #[test]
    fn rejects_malformed_readings() {
        assert!(parse_clock_time("05:00").is_err());
        assert!(parse_clock_time("aa:bb:cc").is_err());
        assert!(parse_clock_time("").is_err());
    }

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_clock_time(300), "00:05:00");
        assert_eq!(format_clock_time(3661), "01:01:01");
        assert_eq!(format_clock_time(0), "00:00:00");
    }

    #[test]
    fn formats_overrun_with_sign() {
        assert_eq!(format_clock_time(-45), "-00:00:45");
    }
}
