use chrono::{DateTime, NaiveDate, Utc};

/// Tooltip date label, e.g. `Oct 12, '21`, in UTC.
pub fn format_tooltip_date(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format("%b %d, '%y").to_string(),
        None => String::new(),
    }
}

/// Current UTC calendar day. Time-series ranges end here.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_date_uses_utc_components() {
        // 2021-10-12T23:30:00Z
        assert_eq!(format_tooltip_date(1_634_081_400_000), "Oct 12, '21");
        assert_eq!(format_tooltip_date(0), "Jan 01, '70");
    }

    #[test]
    fn out_of_range_timestamp_is_blank() {
        assert_eq!(format_tooltip_date(i64::MAX), "");
    }
}
