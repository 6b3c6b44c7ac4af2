//! Display formatting for currency amounts and calendar dates.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::{
    Date, OffsetDateTime,
    format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::Error;

/// The canonical date form used for storage and API payloads, e.g. "2026-08-24".
const CANONICAL_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]");

/// The date form shown to users, e.g. "24/08/2026".
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day]/[month]/[year]");

/// Format a monetary amount as a display string, e.g. "$1,234.50".
pub fn currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// Format a date for display, e.g. "24/08/2026".
pub fn display_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Format a date in the canonical `YYYY-MM-DD` form.
pub fn canonical_date(date: Date) -> String {
    date.format(CANONICAL_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parse a date from the canonical `YYYY-MM-DD` form.
///
/// # Errors
/// Returns an [Error::InvalidDate] if `text` is not a valid calendar date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, CANONICAL_DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// The current date (UTC) in canonical form.
pub fn current_date() -> Date {
    OffsetDateTime::now_utc().date()
}


#[cfg(test)]
mod date_tests {
    use time::macros::date;

    use crate::Error;

    use super::{canonical_date, current_date, display_date, parse_date};

    #[test]
    fn display_date_uses_day_month_year() {
        assert_eq!(display_date(date!(2026 - 08 - 24)), "24/08/2026");
        assert_eq!(display_date(date!(2026 - 01 - 05)), "05/01/2026");
    }

    #[test]
    fn canonical_date_round_trips_through_parse() {
        let date = date!(2025 - 12 - 31);

        let text = canonical_date(date);

        assert_eq!(text, "2025-12-31");
        assert_eq!(parse_date(&text), Ok(date));
    }

    #[test]
    fn current_date_is_a_valid_canonical_date() {
        let today = current_date();

        assert_eq!(parse_date(&canonical_date(today)), Ok(today));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        for text in ["", "24/08/2026", "2026-13-01", "yesterday"] {
            assert_eq!(
                parse_date(text),
                Err(Error::InvalidDate(text.to_owned())),
                "expected {text:?} to be rejected"
            );
        }
    }
}
