//! `YYYY-MM-DD` calendar dates as they appear in scripts, filters and JSON output.

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Calendar date layout used on every wire surface.
pub const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(pub iso_date, Date, ISO_DATE);

/// Parse a `YYYY-MM-DD` date, ignoring surrounding whitespace.
///
/// # Errors
/// Returns an error if the string is not a calendar date in that form.
pub fn parse_iso_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw.trim(), ISO_DATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use time::macros::date;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Due {
        #[serde(default, with = "iso_date::option")]
        due: Option<Date>,
    }

    #[test]
    fn parse_trims_and_rejects_other_layouts() {
        assert_eq!(parse_iso_date(" 2025-02-14\n").ok(), Some(date!(2025 - 02 - 14)));
        assert!(parse_iso_date("14/02/2025").is_err());
        assert!(parse_iso_date("2025-02-30").is_err());
    }

    #[test]
    fn optional_dates_use_iso_layout_and_default_to_none() {
        let due = Due {
            due: Some(date!(2025 - 03 - 01)),
        };
        let json = serde_json::to_string(&due).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(json, r#"{"due":"2025-03-01"}"#);

        let missing: Due = serde_json::from_str("{}").unwrap_or_else(|err| panic!("missing: {err}"));
        assert_eq!(missing, Due { due: None });
    }
}
