//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Bird registration, lineage and pedigree commands
pub mod bird;

/// Seasons, couples, eggs and locations
pub mod breeding;

/// Breeders and color property catalog commands
pub mod catalog;

/// General utility commands
pub mod general;

/// Spreadsheet import and CSV export
pub mod transfer;

use crate::{
    bot::BotData,
    errors::{Error, Result},
};
use chrono::NaiveDate;

// Export commands
pub use bird::*;
pub use breeding::*;
pub use catalog::*;
pub use general::*;
pub use transfer::*;

/// Every command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        bird(),
        pedigree(),
        color_property(),
        breeder(),
        season(),
        couple(),
        eggs(),
        location(),
        import(),
        export(),
    ]
}

/// Discord refuses messages longer than 2000 characters.
const MESSAGE_LIMIT: usize = 1900;

/// Parses a date typed as `dd-mm-yyyy` or `yyyy-mm-dd`.
pub(crate) fn parse_date(field: &str, text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .map_err(|_| Error::InvalidValue {
            field: field.to_string(),
            value: text.to_string(),
        })
}

/// Parses an optional date argument.
pub(crate) fn parse_optional_date(field: &str, text: Option<&str>) -> Result<Option<NaiveDate>> {
    text.map(|t| parse_date(field, t)).transpose()
}

/// Formats an optional date the way users type them.
pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%d-%m-%Y").to_string())
}

/// Splits a list typed as `a, b c` into its items.
pub(crate) fn split_list(text: &str) -> Vec<&str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Joins `header` and as many `lines` as fit in one message, noting how
/// many were left out.
pub(crate) fn fit_message(header: &str, lines: &[String]) -> String {
    let mut message = header.to_string();
    for (shown, line) in lines.iter().enumerate() {
        if message.len() + line.len() + 1 > MESSAGE_LIMIT {
            message.push_str(&format!("… and {} more", lines.len() - shown));
            return message;
        }
        message.push_str(line);
        message.push('\n');
    }
    message
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 4, 21).unwrap();
        assert_eq!(parse_date("born", "21-04-2021").unwrap(), expected);
        assert_eq!(parse_date("born", " 2021-04-21 ").unwrap(), expected);
        assert!(matches!(
            parse_date("born", "yesterday").unwrap_err(),
            Error::InvalidValue { .. }
        ));
        assert_eq!(parse_optional_date("born", None).unwrap(), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("A-1, A-2 A-3,,"), vec!["A-1", "A-2", "A-3"]);
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_fit_message_truncates() {
        let lines: Vec<String> = (0..500).map(|i| format!("line number {i}")).collect();
        let message = fit_message("header\n", &lines);
        assert!(message.len() <= MESSAGE_LIMIT + 20);
        assert!(message.ends_with("more"));

        let short = fit_message("h\n", &["a".to_string()]);
        assert_eq!(short, "h\na\n");
    }
}
