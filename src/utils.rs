use chrono::{DateTime, TimeZone};
use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("static pattern is valid"));

/// Convert a keyword into something safe to embed in a filename
///
/// Every character other than an ASCII letter or digit becomes `_`.
pub fn sanitize_keyword(keyword: &str) -> String {
    let name = NON_ALPHANUMERIC.replace_all(keyword, "_").into_owned();

    // Limit filename length
    if name.len() > 100 {
        name[..100].to_string()
    } else {
        name
    }
}

/// Name of the results file for `keyword`, stamped to the minute
pub fn results_filename<Tz>(keyword: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}_{}.csv",
        sanitize_keyword(keyword),
        at.format("%Y-%m-%d_%H-%M")
    )
}
