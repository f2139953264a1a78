//! Utility functions for text cleanup, timestamps and file system checks.
//!
//! - Markup stripping and whitespace collapsing shared by the feed and the
//!   dialogue repair pass
//! - String truncation for log previews
//! - São Paulo local time and its Portuguese rendering
//! - File system validation for the output directory

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc, Weekday};
use itertools::Itertools;
use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// America/Sao_Paulo has been UTC-3 all year since daylight saving ended in 2019.
const SAO_PAULO_OFFSET_SECS: i32 = 3 * 3600;

/// Collapse every whitespace run (including non-breaking spaces) into one
/// space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Strip HTML markup, keeping text nodes separated by single spaces.
///
/// Entities such as `&nbsp;` and `&amp;` are decoded by the HTML parser.
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().join(" ");
    collapse_whitespace(&text)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max)
        .last()
        .unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Current time in São Paulo.
pub fn sao_paulo_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::west_opt(SAO_PAULO_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset)
}

fn dia_da_semana(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Segunda-feira",
        Weekday::Tue => "Terça-feira",
        Weekday::Wed => "Quarta-feira",
        Weekday::Thu => "Quinta-feira",
        Weekday::Fri => "Sexta-feira",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

/// Render a timestamp as `Segunda-feira, 19/10/2026, 14:05`.
pub fn format_data_hora(dt: &DateTime<FixedOffset>) -> String {
    format!(
        "{}, {}",
        dia_da_semana(dt.weekday()),
        dt.format("%d/%m/%Y, %H:%M")
    )
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a scratch file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let scratch_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    match stdfs::File::create(&scratch_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&scratch_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b\u{a0}\u{a0}c  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_strip_markup_google_news_snippet() {
        let html = r##"<a href="https://news.google.com/x" target="_blank">Empresa anuncia resultado</a>&nbsp;&nbsp;<font color="#6f6f6f">G1</font>"##;
        assert_eq!(strip_markup(html), "Empresa anuncia resultado G1");
    }

    #[test]
    fn test_strip_markup_plain_text() {
        assert_eq!(strip_markup("sem marcação alguma"), "sem marcação alguma");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Olá, mundo!", 100), "Olá, mundo!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        // "ç" is two bytes; cutting at byte 2 would split it
        let result = truncate_for_log("açúcar e café", 2);
        assert!(result.starts_with('a'));
        assert!(!result.starts_with("aç"));
    }

    #[test]
    fn test_format_data_hora() {
        let offset = FixedOffset::west_opt(SAO_PAULO_OFFSET_SECS).unwrap();
        let dt = offset.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap();
        assert_eq!(format_data_hora(&dt), "Segunda-feira, 19/10/2026, 14:05");

        let sunday = offset.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        assert_eq!(format_data_hora(&sunday), "Domingo, 18/10/2026, 09:00");
    }

    #[test]
    fn test_sao_paulo_now_offset() {
        assert_eq!(sao_paulo_now().offset().local_minus_utc(), -SAO_PAULO_OFFSET_SECS);
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("edicoes");
        ensure_writable_dir(dir.to_str().unwrap()).await.unwrap();
        assert!(dir.is_dir());
    }
}
