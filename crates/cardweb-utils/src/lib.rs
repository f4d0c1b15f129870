//! Utility functions and helpers

use chrono::{DateTime, SecondsFormat, Utc};

/// Escape text for use inside HTML element content or quoted attributes.
///
/// Every server-supplied field goes through here before it reaches markup.
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Attachment filename for a statement export, e.g. `transactions_2024-05-01T10:00:00.000Z.csv`
pub fn download_filename(prefix: &str, extension: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("**** 1234"), "**** 1234");
        assert_eq!(
            escape_html("<img src=x onerror='alert(1)'>"),
            "&lt;img src=x onerror=&#x27;alert(1)&#x27;&gt;"
        );
        assert_eq!(escape_html("a & \"b\""), "a &amp; &quot;b&quot;");
    }

    #[test]
    fn test_download_filename() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(
            download_filename("transactions", "csv", at),
            "transactions_2024-05-01T10:00:00.000Z.csv"
        );
    }
}
