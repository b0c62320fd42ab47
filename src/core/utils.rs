/// Formats a duration in seconds for the preview message.
///
/// `H:MM:SS` from one hour up, `M:SS` below it.
///
/// # Example
///
/// ```
/// use tubegrab::core::utils::format_duration;
///
/// assert_eq!(format_duration(59), "0:59");
/// assert_eq!(format_duration(3725), "1:02:05");
/// ```
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Formats file size into human-readable format (MB, KB or B)
pub fn format_file_size(size: u64) -> String {
    if size >= 1024 * 1024 {
        format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.1} KB", size as f64 / 1024.0)
    } else {
        format!("{} B", size)
    }
}

/// Escapes special characters for Telegram MarkdownV2.
///
/// Characters `_ * [ ] ( ) ~ ` > # + - = | { } . !` and the backslash itself
/// must be escaped. The backslash goes first so nothing is escaped twice.
///
/// # Example
///
/// ```
/// use tubegrab::core::utils::escape_markdown_v2;
///
/// let escaped = escape_markdown_v2("Hello. World!");
/// assert_eq!(escaped, "Hello\\. World\\!");
/// ```
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        match c {
            '\\' | '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|' | '{' | '}'
            | '.' | '!' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_duration_under_an_hour() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(5), "0:05");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3599), "59:59");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(3661), "1:01:01");
        assert_eq!(format_duration(36_000 + 59), "10:00:59");
    }

    #[test]
    fn test_format_duration_shape() {
        for d in [3600_u64, 4000, 7199, 86_399, 100_000] {
            let s = format_duration(d);
            let parts: Vec<&str> = s.split(':').collect();
            assert_eq!(parts.len(), 3, "{}", s);
            assert_eq!(parts[1].len(), 2);
            assert_eq!(parts[2].len(), 2);
        }
        for d in [0_u64, 9, 60, 599, 3599] {
            let s = format_duration(d);
            let parts: Vec<&str> = s.split(':').collect();
            assert_eq!(parts.len(), 2, "{}", s);
            assert_eq!(parts[1].len(), 2);
        }
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(30 * 1024 * 1024), "30.0 MB");
        assert_eq!(format_file_size(60 * 1024 * 1024 + 512 * 1024), "60.5 MB");
    }

    #[test]
    fn test_escape_markdown_v2() {
        assert_eq!(escape_markdown_v2("a_b*c"), "a\\_b\\*c");
        assert_eq!(escape_markdown_v2("(1.5)"), "\\(1\\.5\\)");
        assert_eq!(escape_markdown_v2("back\\slash"), "back\\\\slash");
        assert_eq!(escape_markdown_v2("plain"), "plain");
    }
}
