use std::path::PathBuf;

use regex::Regex;

/// Directory downloads go to until the user picks another one
pub fn default_output_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Last `ERROR:` line yt-dlp printed, without the prefix
pub fn last_error_line(stderr: &str) -> Option<String> {
    let re = Regex::new(r"(?m)^ERROR:\s*(.+?)\s*$").ok()?;
    re.captures_iter(stderr)
        .last()
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_directory() {
        assert_eq!(
            default_output_directory(),
            std::env::current_dir().unwrap()
        );
    }

    #[test]
    fn test_last_error_line() {
        let stderr = "WARNING: something odd\n\
                      ERROR: first failure\n\
                      ERROR: [youtube] abc: Video unavailable\r\n";
        assert_eq!(
            last_error_line(stderr).as_deref(),
            Some("[youtube] abc: Video unavailable")
        );
        assert_eq!(last_error_line("WARNING: only a warning"), None);
        assert_eq!(last_error_line(""), None);
    }
}
