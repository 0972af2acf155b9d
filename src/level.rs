use std::fmt;

/// Severity tag written between brackets in every log entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
    Debug,
    Fatal,
    /// Any caller-supplied tag, written verbatim
    Custom(String),
}

impl Level {
    pub fn as_str(&self) -> &str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Debug => "DEBUG",
            Level::Fatal => "FATAL",
            Level::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Level {
    fn from(tag: &str) -> Self {
        match tag {
            "INFO" => Level::Info,
            "WARNING" => Level::Warning,
            "ERROR" => Level::Error,
            "DEBUG" => Level::Debug,
            "FATAL" => Level::Fatal,
            other => Level::Custom(other.to_string()),
        }
    }
}

impl From<String> for Level {
    fn from(tag: String) -> Self {
        match Level::from(tag.as_str()) {
            Level::Custom(_) => Level::Custom(tag),
            known => known,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_map_to_variants() {
        assert_eq!(Level::from("INFO"), Level::Info);
        assert_eq!(Level::from("WARNING"), Level::Warning);
        assert_eq!(Level::from("FATAL"), Level::Fatal);
        assert_eq!(Level::Debug.to_string(), "DEBUG");
    }

    #[test]
    fn test_custom_tag_is_kept_verbatim() {
        let level = Level::from("audit");
        assert_eq!(level, Level::Custom("audit".to_string()));
        assert_eq!(level.to_string(), "audit");

        // Matching is case-sensitive, as with any other caller tag
        assert_eq!(Level::from("info"), Level::Custom("info".to_string()));
    }
}
