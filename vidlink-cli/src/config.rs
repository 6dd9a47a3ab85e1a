//! Configuration for the vidlink CLI.
//!
//! Defaults are overridden by `VIDLINK_*` environment variables, which are
//! in turn overridden by command-line flags.

use std::path::PathBuf;

use vidlink_core::tracing_setup::CliLogLevel;

/// Central configuration for the CLI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliConfig {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// How summaries are printed.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            pretty: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggingConfig {
    /// Console verbosity
    pub level: CliLogLevel,
    /// Directory for the per-run debug log (None = `./logs`)
    pub logs_dir: Option<PathBuf>,
}

/// Output rendering for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned `key: value` lines
    Text,
    /// A single JSON object
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid output format: '{s}'. Valid options are: text, json"
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl CliConfig {
    /// Creates configuration with environment variable overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source.
    ///
    /// Values that fail to parse are ignored and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(format) = lookup("VIDLINK_OUTPUT")
            && let Ok(format) = format.parse()
        {
            config.output.format = format;
        }

        if let Some(pretty) = lookup("VIDLINK_PRETTY")
            && let Ok(pretty) = pretty.parse()
        {
            config.output.pretty = pretty;
        }

        if let Some(level) = lookup("VIDLINK_LOG_LEVEL")
            && let Ok(level) = level.parse()
        {
            config.logging.level = level;
        }

        if let Some(dir) = lookup("VIDLINK_LOG_DIR")
            && !dir.is_empty()
        {
            config.logging.logs_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Applies command-line flags on top of the current values.
    pub fn with_overrides(
        mut self,
        format: Option<OutputFormat>,
        level: Option<CliLogLevel>,
        logs_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(format) = format {
            self.output.format = format;
        }
        if let Some(level) = level {
            self.logging.level = level;
        }
        if logs_dir.is_some() {
            self.logging.logs_dir = logs_dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = CliConfig::from_lookup(|_| None);
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.logging.level, CliLogLevel::Warn);
    }

    #[test]
    fn test_environment_overrides() {
        let config = CliConfig::from_lookup(lookup_from(&[
            ("VIDLINK_OUTPUT", "JSON"),
            ("VIDLINK_PRETTY", "false"),
            ("VIDLINK_LOG_LEVEL", "debug"),
            ("VIDLINK_LOG_DIR", "/tmp/vidlink-logs"),
        ]));

        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.pretty);
        assert_eq!(config.logging.level, CliLogLevel::Debug);
        assert_eq!(config.logging.logs_dir, Some(PathBuf::from("/tmp/vidlink-logs")));
    }

    #[test]
    fn test_invalid_environment_values_are_ignored() {
        let config = CliConfig::from_lookup(lookup_from(&[
            ("VIDLINK_OUTPUT", "yaml"),
            ("VIDLINK_PRETTY", "sometimes"),
            ("VIDLINK_LOG_LEVEL", "loud"),
            ("VIDLINK_LOG_DIR", ""),
        ]));

        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_flags_win_over_environment() {
        let config = CliConfig::from_lookup(lookup_from(&[("VIDLINK_OUTPUT", "json")]))
            .with_overrides(Some(OutputFormat::Text), Some(CliLogLevel::Trace), None);

        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.logging.level, CliLogLevel::Trace);
        assert_eq!(config.logging.logs_dir, None);
    }
}
