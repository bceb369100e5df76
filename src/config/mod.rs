use crate::util::parse_bool_flag;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "keycalc=warn";
const DEFAULT_DISPLAY_WIDTH: usize = 24;
const MIN_DISPLAY_WIDTH: usize = 16;
const MAX_DISPLAY_WIDTH: usize = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors_enabled: bool,
    pub mouse_enabled: bool,
    /// Force the line-oriented frontend even on a terminal.
    pub plain: bool,
    /// Column width the plain frontend right-aligns to.
    pub display_width: usize,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colors_enabled: true,
            mouse_enabled: true,
            plain: false,
            display_width: DEFAULT_DISPLAY_WIDTH,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Defaults, then the JSON file named by `KEYCALC_CONFIG`, then
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os("KEYCALC_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok(), std::io::stdout().is_terminal());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Applies `KEYCALC_*` and `NO_COLOR` overrides read through `lookup`.
    /// Unparsable values are ignored. Colors stay on for a redirected stdout
    /// only when `KEYCALC_FORCE_COLOR` is set.
    pub fn apply_env<F>(&mut self, lookup: F, stdout_is_terminal: bool)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(filter) = lookup("KEYCALC_LOG") {
            self.log_filter = filter;
        }
        if let Some(path) = lookup("KEYCALC_LOG_FILE") {
            self.log_file = Some(PathBuf::from(path));
        }
        if let Some(mouse) = lookup("KEYCALC_MOUSE").and_then(parse_bool_flag) {
            self.mouse_enabled = mouse;
        }
        if let Some(plain) = lookup("KEYCALC_PLAIN").and_then(parse_bool_flag) {
            self.plain = plain;
        }
        if let Some(width) = lookup("KEYCALC_WIDTH").and_then(|v| v.trim().parse().ok()) {
            self.display_width = width;
        }

        let forced_color = lookup("KEYCALC_FORCE_COLOR")
            .and_then(parse_bool_flag)
            .unwrap_or(false);
        if forced_color {
            self.colors_enabled = true;
        } else if lookup("NO_COLOR").is_some() || !stdout_is_terminal {
            self.colors_enabled = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(e) = EnvFilter::try_new(&self.log_filter) {
            bail!("Invalid log filter '{}': {e}", self.log_filter);
        }

        if !(MIN_DISPLAY_WIDTH..=MAX_DISPLAY_WIDTH).contains(&self.display_width) {
            bail!(
                "Invalid display width {}. Expected a value between {MIN_DISPLAY_WIDTH} and {MAX_DISPLAY_WIDTH}",
                self.display_width
            );
        }

        Ok(())
    }

    /// Where the keypad frontend writes its log.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("keycalc.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().expect("defaults validate");
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_env(lookup_from(&[
            ("KEYCALC_LOG", "keycalc=debug"),
            ("KEYCALC_LOG_FILE", "/tmp/calc.log"),
            ("KEYCALC_MOUSE", "off"),
            ("KEYCALC_PLAIN", "1"),
            ("KEYCALC_WIDTH", "40"),
            ("NO_COLOR", ""),
        ]), true);

        assert_eq!(config.log_filter, "keycalc=debug");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/calc.log"));
        assert!(!config.mouse_enabled);
        assert!(config.plain);
        assert_eq!(config.display_width, 40);
        assert!(!config.colors_enabled);
    }

    #[test]
    fn test_force_color_beats_no_color() {
        let mut config = Config::default();
        config.apply_env(lookup_from(&[("NO_COLOR", "1"), ("KEYCALC_FORCE_COLOR", "yes")]), true);
        assert!(config.colors_enabled);

        let mut redirected = Config::default();
        redirected.apply_env(lookup_from(&[("KEYCALC_FORCE_COLOR", "1")]), false);
        assert!(redirected.colors_enabled);
    }

    #[test]
    fn test_redirected_stdout_disables_color() {
        let mut config = Config::default();
        config.apply_env(lookup_from(&[]), false);
        assert!(!config.colors_enabled);

        let mut tty = Config::default();
        tty.apply_env(lookup_from(&[]), true);
        assert!(tty.colors_enabled);
    }

    #[test]
    fn test_unparsable_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(lookup_from(&[("KEYCALC_WIDTH", "wide"), ("KEYCALC_PLAIN", "maybe")]), true);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_width_out_of_range() {
        let config = Config {
            display_width: 8,
            ..Config::default()
        };
        let err = config.validate().expect_err("too narrow");
        assert!(err.to_string().contains("Invalid display width 8"));
    }
}
