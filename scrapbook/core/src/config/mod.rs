//! TOML Configuration File Support
//!
//! Loads sequencer settings from `~/.config/scrapbook/sequencer.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables (`SCRAPBOOK_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # XDG Base Directory Compliance
//!
//! - `$XDG_CONFIG_HOME/scrapbook/sequencer.toml` (typically `~/.config/scrapbook/sequencer.toml`)
//!
//! # Example Configuration
//!
//! ```toml
//! [sequencer]
//! total_slides = 4
//! scroll_threshold = 50.0
//! min_swipe_distance = 50.0
//! transition_ms = 800
//! transition_easing = "power2.inOut"
//! animate = true
//! bottom_tolerance = 5.0
//!
//! [choreography]
//! suitcase_grace_ms = 1000
//! gallery_grace_ms = 200
//!
//! [intro]
//! camera_scroll_threshold = 50.0
//!
//! [clock]
//! frame_interval_ms = 16
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{EasingFunction, DEFAULT_FRAME_INTERVAL};
use crate::intro::IntroConfig;
use crate::sequencer::SequencerConfig;
use crate::slides::ChoreographyConfig;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[sequencer]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerToml {
    /// Number of slides
    pub total_slides: Option<usize>,

    /// Net wheel travel per step
    pub scroll_threshold: Option<f32>,

    /// Minimum swipe distance in pixels
    pub min_swipe_distance: Option<f32>,

    /// Track animation length in milliseconds
    pub transition_ms: Option<u64>,

    /// Track easing, in tweening-library notation (`power2.inOut`)
    pub transition_easing: Option<String>,

    /// Whether the track animates
    pub animate: Option<bool>,

    /// Bottom-edge slack for inner scroll regions
    pub bottom_tolerance: Option<f32>,
}

/// `[choreography]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographyToml {
    /// Pause before the suitcase entrance, milliseconds
    pub suitcase_grace_ms: Option<u64>,

    /// Pause before the gallery entrance, milliseconds
    pub gallery_grace_ms: Option<u64>,
}

/// `[intro]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroToml {
    /// Wheel travel that brings in the camera
    pub camera_scroll_threshold: Option<f32>,
}

/// `[clock]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockToml {
    /// Animator sampling interval in milliseconds
    pub frame_interval_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapbookToml {
    /// Sequencer section
    pub sequencer: SequencerToml,

    /// Choreography section
    pub choreography: ChoreographyToml,

    /// Intro section
    pub intro: IntroToml,

    /// Clock section
    pub clock: ClockToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved scrapbook configuration
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct ScrapbookConfigFile {
    /// Sequencer settings
    pub sequencer: SequencerConfig,

    /// Entrance choreography settings
    pub choreography: ChoreographyConfig,

    /// Intro settings
    pub intro: IntroConfig,

    /// Animator sampling interval
    pub frame_interval: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for ScrapbookConfigFile {
    fn default() -> Self {
        Self {
            sequencer: SequencerConfig::default(),
            choreography: ChoreographyConfig::default(),
            intro: IntroConfig::default(),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ScrapbookConfigFile {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check values the sequencer cannot work with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let seq = &self.sequencer;
        if seq.total_slides == 0 {
            return Err(ConfigError::ValidationError(
                "total_slides must be at least 1".to_string(),
            ));
        }
        if !(seq.scroll_threshold.is_finite() && seq.scroll_threshold > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "scroll_threshold must be positive, got {}",
                seq.scroll_threshold
            )));
        }
        if !(seq.min_swipe_distance.is_finite() && seq.min_swipe_distance >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "min_swipe_distance must not be negative, got {}",
                seq.min_swipe_distance
            )));
        }
        if !(seq.bottom_tolerance.is_finite() && seq.bottom_tolerance >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "bottom_tolerance must not be negative, got {}",
                seq.bottom_tolerance
            )));
        }
        if !(self.intro.camera_scroll_threshold.is_finite()
            && self.intro.camera_scroll_threshold > 0.0)
        {
            return Err(ConfigError::ValidationError(format!(
                "camera_scroll_threshold must be positive, got {}",
                self.intro.camera_scroll_threshold
            )));
        }
        if self.frame_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "frame_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/scrapbook/sequencer.toml` or
/// `~/.config/scrapbook/sequencer.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("scrapbook").join("sequencer.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the merged values fail validation. A missing config file is not an error.
pub fn load_config() -> Result<ScrapbookConfigFile, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the result fails validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ScrapbookConfigFile, ConfigError> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// Load configuration, reading environment variables through `env`
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ScrapbookConfigFile, ConfigError> {
    let mut config = ScrapbookConfigFile::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ScrapbookToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(
    config: &mut ScrapbookConfigFile,
    toml: &ScrapbookToml,
) -> Result<(), ConfigError> {
    let seq = &toml.sequencer;
    if let Some(total) = seq.total_slides {
        config.sequencer.total_slides = total;
    }
    if let Some(threshold) = seq.scroll_threshold {
        config.sequencer.scroll_threshold = threshold;
    }
    if let Some(distance) = seq.min_swipe_distance {
        config.sequencer.min_swipe_distance = distance;
    }
    if let Some(ms) = seq.transition_ms {
        config.sequencer.transition_duration = Duration::from_millis(ms);
    }
    if let Some(ref name) = seq.transition_easing {
        config.sequencer.transition_easing = parse_easing(name)?;
    }
    if let Some(animate) = seq.animate {
        config.sequencer.animate = animate;
    }
    if let Some(tolerance) = seq.bottom_tolerance {
        config.sequencer.bottom_tolerance = tolerance;
    }

    if let Some(ms) = toml.choreography.suitcase_grace_ms {
        config.choreography.suitcase_grace = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.choreography.gallery_grace_ms {
        config.choreography.gallery_grace = Duration::from_millis(ms);
    }

    if let Some(threshold) = toml.intro.camera_scroll_threshold {
        config.intro.camera_scroll_threshold = threshold;
    }

    if let Some(ms) = toml.clock.frame_interval_ms {
        config.frame_interval = Duration::from_millis(ms);
    }

    Ok(())
}

fn parse_easing(name: &str) -> Result<EasingFunction, ConfigError> {
    name.parse()
        .map_err(|e| ConfigError::ValidationError(format!("transition_easing: {e}")))
}

/// Apply environment variable overrides to the config
///
/// Unparseable values are ignored.
fn apply_env_config(config: &mut ScrapbookConfigFile, env: impl Fn(&str) -> Option<String>) {
    if let Some(total) = env("SCRAPBOOK_TOTAL_SLIDES") {
        if let Ok(n) = total.parse::<usize>() {
            config.sequencer.total_slides = n;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(threshold) = env("SCRAPBOOK_SCROLL_THRESHOLD") {
        if let Ok(t) = threshold.parse::<f32>() {
            config.sequencer.scroll_threshold = t;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(distance) = env("SCRAPBOOK_SWIPE_DISTANCE") {
        if let Ok(d) = distance.parse::<f32>() {
            config.sequencer.min_swipe_distance = d;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(duration) = env("SCRAPBOOK_TRANSITION_MS") {
        if let Ok(ms) = duration.parse::<u64>() {
            config.sequencer.transition_duration = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(animate) = env("SCRAPBOOK_ANIMATE") {
        config.sequencer.animate = animate != "0" && animate.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
    if let Some(grace) = env("SCRAPBOOK_SUITCASE_GRACE_MS") {
        if let Ok(ms) = grace.parse::<u64>() {
            config.choreography.suitcase_grace = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(grace) = env("SCRAPBOOK_GALLERY_GRACE_MS") {
        if let Ok(ms) = grace.parse::<u64>() {
            config.choreography.gallery_grace = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Animate override
    pub animate: Option<bool>,

    /// Frame interval override (milliseconds)
    pub frame_interval_ms: Option<u64>,

    /// Scroll threshold override
    pub scroll_threshold: Option<f32>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set animate override
    #[must_use]
    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = Some(animate);
        self
    }

    /// Set frame interval override
    #[must_use]
    pub fn with_frame_interval_ms(mut self, ms: u64) -> Self {
        self.frame_interval_ms = Some(ms);
        self
    }

    /// Set scroll threshold override
    #[must_use]
    pub fn with_scroll_threshold(mut self, threshold: f32) -> Self {
        self.scroll_threshold = Some(threshold);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut ScrapbookConfigFile) {
        if self.animate.is_some()
            || self.frame_interval_ms.is_some()
            || self.scroll_threshold.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(animate) = self.animate {
            config.sequencer.animate = animate;
        }
        if let Some(ms) = self.frame_interval_ms {
            config.frame_interval = Duration::from_millis(ms);
        }
        if let Some(threshold) = self.scroll_threshold {
            config.sequencer.scroll_threshold = threshold;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = ScrapbookConfigFile::default();

        assert_eq!(config.sequencer.total_slides, 4);
        assert!((config.sequencer.scroll_threshold - 50.0).abs() < f32::EPSILON);
        assert_eq!(config.sequencer.transition_duration, Duration::from_millis(800));
        assert_eq!(config.sequencer.transition_easing, EasingFunction::Power2InOut);
        assert!(config.sequencer.animate);
        assert_eq!(config.choreography.suitcase_grace, Duration::from_millis(1000));
        assert_eq!(config.choreography.gallery_grace, Duration::from_millis(200));
        assert_eq!(config.frame_interval, DEFAULT_FRAME_INTERVAL);
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("scrapbook/sequencer.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[sequencer]
total_slides = 6
scroll_threshold = 80.0
transition_ms = 500
transition_easing = "back.out(1.4)"
animate = false

[choreography]
suitcase_grace_ms = 250
gallery_grace_ms = 0

[intro]
camera_scroll_threshold = 30.0

[clock]
frame_interval_ms = 10
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.sequencer.total_slides, 6);
        assert!((config.sequencer.scroll_threshold - 80.0).abs() < f32::EPSILON);
        assert_eq!(config.sequencer.transition_duration, Duration::from_millis(500));
        assert_eq!(config.sequencer.transition_easing, EasingFunction::back_out(1.4));
        assert!(!config.sequencer.animate);
        assert_eq!(config.choreography.suitcase_grace, Duration::from_millis(250));
        assert_eq!(config.choreography.gallery_grace, Duration::ZERO);
        assert!((config.intro.camera_scroll_threshold - 30.0).abs() < f32::EPSILON);
        assert_eq!(config.frame_interval, Duration::from_millis(10));
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = write_toml("[choreography]\ngallery_grace_ms = 400\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.choreography.gallery_grace, Duration::from_millis(400));
        assert_eq!(config.choreography.suitcase_grace, Duration::from_millis(1000));
        assert_eq!(config.sequencer.total_slides, 4);
    }

    #[test]
    fn test_parse_empty_toml() {
        let file = write_toml("");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.sequencer, SequencerConfig::default());
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/path/sequencer.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();

        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[sequencer\ntotal_slides = \"four\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_unknown_easing_rejected() {
        let file = write_toml("[sequencer]\ntransition_easing = \"wobbly\"\n");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("wobbly"));
    }

    #[test]
    fn test_zero_slides_rejected() {
        let file = write_toml("[sequencer]\ntotal_slides = 0\n");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_non_positive_threshold_rejected() {
        let env = env_from(&[("SCRAPBOOK_SCROLL_THRESHOLD", "0")]);
        let err = load_config_with_env(None, env).unwrap_err();
        assert!(err.to_string().contains("scroll_threshold"));
    }

    // =========================================================================
    // Priority Ordering Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml("[sequencer]\ntransition_ms = 500\ntotal_slides = 5\n");
        let env = env_from(&[
            ("SCRAPBOOK_TRANSITION_MS", "300"),
            ("SCRAPBOOK_ANIMATE", "false"),
            ("SCRAPBOOK_SUITCASE_GRACE_MS", "not-a-number"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.sequencer.transition_duration, Duration::from_millis(300));
        assert_eq!(config.sequencer.total_slides, 5);
        assert!(!config.sequencer.animate);
        assert_eq!(config.choreography.suitcase_grace, Duration::from_millis(1000));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = env_from(&[("SCRAPBOOK_ANIMATE", "1")]);
        let mut config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.source(), ConfigSource::Env);

        ConfigOverrides::new()
            .with_animate(false)
            .with_frame_interval_ms(5)
            .apply(&mut config);

        assert!(!config.sequencer.animate);
        assert_eq!(config.frame_interval, Duration::from_millis(5));
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = ScrapbookConfigFile::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.sequencer.animate);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ValidationError("total_slides must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: total_slides must be at least 1"
        );
    }
}
