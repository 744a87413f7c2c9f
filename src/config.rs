//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [scroll]
//! fixed_offset = 100          # Header compensation when picking the active section
//! header_offset = 80          # Gap left above a section after scroll-to-section
//! settle_delay_ms = 500       # Tracking pause after a programmatic scroll
//! elevation_threshold = 10    # scrollY beyond which the header is "elevated"
//!
//! [dialog]
//! placeholder = [800, 600]    # Dimensions used until the real size is known
//! close_grace_ms = 300        # Exit animation window before the item is forgotten
//! padding = [48, 160]         # Chrome added around the image (x, y)
//! margin = [32, 32]           # Minimum distance kept from the viewport edges (x, y)
//!
//! [contact]
//! recipient = "hello@example.com"
//! from = "Portfolio <no-reply@example.com>"
//! subject_prefix = "New Contact Form Submission: "
//!
//! [processing]
//! max_processes = 4           # Max image probe workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::Dimensions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Section tracking offsets and timing.
    pub scroll: ScrollConfig,
    /// Gallery dialog placeholder, timing and sizing.
    pub dialog: DialogConfig,
    /// Contact form mail composition.
    pub contact: ContactConfig,
    /// Image probe worker pool.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scroll.fixed_offset < 0.0 || self.scroll.header_offset < 0.0 {
            return Err(ConfigError::Validation(
                "scroll offsets must not be negative".into(),
            ));
        }
        if self.dialog.placeholder[0] == 0 || self.dialog.placeholder[1] == 0 {
            return Err(ConfigError::Validation(
                "dialog.placeholder values must be non-zero".into(),
            ));
        }
        if self.dialog.padding.iter().chain(&self.dialog.margin).any(|v| *v < 0.0) {
            return Err(ConfigError::Validation(
                "dialog.padding and dialog.margin must not be negative".into(),
            ));
        }
        if self.contact.recipient.trim().is_empty() {
            return Err(ConfigError::Validation(
                "contact.recipient must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Section tracking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Added to `scrollY` before testing section extents.
    pub fixed_offset: f64,
    /// Subtracted from the section top when scrolling to it.
    pub header_offset: f64,
    /// How long scroll-driven updates stay suspended after a programmatic scroll.
    pub settle_delay_ms: u64,
    /// `scrollY` above which the header switches to its elevated style.
    pub elevation_threshold: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            fixed_offset: 100.0,
            header_offset: 80.0,
            settle_delay_ms: 500,
            elevation_threshold: 10.0,
        }
    }
}

/// Gallery dialog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialogConfig {
    /// `[width, height]` shown while the real size is unknown or unavailable.
    pub placeholder: [u32; 2],
    /// Delay between closing the dialog and forgetting its item.
    pub close_grace_ms: u64,
    /// `[x, y]` space taken by dialog chrome around the image.
    pub padding: [f64; 2],
    /// `[x, y]` space always left free between the dialog and the viewport edge.
    pub margin: [f64; 2],
}

impl DialogConfig {
    pub fn placeholder_dimensions(&self) -> Dimensions {
        Dimensions::new(self.placeholder[0], self.placeholder[1])
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            placeholder: [800, 600],
            close_grace_ms: 300,
            padding: [48.0, 160.0],
            margin: [32.0, 32.0],
        }
    }
}

/// Contact form mail composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Address every submission is delivered to.
    pub recipient: String,
    /// `From:` header of the forwarded mail.
    pub from: String,
    /// Prepended to the visitor's subject line.
    pub subject_prefix: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "hello@example.com".to_string(),
            from: "Portfolio <no-reply@example.com>".to_string(),
            subject_prefix: "New Contact Form Submission: ".to_string(),
        }
    }
}

/// Image probe worker pool settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel probe workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the base, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of stock defaults.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Folio Configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Section tracking
# ---------------------------------------------------------------------------
[scroll]
# Added to scrollY before testing which section contains the position.
# Compensates for the fixed header overlapping the top of the page.
fixed_offset = 100

# Space left above a section when the navigation scrolls to it.
header_offset = 80

# Scroll-driven tracking stays paused this long after a navigation click,
# so the smooth-scroll animation does not flicker through other sections.
settle_delay_ms = 500

# The header gets its elevated (blurred, shadowed) style past this scrollY.
elevation_threshold = 10

# ---------------------------------------------------------------------------
# Gallery dialogs
# ---------------------------------------------------------------------------
[dialog]
# Size assumed until the image's natural size is known, and kept when the
# image fails to load.
placeholder = [800, 600]

# Exit animation window: the closed item is forgotten after this delay.
close_grace_ms = 300

# Dialog chrome around the image as [x, y] pixels (borders, caption, buttons).
padding = [48, 160]

# Minimum free space between the dialog and the viewport edges, [x, y].
margin = [32, 32]

# ---------------------------------------------------------------------------
# Contact form
# ---------------------------------------------------------------------------
[contact]
recipient = "hello@example.com"
from = "Portfolio <no-reply@example.com>"
subject_prefix = "New Contact Form Submission: "

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image probe workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
