//! Site configuration module.
//!
//! Handles loading, defaulting, and validating `config.json`. The file is
//! optional and sparse: stock defaults apply to every key it leaves out.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.json              # Site config (optional)
//! ├── index.md
//! └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```json
//! {
//!   "lang": "en-US",
//!   "title": "My Quire Site",
//!   "author": "anonymous",
//!   "footer": "<p>© 2024 Jane Doe</p>",
//!   "nav": ["[Home](/)", "[Journal](/journal)", "[About](/about.html)"],
//!   "favicons": ["<link rel=\"icon\" href=\"/static/me.svg\" />"],
//!   "styles": ["/static/extra.css"],
//!   "scripts": ["/static/counter.js"],
//!   "disable_default_favicon": false,
//!   "disable_default_style": false
//! }
//! ```
//!
//! ## Navigation Overrides
//!
//! When `nav` is non-empty it replaces the generated navigation entirely.
//! Each entry is a Markdown link; an entry whose URL is `/<folder>` also sets
//! the display title of that folder's index page.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shell::NavLink;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.json`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Value of the `<html lang>` attribute.
    pub lang: String,
    /// Site title: the header heading and the default `<title>`.
    pub title: String,
    /// Value of the author meta tag.
    pub author: String,
    /// Raw HTML placed inside `<footer>`. No footer when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Markdown links replacing the generated navigation.
    pub nav: Vec<String>,
    /// Extra `<link rel="icon">` tags. Entries of any other shape are ignored.
    pub favicons: Vec<String>,
    /// Stylesheet hrefs or complete `<link rel="stylesheet">` tags.
    pub styles: Vec<String>,
    /// Script srcs or complete `<script>` tags.
    pub scripts: Vec<String>,
    /// Skip the bundled favicons.
    pub disable_default_favicon: bool,
    /// Skip the bundled stylesheet.
    pub disable_default_style: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            title: "My Quire Site".to_string(),
            author: "anonymous".to_string(),
            footer: None,
            nav: Vec::new(),
            favicons: Vec::new(),
            styles: Vec::new(),
            scripts: Vec::new(),
            disable_default_favicon: false,
            disable_default_style: false,
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lang.trim().is_empty() {
            return Err(ConfigError::Validation("lang must not be empty".into()));
        }
        for item in &self.nav {
            if NavLink::parse(item).is_none() {
                return Err(ConfigError::Validation(format!(
                    "nav entry {item:?} is not a Markdown link like \"[Title](/url)\""
                )));
            }
        }
        Ok(())
    }

    /// Display title override for a folder, taken from the custom nav.
    ///
    /// Matches entries whose URL is `/<folder>`, ignoring a trailing slash.
    /// The last matching entry wins.
    pub fn folder_title(&self, folder: &str) -> Option<String> {
        let target = format!("/{folder}");
        self.nav
            .iter()
            .filter_map(|item| NavLink::parse(item))
            .filter(|link| {
                let url = link.url.trim_end_matches('/');
                url == target
            })
            .last()
            .map(|link| link.label)
    }
}

/// Load config from `config.json` in the given directory.
///
/// Returns stock defaults when the file doesn't exist. Unknown keys and
/// invalid values are errors.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
        path: config_path.clone(),
        source,
    })?;
    let config: SiteConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: config_path,
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Returns the stock `config.json` with every key at its default value.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SiteConfig::default())
}
