//! Service configuration, read from the environment

use crate::layout::LayoutConfig;
use crate::units::Pt;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// TrueType / OpenType font to embed. Helvetica is used when unset.
    pub font_path: Option<PathBuf>,
    pub layout: LayoutConfig,
    pub max_upload_bytes: usize,
    /// Level for this crate and `tower_http` when `RUST_LOG` is not set.
    /// `RUST_LOG` itself is read by the subscriber, not here.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            font_path: None,
            layout: LayoutConfig::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment, after reading a
    /// `.env` file if there is one
    pub fn from_env() -> Result<Config> {
        dotenvy::dotenv().ok();
        Config::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from any source of variables. Unset and empty
    /// variables take their defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();
        let layout = defaults.layout;

        let page_width: f32 = parse_or(&var, "DOCVERTER_PAGE_WIDTH", layout.page_width.0)?;
        let page_height: f32 = parse_or(&var, "DOCVERTER_PAGE_HEIGHT", layout.page_height.0)?;
        let margin: f32 = parse_or(&var, "DOCVERTER_MARGIN", layout.margin.0)?;
        let font_size: f32 = parse_or(&var, "DOCVERTER_FONT_SIZE", layout.font_size.0)?;
        let line_height: f32 = parse_or(&var, "DOCVERTER_LINE_HEIGHT", layout.line_height)?;

        let layout = LayoutConfig::new(
            (Pt(page_width), Pt(page_height)),
            Pt(margin),
            Pt(font_size),
            line_height,
        )
        .context("invalid page layout settings")?;

        Ok(Config {
            port: parse_or(&var, "PORT", defaults.port)?,
            font_path: var("DOCVERTER_FONT").map(PathBuf::from),
            layout,
            max_upload_bytes: parse_or(&var, "DOCVERTER_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            log_level: var("DOCVERTER_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value:?}")),
        None => Ok(default),
    }
}
