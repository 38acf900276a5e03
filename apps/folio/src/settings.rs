use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use folio_core::{TypingTiming, DEFAULT_PHRASES};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8787/contact";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FolioSettings {
    pub phrases: Vec<String>,
    pub typing: TypingSettings,
    pub contact: ContactSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypingSettings {
    pub type_delay_ms: u64,
    pub delete_delay_ms: u64,
    pub hold_ms: u64,
}

impl TypingSettings {
    pub fn timing(&self) -> TypingTiming {
        TypingTiming {
            type_delay: Duration::from_millis(self.type_delay_ms),
            delete_delay: Duration::from_millis(self.delete_delay_ms),
            hold: Duration::from_millis(self.hold_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl ContactSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Layers defaults, `folio.toml` (or `path`) and `FOLIO__*` variables.
pub fn load_settings(path: Option<&Path>) -> Result<FolioSettings> {
    load_with_env(path, folio_env())
}

fn folio_env() -> Environment {
    Environment::with_prefix("FOLIO")
        .separator("__")
        .list_separator("|")
        .with_list_parse_key("phrases")
        .try_parsing(true)
}

fn load_with_env(path: Option<&Path>, env: Environment) -> Result<FolioSettings> {
    let defaults = TypingTiming::default();
    let builder = Config::builder()
        .set_default("phrases", DEFAULT_PHRASES.to_vec())?
        .set_default("typing.type_delay_ms", millis(defaults.type_delay))?
        .set_default("typing.delete_delay_ms", millis(defaults.delete_delay))?
        .set_default("typing.hold_ms", millis(defaults.hold))?
        .set_default("contact.endpoint", DEFAULT_ENDPOINT)?
        .set_default("contact.timeout_secs", 10_i64)?;

    let builder = match path {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => builder.add_source(File::with_name("folio").required(false)),
    };

    builder
        .add_source(env)
        .build()
        .context("failed to load folio settings")?
        .try_deserialize()
        .context("invalid folio settings")
}

fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
