//! Checker configuration: TOML file, then `CAMPUS_*` environment variables.

use std::path::Path;

use anyhow::Context as _;
use clap::ValueEnum;
use config::{Config, ConfigBuilder, Environment, File, Source, builder::DefaultState};
use serde::Deserialize;
use strum::Display;

/// Which entry point a payload is checked with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
  /// Materialise a full server response.
  #[default]
  Response,
  /// Check a partial request body.
  Request,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub mode:   Mode,
  pub pretty: bool,
}

impl Default for Settings {
  fn default() -> Self { Self { mode: Mode::Response, pretty: true } }
}

impl Settings {
  /// Read `path` if it exists, with `CAMPUS_*` variables on top.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::layered(
      File::from(path).required(false),
      Environment::with_prefix("CAMPUS"),
    )
    .with_context(|| format!("failed to load settings from {}", path.display()))
  }

  /// `file`, then `env` on top.
  fn layered<S>(file: S, env: Environment) -> anyhow::Result<Self>
  where
    S: Source + Send + Sync + 'static,
  {
    Self::from_builder(Config::builder().add_source(file).add_source(env))
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
    builder
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise Settings")
  }
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn from_toml(raw: &str) -> anyhow::Result<Settings> {
    Settings::from_builder(Config::builder().add_source(File::from_str(raw, FileFormat::Toml)))
  }

  #[test]
  fn empty_file_uses_defaults() {
    assert_eq!(from_toml("").unwrap(), Settings::default());
  }

  #[test]
  fn file_overrides_defaults() {
    let settings = from_toml("mode = \"request\"\npretty = false\n").unwrap();
    assert_eq!(settings, Settings { mode: Mode::Request, pretty: false });
  }

  #[test]
  fn later_sources_win() {
    let settings = Settings::from_builder(
      Config::builder()
        .add_source(File::from_str("mode = \"request\"", FileFormat::Toml))
        .add_source(File::from_str("mode = \"response\"", FileFormat::Toml)),
    )
    .unwrap();
    assert_eq!(settings.mode, Mode::Response);
    assert!(settings.pretty);
  }

  /// `CAMPUS_*` variables from `vars` instead of the process environment.
  fn campus_env(vars: &[(&str, &str)]) -> Environment {
    Environment::with_prefix("CAMPUS").source(Some(
      vars
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect(),
    ))
  }

  #[test]
  fn environment_overrides_file() {
    let file = File::from_str("mode = \"response\"\npretty = true\n", FileFormat::Toml);
    let env = campus_env(&[("CAMPUS_MODE", "request"), ("CAMPUS_PRETTY", "false")]);
    let settings = Settings::layered(file, env).unwrap();
    assert_eq!(settings, Settings { mode: Mode::Request, pretty: false });
  }

  #[test]
  fn environment_fills_what_file_leaves_out() {
    let file = File::from_str("mode = \"request\"", FileFormat::Toml);
    let env = campus_env(&[("CAMPUS_PRETTY", "false"), ("OTHER_MODE", "response")]);
    let settings = Settings::layered(file, env).unwrap();
    assert_eq!(settings, Settings { mode: Mode::Request, pretty: false });
  }

  #[test]
  fn empty_environment_keeps_file_values() {
    let file = File::from_str("pretty = false", FileFormat::Toml);
    let settings = Settings::layered(file, campus_env(&[])).unwrap();
    assert_eq!(settings, Settings { mode: Mode::Response, pretty: false });
  }

  #[test]
  fn malformed_environment_value_is_rejected() {
    let file = File::from_str("", FileFormat::Toml);
    let env = campus_env(&[("CAMPUS_PRETTY", "sometimes")]);
    assert!(Settings::layered(file, env).is_err());
  }

  #[test]
  fn unknown_mode_is_rejected() {
    assert!(from_toml("mode = \"both\"").is_err());
  }

  #[test]
  fn missing_file_is_not_an_error() {
    assert!(Settings::load(Path::new("does-not-exist/campus-check.toml")).is_ok());
  }
}
