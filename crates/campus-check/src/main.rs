//! `campus-check` validates a JSON payload against a Campus model.
//!
//! # Usage
//!
//! ```
//! campus-check circle response.json
//! campus-check circle-new --mode request < body.json
//! campus-check client --schema
//! ```
//!
//! On success the model's JSON projection (response mode) or the accepted
//! payload (request mode) is printed. Parse and validation errors go to
//! stderr as-is and the exit status is non-zero.

mod settings;

use std::{
  io::Read as _,
  path::PathBuf,
  process::ExitCode,
};

use anyhow::Context as _;
use campus_core::{
  Circle, CircleMemberAdd, CircleMemberRemove, CircleMemberSet, CircleNew, CircleUpdate,
  Client, Model, Schema, User,
};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use settings::{Mode, Settings};
use strum::Display;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate JSON payloads against Campus models")]
struct Cli {
  /// Model to check against.
  model: ModelName,

  /// JSON payload file. Reads stdin when omitted.
  payload: Option<PathBuf>,

  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "campus-check.toml")]
  config: PathBuf,

  /// Entry point to check with; overrides the configured mode.
  #[arg(long, value_enum)]
  mode: Option<Mode>,

  /// Print the model's OpenAPI schema and exit.
  #[arg(long)]
  schema: bool,

  /// Print single-line JSON.
  #[arg(long)]
  compact: bool,
}

// ─── Models ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
enum ModelName {
  User,
  Client,
  Circle,
  CircleNew,
  CircleUpdate,
  CircleMemberAdd,
  CircleMemberRemove,
  CircleMemberSet,
}

impl ModelName {
  fn schema(self) -> &'static Schema {
    match self {
      Self::User => User::schema(),
      Self::Client => Client::schema(),
      Self::Circle => Circle::schema(),
      Self::CircleNew => CircleNew::schema(),
      Self::CircleUpdate => CircleUpdate::schema(),
      Self::CircleMemberAdd => CircleMemberAdd::schema(),
      Self::CircleMemberRemove => CircleMemberRemove::schema(),
      Self::CircleMemberSet => CircleMemberSet::schema(),
    }
  }

  fn check(self, payload: &str, mode: Mode) -> campus_core::Result<Value> {
    match self {
      Self::User => check::<User>(payload, mode),
      Self::Client => check::<Client>(payload, mode),
      Self::Circle => check::<Circle>(payload, mode),
      Self::CircleNew => check::<CircleNew>(payload, mode),
      Self::CircleUpdate => check::<CircleUpdate>(payload, mode),
      Self::CircleMemberAdd => check::<CircleMemberAdd>(payload, mode),
      Self::CircleMemberRemove => check::<CircleMemberRemove>(payload, mode),
      Self::CircleMemberSet => check::<CircleMemberSet>(payload, mode),
    }
  }
}

fn check<M: Model>(payload: &str, mode: Mode) -> campus_core::Result<Value> {
  match mode {
    Mode::Response => M::from_json_str(payload).map(|model| Value::Object(model.to_json())),
    Mode::Request => M::validate_request_str(payload).map(Value::Object),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let mut settings = Settings::load(&cli.config)?;
  if let Some(mode) = cli.mode {
    settings.mode = mode;
  }
  if cli.compact {
    settings.pretty = false;
  }

  if cli.schema {
    println!("{}", render(&cli.model.schema().json_schema(), settings.pretty)?);
    return Ok(ExitCode::SUCCESS);
  }

  let payload = read_payload(cli.payload.as_deref())?;
  tracing::debug!(model = %cli.model, mode = %settings.mode, "checking payload");

  match cli.model.check(&payload, settings.mode) {
    Ok(output) => {
      println!("{}", render(&output, settings.pretty)?);
      Ok(ExitCode::SUCCESS)
    }
    Err(error) => {
      eprintln!("{error}");
      Ok(ExitCode::FAILURE)
    }
  }
}

fn read_payload(path: Option<&std::path::Path>) -> anyhow::Result<String> {
  match path {
    Some(path) => std::fs::read_to_string(path)
      .with_context(|| format!("failed to read {}", path.display())),
    None => {
      let mut raw = String::new();
      std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read stdin")?;
      Ok(raw)
    }
  }
}

fn render(value: &Value, pretty: bool) -> anyhow::Result<String> {
  if pretty {
    serde_json::to_string_pretty(value)
  } else {
    serde_json::to_string(value)
  }
  .context("failed to serialise output")
}
