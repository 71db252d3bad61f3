use anyhow::{Context, Result};
use clap::ValueEnum;
use log::LevelFilter;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Off,
	Error,
	Warn,
	Info,
	Debug,
	Trace,
}

impl From<LogLevel> for LevelFilter {
	fn from(level: LogLevel) -> Self {
		match level {
			LogLevel::Off => LevelFilter::Off,
			LogLevel::Error => LevelFilter::Error,
			LogLevel::Warn => LevelFilter::Warn,
			LogLevel::Info => LevelFilter::Info,
			LogLevel::Debug => LevelFilter::Debug,
			LogLevel::Trace => LevelFilter::Trace,
		}
	}
}

/// Settings read from the optional TOML config file.
///
/// ```toml
/// log_level = "debug"
///
/// [presets]
/// square = "binomial:2=1"
/// bell = "gaussian:1,0,0.5"
/// ```
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub log_level: Option<LogLevel>,
	/// Names usable in place of a basis function description.
	pub presets: FxHashMap<String, String>,
}

impl Config {
	pub fn load(path: &Path) -> Result<Self> {
		let text = fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
		Self::parse(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
	}

	pub fn parse(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn parses_log_level_and_presets() {
		let config = Config::parse(
			r#"
			log_level = "trace"

			[presets]
			square = "binomial:2=1"
			"#,
		)
		.unwrap();
		assert_eq!(config.log_level, Some(LogLevel::Trace));
		assert_eq!(config.presets.get("square").map(String::as_str), Some("binomial:2=1"));
	}

	#[test]
	fn presets_feed_the_registry() {
		let config = Config::parse("[presets]\nbell = \"gaussian:2,0,1\"").unwrap();
		let registry = composite::BasisRegistry::with_presets(config.presets);
		assert_eq!(registry.resolve("bell").unwrap().identifier(), "gaussian:2.0,0.0,1.0");
	}

	#[test]
	fn everything_is_optional() {
		assert_eq!(Config::parse("").unwrap(), Config::default());
	}

	#[test]
	fn rejects_unknown_keys() {
		assert!(Config::parse("colour = true").is_err());
		assert!(Config::parse("log_level = \"loud\"").is_err());
	}

	#[test]
	fn missing_file_names_the_path() {
		let error = Config::load(Path::new("/nonexistent/fingerprint.toml")).unwrap_err();
		assert!(error.to_string().contains("/nonexistent/fingerprint.toml"));
	}
}
