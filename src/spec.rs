//! Seed spec input handling.
//!
//! A spec is JSON-compatible nested data: group name → group spec, plus the
//! optional reserved `_dependencies` key. Specs can be built from an
//! in-memory value or parsed from JSON/YAML files, with the format detected
//! from the file extension.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{SeedingError, SeedingResult};

/// Reserved group key naming the backend model.
pub const MODEL_KEY: &str = "_model";

/// Supported spec file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SpecFormat {
	/// JSON format (default).
	#[default]
	Json,

	/// YAML format (requires the `yaml` feature).
	Yaml,
}

impl SpecFormat {
	/// Determines the format from a file extension.
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}
}

impl std::fmt::Display for SpecFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}

/// A declarative seed spec: ordered groups of fixture records.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSpec {
	root: Map<String, Value>,
}

impl SeedSpec {
	/// Builds a spec from an in-memory value.
	///
	/// The root must be an object mapping group names to group specs.
	pub fn from_value(value: Value) -> SeedingResult<Self> {
		match value {
			Value::Object(root) => Ok(Self { root }),
			other => Err(SeedingError::InvalidSpec(format!(
				"root must be an object, got {}",
				type_name(&other)
			))),
		}
	}

	/// Parses a spec from string content in the given format.
	pub fn parse_str(content: &str, format: SpecFormat) -> SeedingResult<Self> {
		let value = match format {
			SpecFormat::Json => serde_json::from_str(content)?,
			SpecFormat::Yaml => parse_yaml(content)?,
		};
		Self::from_value(value)
	}

	/// Loads a spec from a file, detecting the format from the extension.
	pub fn from_path(path: &Path) -> SeedingResult<Self> {
		let format = SpecFormat::from_path(path).ok_or_else(|| {
			SeedingError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				SeedingError::FileNotFound(path.display().to_string())
			} else {
				SeedingError::Io(e)
			}
		})?;

		Self::parse_str(&content, format)
	}

	/// Returns the root mapping, declaration order intact.
	pub fn root(&self) -> &Map<String, Value> {
		&self.root
	}
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str) -> SeedingResult<Value> {
	Ok(serde_yaml::from_str(content)?)
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_content: &str) -> SeedingResult<Value> {
	Err(SeedingError::UnsupportedExtension(
		"YAML support requires the 'yaml' feature".to_string(),
	))
}

fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
