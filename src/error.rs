//! Error types for the seeding engine.
//!
//! Every variant except expression evaluation failures (which degrade in
//! place, see [`crate::expr`]) aborts the current run immediately.

use thiserror::Error;

/// Errors that can occur during a seeding run.
#[derive(Debug, Error)]
pub enum SeedingError {
	/// A group declared no `_model` marker.
	#[error("Group '{0}' is missing its '_model' marker")]
	MissingModel(String),

	/// The backend does not recognize the requested model.
	#[error("Unknown model '{model}' for group '{group}'")]
	UnknownModel {
		/// Group that referenced the model.
		group: String,
		/// Model name the backend rejected.
		model: String,
	},

	/// A declared dependency alias could not be resolved by the module loader.
	#[error("Dependency '{alias}' could not be resolved ({code})")]
	DependencyNotFound {
		/// Alias as declared under `_dependencies`.
		alias: String,
		/// Loader-supplied "not found" code.
		code: String,
	},

	/// A `->` reference named a group with no created records yet.
	///
	/// Covers both unknown groups and forward references; a target is only
	/// valid once its record was created earlier in the same run.
	#[error("Reference '->{path}' does not match any created record")]
	ReferenceNotFound {
		/// Full dotted path as written in the fixture.
		path: String,
	},

	/// A reference path segment did not exist on the created record.
	#[error("Reference '->{path}': no property '{segment}'")]
	PropertyNotFound {
		/// Full dotted path as written in the fixture.
		path: String,
		/// Segment that failed to resolve.
		segment: String,
	},

	/// A reference resolved to an object without a generated identifier.
	#[error("Reference '->{path}': target record has no '{id_field}' field")]
	MissingIdentifier {
		/// Full dotted path as written in the fixture.
		path: String,
		/// Identifier field that was expected.
		id_field: &'static str,
	},

	/// A backend drop or create operation failed.
	#[error("Backend error: {0}")]
	Backend(String),

	/// The seed spec was structurally invalid.
	#[error("Invalid spec: {0}")]
	InvalidSpec(String),

	/// Spec file not found.
	#[error("Spec file not found: {0}")]
	FileNotFound(String),

	/// Spec file extension not recognized.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON parse error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// YAML parse error (when the `yaml` feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for seeding operations.
pub type SeedingResult<T> = Result<T, SeedingError>;
