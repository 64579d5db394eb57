//! Collaborator traits for the persistence backend and module loader.
//!
//! The engine depends only on these narrow contracts, not on any specific
//! storage technology. A backend exposes named model handles; each handle
//! creates documents in, and can drop, one backing collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SeedingResult;
use crate::expr::ExprValue;

/// Field name under which created records expose their generated identifier.
pub const ID_FIELD: &str = "_id";

/// Persistence backend collaborator.
///
/// # Example
///
/// ```ignore
/// let backend: Arc<dyn SeedBackend> = Arc::new(MongoBackend::connect(url).await?);
/// let seeder = Seeder::new(backend, modules);
/// ```
#[async_trait]
pub trait SeedBackend: Send + Sync {
	/// Resolves a model handle by name.
	///
	/// Returns `None` if the backend does not recognize the model; the run
	/// then fails with [`SeedingError::UnknownModel`](crate::SeedingError).
	fn model(&self, name: &str) -> Option<Arc<dyn ModelHandle>>;

	/// Drops the entire database.
	async fn drop_database(&self) -> SeedingResult<()>;
}

/// Handle to one backend model and its backing collection.
#[async_trait]
pub trait ModelHandle: Send + Sync {
	/// Returns the model name this handle was resolved under.
	fn name(&self) -> &str;

	/// Creates one document from fully resolved field values.
	///
	/// Returns the created record as stored, including its generated
	/// identifier under [`ID_FIELD`].
	async fn create(&self, fields: Value) -> SeedingResult<Value>;

	/// Drops this model's backing collection.
	async fn drop_collection(&self) -> SeedingResult<()>;
}

/// Error returned by a [`ModuleLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
	/// The identifier did not resolve to a module.
	///
	/// The code is loader-specific (e.g. `MODULE_NOT_FOUND`) and is carried
	/// into [`SeedingError::DependencyNotFound`](crate::SeedingError).
	NotFound {
		/// Loader-specific failure code.
		code: String,
	},
}

impl ModuleError {
	/// Creates a not-found error with the given loader code.
	pub fn not_found(code: impl Into<String>) -> Self {
		Self::NotFound { code: code.into() }
	}
}

/// Module-resolution collaborator.
///
/// Maps the identifiers declared under a spec's `_dependencies` key to
/// runtime values usable from seed expressions. A resolved module is
/// typically an [`ExprValue::Object`] of named helper functions.
pub trait ModuleLoader: Send + Sync {
	/// Resolves a module identifier to a value.
	fn load(&self, id: &str) -> Result<ExprValue, ModuleError>;
}

/// Loader that knows no modules; any declared dependency fails the run.
#[derive(Debug, Default)]
pub struct NoModules;

impl ModuleLoader for NoModules {
	fn load(&self, _id: &str) -> Result<ExprValue, ModuleError> {
		Err(ModuleError::not_found("MODULE_NOT_FOUND"))
	}
}
