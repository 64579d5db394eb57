//! Per-run scripting environment.
//!
//! Loaded modules are bound into a [`ScriptEnv`] owned by exactly one
//! seeding run. Nothing is stored at module or process scope, so two
//! concurrent runs can never observe each other's bindings.

use indexmap::IndexMap;
use serde_json::Value;

use crate::backend::ModuleLoader;
use crate::error::{SeedingError, SeedingResult};
use crate::expr::ExprValue;

/// Reserved spec key declaring dependency aliases.
pub const DEPENDENCIES_KEY: &str = "_dependencies";

/// Named bindings visible to seed expressions.
#[derive(Debug, Default)]
pub struct ScriptEnv {
	bindings: IndexMap<String, ExprValue>,
}

impl ScriptEnv {
	/// Creates an empty environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds a value under an alias, replacing any previous binding.
	pub fn bind(&mut self, alias: impl Into<String>, value: ExprValue) {
		self.bindings.insert(alias.into(), value);
	}

	/// Looks up a binding by alias.
	pub fn get(&self, alias: &str) -> Option<&ExprValue> {
		self.bindings.get(alias)
	}

	/// Returns true if the alias is bound.
	pub fn contains(&self, alias: &str) -> bool {
		self.bindings.contains_key(alias)
	}

	/// Resolves the spec's dependency declarations into this environment.
	///
	/// `declarations` maps alias → module identifier. Aliases that are
	/// already bound are left untouched; everything else goes through the
	/// loader. The first resolution failure aborts with
	/// [`SeedingError::DependencyNotFound`], before any group is processed.
	pub fn load_dependencies(
		&mut self,
		declarations: &serde_json::Map<String, Value>,
		loader: &dyn ModuleLoader,
	) -> SeedingResult<()> {
		for (alias, id) in declarations {
			if self.contains(alias) {
				continue;
			}
			let Value::String(id) = id else {
				return Err(SeedingError::InvalidSpec(format!(
					"dependency '{alias}' must map to a module identifier string"
				)));
			};
			tracing::debug!(%alias, module = %id, "loading seed dependency");
			let module = loader.load(id).map_err(|err| {
				let crate::backend::ModuleError::NotFound { code } = err;
				SeedingError::DependencyNotFound {
					alias: alias.clone(),
					code,
				}
			})?;
			self.bind(alias.clone(), module);
		}
		Ok(())
	}
}
