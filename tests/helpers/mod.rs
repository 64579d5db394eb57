//! Shared helpers for integration tests: an in-memory document backend and
//! a static module loader.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use indexmap::IndexMap;
use seedbed::prelude::*;
use serde_json::{Value, json};

#[derive(Default)]
struct State {
	collections: IndexMap<String, Vec<Value>>,
	next_id: u64,
	database_drops: usize,
	collection_drops: Vec<String>,
}

/// In-memory document store with auto-assigned integer identifiers.
///
/// Tracks drop operations so tests can assert on the drop policy.
pub struct MemoryBackend {
	models: Option<Vec<String>>,
	failing_model: Option<String>,
	fail_database_drop: bool,
	fail_collection_drop: bool,
	state: Arc<Mutex<State>>,
}

impl MemoryBackend {
	/// Backend accepting any model name.
	pub fn new() -> Arc<Self> {
		Arc::new(Self {
			models: None,
			failing_model: None,
			fail_database_drop: false,
			fail_collection_drop: false,
			state: Arc::default(),
		})
	}

	/// Backend recognizing only the given model names.
	pub fn with_models(models: &[&str]) -> Arc<Self> {
		Arc::new(Self {
			models: Some(models.iter().map(|m| m.to_string()).collect()),
			failing_model: None,
			fail_database_drop: false,
			fail_collection_drop: false,
			state: Arc::default(),
		})
	}

	/// Backend whose `create` fails for one model.
	pub fn failing_for(model: &str) -> Arc<Self> {
		Arc::new(Self {
			models: None,
			failing_model: Some(model.to_string()),
			fail_database_drop: false,
			fail_collection_drop: false,
			state: Arc::default(),
		})
	}

	/// Backend whose `drop_database` fails.
	pub fn failing_database_drop() -> Arc<Self> {
		Arc::new(Self {
			models: None,
			failing_model: None,
			fail_database_drop: true,
			fail_collection_drop: false,
			state: Arc::default(),
		})
	}

	/// Backend whose `drop_collection` fails for every model.
	pub fn failing_collection_drop() -> Arc<Self> {
		Arc::new(Self {
			models: None,
			failing_model: None,
			fail_database_drop: false,
			fail_collection_drop: true,
			state: Arc::default(),
		})
	}

	pub fn collection_len(&self, model: &str) -> usize {
		self.state
			.lock()
			.unwrap()
			.collections
			.get(model)
			.map_or(0, Vec::len)
	}

	pub fn database_drops(&self) -> usize {
		self.state.lock().unwrap().database_drops
	}

	pub fn collection_drops(&self) -> Vec<String> {
		self.state.lock().unwrap().collection_drops.clone()
	}
}

struct MemoryModel {
	name: String,
	fails: bool,
	fail_drop: bool,
	state: Arc<Mutex<State>>,
}

#[async_trait]
impl SeedBackend for MemoryBackend {
	fn model(&self, name: &str) -> Option<Arc<dyn ModelHandle>> {
		if let Some(models) = &self.models {
			if !models.iter().any(|m| m == name) {
				return None;
			}
		}
		Some(Arc::new(MemoryModel {
			name: name.to_string(),
			fails: self.failing_model.as_deref() == Some(name),
			fail_drop: self.fail_collection_drop,
			state: Arc::clone(&self.state),
		}))
	}

	async fn drop_database(&self) -> SeedingResult<()> {
		if self.fail_database_drop {
			return Err(SeedingError::Backend(
				"database drop rejected".to_string(),
			));
		}
		let mut state = self.state.lock().unwrap();
		state.collections.clear();
		state.database_drops += 1;
		Ok(())
	}
}

#[async_trait]
impl ModelHandle for MemoryModel {
	fn name(&self) -> &str {
		&self.name
	}

	async fn create(&self, mut fields: Value) -> SeedingResult<Value> {
		if self.fails {
			return Err(SeedingError::Backend(format!(
				"create rejected for model '{}'",
				self.name
			)));
		}
		let mut state = self.state.lock().unwrap();
		state.next_id += 1;
		fields
			.as_object_mut()
			.expect("resolved records are objects")
			.insert(ID_FIELD.to_string(), json!(state.next_id));
		state
			.collections
			.entry(self.name.clone())
			.or_default()
			.push(fields.clone());
		Ok(fields)
	}

	async fn drop_collection(&self) -> SeedingResult<()> {
		if self.fail_drop {
			return Err(SeedingError::Backend(format!(
				"collection drop rejected for model '{}'",
				self.name
			)));
		}
		let mut state = self.state.lock().unwrap();
		state.collections.shift_remove(&self.name);
		state.collection_drops.push(self.name.clone());
		Ok(())
	}
}

/// Module loader backed by a fixed set of named modules.
#[derive(Default)]
pub struct StaticModules {
	modules: IndexMap<String, ExprValue>,
}

impl StaticModules {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, id: &str, module: ExprValue) -> Self {
		self.modules.insert(id.to_string(), module);
		self
	}
}

impl ModuleLoader for StaticModules {
	fn load(&self, id: &str) -> Result<ExprValue, ModuleError> {
		self.modules
			.get(id)
			.cloned()
			.ok_or_else(|| ModuleError::not_found("MODULE_NOT_FOUND"))
	}
}

/// A small string-helper module usable from seed expressions.
pub fn strings_module() -> ExprValue {
	ExprValue::module([
		(
			"upper".to_string(),
			ExprValue::function(|args| match args {
				[ExprValue::String(s)] => Ok(ExprValue::String(s.to_uppercase())),
				_ => Err(EvalError::Function("upper expects one string".to_string())),
			}),
		),
		(
			"repeat".to_string(),
			ExprValue::function(|args| match args {
				[ExprValue::String(s), ExprValue::Number(n)] => {
					Ok(ExprValue::String(s.repeat(*n as usize)))
				}
				_ => Err(EvalError::Function(
					"repeat expects a string and a count".to_string(),
				)),
			}),
		),
	])
}
