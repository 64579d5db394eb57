//! Seeding orchestration.
//!
//! A [`Seeder`] drives one run at a time: optional database drop, dependency
//! loading, then every group in declaration order with exactly one backend
//! operation in flight. The script environment and result store are created
//! fresh for each call to [`Seeder::seed`], so concurrent runs on separate
//! seeders never share mutable state. There are no retries and no
//! cancellation; the first failing backend operation ends the run.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::backend::{ModuleLoader, NoModules, SeedBackend};
use crate::env::{DEPENDENCIES_KEY, ScriptEnv};
use crate::error::{SeedingError, SeedingResult};
use crate::options::SeedOptions;
use crate::resolve;
use crate::spec::{MODEL_KEY, SeedSpec};
use crate::store::ResultStore;

/// Seeding entry point bound to a backend and a module loader.
///
/// # Example
///
/// ```ignore
/// let seeder = Seeder::new(backend, modules);
/// let spec = SeedSpec::from_path(Path::new("fixtures/seed.json"))?;
/// let result = seeder.seed(&spec, SeedOptions::default()).await?;
/// println!("created {} records", result.len());
/// ```
pub struct Seeder {
	backend: Arc<dyn SeedBackend>,
	modules: Arc<dyn ModuleLoader>,
}

impl Seeder {
	/// Creates a seeder with an explicit module loader.
	pub fn new(backend: Arc<dyn SeedBackend>, modules: Arc<dyn ModuleLoader>) -> Self {
		Self { backend, modules }
	}

	/// Creates a seeder whose specs may not declare dependencies.
	pub fn without_modules(backend: Arc<dyn SeedBackend>) -> Self {
		Self::new(backend, Arc::new(NoModules))
	}

	/// Runs one seeding pass and returns the created records.
	///
	/// The caller's spec is never mutated; the run works on a deep copy.
	pub async fn seed(&self, spec: &SeedSpec, options: SeedOptions) -> SeedingResult<ResultStore> {
		let options = options.normalized();

		if options.drop_database {
			tracing::debug!("dropping database before seeding");
			self.backend.drop_database().await?;
		}

		let mut root = spec.root().clone();

		let mut env = ScriptEnv::new();
		if let Some(declarations) = root.shift_remove(DEPENDENCIES_KEY) {
			let Value::Object(declarations) = declarations else {
				return Err(SeedingError::InvalidSpec(format!(
					"'{DEPENDENCIES_KEY}' must be an object mapping aliases to module identifiers"
				)));
			};
			env.load_dependencies(&declarations, self.modules.as_ref())?;
		}

		let mut store = ResultStore::new();
		for (group_name, group_value) in root {
			let Value::Object(group) = group_value else {
				return Err(SeedingError::InvalidSpec(format!(
					"group '{group_name}' must be an object"
				)));
			};
			self.process_group(&group_name, group, options, &env, &mut store)
				.await?;
		}

		Ok(store)
	}

	/// Callback adapter over [`Seeder::seed`].
	///
	/// Awaits the run and invokes the callback exactly once with its
	/// outcome. The future-returning API remains the single completion
	/// channel of the core; this is a convenience layer over it.
	pub async fn seed_then<F>(&self, spec: &SeedSpec, options: SeedOptions, callback: F)
	where
		F: FnOnce(SeedingResult<ResultStore>),
	{
		callback(self.seed(spec, options).await);
	}

	/// Seeds one group: marker check, model lookup, drop policy, creates.
	async fn process_group(
		&self,
		group_name: &str,
		mut group: Map<String, Value>,
		options: SeedOptions,
		env: &ScriptEnv,
		store: &mut ResultStore,
	) -> SeedingResult<()> {
		let model_name = match group.shift_remove(MODEL_KEY) {
			Some(Value::String(name)) => name,
			Some(_) => {
				return Err(SeedingError::InvalidSpec(format!(
					"'{MODEL_KEY}' of group '{group_name}' must be a string"
				)));
			}
			None => return Err(SeedingError::MissingModel(group_name.to_string())),
		};

		let model = self
			.backend
			.model(&model_name)
			.ok_or_else(|| SeedingError::UnknownModel {
				group: group_name.to_string(),
				model: model_name.clone(),
			})?;

		tracing::debug!(group = group_name, model = %model_name, "seeding group");

		if options.drop_collections {
			tracing::debug!(model = %model_name, "dropping collection before seeding");
			model.drop_collection().await?;
		}

		for (key, record_value) in group {
			let Value::Object(record) = record_value else {
				return Err(SeedingError::InvalidSpec(format!(
					"record '{group_name}.{key}' must be an object"
				)));
			};

			let resolved = resolve::resolve_record(&record, store, env)?;
			// Exactly one backend call in flight; a failure here aborts the
			// remaining keys and the whole run
			let created = model.create(Value::Object(resolved)).await?;
			tracing::debug!(group = group_name, key = %key, "created record");
			store.insert(group_name, &key, created);
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::backend::{ID_FIELD, ModelHandle};
	use async_trait::async_trait;
	use rstest::rstest;
	use serde_json::json;
	use std::sync::Mutex;
	use std::sync::atomic::{AtomicU64, Ordering};

	/// Minimal backend recording every operation, for orchestration tests.
	struct RecordingBackend {
		models: Vec<String>,
		next_id: Arc<AtomicU64>,
		pub ops: Arc<Mutex<Vec<String>>>,
	}

	impl RecordingBackend {
		fn with_models(models: &[&str]) -> Arc<Self> {
			Arc::new(Self {
				models: models.iter().map(|m| m.to_string()).collect(),
				next_id: Arc::new(AtomicU64::new(1)),
				ops: Arc::default(),
			})
		}
	}

	struct RecordingModel {
		name: String,
		next_id: Arc<AtomicU64>,
		ops: Arc<Mutex<Vec<String>>>,
	}

	#[async_trait]
	impl SeedBackend for RecordingBackend {
		fn model(&self, name: &str) -> Option<Arc<dyn ModelHandle>> {
			self.models.iter().any(|m| m == name).then(|| {
				Arc::new(RecordingModel {
					name: name.to_string(),
					next_id: Arc::clone(&self.next_id),
					ops: Arc::clone(&self.ops),
				}) as Arc<dyn ModelHandle>
			})
		}

		async fn drop_database(&self) -> SeedingResult<()> {
			self.ops.lock().unwrap().push("drop_database".to_string());
			Ok(())
		}
	}

	#[async_trait]
	impl ModelHandle for RecordingModel {
		fn name(&self) -> &str {
			&self.name
		}

		async fn create(&self, mut fields: Value) -> SeedingResult<Value> {
			let id = self.next_id.fetch_add(1, Ordering::SeqCst);
			self.ops
				.lock()
				.unwrap()
				.push(format!("create:{}", self.name));
			fields
				.as_object_mut()
				.expect("create receives objects")
				.insert(ID_FIELD.to_string(), json!(id));
			Ok(fields)
		}

		async fn drop_collection(&self) -> SeedingResult<()> {
			self.ops.lock().unwrap().push(format!("drop:{}", self.name));
			Ok(())
		}
	}

	fn spec(value: Value) -> SeedSpec {
		SeedSpec::from_value(value).unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_seed_creates_records_in_declaration_order() {
		let backend = RecordingBackend::with_models(&["User", "Post"]);
		let seeder = Seeder::without_modules(backend.clone());

		let result = seeder
			.seed(
				&spec(json!({
					"users": {"_model": "User", "admin": {"name": "admin"}},
					"posts": {
						"_model": "Post",
						"first": {"author": "->users.admin", "title": "hello"},
					},
				})),
				SeedOptions::default(),
			)
			.await
			.unwrap();

		assert_eq!(result.len(), 2);
		assert_eq!(result.record("users", "admin").unwrap()["name"], json!("admin"));
		// The post's author reference resolved to the user's generated id
		let admin_id = result.record("users", "admin").unwrap()[ID_FIELD].clone();
		assert_eq!(result.record("posts", "first").unwrap()["author"], admin_id);

		let ops = backend.ops.lock().unwrap().clone();
		assert_eq!(ops, vec!["drop_database", "create:User", "create:Post"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_model_marker_aborts_before_any_create() {
		let backend = RecordingBackend::with_models(&["User"]);
		let seeder = Seeder::without_modules(backend.clone());

		let err = seeder
			.seed(
				&spec(json!({
					"users": {"admin": {"name": "admin"}},
					"posts": {"_model": "User", "p": {}},
				})),
				SeedOptions::new().with_drop_database(false),
			)
			.await
			.unwrap_err();

		assert!(matches!(err, SeedingError::MissingModel(group) if group == "users"));
		assert!(backend.ops.lock().unwrap().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_unknown_model_aborts() {
		let backend = RecordingBackend::with_models(&["User"]);
		let seeder = Seeder::without_modules(backend);

		let err = seeder
			.seed(
				&spec(json!({"ghosts": {"_model": "Ghost", "g": {}}})),
				SeedOptions::new().with_drop_database(false),
			)
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			SeedingError::UnknownModel { group, model } if group == "ghosts" && model == "Ghost"
		));
	}

	#[rstest]
	#[tokio::test]
	async fn test_drop_collections_wins_over_drop_database() {
		let backend = RecordingBackend::with_models(&["User"]);
		let seeder = Seeder::without_modules(backend.clone());

		seeder
			.seed(
				&spec(json!({"users": {"_model": "User", "u": {}}})),
				SeedOptions::new()
					.with_drop_database(true)
					.with_drop_collections(true),
			)
			.await
			.unwrap();

		let ops = backend.ops.lock().unwrap().clone();
		assert_eq!(ops, vec!["drop:User", "create:User"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_caller_spec_is_not_mutated() {
		let backend = RecordingBackend::with_models(&["User"]);
		let seeder = Seeder::without_modules(backend);

		let original = spec(json!({"users": {"_model": "User", "u": {"n": "=1+1"}}}));
		let copy = original.clone();
		seeder.seed(&original, SeedOptions::default()).await.unwrap();

		assert_eq!(original, copy);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unresolvable_dependency_aborts_before_groups() {
		let backend = RecordingBackend::with_models(&["User"]);
		let seeder = Seeder::without_modules(backend.clone());

		let err = seeder
			.seed(
				&spec(json!({
					"_dependencies": {"faker": "faker"},
					"users": {"_model": "User", "u": {}},
				})),
				SeedOptions::new().with_drop_database(false),
			)
			.await
			.unwrap_err();

		assert!(matches!(err, SeedingError::DependencyNotFound { .. }));
		assert!(backend.ops.lock().unwrap().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_seed_then_invokes_callback_once() {
		let backend = RecordingBackend::with_models(&["User"]);
		let seeder = Seeder::without_modules(backend);

		let mut called = 0;
		seeder
			.seed_then(
				&spec(json!({"users": {"_model": "User", "u": {}}})),
				SeedOptions::default(),
				|outcome| {
					called += 1;
					assert_eq!(outcome.unwrap().len(), 1);
				},
			)
			.await;

		assert_eq!(called, 1);
	}
}
