//! Declarative database seeding with cross-record references and computed
//! expressions.
//!
//! A seed spec is JSON-compatible nested data describing groups of fixture
//! records. The engine walks it in declaration order, persists each record
//! through a pluggable backend and lets later records refer to earlier ones:
//!
//! ```json
//! {
//!   "_dependencies": { "strings": "strings" },
//!   "users": {
//!     "_model": "User",
//!     "admin": {
//!       "first": "Ada",
//!       "last": "Lovelace",
//!       "display": "=this.first + ' ' + this.last"
//!     }
//!   },
//!   "posts": {
//!     "_model": "Post",
//!     "hello": { "author": "->users.admin", "title": "hello world" }
//!   }
//! }
//! ```
//!
//! String scalars are classified by prefix:
//!
//! - `->group.key.field` — a **reference**, resolved against records already
//!   created in the current run. References never point forward; groups and
//!   keys are processed strictly in declaration order.
//! - `=expression` — an **expression**, evaluated in a restricted sandbox
//!   with the loaded dependencies and `this` (the enclosing record's raw
//!   fields) in scope. An expression that fails to evaluate degrades to its
//!   literal source text instead of aborting the run.
//! - anything else — a literal.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use seedbed::prelude::*;
//!
//! let seeder = Seeder::without_modules(Arc::new(backend));
//! let spec = SeedSpec::from_path(Path::new("fixtures/seed.json"))?;
//! let result = seeder.seed(&spec, SeedOptions::default()).await?;
//! let admin_id = &result.record("users", "admin").unwrap()["_id"];
//! ```
//!
//! # Collaborators
//!
//! The engine depends on two narrow contracts and nothing else:
//! [`SeedBackend`] (model lookup, create, drop operations) and
//! [`ModuleLoader`] (resolving `_dependencies` identifiers into values
//! callable from expressions). Both are trait objects, so any storage
//! technology can sit behind them.
//!
//! # Features
//!
//! - `json` - JSON spec files (enabled by default)
//! - `yaml` - YAML spec files
//! - `full` - all of the above

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backend;
mod env;
pub mod error;
pub mod expr;
mod options;
pub mod prelude;
mod resolve;
mod runner;
pub mod spec;
mod store;

pub use backend::{ID_FIELD, ModelHandle, ModuleError, ModuleLoader, NoModules, SeedBackend};
pub use env::{DEPENDENCIES_KEY, ScriptEnv};
pub use error::{SeedingError, SeedingResult};
pub use expr::{ExprValue, NativeFn};
pub use options::SeedOptions;
pub use resolve::{EXPRESSION_PREFIX, REFERENCE_PREFIX};
pub use runner::Seeder;
pub use spec::{MODEL_KEY, SeedSpec, SpecFormat};
pub use store::ResultStore;
