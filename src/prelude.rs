//! Convenience re-exports for common usage.
//!
//! # Example
//!
//! ```ignore
//! use seedbed::prelude::*;
//!
//! let seeder = Seeder::new(backend, modules);
//! let result = seeder.seed(&spec, SeedOptions::default()).await?;
//! ```

// Error types
pub use crate::error::{SeedingError, SeedingResult};

// Spec input
pub use crate::spec::{SeedSpec, SpecFormat};

// Run surface
pub use crate::options::SeedOptions;
pub use crate::runner::Seeder;
pub use crate::store::ResultStore;

// Collaborator contracts
pub use crate::backend::{ID_FIELD, ModelHandle, ModuleError, ModuleLoader, NoModules, SeedBackend};

// Expression values for module authors
pub use crate::expr::{EvalError, ExprValue, NativeFn};
