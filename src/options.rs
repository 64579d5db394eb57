//! Run options and drop-policy normalization.

use serde::{Deserialize, Serialize};

/// Options controlling what is cleared before a seeding run.
///
/// Defaults drop the whole database and leave individual collections alone.
/// Deserializes from configuration with the same defaults, so a partial
/// `{"drop_collections": true}` entry is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedOptions {
	/// Drop the entire database before seeding. Defaults to `true`.
	pub drop_database: bool,

	/// Drop each affected collection just before its group is seeded.
	/// Defaults to `false`.
	pub drop_collections: bool,
}

impl Default for SeedOptions {
	fn default() -> Self {
		Self {
			drop_database: true,
			drop_collections: false,
		}
	}
}

impl SeedOptions {
	/// Creates the default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the drop-database flag.
	pub fn with_drop_database(mut self, drop: bool) -> Self {
		self.drop_database = drop;
		self
	}

	/// Sets the drop-collections flag.
	pub fn with_drop_collections(mut self, drop: bool) -> Self {
		self.drop_collections = drop;
		self
	}

	/// Applies the mutual-exclusivity rule.
	///
	/// Dropping collections is the more specific request; when both flags
	/// are set it wins and the database-wide drop is suppressed.
	pub(crate) fn normalized(self) -> Self {
		if self.drop_collections {
			Self {
				drop_database: false,
				..self
			}
		} else {
			self
		}
	}
}
