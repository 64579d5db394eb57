//! Created-record store for one seeding run.

use indexmap::IndexMap;
use serde_json::Value;

/// Records created during a single run, keyed `[group][key]`.
///
/// Append-only and owned by exactly one run; groups and keys iterate in
/// creation order, which equals the spec's declaration order. References
/// (`->group.key`) resolve against this store, so an entry existing is what
/// makes a reference valid.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResultStore {
	groups: IndexMap<String, IndexMap<String, Value>>,
}

impl ResultStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a created record under `[group][key]`.
	pub(crate) fn insert(&mut self, group: &str, key: &str, record: Value) {
		self.groups
			.entry(group.to_string())
			.or_default()
			.insert(key.to_string(), record);
	}

	/// Returns a group's records, if any record of it has been created.
	pub fn group(&self, name: &str) -> Option<&IndexMap<String, Value>> {
		self.groups.get(name).filter(|records| !records.is_empty())
	}

	/// Returns one created record.
	pub fn record(&self, group: &str, key: &str) -> Option<&Value> {
		self.groups.get(group)?.get(key)
	}

	/// Iterates groups in creation order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<String, Value>)> {
		self.groups.iter().map(|(name, records)| (name.as_str(), records))
	}

	/// Total number of created records across all groups.
	pub fn len(&self) -> usize {
		self.groups.values().map(IndexMap::len).sum()
	}

	/// Returns true if no records were created.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
