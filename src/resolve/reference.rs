//! Resolution of `->` reference paths against the run's result store.

use serde_json::Value;

use crate::backend::ID_FIELD;
use crate::error::{SeedingError, SeedingResult};
use crate::store::ResultStore;

/// Resolves a dotted reference path (without its `->` marker).
///
/// The first segment selects a group; because records are created strictly
/// in declaration order, a group with no entries means the reference is
/// either unknown or points forward, and both fail with `ReferenceNotFound`.
/// Every later segment must exist — a missing segment is a fatal
/// `PropertyNotFound`, never a silent empty value.
///
/// A path terminating on a non-array object yields that object's generated
/// identifier; scalars and arrays are returned verbatim.
pub(crate) fn resolve(path: &str, store: &ResultStore) -> SeedingResult<Value> {
	let mut segments = path.split('.');
	let group_name = segments.next().unwrap_or_default();

	let records = store
		.group(group_name)
		.ok_or_else(|| SeedingError::ReferenceNotFound {
			path: path.to_string(),
		})?;

	let mut current: &Value = match segments.next() {
		Some(key) => records.get(key).ok_or_else(|| SeedingError::PropertyNotFound {
			path: path.to_string(),
			segment: key.to_string(),
		})?,
		// Bare group path: the group mapping itself has no identifier
		None => {
			return Err(SeedingError::MissingIdentifier {
				path: path.to_string(),
				id_field: ID_FIELD,
			});
		}
	};

	for segment in segments {
		let next = match current {
			Value::Object(map) => map.get(segment),
			// Numeric segments index into arrays, matching plain property
			// lookup semantics on the original document shape
			Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
			_ => None,
		};
		current = next.ok_or_else(|| SeedingError::PropertyNotFound {
			path: path.to_string(),
			segment: segment.to_string(),
		})?;
	}

	match current {
		Value::Object(map) => map.get(ID_FIELD).cloned().ok_or_else(|| {
			SeedingError::MissingIdentifier {
				path: path.to_string(),
				id_field: ID_FIELD,
			}
		}),
		other => Ok(other.clone()),
	}
}
