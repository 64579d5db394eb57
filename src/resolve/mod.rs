//! Recursive resolution of fixture values.
//!
//! A string scalar is classified by prefix alone — `=` dispatches to the
//! expression evaluator, `->` to the reference resolver, anything else
//! passes through as a literal. No syntax validation happens before
//! dispatch. Nested mappings recurse depth-first and sequences resolve
//! element-wise, preserving order and length.

mod reference;

use serde_json::{Map, Value};

use crate::env::ScriptEnv;
use crate::error::SeedingResult;
use crate::expr::{self, ExprValue};
use crate::store::ResultStore;

/// Marker prefix for reference scalars.
pub const REFERENCE_PREFIX: &str = "->";

/// Marker prefix for expression scalars.
pub const EXPRESSION_PREFIX: &str = "=";

/// Resolves one record's fields into their final persisted form.
///
/// The record's own unresolved mapping doubles as the expression context:
/// `this` inside an expression sees sibling fields exactly as declared,
/// markers and all, regardless of whether they were already resolved.
pub(crate) fn resolve_record(
	fields: &Map<String, Value>,
	store: &ResultStore,
	env: &ScriptEnv,
) -> SeedingResult<Map<String, Value>> {
	let context = ExprValue::from_json(&Value::Object(fields.clone()));
	let mut resolved = Map::new();
	for (name, value) in fields {
		resolved.insert(name.clone(), resolve_value(value, &context, store, env)?);
	}
	Ok(resolved)
}

fn resolve_value(
	value: &Value,
	context: &ExprValue,
	store: &ResultStore,
	env: &ScriptEnv,
) -> SeedingResult<Value> {
	match value {
		Value::Object(map) => {
			let mut resolved = Map::new();
			for (name, nested) in map {
				resolved.insert(name.clone(), resolve_value(nested, context, store, env)?);
			}
			Ok(Value::Object(resolved))
		}
		Value::Array(items) => Ok(Value::Array(
			items
				.iter()
				.map(|item| resolve_value(item, context, store, env))
				.collect::<SeedingResult<_>>()?,
		)),
		Value::String(s) => resolve_scalar(s, context, store, env),
		other => Ok(other.clone()),
	}
}

fn resolve_scalar(
	scalar: &str,
	context: &ExprValue,
	store: &ResultStore,
	env: &ScriptEnv,
) -> SeedingResult<Value> {
	if let Some(path) = scalar.strip_prefix(REFERENCE_PREFIX) {
		return reference::resolve(path, store);
	}
	if let Some(source) = scalar.strip_prefix(EXPRESSION_PREFIX) {
		return Ok(match expr::evaluate(source, env, context) {
			Ok(value) => value,
			// Failed expressions degrade to their literal source text,
			// leading marker included; the run continues.
			Err(error) => {
				tracing::warn!(expression = scalar, %error, "expression degraded to literal");
				Value::String(scalar.to_string())
			}
		});
	}
	Ok(Value::String(scalar.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn fields(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			_ => unreachable!(),
		}
	}

	#[rstest]
	fn test_literals_pass_through() {
		let store = ResultStore::new();
		let env = ScriptEnv::new();
		let record = fields(json!({"name": "plain", "age": 3, "flag": true, "none": null}));

		let resolved = resolve_record(&record, &store, &env).unwrap();
		assert_eq!(Value::Object(resolved), json!({"name": "plain", "age": 3, "flag": true, "none": null}));
	}

	#[rstest]
	fn test_nested_structures_resolve_depth_first() {
		let mut store = ResultStore::new();
		store.insert("users", "admin", json!({"_id": 7}));
		let env = ScriptEnv::new();
		let record = fields(json!({
			"meta": {"owner": "->users.admin", "labels": ["=1+1", "x"]},
		}));

		let resolved = resolve_record(&record, &store, &env).unwrap();
		assert_eq!(
			Value::Object(resolved),
			json!({"meta": {"owner": 7, "labels": [2, "x"]}})
		);
	}

	#[rstest]
	fn test_sequence_order_and_length_preserved() {
		let store = ResultStore::new();
		let env = ScriptEnv::new();
		let record = fields(json!({"values": ["=3*3", "literal", "=2+2"]}));

		let resolved = resolve_record(&record, &store, &env).unwrap();
		assert_eq!(resolved["values"], json!([9, "literal", 4]));
	}

	#[rstest]
	fn test_invalid_expression_degrades_to_source_text() {
		let store = ResultStore::new();
		let env = ScriptEnv::new();
		let record = fields(json!({"bad": "=foo(", "good": "=1+1"}));

		let resolved = resolve_record(&record, &store, &env).unwrap();
		assert_eq!(resolved["bad"], json!("=foo("));
		assert_eq!(resolved["good"], json!(2));
	}

	#[rstest]
	fn test_expression_sees_unresolved_siblings() {
		let store = ResultStore::new();
		let env = ScriptEnv::new();
		// "combined" reads a sibling that is itself an expression; it must
		// observe the raw marker text, not the resolved number
		let record = fields(json!({
			"combined": "='got ' + this.total",
			"total": "=1+1",
		}));

		let resolved = resolve_record(&record, &store, &env).unwrap();
		assert_eq!(resolved["combined"], json!("got =1+1"));
		assert_eq!(resolved["total"], json!(2));
	}

	#[rstest]
	fn test_reference_failure_is_fatal() {
		let store = ResultStore::new();
		let env = ScriptEnv::new();
		let record = fields(json!({"owner": "->users.admin"}));

		let err = resolve_record(&record, &store, &env).unwrap_err();
		assert!(matches!(err, crate::SeedingError::ReferenceNotFound { .. }));
	}

	#[rstest]
	fn test_arrow_inside_text_is_literal() {
		let store = ResultStore::new();
		let env = ScriptEnv::new();
		let record = fields(json!({"note": "a -> b"}));

		let resolved = resolve_record(&record, &store, &env).unwrap();
		assert_eq!(resolved["note"], json!("a -> b"));
	}
}
