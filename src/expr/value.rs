//! Runtime values for seed expressions.
//!
//! [`ExprValue`] mirrors the JSON data model and adds a native-function
//! variant so loaded modules can expose callable helpers to expressions.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::EvalError;

/// Native function callable from seed expressions.
pub type NativeFn = Arc<dyn Fn(&[ExprValue]) -> Result<ExprValue, EvalError> + Send + Sync>;

/// A value produced or consumed by the expression evaluator.
#[derive(Clone)]
pub enum ExprValue {
	/// JSON null.
	Null,
	/// Boolean.
	Bool(bool),
	/// Number; all arithmetic is performed on f64.
	Number(f64),
	/// String.
	String(String),
	/// Ordered sequence.
	Array(Vec<ExprValue>),
	/// Ordered mapping.
	Object(IndexMap<String, ExprValue>),
	/// Native function provided by a loaded module.
	Function(NativeFn),
}

impl ExprValue {
	/// Wraps a native function.
	pub fn function<F>(f: F) -> Self
	where
		F: Fn(&[ExprValue]) -> Result<ExprValue, EvalError> + Send + Sync + 'static,
	{
		Self::Function(Arc::new(f))
	}

	/// Builds a module object from named members.
	pub fn module<I>(members: I) -> Self
	where
		I: IntoIterator<Item = (String, ExprValue)>,
	{
		Self::Object(members.into_iter().collect())
	}

	/// JavaScript-style truthiness: `false`, `null`, `0`, `NaN` and the
	/// empty string are falsy, everything else is truthy.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Null => false,
			Self::Bool(b) => *b,
			Self::Number(n) => *n != 0.0 && !n.is_nan(),
			Self::String(s) => !s.is_empty(),
			Self::Array(_) | Self::Object(_) | Self::Function(_) => true,
		}
	}

	/// Short type name used in error messages.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "boolean",
			Self::Number(_) => "number",
			Self::String(_) => "string",
			Self::Array(_) => "array",
			Self::Object(_) => "object",
			Self::Function(_) => "function",
		}
	}

	/// Converts a JSON value into an expression value.
	pub fn from_json(value: &Value) -> Self {
		match value {
			Value::Null => Self::Null,
			Value::Bool(b) => Self::Bool(*b),
			Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
			Value::String(s) => Self::String(s.clone()),
			Value::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
			Value::Object(map) => Self::Object(
				map.iter()
					.map(|(k, v)| (k.clone(), Self::from_json(v)))
					.collect(),
			),
		}
	}

	/// Converts the value back into JSON.
	///
	/// Integral finite numbers render as JSON integers. Non-finite numbers
	/// and functions have no JSON form and fail the evaluation.
	pub fn into_json(self) -> Result<Value, EvalError> {
		match self {
			Self::Null => Ok(Value::Null),
			Self::Bool(b) => Ok(Value::Bool(b)),
			Self::Number(n) => number_to_json(n),
			Self::String(s) => Ok(Value::String(s)),
			Self::Array(items) => Ok(Value::Array(
				items
					.into_iter()
					.map(Self::into_json)
					.collect::<Result<_, _>>()?,
			)),
			Self::Object(map) => {
				let mut out = serde_json::Map::new();
				for (key, value) in map {
					out.insert(key, value.into_json()?);
				}
				Ok(Value::Object(out))
			}
			Self::Function(_) => Err(EvalError::Type(
				"a function cannot be used as a field value".to_string(),
			)),
		}
	}

	/// String rendering used by `+` concatenation.
	pub fn to_display(&self) -> String {
		match self {
			Self::Null => "null".to_string(),
			Self::Bool(b) => b.to_string(),
			Self::Number(n) => format_number(*n),
			Self::String(s) => s.clone(),
			Self::Array(_) => "[array]".to_string(),
			Self::Object(_) => "[object]".to_string(),
			Self::Function(_) => "[function]".to_string(),
		}
	}
}

fn number_to_json(n: f64) -> Result<Value, EvalError> {
	if !n.is_finite() {
		return Err(EvalError::Type(format!("number '{n}' has no JSON form")));
	}
	// 2^53 bounds exact integer representation
	if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
		Ok(Value::Number((n as i64).into()))
	} else {
		serde_json::Number::from_f64(n)
			.map(Value::Number)
			.ok_or_else(|| EvalError::Type(format!("number '{n}' has no JSON form")))
	}
}

fn format_number(n: f64) -> String {
	if n.fract() == 0.0 && n.is_finite() && n.abs() < 9_007_199_254_740_992.0 {
		format!("{}", n as i64)
	} else {
		format!("{n}")
	}
}

impl fmt::Debug for ExprValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => write!(f, "Null"),
			Self::Bool(b) => write!(f, "Bool({b})"),
			Self::Number(n) => write!(f, "Number({n})"),
			Self::String(s) => write!(f, "String({s:?})"),
			Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
			Self::Object(map) => f.debug_tuple("Object").field(map).finish(),
			Self::Function(_) => write!(f, "Function(..)"),
		}
	}
}

impl PartialEq for ExprValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Number(a), Self::Number(b)) => a == b,
			(Self::String(a), Self::String(b)) => a == b,
			(Self::Array(a), Self::Array(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => a == b,
			// Functions have no meaningful equality
			_ => false,
		}
	}
}
