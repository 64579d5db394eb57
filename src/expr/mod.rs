//! Sandboxed evaluator for `=` expressions.
//!
//! Seed expressions run in a restricted, embedded grammar rather than a
//! host-language `eval`: literals, arithmetic, string concatenation,
//! comparisons, property access and calls over exactly two binding sources,
//! the run's dependency environment and `this` (the enclosing record's raw
//! field mapping). There is no assignment, no control flow and no access to
//! anything outside those bindings.
//!
//! Evaluation failures never abort a run; the caller degrades the field to
//! its literal source text (see [`crate::resolve`]).

mod eval;
mod lexer;
mod parser;
mod value;

pub use value::{ExprValue, NativeFn};

use serde_json::Value;
use thiserror::Error;

use crate::env::ScriptEnv;

/// Non-fatal expression evaluation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
	/// The source text did not lex or parse.
	#[error("parse error at offset {at}: {message}")]
	Parse {
		/// Byte (lexing) or token (parsing) offset of the failure.
		at: usize,
		/// Human-readable description.
		message: String,
	},

	/// An identifier matched neither a dependency alias nor `this`.
	#[error("unknown identifier '{0}'")]
	UnknownIdent(String),

	/// A call target was not a function.
	#[error("{0} is not callable")]
	NotCallable(String),

	/// Operand or operand combination was invalid.
	#[error("type error: {0}")]
	Type(String),

	/// A module-provided function reported a failure.
	#[error("function error: {0}")]
	Function(String),
}

/// Evaluates expression source text (without its leading `=` marker).
///
/// `this` is the enclosing record's *unresolved* field mapping, converted
/// once per record by the value resolver. Sibling fields therefore appear
/// with their raw values, markers included.
pub(crate) fn evaluate(
	source: &str,
	env: &ScriptEnv,
	this: &ExprValue,
) -> Result<Value, EvalError> {
	let tokens = lexer::tokenize(source)?;
	let ast = parser::parse(tokens)?;
	eval::eval(&ast, env, this)?.into_json()
}
