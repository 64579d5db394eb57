//! Tree-walking evaluator for parsed seed expressions.
//!
//! Coercion rules are JavaScript-flavored: `+` concatenates when either
//! operand is a string, `&&`/`||` return an operand rather than a bool,
//! and truthiness follows [`ExprValue::is_truthy`].

use super::EvalError;
use super::parser::{BinOp, Expr, UnOp};
use super::value::ExprValue;
use crate::env::ScriptEnv;

/// Evaluates an expression tree against the run environment and the
/// enclosing record binding (`this`).
pub(crate) fn eval(expr: &Expr, env: &ScriptEnv, this: &ExprValue) -> Result<ExprValue, EvalError> {
	match expr {
		Expr::Null => Ok(ExprValue::Null),
		Expr::Bool(b) => Ok(ExprValue::Bool(*b)),
		Expr::Number(n) => Ok(ExprValue::Number(*n)),
		Expr::Str(s) => Ok(ExprValue::String(s.clone())),
		Expr::This => Ok(this.clone()),
		Expr::Ident(name) => env
			.get(name)
			.cloned()
			.ok_or_else(|| EvalError::UnknownIdent(name.clone())),
		Expr::Member(target, name) => {
			let target = eval(target, env, this)?;
			member(&target, name)
		}
		Expr::Index(target, index) => {
			let target = eval(target, env, this)?;
			let index = eval(index, env, this)?;
			indexed(&target, &index)
		}
		Expr::Call(callee, args) => {
			let f = match eval(callee, env, this)? {
				ExprValue::Function(f) => f,
				other => return Err(EvalError::NotCallable(other.type_name().to_string())),
			};
			let args = args
				.iter()
				.map(|arg| eval(arg, env, this))
				.collect::<Result<Vec<_>, _>>()?;
			f(&args)
		}
		Expr::Unary(op, operand) => {
			let operand = eval(operand, env, this)?;
			match op {
				UnOp::Neg => match operand {
					ExprValue::Number(n) => Ok(ExprValue::Number(-n)),
					other => Err(EvalError::Type(format!(
						"cannot negate a {}",
						other.type_name()
					))),
				},
				UnOp::Not => Ok(ExprValue::Bool(!operand.is_truthy())),
			}
		}
		Expr::Binary(op, left, right) => binary(*op, left, right, env, this),
	}
}

fn member(target: &ExprValue, name: &str) -> Result<ExprValue, EvalError> {
	match target {
		ExprValue::Object(map) => map.get(name).cloned().ok_or_else(|| {
			EvalError::Type(format!("no property '{name}' on object"))
		}),
		other => Err(EvalError::Type(format!(
			"cannot read property '{name}' of {}",
			other.type_name()
		))),
	}
}

fn indexed(target: &ExprValue, index: &ExprValue) -> Result<ExprValue, EvalError> {
	match (target, index) {
		(ExprValue::Array(items), ExprValue::Number(n)) => {
			let i = *n as usize;
			if n.fract() == 0.0 && *n >= 0.0 && i < items.len() {
				Ok(items[i].clone())
			} else {
				Err(EvalError::Type(format!("index {n} out of bounds")))
			}
		}
		(ExprValue::Object(_), ExprValue::String(key)) => member(target, key),
		(target, index) => Err(EvalError::Type(format!(
			"cannot index {} with {}",
			target.type_name(),
			index.type_name()
		))),
	}
}

fn binary(
	op: BinOp,
	left: &Expr,
	right: &Expr,
	env: &ScriptEnv,
	this: &ExprValue,
) -> Result<ExprValue, EvalError> {
	// Logical operators short-circuit and return an operand, JS style
	if op == BinOp::And {
		let left = eval(left, env, this)?;
		return if left.is_truthy() { eval(right, env, this) } else { Ok(left) };
	}
	if op == BinOp::Or {
		let left = eval(left, env, this)?;
		return if left.is_truthy() { Ok(left) } else { eval(right, env, this) };
	}

	let left = eval(left, env, this)?;
	let right = eval(right, env, this)?;

	match op {
		BinOp::Add => match (&left, &right) {
			(ExprValue::String(_), _) | (_, ExprValue::String(_)) => Ok(ExprValue::String(
				format!("{}{}", left.to_display(), right.to_display()),
			)),
			(ExprValue::Number(a), ExprValue::Number(b)) => Ok(ExprValue::Number(a + b)),
			_ => Err(type_mismatch("+", &left, &right)),
		},
		BinOp::Sub => numeric(op, &left, &right, |a, b| a - b),
		BinOp::Mul => numeric(op, &left, &right, |a, b| a * b),
		BinOp::Div => numeric(op, &left, &right, |a, b| a / b),
		BinOp::Rem => numeric(op, &left, &right, |a, b| a % b),
		BinOp::Eq => Ok(ExprValue::Bool(left == right)),
		BinOp::NotEq => Ok(ExprValue::Bool(left != right)),
		BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => ordered(op, &left, &right),
		BinOp::And | BinOp::Or => unreachable!("handled above"),
	}
}

fn numeric(
	op: BinOp,
	left: &ExprValue,
	right: &ExprValue,
	f: impl Fn(f64, f64) -> f64,
) -> Result<ExprValue, EvalError> {
	match (left, right) {
		(ExprValue::Number(a), ExprValue::Number(b)) => Ok(ExprValue::Number(f(*a, *b))),
		_ => Err(type_mismatch(op_symbol(op), left, right)),
	}
}

fn ordered(op: BinOp, left: &ExprValue, right: &ExprValue) -> Result<ExprValue, EvalError> {
	let ordering = match (left, right) {
		(ExprValue::Number(a), ExprValue::Number(b)) => a.partial_cmp(b),
		(ExprValue::String(a), ExprValue::String(b)) => Some(a.cmp(b)),
		_ => return Err(type_mismatch(op_symbol(op), left, right)),
	};
	let Some(ordering) = ordering else {
		return Ok(ExprValue::Bool(false));
	};
	Ok(ExprValue::Bool(match op {
		BinOp::Lt => ordering.is_lt(),
		BinOp::LtEq => ordering.is_le(),
		BinOp::Gt => ordering.is_gt(),
		BinOp::GtEq => ordering.is_ge(),
		_ => unreachable!(),
	}))
}

fn op_symbol(op: BinOp) -> &'static str {
	match op {
		BinOp::Add => "+",
		BinOp::Sub => "-",
		BinOp::Mul => "*",
		BinOp::Div => "/",
		BinOp::Rem => "%",
		BinOp::Eq => "==",
		BinOp::NotEq => "!=",
		BinOp::Lt => "<",
		BinOp::LtEq => "<=",
		BinOp::Gt => ">",
		BinOp::GtEq => ">=",
		BinOp::And => "&&",
		BinOp::Or => "||",
	}
}

fn type_mismatch(op: &str, left: &ExprValue, right: &ExprValue) -> EvalError {
	EvalError::Type(format!(
		"'{op}' not defined for {} and {}",
		left.type_name(),
		right.type_name()
	))
}
