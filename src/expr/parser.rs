//! Recursive-descent parser for the seed expression grammar.
//!
//! Precedence, lowest to highest: `||`, `&&`, equality, comparison,
//! additive, multiplicative, unary, postfix (member/index/call), primary.

use super::EvalError;
use super::lexer::Token;

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
	Null,
	Bool(bool),
	Number(f64),
	Str(String),
	/// Dependency alias lookup.
	Ident(String),
	/// The enclosing record binding.
	This,
	Member(Box<Expr>, String),
	Index(Box<Expr>, Box<Expr>),
	Call(Box<Expr>, Vec<Expr>),
	Unary(UnOp, Box<Expr>),
	Binary(BinOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnOp {
	Neg,
	Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
	Add,
	Sub,
	Mul,
	Div,
	Rem,
	Eq,
	NotEq,
	Lt,
	LtEq,
	Gt,
	GtEq,
	And,
	Or,
}

/// Parses a token stream into an expression tree.
///
/// Fails if the stream is empty or has trailing tokens.
pub(crate) fn parse(tokens: Vec<Token>) -> Result<Expr, EvalError> {
	let mut parser = Parser { tokens, pos: 0 };
	let expr = parser.or_expr()?;
	if parser.pos < parser.tokens.len() {
		return Err(parser.unexpected("end of expression"));
	}
	Ok(expr)
}

struct Parser {
	tokens: Vec<Token>,
	pos: usize,
}

impl Parser {
	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.pos)
	}

	fn advance(&mut self) -> Option<Token> {
		let token = self.tokens.get(self.pos).cloned();
		if token.is_some() {
			self.pos += 1;
		}
		token
	}

	fn eat(&mut self, token: &Token) -> bool {
		if self.peek() == Some(token) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	fn expect(&mut self, token: Token, wanted: &str) -> Result<(), EvalError> {
		if self.eat(&token) {
			Ok(())
		} else {
			Err(self.unexpected(wanted))
		}
	}

	fn unexpected(&self, wanted: &str) -> EvalError {
		EvalError::Parse {
			at: self.pos,
			message: match self.peek() {
				Some(token) => format!("expected {wanted}, found {token:?}"),
				None => format!("expected {wanted}, found end of input"),
			},
		}
	}

	fn or_expr(&mut self) -> Result<Expr, EvalError> {
		let mut left = self.and_expr()?;
		while self.eat(&Token::OrOr) {
			let right = self.and_expr()?;
			left = Expr::Binary(BinOp::Or, Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	fn and_expr(&mut self) -> Result<Expr, EvalError> {
		let mut left = self.equality()?;
		while self.eat(&Token::AndAnd) {
			let right = self.equality()?;
			left = Expr::Binary(BinOp::And, Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	fn equality(&mut self) -> Result<Expr, EvalError> {
		let mut left = self.comparison()?;
		loop {
			let op = match self.peek() {
				Some(Token::EqEq) => BinOp::Eq,
				Some(Token::NotEq) => BinOp::NotEq,
				_ => break,
			};
			self.pos += 1;
			let right = self.comparison()?;
			left = Expr::Binary(op, Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	fn comparison(&mut self) -> Result<Expr, EvalError> {
		let mut left = self.additive()?;
		loop {
			let op = match self.peek() {
				Some(Token::Lt) => BinOp::Lt,
				Some(Token::LtEq) => BinOp::LtEq,
				Some(Token::Gt) => BinOp::Gt,
				Some(Token::GtEq) => BinOp::GtEq,
				_ => break,
			};
			self.pos += 1;
			let right = self.additive()?;
			left = Expr::Binary(op, Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	fn additive(&mut self) -> Result<Expr, EvalError> {
		let mut left = self.multiplicative()?;
		loop {
			let op = match self.peek() {
				Some(Token::Plus) => BinOp::Add,
				Some(Token::Minus) => BinOp::Sub,
				_ => break,
			};
			self.pos += 1;
			let right = self.multiplicative()?;
			left = Expr::Binary(op, Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	fn multiplicative(&mut self) -> Result<Expr, EvalError> {
		let mut left = self.unary()?;
		loop {
			let op = match self.peek() {
				Some(Token::Star) => BinOp::Mul,
				Some(Token::Slash) => BinOp::Div,
				Some(Token::Percent) => BinOp::Rem,
				_ => break,
			};
			self.pos += 1;
			let right = self.unary()?;
			left = Expr::Binary(op, Box::new(left), Box::new(right));
		}
		Ok(left)
	}

	fn unary(&mut self) -> Result<Expr, EvalError> {
		if self.eat(&Token::Minus) {
			let operand = self.unary()?;
			Ok(Expr::Unary(UnOp::Neg, Box::new(operand)))
		} else if self.eat(&Token::Bang) {
			let operand = self.unary()?;
			Ok(Expr::Unary(UnOp::Not, Box::new(operand)))
		} else {
			self.postfix()
		}
	}

	fn postfix(&mut self) -> Result<Expr, EvalError> {
		let mut expr = self.primary()?;
		loop {
			if self.eat(&Token::Dot) {
				let name = match self.advance() {
					Some(Token::Ident(name)) => name,
					_ => return Err(self.unexpected("property name after '.'")),
				};
				expr = Expr::Member(Box::new(expr), name);
			} else if self.eat(&Token::LBracket) {
				let index = self.or_expr()?;
				self.expect(Token::RBracket, "']'")?;
				expr = Expr::Index(Box::new(expr), Box::new(index));
			} else if self.eat(&Token::LParen) {
				let mut args = Vec::new();
				if !self.eat(&Token::RParen) {
					loop {
						args.push(self.or_expr()?);
						if self.eat(&Token::Comma) {
							continue;
						}
						self.expect(Token::RParen, "')'")?;
						break;
					}
				}
				expr = Expr::Call(Box::new(expr), args);
			} else {
				break;
			}
		}
		Ok(expr)
	}

	fn primary(&mut self) -> Result<Expr, EvalError> {
		match self.advance() {
			Some(Token::Number(n)) => Ok(Expr::Number(n)),
			Some(Token::Str(s)) => Ok(Expr::Str(s)),
			Some(Token::True) => Ok(Expr::Bool(true)),
			Some(Token::False) => Ok(Expr::Bool(false)),
			Some(Token::Null) => Ok(Expr::Null),
			Some(Token::This) => Ok(Expr::This),
			Some(Token::Ident(name)) => Ok(Expr::Ident(name)),
			Some(Token::LParen) => {
				let expr = self.or_expr()?;
				self.expect(Token::RParen, "')'")?;
				Ok(expr)
			}
			_ => {
				self.pos = self.pos.saturating_sub(1);
				Err(self.unexpected("an expression"))
			}
		}
	}
}
