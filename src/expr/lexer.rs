//! Tokenizer for the seed expression grammar.

use super::EvalError;

/// A single expression token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
	Number(f64),
	Str(String),
	Ident(String),
	This,
	True,
	False,
	Null,
	Plus,
	Minus,
	Star,
	Slash,
	Percent,
	Bang,
	LParen,
	RParen,
	LBracket,
	RBracket,
	Dot,
	Comma,
	EqEq,
	NotEq,
	Lt,
	LtEq,
	Gt,
	GtEq,
	AndAnd,
	OrOr,
}

/// Tokenizes an expression source string.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, EvalError> {
	let bytes = source.as_bytes();
	let mut tokens = Vec::new();
	let mut pos = 0;

	while pos < bytes.len() {
		let c = bytes[pos] as char;
		match c {
			' ' | '\t' | '\r' | '\n' => pos += 1,
			'+' => {
				tokens.push(Token::Plus);
				pos += 1;
			}
			'-' => {
				tokens.push(Token::Minus);
				pos += 1;
			}
			'*' => {
				tokens.push(Token::Star);
				pos += 1;
			}
			'/' => {
				tokens.push(Token::Slash);
				pos += 1;
			}
			'%' => {
				tokens.push(Token::Percent);
				pos += 1;
			}
			'(' => {
				tokens.push(Token::LParen);
				pos += 1;
			}
			')' => {
				tokens.push(Token::RParen);
				pos += 1;
			}
			'[' => {
				tokens.push(Token::LBracket);
				pos += 1;
			}
			']' => {
				tokens.push(Token::RBracket);
				pos += 1;
			}
			'.' => {
				tokens.push(Token::Dot);
				pos += 1;
			}
			',' => {
				tokens.push(Token::Comma);
				pos += 1;
			}
			'=' if bytes.get(pos + 1) == Some(&b'=') => {
				tokens.push(Token::EqEq);
				pos += 2;
			}
			'!' if bytes.get(pos + 1) == Some(&b'=') => {
				tokens.push(Token::NotEq);
				pos += 2;
			}
			'!' => {
				tokens.push(Token::Bang);
				pos += 1;
			}
			'<' if bytes.get(pos + 1) == Some(&b'=') => {
				tokens.push(Token::LtEq);
				pos += 2;
			}
			'<' => {
				tokens.push(Token::Lt);
				pos += 1;
			}
			'>' if bytes.get(pos + 1) == Some(&b'=') => {
				tokens.push(Token::GtEq);
				pos += 2;
			}
			'>' => {
				tokens.push(Token::Gt);
				pos += 1;
			}
			'&' if bytes.get(pos + 1) == Some(&b'&') => {
				tokens.push(Token::AndAnd);
				pos += 2;
			}
			'|' if bytes.get(pos + 1) == Some(&b'|') => {
				tokens.push(Token::OrOr);
				pos += 2;
			}
			'\'' | '"' => {
				let (s, next) = lex_string(source, pos, c)?;
				tokens.push(Token::Str(s));
				pos = next;
			}
			'0'..='9' => {
				let (n, next) = lex_number(source, pos)?;
				tokens.push(Token::Number(n));
				pos = next;
			}
			c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
				let (word, next) = lex_ident(source, pos);
				tokens.push(match word.as_str() {
					"this" => Token::This,
					"true" => Token::True,
					"false" => Token::False,
					"null" => Token::Null,
					_ => Token::Ident(word),
				});
				pos = next;
			}
			other => {
				return Err(EvalError::Parse {
					at: pos,
					message: format!("unexpected character '{other}'"),
				});
			}
		}
	}

	Ok(tokens)
}

fn lex_string(source: &str, start: usize, quote: char) -> Result<(String, usize), EvalError> {
	let bytes = source.as_bytes();
	let mut out = String::new();
	let mut pos = start + 1;

	while pos < bytes.len() {
		let c = bytes[pos] as char;
		match c {
			'\\' => {
				let escaped = bytes
					.get(pos + 1)
					.map(|b| *b as char)
					.ok_or_else(|| EvalError::Parse {
						at: pos,
						message: "dangling escape".to_string(),
					})?;
				out.push(match escaped {
					'n' => '\n',
					't' => '\t',
					'\\' => '\\',
					'\'' => '\'',
					'"' => '"',
					other => {
						return Err(EvalError::Parse {
							at: pos,
							message: format!("unknown escape '\\{other}'"),
						});
					}
				});
				pos += 2;
			}
			c if c == quote => return Ok((out, pos + 1)),
			_ => {
				// Multi-byte characters pass through untouched
				let ch = source[pos..].chars().next().ok_or_else(|| EvalError::Parse {
					at: pos,
					message: "unterminated string".to_string(),
				})?;
				out.push(ch);
				pos += ch.len_utf8();
			}
		}
	}

	Err(EvalError::Parse {
		at: start,
		message: "unterminated string".to_string(),
	})
}

fn lex_number(source: &str, start: usize) -> Result<(f64, usize), EvalError> {
	let bytes = source.as_bytes();
	let mut pos = start;
	let mut seen_dot = false;

	while pos < bytes.len() {
		match bytes[pos] {
			b'0'..=b'9' => pos += 1,
			// A dot only belongs to the number when a digit follows;
			// "1.toString" style member access is not part of the grammar.
			b'.' if !seen_dot && matches!(bytes.get(pos + 1), Some(b'0'..=b'9')) => {
				seen_dot = true;
				pos += 1;
			}
			_ => break,
		}
	}

	source[start..pos].parse::<f64>().map(|n| (n, pos)).map_err(|e| EvalError::Parse {
		at: start,
		message: format!("invalid number: {e}"),
	})
}

fn lex_ident(source: &str, start: usize) -> (String, usize) {
	let bytes = source.as_bytes();
	let mut pos = start;
	while pos < bytes.len() {
		let c = bytes[pos] as char;
		if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
			pos += 1;
		} else {
			break;
		}
	}
	(source[start..pos].to_string(), pos)
}
