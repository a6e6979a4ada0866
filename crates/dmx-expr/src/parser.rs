use crate::ast::{BinOp, Expr, Var};
use crate::error::ExprError;
use crate::functions::Function;
use crate::lexer::Token;

/// Recursion depth cap on the parser itself, mirroring the evaluator's cap
/// so a pathologically nested expression is rejected before it is ever
/// evaluated.
const MAX_DEPTH: usize = 64;

pub struct Parser {
	tokens: Vec<Token>,
	pos: usize,
}

pub fn parse(input: &str) -> Result<Expr, ExprError> {
	let tokens = crate::lexer::tokenize(input)?;
	let mut parser = Parser { tokens, pos: 0 };
	let expr = parser.parse_expr(0)?;
	if parser.pos != parser.tokens.len() {
		return Err(ExprError::TrailingInput);
	}
	Ok(expr)
}

impl Parser {
	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.pos)
	}

	fn advance(&mut self) -> Option<Token> {
		let tok = self.tokens.get(self.pos).cloned();
		self.pos += 1;
		tok
	}

	fn expect(&mut self, token: &Token) -> Result<(), ExprError> {
		if self.peek() == Some(token) {
			self.pos += 1;
			Ok(())
		} else {
			Err(ExprError::ExpectedToken(format!("{token:?}")))
		}
	}

	fn check_depth(depth: usize) -> Result<(), ExprError> {
		if depth > MAX_DEPTH {
			return Err(ExprError::RecursionLimitExceeded(MAX_DEPTH));
		}
		Ok(())
	}

	// expr := term (('+' | '-') term)*
	fn parse_expr(&mut self, depth: usize) -> Result<Expr, ExprError> {
		Self::check_depth(depth)?;
		let mut lhs = self.parse_term(depth + 1)?;
		loop {
			match self.peek() {
				Some(Token::Plus) => {
					self.advance();
					let rhs = self.parse_term(depth + 1)?;
					lhs = Expr::BinOp(BinOp::Add, Box::new(lhs), Box::new(rhs));
				}
				Some(Token::Minus) => {
					self.advance();
					let rhs = self.parse_term(depth + 1)?;
					lhs = Expr::BinOp(BinOp::Sub, Box::new(lhs), Box::new(rhs));
				}
				_ => break,
			}
		}
		Ok(lhs)
	}

	// term := unary (('*' | '/' | '%') unary)*
	fn parse_term(&mut self, depth: usize) -> Result<Expr, ExprError> {
		Self::check_depth(depth)?;
		let mut lhs = self.parse_unary(depth + 1)?;
		loop {
			match self.peek() {
				Some(Token::Star) => {
					self.advance();
					let rhs = self.parse_unary(depth + 1)?;
					lhs = Expr::BinOp(BinOp::Mul, Box::new(lhs), Box::new(rhs));
				}
				Some(Token::Slash) => {
					self.advance();
					let rhs = self.parse_unary(depth + 1)?;
					lhs = Expr::BinOp(BinOp::Div, Box::new(lhs), Box::new(rhs));
				}
				Some(Token::Percent) => {
					self.advance();
					let rhs = self.parse_unary(depth + 1)?;
					lhs = Expr::BinOp(BinOp::Rem, Box::new(lhs), Box::new(rhs));
				}
				_ => break,
			}
		}
		Ok(lhs)
	}

	// unary := '-' unary | postfix
	fn parse_unary(&mut self, depth: usize) -> Result<Expr, ExprError> {
		Self::check_depth(depth)?;
		if self.peek() == Some(&Token::Minus) {
			self.advance();
			let inner = self.parse_unary(depth + 1)?;
			return Ok(Expr::Neg(Box::new(inner)));
		}
		self.parse_postfix(depth + 1)
	}

	// postfix := primary ('[' INT ']')*
	fn parse_postfix(&mut self, depth: usize) -> Result<Expr, ExprError> {
		Self::check_depth(depth)?;
		let mut expr = self.parse_primary(depth + 1)?;
		let mut indexed = false;
		while self.peek() == Some(&Token::LBracket) {
			self.advance();
			let index = match self.advance() {
				Some(Token::Number(n)) if n.fract() == 0.0 && n >= 0.0 => n as usize,
				_ => return Err(ExprError::ExpectedToken("integer index".into())),
			};
			self.expect(&Token::RBracket)?;
			if index > 2 {
				return Err(ExprError::IndexOutOfRange(index));
			}
			let is_tuple_call = matches!(&expr, Expr::Call(f, _) if f.returns_tuple());
			if !is_tuple_call {
				return Err(ExprError::IndexOnScalar);
			}
			expr = Expr::Index(Box::new(expr), index);
			indexed = true;
		}
		if let Expr::Call(f, _) = &expr {
			if f.returns_tuple() && !indexed {
				return Err(ExprError::TupleCallRequiresIndex(f.name().to_string()));
			}
		}
		Ok(expr)
	}

	// primary := NUMBER | IDENT | IDENT '(' args ')' | '(' expr ')'
	fn parse_primary(&mut self, depth: usize) -> Result<Expr, ExprError> {
		Self::check_depth(depth)?;
		match self.advance() {
			Some(Token::Number(n)) => Ok(Expr::Number(n)),
			Some(Token::LParen) => {
				let inner = self.parse_expr(depth + 1)?;
				self.expect(&Token::RParen)?;
				Ok(inner)
			}
			Some(Token::Ident(name)) => self.parse_ident(&name, depth),
			Some(other) => Err(ExprError::ExpectedToken(format!("{other:?}"))),
			None => Err(ExprError::UnexpectedEnd),
		}
	}

	fn parse_ident(&mut self, name: &str, depth: usize) -> Result<Expr, ExprError> {
		if self.peek() == Some(&Token::LParen) {
			let function = Function::lookup(name).ok_or_else(|| ExprError::UnknownIdentifier(name.to_string()))?;
			self.advance();
			let args = self.parse_args(depth + 1)?;
			function.check_arity(args.len())?;
			return Ok(Expr::Call(function, args));
		}

		match name {
			"t" => Ok(Expr::Var(Var::T)),
			"p" => Ok(Expr::Var(Var::P)),
			_ => Err(ExprError::UnknownIdentifier(name.to_string())),
		}
	}

	fn parse_args(&mut self, depth: usize) -> Result<Vec<Expr>, ExprError> {
		let mut args = Vec::new();
		if self.peek() == Some(&Token::RParen) {
			self.advance();
			return Ok(args);
		}
		loop {
			args.push(self.parse_expr(depth + 1)?);
			match self.advance() {
				Some(Token::Comma) => continue,
				Some(Token::RParen) => break,
				_ => return Err(ExprError::ExpectedToken(")".into())),
			}
		}
		Ok(args)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_arithmetic_with_precedence() {
		let expr = parse("1 + 2 * 3").unwrap();
		assert_eq!(
			expr,
			Expr::BinOp(
				BinOp::Add,
				Box::new(Expr::Number(1.0)),
				Box::new(Expr::BinOp(BinOp::Mul, Box::new(Expr::Number(2.0)), Box::new(Expr::Number(3.0)))),
			)
		);
	}

	#[test]
	fn parses_function_calls() {
		let expr = parse("clamp_dmx(255*sin(t))").unwrap();
		assert!(matches!(expr, Expr::Call(Function::ClampDmx, _)));
	}

	#[test]
	fn rejects_unknown_function() {
		assert!(matches!(parse("eval(t)"), Err(ExprError::UnknownIdentifier(_))));
	}

	#[test]
	fn rejects_unknown_bare_identifier() {
		assert!(matches!(parse("x + 1"), Err(ExprError::UnknownIdentifier(_))));
	}

	#[test]
	fn allows_subscript_on_hsv_to_rgb() {
		let expr = parse("hsv_to_rgb(t, 1, 1)[0]").unwrap();
		assert!(matches!(expr, Expr::Index(_, 0)));
	}

	#[test]
	fn rejects_subscript_on_scalar() {
		assert!(matches!(parse("sin(t)[0]"), Err(ExprError::IndexOnScalar)));
	}

	#[test]
	fn rejects_subscript_out_of_range() {
		assert!(matches!(parse("hsv_to_rgb(t,1,1)[3]"), Err(ExprError::IndexOutOfRange(3))));
	}

	#[test]
	fn rejects_bare_tuple_call_without_index() {
		assert!(matches!(parse("hsv_to_rgb(t,1,1)"), Err(ExprError::TupleCallRequiresIndex(_))));
	}

	#[test]
	fn rejects_arity_mismatch() {
		assert!(matches!(parse("sin(t, p)"), Err(ExprError::ArityMismatch(..))));
	}

	#[test]
	fn rejects_trailing_input() {
		assert!(matches!(parse("1 + 1 2"), Err(ExprError::TrailingInput)));
	}
}
