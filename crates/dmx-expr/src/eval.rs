use crate::ast::{BinOp, Expr, Var};
use crate::error::ExprError;
use crate::functions::{hsv_to_rgb, safe_div, safe_rem, Function};

const MAX_DEPTH: usize = 64;

/// The two free variables every expression may reference.
#[derive(Debug, Clone, Copy)]
pub struct Vars {
	pub t: f64,
	pub p: f64,
}

pub fn eval(expr: &Expr, vars: Vars) -> Result<f64, ExprError> {
	eval_depth(expr, vars, 0)
}

fn eval_depth(expr: &Expr, vars: Vars, depth: usize) -> Result<f64, ExprError> {
	if depth > MAX_DEPTH {
		return Err(ExprError::RecursionLimitExceeded(MAX_DEPTH));
	}

	let value = match expr {
		Expr::Number(n) => *n,
		Expr::Var(Var::T) => vars.t,
		Expr::Var(Var::P) => vars.p,
		Expr::Neg(inner) => -eval_depth(inner, vars, depth + 1)?,
		Expr::BinOp(op, lhs, rhs) => {
			let l = eval_depth(lhs, vars, depth + 1)?;
			let r = eval_depth(rhs, vars, depth + 1)?;
			match op {
				BinOp::Add => l + r,
				BinOp::Sub => l - r,
				BinOp::Mul => l * r,
				BinOp::Div => safe_div(l, r),
				BinOp::Rem => safe_rem(l, r),
			}
		}
		Expr::Call(function, args) => {
			debug_assert!(!function.returns_tuple(), "tuple calls must be reached through Expr::Index");
			let values = eval_args(args, vars, depth)?;
			function.apply_scalar(&values)
		}
		Expr::Index(inner, index) => eval_tuple_index(inner, *index, vars, depth)?,
	};

	Ok(if value.is_finite() { value } else { 0.0 })
}

fn eval_args(args: &[Expr], vars: Vars, depth: usize) -> Result<Vec<f64>, ExprError> {
	args.iter().map(|a| eval_depth(a, vars, depth + 1)).collect()
}

fn eval_tuple_index(inner: &Expr, index: usize, vars: Vars, depth: usize) -> Result<f64, ExprError> {
	let Expr::Call(Function::HsvToRgb, args) = inner else {
		// The parser never builds this shape, but stay defensive rather
		// than panicking on a malformed AST.
		return Ok(0.0);
	};
	let values = eval_args(args, vars, depth)?;
	let rgb = hsv_to_rgb(values[0], values[1], values[2]);
	Ok(rgb[index])
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser::parse;

	fn vars(t: f64, p: f64) -> Vars {
		Vars { t, p }
	}

	#[test]
	fn evaluates_arithmetic() {
		let expr = parse("1 + 2 * 3").unwrap();
		assert_eq!(eval(&expr, vars(0.0, 0.0)).unwrap(), 7.0);
	}

	#[test]
	fn evaluates_time_varying_sine() {
		let expr = parse("255*sin(t)").unwrap();
		let v = eval(&expr, vars(std::f64::consts::FRAC_PI_2, 0.0)).unwrap();
		assert!((v - 255.0).abs() < 1e-6);
	}

	#[test]
	fn division_by_zero_yields_zero() {
		let expr = parse("1 / (t - t)").unwrap();
		assert_eq!(eval(&expr, vars(5.0, 0.0)).unwrap(), 0.0);
	}

	#[test]
	fn non_finite_results_collapse_to_zero() {
		let expr = parse("log(-1)").unwrap();
		assert_eq!(eval(&expr, vars(0.0, 0.0)).unwrap(), 0.0);
	}

	#[test]
	fn hsv_tuple_index_returns_component() {
		let expr = parse("hsv_to_rgb(0, 1, 1)[0]").unwrap();
		assert_eq!(eval(&expr, vars(0.0, 0.0)).unwrap(), 255.0);
	}

	#[test]
	fn percent_variable_drives_clamp_dmx() {
		let expr = parse("clamp_dmx(p * 2.55)").unwrap();
		assert_eq!(eval(&expr, vars(0.0, 50.0)).unwrap(), 128.0);
	}
}
