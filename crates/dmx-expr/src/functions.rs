use crate::error::ExprError;

/// The closed set of callable functions. Anything not listed here is
/// rejected at parse time — this is the entire injection surface of the
/// evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
	Sin,
	Cos,
	Tan,
	Abs,
	Min,
	Max,
	Round,
	Sqrt,
	Pow,
	Floor,
	Ceil,
	Log,
	Exp,
	Mod,
	Clamp,
	ClampDmx,
	HsvToRgb,
	HsvToRgbR,
	HsvToRgbG,
	HsvToRgbB,
}

impl Function {
	pub fn lookup(name: &str) -> Option<Self> {
		Some(match name {
			"sin" => Self::Sin,
			"cos" => Self::Cos,
			"tan" => Self::Tan,
			"abs" => Self::Abs,
			"min" => Self::Min,
			"max" => Self::Max,
			"round" => Self::Round,
			"sqrt" => Self::Sqrt,
			"pow" => Self::Pow,
			"floor" => Self::Floor,
			"ceil" => Self::Ceil,
			"log" => Self::Log,
			"exp" => Self::Exp,
			"mod" => Self::Mod,
			"clamp" => Self::Clamp,
			"clamp_dmx" => Self::ClampDmx,
			"hsv_to_rgb" => Self::HsvToRgb,
			"hsv_to_rgb_r" => Self::HsvToRgbR,
			"hsv_to_rgb_g" => Self::HsvToRgbG,
			"hsv_to_rgb_b" => Self::HsvToRgbB,
			_ => return None,
		})
	}

	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Self::Sin => "sin",
			Self::Cos => "cos",
			Self::Tan => "tan",
			Self::Abs => "abs",
			Self::Min => "min",
			Self::Max => "max",
			Self::Round => "round",
			Self::Sqrt => "sqrt",
			Self::Pow => "pow",
			Self::Floor => "floor",
			Self::Ceil => "ceil",
			Self::Log => "log",
			Self::Exp => "exp",
			Self::Mod => "mod",
			Self::Clamp => "clamp",
			Self::ClampDmx => "clamp_dmx",
			Self::HsvToRgb | Self::HsvToRgbR | Self::HsvToRgbG | Self::HsvToRgbB => "hsv_to_rgb",
		}
	}

	#[must_use]
	pub fn arity(self) -> usize {
		match self {
			Self::Sin | Self::Cos | Self::Tan | Self::Abs | Self::Round | Self::Sqrt | Self::Floor | Self::Ceil | Self::Log | Self::Exp | Self::ClampDmx => 1,
			Self::Min | Self::Max | Self::Pow | Self::Mod => 2,
			Self::Clamp => 3,
			Self::HsvToRgb | Self::HsvToRgbR | Self::HsvToRgbG | Self::HsvToRgbB => 3,
		}
	}

	/// Whether this call produces a 3-tuple instead of a scalar.
	#[must_use]
	pub fn returns_tuple(self) -> bool {
		matches!(self, Self::HsvToRgb)
	}

	pub fn check_arity(self, got: usize) -> Result<(), ExprError> {
		if got != self.arity() {
			return Err(ExprError::ArityMismatch(self.name().to_string(), self.arity(), got));
		}
		Ok(())
	}

	/// Evaluate a scalar-returning function. `hsv_to_rgb` itself is handled
	/// by the evaluator via [`hsv_to_rgb`] since it returns a tuple.
	#[must_use]
	pub fn apply_scalar(self, args: &[f64]) -> f64 {
		match self {
			Self::Sin => args[0].sin(),
			Self::Cos => args[0].cos(),
			Self::Tan => args[0].tan(),
			Self::Abs => args[0].abs(),
			Self::Min => args[0].min(args[1]),
			Self::Max => args[0].max(args[1]),
			Self::Round => args[0].round(),
			Self::Sqrt => args[0].sqrt(),
			Self::Pow => args[0].powf(args[1]),
			Self::Floor => args[0].floor(),
			Self::Ceil => args[0].ceil(),
			Self::Log => args[0].ln(),
			Self::Exp => args[0].exp(),
			Self::Mod => safe_rem(args[0], args[1]),
			Self::Clamp => args[0].clamp(args[1].min(args[2]), args[1].max(args[2])),
			Self::ClampDmx => args[0].round().clamp(0.0, 255.0),
			Self::HsvToRgbR => hsv_to_rgb(args[0], args[1], args[2])[0],
			Self::HsvToRgbG => hsv_to_rgb(args[0], args[1], args[2])[1],
			Self::HsvToRgbB => hsv_to_rgb(args[0], args[1], args[2])[2],
			Self::HsvToRgb => unreachable!("hsv_to_rgb is a tuple function, handled separately"),
		}
	}
}

/// `a % b`, treating a divide-by-zero the way the rest of the grammar does:
/// yield 0 instead of NaN.
#[must_use]
pub fn safe_rem(a: f64, b: f64) -> f64 {
	if b == 0.0 {
		0.0
	} else {
		a % b
	}
}

/// `a / b`, yielding 0 on division by zero instead of propagating inf/NaN.
#[must_use]
pub fn safe_div(a: f64, b: f64) -> f64 {
	if b == 0.0 {
		0.0
	} else {
		a / b
	}
}

/// `h` in degrees, `s`/`v` in `[0, 1]`. Returns `[r, g, b]` each in
/// `[0, 255]`.
#[must_use]
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
	let h = h.rem_euclid(360.0);
	let s = s.clamp(0.0, 1.0);
	let v = v.clamp(0.0, 1.0);

	let c = v * s;
	let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
	let m = v - c;

	let (r1, g1, b1) = match h {
		h if h < 60.0 => (c, x, 0.0),
		h if h < 120.0 => (x, c, 0.0),
		h if h < 180.0 => (0.0, c, x),
		h if h < 240.0 => (0.0, x, c),
		h if h < 300.0 => (x, 0.0, c),
		_ => (c, 0.0, x),
	};

	[((r1 + m) * 255.0).round(), ((g1 + m) * 255.0).round(), ((b1 + m) * 255.0).round()]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hsv_red_at_zero_degrees() {
		let rgb = hsv_to_rgb(0.0, 1.0, 1.0);
		assert_eq!(rgb, [255.0, 0.0, 0.0]);
	}

	#[test]
	fn hsv_white_at_zero_saturation() {
		let rgb = hsv_to_rgb(200.0, 0.0, 1.0);
		assert_eq!(rgb, [255.0, 255.0, 255.0]);
	}

	#[test]
	fn mod_by_zero_is_zero() {
		assert_eq!(safe_rem(5.0, 0.0), 0.0);
	}

	#[test]
	fn lookup_rejects_unknown_names() {
		assert!(Function::lookup("eval").is_none());
		assert!(Function::lookup("system").is_none());
	}
}
