use crate::error::CommandError;

/// `dmx/set/channel/{n}` payload: an integer 0-255, nothing else.
pub(crate) fn parse_dmx_value(payload: &str) -> Result<u8, CommandError> {
	payload
		.trim()
		.parse::<u16>()
		.ok()
		.filter(|v| *v <= 255)
		.map(|v| v as u8)
		.ok_or_else(|| CommandError::InvalidInput(format!("expected 0..=255, got {payload:?}")))
}

/// `dmx/scene/{name}` payload: float seconds, or empty meaning "no transition".
pub(crate) fn parse_transition_seconds(payload: &str) -> Result<f64, CommandError> {
	let trimmed = payload.trim();
	if trimmed.is_empty() {
		return Ok(0.0);
	}
	trimmed
		.parse::<f64>()
		.ok()
		.filter(|v| v.is_finite() && *v >= 0.0)
		.ok_or_else(|| CommandError::InvalidInput(format!("expected a non-negative transition time, got {trimmed:?}")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_dmx_value_in_range() {
		assert_eq!(parse_dmx_value("0").unwrap(), 0);
		assert_eq!(parse_dmx_value("255").unwrap(), 255);
		assert!(parse_dmx_value("256").is_err());
		assert!(parse_dmx_value("-1").is_err());
		assert!(parse_dmx_value("abc").is_err());
	}

	#[test]
	fn empty_transition_means_zero() {
		assert_eq!(parse_transition_seconds("").unwrap(), 0.0);
		assert_eq!(parse_transition_seconds("  ").unwrap(), 0.0);
	}

	#[test]
	fn rejects_negative_transition() {
		assert!(parse_transition_seconds("-2.5").is_err());
	}
}
