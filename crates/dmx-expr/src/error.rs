use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExprError {
	#[error("unexpected end of expression")]
	UnexpectedEnd,
	#[error("unexpected character '{0}'")]
	UnexpectedChar(char),
	#[error("unknown identifier '{0}'")]
	UnknownIdentifier(String),
	#[error("'{0}' is not a callable function")]
	NotAFunction(String),
	#[error("'{0}' expects {1} argument(s), got {2}")]
	ArityMismatch(String, usize, usize),
	#[error("expected token '{0}'")]
	ExpectedToken(String),
	#[error("subscript index {0} is out of range; only [0],[1],[2] are valid")]
	IndexOutOfRange(usize),
	#[error("subscript indexing is only valid on a tuple-producing call such as hsv_to_rgb")]
	IndexOnScalar,
	#[error("recursion depth exceeded the limit of {0}")]
	RecursionLimitExceeded(usize),
	#[error("trailing input after a complete expression")]
	TrailingInput,
	#[error("'{0}' returns a 3-tuple; subscript it with [0], [1], or [2]")]
	TupleCallRequiresIndex(String),
}
