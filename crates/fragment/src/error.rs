/// Fragment source parse failures. Offsets are byte positions into the source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FragmentError {
	#[error("no implementor assignments found")]
	NoAssignments,

	#[error("expected {expected} at byte {offset}")]
	Expected { expected: &'static str, offset: usize },

	#[error("unterminated string literal starting at byte {offset}")]
	UnterminatedString { offset: usize },

	#[error("invalid escape sequence at byte {offset}")]
	InvalidEscape { offset: usize },
}
