//! The error type produced by the lexer and the parser.

/// A syntax error.
///
/// Lexing errors are positioned within the original source string. Parsing errors are positioned within the
/// reconstructed source, i.e. the token values joined by a single space, which is what
/// [`full_source`](Self::full_source) holds in that case.
///
/// When the parser fails after having attempted several alternatives, the reasons recorded along the way are
/// attached as [`causes`](Self::causes). These are secondary; the error itself points at the furthest position the
/// parser managed to reach.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("{message} at position {offset}")]
pub struct SyntaxError {
	/// A human-readable description.
	pub message: String,
	/// The source the offset refers to.
	pub full_source: String,
	/// The character offset into `full_source`.
	pub offset: usize,
	/// Diagnostics recorded during speculative parsing, in the order they were marked.
	pub causes: Vec<SyntaxError>,
}

impl SyntaxError {
	/// Constructs a new error with no causes.
	pub fn new(
		message: impl Into<String>,
		full_source: impl Into<String>,
		offset: usize,
	) -> Self {
		Self {
			message: message.into(),
			full_source: full_source.into(),
			offset,
			causes: Vec::new(),
		}
	}

	/// Attaches secondary causes to this error.
	pub fn with_causes(mut self, causes: Vec<SyntaxError>) -> Self {
		self.causes = causes;
		self
	}

	/// Returns the line and column (both starting at 1) of the error within [`full_source`](Self::full_source).
	pub fn line_col(&self) -> (usize, usize) {
		let mut line = 1;
		let mut col = 1;
		for c in self.full_source.chars().take(self.offset) {
			if c == '\n' {
				line += 1;
				col = 1;
			} else {
				col += 1;
			}
		}
		(line, col)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display() {
		let err = SyntaxError::new("Unexpected token ';'", "int a = ;", 8);
		assert_eq!(err.to_string(), "Unexpected token ';' at position 8");
		assert!(err.causes.is_empty());
	}

	#[test]
	fn line_col() {
		let err = SyntaxError::new("Invalid character '@'", "int a;\nint @;", 11);
		assert_eq!(err.line_col(), (2, 5));
		let err = SyntaxError::new("Invalid character '@'", "@", 0);
		assert_eq!(err.line_col(), (1, 1));
	}
}
