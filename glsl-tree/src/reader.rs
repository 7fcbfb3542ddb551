//! A cursor over a token array, used by the parser to speculatively match grammar productions.

use crate::{
	lexer::{Token, TokenType},
	SyntaxError,
};

/// A cursor over a vector of [`Token`]s.
///
/// The reader is stateful only through its cursor. Any production can save the cursor with
/// [`cursor()`](Self::cursor()) and restore it with [`set_cursor()`](Self::set_cursor()), although the usual way is
/// to wrap the production in [`attempt()`](Self::attempt()), which restores the cursor automatically when the
/// production does not match.
///
/// Failed productions can record a reason with [`mark_error()`](Self::mark_error()). These diagnostics are only
/// surfaced if parsing ultimately fails, as the causes of the error produced by
/// [`throw_error()`](Self::throw_error()).
#[derive(Debug, Clone)]
pub struct TokenReader {
	tokens: Vec<Token>,
	/// The index of the current token.
	cursor: usize,
	/// The furthest the cursor has ever been advanced to since the last [`commit()`](Self::commit()).
	furthest: usize,
	/// Diagnostics marked since the last [`commit()`](Self::commit()).
	diagnostics: Vec<SyntaxError>,
}

impl TokenReader {
	/// Constructs a new reader, with the cursor at the first token.
	pub fn new(tokens: Vec<Token>) -> Self {
		Self {
			tokens,
			cursor: 0,
			furthest: 0,
			diagnostics: Vec::new(),
		}
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	/// Returns the index of the current token.
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Moves the cursor to the given token index.
	pub fn set_cursor(&mut self, cursor: usize) {
		self.cursor = cursor.min(self.tokens.len());
		self.furthest = self.furthest.max(self.cursor);
	}

	/// Returns whether at least `n` more tokens can be read.
	pub fn can_read(&self, n: usize) -> bool {
		self.cursor + n <= self.tokens.len()
	}

	/// Returns whether all of the tokens have been consumed.
	pub fn is_done(&self) -> bool {
		self.cursor >= self.tokens.len()
	}

	/// Returns the token `offset` places after the cursor, without advancing.
	pub fn peek(&self, offset: usize) -> Option<&Token> {
		self.tokens.get(self.cursor + offset)
	}

	/// Returns the type of the token `offset` places after the cursor, without advancing.
	pub fn peek_type(&self, offset: usize) -> Option<TokenType> {
		self.peek(offset).map(Token::ty)
	}

	/// Advances the cursor by one token.
	pub fn skip(&mut self) {
		self.set_cursor(self.cursor + 1);
	}

	/// Consumes the given sequence of token types if, and only if, all of them match. On a partial match the
	/// cursor is left unchanged.
	pub fn try_consume(&mut self, types: &[TokenType]) -> bool {
		if !self.can_read(types.len()) {
			return false;
		}
		let matches = types
			.iter()
			.enumerate()
			.all(|(i, ty)| self.peek_type(i) == Some(*ty));
		if matches {
			self.set_cursor(self.cursor + types.len());
		}
		matches
	}

	/// Consumes an identifier, returning its name.
	pub fn try_consume_ident(&mut self) -> Option<String> {
		let token = self.peek(0)?;
		if token.ty() != TokenType::Ident {
			return None;
		}
		let name = token.value().to_owned();
		self.skip();
		Some(name)
	}

	/// Consumes a token of the given type.
	///
	/// # Errors
	/// Fails if the token under the cursor is of a different type, or if there are no more tokens.
	pub fn consume(&mut self, ty: TokenType) -> Result<&Token, SyntaxError> {
		let found = self.peek(0).map(|t| (t.ty(), t.value().to_owned()));
		match found {
			Some((found, _)) if found == ty => {
				self.skip();
				Ok(&self.tokens[self.cursor - 1])
			}
			Some((_, value)) => {
				Err(self.error(format!("Expected '{ty}', found '{value}'")))
			}
			None => Err(self.error(format!(
				"Expected '{ty}', found the end of the input"
			))),
		}
	}

	/// Runs a production. If it doesn't match, the cursor is restored to where it was beforehand.
	pub fn attempt<T>(
		&mut self,
		production: impl FnOnce(&mut Self) -> Option<T>,
	) -> Option<T> {
		let cursor = self.cursor;
		let result = production(self);
		if result.is_none() {
			self.cursor = cursor;
		}
		result
	}

	/// Records a non-fatal diagnostic at the cursor, without moving it.
	pub fn mark_error(&mut self, message: impl Into<String>) {
		let error = self.error(message);
		self.diagnostics.push(error);
	}

	/// Returns the diagnostics marked since the last [`commit()`](Self::commit()).
	pub fn diagnostics(&self) -> &[SyntaxError] {
		&self.diagnostics
	}

	/// Discards any marked diagnostics and resets the furthest position to the cursor. This is called once a
	/// top-level item has been parsed successfully, since anything recorded whilst trying alternatives for it no
	/// longer explains a later failure.
	pub fn commit(&mut self) {
		self.diagnostics.clear();
		self.furthest = self.cursor;
	}

	/// Builds an error positioned at the cursor.
	pub fn error(&self, message: impl Into<String>) -> SyntaxError {
		SyntaxError::new(message, self.source(), self.offset_of(self.cursor))
	}

	/// Returns an error combining every marked diagnostic, if any have been marked.
	///
	/// The error is positioned at the furthest token the parser managed to reach, and the diagnostics are
	/// attached as its causes.
	pub fn throw_error(&self) -> Result<(), SyntaxError> {
		if self.diagnostics.is_empty() {
			Ok(())
		} else {
			Err(self.unexpected())
		}
	}

	/// Builds an error for the furthest token the parser managed to reach, with any marked diagnostics attached.
	pub fn unexpected(&self) -> SyntaxError {
		let message = match self.tokens.get(self.furthest) {
			Some(token) => format!("Unexpected token '{}'", token.value()),
			None => "Unexpected end of input".to_owned(),
		};
		SyntaxError::new(message, self.source(), self.offset_of(self.furthest))
			.with_causes(self.diagnostics.clone())
	}

	/// Returns the reconstructed source, i.e. every token value joined by a single space.
	pub fn source(&self) -> String {
		self.tokens
			.iter()
			.map(Token::value)
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// Returns the character offset of the token at `index` within the reconstructed [`source()`](Self::source()).
	/// An index past the last token maps to the end of the source.
	pub fn offset_of(&self, index: usize) -> usize {
		let offset = self
			.tokens
			.iter()
			.take(index)
			.map(|token| token.value().chars().count() + 1)
			.sum::<usize>();
		if index >= self.tokens.len() {
			offset.saturating_sub(1)
		} else {
			offset
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lexer::{tokenize, OpTy};

	fn reader(source: &str) -> TokenReader {
		TokenReader::new(tokenize(source).unwrap())
	}

	#[test]
	fn try_consume_is_atomic() {
		let mut r = reader("int a = 5;");
		assert!(!r.try_consume(&[
			TokenType::Type(crate::ty::BuiltinType::Int),
			TokenType::Ident,
			TokenType::Semi
		]));
		assert_eq!(r.cursor(), 0);
		assert!(r.try_consume(&[
			TokenType::Type(crate::ty::BuiltinType::Int),
			TokenType::Ident,
			TokenType::Op(OpTy::Eq)
		]));
		assert_eq!(r.cursor(), 3);
		// Not enough tokens left.
		assert!(!r.try_consume(&[
			TokenType::Int(crate::lexer::IntFormat::Decimal),
			TokenType::Semi,
			TokenType::Semi
		]));
		assert_eq!(r.cursor(), 3);
	}

	#[test]
	fn peek_and_can_read() {
		let r = reader("a + b");
		assert_eq!(r.peek_type(0), Some(TokenType::Ident));
		assert_eq!(r.peek_type(1), Some(TokenType::Op(OpTy::Add)));
		assert_eq!(r.peek(2).map(Token::value), Some("b"));
		assert_eq!(r.peek(3), None);
		assert!(r.can_read(3));
		assert!(!r.can_read(4));
	}

	#[test]
	fn consume() {
		let mut r = reader("a;");
		assert_eq!(r.consume(TokenType::Ident).unwrap().value(), "a");
		let err = r.consume(TokenType::Ident).unwrap_err();
		assert_eq!(err.message, "Expected 'identifier', found ';'");
		assert_eq!(err.offset, 2);
		assert_eq!(r.cursor(), 1);
		r.skip();
		assert!(r.consume(TokenType::Semi).is_err());
	}

	#[test]
	fn attempt_restores() {
		let mut r = reader("a b c");
		let result: Option<()> = r.attempt(|r| {
			r.skip();
			r.skip();
			None
		});
		assert!(result.is_none());
		assert_eq!(r.cursor(), 0);
		let result = r.attempt(|r| r.try_consume_ident());
		assert_eq!(result.as_deref(), Some("a"));
		assert_eq!(r.cursor(), 1);
	}

	#[test]
	fn offsets() {
		let r = reader("int   a =\n\t;");
		assert_eq!(r.source(), "int a = ;");
		assert_eq!(r.offset_of(0), 0);
		assert_eq!(r.offset_of(1), 4);
		assert_eq!(r.offset_of(3), 8);
		assert_eq!(r.offset_of(4), 9);
		assert_eq!(reader("").offset_of(0), 0);
	}

	#[test]
	fn errors() {
		let mut r = reader("a b");
		assert!(r.throw_error().is_ok());
		r.skip();
		r.mark_error("Expected ';'");
		assert_eq!(r.cursor(), 1);
		r.set_cursor(0);
		let err = r.throw_error().unwrap_err();
		assert_eq!(err.message, "Unexpected token 'b'");
		assert_eq!(err.offset, 2);
		assert_eq!(err.causes.len(), 1);
		assert_eq!(err.causes[0].message, "Expected ';'");

		r.commit();
		assert!(r.throw_error().is_ok());
		assert_eq!(r.unexpected().message, "Unexpected token 'a'");
		assert!(r.error("here").causes.is_empty());
	}
}
