//! The lexer, which converts a GLSL source string into a vector of [`Token`]s.
//!
//! Whitespace and comments are discarded. Preprocessor directives are kept verbatim as a single
//! [`Directive`](TokenType::Directive) token per (logical) line, since the parser only needs to recognise the
//! `#version` directive and reproduce the rest as-is.
//!
//! The longest possible tokens are produced even if they form an invalid expression. For example, `i---7` is
//! lexed as `(i) (--) (-) (7)`.

use crate::{
	node::{AssignmentOp, UnaryOp},
	ty::{BuiltinType, Interpolation, Precision, StorageQualifier},
	SyntaxError,
};

/// Parses a GLSL source string into a vector of tokens.
///
/// # Errors
/// Lexing is not recoverable; the first invalid character, unterminated block comment or malformed number aborts
/// with a [`SyntaxError`] positioned within `source`.
///
/// # Examples
/// ```rust
/// # use glsl_tree::lexer::{tokenize, TokenType};
/// let tokens = tokenize("int i = 5 + 1; // comment").unwrap();
/// assert_eq!(tokens.len(), 7);
/// assert_eq!(tokens[3].ty(), TokenType::Int(glsl_tree::lexer::IntFormat::Decimal));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
	let mut lexer = Lexer::new(source);
	let mut tokens = Vec::new();

	// Directives must exist at the start of a line, barring any whitespace.
	let mut can_start_directive = true;

	while let Some(current) = lexer.peek() {
		let start = lexer.position();

		if is_word_start(&current) {
			can_start_directive = false;
			let word = lexer.take_while(is_word);
			tokens.push(match_word(word));
		} else if current.is_ascii_digit()
			|| (current == '.'
				&& lexer.lookahead_1().map_or(false, |c| c.is_ascii_digit()))
		{
			can_start_directive = false;
			tokens.push(lex_number(&mut lexer)?);
		} else if lexer.take_pat("//") {
			lexer.take_while(|c| *c != '\r' && *c != '\n');
		} else if lexer.take_pat("/*") {
			loop {
				if lexer.take_pat("*/") {
					break;
				}
				if lexer.next().is_none() {
					return Err(lexer.error("Unterminated block comment", start));
				}
			}
		} else if is_punctuation_start(&current) {
			can_start_directive = false;
			tokens.push(match_punctuation(&mut lexer));
		} else if current.is_whitespace() {
			if current == '\r' || current == '\n' {
				can_start_directive = true;
			}
			lexer.advance();
		} else if current == '#' && can_start_directive {
			tokens.push(lex_directive(&mut lexer));
		} else {
			return Err(
				lexer.error(format!("Invalid character '{current}'"), start)
			);
		}
	}

	Ok(tokens)
}

/// A token representing a unit of text in the GLSL source string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
	ty: TokenType,
	value: String,
}

impl Token {
	pub fn new(ty: TokenType, value: impl Into<String>) -> Self {
		Self {
			ty,
			value: value.into(),
		}
	}

	/// The type of this token.
	pub fn ty(&self) -> TokenType {
		self.ty
	}

	/// The text of this token exactly as it appeared in the source, e.g. `0x1Fu` or `#version 450 core`.
	pub fn value(&self) -> &str {
		&self.value
	}
}

/// The radix an integer literal was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IntFormat {
	Decimal,
	Hexadecimal,
	Octal,
}

/// The type of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenType {
	/// A signed integer, e.g. `1`, `0xA9C`, `07113`.
	Int(IntFormat),
	/// An unsigned integer, e.g. `517u`.
	UInt(IntFormat),
	/// A floating-point number, e.g. `7.3e-2`, `.015LF`.
	Float,
	/// Either `true` or `false`.
	Bool,
	/// An identifier, e.g. `foo_bar`, `_900_a`.
	Ident,
	/// A whole preprocessor directive line, e.g. `#version 450 core`.
	Directive,
	/// A word reserved for future use, e.g. `class`.
	Reserved,
	/// A builtin type keyword, e.g. `vec3`.
	Type(BuiltinType),
	/* KEYWORDS */
	If,
	Else,
	For,
	Do,
	While,
	Continue,
	Switch,
	Case,
	Default,
	Break,
	Return,
	Discard,
	Struct,
	Subroutine,
	Precision,
	/* QUALIFIERS */
	Const,
	In,
	Out,
	InOut,
	Attribute,
	Uniform,
	Varying,
	Buffer,
	Shared,
	Centroid,
	Sample,
	Patch,
	Layout,
	Flat,
	Smooth,
	NoPerspective,
	HighP,
	MediumP,
	LowP,
	Invariant,
	Precise,
	Coherent,
	Volatile,
	Restrict,
	Readonly,
	Writeonly,
	/// An operator symbol.
	Op(OpTy),
	/* PUNCTUATION */
	/// `,`
	Comma,
	/// `.`
	Dot,
	/// `;`
	Semi,
	/// `:`
	Colon,
	/// `?`
	Question,
	/// `(`
	LParen,
	/// `)`
	RParen,
	/// `[`
	LBracket,
	/// `]`
	RBracket,
	/// `{`
	LBrace,
	/// `}`
	RBrace,
}

/// A mathematical/comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OpTy {
	/// `+`
	Add,
	/// `-`
	Sub,
	/// `*`
	Mul,
	/// `/`
	Div,
	/// `%`
	Rem,
	/// `&`
	And,
	/// `|`
	Or,
	/// `^`
	Xor,
	/// `<<`
	LShift,
	/// `>>`
	RShift,
	/// `~`
	Flip,
	/// `=`
	Eq,
	/// `++`
	AddAdd,
	/// `--`
	SubSub,
	/// `+=`
	AddEq,
	/// `-=`
	SubEq,
	/// `*=`
	MulEq,
	/// `/=`
	DivEq,
	/// `%=`
	RemEq,
	/// `&=`
	AndEq,
	/// `|=`
	OrEq,
	/// `^=`
	XorEq,
	/// `<<=`
	LShiftEq,
	/// `>>=`
	RShiftEq,
	/// `==`
	EqEq,
	/// `!=`
	NotEq,
	/// `!`
	Not,
	/// `>`
	Gt,
	/// `<`
	Lt,
	/// `>=`
	Ge,
	/// `<=`
	Le,
	/// `&&`
	AndAnd,
	/// `||`
	OrOr,
	/// `^^`
	XorXor,
}

bitflags::bitflags! {
	/// The families of token types, as reported by [`TokenType::classes()`].
	pub struct TokenClass: u32 {
		const LITERAL = 1 << 0;
		const IDENTIFIER = 1 << 1;
		const DIRECTIVE = 1 << 2;
		const KEYWORD = 1 << 3;
		const BUILTIN_TYPE = 1 << 4;
		const STORAGE_QUALIFIER = 1 << 5;
		const PRECISION_QUALIFIER = 1 << 6;
		const INTERPOLATION_QUALIFIER = 1 << 7;
		/// `layout`, `invariant` and `precise`.
		const AUXILIARY_QUALIFIER = 1 << 8;
		const OPERATOR = 1 << 9;
		const UNARY_OPERATOR = 1 << 10;
		const ASSIGNMENT_OPERATOR = 1 << 11;
		const PUNCTUATION = 1 << 12;
		const QUALIFIER = Self::STORAGE_QUALIFIER.bits
			| Self::PRECISION_QUALIFIER.bits
			| Self::INTERPOLATION_QUALIFIER.bits
			| Self::AUXILIARY_QUALIFIER.bits;
	}
}

impl TokenType {
	/// Returns the unary operator this token introduces, if any. `++`/`--` map to their prefix forms.
	pub fn as_unary_operator(&self) -> Option<UnaryOp> {
		match self {
			Self::Op(OpTy::AddAdd) => Some(UnaryOp::PreIncrement),
			Self::Op(OpTy::SubSub) => Some(UnaryOp::PreDecrement),
			Self::Op(OpTy::Add) => Some(UnaryOp::Plus),
			Self::Op(OpTy::Sub) => Some(UnaryOp::Dash),
			Self::Op(OpTy::Not) => Some(UnaryOp::Bang),
			Self::Op(OpTy::Flip) => Some(UnaryOp::Tilde),
			_ => None,
		}
	}

	/// Returns the assignment operator this token represents, if any.
	pub fn as_assignment_operator(&self) -> Option<AssignmentOp> {
		match self {
			Self::Op(OpTy::Eq) => Some(AssignmentOp::Equal),
			Self::Op(OpTy::MulEq) => Some(AssignmentOp::Multiply),
			Self::Op(OpTy::DivEq) => Some(AssignmentOp::Divide),
			Self::Op(OpTy::RemEq) => Some(AssignmentOp::Modulo),
			Self::Op(OpTy::AddEq) => Some(AssignmentOp::Add),
			Self::Op(OpTy::SubEq) => Some(AssignmentOp::Subtract),
			Self::Op(OpTy::LShiftEq) => Some(AssignmentOp::LeftShift),
			Self::Op(OpTy::RShiftEq) => Some(AssignmentOp::RightShift),
			Self::Op(OpTy::AndEq) => Some(AssignmentOp::And),
			Self::Op(OpTy::XorEq) => Some(AssignmentOp::Xor),
			Self::Op(OpTy::OrEq) => Some(AssignmentOp::Or),
			_ => None,
		}
	}

	/// Returns the storage qualifier this token represents, if any. `subroutine` produces an empty type-name list.
	pub fn as_storage_qualifier(&self) -> Option<StorageQualifier> {
		match self {
			Self::Const => Some(StorageQualifier::Const),
			Self::In => Some(StorageQualifier::In),
			Self::Out => Some(StorageQualifier::Out),
			Self::InOut => Some(StorageQualifier::InOut),
			Self::Centroid => Some(StorageQualifier::Centroid),
			Self::Patch => Some(StorageQualifier::Patch),
			Self::Sample => Some(StorageQualifier::Sample),
			Self::Uniform => Some(StorageQualifier::Uniform),
			Self::Buffer => Some(StorageQualifier::Buffer),
			Self::Shared => Some(StorageQualifier::Shared),
			Self::Coherent => Some(StorageQualifier::Coherent),
			Self::Volatile => Some(StorageQualifier::Volatile),
			Self::Restrict => Some(StorageQualifier::Restrict),
			Self::Readonly => Some(StorageQualifier::Readonly),
			Self::Writeonly => Some(StorageQualifier::Writeonly),
			Self::Attribute => Some(StorageQualifier::Attribute),
			Self::Varying => Some(StorageQualifier::Varying),
			Self::Subroutine => Some(StorageQualifier::Subroutine(Vec::new())),
			_ => None,
		}
	}

	/// Returns the interpolation qualifier this token represents, if any.
	pub fn as_interpolation_qualifier(&self) -> Option<Interpolation> {
		match self {
			Self::Smooth => Some(Interpolation::Smooth),
			Self::Flat => Some(Interpolation::Flat),
			Self::NoPerspective => Some(Interpolation::NoPerspective),
			_ => None,
		}
	}

	/// Returns the precision qualifier this token represents, if any.
	pub fn as_precision_qualifier(&self) -> Option<Precision> {
		match self {
			Self::HighP => Some(Precision::HighP),
			Self::MediumP => Some(Precision::MediumP),
			Self::LowP => Some(Precision::LowP),
			_ => None,
		}
	}

	/// Returns the builtin type this token represents, if any.
	pub fn as_builtin_type(&self) -> Option<BuiltinType> {
		match self {
			Self::Type(ty) => Some(*ty),
			_ => None,
		}
	}

	/// Returns the families this token type belongs to.
	pub fn classes(&self) -> TokenClass {
		let mut classes = match self {
			Self::Int(_) | Self::UInt(_) | Self::Float | Self::Bool => {
				TokenClass::LITERAL
			}
			Self::Ident => TokenClass::IDENTIFIER,
			Self::Directive => TokenClass::DIRECTIVE,
			Self::Type(_) => TokenClass::KEYWORD | TokenClass::BUILTIN_TYPE,
			Self::Layout | Self::Invariant | Self::Precise => {
				TokenClass::KEYWORD | TokenClass::AUXILIARY_QUALIFIER
			}
			Self::Op(_) => TokenClass::OPERATOR,
			Self::Comma
			| Self::Dot
			| Self::Semi
			| Self::Colon
			| Self::Question
			| Self::LParen
			| Self::RParen
			| Self::LBracket
			| Self::RBracket
			| Self::LBrace
			| Self::RBrace => TokenClass::PUNCTUATION,
			_ => TokenClass::KEYWORD,
		};
		if self.as_storage_qualifier().is_some() {
			classes |= TokenClass::STORAGE_QUALIFIER;
		}
		if self.as_precision_qualifier().is_some() {
			classes |= TokenClass::PRECISION_QUALIFIER;
		}
		if self.as_interpolation_qualifier().is_some() {
			classes |= TokenClass::INTERPOLATION_QUALIFIER;
		}
		if self.as_unary_operator().is_some() {
			classes |= TokenClass::UNARY_OPERATOR;
		}
		if self.as_assignment_operator().is_some() {
			classes |= TokenClass::ASSIGNMENT_OPERATOR;
		}
		classes
	}
}

impl std::fmt::Display for TokenType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Int(_) | Self::UInt(_) => write!(f, "integer"),
			Self::Float => write!(f, "float"),
			Self::Bool => write!(f, "boolean"),
			Self::Ident => write!(f, "identifier"),
			Self::Directive => write!(f, "directive"),
			Self::Reserved => write!(f, "reserved word"),
			Self::Type(ty) => write!(f, "{}", ty.name()),
			Self::If => write!(f, "if"),
			Self::Else => write!(f, "else"),
			Self::For => write!(f, "for"),
			Self::Do => write!(f, "do"),
			Self::While => write!(f, "while"),
			Self::Continue => write!(f, "continue"),
			Self::Switch => write!(f, "switch"),
			Self::Case => write!(f, "case"),
			Self::Default => write!(f, "default"),
			Self::Break => write!(f, "break"),
			Self::Return => write!(f, "return"),
			Self::Discard => write!(f, "discard"),
			Self::Struct => write!(f, "struct"),
			Self::Subroutine => write!(f, "subroutine"),
			Self::Precision => write!(f, "precision"),
			Self::Layout => write!(f, "layout"),
			Self::Invariant => write!(f, "invariant"),
			Self::Precise => write!(f, "precise"),
			Self::Op(op) => write!(f, "{}", op.symbol()),
			Self::Comma => write!(f, ","),
			Self::Dot => write!(f, "."),
			Self::Semi => write!(f, ";"),
			Self::Colon => write!(f, ":"),
			Self::Question => write!(f, "?"),
			Self::LParen => write!(f, "("),
			Self::RParen => write!(f, ")"),
			Self::LBracket => write!(f, "["),
			Self::RBracket => write!(f, "]"),
			Self::LBrace => write!(f, "{{"),
			Self::RBrace => write!(f, "}}"),
			qualifier => {
				if let Some(q) = qualifier.as_storage_qualifier() {
					write!(f, "{}", q.keyword())
				} else if let Some(q) = qualifier.as_precision_qualifier() {
					write!(f, "{}", q.keyword())
				} else if let Some(q) = qualifier.as_interpolation_qualifier() {
					write!(f, "{}", q.keyword())
				} else {
					write!(f, "{qualifier:?}")
				}
			}
		}
	}
}

impl OpTy {
	/// Returns the symbol of this operator.
	pub fn symbol(&self) -> &'static str {
		match self {
			Self::Add => "+",
			Self::Sub => "-",
			Self::Mul => "*",
			Self::Div => "/",
			Self::Rem => "%",
			Self::And => "&",
			Self::Or => "|",
			Self::Xor => "^",
			Self::LShift => "<<",
			Self::RShift => ">>",
			Self::Flip => "~",
			Self::Eq => "=",
			Self::AddAdd => "++",
			Self::SubSub => "--",
			Self::AddEq => "+=",
			Self::SubEq => "-=",
			Self::MulEq => "*=",
			Self::DivEq => "/=",
			Self::RemEq => "%=",
			Self::AndEq => "&=",
			Self::OrEq => "|=",
			Self::XorEq => "^=",
			Self::LShiftEq => "<<=",
			Self::RShiftEq => ">>=",
			Self::EqEq => "==",
			Self::NotEq => "!=",
			Self::Not => "!",
			Self::Gt => ">",
			Self::Lt => "<",
			Self::Ge => ">=",
			Self::Le => "<=",
			Self::AndAnd => "&&",
			Self::OrOr => "||",
			Self::XorXor => "^^",
		}
	}
}

/// A lexer which allows stepping through a GLSL source string character by character.
struct Lexer {
	/// The source string stored as a vector of characters.
	chars: Vec<char>,
	/// The index of the current character.
	cursor: usize,
}

impl Lexer {
	/// Constructs a new lexer.
	fn new(source: &str) -> Self {
		Lexer {
			chars: source.chars().collect(),
			cursor: 0,
		}
	}

	/// Returns the current character under the cursor, without advancing the cursor.
	fn peek(&self) -> Option<char> {
		self.chars.get(self.cursor).copied()
	}

	/// Peeks the next character without advancing the cursor.
	fn lookahead_1(&self) -> Option<char> {
		self.chars.get(self.cursor + 1).copied()
	}

	/// Advances the cursor by one.
	fn advance(&mut self) {
		self.cursor += 1;
	}

	/// Returns the current character under the cursor and advances the cursor by one.
	fn next(&mut self) -> Option<char> {
		let c = self.peek();
		if c.is_some() {
			self.advance();
		}
		c
	}

	/// Tries to match a pattern starting at the current character under the cursor. The cursor is only advanced
	/// if the whole pattern matches.
	fn take_pat(&mut self, pat: &str) -> bool {
		let mut pos = self.cursor;
		for c in pat.chars() {
			if self.chars.get(pos) != Some(&c) {
				return false;
			}
			pos += 1;
		}
		self.cursor = pos;
		true
	}

	/// Consumes characters for as long as they match the predicate, returning them.
	fn take_while(&mut self, pred: impl Fn(&char) -> bool) -> String {
		let mut buffer = String::new();
		while let Some(c) = self.peek() {
			if !pred(&c) {
				break;
			}
			buffer.push(c);
			self.advance();
		}
		buffer
	}

	/// Returns the characters between `start` and the cursor.
	fn slice(&self, start: usize) -> String {
		self.chars[start..self.cursor].iter().collect()
	}

	/// Returns the position of the cursor.
	fn position(&self) -> usize {
		self.cursor
	}

	/// Builds an error positioned at `offset` within the source string.
	fn error(&self, message: impl Into<String>, offset: usize) -> SyntaxError {
		SyntaxError::new(message, self.chars.iter().collect::<String>(), offset)
	}
}

/// Lexes a directive, starting at the `#` character. A `\` right before the end of a line continues the
/// directive onto the next line.
fn lex_directive(lexer: &mut Lexer) -> Token {
	let mut buffer = String::new();
	while let Some(current) = lexer.peek() {
		if current == '\\' {
			if let Some('\r' | '\n') = lexer.lookahead_1() {
				buffer.push(current);
				lexer.advance();
				if !lexer.take_pat("\r\n") {
					lexer.advance();
				}
				buffer.push('\n');
				continue;
			}
		}
		if current == '\r' || current == '\n' {
			break;
		}
		buffer.push(current);
		lexer.advance();
	}
	Token::new(TokenType::Directive, buffer.trim_end())
}

/// Lexes a number, starting at a digit or a `.` followed by a digit.
fn lex_number(lexer: &mut Lexer) -> Result<Token, SyntaxError> {
	let start = lexer.position();

	let ty = if lexer.take_pat("0x") || lexer.take_pat("0X") {
		if lexer.take_while(char::is_ascii_hexdigit).is_empty() {
			return Err(lexer.error("Missing hexadecimal digits", start));
		}
		TokenType::Int(IntFormat::Hexadecimal)
	} else {
		let integral = lexer.take_while(char::is_ascii_digit);
		let mut is_float = false;
		if lexer.peek() == Some('.') {
			lexer.advance();
			lexer.take_while(char::is_ascii_digit);
			is_float = true;
		}
		if let Some('e' | 'E') = lexer.peek() {
			let exponent = lexer.position();
			lexer.advance();
			if let Some('+' | '-') = lexer.peek() {
				lexer.advance();
			}
			if lexer.take_while(char::is_ascii_digit).is_empty() {
				return Err(lexer.error("Missing exponent digits", exponent));
			}
			is_float = true;
		}

		if is_float {
			TokenType::Float
		} else if integral.len() > 1 && integral.starts_with('0') {
			TokenType::Int(IntFormat::Octal)
		} else {
			TokenType::Int(IntFormat::Decimal)
		}
	};

	let ty = match ty {
		TokenType::Int(format) => {
			if lexer.take_pat("u") || lexer.take_pat("U") {
				TokenType::UInt(format)
			} else {
				ty
			}
		}
		_ => {
			let _ = lexer.take_pat("lf")
				|| lexer.take_pat("LF")
				|| lexer.take_pat("f")
				|| lexer.take_pat("F");
			ty
		}
	};

	// Something like `51ufoo` is a number with an invalid suffix rather than a number followed by an identifier.
	if lexer.peek().map_or(false, |c| is_word(&c)) {
		return Err(lexer.error("Invalid number suffix", lexer.position()));
	}

	Ok(Token::new(ty, lexer.slice(start)))
}

/// Returns whether the character is allowed to start a word.
fn is_word_start(c: &char) -> bool {
	c.is_ascii_alphabetic() || *c == '_'
}

/// Returns whether the character is allowed to be part of a word.
fn is_word(c: &char) -> bool {
	c.is_ascii_alphanumeric() || *c == '_'
}

/// Returns whether the character is allowed to start a punctuation token.
fn is_punctuation_start(c: &char) -> bool {
	matches!(
		c,
		'=' | ',' | '.' | ';' | '(' | ')' | '[' | ']' | '{' | '}' | ':'
			| '+' | '-' | '*' | '/' | '%' | '>' | '<' | '!' | '~' | '?'
			| '&' | '|' | '^'
	)
}

macro_rules! match_op {
	($lexer:ident, $str:expr, $token:expr) => {
		if $lexer.take_pat($str) {
			return Token::new($token, $str);
		}
	};
}

/// Matches a punctuation symbol, longest patterns first.
fn match_punctuation(lexer: &mut Lexer) -> Token {
	match_op!(lexer, "<<=", TokenType::Op(OpTy::LShiftEq));
	match_op!(lexer, ">>=", TokenType::Op(OpTy::RShiftEq));
	match_op!(lexer, "==", TokenType::Op(OpTy::EqEq));
	match_op!(lexer, "!=", TokenType::Op(OpTy::NotEq));
	match_op!(lexer, ">=", TokenType::Op(OpTy::Ge));
	match_op!(lexer, "<=", TokenType::Op(OpTy::Le));
	match_op!(lexer, "&&", TokenType::Op(OpTy::AndAnd));
	match_op!(lexer, "||", TokenType::Op(OpTy::OrOr));
	match_op!(lexer, "^^", TokenType::Op(OpTy::XorXor));
	match_op!(lexer, "++", TokenType::Op(OpTy::AddAdd));
	match_op!(lexer, "--", TokenType::Op(OpTy::SubSub));
	match_op!(lexer, "<<", TokenType::Op(OpTy::LShift));
	match_op!(lexer, ">>", TokenType::Op(OpTy::RShift));
	match_op!(lexer, "+=", TokenType::Op(OpTy::AddEq));
	match_op!(lexer, "-=", TokenType::Op(OpTy::SubEq));
	match_op!(lexer, "*=", TokenType::Op(OpTy::MulEq));
	match_op!(lexer, "/=", TokenType::Op(OpTy::DivEq));
	match_op!(lexer, "%=", TokenType::Op(OpTy::RemEq));
	match_op!(lexer, "&=", TokenType::Op(OpTy::AndEq));
	match_op!(lexer, "|=", TokenType::Op(OpTy::OrEq));
	match_op!(lexer, "^=", TokenType::Op(OpTy::XorEq));
	match_op!(lexer, "=", TokenType::Op(OpTy::Eq));
	match_op!(lexer, ";", TokenType::Semi);
	match_op!(lexer, ".", TokenType::Dot);
	match_op!(lexer, ",", TokenType::Comma);
	match_op!(lexer, "(", TokenType::LParen);
	match_op!(lexer, ")", TokenType::RParen);
	match_op!(lexer, "[", TokenType::LBracket);
	match_op!(lexer, "]", TokenType::RBracket);
	match_op!(lexer, "{", TokenType::LBrace);
	match_op!(lexer, "}", TokenType::RBrace);
	match_op!(lexer, "+", TokenType::Op(OpTy::Add));
	match_op!(lexer, "-", TokenType::Op(OpTy::Sub));
	match_op!(lexer, "*", TokenType::Op(OpTy::Mul));
	match_op!(lexer, "/", TokenType::Op(OpTy::Div));
	match_op!(lexer, ">", TokenType::Op(OpTy::Gt));
	match_op!(lexer, "<", TokenType::Op(OpTy::Lt));
	match_op!(lexer, "!", TokenType::Op(OpTy::Not));
	match_op!(lexer, "~", TokenType::Op(OpTy::Flip));
	match_op!(lexer, "?", TokenType::Question);
	match_op!(lexer, ":", TokenType::Colon);
	match_op!(lexer, "%", TokenType::Op(OpTy::Rem));
	match_op!(lexer, "&", TokenType::Op(OpTy::And));
	match_op!(lexer, "|", TokenType::Op(OpTy::Or));
	match_op!(lexer, "^", TokenType::Op(OpTy::Xor));
	unreachable!("[lexer::match_punctuation] Exhausted all of the patterns without matching anything!");
}

/// Matches a word to either the `true`/`false` literal, a keyword, a builtin type, a reserved word, or an
/// identifier in that order of precedence.
fn match_word(word: String) -> Token {
	let ty = match word.as_ref() {
		// Booleans
		"true" | "false" => TokenType::Bool,
		// Keywords
		"if" => TokenType::If,
		"else" => TokenType::Else,
		"for" => TokenType::For,
		"do" => TokenType::Do,
		"while" => TokenType::While,
		"continue" => TokenType::Continue,
		"switch" => TokenType::Switch,
		"case" => TokenType::Case,
		"default" => TokenType::Default,
		"break" => TokenType::Break,
		"return" => TokenType::Return,
		"discard" => TokenType::Discard,
		"struct" => TokenType::Struct,
		"subroutine" => TokenType::Subroutine,
		"precision" => TokenType::Precision,
		"const" => TokenType::Const,
		"in" => TokenType::In,
		"out" => TokenType::Out,
		"inout" => TokenType::InOut,
		"attribute" => TokenType::Attribute,
		"uniform" => TokenType::Uniform,
		"varying" => TokenType::Varying,
		"buffer" => TokenType::Buffer,
		"shared" => TokenType::Shared,
		"centroid" => TokenType::Centroid,
		"sample" => TokenType::Sample,
		"patch" => TokenType::Patch,
		"layout" => TokenType::Layout,
		"flat" => TokenType::Flat,
		"smooth" => TokenType::Smooth,
		"noperspective" => TokenType::NoPerspective,
		"highp" => TokenType::HighP,
		"mediump" => TokenType::MediumP,
		"lowp" => TokenType::LowP,
		"invariant" => TokenType::Invariant,
		"precise" => TokenType::Precise,
		"coherent" => TokenType::Coherent,
		"volatile" => TokenType::Volatile,
		"restrict" => TokenType::Restrict,
		"readonly" => TokenType::Readonly,
		"writeonly" => TokenType::Writeonly,
		// Reserved
		"common" | "partition" | "active" | "asm" | "class" | "union"
		| "enum" | "typedef" | "template" | "this" | "resource" | "goto"
		| "inline" | "noinline" | "public" | "static" | "extern"
		| "external" | "interface" | "long" | "short" | "half" | "fixed"
		| "unsigned" | "superp" | "input" | "output" | "hvec2" | "hvec3"
		| "hvec4" | "fvec2" | "fvec3" | "fvec4" | "sampler3DRect"
		| "filter" | "sizeof" | "cast" | "namespace" | "using" => {
			TokenType::Reserved
		}
		other => match BuiltinType::from_name(other) {
			Some(ty) => TokenType::Type(ty),
			// Identifier
			None => TokenType::Ident,
		},
	};
	Token::new(ty, word)
}

#[cfg(test)]
macro_rules! assert_tokens {
	($src:expr) => {
		assert!(tokenize($src).unwrap().is_empty());
	};
	($src:expr, $(($ty:expr, $value:expr)),*) => {
		let output = tokenize($src).unwrap();
		assert_eq!(output, vec![
			$(
				Token::new($ty, $value),
			)*
		])
	};
}

#[cfg(test)]
macro_rules! assert_lex_error {
	($src:expr, $offset:expr) => {
		let err = tokenize($src).unwrap_err();
		assert_eq!(err.offset, $offset, "{err}");
		assert_eq!(err.full_source, $src);
	};
}

#[test]
fn identifiers() {
	assert_tokens!("ident", (TokenType::Ident, "ident"));
	assert_tokens!("gl_something", (TokenType::Ident, "gl_something"));
	assert_tokens!("id_145", (TokenType::Ident, "id_145"));
	assert_tokens!("_9ga", (TokenType::Ident, "_9ga"));
}

#[test]
fn keywords() {
	assert_tokens!("true", (TokenType::Bool, "true"));
	assert_tokens!("false", (TokenType::Bool, "false"));
	assert_tokens!("if", (TokenType::If, "if"));
	assert_tokens!("precision", (TokenType::Precision, "precision"));
	assert_tokens!("writeonly", (TokenType::Writeonly, "writeonly"));
	assert_tokens!("vec3", (TokenType::Type(BuiltinType::Vec3), "vec3"));
	assert_tokens!(
		"sampler2DShadow",
		(TokenType::Type(BuiltinType::Sampler2DShadow), "sampler2DShadow")
	);
	assert_tokens!("class", (TokenType::Reserved, "class"));
}

#[test]
#[rustfmt::skip]
fn punctuation() {
	assert_tokens!("<<=", (TokenType::Op(OpTy::LShiftEq), "<<="));
	assert_tokens!("a<<b", (TokenType::Ident, "a"), (TokenType::Op(OpTy::LShift), "<<"), (TokenType::Ident, "b"));
	assert_tokens!("i---7", (TokenType::Ident, "i"), (TokenType::Op(OpTy::SubSub), "--"), (TokenType::Op(OpTy::Sub), "-"), (TokenType::Int(IntFormat::Decimal), "7"));
	assert_tokens!("^^", (TokenType::Op(OpTy::XorXor), "^^"));
	assert_tokens!("a.xy;", (TokenType::Ident, "a"), (TokenType::Dot, "."), (TokenType::Ident, "xy"), (TokenType::Semi, ";"));
	assert_tokens!("{}[]()?:,", (TokenType::LBrace, "{"), (TokenType::RBrace, "}"), (TokenType::LBracket, "["), (TokenType::RBracket, "]"), (TokenType::LParen, "("), (TokenType::RParen, ")"), (TokenType::Question, "?"), (TokenType::Colon, ":"), (TokenType::Comma, ","));
}

#[test]
fn comments() {
	assert_tokens!("// a comment");
	assert_tokens!("/* a comment */");
	assert_tokens!(
		"a /* multi\nline */ b // trailing\nc",
		(TokenType::Ident, "a"),
		(TokenType::Ident, "b"),
		(TokenType::Ident, "c")
	);
}

#[test]
#[rustfmt::skip]
fn integers() {
	assert_tokens!("0", (TokenType::Int(IntFormat::Decimal), "0"));
	assert_tokens!("0u", (TokenType::UInt(IntFormat::Decimal), "0u"));
	assert_tokens!("123456", (TokenType::Int(IntFormat::Decimal), "123456"));
	assert_tokens!("1U", (TokenType::UInt(IntFormat::Decimal), "1U"));
	assert_tokens!("00", (TokenType::Int(IntFormat::Octal), "00"));
	assert_tokens!("01715u", (TokenType::UInt(IntFormat::Octal), "01715u"));
	assert_tokens!("0x91fa", (TokenType::Int(IntFormat::Hexadecimal), "0x91fa"));
	assert_tokens!("0X00Fu", (TokenType::UInt(IntFormat::Hexadecimal), "0X00Fu"));
}

#[test]
#[rustfmt::skip]
fn floats() {
	assert_tokens!("1.0", (TokenType::Float, "1.0"));
	assert_tokens!("1.", (TokenType::Float, "1."));
	assert_tokens!(".015LF", (TokenType::Float, ".015LF"));
	assert_tokens!("7.3e-2", (TokenType::Float, "7.3e-2"));
	assert_tokens!("1e10", (TokenType::Float, "1e10"));
	assert_tokens!("2.5f", (TokenType::Float, "2.5f"));
	assert_tokens!("4.lf", (TokenType::Float, "4.lf"));
}

#[test]
fn directives() {
	assert_tokens!(
		"#version 450 core\nint a;",
		(TokenType::Directive, "#version 450 core"),
		(TokenType::Type(BuiltinType::Int), "int"),
		(TokenType::Ident, "a"),
		(TokenType::Semi, ";")
	);
	assert_tokens!(
		"  #define FOO \\\n  1\nFOO",
		(TokenType::Directive, "#define FOO \\\n  1"),
		(TokenType::Ident, "FOO")
	);
	// Not at the start of a line.
	assert_lex_error!("int a; #define B", 7);
}

#[test]
fn illegal() {
	assert_lex_error!("int @;", 4);
	assert_lex_error!("a /* unterminated", 2);
	assert_lex_error!("51ufoo", 3);
	assert_lex_error!("0x;", 0);
	assert_lex_error!("1e+;", 1);
}

#[test]
fn classification() {
	assert_eq!(
		TokenType::Op(OpTy::SubSub).as_unary_operator(),
		Some(UnaryOp::PreDecrement)
	);
	assert_eq!(TokenType::Op(OpTy::Mul).as_unary_operator(), None);
	assert_eq!(
		TokenType::Op(OpTy::LShiftEq).as_assignment_operator(),
		Some(AssignmentOp::LeftShift)
	);
	assert_eq!(TokenType::Op(OpTy::EqEq).as_assignment_operator(), None);
	assert_eq!(
		TokenType::Readonly.as_storage_qualifier(),
		Some(StorageQualifier::Readonly)
	);
	assert_eq!(
		TokenType::Flat.as_interpolation_qualifier(),
		Some(Interpolation::Flat)
	);
	assert_eq!(TokenType::Flat.as_precision_qualifier(), None);
	assert_eq!(
		TokenType::MediumP.as_precision_qualifier(),
		Some(Precision::MediumP)
	);
	assert_eq!(
		TokenType::Type(BuiltinType::Mat4).as_builtin_type(),
		Some(BuiltinType::Mat4)
	);
	assert_eq!(TokenType::Ident.as_builtin_type(), None);

	assert!(TokenType::Uniform.classes().contains(TokenClass::QUALIFIER));
	assert!(TokenType::Layout.classes().contains(TokenClass::QUALIFIER));
	assert!(!TokenType::Struct.classes().intersects(TokenClass::QUALIFIER));
	assert!(TokenType::Op(OpTy::Sub)
		.classes()
		.contains(TokenClass::OPERATOR | TokenClass::UNARY_OPERATOR));
	assert_eq!(
		TokenType::Type(BuiltinType::Float).classes(),
		TokenClass::KEYWORD | TokenClass::BUILTIN_TYPE
	);
}
