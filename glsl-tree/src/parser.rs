//! The parser, which matches grammar productions against a [`TokenReader`].
//!
//! Every production is a function `fn(&mut TokenReader) -> Option<T>`. A production either matches and leaves the
//! cursor after the tokens it consumed, or it returns `None` and leaves the cursor where it started. Each one is
//! wrapped in [`TokenReader::attempt()`] so that the second half of that contract holds no matter how far the
//! production got before failing. Alternatives are then simply tried in order, which gives unlimited backtracking.
//!
//! A production that fails for a reason worth reporting, (such as a missing `;` after an otherwise complete
//! declaration), records it with [`TokenReader::mark_error()`]. These are only surfaced if the top-level parse
//! ultimately fails.

#[cfg(test)]
mod tests;

use crate::{
	lexer::{tokenize, OpTy, TokenClass, TokenType},
	node::{
		BinaryOp, BitwiseOp, Callee, CompareOp, FloatSuffix, Function,
		FunctionHeader, InterfaceBlock, JumpKind, LogicalOp, LoopKind, Node,
		Parameter, UnaryOp, VariableDeclaration,
	},
	reader::TokenReader,
	trace,
	tree::{GlslTree, GlslVersion},
	ty::{
		BuiltinType, LayoutId, SpecifiedType, StorageQualifier, StructField,
		StructSpecifier, TypeQualifier, TypeSpecifier,
	},
	SyntaxError,
};

/// A grammar production.
type Production<T> = fn(&mut TokenReader) -> Option<T>;

/// Parses a whole shader.
///
/// # Errors
/// Fails if the source cannot be lexed, or if any part of it does not match a top-level item. No partial tree is
/// produced.
///
/// # Examples
/// ```rust
/// let tree = glsl_tree::parse("#version 450\nvoid main() { gl_Position = vec4(0.0); }").unwrap();
/// assert_eq!(tree.version.number, 450);
/// assert_eq!(tree.body.len(), 1);
/// ```
pub fn parse(source: &str) -> Result<GlslTree, SyntaxError> {
	let mut reader = TokenReader::new(tokenize(source)?);
	translation_unit(&mut reader)
}

/// Parses a single expression. Any number of trailing `;` are allowed.
///
/// # Errors
/// Fails if the source is not exactly one expression, with `Too many tokens provided` if it continues past one.
pub fn parse_expression(source: &str) -> Result<Node, SyntaxError> {
	let mut reader = TokenReader::new(tokenize(source)?);
	let r = &mut reader;

	let Some(expr) = expression(r) else {
		r.throw_error()?;
		return Err(r.unexpected());
	};
	while r.try_consume(&[TokenType::Semi]) {}
	if !r.is_done() {
		return Err(r.error("Too many tokens provided"));
	}
	Ok(expr)
}

/// Parses a sequence of statements, such as the contents of a function body.
///
/// # Errors
/// Fails if a statement cannot be parsed, with `Too many tokens provided` pointing at the first token that does not
/// start a statement.
pub fn parse_expression_list(source: &str) -> Result<Vec<Node>, SyntaxError> {
	let mut reader = TokenReader::new(tokenize(source)?);
	let r = &mut reader;

	let mut statements = Vec::new();
	while let Some(stmt) = statement(r) {
		statements.push(stmt);
	}
	if !r.is_done() {
		let causes = r.diagnostics().to_vec();
		trace!("Failed to parse a statement list: {causes:?}");
		return Err(r.error("Too many tokens provided").with_causes(causes));
	}
	Ok(statements)
}

fn translation_unit(r: &mut TokenReader) -> Result<GlslTree, SyntaxError> {
	let mut tree = GlslTree::default();

	if let Some(token) = r.peek(0) {
		if token.ty() == TokenType::Directive {
			if let Some(version) = GlslVersion::from_directive(token.value())? {
				tree.version = version;
				r.skip();
			}
		}
	}
	trace!("Parsing a translation unit with version {}", tree.version);

	while !r.is_done() {
		r.commit();

		if let Some(token) = r.peek(0) {
			if token.ty() == TokenType::Directive {
				if GlslVersion::from_directive(token.value())?.is_some() {
					let err = r.error("The version directive must come first");
					trace!("{err}");
					return Err(err);
				}
				tree.directives.push(token.value().to_owned());
				r.skip();
				continue;
			}
		}

		if let Some(node) = function_definition(r).or_else(|| declaration(r)) {
			trace!("Parsed a {}", describe(&node));
			tree.body.push(node);
			continue;
		}

		if r.try_consume(&[TokenType::Semi]) {
			continue;
		}

		// Loose statements, so that snippets meant for a function body can be parsed on their own.
		if let Some(node) = statement(r) {
			trace!("Parsed a top-level {}", describe(&node));
			tree.body.push(node);
			continue;
		}

		r.throw_error()?;
		let err = r.unexpected();
		trace!("Failed to parse a top-level item: {err}");
		return Err(err);
	}

	Ok(tree)
}

/// Describes a top-level node for logging purposes.
#[cfg_attr(not(feature = "logging"), allow(dead_code))]
fn describe(node: &Node) -> &'static str {
	match node {
		Node::Function(f) if f.is_prototype() => "function prototype",
		Node::Function(_) => "function definition",
		Node::StructDeclaration(_) => "struct declaration",
		Node::InterfaceBlock(_) => "interface block",
		Node::PrecisionDeclaration { .. } => "precision declaration",
		Node::QualifierDeclaration { .. } => "qualifier declaration",
		Node::DeclarationList(_) => "declaration list",
		Node::VariableDeclaration(_) => "variable declaration",
		_ => "statement",
	}
}

/// Consumes a single token of the given type.
fn expect(r: &mut TokenReader, ty: TokenType) -> Option<()> {
	r.try_consume(&[ty]).then_some(())
}

/// Consumes the closing token of a construct, marking an error if it is missing.
fn close(r: &mut TokenReader, ty: TokenType) -> Option<()> {
	if r.try_consume(&[ty]) {
		Some(())
	} else {
		r.mark_error(format!("Expected '{ty}'"));
		None
	}
}

/// Parses `operand (separator operand)*`.
fn separated<T>(
	r: &mut TokenReader,
	separator: TokenType,
	operand: impl Fn(&mut TokenReader) -> Option<T>,
) -> Option<Vec<T>> {
	r.attempt(|r| {
		let mut items = vec![operand(r)?];
		while let Some(item) = r.attempt(|r| {
			expect(r, separator)?;
			operand(r)
		}) {
			items.push(item);
		}
		Some(items)
	})
}

/* EXPRESSIONS */

fn expression(r: &mut TokenReader) -> Option<Node> {
	let mut items = separated(r, TokenType::Comma, assignment)?;
	if items.len() == 1 {
		items.pop()
	} else {
		Some(Node::Comma(items))
	}
}

fn assignment(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let target = conditional(r)?;
		if target.precedence() < crate::node::precedence::UNARY {
			return Some(target);
		}
		let Some(op) = r.peek_type(0).and_then(|ty| ty.as_assignment_operator())
		else {
			return Some(target);
		};

		let cursor = r.cursor();
		r.skip();
		match assignment(r) {
			Some(value) => Some(Node::Assignment {
				target: Box::new(target),
				op,
				value: Box::new(value),
			}),
			None => {
				r.mark_error(format!(
					"Expected an expression after '{}'",
					op.symbol()
				));
				r.set_cursor(cursor);
				Some(target)
			}
		}
	})
}

fn conditional(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let condition = logical_or(r)?;
		let branches = r.attempt(|r| {
			expect(r, TokenType::Question)?;
			let then = expression(r)?;
			expect(r, TokenType::Colon)?;
			let otherwise = assignment(r)?;
			Some((then, otherwise))
		});
		match branches {
			Some((then, otherwise)) => Some(Node::Conditional {
				condition: Box::new(condition),
				then: Box::new(then),
				otherwise: Box::new(otherwise),
			}),
			None => Some(condition),
		}
	})
}

/// Parses a chain of the same associative operator into a single node.
fn variadic(
	r: &mut TokenReader,
	op: OpTy,
	operand: Production<Node>,
	build: impl FnOnce(Vec<Node>) -> Node,
) -> Option<Node> {
	let mut operands = separated(r, TokenType::Op(op), operand)?;
	if operands.len() == 1 {
		operands.pop()
	} else {
		Some(build(operands))
	}
}

fn logical_or(r: &mut TokenReader) -> Option<Node> {
	variadic(r, OpTy::OrOr, logical_xor, |operands| Node::Logical {
		op: LogicalOp::Or,
		operands,
	})
}

fn logical_xor(r: &mut TokenReader) -> Option<Node> {
	variadic(r, OpTy::XorXor, logical_and, |operands| Node::Logical {
		op: LogicalOp::Xor,
		operands,
	})
}

fn logical_and(r: &mut TokenReader) -> Option<Node> {
	variadic(r, OpTy::AndAnd, bit_or, |operands| Node::Logical {
		op: LogicalOp::And,
		operands,
	})
}

fn bit_or(r: &mut TokenReader) -> Option<Node> {
	variadic(r, OpTy::Or, bit_xor, |operands| Node::Bitwise {
		op: BitwiseOp::Or,
		operands,
	})
}

fn bit_xor(r: &mut TokenReader) -> Option<Node> {
	variadic(r, OpTy::Xor, bit_and, |operands| Node::Bitwise {
		op: BitwiseOp::Xor,
		operands,
	})
}

fn bit_and(r: &mut TokenReader) -> Option<Node> {
	variadic(r, OpTy::And, equality, |operands| Node::Bitwise {
		op: BitwiseOp::And,
		operands,
	})
}

/// A left-associative binary operator.
#[derive(Debug, Clone, Copy)]
enum Operator {
	Binary(BinaryOp),
	Compare(CompareOp),
}

impl Operator {
	fn build(self, left: Node, right: Node) -> Node {
		let (left, right) = (Box::new(left), Box::new(right));
		match self {
			Self::Binary(op) => Node::Binary { left, op, right },
			Self::Compare(op) => Node::Compare { left, op, right },
		}
	}
}

/// Parses a left-associative chain of any of the given operators.
fn left_assoc(
	r: &mut TokenReader,
	ops: &[(OpTy, Operator)],
	operand: Production<Node>,
) -> Option<Node> {
	r.attempt(|r| {
		let mut left = operand(r)?;
		loop {
			let Some(op) = ops
				.iter()
				.find(|(ty, _)| r.peek_type(0) == Some(TokenType::Op(*ty)))
				.map(|(_, op)| *op)
			else {
				break;
			};
			let Some(right) = r.attempt(|r| {
				r.skip();
				operand(r)
			}) else {
				break;
			};
			left = op.build(left, right);
		}
		Some(left)
	})
}

fn equality(r: &mut TokenReader) -> Option<Node> {
	left_assoc(
		r,
		&[
			(OpTy::EqEq, Operator::Compare(CompareOp::Equal)),
			(OpTy::NotEq, Operator::Compare(CompareOp::NotEqual)),
		],
		relational,
	)
}

fn relational(r: &mut TokenReader) -> Option<Node> {
	left_assoc(
		r,
		&[
			(OpTy::Lt, Operator::Compare(CompareOp::Less)),
			(OpTy::Gt, Operator::Compare(CompareOp::Greater)),
			(OpTy::Le, Operator::Compare(CompareOp::LessEqual)),
			(OpTy::Ge, Operator::Compare(CompareOp::GreaterEqual)),
		],
		shift,
	)
}

fn shift(r: &mut TokenReader) -> Option<Node> {
	left_assoc(
		r,
		&[
			(OpTy::LShift, Operator::Binary(BinaryOp::LeftShift)),
			(OpTy::RShift, Operator::Binary(BinaryOp::RightShift)),
		],
		additive,
	)
}

fn additive(r: &mut TokenReader) -> Option<Node> {
	left_assoc(
		r,
		&[
			(OpTy::Add, Operator::Binary(BinaryOp::Add)),
			(OpTy::Sub, Operator::Binary(BinaryOp::Subtract)),
		],
		multiplicative,
	)
}

fn multiplicative(r: &mut TokenReader) -> Option<Node> {
	left_assoc(
		r,
		&[
			(OpTy::Mul, Operator::Binary(BinaryOp::Multiply)),
			(OpTy::Div, Operator::Binary(BinaryOp::Divide)),
			(OpTy::Rem, Operator::Binary(BinaryOp::Modulo)),
		],
		unary,
	)
}

fn unary(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		if let Some(expr) = postfix(r) {
			return Some(expr);
		}
		let op = r.peek_type(0)?.as_unary_operator()?;
		r.skip();
		let expr = unary(r)?;
		Some(Node::Unary {
			op,
			expr: Box::new(expr),
		})
	})
}

fn postfix(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let mut expr = match constructor(r) {
			Some(ty) => Node::Invoke {
				callee: Callee::Constructor(ty),
				args: call_args(r)?,
			},
			None => primary(r)?,
		};

		loop {
			expr = match r.peek_type(0) {
				Some(TokenType::LBracket) => {
					let Some(index) = r.attempt(|r| {
						r.skip();
						let index = expression(r)?;
						expect(r, TokenType::RBracket)?;
						Some(index)
					}) else {
						break;
					};
					Node::ArrayIndex {
						base: Box::new(expr),
						index: Box::new(index),
					}
				}
				Some(TokenType::Dot) => {
					let Some(name) = r.attempt(|r| {
						r.skip();
						r.try_consume_ident()
					}) else {
						break;
					};
					match expr {
						Node::Field { base, selection } => Node::Field {
							base,
							selection: format!("{selection}.{name}"),
						},
						base => Node::Field {
							base: Box::new(base),
							selection: name,
						},
					}
				}
				Some(TokenType::Op(OpTy::AddAdd)) => {
					r.skip();
					Node::Unary {
						op: UnaryOp::PostIncrement,
						expr: Box::new(expr),
					}
				}
				Some(TokenType::Op(OpTy::SubSub)) => {
					r.skip();
					Node::Unary {
						op: UnaryOp::PostDecrement,
						expr: Box::new(expr),
					}
				}
				Some(TokenType::LParen) => {
					let Some(args) = call_args(r) else {
						break;
					};
					Node::Invoke {
						callee: Callee::Function(Box::new(expr)),
						args,
					}
				}
				_ => break,
			};
		}

		Some(expr)
	})
}

/// Parses the type of a builtin constructor, e.g. the `vec3` in `vec3(1.0)` or the `float[2]` in `float[2](a, b)`.
/// User-named types are left to be parsed as ordinary function calls.
fn constructor(r: &mut TokenReader) -> Option<TypeSpecifier> {
	// Only a builtin can start a constructor. Checking first keeps `a[b[c]]` from parsing its brackets twice.
	if !matches!(r.peek_type(0), Some(TokenType::Type(_))) {
		return None;
	}
	r.attempt(|r| {
		let ty = type_specifier(r)?;
		if !matches!(ty.base(), TypeSpecifier::Builtin(_))
			|| r.peek_type(0) != Some(TokenType::LParen)
		{
			return None;
		}
		Some(ty)
	})
}

/// Parses a parenthesized argument list. `()` and `(void)` are both empty.
fn call_args(r: &mut TokenReader) -> Option<Vec<Node>> {
	r.attempt(|r| {
		expect(r, TokenType::LParen)?;
		if r.try_consume(&[TokenType::RParen])
			|| r.try_consume(&[
				TokenType::Type(BuiltinType::Void),
				TokenType::RParen,
			]) {
			return Some(Vec::new());
		}
		let args = separated(r, TokenType::Comma, assignment)?;
		close(r, TokenType::RParen)?;
		Some(args)
	})
}

fn primary(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let token = r.peek(0)?;
		let node = match token.ty() {
			TokenType::Ident => Node::Variable(token.value().to_owned()),
			TokenType::Int(format) | TokenType::UInt(format) => {
				let signed = matches!(token.ty(), TokenType::Int(_));
				let Some(value) = parse_int(token.value(), format) else {
					r.mark_error("Invalid integer constant");
					return None;
				};
				Node::IntConstant {
					value,
					format,
					signed,
				}
			}
			TokenType::Float => {
				let Some(node) = parse_float(token.value()) else {
					r.mark_error("Invalid float constant");
					return None;
				};
				node
			}
			TokenType::Bool => Node::BoolConstant(token.value() == "true"),
			TokenType::LParen => {
				r.skip();
				let expr = expression(r)?;
				close(r, TokenType::RParen)?;
				return Some(expr);
			}
			_ => return None,
		};
		r.skip();
		Some(node)
	})
}

fn parse_int(value: &str, format: crate::lexer::IntFormat) -> Option<u32> {
	use crate::lexer::IntFormat;

	let digits = value.trim_end_matches(|c| c == 'u' || c == 'U');
	match format {
		IntFormat::Decimal => digits.parse().ok(),
		IntFormat::Hexadecimal => u32::from_str_radix(&digits[2..], 16).ok(),
		IntFormat::Octal => u32::from_str_radix(&digits[1..], 8).ok(),
	}
}

fn parse_float(value: &str) -> Option<Node> {
	let (digits, suffix) = if let Some(digits) = value
		.strip_suffix("lf")
		.or_else(|| value.strip_suffix("LF"))
	{
		(digits, FloatSuffix::Double)
	} else if let Some(digits) = value
		.strip_suffix('f')
		.or_else(|| value.strip_suffix('F'))
	{
		(digits, FloatSuffix::Float)
	} else {
		(value, FloatSuffix::None)
	};
	let value = digits.parse::<f64>().ok().filter(|v| v.is_finite())?;
	Some(Node::FloatConstant { value, suffix })
}

/* TYPES */

/// Parses a type specifier along with any array suffixes directly following it.
fn type_specifier(r: &mut TokenReader) -> Option<TypeSpecifier> {
	r.attempt(|r| {
		let ty = if r.peek_type(0) == Some(TokenType::Struct) {
			TypeSpecifier::Struct(struct_specifier(r)?)
		} else {
			let token = r.peek(0)?;
			let ty = match token.ty() {
				TokenType::Ident => TypeSpecifier::Named(token.value().to_owned()),
				TokenType::Type(builtin) => TypeSpecifier::Builtin(builtin),
				_ => return None,
			};
			r.skip();
			ty
		};
		Some(array_suffixes(r, ty))
	})
}

/// Wraps the type in a layer for every `[size]` or `[]` that follows.
fn array_suffixes(r: &mut TokenReader, mut ty: TypeSpecifier) -> TypeSpecifier {
	while let Some(size) = array_suffix(r) {
		ty = ty.array(size);
	}
	ty
}

fn array_suffix(r: &mut TokenReader) -> Option<Option<Node>> {
	r.attempt(|r| {
		expect(r, TokenType::LBracket)?;
		if r.try_consume(&[TokenType::RBracket]) {
			return Some(None);
		}
		let size = conditional(r)?;
		expect(r, TokenType::RBracket)?;
		Some(Some(size))
	})
}

fn struct_specifier(r: &mut TokenReader) -> Option<StructSpecifier> {
	r.attempt(|r| {
		expect(r, TokenType::Struct)?;
		let name = r.try_consume_ident();
		expect(r, TokenType::LBrace)?;
		let fields = field_list(r);
		close(r, TokenType::RBrace)?;
		Some(StructSpecifier { name, fields })
	})
}

/// Parses the field declarations of a struct or an interface block, up to but excluding the `}`.
fn field_list(r: &mut TokenReader) -> Vec<StructField> {
	let mut fields = Vec::new();
	while let Some(mut declared) = field_declaration(r) {
		fields.append(&mut declared);
	}
	fields
}

/// Parses a single field declaration, such as `float a, b[2];`, which may declare several fields.
fn field_declaration(r: &mut TokenReader) -> Option<Vec<StructField>> {
	r.attempt(|r| {
		let ty = fully_specified_type(r)?;
		let fields = separated(r, TokenType::Comma, |r| {
			let name = r.try_consume_ident()?;
			Some(StructField {
				ty: SpecifiedType {
					qualifiers: ty.qualifiers.clone(),
					specifier: array_suffixes(r, ty.specifier.clone()),
				},
				name,
			})
		})?;
		close(r, TokenType::Semi)?;
		Some(fields)
	})
}

fn fully_specified_type(r: &mut TokenReader) -> Option<SpecifiedType> {
	r.attempt(|r| {
		let qualifiers = qualifiers(r);
		let specifier = type_specifier(r)?;
		Some(SpecifiedType {
			qualifiers,
			specifier,
		})
	})
}

fn qualifiers(r: &mut TokenReader) -> Vec<TypeQualifier> {
	let mut qualifiers = Vec::new();
	while let Some(qualifier) = qualifier(r) {
		qualifiers.push(qualifier);
	}
	qualifiers
}

fn qualifier(r: &mut TokenReader) -> Option<TypeQualifier> {
	r.attempt(|r| {
		let ty = r.peek_type(0)?;
		if !ty.classes().intersects(TokenClass::QUALIFIER) {
			return None;
		}
		match ty {
			TokenType::Layout => layout_qualifier(r),
			TokenType::Subroutine => {
				r.skip();
				let mut types = Vec::new();
				if r.try_consume(&[TokenType::LParen]) {
					types = separated(r, TokenType::Comma, |r| {
						r.try_consume_ident()
					})?;
					close(r, TokenType::RParen)?;
				}
				Some(TypeQualifier::Storage(StorageQualifier::Subroutine(types)))
			}
			TokenType::Invariant => {
				r.skip();
				Some(TypeQualifier::Invariant)
			}
			TokenType::Precise => {
				r.skip();
				Some(TypeQualifier::Precise)
			}
			_ => {
				r.skip();
				ty.as_storage_qualifier()
					.map(TypeQualifier::Storage)
					.or_else(|| {
						ty.as_precision_qualifier().map(TypeQualifier::Precision)
					})
					.or_else(|| {
						ty.as_interpolation_qualifier()
							.map(TypeQualifier::Interpolation)
					})
			}
		}
	})
}

fn layout_qualifier(r: &mut TokenReader) -> Option<TypeQualifier> {
	r.attempt(|r| {
		expect(r, TokenType::Layout)?;
		close(r, TokenType::LParen)?;
		let ids = separated(r, TokenType::Comma, |r| {
			if r.try_consume(&[TokenType::Shared]) {
				return Some(LayoutId::Shared);
			}
			let name = r.try_consume_ident()?;
			let value = if r.try_consume(&[TokenType::Op(OpTy::Eq)]) {
				Some(conditional(r)?)
			} else {
				None
			};
			Some(LayoutId::Identifier { name, value })
		})?;
		close(r, TokenType::RParen)?;
		Some(TypeQualifier::Layout(ids))
	})
}

/* DECLARATIONS */

fn declaration(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		if let Some(header) = r.attempt(|r| {
			let header = function_prototype(r)?;
			expect(r, TokenType::Semi)?;
			Some(header)
		}) {
			return Some(Node::Function(Function { header, body: None }));
		}

		variable_declarations(r)
			.or_else(|| struct_declaration(r))
			.or_else(|| precision_declaration(r))
			.or_else(|| interface_block(r))
			.or_else(|| qualifier_declaration(r))
	})
}

/// Parses one or more variables sharing a type, e.g. `int a, b[2] = int[2](1, 2);`.
fn variable_declarations(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let ty = fully_specified_type(r)?;
		let mut decls = separated(r, TokenType::Comma, |r| declarator(r, &ty))?;
		close(r, TokenType::Semi)?;
		if decls.len() == 1 {
			decls.pop().map(Node::VariableDeclaration)
		} else {
			Some(Node::DeclarationList(decls))
		}
	})
}

/// Parses the part of a declaration after the type: the name, any array suffixes, and an optional initializer.
fn declarator(
	r: &mut TokenReader,
	ty: &SpecifiedType,
) -> Option<VariableDeclaration> {
	r.attempt(|r| {
		let name = r.try_consume_ident()?;
		let specifier = array_suffixes(r, ty.specifier.clone());
		let initializer = if r.try_consume(&[TokenType::Op(OpTy::Eq)]) {
			let Some(init) = initializer(r) else {
				r.mark_error("Expected initializer after '='");
				return None;
			};
			Some(Box::new(init))
		} else {
			None
		};
		Some(VariableDeclaration {
			ty: SpecifiedType {
				qualifiers: ty.qualifiers.clone(),
				specifier,
			},
			name,
			initializer,
		})
	})
}

/// Parses an initializer, which is an expression or a brace-enclosed list of initializers.
fn initializer(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		if !r.try_consume(&[TokenType::LBrace]) {
			return assignment(r);
		}
		let items = separated(r, TokenType::Comma, initializer)?;
		r.try_consume(&[TokenType::Comma]);
		close(r, TokenType::RBrace)?;
		Some(Node::InitializerList(items))
	})
}

fn struct_declaration(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let specifier = struct_specifier(r)?;
		specifier.name.as_ref()?;
		close(r, TokenType::Semi)?;
		Some(Node::StructDeclaration(specifier))
	})
}

fn precision_declaration(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		expect(r, TokenType::Precision)?;
		let precision = r.peek_type(0)?.as_precision_qualifier()?;
		r.skip();
		let ty = type_specifier(r)?;
		close(r, TokenType::Semi)?;
		Some(Node::PrecisionDeclaration { precision, ty })
	})
}

fn interface_block(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let qualifiers = qualifiers(r);
		if qualifiers.is_empty() {
			return None;
		}
		let name = r.try_consume_ident()?;
		expect(r, TokenType::LBrace)?;
		let fields = field_list(r);
		close(r, TokenType::RBrace)?;

		let instance = r.try_consume_ident();
		let mut instance_sizes = Vec::new();
		if instance.is_some() {
			while let Some(size) = array_suffix(r) {
				instance_sizes.push(size);
			}
		}
		close(r, TokenType::Semi)?;

		Some(Node::InterfaceBlock(InterfaceBlock {
			qualifiers,
			name,
			fields,
			instance,
			instance_sizes,
		}))
	})
}

/// Parses qualifiers that stand on their own, e.g. `layout(local_size_x = 8) in;` or `invariant a, b;`.
fn qualifier_declaration(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let qualifiers = qualifiers(r);
		if qualifiers.is_empty() {
			return None;
		}
		let names = separated(r, TokenType::Comma, |r| r.try_consume_ident())
			.unwrap_or_default();
		expect(r, TokenType::Semi)?;
		Some(Node::QualifierDeclaration { qualifiers, names })
	})
}

/* FUNCTIONS */

fn function_prototype(r: &mut TokenReader) -> Option<FunctionHeader> {
	r.attempt(|r| {
		let return_type = fully_specified_type(r)?;
		let name = r.try_consume_ident()?;
		expect(r, TokenType::LParen)?;

		let mut parameters = Vec::new();
		if !r.try_consume(&[TokenType::RParen])
			&& !r.try_consume(&[
				TokenType::Type(BuiltinType::Void),
				TokenType::RParen,
			]) {
			parameters = separated(r, TokenType::Comma, parameter)?;
			close(r, TokenType::RParen)?;
		}

		Some(FunctionHeader {
			name,
			return_type,
			parameters,
		})
	})
}

/// Parses a parameter, e.g. `in vec3 normal`, `float[2]` or `float a[2]`.
fn parameter(r: &mut TokenReader) -> Option<Parameter> {
	r.attempt(|r| {
		let ty = fully_specified_type(r)?;
		let name = r.try_consume_ident();
		let specifier = array_suffixes(r, ty.specifier);
		Some(Parameter {
			name,
			ty: SpecifiedType {
				qualifiers: ty.qualifiers,
				specifier,
			},
		})
	})
}

fn function_definition(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let header = function_prototype(r)?;
		let body = block(r)?;
		Some(Node::Function(Function {
			header,
			body: Some(body),
		}))
	})
}

/* STATEMENTS */

fn statement(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		block(r)
			.map(Node::Compound)
			.or_else(|| declaration(r))
			.or_else(|| expression_statement(r))
			.or_else(|| selection(r))
			.or_else(|| switch(r))
			.or_else(|| case_label(r))
			.or_else(|| iteration(r))
			.or_else(|| jump(r))
	})
}

/// Parses the statements between `{` and `}`.
fn block(r: &mut TokenReader) -> Option<Vec<Node>> {
	r.attempt(|r| {
		expect(r, TokenType::LBrace)?;
		let mut body = Vec::new();
		while let Some(stmt) = statement(r) {
			body.push(stmt);
		}
		close(r, TokenType::RBrace)?;
		Some(body)
	})
}

/// Parses an expression followed by a `;`, or a lone `;`.
fn expression_statement(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		if r.try_consume(&[TokenType::Semi]) {
			return Some(Node::Empty);
		}
		let expr = expression(r)?;
		close(r, TokenType::Semi)?;
		Some(expr)
	})
}

/// Parses the condition of an `if`, `while` or `for`: either an expression or a declaration with an initializer.
fn condition(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let decl = r.attempt(|r| {
			let ty = fully_specified_type(r)?;
			let name = r.try_consume_ident()?;
			expect(r, TokenType::Op(OpTy::Eq))?;
			let initializer = initializer(r)?;
			Some(VariableDeclaration {
				ty,
				name,
				initializer: Some(Box::new(initializer)),
			})
		});
		match decl {
			Some(decl) => Some(Node::VariableDeclaration(decl)),
			None => expression(r),
		}
	})
}

fn selection(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		expect(r, TokenType::If)?;
		expect(r, TokenType::LParen)?;
		let condition = condition(r)?;
		close(r, TokenType::RParen)?;
		let then = statement(r)?;
		let otherwise = if r.try_consume(&[TokenType::Else]) {
			Some(Box::new(statement(r)?))
		} else {
			None
		};
		Some(Node::Selection {
			condition: Box::new(condition),
			then: Box::new(then),
			otherwise,
		})
	})
}

fn switch(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		expect(r, TokenType::Switch)?;
		expect(r, TokenType::LParen)?;
		let condition = expression(r)?;
		close(r, TokenType::RParen)?;
		let body = block(r)?;
		Some(Node::Switch {
			condition: Box::new(condition),
			body,
		})
	})
}

fn case_label(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		if r.try_consume(&[TokenType::Default, TokenType::Colon]) {
			return Some(Node::CaseLabel(None));
		}
		expect(r, TokenType::Case)?;
		let value = expression(r)?;
		close(r, TokenType::Colon)?;
		Some(Node::CaseLabel(Some(Box::new(value))))
	})
}

fn iteration(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| match r.peek_type(0)? {
		TokenType::While => {
			r.skip();
			expect(r, TokenType::LParen)?;
			let condition = condition(r)?;
			close(r, TokenType::RParen)?;
			let body = statement(r)?;
			Some(Node::Loop {
				kind: LoopKind::While,
				condition: Box::new(condition),
				body: Box::new(body),
			})
		}
		TokenType::Do => {
			r.skip();
			let body = statement(r)?;
			expect(r, TokenType::While)?;
			expect(r, TokenType::LParen)?;
			let condition = expression(r)?;
			close(r, TokenType::RParen)?;
			close(r, TokenType::Semi)?;
			Some(Node::Loop {
				kind: LoopKind::DoWhile,
				condition: Box::new(condition),
				body: Box::new(body),
			})
		}
		TokenType::For => {
			r.skip();
			expect(r, TokenType::LParen)?;
			let init = declaration(r).or_else(|| expression_statement(r))?;
			let condition = condition(r);
			close(r, TokenType::Semi)?;
			let increment = expression(r);
			close(r, TokenType::RParen)?;
			let body = statement(r)?;
			Some(Node::For {
				init: Box::new(init),
				condition: condition.map(Box::new),
				increment: increment.map(Box::new),
				body: Box::new(body),
			})
		}
		_ => None,
	})
}

fn jump(r: &mut TokenReader) -> Option<Node> {
	r.attempt(|r| {
		let kind = match r.peek_type(0)? {
			TokenType::Continue => JumpKind::Continue,
			TokenType::Break => JumpKind::Break,
			TokenType::Discard => JumpKind::Discard,
			TokenType::Return => {
				r.skip();
				let value = expression(r);
				close(r, TokenType::Semi)?;
				return Some(Node::Return(value.map(Box::new)));
			}
			_ => return None,
		};
		r.skip();
		close(r, TokenType::Semi)?;
		Some(Node::Jump(kind))
	})
}
