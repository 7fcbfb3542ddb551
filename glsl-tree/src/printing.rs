//! Functionality for printing the abstract syntax tree back into source text.

use crate::{
	lexer::IntFormat,
	node::{
		precedence, BinaryOp, Callee, FloatSuffix, Function, InterfaceBlock,
		LoopKind, Node, VariableDeclaration,
	},
	tree::GlslTree,
	ty::{
		LayoutId, SpecifiedType, StorageQualifier, StructField,
		StructSpecifier, TypeQualifier, TypeSpecifier,
	},
};
use std::fmt::Write;

/// Default number of spaces to indent by.
pub const INDENT: usize = 4;

pub(crate) struct Writer {
	buffer: String,
	indent: usize,
	/// Number of spaces per indentation level.
	width: usize,
}

impl Writer {
	fn indent(&mut self) {
		self.indent += 1;
	}
	fn de_indent(&mut self) {
		self.indent -= 1;
	}
}

/// Runs the printing function against a fresh writer, returning what it wrote.
pub(crate) fn to_string(f: impl FnOnce(&mut Writer)) -> String {
	to_string_with(INDENT, f)
}

/// Same as [`to_string()`], but with a custom indentation width.
pub(crate) fn to_string_with(width: usize, f: impl FnOnce(&mut Writer)) -> String {
	let mut writer = Writer {
		buffer: String::new(),
		indent: 0,
		width,
	};
	f(&mut writer);
	writer.buffer
}

macro_rules! new_line_part {
	($writer:expr, $($tts:tt)*) => {
		{
			::std::write!($writer.buffer, "{:indent$}", "", indent = $writer.indent * $writer.width).unwrap();
			::std::write!($writer.buffer, $($tts)*).unwrap();
		}
	};
	($writer:expr) => {
		{
			::std::write!($writer.buffer, "{:indent$}", "", indent = $writer.indent * $writer.width).unwrap();
		}
	};
}

macro_rules! continue_eol {
	($writer:expr, $($tts:tt)*) => {
		{
			::std::write!($writer.buffer, $($tts)*).unwrap();
			::std::write!($writer.buffer, "\n").unwrap();
		}
	};
}

macro_rules! part {
	($writer:expr, $($tts:tt)*) => {
		::std::write!($writer.buffer, $($tts)*).unwrap()
	};
}

pub(crate) fn write_tree(w: &mut Writer, tree: &GlslTree) {
	continue_eol!(w, "{}", tree.version);
	for directive in &tree.directives {
		continue_eol!(w, "{directive}");
	}
	for node in &tree.body {
		write_statement(w, node);
		continue_eol!(w, "");
	}
}

/// Writes a node; expressions are written bare, anything else as a complete statement.
pub(crate) fn write_node(w: &mut Writer, node: &Node) {
	if node.is_expression() {
		write_expr(w, node);
	} else {
		write_statement(w, node);
	}
}

/* STATEMENTS */

/// Writes a statement starting at the current position. Any further lines are indented to the current level, and
/// no trailing newline is written.
fn write_statement(w: &mut Writer, node: &Node) {
	match node {
		Node::Empty => part!(w, ";"),
		Node::Compound(body) => write_block(w, body),
		Node::VariableDeclaration(decl) => {
			write_variable_declaration(w, decl);
			part!(w, ";");
		}
		Node::DeclarationList(decls) => {
			for (i, decl) in decls.iter().enumerate() {
				if i == 0 {
					write_variable_declaration(w, decl);
				} else {
					part!(w, ", ");
					write_declarator(w, decl);
				}
			}
			part!(w, ";");
		}
		Node::QualifierDeclaration { qualifiers, names } => {
			write_qualifiers(w, qualifiers);
			if !names.is_empty() {
				part!(w, " {}", names.join(", "));
			}
			part!(w, ";");
		}
		Node::StructDeclaration(specifier) => {
			write_struct(w, specifier);
			part!(w, ";");
		}
		Node::InterfaceBlock(block) => write_interface_block(w, block),
		Node::PrecisionDeclaration { precision, ty } => {
			part!(w, "precision {} ", precision.keyword());
			write_type_specifier(w, ty);
			write_array_suffix(w, ty);
			part!(w, ";");
		}
		Node::Selection {
			condition,
			then,
			otherwise,
		} => {
			part!(w, "if (");
			write_condition(w, condition);
			part!(w, ") ");
			match otherwise {
				Some(otherwise) => {
					if ends_with_open_if(then) {
						write_block(w, std::slice::from_ref(&**then));
					} else {
						write_statement(w, then);
					}
					if matches!(**then, Node::Compound(_))
						|| ends_with_open_if(then)
					{
						part!(w, " else ");
					} else {
						continue_eol!(w, "");
						new_line_part!(w, "else ");
					}
					write_statement(w, otherwise);
				}
				None => write_statement(w, then),
			}
		}
		Node::Switch { condition, body } => {
			part!(w, "switch (");
			write_expr(w, condition);
			continue_eol!(w, ") {{");
			w.indent();
			for node in body {
				if matches!(node, Node::CaseLabel(_)) {
					new_line_part!(w);
					write_statement(w, node);
				} else {
					w.indent();
					new_line_part!(w);
					write_statement(w, node);
					w.de_indent();
				}
				continue_eol!(w, "");
			}
			w.de_indent();
			new_line_part!(w, "}}");
		}
		Node::CaseLabel(value) => match value {
			Some(value) => {
				part!(w, "case ");
				write_expr(w, value);
				part!(w, ":");
			}
			None => part!(w, "default:"),
		},
		Node::Loop {
			kind,
			condition,
			body,
		} => match kind {
			LoopKind::While => {
				part!(w, "while (");
				write_condition(w, condition);
				part!(w, ") ");
				write_statement(w, body);
			}
			LoopKind::DoWhile => {
				part!(w, "do ");
				write_statement(w, body);
				part!(w, " while (");
				write_expr(w, condition);
				part!(w, ");");
			}
		},
		Node::For {
			init,
			condition,
			increment,
			body,
		} => {
			part!(w, "for (");
			write_statement(w, init);
			if let Some(condition) = condition {
				part!(w, " ");
				write_condition(w, condition);
			}
			part!(w, ";");
			if let Some(increment) = increment {
				part!(w, " ");
				write_expr(w, increment);
			}
			part!(w, ") ");
			write_statement(w, body);
		}
		Node::Jump(kind) => part!(w, "{};", kind.keyword()),
		Node::Return(value) => match value {
			Some(value) => {
				part!(w, "return ");
				write_expr(w, value);
				part!(w, ";");
			}
			None => part!(w, "return;"),
		},
		Node::Function(function) => write_function(w, function),
		expr => {
			write_expr(w, expr);
			part!(w, ";");
		}
	}
}

/// Writes a `{ ... }` block with one statement per line.
fn write_block(w: &mut Writer, body: &[Node]) {
	if body.is_empty() {
		part!(w, "{{}}");
		return;
	}
	continue_eol!(w, "{{");
	w.indent();
	for node in body {
		new_line_part!(w);
		write_statement(w, node);
		continue_eol!(w, "");
	}
	w.de_indent();
	new_line_part!(w, "}}");
}

/// Returns whether the statement ends in an `if` without an `else`, which would capture a following `else`.
fn ends_with_open_if(node: &Node) -> bool {
	match node {
		Node::Selection {
			otherwise: None, ..
		} => true,
		Node::Selection {
			otherwise: Some(otherwise),
			..
		} => ends_with_open_if(otherwise),
		Node::Loop {
			kind: LoopKind::While,
			body,
			..
		}
		| Node::For { body, .. } => ends_with_open_if(body),
		_ => false,
	}
}

/// Writes the condition of an `if`, `while` or `for`, which is either an expression or an initialized declaration.
fn write_condition(w: &mut Writer, condition: &Node) {
	match condition {
		Node::VariableDeclaration(decl) => write_variable_declaration(w, decl),
		_ => write_expr(w, condition),
	}
}

/* DECLARATIONS */

fn write_variable_declaration(w: &mut Writer, decl: &VariableDeclaration) {
	write_specified_type(w, &decl.ty);
	part!(w, " ");
	write_declarator(w, decl);
}

/// Writes the name, array suffix and initializer of a declaration.
fn write_declarator(w: &mut Writer, decl: &VariableDeclaration) {
	part!(w, "{}", decl.name);
	write_array_suffix(w, &decl.ty.specifier);
	if let Some(init) = &decl.initializer {
		part!(w, " = ");
		write_operand(w, init, precedence::ASSIGNMENT);
	}
}

fn write_struct(w: &mut Writer, specifier: &StructSpecifier) {
	match &specifier.name {
		Some(name) => part!(w, "struct {name} "),
		None => part!(w, "struct "),
	}
	write_fields(w, &specifier.fields);
}

fn write_fields(w: &mut Writer, fields: &[StructField]) {
	if fields.is_empty() {
		part!(w, "{{}}");
		return;
	}
	continue_eol!(w, "{{");
	w.indent();
	for field in fields {
		new_line_part!(w);
		write_specified_type(w, &field.ty);
		part!(w, " {}", field.name);
		write_array_suffix(w, &field.ty.specifier);
		continue_eol!(w, ";");
	}
	w.de_indent();
	new_line_part!(w, "}}");
}

fn write_interface_block(w: &mut Writer, block: &InterfaceBlock) {
	write_qualifiers(w, &block.qualifiers);
	part!(w, " {} ", block.name);
	write_fields(w, &block.fields);
	if let Some(instance) = &block.instance {
		part!(w, " {instance}");
		for size in &block.instance_sizes {
			part!(w, "[");
			if let Some(size) = size {
				write_expr(w, size);
			}
			part!(w, "]");
		}
	}
	part!(w, ";");
}

fn write_function(w: &mut Writer, function: &Function) {
	let header = &function.header;
	write_specified_type(w, &header.return_type);
	write_array_suffix(w, &header.return_type.specifier);
	part!(w, " {}(", header.name);
	for (i, param) in header.parameters.iter().enumerate() {
		if i > 0 {
			part!(w, ", ");
		}
		write_specified_type(w, &param.ty);
		if let Some(name) = &param.name {
			part!(w, " {name}");
		}
		write_array_suffix(w, &param.ty.specifier);
	}
	part!(w, ")");
	match &function.body {
		Some(body) => {
			part!(w, " ");
			write_block(w, body);
		}
		None => part!(w, ";"),
	}
}

/* TYPES */

pub(crate) fn write_specified_type(w: &mut Writer, ty: &SpecifiedType) {
	if !ty.qualifiers.is_empty() {
		write_qualifiers(w, &ty.qualifiers);
		part!(w, " ");
	}
	write_type_specifier(w, &ty.specifier);
}

fn write_qualifiers(w: &mut Writer, qualifiers: &[TypeQualifier]) {
	for (i, qualifier) in qualifiers.iter().enumerate() {
		if i > 0 {
			part!(w, " ");
		}
		write_qualifier(w, qualifier);
	}
}

pub(crate) fn write_qualifier(w: &mut Writer, qualifier: &TypeQualifier) {
	match qualifier {
		TypeQualifier::Storage(StorageQualifier::Subroutine(types)) => {
			part!(w, "subroutine");
			if !types.is_empty() {
				part!(w, "({})", types.join(", "));
			}
		}
		TypeQualifier::Storage(storage) => part!(w, "{}", storage.keyword()),
		TypeQualifier::Layout(ids) => {
			part!(w, "layout(");
			for (i, id) in ids.iter().enumerate() {
				if i > 0 {
					part!(w, ", ");
				}
				match id {
					LayoutId::Shared => part!(w, "shared"),
					LayoutId::Identifier { name, value } => {
						part!(w, "{name}");
						if let Some(value) = value {
							part!(w, " = ");
							write_operand(w, value, precedence::ASSIGNMENT);
						}
					}
				}
			}
			part!(w, ")");
		}
		TypeQualifier::Precision(precision) => {
			part!(w, "{}", precision.keyword())
		}
		TypeQualifier::Interpolation(interpolation) => {
			part!(w, "{}", interpolation.keyword())
		}
		TypeQualifier::Invariant => part!(w, "invariant"),
		TypeQualifier::Precise => part!(w, "precise"),
	}
}

/// Writes the base type, without array suffixes.
pub(crate) fn write_type_specifier(w: &mut Writer, ty: &TypeSpecifier) {
	match ty {
		TypeSpecifier::Builtin(builtin) => part!(w, "{}", builtin.name()),
		TypeSpecifier::Named(name) => part!(w, "{name}"),
		TypeSpecifier::Struct(specifier) => write_struct(w, specifier),
		TypeSpecifier::Array { specifier, .. } => {
			write_type_specifier(w, specifier)
		}
	}
}

/// Writes the array suffixes, innermost first.
pub(crate) fn write_array_suffix(w: &mut Writer, ty: &TypeSpecifier) {
	if let TypeSpecifier::Array { specifier, size } = ty {
		write_array_suffix(w, specifier);
		part!(w, "[");
		if let Some(size) = size {
			write_expr(w, size);
		}
		part!(w, "]");
	}
}

/* EXPRESSIONS */

/// Writes an expression, wrapped in parenthesis if it binds looser than `min`.
fn write_operand(w: &mut Writer, node: &Node, min: u8) {
	if node.precedence() < min {
		part!(w, "(");
		write_expr(w, node);
		part!(w, ")");
	} else {
		write_expr(w, node);
	}
}

/// Writes an operand of an arithmetic or shift operation.
fn write_binary_operand(w: &mut Writer, parent: BinaryOp, node: &Node, min: u8) {
	match node {
		Node::Binary { op, .. } if *op != parent && op.needs_parentheses() => {
			part!(w, "(");
			write_expr(w, node);
			part!(w, ")");
		}
		_ => write_operand(w, node, min),
	}
}

fn write_list(w: &mut Writer, nodes: &[Node]) {
	for (i, node) in nodes.iter().enumerate() {
		if i > 0 {
			part!(w, ", ");
		}
		write_operand(w, node, precedence::ASSIGNMENT);
	}
}

fn write_expr(w: &mut Writer, node: &Node) {
	match node {
		Node::IntConstant {
			value,
			format,
			signed,
		} => {
			match format {
				IntFormat::Decimal => part!(w, "{value}"),
				IntFormat::Hexadecimal => part!(w, "{value:#X}"),
				IntFormat::Octal => part!(w, "0{value:o}"),
			}
			if !signed {
				part!(w, "u");
			}
		}
		Node::FloatConstant { value, suffix } => {
			// `Debug` always keeps a `.` or an exponent, so the literal re-lexes as a float.
			part!(w, "{value:?}");
			match suffix {
				FloatSuffix::None => {}
				FloatSuffix::Float => part!(w, "f"),
				FloatSuffix::Double => part!(w, "lf"),
			}
		}
		Node::BoolConstant(value) => part!(w, "{value}"),
		Node::Variable(name) => part!(w, "{name}"),
		Node::ArrayIndex { base, index } => {
			write_operand(w, base, precedence::POSTFIX);
			part!(w, "[");
			write_expr(w, index);
			part!(w, "]");
		}
		Node::Field { base, selection } => {
			if matches!(
				**base,
				Node::IntConstant { .. } | Node::FloatConstant { .. }
			) {
				part!(w, "(");
				write_expr(w, base);
				part!(w, ")");
			} else {
				write_operand(w, base, precedence::POSTFIX);
			}
			part!(w, ".{selection}");
		}
		Node::Unary { op, expr } => {
			if op.is_prefix() {
				part!(w, "{}", op.symbol());
				let fuses = match &**expr {
					Node::Unary { op: inner, .. } => {
						let first = inner.symbol().chars().next();
						inner.is_prefix()
							&& matches!(first, Some('+' | '-'))
							&& op.symbol().chars().last() == first
					}
					_ => false,
				};
				if fuses {
					part!(w, "(");
					write_expr(w, expr);
					part!(w, ")");
				} else {
					write_operand(w, expr, precedence::UNARY);
				}
			} else {
				write_operand(w, expr, precedence::POSTFIX);
				part!(w, "{}", op.symbol());
			}
		}
		Node::Binary { left, op, right } => {
			let p = op.precedence();
			write_binary_operand(w, *op, left, p);
			part!(w, " {} ", op.symbol());
			write_binary_operand(w, *op, right, p + 1);
		}
		Node::Compare { left, op, right } => {
			let p = op.precedence();
			write_operand(w, left, p);
			part!(w, " {} ", op.symbol());
			write_operand(w, right, p + 1);
		}
		Node::Bitwise { op, operands } => {
			for (i, operand) in operands.iter().enumerate() {
				if i > 0 {
					part!(w, " {} ", op.symbol());
				}
				write_operand(w, operand, op.precedence() + 1);
			}
		}
		Node::Logical { op, operands } => {
			for (i, operand) in operands.iter().enumerate() {
				if i > 0 {
					part!(w, " {} ", op.symbol());
				}
				write_operand(w, operand, op.precedence() + 1);
			}
		}
		Node::Conditional {
			condition,
			then,
			otherwise,
		} => {
			write_operand(w, condition, precedence::LOGICAL_OR);
			part!(w, " ? ");
			write_operand(w, then, precedence::COMMA);
			part!(w, " : ");
			write_operand(w, otherwise, precedence::ASSIGNMENT);
		}
		Node::Assignment { target, op, value } => {
			write_operand(w, target, precedence::UNARY);
			part!(w, " {} ", op.symbol());
			write_operand(w, value, precedence::ASSIGNMENT);
		}
		Node::Invoke { callee, args } => {
			match callee {
				Callee::Function(function) => {
					write_operand(w, function, precedence::POSTFIX)
				}
				Callee::Constructor(ty) => {
					write_type_specifier(w, ty);
					write_array_suffix(w, ty);
				}
			}
			part!(w, "(");
			write_list(w, args);
			part!(w, ")");
		}
		Node::Comma(nodes) => write_list(w, nodes),
		Node::InitializerList(nodes) => {
			part!(w, "{{");
			write_list(w, nodes);
			part!(w, "}}");
		}
		statement => write_statement(w, statement),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		node::{BinaryOp, UnaryOp},
		ty::BuiltinType,
	};

	/// Asserts that the source parses and prints back exactly as given.
	macro_rules! assert_prints {
		($src:expr) => {
			assert_eq!(crate::parse($src).unwrap().source_string(), $src);
		};
	}

	fn binary(left: Node, op: BinaryOp, right: Node) -> Node {
		Node::Binary {
			left: Box::new(left),
			op,
			right: Box::new(right),
		}
	}

	fn neg(expr: Node, op: UnaryOp) -> Node {
		Node::Unary {
			op,
			expr: Box::new(expr),
		}
	}

	#[test]
	fn literals() {
		assert_eq!(Node::int(42).source_string(), "42");
		let hex = Node::IntConstant {
			value: 31,
			format: IntFormat::Hexadecimal,
			signed: false,
		};
		assert_eq!(hex.source_string(), "0x1Fu");
		let oct = Node::IntConstant {
			value: 8,
			format: IntFormat::Octal,
			signed: true,
		};
		assert_eq!(oct.source_string(), "010");
		assert_eq!(Node::float(1.0).source_string(), "1.0");
		assert_eq!(Node::float(1e20).source_string(), "1e20");
		let double = Node::FloatConstant {
			value: 0.5,
			suffix: FloatSuffix::Double,
		};
		assert_eq!(double.source_string(), "0.5lf");
	}

	#[test]
	fn parenthesization() {
		let a = || Node::variable("a");
		let b = || Node::variable("b");
		let c = || Node::variable("c");
		let sum = binary(a(), BinaryOp::Add, b());
		assert_eq!(
			binary(sum.clone(), BinaryOp::Multiply, c()).source_string(),
			"(a + b) * c"
		);
		assert_eq!(
			binary(c(), BinaryOp::Multiply, sum.clone()).source_string(),
			"c * (a + b)"
		);
		assert_eq!(
			binary(sum.clone(), BinaryOp::Add, c()).source_string(),
			"a + b + c"
		);
		assert_eq!(
			binary(c(), BinaryOp::Add, sum.clone()).source_string(),
			"c + (a + b)"
		);
		// Mixed additive operations are bracketed even when the grouping is the default one.
		assert_eq!(
			binary(binary(a(), BinaryOp::Subtract, b()), BinaryOp::Add, c())
				.source_string(),
			"(a - b) + c"
		);
		assert_eq!(
			binary(binary(a(), BinaryOp::Multiply, b()), BinaryOp::Add, c())
				.source_string(),
			"a * b + c"
		);
		assert_eq!(
			neg(neg(a(), UnaryOp::Dash), UnaryOp::Dash).source_string(),
			"-(-a)"
		);
		assert_eq!(
			neg(neg(a(), UnaryOp::PreDecrement), UnaryOp::Plus)
				.source_string(),
			"+--a"
		);
		assert_eq!(
			neg(sum, UnaryOp::PostIncrement).source_string(),
			"(a + b)++"
		);
		let field = Node::Field {
			base: Box::new(Node::float(1.0)),
			selection: "x".into(),
		};
		assert_eq!(field.source_string(), "(1.0).x");
	}

	#[test]
	fn declarations() {
		let decl = Node::VariableDeclaration(VariableDeclaration {
			ty: SpecifiedType::new(
				TypeSpecifier::Builtin(BuiltinType::Float)
					.array(Some(Node::int(4))),
			),
			name: "data".into(),
			initializer: None,
		});
		assert_eq!(decl.source_string(), "float data[4];");
	}

	#[test]
	fn layout() {
		assert_prints!("#version 450 core\nvoid main() {\n    int a = 1;\n    if (a > 0) {\n        a++;\n    } else a--;\n}\n");
		assert_prints!("#version 450 core\nstruct Light {\n    vec3 position;\n    float radius;\n};\n");
		assert_prints!("#version 450 core\nvoid f() {\n    switch (x) {\n        case 0:\n            break;\n        default:\n            return;\n    }\n}\n");
		assert_prints!("#version 330 core\nlayout(std140) uniform Matrices {\n    mat4 proj;\n} mats[2];\n");
		assert_prints!("#version 300 es\nprecision highp float;\n");
		assert_prints!("#version 110\nvoid f() {\n    do x++; while (x < 10);\n    for (;;) {}\n}\n");
	}

	#[test]
	fn dangling_else() {
		let inner = Node::Selection {
			condition: Box::new(Node::variable("b")),
			then: Box::new(Node::Jump(crate::node::JumpKind::Break)),
			otherwise: None,
		};
		let outer = Node::Selection {
			condition: Box::new(Node::variable("a")),
			then: Box::new(inner),
			otherwise: Some(Box::new(Node::Jump(crate::node::JumpKind::Continue))),
		};
		assert_eq!(
			outer.source_string(),
			"if (a) {\n    if (b) break;\n} else continue;"
		);
	}

	#[test]
	fn indent_width() {
		let tree = crate::parse("void main() { return; }").unwrap();
		assert_eq!(
			tree.source_string_with(2),
			"#version 110\nvoid main() {\n  return;\n}\n"
		);
	}
}
