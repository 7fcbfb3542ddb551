//! The abstract syntax tree.
//!
//! Every node owns its children, so a tree can be freely rewritten after parsing by matching on a node and
//! replacing or pushing children. Any node can be turned back into source text with
//! [`Node::source_string()`]; the output re-parses to the same tree.

use crate::{
	lexer::IntFormat,
	printing,
	ty::{
		Precision, SpecifiedType, StructField, StructSpecifier, TypeQualifier,
		TypeSpecifier,
	},
};

/// Operator precedence levels, from the loosest binding to the tightest.
pub(crate) mod precedence {
	/// Declarations, statements and other non-expression nodes.
	pub const NONE: u8 = 0;
	pub const COMMA: u8 = 1;
	pub const ASSIGNMENT: u8 = 2;
	pub const CONDITIONAL: u8 = 3;
	pub const LOGICAL_OR: u8 = 4;
	pub const LOGICAL_XOR: u8 = 5;
	pub const LOGICAL_AND: u8 = 6;
	pub const BIT_OR: u8 = 7;
	pub const BIT_XOR: u8 = 8;
	pub const BIT_AND: u8 = 9;
	pub const EQUALITY: u8 = 10;
	pub const RELATIONAL: u8 = 11;
	pub const SHIFT: u8 = 12;
	pub const ADDITIVE: u8 = 13;
	pub const MULTIPLICATIVE: u8 = 14;
	pub const UNARY: u8 = 15;
	pub const POSTFIX: u8 = 16;
	pub const PRIMARY: u8 = 17;
}

/// A node in the abstract syntax tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Node {
	/* PRIMARY */
	/// An integer literal. The format is kept so that the literal is reprinted in the same radix.
	IntConstant {
		value: u32,
		format: IntFormat,
		/// `false` for a `u`-suffixed literal.
		signed: bool,
	},
	/// A floating-point literal.
	FloatConstant { value: f64, suffix: FloatSuffix },
	BoolConstant(bool),
	/// A reference to a variable, e.g. `gl_Position`.
	Variable(String),
	/* EXPRESSIONS */
	/// An array index, e.g. `base[index]`.
	ArrayIndex { base: Box<Node>, index: Box<Node> },
	/// A field access or swizzle. Consecutive selections are kept together as one dotted path, e.g. `a.b.xy` has
	/// the selection `b.xy`.
	Field { base: Box<Node>, selection: String },
	Unary { op: UnaryOp, expr: Box<Node> },
	/// An arithmetic or shift operation.
	Binary {
		left: Box<Node>,
		op: BinaryOp,
		right: Box<Node>,
	},
	Compare {
		left: Box<Node>,
		op: CompareOp,
		right: Box<Node>,
	},
	/// A chain of `&`, `^` or `|` operations, e.g. `a & b & c`.
	Bitwise { op: BitwiseOp, operands: Vec<Node> },
	/// A chain of `&&`, `^^` or `||` operations.
	Logical { op: LogicalOp, operands: Vec<Node> },
	/// `condition ? then : otherwise`.
	Conditional {
		condition: Box<Node>,
		then: Box<Node>,
		otherwise: Box<Node>,
	},
	Assignment {
		target: Box<Node>,
		op: AssignmentOp,
		value: Box<Node>,
	},
	/// A function call or constructor, e.g. `foo(a)`, `vec3(1.0)`, `float[2](a, b)`.
	Invoke { callee: Callee, args: Vec<Node> },
	/// A comma-separated list of expressions evaluated left-to-right, e.g. `i++, j++`.
	Comma(Vec<Node>),
	/// A brace-enclosed aggregate initializer, e.g. `{ 1.0, 2.0 }`.
	InitializerList(Vec<Node>),
	/* DECLARATIONS */
	/// Qualifiers applied on their own, optionally to existing identifiers, e.g. `layout(local_size_x = 8) in;`
	/// or `invariant gl_Position;`.
	QualifierDeclaration {
		qualifiers: Vec<TypeQualifier>,
		names: Vec<String>,
	},
	/// A single variable declaration, e.g. `const float data[4] = float[4](0.0);`.
	VariableDeclaration(VariableDeclaration),
	/// Several variables declared with the same base type and qualifiers, e.g. `int a, b = 1;`.
	DeclarationList(Vec<VariableDeclaration>),
	/// A struct definition, e.g. `struct Foo { float a; };`.
	StructDeclaration(StructSpecifier),
	/// An interface block, e.g. `uniform Matrices { mat4 proj; } mats;`.
	InterfaceBlock(InterfaceBlock),
	/// A default precision declaration, e.g. `precision highp float;`.
	PrecisionDeclaration {
		precision: Precision,
		ty: TypeSpecifier,
	},
	/* STATEMENTS */
	/// An empty statement, i.e. a lone `;`.
	Empty,
	/// A braced block of statements.
	Compound(Vec<Node>),
	/// An `if` statement.
	Selection {
		condition: Box<Node>,
		then: Box<Node>,
		otherwise: Option<Box<Node>>,
	},
	Switch { condition: Box<Node>, body: Vec<Node> },
	/// A `case value:` label, or `default:` if there is no value.
	CaseLabel(Option<Box<Node>>),
	/// A `while` or `do-while` loop.
	Loop {
		kind: LoopKind,
		condition: Box<Node>,
		body: Box<Node>,
	},
	For {
		/// An expression statement, declaration or [`Empty`](Node::Empty).
		init: Box<Node>,
		condition: Option<Box<Node>>,
		increment: Option<Box<Node>>,
		body: Box<Node>,
	},
	Jump(JumpKind),
	Return(Option<Box<Node>>),
	/* FUNCTIONS */
	/// A function definition, or a prototype if it has no body.
	Function(Function),
}

/// The suffix of a floating-point literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FloatSuffix {
	None,
	/// `f` or `F`.
	Float,
	/// `lf` or `LF`.
	Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UnaryOp {
	PreIncrement,
	PreDecrement,
	PostIncrement,
	PostDecrement,
	/// `+`
	Plus,
	/// `-`
	Dash,
	/// `!`
	Bang,
	/// `~`
	Tilde,
}

impl UnaryOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			Self::PreIncrement | Self::PostIncrement => "++",
			Self::PreDecrement | Self::PostDecrement => "--",
			Self::Plus => "+",
			Self::Dash => "-",
			Self::Bang => "!",
			Self::Tilde => "~",
		}
	}

	/// Returns whether the operator is written before its operand.
	pub fn is_prefix(&self) -> bool {
		!matches!(self, Self::PostIncrement | Self::PostDecrement)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BinaryOp {
	LeftShift,
	RightShift,
	Add,
	Subtract,
	Multiply,
	Divide,
	Modulo,
}

impl BinaryOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			Self::LeftShift => "<<",
			Self::RightShift => ">>",
			Self::Add => "+",
			Self::Subtract => "-",
			Self::Multiply => "*",
			Self::Divide => "/",
			Self::Modulo => "%",
		}
	}

	pub fn precedence(&self) -> u8 {
		match self {
			Self::LeftShift | Self::RightShift => precedence::SHIFT,
			Self::Add | Self::Subtract => precedence::ADDITIVE,
			Self::Multiply | Self::Divide | Self::Modulo => {
				precedence::MULTIPLICATIVE
			}
		}
	}

	/// Returns whether an operation of this kind is always bracketed when nested under a different operation.
	pub fn needs_parentheses(&self) -> bool {
		!matches!(self, Self::Multiply | Self::Divide)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CompareOp {
	Less,
	Greater,
	LessEqual,
	GreaterEqual,
	Equal,
	NotEqual,
}

impl CompareOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			Self::Less => "<",
			Self::Greater => ">",
			Self::LessEqual => "<=",
			Self::GreaterEqual => ">=",
			Self::Equal => "==",
			Self::NotEqual => "!=",
		}
	}

	pub fn precedence(&self) -> u8 {
		match self {
			Self::Equal | Self::NotEqual => precedence::EQUALITY,
			_ => precedence::RELATIONAL,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BitwiseOp {
	And,
	Xor,
	Or,
}

impl BitwiseOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			Self::And => "&",
			Self::Xor => "^",
			Self::Or => "|",
		}
	}

	pub fn precedence(&self) -> u8 {
		match self {
			Self::And => precedence::BIT_AND,
			Self::Xor => precedence::BIT_XOR,
			Self::Or => precedence::BIT_OR,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LogicalOp {
	And,
	Xor,
	Or,
}

impl LogicalOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			Self::And => "&&",
			Self::Xor => "^^",
			Self::Or => "||",
		}
	}

	pub fn precedence(&self) -> u8 {
		match self {
			Self::And => precedence::LOGICAL_AND,
			Self::Xor => precedence::LOGICAL_XOR,
			Self::Or => precedence::LOGICAL_OR,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AssignmentOp {
	Equal,
	Multiply,
	Divide,
	Modulo,
	Add,
	Subtract,
	LeftShift,
	RightShift,
	And,
	Xor,
	Or,
}

impl AssignmentOp {
	pub fn symbol(&self) -> &'static str {
		match self {
			Self::Equal => "=",
			Self::Multiply => "*=",
			Self::Divide => "/=",
			Self::Modulo => "%=",
			Self::Add => "+=",
			Self::Subtract => "-=",
			Self::LeftShift => "<<=",
			Self::RightShift => ">>=",
			Self::And => "&=",
			Self::Xor => "^=",
			Self::Or => "|=",
		}
	}
}

/// What is being invoked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Callee {
	/// A function, (or a user-defined struct constructor), given by an expression such as `foo` or `arr.length`.
	Function(Box<Node>),
	/// A builtin type constructor, e.g. `vec3` or `float[2]`.
	Constructor(TypeSpecifier),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LoopKind {
	/// `while (condition) body`, which tests before each iteration.
	While,
	/// `do body while (condition);`, which tests after each iteration.
	DoWhile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum JumpKind {
	Break,
	Continue,
	Discard,
}

impl JumpKind {
	pub fn keyword(&self) -> &'static str {
		match self {
			Self::Break => "break",
			Self::Continue => "continue",
			Self::Discard => "discard",
		}
	}
}

/// A declared variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VariableDeclaration {
	/// The type, including any array suffixes that followed the name.
	pub ty: SpecifiedType,
	pub name: String,
	pub initializer: Option<Box<Node>>,
}

/// An interface block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InterfaceBlock {
	pub qualifiers: Vec<TypeQualifier>,
	/// The block name, e.g. `Matrices`.
	pub name: String,
	pub fields: Vec<StructField>,
	/// The instance name, e.g. `mats`, if there is one.
	pub instance: Option<String>,
	/// The array sizes following the instance name; `None` is an unsized `[]`.
	pub instance_sizes: Vec<Option<Node>>,
}

/// A function signature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionHeader {
	pub name: String,
	pub return_type: SpecifiedType,
	pub parameters: Vec<Parameter>,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Parameter {
	/// The parameter name; prototypes may omit it.
	pub name: Option<String>,
	pub ty: SpecifiedType,
}

/// A function definition or prototype.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Function {
	pub header: FunctionHeader,
	/// The statements of the body; `None` for a prototype.
	pub body: Option<Vec<Node>>,
}

impl Function {
	/// Returns whether this is a prototype, i.e. a function without a body.
	pub fn is_prototype(&self) -> bool {
		self.body.is_none()
	}
}

impl Node {
	/// Constructs a signed decimal integer literal.
	pub fn int(value: u32) -> Self {
		Self::IntConstant {
			value,
			format: IntFormat::Decimal,
			signed: true,
		}
	}

	/// Constructs an unsuffixed float literal.
	pub fn float(value: f64) -> Self {
		Self::FloatConstant {
			value,
			suffix: FloatSuffix::None,
		}
	}

	/// Constructs a variable reference.
	pub fn variable(name: impl Into<String>) -> Self {
		Self::Variable(name.into())
	}

	/// Constructs a call to a function by name.
	pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
		Self::Invoke {
			callee: Callee::Function(Box::new(Self::variable(name))),
			args,
		}
	}

	/// Returns the precedence of this node when it appears as an operand.
	pub(crate) fn precedence(&self) -> u8 {
		match self {
			Self::IntConstant { .. }
			| Self::FloatConstant { .. }
			| Self::BoolConstant(_)
			| Self::Variable(_)
			| Self::InitializerList(_) => precedence::PRIMARY,
			Self::ArrayIndex { .. } | Self::Field { .. } | Self::Invoke { .. } => {
				precedence::POSTFIX
			}
			Self::Unary { op, .. } => {
				if op.is_prefix() {
					precedence::UNARY
				} else {
					precedence::POSTFIX
				}
			}
			Self::Binary { op, .. } => op.precedence(),
			Self::Compare { op, .. } => op.precedence(),
			Self::Bitwise { op, .. } => op.precedence(),
			Self::Logical { op, .. } => op.precedence(),
			Self::Conditional { .. } => precedence::CONDITIONAL,
			Self::Assignment { .. } => precedence::ASSIGNMENT,
			Self::Comma(_) => precedence::COMMA,
			_ => precedence::NONE,
		}
	}

	/// Returns whether this node is an expression, (as opposed to a declaration or a statement).
	pub fn is_expression(&self) -> bool {
		self.precedence() != precedence::NONE
	}

	/// Returns the source text of this node.
	///
	/// Expressions are printed without a trailing `;`; declarations and statements are printed as complete
	/// statements.
	pub fn source_string(&self) -> String {
		printing::to_string(|w| printing::write_node(w, self))
	}

	/// Visits this node and every node nested within it, depth-first, parents before children.
	///
	/// Expressions nested within types, such as array sizes and layout values, are not visited.
	pub fn visit(&self, f: &mut impl FnMut(&Node)) {
		f(self);
		self.for_each_child(|child| child.visit(&mut *f));
	}

	/// Mutable version of [`visit()`](Self::visit()). The closure is called on a parent before its children, so
	/// any children it replaces are visited in their new form.
	pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
		f(self);
		self.for_each_child_mut(|child| child.visit_mut(&mut *f));
	}

	/// Calls the closure on every direct child of this node, in source order.
	pub fn for_each_child(&self, mut f: impl FnMut(&Node)) {
		match self {
			Self::IntConstant { .. }
			| Self::FloatConstant { .. }
			| Self::BoolConstant(_)
			| Self::Variable(_)
			| Self::QualifierDeclaration { .. }
			| Self::StructDeclaration(_)
			| Self::InterfaceBlock(_)
			| Self::PrecisionDeclaration { .. }
			| Self::Empty
			| Self::Jump(_)
			| Self::CaseLabel(None)
			| Self::Return(None) => {}
			Self::ArrayIndex { base, index } => {
				f(base);
				f(index);
			}
			Self::Field { base, .. } => f(base),
			Self::Unary { expr, .. } => f(expr),
			Self::Binary { left, right, .. }
			| Self::Compare { left, right, .. } => {
				f(left);
				f(right);
			}
			Self::Bitwise { operands, .. } | Self::Logical { operands, .. } => {
				operands.iter().for_each(f)
			}
			Self::Conditional {
				condition,
				then,
				otherwise,
			} => {
				f(condition);
				f(then);
				f(otherwise);
			}
			Self::Assignment { target, value, .. } => {
				f(target);
				f(value);
			}
			Self::Invoke { callee, args } => {
				if let Callee::Function(callee) = callee {
					f(callee);
				}
				args.iter().for_each(f);
			}
			Self::Comma(nodes)
			| Self::InitializerList(nodes)
			| Self::Compound(nodes) => nodes.iter().for_each(f),
			Self::VariableDeclaration(decl) => {
				if let Some(init) = &decl.initializer {
					f(init);
				}
			}
			Self::DeclarationList(decls) => {
				for init in decls.iter().filter_map(|d| d.initializer.as_ref()) {
					f(init);
				}
			}
			Self::Selection {
				condition,
				then,
				otherwise,
			} => {
				f(condition);
				f(then);
				if let Some(otherwise) = otherwise {
					f(otherwise);
				}
			}
			Self::Switch { condition, body } => {
				f(condition);
				body.iter().for_each(f);
			}
			Self::CaseLabel(Some(value)) | Self::Return(Some(value)) => f(value),
			Self::Loop {
				kind,
				condition,
				body,
			} => match kind {
				LoopKind::While => {
					f(condition);
					f(body);
				}
				LoopKind::DoWhile => {
					f(body);
					f(condition);
				}
			},
			Self::For {
				init,
				condition,
				increment,
				body,
			} => {
				f(init);
				if let Some(condition) = condition {
					f(condition);
				}
				if let Some(increment) = increment {
					f(increment);
				}
				f(body);
			}
			Self::Function(function) => {
				if let Some(body) = &function.body {
					body.iter().for_each(f);
				}
			}
		}
	}

	/// Mutable version of [`for_each_child()`](Self::for_each_child()).
	pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut Node)) {
		match self {
			Self::IntConstant { .. }
			| Self::FloatConstant { .. }
			| Self::BoolConstant(_)
			| Self::Variable(_)
			| Self::QualifierDeclaration { .. }
			| Self::StructDeclaration(_)
			| Self::InterfaceBlock(_)
			| Self::PrecisionDeclaration { .. }
			| Self::Empty
			| Self::Jump(_)
			| Self::CaseLabel(None)
			| Self::Return(None) => {}
			Self::ArrayIndex { base, index } => {
				f(base);
				f(index);
			}
			Self::Field { base, .. } => f(base),
			Self::Unary { expr, .. } => f(expr),
			Self::Binary { left, right, .. }
			| Self::Compare { left, right, .. } => {
				f(left);
				f(right);
			}
			Self::Bitwise { operands, .. } | Self::Logical { operands, .. } => {
				operands.iter_mut().for_each(f)
			}
			Self::Conditional {
				condition,
				then,
				otherwise,
			} => {
				f(condition);
				f(then);
				f(otherwise);
			}
			Self::Assignment { target, value, .. } => {
				f(target);
				f(value);
			}
			Self::Invoke { callee, args } => {
				if let Callee::Function(callee) = callee {
					f(callee);
				}
				args.iter_mut().for_each(f);
			}
			Self::Comma(nodes)
			| Self::InitializerList(nodes)
			| Self::Compound(nodes) => nodes.iter_mut().for_each(f),
			Self::VariableDeclaration(decl) => {
				if let Some(init) = &mut decl.initializer {
					f(init);
				}
			}
			Self::DeclarationList(decls) => {
				for init in decls.iter_mut().filter_map(|d| d.initializer.as_mut())
				{
					f(init);
				}
			}
			Self::Selection {
				condition,
				then,
				otherwise,
			} => {
				f(condition);
				f(then);
				if let Some(otherwise) = otherwise {
					f(otherwise);
				}
			}
			Self::Switch { condition, body } => {
				f(condition);
				body.iter_mut().for_each(f);
			}
			Self::CaseLabel(Some(value)) | Self::Return(Some(value)) => f(value),
			Self::Loop {
				kind,
				condition,
				body,
			} => match kind {
				LoopKind::While => {
					f(condition);
					f(body);
				}
				LoopKind::DoWhile => {
					f(body);
					f(condition);
				}
			},
			Self::For {
				init,
				condition,
				increment,
				body,
			} => {
				f(init);
				if let Some(condition) = condition {
					f(condition);
				}
				if let Some(increment) = increment {
					f(increment);
				}
				f(body);
			}
			Self::Function(function) => {
				if let Some(body) = &mut function.body {
					body.iter_mut().for_each(f);
				}
			}
		}
	}
}

impl From<VariableDeclaration> for Node {
	fn from(decl: VariableDeclaration) -> Self {
		Self::VariableDeclaration(decl)
	}
}

impl From<Function> for Node {
	fn from(function: Function) -> Self {
		Self::Function(function)
	}
}
