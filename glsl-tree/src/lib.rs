//! *glsl-tree* is a crate for parsing glsl shaders into a mutable abstract syntax tree, and printing them back.
//!
//! The intended use is rewriting shaders before they are handed to the driver: parse the source, walk the tree to
//! find or inject declarations, statements and calls, then call `source_string()` on the root to get valid glsl
//! source back.
//!
//! ## The parsing pipeline
//! We start with a string of characters that makes up the glsl source file. We will use the following example to
//! illustrate the pipeline:
//! ```c
//! // Comment
//! int i = 5.0+1;
//! ```
//!
//! ### Tokens
//! The [`lexer`] converts the string into a vector of tokens, discarding whitespace and comments. The source string
//! would become (in pseudocode):
//! ```text
//! (type "int") (ident "i") (op "=") (float "5.0") (op "+") (int "1") (punct ";")
//! ```
//!
//! ### Abstract Syntax Tree
//! The parser walks the tokens with a [`TokenReader`](reader::TokenReader), trying each grammar production in turn
//! and backtracking whenever one does not match. The tokens would become (in pseudocode):
//! ```text
//! VariableDeclaration {
//!     ty: Builtin(Int),
//!     name: "i",
//!     initializer: Binary {
//!         left: FloatConstant(5.0),
//!         op: Add,
//!         right: IntConstant(1),
//!     }
//! }
//! ```
//!
//! Every [`Node`] can be printed back with [`Node::source_string()`], and a whole shader with
//! [`GlslTree::source_string()`]. Parenthesis are inserted wherever the tree's structure requires them, so a tree
//! that was modified after parsing still prints as source that re-parses to the same tree.
//!
//! ## Example
//! ```rust
//! use glsl_tree::{node::Node, parse};
//!
//! let mut tree = parse("void main() { color = base; }").unwrap();
//! let main = tree.function_mut("main").unwrap();
//! main.body.as_mut().unwrap().push(Node::call("applyFog", vec![Node::variable("color")]));
//! assert_eq!(
//!     tree.source_string(),
//!     "#version 110\nvoid main() {\n    color = base;\n    applyFog(color);\n}\n"
//! );
//! ```
//!
//! ## Cargo features
//! - `logging` - traces the parser's progress through the [`log`](https://docs.rs/log) crate.
//! - `serde` - derives `serde::Serialize` for the tokens and the tree.

mod error;
pub mod lexer;
pub mod node;
mod parser;
mod printing;
pub mod reader;
pub mod tree;
pub mod ty;

pub use error::SyntaxError;
pub use node::Node;
pub use parser::{parse, parse_expression, parse_expression_list};
pub use tree::{GlslTree, GlslVersion, Profile};

/// Logs a trace message through the `log` crate.
#[cfg(feature = "logging")]
macro_rules! trace {
	($($rest:tt)*) => {
		::log::trace!($($rest)*)
	};
}

/// Logs a trace message, (currently disabled without the `logging` feature).
#[cfg(not(feature = "logging"))]
macro_rules! trace {
	($($tts:tt)*) => {{}};
}

pub(crate) use trace;
