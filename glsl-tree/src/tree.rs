//! The root of a parsed translation unit.

use crate::{
	node::{Function, Node},
	printing, SyntaxError,
};

/// A parsed shader.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GlslTree {
	/// The version the shader declared, or version `110` if it didn't.
	pub version: GlslVersion,
	/// Every other preprocessor directive, verbatim, in the order they appeared.
	pub directives: Vec<String>,
	/// The top-level declarations and function definitions.
	pub body: Vec<Node>,
}

impl GlslTree {
	/// Returns the source text of the whole shader: the version line, then the directives, then one top-level item
	/// per line.
	pub fn source_string(&self) -> String {
		self.source_string_with(printing::INDENT)
	}

	/// Same as [`source_string()`](Self::source_string()), but indenting blocks by `indent` spaces.
	pub fn source_string_with(&self, indent: usize) -> String {
		printing::to_string_with(indent, |w| printing::write_tree(w, self))
	}

	/// Returns an iterator over every top-level function, including prototypes.
	pub fn functions(&self) -> impl Iterator<Item = &Function> {
		self.body.iter().filter_map(|node| match node {
			Node::Function(function) => Some(function),
			_ => None,
		})
	}

	/// Returns the definition of the function with the given name. If there is no definition, the first prototype
	/// is returned instead.
	pub fn function(&self, name: &str) -> Option<&Function> {
		let mut functions = self.functions().filter(|f| f.header.name == name);
		let first = functions.next()?;
		if first.is_prototype() {
			Some(functions.find(|f| !f.is_prototype()).unwrap_or(first))
		} else {
			Some(first)
		}
	}

	/// Mutable version of [`function()`](Self::function()).
	pub fn function_mut(&mut self, name: &str) -> Option<&mut Function> {
		let index = self
			.body
			.iter()
			.position(|node| {
				matches!(node, Node::Function(f) if f.header.name == name && !f.is_prototype())
			})
			.or_else(|| {
				self.body.iter().position(
					|node| matches!(node, Node::Function(f) if f.header.name == name),
				)
			})?;
		match &mut self.body[index] {
			Node::Function(function) => Some(function),
			_ => None,
		}
	}

	/// Visits every node in the body, depth-first, parents before children.
	pub fn visit(&self, mut f: impl FnMut(&Node)) {
		for node in &self.body {
			node.visit(&mut f);
		}
	}

	/// Mutable version of [`visit()`](Self::visit()).
	pub fn visit_mut(&mut self, mut f: impl FnMut(&mut Node)) {
		for node in &mut self.body {
			node.visit_mut(&mut f);
		}
	}
}

/// A `#version` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GlslVersion {
	/// The version number, e.g. `450`.
	pub number: u32,
	pub profile: Profile,
}

/// The profile of a version declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Profile {
	Core,
	Compatibility,
	Es,
}

impl Profile {
	pub fn keyword(&self) -> &'static str {
		match self {
			Self::Core => "core",
			Self::Compatibility => "compatibility",
			Self::Es => "es",
		}
	}
}

impl GlslVersion {
	pub fn new(number: u32, profile: Profile) -> Self {
		Self { number, profile }
	}

	pub fn is_core(&self) -> bool {
		self.profile == Profile::Core
	}

	/// Parses the contents of a `#version` directive, e.g. `#version 450 core`. A missing profile, (or the `core`
	/// profile), means core.
	///
	/// Returns `Ok(None)` if the directive is not a version directive.
	pub(crate) fn from_directive(
		directive: &str,
	) -> Result<Option<Self>, SyntaxError> {
		let rest = directive.trim_start_matches('#').trim_start();
		let Some(rest) = rest.strip_prefix("version") else {
			return Ok(None);
		};
		if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
			return Ok(None);
		}

		let mut words = rest.split_whitespace();
		let number = words
			.next()
			.and_then(|n| n.parse::<u32>().ok())
			.ok_or_else(|| {
				SyntaxError::new("Invalid version number", directive, 0)
			})?;
		let profile = match words.next() {
			None | Some("core") => Profile::Core,
			Some("compatibility") => Profile::Compatibility,
			Some("es") => Profile::Es,
			Some(other) => {
				return Err(SyntaxError::new(
					format!("Invalid version profile '{other}'"),
					directive,
					0,
				))
			}
		};
		Ok(Some(Self { number, profile }))
	}
}

impl Default for GlslVersion {
	fn default() -> Self {
		Self {
			number: 110,
			profile: Profile::Core,
		}
	}
}

impl std::fmt::Display for GlslVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#version {}", self.number)?;
		// Profiles only exist from 150 onwards; earlier versions are implicitly core.
		if self.number >= 150 || !self.is_core() {
			write!(f, " {}", self.profile.keyword())?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_directive() {
		assert_eq!(
			GlslVersion::from_directive("#version 450"),
			Ok(Some(GlslVersion::new(450, Profile::Core)))
		);
		assert_eq!(
			GlslVersion::from_directive("#  version 300 es"),
			Ok(Some(GlslVersion::new(300, Profile::Es)))
		);
		assert_eq!(
			GlslVersion::from_directive("#version 330 compatibility"),
			Ok(Some(GlslVersion::new(330, Profile::Compatibility)))
		);
		assert_eq!(GlslVersion::from_directive("#define A 1"), Ok(None));
		assert_eq!(GlslVersion::from_directive("#versions"), Ok(None));
		assert_eq!(
			GlslVersion::from_directive("#version abc")
				.unwrap_err()
				.message,
			"Invalid version number"
		);
	}

	#[test]
	fn send_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<GlslTree>();
		assert_send_sync::<Node>();
		assert_send_sync::<SyntaxError>();
		assert_send_sync::<crate::lexer::Token>();
	}

	#[test]
	fn version_display() {
		assert_eq!(GlslVersion::default().to_string(), "#version 110");
		assert_eq!(
			GlslVersion::new(450, Profile::Core).to_string(),
			"#version 450 core"
		);
		assert_eq!(
			GlslVersion::new(300, Profile::Es).to_string(),
			"#version 300 es"
		);
	}

	#[test]
	fn functions() {
		let mut tree = crate::parse(
			"float f(float x); void main() {} float f(float x) { return x; }",
		)
		.unwrap();
		assert_eq!(tree.functions().count(), 3);
		assert!(!tree.function("f").unwrap().is_prototype());
		assert!(tree.function("g").is_none());

		tree.function_mut("main")
			.unwrap()
			.body
			.as_mut()
			.unwrap()
			.push(Node::Return(None));
		assert_eq!(
			tree.source_string(),
			"#version 110\nfloat f(float x);\nvoid main() {\n    return;\n}\nfloat f(float x) {\n    return x;\n}\n"
		);
	}

	#[test]
	fn visit() {
		let mut tree = crate::parse("void main() { a = b + c; }").unwrap();
		let mut names = Vec::new();
		tree.visit(|node| {
			if let Node::Variable(name) = node {
				names.push(name.clone());
			}
		});
		assert_eq!(names, ["a", "b", "c"]);

		tree.visit_mut(|node| {
			if let Node::Variable(name) = node {
				name.make_ascii_uppercase();
			}
		});
		assert_eq!(
			tree.source_string(),
			"#version 110\nvoid main() {\n    A = B + C;\n}\n"
		);
	}
}
