//! Behaviour tests for the grammar productions.
//!
//! Most tests parse a fragment and either inspect the resulting tree, or print it back and compare the text. The
//! `round_trip` tests check that printing a tree and parsing the output again produces an identical tree.

use super::*;
use crate::node::{AssignmentOp, Node};

macro_rules! assert_expr {
	($src:expr, $printed:expr) => {
		assert_eq!(parse_expression($src).unwrap().source_string(), $printed);
	};
	($src:expr) => {
		assert_expr!($src, $src);
	};
}

macro_rules! assert_round_trip {
	($src:expr) => {{
		let tree = parse($src).unwrap();
		let printed = tree.source_string();
		let reparsed = parse(&printed)
			.unwrap_or_else(|e| panic!("failed to re-parse:\n{printed}\n{e}"));
		assert_eq!(tree, reparsed, "printed as:\n{printed}");
	}};
}

macro_rules! assert_prints {
	($src:expr, $printed:expr) => {
		assert_eq!(
			parse($src).unwrap().source_string(),
			concat!("#version 110\n", $printed, "\n")
		);
	};
	($src:expr) => {
		assert_prints!($src, $src);
	};
}

fn var(name: &str) -> Node {
	Node::variable(name)
}

mod expressions {
	use super::*;

	#[test]
	fn precedence() {
		assert_expr!("1 + 2 * 3");
		assert_expr!("(1 + 2) * 3");
		assert_expr!("a - b - c");
		assert_expr!("a - (b - c)");
		assert_expr!("a + b - c", "(a + b) - c");
		assert_expr!("a * b / c");
		assert_expr!("a << 1 + b", "a << (1 + b)");
		assert_expr!("a && b || c");
		assert_expr!("(a || b) && c");
		assert_expr!("a & b | c ^ d");
		assert_expr!("a == b < c");
		assert_expr!("!(a == 3)");
		assert_expr!("a ? b : c ? d : e");
		assert_expr!("(a ? b : c) ? d : e");
		assert_expr!("a++ + ++b");
		assert_expr!("i---7", "i-- - 7");
		assert_expr!("- -a", "-(-a)");
		assert_expr!("((((a))))", "a");

		let Node::Binary { op, right, .. } = parse_expression("1 + 2 * 3").unwrap()
		else {
			panic!("expected a binary operation");
		};
		assert_eq!(op, BinaryOp::Add);
		assert!(matches!(
			*right,
			Node::Binary {
				op: BinaryOp::Multiply,
				..
			}
		));
	}

	#[test]
	fn associativity() {
		let expr = parse_expression("a = b = c").unwrap();
		assert_eq!(
			expr,
			Node::Assignment {
				target: Box::new(var("a")),
				op: AssignmentOp::Equal,
				value: Box::new(Node::Assignment {
					target: Box::new(var("b")),
					op: AssignmentOp::Equal,
					value: Box::new(var("c")),
				}),
			}
		);
		assert_eq!(expr.source_string(), "a = b = c");

		assert_eq!(
			parse_expression("a || b || c").unwrap(),
			Node::Logical {
				op: LogicalOp::Or,
				operands: vec![var("a"), var("b"), var("c")],
			}
		);
		assert_expr!("x += y *= 2");
	}

	#[test]
	fn literals() {
		assert_expr!("0x1F");
		assert_expr!("0XffU", "0xFFu");
		assert_expr!("017");
		assert_expr!("5u");
		assert_expr!("1.5f");
		assert_expr!("2.0lf");
		assert_expr!(".5", "0.5");
		assert_expr!("3.", "3.0");
		assert_expr!("1e3", "1000.0");
		assert_expr!("true || false");

		assert_eq!(
			parse_expression("0x1F").unwrap(),
			Node::IntConstant {
				value: 31,
				format: crate::lexer::IntFormat::Hexadecimal,
				signed: true,
			}
		);
	}

	#[test]
	fn postfix() {
		assert_expr!("a.b.c");
		assert_eq!(
			parse_expression("a.b.c").unwrap(),
			Node::Field {
				base: Box::new(var("a")),
				selection: "b.c".into(),
			}
		);
		assert_expr!("v.xyz[0]");
		assert_expr!("lights[i].color.rgb");
		assert_expr!("arr.length()");
		assert_expr!("m[0][1]++");
		assert_expr!("foo(1, bar())");
		assert_expr!("foo(void)", "foo()");
		assert_expr!("foo((a, b))");
	}

	#[test]
	fn constructors() {
		assert_expr!("vec3(1.0, 2.0, 3.0)");
		assert_expr!("float[2](1.0, 2.0)");
		assert_expr!("mat2(1.0)[0].x");
		// User-named types are ordinary calls.
		assert_eq!(
			parse_expression("Light(a)").unwrap(),
			Node::call("Light", vec![var("a")])
		);
		assert!(matches!(
			parse_expression("ivec2(1)").unwrap(),
			Node::Invoke {
				callee: Callee::Constructor(TypeSpecifier::Builtin(
					BuiltinType::IVec2
				)),
				..
			}
		));
	}

	#[test]
	fn nested_indices() {
		let depth = 30;
		let expr = format!("{}x{}", "a[".repeat(depth), "]".repeat(depth));

		let start = std::time::Instant::now();
		assert_expr!(expr.as_str());
		let nodes =
			parse_expression_list(&format!("{expr} = 1; float f = {expr};"))
				.unwrap();
		assert_eq!(nodes.len(), 2);
		assert!(start.elapsed() < std::time::Duration::from_secs(2));
	}

	#[test]
	fn comma() {
		assert_eq!(
			parse_expression("a, b").unwrap(),
			Node::Comma(vec![var("a"), var("b")])
		);
		assert_expr!("i++, j--");
	}

	#[test]
	fn trailing_tokens() {
		assert_expr!("a + b;;", "a + b");

		let err = parse_expression("a b").unwrap_err();
		assert_eq!(err.message, "Too many tokens provided");
		assert_eq!(err.offset, 2);

		let err = parse_expression("4294967296").unwrap_err();
		assert_eq!(err.message, "Unexpected token '4294967296'");
		assert_eq!(err.causes[0].message, "Invalid integer constant");
		assert_expr!("4294967295");

		let err = parse_expression("1e400").unwrap_err();
		assert_eq!(err.message, "Unexpected token '1e400'");
		assert_eq!(err.causes[0].message, "Invalid float constant");
		assert_expr!("1e300");

		assert!(parse_expression("").is_err());
		assert!(parse_expression("(a").is_err());
	}
}

mod declarations {
	use super::*;

	#[test]
	fn disambiguation() {
		let nodes = parse_expression_list("vec3(1.0, 2.0, 3.0);").unwrap();
		assert_eq!(nodes.len(), 1);
		assert!(matches!(
			&nodes[0],
			Node::Invoke {
				callee: Callee::Constructor(TypeSpecifier::Builtin(BuiltinType::Vec3)),
				args,
			} if args.len() == 3
		));

		let nodes = parse_expression_list("vec3 a;").unwrap();
		assert_eq!(
			nodes,
			vec![Node::VariableDeclaration(VariableDeclaration {
				ty: BuiltinType::Vec3.into(),
				name: "a".into(),
				initializer: None,
			})]
		);

		let nodes = parse_expression_list("Light l; l.radius = 2.0;").unwrap();
		assert!(matches!(&nodes[0], Node::VariableDeclaration(decl) if decl.ty.specifier.is_named()));
		assert!(matches!(&nodes[1], Node::Assignment { .. }));
	}

	#[test]
	fn structs() {
		let tree = parse("struct Foo { float a; int b; };").unwrap();
		assert_eq!(tree.body.len(), 1);
		let Node::StructDeclaration(specifier) = &tree.body[0] else {
			panic!("expected a struct declaration");
		};
		assert_eq!(specifier.name.as_deref(), Some("Foo"));
		assert_eq!(
			specifier.fields,
			vec![
				StructField {
					ty: BuiltinType::Float.into(),
					name: "a".into(),
				},
				StructField {
					ty: BuiltinType::Int.into(),
					name: "b".into(),
				},
			]
		);
		assert_prints!(
			"struct Foo { float a; int b; };",
			"struct Foo {\n    float a;\n    int b;\n};"
		);

		// A struct declared along with variables.
		let tree = parse("struct Light { vec3 pos; } lights[2];").unwrap();
		let Node::VariableDeclaration(decl) = &tree.body[0] else {
			panic!("expected a variable declaration");
		};
		assert_eq!(decl.name, "lights");
		assert!(matches!(
			decl.ty.specifier.base(),
			TypeSpecifier::Struct(StructSpecifier { name: Some(name), .. }) if name == "Light"
		));
		assert_prints!(
			"struct Light { vec3 pos; } lights[2];",
			"struct Light {\n    vec3 pos;\n} lights[2];"
		);

		// Several fields sharing a type.
		assert_prints!(
			"struct P { float x, y[2]; };",
			"struct P {\n    float x;\n    float y[2];\n};"
		);
	}

	#[test]
	fn variables() {
		assert_prints!("int a, b[2] = int[2](1, 2);");
		assert_prints!("const float PI = 3.14159;");
		assert_prints!("float a[2][] = float[2][](float[](1.0));");
		assert_prints!(
			"float m[2][2] = {{1.0, 2.0}, {3.0, 4.0},};",
			"float m[2][2] = {{1.0, 2.0}, {3.0, 4.0}};"
		);
		assert_prints!("float[3] a;", "float a[3];");

		let tree = parse("int a, b = 1;").unwrap();
		let Node::DeclarationList(decls) = &tree.body[0] else {
			panic!("expected a declaration list");
		};
		assert_eq!(decls.len(), 2);
		assert_eq!(decls[1].initializer.as_deref(), Some(&Node::int(1)));
	}

	#[test]
	fn qualifiers() {
		assert_prints!("layout(location = 0) out vec4 color;");
		assert_prints!("flat in int id;");
		assert_prints!("uniform highp sampler2D tex;");
		assert_prints!("layout(local_size_x = 8, local_size_y = 8) in;");
		assert_prints!("invariant gl_Position;");
		assert_prints!("precise invariant out vec4 p;");
		assert_prints!("coherent readonly buffer Data {\n    float values[];\n} data;");

		let tree = parse("invariant a, b;").unwrap();
		assert_eq!(
			tree.body[0],
			Node::QualifierDeclaration {
				qualifiers: vec![TypeQualifier::Invariant],
				names: vec!["a".into(), "b".into()],
			}
		);
	}

	#[test]
	fn interface_blocks() {
		let tree =
			parse("layout(std140) uniform Matrices { mat4 proj; mat4 view; } mats;")
				.unwrap();
		let Node::InterfaceBlock(block) = &tree.body[0] else {
			panic!("expected an interface block");
		};
		assert_eq!(block.name, "Matrices");
		assert_eq!(block.fields.len(), 2);
		assert_eq!(block.instance.as_deref(), Some("mats"));
		assert!(block.instance_sizes.is_empty());

		assert_prints!("buffer Data {\n    float values[];\n};");
		assert_prints!("in Vertex {\n    vec3 normal;\n} vertices[];");
	}

	#[test]
	fn precision() {
		assert_prints!("precision mediump float;");
		assert_eq!(
			parse("precision lowp int;").unwrap().body[0],
			Node::PrecisionDeclaration {
				precision: crate::ty::Precision::LowP,
				ty: TypeSpecifier::Builtin(BuiltinType::Int),
			}
		);
	}

	#[test]
	fn functions() {
		assert_prints!("float f(float, out vec3 n[2]);");
		assert_prints!("void main(void) {}", "void main() {}");
		assert_prints!("vec4[2] pair();");
		assert_prints!("subroutine vec4 Shade(vec3 n);");
		assert_prints!(
			"subroutine(Shade) vec4 red(vec3 n) { return vec4(1.0); }",
			"subroutine(Shade) vec4 red(vec3 n) {\n    return vec4(1.0);\n}"
		);

		let tree = parse("float f(in float x, float) { return x; }").unwrap();
		let function = tree.function("f").unwrap();
		assert_eq!(function.header.parameters.len(), 2);
		assert_eq!(function.header.parameters[0].name.as_deref(), Some("x"));
		assert_eq!(function.header.parameters[1].name, None);
		assert_eq!(
			function.body.as_deref(),
			Some(&[Node::Return(Some(Box::new(var("x"))))][..])
		);
	}
}

mod statements {
	use super::*;

	#[test]
	fn for_loop() {
		let tree = parse("for (int i = 0; i < 10; i++) { x += i; }").unwrap();
		assert_eq!(tree.body.len(), 1);
		let Node::For {
			init,
			condition,
			increment,
			body,
		} = &tree.body[0]
		else {
			panic!("expected a for loop");
		};
		assert!(matches!(&**init, Node::VariableDeclaration(decl) if decl.name == "i"));
		assert!(matches!(
			condition.as_deref(),
			Some(Node::Compare {
				op: CompareOp::Less,
				..
			})
		));
		assert!(matches!(
			increment.as_deref(),
			Some(Node::Unary {
				op: UnaryOp::PostIncrement,
				..
			})
		));
		let Node::Compound(body) = &**body else {
			panic!("expected a compound body");
		};
		assert_eq!(body.len(), 1);
		assert!(matches!(
			body[0],
			Node::Assignment {
				op: AssignmentOp::Add,
				..
			}
		));

		assert_eq!(
			tree.body[0].source_string(),
			"for (int i = 0; i < 10; i++) {\n    x += i;\n}"
		);
	}

	#[test]
	fn selection() {
		let nodes = parse_expression_list(
			"if (a) b = 1; else if (c) b = 2; else b = 3;",
		)
		.unwrap();
		assert_eq!(
			nodes[0].source_string(),
			"if (a) b = 1;\nelse if (c) b = 2;\nelse b = 3;"
		);
		let reparsed = parse_expression_list(&nodes[0].source_string()).unwrap();
		assert_eq!(nodes, reparsed);

		// The `else` belongs to the inner `if`.
		let nodes = parse_expression_list("if (a) if (b) x(); else y();").unwrap();
		let Node::Selection {
			then, otherwise, ..
		} = &nodes[0]
		else {
			panic!("expected an if statement");
		};
		assert!(otherwise.is_none());
		assert!(matches!(
			&**then,
			Node::Selection {
				otherwise: Some(_),
				..
			}
		));
	}

	#[test]
	fn loops_and_jumps() {
		let src = "while (true) {\n    if (x) break;\n    continue;\n}";
		assert_eq!(parse_expression_list(src).unwrap()[0].source_string(), src);

		let src = "do {\n    discard;\n} while (false);";
		assert_eq!(parse_expression_list(src).unwrap()[0].source_string(), src);

		let nodes = parse_expression_list("return; return a + 1; ;").unwrap();
		assert_eq!(
			nodes,
			vec![
				Node::Return(None),
				Node::Return(Some(Box::new(Node::Binary {
					left: Box::new(var("a")),
					op: BinaryOp::Add,
					right: Box::new(Node::int(1)),
				}))),
				Node::Empty,
			]
		);
	}

	#[test]
	fn conditions() {
		let nodes = parse_expression_list("while (bool b = check()) {}").unwrap();
		let Node::Loop { condition, .. } = &nodes[0] else {
			panic!("expected a loop");
		};
		assert!(matches!(&**condition, Node::VariableDeclaration(decl) if decl.name == "b"));
		assert_eq!(nodes[0].source_string(), "while (bool b = check()) {}");
	}

	#[test]
	fn switch() {
		let nodes = parse_expression_list(
			"switch (x) { case 0: case 1: y = 2; break; default: discard; }",
		)
		.unwrap();
		let Node::Switch { body, .. } = &nodes[0] else {
			panic!("expected a switch");
		};
		assert_eq!(body.len(), 6);
		assert_eq!(body[0], Node::CaseLabel(Some(Box::new(Node::int(0)))));
		assert_eq!(body[4], Node::CaseLabel(None));
	}
}

mod errors {
	use super::*;

	#[test]
	fn position() {
		let err = parse("int a = ;").unwrap_err();
		assert_eq!(err.message, "Unexpected token ';'");
		assert_eq!(err.offset, 8);
		assert_eq!(err.full_source, "int a = ;");
		assert!(err
			.causes
			.iter()
			.any(|c| c.message == "Expected initializer after '='"));
		assert_eq!(err.to_string(), "Unexpected token ';' at position 8");
	}

	#[test]
	fn missing_semicolon() {
		let err = parse("void main() { int a = 1 }").unwrap_err();
		assert_eq!(err.message, "Unexpected token '}'");
		assert_eq!(err.offset, 26);
		assert!(err.causes.iter().any(|c| c.message == "Expected ';'"));
	}

	#[test]
	fn earlier_items_are_committed() {
		// Diagnostics from the first declaration must not leak into the error for the second one.
		let err = parse("int a = 1;\nfloat = 2;").unwrap_err();
		assert_eq!(err.message, "Unexpected token '='");
		assert_eq!(err.offset, 18);
	}

	#[test]
	fn lexing() {
		let err = parse("int a = @;").unwrap_err();
		assert_eq!(err.message, "Invalid character '@'");
		assert_eq!(err.offset, 8);
	}

	#[test]
	fn version() {
		assert_eq!(parse("#version 450\n").unwrap().version.number, 450);
		assert_eq!(
			parse("#version four\n").unwrap_err().message,
			"Invalid version number"
		);
		let tree = parse("#version 300 es\n#extension GL_foo : enable\n").unwrap();
		assert_eq!(tree.version, GlslVersion::new(300, crate::Profile::Es));
		assert_eq!(tree.directives, ["#extension GL_foo : enable"]);
	}

	#[test]
	fn late_version() {
		let err = parse("#version 150\n#version 450\nint a;").unwrap_err();
		assert_eq!(err.message, "The version directive must come first");
		assert_eq!(err.offset, 13);
		assert!(parse("int a;\n#version 450\n").is_err());
	}

	#[test]
	fn statement_list() {
		let err = parse_expression_list("a; )").unwrap_err();
		assert_eq!(err.message, "Too many tokens provided");
		assert_eq!(err.offset, 4);
		assert!(parse_expression_list("").unwrap().is_empty());
	}
}

/// Checks that a production which fails to match leaves the cursor where it started.
mod backtracking {
	use super::*;

	fn assert_no_match<T: std::fmt::Debug>(source: &str, production: Production<T>) {
		let mut r = TokenReader::new(tokenize(source).unwrap());
		let result = production(&mut r);
		assert!(result.is_none(), "`{source}` matched: {result:?}");
		assert_eq!(r.cursor(), 0, "`{source}` moved the cursor");
	}

	#[test]
	fn expressions() {
		assert_no_match(")", expression);
		assert_no_match("= a", assignment);
		assert_no_match("(a + b", primary);
		assert_no_match("vec3 a", postfix);
		assert_no_match("(a, b", call_args);
		assert_no_match("{1, 2", initializer);
		assert_no_match(")", condition);
		assert_no_match("!", unary);
	}

	#[test]
	fn types() {
		assert_no_match("struct { float a;", type_specifier);
		assert_no_match("const uniform 5", fully_specified_type);
		assert_no_match("layout(location = )", layout_qualifier);
		assert_no_match("subroutine(A", qualifier);
		assert_no_match("[1", array_suffix);
	}

	#[test]
	fn declarations() {
		assert_no_match("int a = ;", declaration);
		assert_no_match("int a, b", variable_declarations);
		assert_no_match("void f(int", function_prototype);
		assert_no_match("void f() { return; ", function_definition);
		assert_no_match("uniform Block { float a; }", interface_block);
		assert_no_match("struct { float a; };", struct_declaration);
		assert_no_match("precision highp", precision_declaration);
	}

	#[test]
	fn statements() {
		assert_no_match("if (a) ", statement);
		assert_no_match("{ a = 1;", block);
		assert_no_match("for (int i = 0; i < 3; i++)", iteration);
		assert_no_match("do a++; while (b)", iteration);
		assert_no_match("case 1", case_label);
		assert_no_match("return a", jump);
		assert_no_match("switch (a) { case 1: ", switch);
	}

	#[test]
	fn matches_advance() {
		let mut r = TokenReader::new(tokenize("a + b; c").unwrap());
		assert!(expression(&mut r).is_some());
		assert_eq!(r.cursor(), 3);
		assert!(statement(&mut TokenReader::new(tokenize(";").unwrap())).is_some());
	}
}

mod round_trip {
	use super::*;

	#[test]
	fn shader() {
		assert_round_trip!(
			r"#version 330 core
#define LIGHTS 4
layout(location = 0) in vec3 position;
layout(std140) uniform Matrices {
	mat4 proj;
	mat4 view;
} mats;
struct Light { vec3 pos; float radius; };
uniform Light lights[LIGHTS];
out vec4 color;
const float PI = 3.14159;
float attenuate(in Light light, vec3 p);
float attenuate(in Light light, vec3 p) {
	float d = length(light.pos - p);
	return d < light.radius ? 1.0 - d / light.radius : 0.0;
}
void main() {
	vec4 sum = vec4(0.0);
	for (int i = 0; i < LIGHTS; ++i) {
		if (lights[i].radius <= 0.0) continue;
		sum.rgb += vec3(attenuate(lights[i], position));
	}
	int mask = 0xFF & (1 << 3) | 2;
	switch (mask) {
		case 0:
		case 1:
			sum *= 2.0;
			break;
		default:
			discard;
	}
	do { mask >>= 1; } while (mask > 0 && !(mask == 3));
	color = sum.a > 0.5 ? sum : vec4(sum.rgb, 1.0);
	gl_Position = mats.proj * mats.view * vec4(position, 1.0);
}
"
		);
	}

	#[test]
	fn fragments() {
		assert_round_trip!("float x = -(-1.0) - -(2.0);");
		assert_round_trip!("int a = (1, 2);");
		assert_round_trip!("float f() { return a.b.c[0].d; }");
		assert_round_trip!("void f() { if (a) { if (b) x(); } else y(); }");
		assert_round_trip!("void f() { for (;;) { while (i < 3) i++; } }");
		assert_round_trip!("void f() { x = (a = b) + 1; y = a ? (b, c) : d; }");
		assert_round_trip!("uint m = 0x10u >> 2u << 1u;");
		assert_round_trip!("float v[] = float[](1.0, 2.0);");
	}

	#[test]
	fn modified_tree() {
		// Replacing a child with a looser-binding expression keeps the meaning.
		let mut expr = parse_expression("a * b").unwrap();
		expr.visit_mut(&mut |node| {
			if *node == var("b") {
				*node = parse_expression("c + d").unwrap();
			}
		});
		assert_eq!(expr.source_string(), "a * (c + d)");
		assert_eq!(parse_expression(&expr.source_string()).unwrap(), expr);
	}
}
