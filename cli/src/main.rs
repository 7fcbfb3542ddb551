//! A command-line front end for the `glsl-tree` crate: tokenize, parse and reprint shader files.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use glsl_tree::{lexer, SyntaxError};
use std::io::Read;

#[derive(Debug, thiserror::Error)]
enum CliError {
	#[error("failed to read '{path}': {source}")]
	Io {
		path: String,
		source: std::io::Error,
	},
	#[error(transparent)]
	Syntax(#[from] SyntaxError),
	#[error("failed to serialize the output: {0}")]
	Json(#[from] serde_json::Error),
}

fn cli() -> Command {
	let file = Arg::new("FILE")
		.help("The shader file to read, or '-' for standard input")
		.required(true);
	let json = Arg::new("json")
		.long("json")
		.help("Print the output as JSON")
		.action(ArgAction::SetTrue);

	Command::new("glsl-tree")
		.about("Tokenizes, parses and reprints GLSL shaders")
		.version(env!("CARGO_PKG_VERSION"))
		.subcommand_required(true)
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.help("Log the parser's progress")
				.action(ArgAction::SetTrue)
				.global(true),
		)
		.arg(
			Arg::new("indent")
				.long("indent")
				.help("The number of spaces to indent blocks by")
				.value_parser(value_parser!(usize))
				.default_value("4")
				.global(true),
		)
		.subcommand(
			Command::new("tokens")
				.about("Prints the tokens of a shader, one per line")
				.arg(file.clone())
				.arg(json.clone()),
		)
		.subcommand(
			Command::new("format")
				.about("Parses a shader and prints it back")
				.arg(file.clone()),
		)
		.subcommand(
			Command::new("tree")
				.about("Parses a shader and dumps its syntax tree")
				.arg(file)
				.arg(json),
		)
		.subcommand(
			Command::new("expr")
				.about("Parses a single expression and prints it back")
				.arg(
					Arg::new("TEXT")
						.help("The expression, e.g. 'a + b * c'")
						.required(true),
				),
		)
}

fn main() {
	let matches = cli().get_matches();

	let mut logger = env_logger::Builder::from_default_env();
	if matches.get_flag("verbose") {
		logger.filter_level(log::LevelFilter::Trace);
	}
	logger.init();

	if let Err(e) = run(&matches) {
		report(&e);
		std::process::exit(1);
	}
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
	let indent = matches.get_one::<usize>("indent").copied().unwrap_or(4);

	match matches.subcommand() {
		Some(("tokens", args)) => {
			let source = read_source(args)?;
			let tokens = lexer::tokenize(&source)?;
			if args.get_flag("json") {
				println!("{}", serde_json::to_string_pretty(&tokens)?);
			} else {
				for token in &tokens {
					println!("{}", token_line(token));
				}
			}
		}
		Some(("format", args)) => {
			let source = read_source(args)?;
			let tree = glsl_tree::parse(&source)?;
			print!("{}", tree.source_string_with(indent));
		}
		Some(("tree", args)) => {
			let source = read_source(args)?;
			let tree = glsl_tree::parse(&source)?;
			if args.get_flag("json") {
				println!("{}", serde_json::to_string_pretty(&tree)?);
			} else {
				println!("{tree:#?}");
			}
		}
		Some(("expr", args)) => {
			let text = args
				.get_one::<String>("TEXT")
				.map(String::as_str)
				.unwrap_or_default();
			let expr = glsl_tree::parse_expression(text)?;
			println!("{}", expr.source_string());
		}
		_ => {}
	}

	Ok(())
}

/// Formats a token as its type, its text, then the classes it belongs to.
fn token_line(token: &lexer::Token) -> String {
	format!("{:?} {} {:?}", token.ty(), token.value(), token.ty().classes())
}

/// Reads the `FILE` argument, treating `-` as standard input.
fn read_source(args: &ArgMatches) -> Result<String, CliError> {
	let path = args
		.get_one::<String>("FILE")
		.map(String::as_str)
		.unwrap_or("-");
	log::debug!("Reading '{path}'");

	let result = if path == "-" {
		let mut buffer = String::new();
		std::io::stdin().read_to_string(&mut buffer).map(|_| buffer)
	} else {
		std::fs::read_to_string(path)
	};
	result.map_err(|source| CliError::Io {
		path: path.to_owned(),
		source,
	})
}

fn report(error: &CliError) {
	match error {
		CliError::Syntax(e) => {
			let (line, col) = e.line_col();
			eprintln!("error: {} (line {line}, column {col})", e);
			for cause in &e.causes {
				let (line, col) = cause.line_col();
				eprintln!("  caused by: {} (line {line}, column {col})", cause);
			}
		}
		_ => eprintln!("error: {error}"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verify_cli() {
		cli().debug_assert();
	}

	#[test]
	fn global_options() {
		let matches = cli()
			.try_get_matches_from(["glsl-tree", "format", "-v", "--indent", "2", "a.glsl"])
			.unwrap();
		assert!(matches.get_flag("verbose"));
		assert_eq!(matches.get_one::<usize>("indent"), Some(&2));
		let Some(("format", args)) = matches.subcommand() else {
			panic!("expected the format subcommand");
		};
		assert_eq!(args.get_one::<String>("FILE").unwrap(), "a.glsl");
	}

	#[test]
	fn token_lines() {
		let tokens = lexer::tokenize("main uniform").unwrap();
		assert_eq!(token_line(&tokens[0]), "Ident main IDENTIFIER");
		let line = token_line(&tokens[1]);
		assert!(line.starts_with("Uniform uniform "));
		assert!(line.contains("STORAGE_QUALIFIER"));
	}

	#[test]
	fn syntax_errors_propagate() {
		let matches = cli()
			.try_get_matches_from(["glsl-tree", "expr", "a +"])
			.unwrap();
		let Err(CliError::Syntax(e)) = run(&matches) else {
			panic!("expected a syntax error");
		};
		assert_eq!(e.offset, 2);
	}
}
