//! Command-line companion for the resyn parser: parse files and dump their
//! trees, diagnostics, or raw token streams.

use clap::{Parser as ClapParser, Subcommand};
use resyn::{AstNode, Lexer, ParserConfig};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(name = "resyn-tools", about = "Error-tolerant parser tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and print diagnostics and the recovered tree
    Parse {
        /// Source file to parse
        file: PathBuf,
        /// Disable the empty-statement recovery shortcut
        #[arg(long)]
        strict: bool,
        /// Print parse metrics
        #[arg(long)]
        metrics: bool,
    },
    /// Dump the token stream of a file, trivia included
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Parse {
            file,
            strict,
            metrics,
        } => run_parse(&file, strict, metrics),
        Command::Tokens { file } => run_tokens(&file),
    }
}

fn run_parse(file: &PathBuf, strict: bool, metrics: bool) -> ExitCode {
    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {err}", file.display());
            return ExitCode::from(2);
        }
    };

    let config = ParserConfig {
        empty_statement_recovery: !strict,
    };
    let result = resyn::parse_with_config(&source, config);

    for diagnostic in &result.diagnostics {
        eprintln!("{}:{diagnostic}", file.display());
    }

    println!("{}", render(&result.root));

    if metrics {
        eprintln!(
            "tokens: {}, nodes: {}, recoveries: {}, time: {:?}",
            result.metrics.tokens_consumed,
            result.metrics.nodes_created,
            result.metrics.errors_recovered,
            result.metrics.parse_time,
        );
    }

    if result.diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn run_tokens(file: &PathBuf) -> ExitCode {
    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {err}", file.display());
            return ExitCode::from(2);
        }
    };

    for token in Lexer::tokenize(&source) {
        println!("{} {:?} {:?}", token.span, token.kind, token.text);
    }
    ExitCode::SUCCESS
}

/// Render the tree with one node per line, indented by depth.
fn render(root: &AstNode) -> String {
    let mut out = String::new();
    render_node(root, 0, &mut out);
    out
}

fn render_node(node: &AstNode, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match node {
        AstNode::CompilationUnit { functions } => {
            let _ = writeln!(out, "{pad}compilation-unit");
            for f in functions {
                render_node(f, depth + 1, out);
            }
        }
        AstNode::Function {
            modifiers,
            name,
            signature,
            body,
            ..
        } => {
            let _ = writeln!(out, "{pad}function {}", leaf_summary(name));
            for m in modifiers {
                render_node(m, depth + 1, out);
            }
            render_node(signature, depth + 1, out);
            render_node(body, depth + 1, out);
        }
        AstNode::Signature {
            params,
            return_type,
            ..
        } => {
            let _ = writeln!(out, "{pad}signature");
            render_node(params, depth + 1, out);
            render_node(return_type, depth + 1, out);
        }
        AstNode::Params(params) => {
            let _ = writeln!(out, "{pad}params ({})", params.len());
        }
        AstNode::ReturnTypeDesc { ty, .. } => {
            let _ = writeln!(out, "{pad}returns {}", leaf_summary(ty));
        }
        AstNode::Block { statements, .. } => {
            let _ = writeln!(out, "{pad}block");
            for s in statements {
                render_node(s, depth + 1, out);
            }
        }
        AstNode::ExternalBody { keyword, .. } => {
            let _ = writeln!(out, "{pad}external-body {}", leaf_summary(keyword));
        }
        AstNode::VarDef { ty, name, expr, .. } => {
            let _ = writeln!(
                out,
                "{pad}var-def {} {}",
                leaf_summary(ty),
                leaf_summary(name)
            );
            render_node(expr, depth + 1, out);
        }
        AstNode::Assignment { target, expr, .. } => {
            let _ = writeln!(out, "{pad}assignment {}", leaf_summary(target));
            render_node(expr, depth + 1, out);
        }
        AstNode::Binary { lhs, op, rhs } => {
            let _ = writeln!(out, "{pad}binary {}", leaf_summary(op));
            render_node(lhs, depth + 1, out);
            render_node(rhs, depth + 1, out);
        }
        AstNode::Grouped { expr, .. } => {
            let _ = writeln!(out, "{pad}grouped");
            render_node(expr, depth + 1, out);
        }
        AstNode::Leaf(token) => {
            let _ = writeln!(out, "{pad}{:?} {:?}", token.kind, token.text);
        }
        AstNode::Missing(rule) => {
            let _ = writeln!(out, "{pad}missing {rule}");
        }
        AstNode::Empty => {
            let _ = writeln!(out, "{pad}empty");
        }
    }
}

fn leaf_summary(node: &AstNode) -> String {
    match node {
        AstNode::Leaf(token) => token.text.to_string(),
        AstNode::Missing(rule) => format!("<missing {rule}>"),
        AstNode::Empty => "<empty>".to_string(),
        _ => "<node>".to_string(),
    }
}
