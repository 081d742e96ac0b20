//! `meili-query` - compile filter and sort documents from the command line.
//!
//! ```text
//! meili-query filter '{"age": {"$gte": 18}}'
//! echo '{"name": 1, "age": -1}' | meili-query sort --json
//! meili-query build '["age", ">=", 18]' '["name", "in", ["John", "Doe"]]'
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meili_query::{compile_filter, compile_sort, FilterBuilder, Value};

#[derive(Debug, Parser)]
#[command(
    name = "meili-query",
    version,
    about = "Compile MongoDB-style filter and sort documents into Meilisearch syntax"
)]
struct Cli {
    /// Log compiler activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a JSON filter document into a filter expression
    Filter {
        /// Filter document; read from stdin when omitted
        document: Option<String>,
    },
    /// Compile a JSON sort document into sort tokens
    Sort {
        /// Sort document; read from stdin when omitted
        document: Option<String>,

        /// Print the tokens as a JSON array instead of one per line
        #[arg(long)]
        json: bool,
    },
    /// Build a filter from `["field", "op", value]` clauses, joined with AND
    Build {
        /// One JSON array per clause
        #[arg(required = true)]
        clauses: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = run(&cli, &mut std::io::stdin().lock())?;
    println!("{output}");
    Ok(())
}

fn run(cli: &Cli, stdin: &mut impl Read) -> Result<String> {
    match &cli.command {
        Command::Filter { document } => {
            let document = read_document(document.as_deref(), stdin)?;
            compile_filter(&document).context("CLI: Failed to compile filter")
        }
        Command::Sort { document, json } => {
            let document = read_document(document.as_deref(), stdin)?;
            let tokens = compile_sort(Some(&document)).context("CLI: Failed to compile sort")?;
            if *json {
                serde_json::to_string(&tokens).context("CLI: Failed to encode sort tokens")
            } else {
                Ok(tokens.join("\n"))
            }
        }
        Command::Build { clauses } => {
            let mut builder = FilterBuilder::new();
            for clause in clauses {
                let args = parse_document(clause)?;
                let args = match &args {
                    Value::Array(items) => items.as_slice(),
                    other => std::slice::from_ref(other),
                };
                builder = builder
                    .where_args(args)
                    .with_context(|| format!("CLI: Invalid clause {clause}"))?;
            }
            tracing::debug!(fragments = builder.len(), "built filter");
            Ok(builder.build())
        }
    }
}

fn read_document(arg: Option<&str>, stdin: &mut impl Read) -> Result<Value> {
    match arg {
        Some(text) => parse_document(text),
        None => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("CLI: Failed to read document from stdin")?;
            parse_document(&text)
        }
    }
}

fn parse_document(text: &str) -> Result<Value> {
    tracing::debug!(bytes = text.len(), "parsing document");
    let json: serde_json::Value =
        serde_json::from_str(text).context("CLI: Document is not valid JSON")?;
    Value::from_json(json).context("CLI: Invalid document")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str], stdin: &str) -> Result<String> {
        let cli = Cli::parse_from(std::iter::once("meili-query").chain(args.iter().copied()));
        run(&cli, &mut stdin.as_bytes())
    }

    #[test]
    fn filter_from_argument() {
        let out = run_args(&["filter", r#"{"age": {"$gte": 18}, "name": ["John", "Doe"]}"#], "")
            .unwrap();
        assert_eq!(out, r#"age >= 18 AND name IN ["John", "Doe"]"#);
    }

    #[test]
    fn filter_from_stdin() {
        let out = run_args(&["filter"], r#"{"$or": [{"a": 1}, {"b": 2}]}"#).unwrap();
        assert_eq!(out, "(a = 1 OR b = 2)");
    }

    #[test]
    fn sort_output_formats() {
        let doc = r#"{"name": 1, "age": "desc"}"#;
        assert_eq!(run_args(&["sort", doc], "").unwrap(), "name:asc\nage:desc");
        assert_eq!(
            run_args(&["sort", "--json", doc], "").unwrap(),
            r#"["name:asc","age:desc"]"#
        );
    }

    #[test]
    fn build_clauses() {
        let out = run_args(&["build", r#"["age", ">=", 18]"#, r#"["name", "$ne", null]"#], "")
            .unwrap();
        assert_eq!(out, "age >= 18 AND name IS NOT NULL");
    }

    #[test]
    fn errors_carry_context() {
        let err = run_args(&["filter", "{"], "").unwrap_err();
        assert_eq!(err.to_string(), "CLI: Document is not valid JSON");

        let err = run_args(&["build", r#""age""#], "").unwrap_err();
        assert_eq!(format!("{err:#}"), r#"CLI: Invalid clause "age": Invalid arguments"#);

        let err = run_args(&["sort", r#"{"a": "up"}"#], "").unwrap_err();
        assert_eq!(format!("{err:#}"), "CLI: Failed to compile sort: Invalid direction: up");
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["meili-query", "sort", "-v", "{}"]);
        assert!(cli.verbose);
    }
}
