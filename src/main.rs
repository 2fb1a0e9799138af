use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use esrewrite::{
    apply_rules, load_from_path, parse, print_node, print_tree, rewrite, Dialect, FileRewrite,
    ReplacementFragment, RewriteResult,
};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

const JS_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx"];

#[derive(Parser)]
#[command(name = "esrewrite")]
#[command(about = "Structural search and replace for JavaScript", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print nodes matching a selector
    Search {
        /// Selector, e.g. `CallExpression[function.name="require"]` or `#/^foo$/`
        selector: String,

        /// Files or directories to search (`-` reads stdin)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Matching dialect
        #[arg(long, default_value = "selector")]
        mode: String,

        /// Emit matches as JSON
        #[arg(long)]
        json: bool,

        /// Print only the number of matches per file
        #[arg(long, conflicts_with = "json")]
        count: bool,
    },

    /// Replace every node matching a selector
    Replace {
        selector: String,

        /// Replacement: one expression or one statement
        replacement: String,

        /// Files or directories to rewrite (`-` reads stdin)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Matching dialect
        #[arg(long, default_value = "selector")]
        mode: String,

        /// Write changes in place instead of showing a diff
        #[arg(short, long)]
        write: bool,
    },

    /// Run the rules of a TOML rule file
    Apply {
        /// Rule file
        #[arg(short, long)]
        rules: PathBuf,

        /// Files or directories to rewrite (`-` reads stdin)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write changes in place instead of showing a diff
        #[arg(short, long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Search {
            selector,
            paths,
            mode,
            json,
            count,
        } => cmd_search(&selector, &paths, &mode, json, count),

        Commands::Replace {
            selector,
            replacement,
            paths,
            mode,
            write,
        } => cmd_replace(&selector, &replacement, &paths, &mode, write),

        Commands::Apply {
            rules,
            paths,
            write,
        } => cmd_apply(&rules, &paths, write),
    };

    match outcome {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// One input: a file on disk or standard input.
enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn label(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            Input::Stdin => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                Ok(text)
            }
            Input::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

/// Expand paths: directories are walked for JavaScript files, `-` is stdin.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<Input>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.as_os_str() == "-" {
            inputs.push(Input::Stdin);
        } else if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && is_javascript(entry.path()) {
                    inputs.push(Input::File(entry.path().to_path_buf()));
                }
            }
        } else {
            inputs.push(Input::File(path.clone()));
        }
    }
    Ok(inputs)
}

fn is_javascript(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| JS_EXTENSIONS.contains(&ext))
}

fn report_failure(label: &str, err: &anyhow::Error) {
    eprintln!("{} {label}: {err:#}", "error:".red().bold());
}

#[derive(Serialize)]
struct JsonMatch<'a> {
    file: &'a str,
    kind: &'a str,
    start: usize,
    end: usize,
    line: u32,
    column: u32,
    text: String,
}

fn cmd_search(selector: &str, paths: &[PathBuf], mode: &str, json: bool, count: bool) -> Result<usize> {
    let dialect: Dialect = mode.parse()?;
    let selector = dialect.compile(selector)?;
    let mut failures = 0;
    let mut json_matches = Vec::new();

    for input in collect_inputs(paths)? {
        let label = input.label();
        let tree = match input
            .read()
            .and_then(|source| parse(&source).map_err(anyhow::Error::from))
        {
            Ok(tree) => tree,
            Err(err) => {
                report_failure(&label, &err);
                failures += 1;
                continue;
            }
        };

        let matches = selector.evaluate(&tree);
        if count {
            println!("{label}:{}", matches.len());
            continue;
        }

        for node in matches {
            let text = print_node(node);
            let span = node.span();
            let (line, column) = span.map_or((0, 0), |s| (s.line, s.column));
            if json {
                json_matches.push(serde_json::to_value(JsonMatch {
                    file: &label,
                    kind: node.kind(),
                    start: span.map_or(0, |s| s.start),
                    end: span.map_or(0, |s| s.end),
                    line,
                    column,
                    text,
                })?);
            } else {
                let first_line = text.lines().next().unwrap_or_default();
                println!("{label}:{line}:{column}: {first_line}");
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&json_matches)?);
    }
    Ok(failures)
}

fn cmd_replace(
    selector: &str,
    replacement: &str,
    paths: &[PathBuf],
    mode: &str,
    write: bool,
) -> Result<usize> {
    let dialect: Dialect = mode.parse()?;
    let selector = dialect.compile(selector)?;
    let fragment = ReplacementFragment::parse(replacement)?;
    let mut failures = 0;

    for input in collect_inputs(paths)? {
        let result = input.read().and_then(|original| {
            let mut tree = parse(&original)?;
            let stats = rewrite(&mut tree, &selector, &fragment);
            let modified = print_tree(&tree);
            emit(&input, &original, &modified, stats.replaced, write)
        });
        if let Err(err) = result {
            report_failure(&input.label(), &err);
            failures += 1;
        }
    }
    Ok(failures)
}

fn cmd_apply(rules: &Path, paths: &[PathBuf], write: bool) -> Result<usize> {
    let config = load_from_path(rules)?;
    let mut failures = 0;

    for input in collect_inputs(paths)? {
        let label = input.label();
        let original = match input.read() {
            Ok(text) => text,
            Err(err) => {
                report_failure(&label, &err);
                failures += 1;
                continue;
            }
        };

        let applied = apply_rules(&config, &original);
        for (rule, err) in applied.failures() {
            eprintln!(
                "{} {label}: rule '{rule}' failed: {err}",
                "error:".red().bold()
            );
            failures += 1;
        }

        if let Err(err) = emit(&input, &original, &applied.output, applied.replacements(), write) {
            report_failure(&label, &err);
            failures += 1;
        }
    }
    Ok(failures)
}

/// Show or write one rewritten input.
///
/// Stdin is echoed rewritten to stdout; files get a diff, or are written in
/// place with `--write`.
fn emit(input: &Input, original: &str, modified: &str, replacements: usize, write: bool) -> Result<()> {
    let path = match input {
        Input::Stdin => {
            print!("{modified}");
            return Ok(());
        }
        Input::File(path) => path,
    };

    if original == modified {
        return Ok(());
    }

    if !write {
        display_diff(path, original, modified);
        return Ok(());
    }

    match FileRewrite::new(path, original, modified).apply()? {
        RewriteResult::Applied { file, .. } => println!(
            "{} {} ({replacements} replacements)",
            "Rewrote".green(),
            file.display()
        ),
        RewriteResult::Unchanged { file } => {
            println!("{}", format!("Unchanged {}", file.display()).dimmed())
        }
    }
    Ok(())
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (rewritten)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}
