use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use req::{DefinitionLookup, Input, Literal, Options, PowerToken, Translator};

/// Translate Python functions or literal data into q.
#[derive(Debug, Parser)]
#[command(name = "req", version)]
struct Cli {
    /// Source file to read; stdin when omitted or `-`.
    infile: Option<PathBuf>,
    /// File to write; stdout when omitted or `-`.
    outfile: Option<PathBuf>,
    /// Translate only this top-level function from the input.
    #[arg(long, value_name = "NAME", conflicts_with = "data")]
    function: Option<String>,
    /// Treat the input as a YAML or JSON document holding a list or mapping.
    #[arg(long)]
    data: bool,
    /// Token used for `**`.
    #[arg(long, value_enum)]
    power: Option<PowerToken>,
    /// Maximum nesting depth of the syntax tree.
    #[arg(long)]
    max_depth: Option<usize>,
    /// YAML file with translation options; flags take precedence.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Reading {}", path.display()))?;
                Options::from_yaml(&text).with_context(|| format!("Parsing {}", path.display()))?
            }
            None => Options::default(),
        };
        if let Some(power) = self.power {
            options.power = power;
        }
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        Ok(options)
    }
}

fn is_stdio(path: &Option<PathBuf>) -> bool {
    path.as_deref().is_none_or(|path| path == Path::new("-"))
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    if is_stdio(path) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        return Ok(buffer);
    }
    let path = path.as_deref().unwrap_or(Path::new("-"));
    fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))
}

fn write_output(path: &Option<PathBuf>, output: &str) -> Result<()> {
    if is_stdio(path) {
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        if stdout.is_terminal() {
            stdout.write_all(b"\n")?;
        }
        return Ok(stdout.flush()?);
    }
    let path = path.as_deref().unwrap_or(Path::new("-"));
    fs::write(path, output).with_context(|| format!("Writing {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("REQ_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let translator = Translator::new(cli.options()?);
    let source = read_input(&cli.infile)?;

    let output = if cli.data {
        let document: serde_yaml::Value =
            serde_yaml::from_str(&source).context("Parsing data document")?;
        let value = Literal::try_from(document)?;
        translator.translate(&value)?
    } else if let Some(name) = &cli.function {
        let lookup = DefinitionLookup::new(&source, name);
        translator.translate(Input::Callable(&lookup))?
    } else {
        translator.translate(source.as_str())?
    };

    write_output(&cli.outfile, &output)
}
