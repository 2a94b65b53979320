use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use xmlmask::{reformat_bytes, Configuration, MaskRule};

/// Re-indent XML documents, masking the text of sensitive elements.
#[derive(Parser, Debug)]
#[command(name = "xmlmask", author, version, about)]
struct Args {
    /// String written at the start of every indented line.
    #[arg(long)]
    prefix: Option<String>,

    /// String repeated once per nesting level [default: two spaces].
    #[arg(long)]
    indent: Option<String>,

    /// Mask the text of an element, e.g. `ct:Nm=show-word-start`.
    /// Kinds: show-last-four, show-middle, show-word-start, show-none.
    #[arg(short, long = "mask", value_name = "[SPACE:]NAME=KIND")]
    masks: Vec<MaskRule>,

    /// JSON configuration file with prefix, indent and masks.
    #[arg(short, long, env = "XMLMASK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "XMLMASK_LOG", default_value = "warn")]
    log_level: String,

    /// Print a header before each document and log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Files to process, or an XML document given inline.
    paths: Vec<String>,
}

/// One document to process.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Inline(String),
    File(PathBuf),
}

impl Input {
    fn name(&self) -> String {
        match self {
            Input::Inline(_) => "stdin".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match self {
            Input::Inline(xml) => Ok(xml.clone().into_bytes()),
            Input::File(path) => {
                std::fs::read(path).with_context(|| format!("opening {} failed", path.display()))
            }
        }
    }
}

fn looks_like_xml(text: &str) -> bool {
    text.contains('<') && text.contains('>')
}

/// Piped stdin wins over arguments. XML-looking text is a single inline
/// document; anything else is a list of file paths.
fn discover_inputs(stdin: Option<String>, paths: &[String]) -> Vec<Input> {
    let joined = match stdin {
        Some(text) => text,
        None => paths.join(" ").trim().to_string(),
    };
    if looks_like_xml(&joined) {
        return vec![Input::Inline(joined)];
    }
    paths
        .iter()
        .map(|path| {
            let path = Path::new(path);
            Input::File(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
        })
        .collect()
}

fn configuration(args: &Args) -> Result<Configuration> {
    let mut config = if let Some(ref config_path) = args.config {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?
    } else {
        Configuration::default()
    };
    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(indent) = &args.indent {
        config.indent = indent.clone();
    }
    config.masks.extend(args.masks.iter().cloned());
    Ok(config)
}

fn init_tracing(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else {
        args.log_level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<bool> {
    let config = configuration(args)?;

    let stdin = if io::stdin().is_terminal() {
        None
    } else {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        Some(text)
    };
    let inputs = discover_inputs(stdin, &args.paths);
    if inputs.is_empty() {
        anyhow::bail!("no input: pass file paths, an XML document, or pipe XML to stdin");
    }

    let mut stdout = io::stdout().lock();
    let mut has_error = false;
    for (i, input) in inputs.iter().enumerate() {
        let name = input.name();
        debug!(input = %name, "processing document");
        if i > 0 {
            writeln!(stdout)?;
        }
        if args.verbose || inputs.len() > 1 {
            writeln!(stdout, "Output of {}", name)?;
        }
        let result = input
            .read()
            .and_then(|bytes| reformat_bytes(&bytes, &config).map_err(anyhow::Error::from));
        match result {
            Ok(output) => {
                stdout.write_all(&output)?;
                writeln!(stdout)?;
            }
            Err(e) => {
                has_error = true;
                error!(input = %name, "failed to reformat document");
                eprintln!("ERROR: {}: {:#}", name, e);
            }
        }
    }
    stdout.flush()?;
    Ok(!has_error)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
