use mermend_core::{DetectorRegistry, Engine, Outcome, PipelineOptions};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Convert,
    Detect,
    Clean,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    json: bool,
    group_long: bool,
}

#[derive(Serialize)]
struct DetectOut<'a> {
    dialect: &'a str,
}

fn usage() -> &'static str {
    "mermend-cli\n\
\n\
USAGE:\n\
  mermend-cli [convert] [--json] [--pretty] [--group-long] [<path>|-]\n\
  mermend-cli detect [--json] [<path>|-]\n\
  mermend-cli clean [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - convert runs the full pipeline and prints renderable flowchart source;\n\
    --json wraps the outcome with its kind and dialect instead.\n\
  - detect prints the detected dialect keyword.\n\
  - clean runs only the repair pass, without dialect conversion.\n\
  - --group-long restructures oversized flat flowcharts into subgraphs.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut command_seen = false;

    for arg in argv.iter().skip(1) {
        match arg.as_str() {
            "convert" if !command_seen => {
                args.command = Command::Convert;
                command_seen = true;
            }
            "detect" if !command_seen => {
                args.command = Command::Detect;
                command_seen = true;
            }
            "clean" if !command_seen => {
                args.command = Command::Clean;
                command_seen = true;
            }
            "--pretty" => args.pretty = true,
            "--json" => args.json = true,
            "--group-long" => args.group_long = true,
            "-h" | "--help" => return Err(CliError::Usage(usage())),
            other if other == "-" || !other.starts_with('-') => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(other.to_string());
            }
            _ => return Err(CliError::Usage(usage())),
        }
    }

    Ok(args)
}

fn read_input(path: Option<&str>) -> Result<String, CliError> {
    match path {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn run() -> Result<(), CliError> {
    let argv: Vec<String> = std::env::args().collect();
    let args = parse_args(&argv)?;
    let input = read_input(args.input.as_deref())?;

    match args.command {
        Command::Detect => {
            let registry = DetectorRegistry::default_dialects();
            let dialect = registry.detect(input.trim());
            if args.json {
                let out = DetectOut {
                    dialect: dialect.keyword(),
                };
                println!("{}", serde_json::to_string(&out)?);
            } else {
                println!("{dialect}");
            }
        }
        Command::Clean => {
            println!("{}", mermend_core::clean_mermaid_code(&input));
        }
        Command::Convert => {
            let engine = Engine::new().with_options(PipelineOptions {
                group_long_flowcharts: args.group_long,
                ..Default::default()
            });
            let outcome = engine.process_sync(&input);

            if args.json {
                let rendered = if args.pretty {
                    serde_json::to_string_pretty(&outcome)?
                } else {
                    serde_json::to_string(&outcome)?
                };
                println!("{rendered}");
                return Ok(());
            }

            match outcome {
                Outcome::Flowchart { code, .. } => println!("{code}"),
                Outcome::Unsupported { dialect, code } => {
                    eprintln!("note: no converter for `{dialect}`; passing the source through");
                    println!("{code}");
                }
                Outcome::Explanation { text } => println!("{text}"),
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        match err {
            CliError::Usage(msg) => {
                eprintln!("{msg}");
                std::process::exit(2);
            }
            other => {
                eprintln!("error: {other}");
                std::process::exit(1);
            }
        }
    }
}
