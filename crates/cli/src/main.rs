mod defs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console_options::{FlagIndex, ParseError, usage};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

use crate::defs::load_defs;

#[derive(Parser)]
#[command(name = "copt")]
#[command(version, about = "Inspect and try out console-options declaration tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse arguments against a declaration file and print the result as JSON
    Parse(ParseArgs),

    /// List the flags a declaration file registers
    Flags(DefsArgs),

    /// Print the help block generated from a declaration file
    Usage(UsageArgs),
}

#[derive(Parser)]
struct DefsArgs {
    /// Path to the JSON declaration file
    #[arg(short, long, value_name = "FILE")]
    defs: PathBuf,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the JSON declaration file
    #[arg(short, long, value_name = "FILE")]
    defs: PathBuf,

    /// Fail on the first unknown option instead of ignoring it
    #[arg(long)]
    strict: bool,

    /// Program name placed in front of the arguments (default: declaration file stem)
    #[arg(long, value_name = "NAME")]
    program: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    /// Arguments to parse (put them after `--`)
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Parser)]
struct UsageArgs {
    /// Path to the JSON declaration file
    #[arg(short, long, value_name = "FILE")]
    defs: PathBuf,

    /// Program name for the usage line (default: declaration file stem)
    #[arg(long, value_name = "NAME")]
    program: Option<String>,

    /// Positional arguments shown after `[ OPTIONS ]`
    #[arg(long, value_name = "TEXT", default_value = "")]
    arguments: String,

    /// Description printed above the usage line
    #[arg(long, value_name = "TEXT", default_value = "")]
    description: String,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Parse(args) => parse_command(args),
        Commands::Flags(args) => flags_command(args),
        Commands::Usage(args) => usage_command(args),
    };
    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn program_name(explicit: Option<String>, defs: &Path) -> String {
    explicit.unwrap_or_else(|| {
        defs.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "copt".to_string())
    })
}

fn parse_command(args: ParseArgs) -> Result<ExitCode> {
    tracing::debug!("executing parse command");
    let index = load_defs(&args.defs)?;
    let program = program_name(args.program, &args.defs);

    let mut argv = Vec::with_capacity(args.args.len() + 1);
    argv.push(program);
    argv.extend(args.args);

    let result = match index.parse(&argv, args.strict) {
        Ok(result) => result,
        Err(ParseError::UnknownOption(flag)) => {
            eprintln!("Unknown option \"{flag}\". Try -h for more information.");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write result")?;
    Ok(ExitCode::SUCCESS)
}

fn flags_command(args: DefsArgs) -> Result<ExitCode> {
    tracing::debug!("executing flags command");
    let index = load_defs(&args.defs)?;
    let mut stdout = io::stdout().lock();
    write_flags(&mut stdout, &index).context("failed to write flag list")?;
    Ok(ExitCode::SUCCESS)
}

fn write_flags(out: &mut impl Write, index: &FlagIndex) -> io::Result<()> {
    let width = index.flags().map(|(flag, _)| flag.len()).max().unwrap_or(0);
    let key_width = index
        .flags()
        .map(|(_, decl)| decl.canonical_key().len())
        .max()
        .unwrap_or(0);
    for (flag, decl) in index.flags() {
        writeln!(
            out,
            "{flag:width$}  {:key_width$}  {}",
            decl.canonical_key(),
            decl.arity()
        )?;
    }
    Ok(())
}

fn usage_command(args: UsageArgs) -> Result<ExitCode> {
    tracing::debug!("executing usage command");
    let index = load_defs(&args.defs)?;
    let meta = usage::UsageMeta {
        program: program_name(args.program, &args.defs),
        arguments: args.arguments,
        description: args.description,
    };
    print!("{}", usage::render(&index, &meta));
    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
