use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use trellis_cli::{commands, AppConfig, Report};

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Stack description file (.toml, .yaml or .yml)")
}

fn cli() -> Command {
    Command::new("trellis")
        .version(trellis_cli::VERSION)
        .about("Build, validate and synthesize construct trees")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .help("Log filter used when RUST_LOG is unset"),
        )
        .subcommand(
            Command::new("synth")
                .about("Validate and emit the manifest")
                .arg(config_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the manifest here instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Run the validation pass only")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("tree")
                .about("Print node paths and logical ids in pre-order")
                .arg(config_arg()),
        )
}

fn init_tracing(matches: &ArgMatches) {
    let fallback = matches
        .get_one::<String>("log-level")
        .map_or("warn", String::as_str);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(args: &ArgMatches) -> anyhow::Result<AppConfig> {
    let path = args
        .get_one::<PathBuf>("config")
        .context("missing --config")?;
    AppConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

fn run(matches: &ArgMatches) -> anyhow::Result<Report> {
    match matches.subcommand() {
        Some(("synth", args)) => {
            let report = commands::synth(&load(args)?)?;
            if let (Some(out), true) = (args.get_one::<PathBuf>("out"), report.is_success()) {
                std::fs::write(out, &report.output)
                    .with_context(|| format!("writing {}", out.display()))?;
                tracing::info!("manifest written to {}", out.display());
                return Ok(Report {
                    output: String::new(),
                    problems: report.problems,
                });
            }
            Ok(report)
        }
        Some(("validate", args)) => Ok(commands::validate(&load(args)?)?),
        Some(("tree", args)) => Ok(commands::tree(&load(args)?)?),
        _ => anyhow::bail!("unknown subcommand"),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(&matches);

    match run(&matches) {
        Ok(report) => {
            print!("{}", report.output);
            if report.is_success() {
                return ExitCode::SUCCESS;
            }
            eprintln!("validation failed with {} problem(s):", report.problems.len());
            for problem in &report.problems {
                eprintln!("  {problem}");
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
