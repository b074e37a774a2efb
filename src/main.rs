use appraiser::config::Config;
use appraiser::diagram::VehicleDiagram;
use appraiser::error::AppraisalResult;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file; flags given on the command line override it.
    #[arg(global = true, long)]
    config_file: Option<String>,

    /// JSON hotspot diagram (defaults to the built-in sedan).
    #[arg(global = true, long)]
    diagram: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one vehicle from flags.
    Grade(cmd::grade::GradeArgs),
    /// Re-score a saved inventory and report drift.
    Audit(cmd::audit::AuditArgs),
    /// Write an inventory as CSV.
    Export(cmd::export::ExportArgs),
}

fn resolve_config(cli: &Cli, cli_config: &Config, sub_matches: &ArgMatches) -> AppraisalResult<Config> {
    let mut config = match &cli.config_file {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    config.merge_from_cli(cli_config, sub_matches);
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli, matches: &ArgMatches) -> AppraisalResult<()> {
    let Some((_, sub_matches)) = matches.subcommand() else {
        return Ok(());
    };

    let diagram = match &cli.diagram {
        Some(path) => VehicleDiagram::load_from_file(path)?,
        None => VehicleDiagram::standard(),
    };

    match &cli.command {
        Commands::Grade(args) => {
            let config = resolve_config(&cli, &args.config, sub_matches)?;
            cmd::grade::run(args, config, diagram)
        }
        Commands::Audit(args) => {
            let config = resolve_config(&cli, &args.config, sub_matches)?;
            cmd::audit::run(args, config, diagram)
        }
        Commands::Export(args) => cmd::export::run(args, diagram),
    }
}

fn main() {
    // Raw matches tell explicit flags apart from defaults
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, &matches) {
        error!("{}", e);
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}
