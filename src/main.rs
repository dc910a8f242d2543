use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use radio_alarm_lib::{utils::logging, Paths};

#[derive(Parser)]
#[command(name = "radio-alarm", version, about = "Runs local actions when air-raid alerts start or end")]
struct Cli {
    /// Config file; a template is written here if it is missing.
    #[arg(long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Where the last known alert state is kept between runs.
    #[arg(long, global = true, default_value = "status.json")]
    status: PathBuf,

    /// Verbose logging for this program.
    #[arg(long, global = true)]
    debug: bool,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the feed and dispatch actions (default).
    Run,
    /// Print the feed's region list, to find your region id.
    Regions,
    /// Print the feed's last alert index.
    AlertIndex,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.debug, cli.log_file.as_deref()) {
        eprintln!("{err:?}");
        return ExitCode::FAILURE;
    }

    let paths = Paths {
        config: cli.config,
        status: cli.status,
    };

    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => radio_alarm_lib::run(paths).await,
        Command::Regions => radio_alarm_lib::print_regions(paths).await,
        Command::AlertIndex => radio_alarm_lib::print_alert_index(paths).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}
