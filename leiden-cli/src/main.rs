mod validate;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "leiden";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("MacArthur Lab")
        .about("Check LOVD variant submissions against VEP consequence predictions.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("Log more (-v info, -vv debug, -vvv trace). Overrides RUST_LOG."),
        )
        .subcommand(validate::cli::create_validate_cli())
}

///
/// Log to stderr. `RUST_LOG` applies unless `-v` was given; the default is
/// warnings only.
///
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // VALIDATE
        //
        Some((validate::cli::VALIDATE_CMD, matches)) => {
            init_tracing(matches.get_count("verbose"));
            validate::handlers::run_validate(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
