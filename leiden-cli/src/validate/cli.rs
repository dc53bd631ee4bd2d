use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const VALIDATE_CMD: &str = "validate";

pub const DEFAULT_CONCORDANT_OUT: &str = "concordant.vcf";
pub const DEFAULT_DISCORDANT_OUT: &str = "discordant.vcf";
pub const DEFAULT_ERROR_LOG: &str = "errors.tsv";

pub fn create_validate_cli() -> Command {
    Command::new(VALIDATE_CMD)
        .author("MacArthur Lab")
        .about("Sort annotated LOVD submissions into concordant, discordant and error outputs.")
        .arg(
            Arg::new("inputs")
                .num_args(0..)
                .action(ArgAction::Append)
                .help("Annotated VCF files (plain or gzipped)"),
        )
        .arg(arg!(--"file-list" <PATH> "File listing one input VCF per line"))
        .arg(
            arg!(-o --output <PATH> "Concordant VCF output")
                .default_value(DEFAULT_CONCORDANT_OUT),
        )
        .arg(
            arg!(-d --discordant <PATH> "Discordant VCF output")
                .default_value(DEFAULT_DISCORDANT_OUT),
        )
        .arg(
            arg!(-e --errors <PATH> "Tab-separated error log")
                .default_value(DEFAULT_ERROR_LOG),
        )
        .arg(arg!(--summary <PATH> "Write the run summary as JSON"))
        .arg(arg!(-c --config <PATH> "TOML configuration file"))
        .arg(arg!(--"lookup-url" <URL> "Base URL of the sequence lookup service"))
        .arg(arg!(--"lookup-table" <PATH> "JSON table of precomputed lookup answers"))
        .arg(
            arg!(-t --threads <N> "Evaluation threads")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--progress "Show a progress spinner").action(ArgAction::SetTrue))
}
