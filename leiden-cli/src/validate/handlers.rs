use std::fs::{File, read_to_string};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ArgMatches;

use leiden_lookup::{
    Gated, HttpLookupClient, HttpLookupConfig, LookupClient, NoLookup, Retrying, TableLookupClient,
};
use leiden_validation::{Evaluator, LookupSettings, Pipeline, ResultAggregator, ValidationConfig};
use leiden_vcf::VcfReader;

use super::cli::*;

pub fn run_validate(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;

    let inputs = input_paths(matches)?;
    if inputs.is_empty() {
        bail!("No input VCF files given. Pass paths or --file-list.");
    }

    // every input must open before the first record is evaluated
    let mut readers = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let reader = VcfReader::from_path(input, config.tags.clone())
            .with_context(|| format!("Failed to open input {}", input.display()))?;
        readers.push(reader);
    }

    let output = required(matches, "output", DEFAULT_CONCORDANT_OUT);
    let discordant = required(matches, "discordant", DEFAULT_DISCORDANT_OUT);
    let errors = required(matches, "errors", DEFAULT_ERROR_LOG);

    let mut aggregator = ResultAggregator::new(
        readers[0].header(),
        create_output(&output)?,
        create_output(&discordant)?,
        create_output(&errors)?,
    )?;

    let client = Retrying::new(
        Gated::new(lookup_client(&config.lookup)?, config.lookup.max_concurrent),
        config.lookup.retry_policy(),
    );

    let mut pipeline = Pipeline::new(Evaluator::new(client), config.worker_count());
    if matches.get_flag("progress") {
        pipeline = pipeline.with_progress();
    }
    pipeline.run(readers, &mut aggregator)?;

    let (tally, _) = aggregator.finish()?;
    eprint!("{}", tally);

    if let Some(summary) = matches.get_one::<String>("summary") {
        std::fs::write(summary, tally.to_json()?)
            .with_context(|| format!("Failed to write summary to {}", summary))?;
    }

    Ok(())
}

///
/// File settings first, then command line flags on top.
///
fn load_config(matches: &ArgMatches) -> Result<ValidationConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ValidationConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to read config {}", path))?,
        None => ValidationConfig::default(),
    };

    if let Some(threads) = matches.get_one::<usize>("threads") {
        config.workers = Some(*threads);
    }
    if let Some(url) = matches.get_one::<String>("lookup-url") {
        config.lookup.base_url = Some(url.clone());
        config.lookup.table = None;
    }
    if let Some(table) = matches.get_one::<String>("lookup-table") {
        config.lookup.table = Some(PathBuf::from(table));
        config.lookup.base_url = None;
    }

    config.validate()?;
    Ok(config)
}

fn input_paths(matches: &ArgMatches) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = matches
        .get_many::<String>("inputs")
        .into_iter()
        .flatten()
        .map(PathBuf::from)
        .collect();

    if let Some(list) = matches.get_one::<String>("file-list") {
        let contents =
            read_to_string(list).with_context(|| format!("Failed to read file list {}", list))?;
        paths.extend(parse_file_list(&contents));
    }
    Ok(paths)
}

/// One path per line; blank lines and `#` comments are skipped.
fn parse_file_list(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

fn required(matches: &ArgMatches, id: &str, default: &str) -> PathBuf {
    matches
        .get_one::<String>(id)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn lookup_client(settings: &LookupSettings) -> Result<Box<dyn LookupClient>> {
    if let Some(url) = &settings.base_url {
        tracing::info!(url = %url, timeout_ms = settings.timeout_ms, "using lookup service");
        let config = HttpLookupConfig::new(url).with_timeout(settings.timeout());
        return Ok(Box::new(HttpLookupClient::new(config)));
    }

    if let Some(table) = &settings.table {
        let client = TableLookupClient::from_path(table)
            .with_context(|| format!("Failed to load lookup table {}", table.display()))?;
        tracing::info!(table = %table.display(), entries = client.len(), "using lookup table");
        return Ok(Box::new(client));
    }

    tracing::warn!("no lookup configured; frameshift and codon-loss records will be reported as errors");
    Ok(Box::new(NoLookup))
}
