//! Routing of verdicts to output streams, and the run tally.
//!
//! Each evaluated record lands in exactly one of three destinations:
//! the concordant VCF, the discordant VCF (with `DISCORDANT_REASON` and
//! `DISCORDANT_DETAIL` INFO entries, plus `SEVERE_IMPACT` when the input
//! lacks it), or the tab-separated error log. Malformed input lines go to the
//! error log too. Counters move only after the write succeeded.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::io::Write;

use serde::{Deserialize, Serialize};

use leiden_core::models::{Category, DatabaseOverlap, MalformedRecord, PairedRecord, Status, Verdict};
use leiden_core::utils::{ucsc_location_link, vcf_friendly_text};
use leiden_vcf::{InfoDefinition, VcfHeader, VcfWriter};

use crate::errors::ValidationResult;

pub const DISCORDANT_REASON: &str = "DISCORDANT_REASON";
pub const DISCORDANT_DETAIL: &str = "DISCORDANT_DETAIL";
pub const ERROR_LOG_HEADER: &str = "#location\tcategory\treason\texplanation\tbrowser_link";
pub const SEVERE_IMPACT: &str = "SEVERE_IMPACT";
pub const MALFORMED: &str = "malformed";

/// Population panel frequency, in percent, above which a record counts as common.
pub const HIGH_FREQUENCY_PERCENT: f64 = 0.5;

/// `##INFO` definitions added to the discordant output.
pub fn discordant_info_definitions() -> Vec<InfoDefinition> {
    vec![
        InfoDefinition::new(DISCORDANT_REASON, "Reason code for discordance"),
        InfoDefinition::new(DISCORDANT_DETAIL, "Explanation of the discordance"),
        InfoDefinition::new(SEVERE_IMPACT, "Most severe VEP impact across transcripts"),
    ]
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub concordant: usize,
    pub discordant: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: Status) {
        match status {
            Status::Concordant => self.concordant += 1,
            Status::Discordant => self.discordant += 1,
            Status::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.concordant + self.discordant + self.error
    }
}

///
/// Evaluated records that also appear in a mutation database or a population
/// panel.
///
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapCounts {
    pub hgmd_sites: usize,
    pub hgmd_mutations: usize,
    /// Seen at all in the population panel.
    pub frequency_overlap: usize,
    /// Above [`HIGH_FREQUENCY_PERCENT`] in the population panel.
    pub high_frequency: usize,
}

impl OverlapCounts {
    pub fn add(&mut self, overlap: &DatabaseOverlap) {
        self.hgmd_sites += usize::from(overlap.hgmd_site);
        self.hgmd_mutations += usize::from(overlap.hgmd_mutation);

        let frequency = overlap
            .allele_counts
            .and_then(|counts| counts.frequency_percent())
            .unwrap_or(0.0);
        if frequency > 0.0 {
            self.frequency_overlap += 1;
        }
        if frequency > HIGH_FREQUENCY_PERCENT {
            self.high_frequency += 1;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceTally {
    pub source: String,
    pub counts: StatusCounts,
    pub malformed: usize,
}

impl SourceTally {
    fn new(source: &str) -> Self {
        SourceTally {
            source: source.to_string(),
            counts: StatusCounts::default(),
            malformed: 0,
        }
    }

    /// `file: n / m concordant`, over evaluated records.
    pub fn concordance_line(&self) -> String {
        format!(
            "{}: {} / {} concordant",
            self.source,
            self.counts.concordant,
            self.counts.total()
        )
    }
}

///
/// Counts for one run: per status, per category and status, and per input.
///
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTally {
    pub totals: StatusCounts,
    pub malformed: usize,
    pub categories: BTreeMap<Category, StatusCounts>,
    pub sources: Vec<SourceTally>,
    #[serde(default)]
    pub overlap: OverlapCounts,
}

impl RunTally {
    /// Every input record, evaluated or malformed.
    pub fn seen(&self) -> usize {
        self.totals.total() + self.malformed
    }

    pub fn category(&self, category: Category) -> StatusCounts {
        self.categories.get(&category).copied().unwrap_or_default()
    }

    pub fn to_json(&self) -> ValidationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Display for RunTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "records: {} ({} evaluated, {} malformed)",
            self.seen(),
            self.totals.total(),
            self.malformed
        )?;
        writeln!(
            f,
            "concordant: {}, discordant: {}, error: {}",
            self.totals.concordant, self.totals.discordant, self.totals.error
        )?;
        for (category, counts) in &self.categories {
            writeln!(
                f,
                "  {}: {} concordant, {} discordant, {} error",
                category, counts.concordant, counts.discordant, counts.error
            )?;
        }
        writeln!(
            f,
            "HGMD sites: {}, HGMD mutations: {}",
            self.overlap.hgmd_sites, self.overlap.hgmd_mutations
        )?;
        writeln!(
            f,
            "population panel overlap: {} ({} above {}%)",
            self.overlap.frequency_overlap, self.overlap.high_frequency, HIGH_FREQUENCY_PERCENT
        )?;
        for source in &self.sources {
            writeln!(f, "{}", source.concordance_line())?;
        }
        Ok(())
    }
}

/// The three destinations, handed back by [`ResultAggregator::finish`].
pub struct AggregatorOutputs<W: Write> {
    pub concordant: W,
    pub discordant: W,
    pub errors: W,
}

pub struct ResultAggregator<W: Write> {
    concordant: VcfWriter<W>,
    discordant: VcfWriter<W>,
    errors: W,
    tally: RunTally,
    current_source: Option<usize>,
}

impl<W: Write> ResultAggregator<W> {
    ///
    /// Write the headers of all three destinations.
    ///
    /// # Arguments
    /// - header: header of the (first) input, passed through to both VCFs
    /// - concordant: concordant VCF destination
    /// - discordant: discordant VCF destination
    /// - errors: error log destination
    ///
    pub fn new(header: &VcfHeader, concordant: W, discordant: W, mut errors: W) -> ValidationResult<Self> {
        let concordant = VcfWriter::new(concordant, header, &[])?;
        let discordant = VcfWriter::new(discordant, header, &discordant_info_definitions())?;
        writeln!(errors, "{}", ERROR_LOG_HEADER)?;

        Ok(ResultAggregator {
            concordant,
            discordant,
            errors,
            tally: RunTally::default(),
            current_source: None,
        })
    }

    ///
    /// Register an input so it shows up in the summary even when empty.
    /// Returns the handle for [`ResultAggregator::select_source`].
    ///
    pub fn add_source(&mut self, source: &str) -> usize {
        self.tally.sources.push(SourceTally::new(source));
        self.tally.sources.len() - 1
    }

    /// Attribute the following records to source `index`.
    pub fn select_source(&mut self, index: usize) {
        if index < self.tally.sources.len() {
            self.current_source = Some(index);
        }
    }

    pub fn record(&mut self, record: &PairedRecord, verdict: &Verdict) -> ValidationResult<()> {
        match verdict.status() {
            Status::Concordant => self.concordant.write_record(record, &[])?,
            Status::Discordant => {
                let mut entries = vec![
                    (DISCORDANT_REASON, verdict.reason().to_string()),
                    (DISCORDANT_DETAIL, vcf_friendly_text(verdict.explanation())),
                ];
                // an impact already on the input line travels with it
                if record.predicted.overlap.severe_impact.is_none() {
                    if let Some(impact) = record.predicted.most_severe_impact() {
                        entries.push((SEVERE_IMPACT, impact.to_string()));
                    }
                }
                self.discordant.write_record(record, &entries)?
            }
            Status::Error => writeln!(
                self.errors,
                "{}\t{}\t{}\t{}\t{}",
                verdict.coordinate(),
                verdict.category(),
                verdict.reason(),
                single_line(verdict.explanation()),
                ucsc_location_link(verdict.coordinate())
            )?,
        }

        self.tally.totals.add(verdict.status());
        self.tally.overlap.add(&record.predicted.overlap);
        self.tally
            .categories
            .entry(verdict.category())
            .or_default()
            .add(verdict.status());
        if let Some(source) = self.current_source_mut() {
            source.counts.add(verdict.status());
        }
        Ok(())
    }

    pub fn record_malformed(&mut self, malformed: &MalformedRecord) -> ValidationResult<()> {
        writeln!(
            self.errors,
            "{}:{}\t{}\t{}\t{}\t.",
            malformed.source,
            malformed.line,
            MALFORMED,
            MALFORMED,
            single_line(&malformed.reason)
        )?;

        self.tally.malformed += 1;
        if let Some(source) = self.current_source_mut() {
            source.malformed += 1;
        }
        Ok(())
    }

    pub fn summary(&self) -> &RunTally {
        &self.tally
    }

    /// Flush every destination and hand back the tally and the writers.
    pub fn finish(mut self) -> ValidationResult<(RunTally, AggregatorOutputs<W>)> {
        self.concordant.flush()?;
        self.discordant.flush()?;
        self.errors.flush()?;

        let outputs = AggregatorOutputs {
            concordant: self.concordant.into_inner(),
            discordant: self.discordant.into_inner(),
            errors: self.errors,
        };
        Ok((self.tally, outputs))
    }

    fn current_source_mut(&mut self) -> Option<&mut SourceTally> {
        self.current_source
            .and_then(|index| self.tally.sources.get_mut(index))
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}
