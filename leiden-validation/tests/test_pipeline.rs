//! End-to-end runs of the validation pipeline over annotated VCFs.

use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rstest::*;

use leiden_core::models::Category;
use leiden_core::protein::AminoAcid;
use leiden_lookup::{
    Gated, LookupAnswer, LookupClient, LookupError, LookupRequest, NoLookup, RetryPolicy, Retrying,
    TableLookupClient,
};
use leiden_validation::{Evaluator, OverlapCounts, Pipeline, ResultAggregator, RunTally, StatusCounts};
use leiden_vcf::{VcfReader, VcfTags};

const HEADER: &str = "##fileformat=VCFv4.1
##INFO=<ID=LOVD,Number=.,Type=String,Description=\"LOVD submission. Format: dna_change|protein_change|exon|db_id|variant_remarks\">
##INFO=<ID=CSQ,Number=.,Type=String,Description=\"VEP. Format: Allele|Consequence|IMPACT|SYMBOL|Feature_type|Feature|BIOTYPE|HGVSc|HGVSp|CDS_position|Protein_position|Amino_acids\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
";

struct Run {
    tally: RunTally,
    concordant: String,
    discordant: String,
    errors: String,
}

impl Run {
    fn body(vcf: &str) -> Vec<&str> {
        vcf.lines().filter(|line| !line.starts_with('#')).collect()
    }

    fn positions(vcf: &str) -> Vec<&str> {
        Self::body(vcf)
            .iter()
            .map(|line| line.split('\t').nth(1).unwrap())
            .collect()
    }
}

fn run<C: LookupClient, R: std::io::BufRead + Send>(client: C, workers: usize, readers: Vec<VcfReader<R>>) -> Run {
    let mut aggregator =
        ResultAggregator::new(readers[0].header(), Vec::new(), Vec::new(), Vec::new()).unwrap();
    Pipeline::new(Evaluator::new(client), workers)
        .run(readers, &mut aggregator)
        .unwrap();

    let (tally, outputs) = aggregator.finish().unwrap();
    Run {
        tally,
        concordant: String::from_utf8(outputs.concordant).unwrap(),
        discordant: String::from_utf8(outputs.discordant).unwrap(),
        errors: String::from_utf8(outputs.errors).unwrap(),
    }
}

fn open(path: &str) -> Vec<VcfReader<std::io::BufReader<Box<dyn std::io::Read + Send>>>> {
    vec![VcfReader::from_path(Path::new(path), VcfTags::default()).unwrap()]
}

/// In-memory VCF of frameshift records at `positions`, all `p.(Arg97Glyfs*24)`.
fn frameshift_vcf(positions: &[u64]) -> Vec<VcfReader<Cursor<Vec<u8>>>> {
    let mut text = HEADER.to_string();
    for pos in positions {
        text.push_str(&format!(
            "1\t{}\t.\tAG\tA\t.\t.\tLOVD=c.290del|p.(Arg97Glyfs*24)|3|GENE_{}|.;CSQ=-|frameshift_variant|HIGH|GENE|Transcript|ENST1|protein_coding|||290|97|R/X\n",
            pos, pos
        ));
    }
    vec![VcfReader::new("memory", Cursor::new(text.into_bytes()), VcfTags::default()).unwrap()]
}

fn matching_answer() -> LookupAnswer {
    LookupAnswer {
        residue_position: 97,
        reference_amino_acid: AminoAcid::Arg,
        altered_amino_acids: vec![AminoAcid::Gly, AminoAcid::Ala],
        next_stop_position: Some(120),
    }
}

/// Answers after a delay chosen per position, so later records finish first.
struct SlowFirst;

impl LookupClient for SlowFirst {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        let delay = match request.coordinate.pos() {
            100 => 200,
            200 => 100,
            _ => 0,
        };
        thread::sleep(Duration::from_millis(delay));
        Ok(matching_answer())
    }
}

/// Times out for position 100 and counts the attempts.
struct TimesOutAt100 {
    attempts: Mutex<u32>,
}

impl LookupClient for TimesOutAt100 {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        if request.coordinate.pos() == 100 {
            *self.attempts.lock().unwrap() += 1;
            return Err(LookupError::Timeout);
        }
        Ok(matching_answer())
    }
}

#[rstest]
fn test_hbb_end_to_end() {
    let run = run(NoLookup, 2, open("../tests/data/vcf/hbb_annotated.vcf"));

    assert_eq!(run.tally.seen(), 7);
    assert_eq!(run.tally.malformed, 1);
    assert_eq!(
        run.tally.totals,
        StatusCounts {
            concordant: 3,
            discordant: 2,
            error: 1
        }
    );
    assert_eq!(
        run.tally.category(Category::Missense),
        StatusCounts {
            concordant: 1,
            discordant: 1,
            error: 0
        }
    );
    assert_eq!(run.tally.category(Category::Splice).discordant, 1);
    assert_eq!(run.tally.category(Category::Synonymous).concordant, 1);
    assert_eq!(run.tally.category(Category::Other).error, 1);
    assert_eq!(
        run.tally.sources[0].concordance_line(),
        "../tests/data/vcf/hbb_annotated.vcf: 3 / 6 concordant"
    );

    assert_eq!(Run::positions(&run.concordant), vec!["5248232", "5248159", "5248225"]);
    assert_eq!(Run::positions(&run.discordant), vec!["5248200", "5247993"]);

    let discordant = Run::body(&run.discordant);
    assert!(discordant[0].contains(";DISCORDANT_REASON=amino_acid_mismatch;DISCORDANT_DETAIL="));
    assert!(discordant[1].contains(";DISCORDANT_REASON=non_canonical_splice_site;"));
    assert!(run.discordant.contains("##INFO=<ID=DISCORDANT_DETAIL"));

    let errors: Vec<&str> = run.errors.lines().collect();
    assert_eq!(errors.len(), 3);
    assert!(errors[1].starts_with("../tests/data/vcf/hbb_annotated.vcf:11\tmalformed\t"));
    assert!(errors[2].starts_with("11:5248300 A>G\tother\tinsufficient_information\t"));
    assert!(errors[2].ends_with("position=chr11%3A5248275-5248325"));
}

#[rstest]
fn test_gzipped_input_matches_plain() {
    let plain = run(NoLookup, 1, open("../tests/data/vcf/hbb_annotated.vcf"));
    let gzipped = run(NoLookup, 1, open("../tests/data/vcf/hbb_annotated.vcf.gz"));

    assert_eq!(plain.concordant, gzipped.concordant);
    assert_eq!(plain.discordant, gzipped.discordant);
    assert_eq!(plain.tally.totals, gzipped.tally.totals);
}

#[rstest]
fn test_frameshift_and_codon_loss_with_table() {
    let table = TableLookupClient::from_path(Path::new("../tests/data/lookup/frameshift_answers.json")).unwrap();
    let client = Retrying::new(Gated::new(table, 2), RetryPolicy::immediate(3));
    let run = run(client, 3, open("../tests/data/vcf/frameshift_annotated.vcf"));

    assert_eq!(Run::positions(&run.concordant), vec!["1000", "3000"]);
    assert_eq!(Run::positions(&run.discordant), vec!["2000"]);
    assert!(Run::body(&run.discordant)[0].contains("DISCORDANT_REASON=stop_position_mismatch"));

    let errors: Vec<&str> = run.errors.lines().collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[1].starts_with("1:4000 AT>A\tframeshift\tlookup_no_answer\t"));

    assert_eq!(run.tally.category(Category::Frameshift).concordant, 1);
    assert_eq!(run.tally.category(Category::CodonLoss).concordant, 1);
}

#[rstest]
fn test_order_preserved_under_out_of_order_completion() {
    let run = run(SlowFirst, 3, frameshift_vcf(&[100, 200, 300]));

    assert_eq!(Run::positions(&run.concordant), vec!["100", "200", "300"]);
    assert_eq!(run.tally.totals.concordant, 3);
}

#[rstest]
fn test_database_overlap_is_tallied() {
    let text = format!(
        "{}{}{}",
        HEADER,
        "11\t5248232\t.\tT\tA\t.\t.\tLOVD=c.20A>T|p.(Glu7Val)|1|HBB_000001|.;CSQ=A|missense_variant|MODERATE|HBB|Transcript|ENST1|protein_coding||ENSP1:p.Glu7Val|20|7|E/V;HGMD_SITE=CM810001;HGMD_MUT=CM810001;AC_MAC26K=2;AN_MAC26K=100\n",
        "11\t5248200\t.\tC\tT\t.\t.\tLOVD=c.52G>A|p.Arg18His|1|HBB_000002|.;CSQ=T|missense_variant|MODERATE|HBB|Transcript|ENST1|protein_coding||ENSP1:p.Arg18Cys|52|18|R/C;AC_MAC26K=1;AN_MAC26K=1000\n",
    );
    let readers = vec![VcfReader::new("memory", Cursor::new(text.into_bytes()), VcfTags::default()).unwrap()];
    let run = run(NoLookup, 2, readers);

    assert_eq!(
        run.tally.overlap,
        OverlapCounts {
            hgmd_sites: 1,
            hgmd_mutations: 1,
            frequency_overlap: 2,
            high_frequency: 1,
        }
    );
    assert_eq!(Run::positions(&run.discordant), vec!["5248200"]);
    assert!(Run::body(&run.discordant)[0].ends_with(";SEVERE_IMPACT=MODERATE"));
}

/// Holds the record at position 1 until the others stop arriving, then
/// notes how many got past it.
struct HeadOfLineStall {
    others: AtomicUsize,
    overtaken: AtomicUsize,
}

impl LookupClient for HeadOfLineStall {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        if request.coordinate.pos() == 1 {
            let mut last = usize::MAX;
            for _ in 0..40 {
                let seen = self.others.load(Ordering::SeqCst);
                if seen == last {
                    break;
                }
                last = seen;
                thread::sleep(Duration::from_millis(25));
            }
            self.overtaken.store(self.others.load(Ordering::SeqCst), Ordering::SeqCst);
        } else {
            self.others.fetch_add(1, Ordering::SeqCst);
        }
        Ok(matching_answer())
    }
}

#[rstest]
fn test_slow_head_bounds_items_in_flight() {
    let client = HeadOfLineStall {
        others: AtomicUsize::new(0),
        overtaken: AtomicUsize::new(0),
    };
    let positions: Vec<u64> = (1..=50).collect();
    let readers = frameshift_vcf(&positions);

    let mut aggregator =
        ResultAggregator::new(readers[0].header(), Vec::new(), Vec::new(), Vec::new()).unwrap();
    let pipeline = Pipeline::new(Evaluator::new(&client), 3).with_in_flight_limit(4);
    assert_eq!(pipeline.in_flight_limit(), 4);
    pipeline.run(readers, &mut aggregator).unwrap();

    // the stalled record holds one of the four permits
    assert!(client.overtaken.load(Ordering::SeqCst) <= 3);
    let (tally, _) = aggregator.finish().unwrap();
    assert_eq!(tally.totals.concordant, 50);
}

#[rstest]
fn test_timeout_is_error_and_run_continues() {
    let client = TimesOutAt100 {
        attempts: Mutex::new(0),
    };
    let client = Retrying::new(&client, RetryPolicy::immediate(3));
    let run = run(&client, 2, frameshift_vcf(&[100, 200, 300]));

    assert_eq!(Run::positions(&run.concordant), vec!["200", "300"]);
    let errors: Vec<&str> = run.errors.lines().collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[1].starts_with("1:100 AG>A\tframeshift\tlookup_unavailable\t"));
    assert_eq!(*client.inner().attempts.lock().unwrap(), 3);
}

#[rstest]
#[case(1)]
#[case(4)]
fn test_runs_are_repeatable(#[case] workers: usize) {
    let first = run(NoLookup, 1, open("../tests/data/vcf/hbb_annotated.vcf"));
    let again = run(NoLookup, workers, open("../tests/data/vcf/hbb_annotated.vcf"));

    assert_eq!(first.concordant, again.concordant);
    assert_eq!(first.discordant, again.discordant);
    assert_eq!(first.errors, again.errors);
    assert_eq!(first.tally, again.tally);
}

#[rstest]
fn test_multiple_inputs_keep_file_order() {
    let mut readers = frameshift_vcf(&[100]);
    readers.extend(frameshift_vcf(&[200, 300]));
    let run = run(SlowFirst, 4, readers);

    assert_eq!(Run::positions(&run.concordant), vec!["100", "200", "300"]);
    assert_eq!(run.tally.sources.len(), 2);
    assert_eq!(run.tally.sources[0].counts.concordant, 1);
    assert_eq!(run.tally.sources[1].concordance_line(), "memory: 2 / 2 concordant");
}
