//! Reading the shared annotated VCF fixture, plain and gzipped, and writing it back.

use std::path::Path;

use leiden_core::models::Consequence;
use leiden_vcf::{InfoDefinition, VcfReader, VcfTags, VcfWriter};
use pretty_assertions::assert_eq;
use rstest::*;

#[rstest]
#[case("../tests/data/vcf/hbb_annotated.vcf")]
#[case("../tests/data/vcf/hbb_annotated.vcf.gz")]
fn test_read_fixture(#[case] path: &str) {
    let reader = VcfReader::from_path(Path::new(path), VcfTags::default()).unwrap();
    let items: Vec<_> = reader.collect();

    assert_eq!(items.len(), 7);
    let malformed: Vec<_> = items.iter().filter_map(|item| item.as_ref().err()).collect();
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].line, 11);
    assert!(malformed[0].reason.contains("LOVD"));

    let first = items[0].as_ref().unwrap();
    assert_eq!(first.submitted.protein_change.as_deref(), Some("p.(Glu7Val)"));
    assert_eq!(first.submitted.remarks, "sickle_cell");
    assert_eq!(first.predicted.transcripts[0].transcript_id, "ENST00000335295");

    let splice = items[2].as_ref().unwrap();
    assert_eq!(splice.submitted.locus.as_deref(), Some("1i"));
    assert_eq!(splice.predicted.splice_reference.as_deref(), Some("GT"));
    assert!(splice.predicted.any(&Consequence::SpliceDonor));
}

#[rstest]
fn test_missing_file_is_an_error() {
    let result = VcfReader::from_path(Path::new("../tests/data/vcf/missing.vcf"), VcfTags::default());
    assert!(result.is_err());
}

#[rstest]
fn test_custom_tags_must_be_declared() {
    let tags = VcfTags {
        submission: "LEIDEN".to_string(),
        ..VcfTags::default()
    };
    let result = VcfReader::from_path(Path::new("../tests/data/vcf/hbb_annotated.vcf"), tags);
    assert!(result.is_err());
}

#[rstest]
fn test_rewrite_with_reason() {
    let reader = VcfReader::from_path(
        Path::new("../tests/data/vcf/hbb_annotated.vcf"),
        VcfTags::default(),
    )
    .unwrap();
    let header = reader.header().clone();
    let records: Vec<_> = reader.filter_map(Result::ok).collect();

    let extra = [InfoDefinition::new("DISCORDANT_REASON", "Reason code")];
    let mut writer = VcfWriter::new(Vec::new(), &header, &extra).unwrap();
    for record in &records {
        writer
            .write_record(record, &[("DISCORDANT_REASON", "match".to_string())])
            .unwrap();
    }

    let out = String::from_utf8(writer.into_inner()).unwrap();
    let body: Vec<&str> = out.lines().filter(|line| !line.starts_with('#')).collect();
    assert_eq!(body.len(), 6);
    assert!(body.iter().all(|line| line.ends_with(";DISCORDANT_REASON=match")));
    assert_eq!(out.lines().filter(|line| line.starts_with("##INFO")).count(), 4);
}
