use fxhash::FxHashMap;

pub const HEADER_PREFIX: char = '#';
pub const COLUMN_HEADER_PREFIX: &str = "#CHROM";

const INFO_PREFIX: &str = "##INFO=<";
const FORMAT_MARKER: &str = "format:";

///
/// A parsed `##INFO=<ID=...,Number=...,Type=...,Description="...">` line.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoDefinition {
    pub id: String,
    pub number: String,
    pub kind: String,
    pub description: String,
}

impl InfoDefinition {
    pub fn new(id: &str, description: &str) -> Self {
        InfoDefinition {
            id: id.to_string(),
            number: ".".to_string(),
            kind: "String".to_string(),
            description: description.to_string(),
        }
    }

    ///
    /// Parse an `##INFO` header line. Returns `None` for any other line.
    ///
    pub fn parse(line: &str) -> Option<Self> {
        let body = line.trim().strip_prefix(INFO_PREFIX)?.strip_suffix('>')?;

        let mut definition = InfoDefinition {
            id: String::new(),
            number: ".".to_string(),
            kind: "String".to_string(),
            description: String::new(),
        };

        for (key, value) in split_structured_fields(body) {
            match key.to_ascii_lowercase().as_str() {
                "id" => definition.id = value,
                "number" => definition.number = value,
                "type" => definition.kind = value,
                "description" => definition.description = value,
                _ => {}
            }
        }

        if definition.id.is_empty() {
            None
        } else {
            Some(definition)
        }
    }

    ///
    /// Field names from a `Format: A|B|C` description, normalised with
    /// [`normalize_field_name`].
    ///
    pub fn format_fields(&self) -> Option<Vec<String>> {
        let lower = self.description.to_lowercase();
        let start = lower.find(FORMAT_MARKER)? + FORMAT_MARKER.len();
        let format = self.description[start..].trim();
        if format.is_empty() {
            return None;
        }
        Some(format.split('|').map(normalize_field_name).collect())
    }

    pub fn to_header_line(&self) -> String {
        format!(
            "##INFO=<ID={},Number={},Type={},Description=\"{}\">",
            self.id, self.number, self.kind, self.description
        )
    }
}

///
/// Normalise a format field name: upper-case, and every character that is
/// not a letter or digit becomes `_`.
///
pub fn normalize_field_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Split `ID=X,Number=.,Description="a, b"` on commas outside quotes.
fn split_structured_fields(body: &str) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut flush = |current: &mut String| {
        if let Some((key, value)) = current.split_once('=') {
            fields.push((key.trim().to_string(), value.trim().trim_matches('"').to_string()));
        }
        current.clear();
    };

    for c in body.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => flush(&mut current),
            c => current.push(c),
        }
    }
    flush(&mut current);

    fields
}

///
/// All header lines of a VCF, in order, plus an index of its `##INFO`
/// definitions.
///
#[derive(Debug, Clone, Default)]
pub struct VcfHeader {
    lines: Vec<String>,
    info: FxHashMap<String, InfoDefinition>,
}

impl VcfHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        if let Some(definition) = InfoDefinition::parse(line) {
            self.info.insert(definition.id.clone(), definition);
        }
        self.lines.push(line.to_string());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn info(&self, id: &str) -> Option<&InfoDefinition> {
        self.info.get(id)
    }

    pub fn has_column_header(&self) -> bool {
        self.lines
            .iter()
            .any(|line| line.starts_with(COLUMN_HEADER_PREFIX))
    }

    ///
    /// Header lines with `extra` `##INFO` definitions inserted before the
    /// column header line. Definitions whose id is already declared are
    /// skipped.
    ///
    pub fn lines_with_info(&self, extra: &[InfoDefinition]) -> Vec<String> {
        let additions: Vec<String> = extra
            .iter()
            .filter(|definition| !self.info.contains_key(&definition.id))
            .map(InfoDefinition::to_header_line)
            .collect();

        let mut lines = Vec::with_capacity(self.lines.len() + additions.len());
        let mut inserted = false;
        for line in &self.lines {
            if !inserted && line.starts_with(COLUMN_HEADER_PREFIX) {
                lines.extend(additions.iter().cloned());
                inserted = true;
            }
            lines.push(line.clone());
        }
        if !inserted {
            lines.extend(additions);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const LOVD_INFO: &str = "##INFO=<ID=LOVD,Number=.,Type=String,Description=\"LOVD data, tab separated. Format: dna_change|Protein Change|Exon|variant.remarks\">";

    #[rstest]
    fn test_parse_info_definition() {
        let definition = InfoDefinition::parse(LOVD_INFO).unwrap();
        assert_eq!(definition.id, "LOVD");
        assert_eq!(definition.number, ".");
        assert_eq!(
            definition.description,
            "LOVD data, tab separated. Format: dna_change|Protein Change|Exon|variant.remarks"
        );
        assert_eq!(
            definition.format_fields().unwrap(),
            vec!["DNA_CHANGE", "PROTEIN_CHANGE", "EXON", "VARIANT_REMARKS"]
        );
    }

    #[rstest]
    fn test_parse_non_info_line() {
        assert!(InfoDefinition::parse("##fileformat=VCFv4.1").is_none());
        assert!(InfoDefinition::parse("#CHROM\tPOS").is_none());
    }

    #[rstest]
    fn test_format_fields_absent() {
        let definition = InfoDefinition::new("SPLICE_REF", "Reference splice dinucleotide");
        assert!(definition.format_fields().is_none());
    }

    #[rstest]
    fn test_round_trip_header_line() {
        let definition = InfoDefinition::new("DISCORDANT_REASON", "Why the submission is discordant");
        let line = definition.to_header_line();
        assert_eq!(InfoDefinition::parse(&line).unwrap(), definition);
    }

    #[rstest]
    fn test_lines_with_info_inserts_before_column_header() {
        let mut header = VcfHeader::new();
        header.push_line("##fileformat=VCFv4.1");
        header.push_line(LOVD_INFO);
        header.push_line("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO");

        let lines = header.lines_with_info(&[
            InfoDefinition::new("DISCORDANT_REASON", "reason"),
            InfoDefinition::new("LOVD", "duplicate is skipped"),
        ]);

        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("##INFO=<ID=DISCORDANT_REASON"));
        assert!(lines[3].starts_with(COLUMN_HEADER_PREFIX));
        assert!(header.has_column_header());
    }

    #[rstest]
    #[case("Protein_position", "PROTEIN_POSITION")]
    #[case("HGVSp", "HGVSP")]
    #[case("variant remarks", "VARIANT_REMARKS")]
    #[case("DB-ID", "DB_ID")]
    fn test_normalize_field_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_field_name(input), expected);
    }
}
