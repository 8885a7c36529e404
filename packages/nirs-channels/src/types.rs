use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of quantity a channel carries. A validated batch holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelType {
    /// Raw light intensity at a given wavelength
    Wavelength,
    /// Hemoglobin concentration change
    Hb,
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelType::Wavelength => write!(f, "WAVELENGTH"),
            ChannelType::Hb => write!(f, "HB"),
        }
    }
}

/// Hemoglobin species of an Hb-type channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HbSpecies {
    #[serde(rename = "O")]
    Oxy,
    #[serde(rename = "R")]
    Deoxy,
    #[serde(rename = "T")]
    Total,
}

impl HbSpecies {
    pub const ALL: [HbSpecies; 3] = [HbSpecies::Oxy, HbSpecies::Deoxy, HbSpecies::Total];

    /// Single-letter tag used in channel labels (`HbO`, `HbR`, `HbT`)
    pub fn tag(self) -> &'static str {
        match self {
            HbSpecies::Oxy => "O",
            HbSpecies::Deoxy => "R",
            HbSpecies::Total => "T",
        }
    }

    /// Look up a species by its tag. Matching is case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        HbSpecies::ALL.into_iter().find(|s| s.tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            HbSpecies::Oxy => "oxy-hemoglobin",
            HbSpecies::Deoxy => "deoxy-hemoglobin",
            HbSpecies::Total => "total hemoglobin",
        }
    }
}

impl fmt::Display for HbSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// What a single channel measures.
///
/// Serializes untagged: a wavelength as a bare number, a species as its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measure {
    /// Wavelength in nanometres
    Wavelength(u32),
    Hb(HbSpecies),
}

impl Measure {
    pub fn channel_type(&self) -> ChannelType {
        match self {
            Measure::Wavelength(_) => ChannelType::Wavelength,
            Measure::Hb(_) => ChannelType::Hb,
        }
    }
}

/// Renders the label suffix: `WL685` or `HbO`.
impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Wavelength(nm) => write!(f, "WL{}", nm),
            Measure::Hb(species) => write!(f, "Hb{}", species.tag()),
        }
    }
}

/// Source-detector combination, rendered `S<src>D<det>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptodePair {
    pub source: u32,
    pub detector: u32,
}

impl OptodePair {
    pub fn new(source: u32, detector: u32) -> Self {
        Self { source, detector }
    }
}

impl fmt::Display for OptodePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}D{}", self.source, self.detector)
    }
}

/// Decoded channel label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub source_index: u32,
    pub detector_index: u32,
    pub measure: Measure,
}

impl ChannelRecord {
    pub fn new(source_index: u32, detector_index: u32, measure: Measure) -> Self {
        Self {
            source_index,
            detector_index,
            measure,
        }
    }

    pub fn channel_type(&self) -> ChannelType {
        self.measure.channel_type()
    }

    pub fn pair(&self) -> OptodePair {
        OptodePair::new(self.source_index, self.detector_index)
    }
}

/// Measures of a validated batch, typed by the batch's channel type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measures {
    Wavelengths(Vec<u32>),
    Hemoglobin(Vec<HbSpecies>),
}

impl Default for Measures {
    fn default() -> Self {
        Measures::Wavelengths(Vec::new())
    }
}

impl Measures {
    pub fn len(&self) -> usize {
        match self {
            Measures::Wavelengths(v) => v.len(),
            Measures::Hemoglobin(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Measure> {
        match self {
            Measures::Wavelengths(v) => v.get(index).map(|&nm| Measure::Wavelength(nm)),
            Measures::Hemoglobin(v) => v.get(index).map(|&s| Measure::Hb(s)),
        }
    }

    pub fn wavelengths(&self) -> Option<&[u32]> {
        match self {
            Measures::Wavelengths(v) => Some(v),
            Measures::Hemoglobin(_) => None,
        }
    }

    pub fn hemoglobin(&self) -> Option<&[HbSpecies]> {
        match self {
            Measures::Hemoglobin(v) => Some(v),
            Measures::Wavelengths(_) => None,
        }
    }
}

/// Group of input labels that canonicalize to the same channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateChannel {
    /// Canonical label shared by the group
    pub canonical: String,
    /// Input labels as given
    pub labels: Vec<String>,
    /// 1-based positions in the input sequence
    pub positions: Vec<usize>,
}

impl fmt::Display for DuplicateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occurrences: Vec<String> = self
            .labels
            .iter()
            .zip(&self.positions)
            .map(|(label, pos)| format!("'{}' (position {})", label, pos))
            .collect();
        write!(f, "{}: {}", self.canonical, occurrences.join(", "))
    }
}

/// Observed entry count for one optode pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCount {
    pub pair: OptodePair,
    pub measures: usize,
}

/// Non-fatal findings of batch validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// Optode pairs whose measure count differs from the number of distinct
    /// measures in the whole batch
    InconsistentPairs {
        expected: usize,
        pairs: Vec<PairCount>,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::InconsistentPairs { expected, pairs } => {
                let listed: Vec<String> = pairs
                    .iter()
                    .map(|p| format!("{} has {}", p.pair, p.measures))
                    .collect();
                write!(
                    f,
                    "Optode pairs with inconsistent measure counts (expected {} each): {}",
                    expected,
                    listed.join(", ")
                )
            }
        }
    }
}

/// Result of validating a batch of channel labels.
///
/// `source_indices`, `detector_indices` and `measures` are parallel arrays in
/// input order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelBatch {
    pub source_indices: Vec<u32>,
    pub detector_indices: Vec<u32>,
    pub measures: Measures,
    /// `None` only for an empty batch
    pub channel_type: Option<ChannelType>,
    pub warnings: Vec<ValidationWarning>,
}

impl ChannelBatch {
    pub fn len(&self) -> usize {
        self.source_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_indices.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Re-zip the parallel arrays into records
    pub fn records(&self) -> Vec<ChannelRecord> {
        self.source_indices
            .iter()
            .zip(&self.detector_indices)
            .enumerate()
            .filter_map(|(i, (&src, &det))| {
                self.measures
                    .get(i)
                    .map(|measure| ChannelRecord::new(src, det, measure))
            })
            .collect()
    }

    /// Distinct optode pairs, sorted by source then detector
    pub fn optode_pairs(&self) -> Vec<OptodePair> {
        self.source_indices
            .iter()
            .zip(&self.detector_indices)
            .map(|(&src, &det)| OptodePair::new(src, det))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct measures, sorted
    pub fn distinct_measures(&self) -> Vec<Measure> {
        (0..self.measures.len())
            .filter_map(|i| self.measures.get(i))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hb_species_tags() {
        assert_eq!(HbSpecies::from_tag("O"), Some(HbSpecies::Oxy));
        assert_eq!(HbSpecies::from_tag("R"), Some(HbSpecies::Deoxy));
        assert_eq!(HbSpecies::from_tag("T"), Some(HbSpecies::Total));
        assert_eq!(HbSpecies::from_tag("o"), None);
        assert_eq!(HbSpecies::from_tag("OR"), None);
        assert_eq!(HbSpecies::from_tag(""), None);
    }

    #[test]
    fn test_measure_display() {
        assert_eq!(Measure::Wavelength(685).to_string(), "WL685");
        assert_eq!(Measure::Hb(HbSpecies::Deoxy).to_string(), "HbR");
        assert_eq!(Measure::Wavelength(0).channel_type(), ChannelType::Wavelength);
        assert_eq!(Measure::Hb(HbSpecies::Total).channel_type(), ChannelType::Hb);
    }

    #[test]
    fn test_optode_pair_ordering() {
        let mut pairs = vec![
            OptodePair::new(2, 1),
            OptodePair::new(1, 3),
            OptodePair::new(1, 2),
        ];
        pairs.sort();
        let rendered: Vec<String> = pairs.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["S1D2", "S1D3", "S2D1"]);
    }

    #[test]
    fn test_serialization_shape() {
        let batch = ChannelBatch {
            source_indices: vec![1, 1],
            detector_indices: vec![2, 2],
            measures: Measures::Hemoglobin(vec![HbSpecies::Oxy, HbSpecies::Deoxy]),
            channel_type: Some(ChannelType::Hb),
            warnings: Vec::new(),
        };
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["measures"], serde_json::json!(["O", "R"]));
        assert_eq!(json["channel_type"], "HB");

        let measure: Measure = serde_json::from_str("830").unwrap();
        assert_eq!(measure, Measure::Wavelength(830));
        let measure: Measure = serde_json::from_str("\"T\"").unwrap();
        assert_eq!(measure, Measure::Hb(HbSpecies::Total));
    }

    #[test]
    fn test_warning_serialization_tag() {
        let warning = ValidationWarning::InconsistentPairs {
            expected: 2,
            pairs: vec![PairCount {
                pair: OptodePair::new(2, 3),
                measures: 1,
            }],
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "inconsistent_pairs");
        assert_eq!(json["pairs"][0]["pair"]["source"], 2);
        assert!(warning.to_string().contains("S2D3 has 1"));
    }

    #[test]
    fn test_batch_accessors() {
        let batch = ChannelBatch {
            source_indices: vec![2, 1, 1],
            detector_indices: vec![3, 2, 2],
            measures: Measures::Wavelengths(vec![685, 830, 685]),
            channel_type: Some(ChannelType::Wavelength),
            warnings: Vec::new(),
        };
        assert_eq!(batch.len(), 3);
        assert_eq!(
            batch.optode_pairs(),
            vec![OptodePair::new(1, 2), OptodePair::new(2, 3)]
        );
        assert_eq!(
            batch.distinct_measures(),
            vec![Measure::Wavelength(685), Measure::Wavelength(830)]
        );
        assert_eq!(
            batch.records()[1],
            ChannelRecord::new(1, 2, Measure::Wavelength(830))
        );
        assert!(ChannelBatch::default().is_empty());
    }
}
