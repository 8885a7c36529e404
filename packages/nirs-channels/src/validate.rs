use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{ChannelError, Result};
use crate::parser::parse_channel_labels;
use crate::types::{
    ChannelBatch, ChannelRecord, ChannelType, DuplicateChannel, HbSpecies, Measure, Measures,
    OptodePair, PairCount, ValidationWarning,
};

/// Decode and validate a batch of channel labels.
///
/// Checks run in order and the first fatal one aborts the batch:
/// 1. every label parses;
/// 2. no two labels canonicalize to the same channel;
/// 3. all channels share one channel type.
///
/// Optode pairs whose measure count does not match the rest of the batch are
/// reported as a warning in the returned batch and logged, never as an error.
///
/// # Returns
/// Parallel source, detector and measure arrays in input order, plus the
/// resolved channel type (`None` for an empty batch).
pub fn validate_channel_batch<S: AsRef<str>>(labels: &[S]) -> Result<ChannelBatch> {
    let records = parse_channel_labels(labels)?;

    let duplicates = find_duplicate_channels(labels, &records);
    if !duplicates.is_empty() {
        return Err(ChannelError::DuplicateChannels(duplicates));
    }

    let channel_type = resolve_channel_type(&records)?;

    let warnings: Vec<ValidationWarning> = check_pair_consistency(&records).into_iter().collect();
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    let measures = match channel_type {
        Some(ChannelType::Hb) => Measures::Hemoglobin(
            records
                .iter()
                .filter_map(|r| match r.measure {
                    Measure::Hb(species) => Some(species),
                    Measure::Wavelength(_) => None,
                })
                .collect::<Vec<HbSpecies>>(),
        ),
        _ => Measures::Wavelengths(
            records
                .iter()
                .filter_map(|r| match r.measure {
                    Measure::Wavelength(nm) => Some(nm),
                    Measure::Hb(_) => None,
                })
                .collect(),
        ),
    };

    log::debug!(
        "Validated {} channels ({} optode pairs, type {:?})",
        records.len(),
        records.iter().map(|r| r.pair()).collect::<BTreeSet<_>>().len(),
        channel_type
    );

    Ok(ChannelBatch {
        source_indices: records.iter().map(|r| r.source_index).collect(),
        detector_indices: records.iter().map(|r| r.detector_index).collect(),
        measures,
        channel_type,
        warnings,
    })
}

/// Group labels by canonical form and return every group with more than one
/// member, in order of first occurrence. `labels` and `records` must be
/// parallel.
pub fn find_duplicate_channels<S: AsRef<str>>(
    labels: &[S],
    records: &[ChannelRecord],
) -> Vec<DuplicateChannel> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut group_of: HashMap<String, usize> = HashMap::new();

    for (i, record) in records.iter().enumerate() {
        let canonical = record.to_string();
        match group_of.get(&canonical) {
            Some(&g) => groups[g].1.push(i),
            None => {
                group_of.insert(canonical.clone(), groups.len());
                groups.push((canonical, vec![i]));
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|(canonical, indices)| DuplicateChannel {
            canonical,
            labels: indices
                .iter()
                .map(|&i| {
                    labels
                        .get(i)
                        .map(|l| l.as_ref().to_string())
                        .unwrap_or_default()
                })
                .collect(),
            positions: indices.iter().map(|&i| i + 1).collect(),
        })
        .collect()
}

/// The single channel type shared by all records, or `None` when empty.
///
/// # Errors
/// `ChannelError::HeterogeneousTypes` when more than one type is present.
pub fn resolve_channel_type(records: &[ChannelRecord]) -> Result<Option<ChannelType>> {
    let types: BTreeSet<ChannelType> = records.iter().map(|r| r.channel_type()).collect();
    if types.len() > 1 {
        return Err(ChannelError::HeterogeneousTypes {
            found: types.into_iter().collect(),
        });
    }
    Ok(types.into_iter().next())
}

/// Compare each optode pair's measures against the batch as a whole.
///
/// A pair is inconsistent when it has fewer distinct measures than the batch,
/// or more entries than the batch has distinct measures.
pub fn check_pair_consistency(records: &[ChannelRecord]) -> Option<ValidationWarning> {
    let all_measures: BTreeSet<Measure> = records.iter().map(|r| r.measure).collect();
    let expected = all_measures.len();

    let mut per_pair: BTreeMap<OptodePair, (BTreeSet<Measure>, usize)> = BTreeMap::new();
    for record in records {
        let (measures, count) = per_pair.entry(record.pair()).or_default();
        measures.insert(record.measure);
        *count += 1;
    }

    let pairs: Vec<PairCount> = per_pair
        .into_iter()
        .filter(|(_, (measures, count))| measures.len() != expected || *count > expected)
        .map(|(pair, (_, count))| PairCount {
            pair,
            measures: count,
        })
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(ValidationWarning::InconsistentPairs { expected, pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(labels: &[&str]) -> Vec<ChannelRecord> {
        parse_channel_labels(labels).unwrap()
    }

    #[test]
    fn test_empty_batch() {
        let labels: [&str; 0] = [];
        let batch = validate_channel_batch(&labels).unwrap();
        assert!(batch.is_empty());
        assert!(batch.detector_indices.is_empty());
        assert!(batch.measures.is_empty());
        assert_eq!(batch.channel_type, None);
        assert!(!batch.has_warnings());
    }

    #[test]
    fn test_wavelength_batch() {
        let batch = validate_channel_batch(&[
            "S1D1WL685",
            "S1D1WL830",
            "S2D1WL685",
            "S2D1WL830",
        ])
        .unwrap();
        assert_eq!(batch.source_indices, vec![1, 1, 2, 2]);
        assert_eq!(batch.detector_indices, vec![1, 1, 1, 1]);
        assert_eq!(batch.measures, Measures::Wavelengths(vec![685, 830, 685, 830]));
        assert_eq!(batch.channel_type, Some(ChannelType::Wavelength));
        assert!(!batch.has_warnings());
    }

    #[test]
    fn test_hb_batch() {
        let batch = validate_channel_batch(&["S1D2HbO", "S1D2HbR", "S1D2HbT"]).unwrap();
        assert_eq!(batch.channel_type, Some(ChannelType::Hb));
        assert_eq!(
            batch.measures,
            Measures::Hemoglobin(vec![HbSpecies::Oxy, HbSpecies::Deoxy, HbSpecies::Total])
        );
        assert!(batch.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_positions() {
        let err = validate_channel_batch(&["S1D2WL685", "S1D2WL685"]).unwrap_err();
        match err {
            ChannelError::DuplicateChannels(dups) => {
                assert_eq!(dups.len(), 1);
                assert_eq!(dups[0].canonical, "S1D2WL685");
                assert_eq!(dups[0].positions, vec![1, 2]);
            }
            other => panic!("expected duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicates_via_leading_zeros() {
        let labels = ["S1D1WL830", "S01D2WL685", "S1D02WL685"];
        let dups = find_duplicate_channels(&labels, &records(&labels));
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].labels, vec!["S01D2WL685", "S1D02WL685"]);
        assert_eq!(dups[0].positions, vec![2, 3]);
    }

    #[test]
    fn test_multiple_duplicate_groups_in_first_occurrence_order() {
        let labels = ["S2D1HbO", "S1D1HbO", "S1D1HbO", "S2D01HbO", "S1D1HbR"];
        let dups = find_duplicate_channels(&labels, &records(&labels));
        let canon: Vec<&str> = dups.iter().map(|d| d.canonical.as_str()).collect();
        assert_eq!(canon, vec!["S2D1HbO", "S1D1HbO"]);
        assert_eq!(dups[0].positions, vec![1, 4]);
        assert_eq!(dups[1].positions, vec![2, 3]);
    }

    #[test]
    fn test_duplicate_message_lists_labels_and_positions() {
        let err = validate_channel_batch(&["S01D2WL685", "S1D02WL685"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'S01D2WL685' (position 1)"));
        assert!(msg.contains("'S1D02WL685' (position 2)"));
    }

    #[test]
    fn test_heterogeneous_types() {
        let err = validate_channel_batch(&["S1D2WL685", "S1D2HbO"]).unwrap_err();
        assert_eq!(
            err,
            ChannelError::HeterogeneousTypes {
                found: vec![ChannelType::Wavelength, ChannelType::Hb]
            }
        );
        assert!(err.to_string().contains("WAVELENGTH, HB"));
    }

    #[test]
    fn test_parse_error_aborts_batch() {
        let err = validate_channel_batch(&["S1D2WL685", "SXD2WL685"]).unwrap_err();
        assert!(matches!(err, ChannelError::Parse { .. }));
        assert!(err.to_string().contains("SXD2WL685"));
    }

    #[test]
    fn test_missing_measure_warning() {
        let batch = validate_channel_batch(&["S1D2WL685", "S1D2WL830", "S2D3WL685"]).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(
            batch.warnings,
            vec![ValidationWarning::InconsistentPairs {
                expected: 2,
                pairs: vec![PairCount {
                    pair: OptodePair::new(2, 3),
                    measures: 1,
                }],
            }]
        );
        assert!(batch.warnings[0].to_string().contains("S2D3"));
    }

    #[test]
    fn test_hb_batch_incomplete_pair_warns() {
        let batch = validate_channel_batch(&["S1D1HbO", "S1D1HbR", "S2D1HbO"]).unwrap();
        assert_eq!(batch.channel_type, Some(ChannelType::Hb));
        assert_eq!(
            batch.warnings,
            vec![ValidationWarning::InconsistentPairs {
                expected: 2,
                pairs: vec![PairCount {
                    pair: OptodePair::new(2, 1),
                    measures: 1,
                }],
            }]
        );
    }

    #[test]
    fn test_single_measure_everywhere_is_consistent() {
        let recs = records(&["S1D1WL760", "S2D1WL760", "S3D4WL760"]);
        assert_eq!(check_pair_consistency(&recs), None);
    }

    #[test]
    fn test_disjoint_measure_sets_flag_every_pair() {
        let recs = records(&["S1D1WL685", "S2D2WL830"]);
        match check_pair_consistency(&recs) {
            Some(ValidationWarning::InconsistentPairs { expected, pairs }) => {
                assert_eq!(expected, 2);
                let names: Vec<String> = pairs.iter().map(|p| p.pair.to_string()).collect();
                assert_eq!(names, vec!["S1D1", "S2D2"]);
            }
            None => panic!("expected a warning"),
        }
    }

    #[test]
    fn test_over_represented_pair_is_flagged() {
        // Duplicates never reach this check through the validator, so feed
        // records directly.
        let recs = vec![
            ChannelRecord::new(1, 1, Measure::Wavelength(685)),
            ChannelRecord::new(1, 1, Measure::Wavelength(685)),
            ChannelRecord::new(2, 1, Measure::Wavelength(685)),
        ];
        match check_pair_consistency(&recs) {
            Some(ValidationWarning::InconsistentPairs { expected, pairs }) => {
                assert_eq!(expected, 1);
                assert_eq!(
                    pairs,
                    vec![PairCount {
                        pair: OptodePair::new(1, 1),
                        measures: 2
                    }]
                );
            }
            None => panic!("expected a warning"),
        }
    }

    #[test]
    fn test_resolve_channel_type() {
        assert_eq!(resolve_channel_type(&[]).unwrap(), None);
        assert_eq!(
            resolve_channel_type(&records(&["S1D1HbO", "S2D2HbR"])).unwrap(),
            Some(ChannelType::Hb)
        );
    }
}
