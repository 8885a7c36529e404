use std::fmt;
use std::str::FromStr;

use crate::error::{ChannelError, Result};
use crate::types::{ChannelRecord, HbSpecies, Measure};

/// Parse one channel label such as `S1D2WL685` or `S03D1HbR`.
///
/// Grammar: `S<digits>D<digits>` followed by `WL<digits>` or `Hb` plus one of
/// `O`, `R`, `T`. Leading zeros are allowed in every number. Matching is
/// case-sensitive and the whole label must be consumed.
///
/// # Errors
/// `ChannelError::Parse` carrying the offending label.
pub fn parse_channel_label(label: &str) -> Result<ChannelRecord> {
    let rest = label
        .strip_prefix('S')
        .ok_or_else(|| ChannelError::parse(label, "expected 'S' source prefix"))?;
    let (digits, rest) = split_digits(rest);
    let source_index = parse_number(label, digits, "source index")?;

    let rest = rest
        .strip_prefix('D')
        .ok_or_else(|| ChannelError::parse(label, "expected 'D' detector prefix"))?;
    let (digits, rest) = split_digits(rest);
    let detector_index = parse_number(label, digits, "detector index")?;

    let measure = parse_measure(label, rest)?;

    Ok(ChannelRecord::new(source_index, detector_index, measure))
}

/// Render the canonical label for a channel. Numbers are written without
/// leading zeros.
pub fn format_channel_label(source_index: u32, detector_index: u32, measure: Measure) -> String {
    format!("S{}D{}{}", source_index, detector_index, measure)
}

/// Re-serialize a label into canonical form, e.g. `S01D02WL685` -> `S1D2WL685`
pub fn canonicalize_label(label: &str) -> Result<String> {
    parse_channel_label(label).map(|record| record.to_string())
}

/// Parse a sequence of labels, preserving order. Stops at the first
/// malformed label.
pub fn parse_channel_labels<S: AsRef<str>>(labels: &[S]) -> Result<Vec<ChannelRecord>> {
    labels
        .iter()
        .map(|label| parse_channel_label(label.as_ref()))
        .collect()
}

fn parse_measure(label: &str, suffix: &str) -> Result<Measure> {
    if let Some(rest) = suffix.strip_prefix("WL") {
        let (digits, trailing) = split_digits(rest);
        let nm = parse_number(label, digits, "wavelength")?;
        if !trailing.is_empty() {
            return Err(ChannelError::parse(
                label,
                format!("unexpected trailing characters '{}'", trailing),
            ));
        }
        Ok(Measure::Wavelength(nm))
    } else if let Some(tag) = suffix.strip_prefix("Hb") {
        HbSpecies::from_tag(tag)
            .map(Measure::Hb)
            .ok_or_else(|| ChannelError::parse(label, format!("unknown hemoglobin tag '{}'", tag)))
    } else {
        Err(ChannelError::parse(
            label,
            "expected 'WL<wavelength>' or 'Hb<O|R|T>' suffix",
        ))
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn parse_number(label: &str, digits: &str, what: &str) -> Result<u32> {
    if digits.is_empty() {
        return Err(ChannelError::parse(label, format!("missing {}", what)));
    }
    digits
        .parse::<u32>()
        .map_err(|_| ChannelError::parse(label, format!("{} '{}' is out of range", what, digits)))
}

impl FromStr for ChannelRecord {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self> {
        parse_channel_label(s)
    }
}

impl fmt::Display for ChannelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_channel_label(
            self.source_index,
            self.detector_index,
            self.measure,
        ))
    }
}
