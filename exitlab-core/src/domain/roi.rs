//! Minimal-ROI configuration and the sorted tier table derived from it.
//!
//! The backtester stores `minimal_roi` as a JSON object of
//! `"<minutes>": <ratio>` pairs. The object is kept in document order so
//! that the descending sort below can break ties by insertion order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// The configured minimal-ROI mapping, label → threshold, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinimalRoi(pub Vec<(String, f64)>);

impl MinimalRoi {
    pub fn entries(&self) -> &[(String, f64)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for MinimalRoi {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for MinimalRoi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, threshold) in &self.0 {
            map.serialize_entry(label, threshold)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MinimalRoi {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = MinimalRoi;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of ROI labels to threshold ratios")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, threshold)) = access.next_entry::<String, f64>()? {
                    entries.push((label, threshold));
                }
                Ok(MinimalRoi(entries))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(MinimalRoi::default())
            }
        }

        deserializer.deserialize_any(OrderedVisitor)
    }
}

/// One rung of the ROI ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiTier {
    pub label: String,
    pub threshold: f64,
}

impl RoiTier {
    pub fn new(label: impl Into<String>, threshold: f64) -> Self {
        Self {
            label: label.into(),
            threshold,
        }
    }

    /// Reason label for trades attributed to this tier, e.g. `roi 60:0.020`.
    pub fn reason_label(&self) -> String {
        format!("roi {}:{:.3}", self.label, self.threshold)
    }
}

/// ROI tiers sorted by threshold, highest first.
///
/// The order is the contract the classifier relies on: a first-match scan
/// over this table finds the highest threshold the trade still satisfies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiTable {
    tiers: Vec<RoiTier>,
}

impl RoiTable {
    /// Sort the configured mapping descending by threshold.
    ///
    /// Stable: tiers sharing a threshold keep their document order.
    pub fn from_minimal_roi(minimal_roi: &MinimalRoi) -> Self {
        let mut tiers: Vec<RoiTier> = minimal_roi
            .entries()
            .iter()
            .map(|(label, threshold)| RoiTier::new(label.clone(), *threshold))
            .collect();
        tiers.sort_by(|a, b| {
            b.threshold
                .partial_cmp(&a.threshold)
                .unwrap_or(Ordering::Equal)
        });
        Self { tiers }
    }

    /// Take tiers exactly as given, without sorting.
    pub fn from_ordered(tiers: Vec<RoiTier>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[RoiTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl fmt::Display for RoiTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tier) in self.tiers.iter().enumerate() {
            if i > 0 {
                f.write_str("  ")?;
            }
            write!(f, "{}:{:.3}", tier.label, tier.threshold)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(table: &RoiTable) -> Vec<&str> {
        table.tiers().iter().map(|t| t.label.as_str()).collect()
    }

    #[test]
    fn minimal_roi_keeps_document_order() {
        let roi: MinimalRoi = serde_json::from_str(r#"{"60": 0.01, "0": 0.04, "30": 0.02}"#).unwrap();
        let keys: Vec<&str> = roi.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["60", "0", "30"]);
    }

    #[test]
    fn minimal_roi_null_is_empty() {
        let roi: MinimalRoi = serde_json::from_str("null").unwrap();
        assert!(roi.is_empty());
    }

    #[test]
    fn minimal_roi_serializes_as_object() {
        let roi: MinimalRoi = [("0", 0.1), ("60", 0.02)].into_iter().collect();
        assert_eq!(serde_json::to_string(&roi).unwrap(), r#"{"0":0.1,"60":0.02}"#);
    }

    #[test]
    fn table_sorted_descending() {
        let roi: MinimalRoi = [("60", 0.01), ("0", 0.04), ("30", 0.02)].into_iter().collect();
        let table = RoiTable::from_minimal_roi(&roi);
        assert_eq!(labels(&table), vec!["0", "30", "60"]);
    }

    #[test]
    fn table_sort_is_stable_on_ties() {
        let roi: MinimalRoi = [("b", 0.02), ("a", 0.05), ("c", 0.02), ("d", 0.02)]
            .into_iter()
            .collect();
        let table = RoiTable::from_minimal_roi(&roi);
        assert_eq!(labels(&table), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_mapping_gives_empty_table() {
        let table = RoiTable::from_minimal_roi(&MinimalRoi::default());
        assert!(table.is_empty());
        assert_eq!(table.to_string(), "");
    }

    #[test]
    fn reason_label_uses_three_decimals() {
        assert_eq!(RoiTier::new("0", 0.1).reason_label(), "roi 0:0.100");
        assert_eq!(RoiTier::new("60", 0.02).reason_label(), "roi 60:0.020");
        assert_eq!(RoiTier::new("120", 0.0).reason_label(), "roi 120:0.000");
    }

    #[test]
    fn display_joins_with_two_spaces() {
        let roi: MinimalRoi = [("0", 0.1), ("60", 0.02)].into_iter().collect();
        let table = RoiTable::from_minimal_roi(&roi);
        assert_eq!(table.to_string(), "0:0.100  60:0.020");
    }

    #[test]
    fn from_ordered_does_not_sort() {
        let table = RoiTable::from_ordered(vec![RoiTier::new("60", 0.02), RoiTier::new("0", 0.1)]);
        assert_eq!(labels(&table), vec!["60", "0"]);
    }
}
