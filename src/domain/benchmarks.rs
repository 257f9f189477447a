//! Industry benchmark revenue multiples.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Multiple used when an industry is missing or has no recorded multiple.
pub const DEFAULT_MULTIPLE: f64 = 3.0;

const BUILTIN: [(&str, Option<f64>); 40] = [
    ("Biotechnology", Some(4.51)),
    ("Health Sustainability and Wellness", Some(2.555)),
    ("Foodtech", Some(2.765)),
    ("Medical Devices and Equipment", Some(3.38)),
    ("Energy", Some(3.51)),
    ("Software", Some(3.13)),
    ("Robotics", Some(2.78)),
    ("Education", Some(3.19)),
    ("Sports", Some(2.215)),
    ("Manufacturing", Some(2.43)),
    ("Clothing and Apparel", Some(1.805)),
    ("Apps", Some(2.855)),
    ("Artificial Intelligence", Some(3.38)),
    ("Climate Tech", Some(2.15)),
    ("Security", Some(4.02)),
    ("Restaurant Tech", Some(2.47)),
    ("Sustainability", Some(3.775)),
    ("Clean Technology", Some(2.62)),
    ("Ecommerce", Some(2.685)),
    ("Fintech", Some(3.365)),
    ("Healthcare Services", Some(2.495)),
    ("Business Services", Some(5.99)),
    ("Consumer Products", Some(2.335)),
    ("Beauty", Some(2.22)),
    ("Other", None),
    ("Consumer Services", Some(2.925)),
    ("Marketing / Advertising", Some(2.225)),
    ("Music and Audio", Some(1.775)),
    ("Wearables and Quantified Self", Some(3.635)),
    ("Internet / Web Services", Some(2.465)),
    ("HRtech", Some(4.61)),
    ("Construction", Some(4.86)),
    ("Food and Beverage", Some(2.5)),
    ("Mobility Tech", Some(2.46)),
    ("Esports", Some(1.92)),
    ("Commerce and Shopping", Some(2.185)),
    ("Digital Health", Some(2.76)),
    ("Ridesharing", Some(2.485)),
    ("Life Sciences", Some(3.975)),
    ("Privacy and Security", Some(4.47)),
];

/// Where a benchmark multiple came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkSource {
    /// The table has a multiple for this industry.
    Recorded,
    /// The industry is listed but has no multiple recorded.
    Unrecorded,
    /// The industry is not in the table.
    Unknown,
}

/// Result of looking an industry up, after fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkLookup {
    pub multiple: f64,
    pub source: BenchmarkSource,
}

impl BenchmarkLookup {
    pub fn is_fallback(&self) -> bool {
        self.source != BenchmarkSource::Recorded
    }
}

/// Industry name -> benchmark revenue multiple (`None` = no multiple recorded).
///
/// Serializes as a flat JSON object, `null` for unrecorded industries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustryMultiples {
    entries: BTreeMap<String, Option<f64>>,
}

impl IndustryMultiples {
    /// The built-in benchmark table.
    pub fn builtin() -> Self {
        BUILTIN
            .iter()
            .map(|&(name, multiple)| (name.to_string(), multiple))
            .collect()
    }

    /// Raw table entry: `None` if absent, `Some(None)` if listed without a multiple.
    pub fn get(&self, industry: &str) -> Option<Option<f64>> {
        self.entries.get(industry).copied()
    }

    /// Multiple to judge `industry` against, falling back to [`DEFAULT_MULTIPLE`].
    pub fn lookup(&self, industry: &str) -> BenchmarkLookup {
        match self.entries.get(industry) {
            Some(Some(multiple)) => BenchmarkLookup {
                multiple: *multiple,
                source: BenchmarkSource::Recorded,
            },
            Some(None) => BenchmarkLookup {
                multiple: DEFAULT_MULTIPLE,
                source: BenchmarkSource::Unrecorded,
            },
            None => BenchmarkLookup {
                multiple: DEFAULT_MULTIPLE,
                source: BenchmarkSource::Unknown,
            },
        }
    }

    pub fn insert(&mut self, industry: impl Into<String>, multiple: Option<f64>) {
        self.entries.insert(industry.into(), multiple);
    }

    /// Add or override every entry of `updates`.
    pub fn merge(&mut self, updates: &IndustryMultiples) {
        for (name, multiple) in &updates.entries {
            self.entries.insert(name.clone(), *multiple);
        }
    }

    pub fn merged(&self, updates: &IndustryMultiples) -> Self {
        let mut out = self.clone();
        out.merge(updates);
        out
    }

    /// Entries in industry-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(name, multiple)| (name.as_str(), *multiple))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of entries whose multiple is not a finite positive number.
    pub fn invalid_entries(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, m)| matches!(m, Some(v) if !(v.is_finite() && *v > 0.0)))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl FromIterator<(String, Option<f64>)> for IndustryMultiples {
    fn from_iter<I: IntoIterator<Item = (String, Option<f64>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_contents() {
        let table = IndustryMultiples::builtin();
        assert_eq!(table.len(), 40);
        assert_eq!(table.get("Software"), Some(Some(3.13)));
        assert_eq!(table.get("Other"), Some(None));
        assert_eq!(table.get("Nonexistent Sector"), None);
        assert!(table.invalid_entries().is_empty());
    }

    #[test]
    fn lookup_falls_back_to_default() {
        let table = IndustryMultiples::builtin();

        let software = table.lookup("Software");
        assert_eq!(software.multiple, 3.13);
        assert!(!software.is_fallback());

        let unknown = table.lookup("Nonexistent Sector");
        assert_eq!(unknown.multiple, DEFAULT_MULTIPLE);
        assert_eq!(unknown.source, BenchmarkSource::Unknown);

        let other = table.lookup("Other");
        assert_eq!(other.multiple, DEFAULT_MULTIPLE);
        assert_eq!(other.source, BenchmarkSource::Unrecorded);
    }

    #[test]
    fn merge_adds_and_overrides() {
        let table = IndustryMultiples::builtin();
        let mut updates = IndustryMultiples::default();
        updates.insert("Software", Some(4.0));
        updates.insert("Quantum", Some(6.5));
        updates.insert("Beauty", None);

        let merged = table.merged(&updates);
        assert_eq!(merged.len(), 41);
        assert_eq!(merged.lookup("Software").multiple, 4.0);
        assert_eq!(merged.lookup("Quantum").multiple, 6.5);
        assert_eq!(merged.lookup("Beauty").source, BenchmarkSource::Unrecorded);
        // The source table is untouched.
        assert_eq!(table.lookup("Software").multiple, 3.13);
    }

    #[test]
    fn serializes_as_flat_object_with_nulls() {
        let mut table = IndustryMultiples::default();
        table.insert("Other", None);
        table.insert("Software", Some(3.13));
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"Other":null,"Software":3.13}"#);

        let back: IndustryMultiples = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn invalid_entries_flags_non_positive_multiples() {
        let mut table = IndustryMultiples::default();
        table.insert("Broken", Some(-1.0));
        table.insert("Fine", Some(2.0));
        assert_eq!(table.invalid_entries(), vec!["Broken"]);
    }
}
