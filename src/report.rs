//! Structured report of a terms facet
//!
//! [`TermsFacetReport`] is the serializable projection of a merged facet that
//! is handed to the response layer:
//!
//! ```json
//! {"_type":"terms","missing":1,"total":14,"other":3,"terms":[{"term":1.0,"count":7}]}
//! ```
//!
//! Unmapped placeholders produce a report with an empty term list. JSON has no
//! NaN or infinity, so non-finite terms are written as strings (`"NaN"`,
//! `"inf"`, `"-inf"`) and read back from them.

use crate::constants::REPORT_TYPE_LABEL;
use crate::entry::RankedEntry;
use crate::facet::ShardFacet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One term and its count in a report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermCount {
    #[serde(serialize_with = "serialize_term", deserialize_with = "deserialize_term")]
    pub term: f64,
    pub count: u64,
}

impl TermCount {
    /// Textual form of the term
    pub fn term_text(&self) -> String {
        RankedEntry::new(self.term, self.count).term()
    }
}

impl From<&RankedEntry> for TermCount {
    fn from(entry: &RankedEntry) -> Self {
        Self {
            term: entry.value(),
            count: entry.count(),
        }
    }
}

fn serialize_term<S: Serializer>(term: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if term.is_finite() {
        serializer.serialize_f64(*term)
    } else {
        serializer.serialize_str(&RankedEntry::new(*term, 0).term())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TermRepr {
    Number(f64),
    Text(String),
}

fn deserialize_term<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match TermRepr::deserialize(deserializer)? {
        TermRepr::Number(term) => Ok(term),
        TermRepr::Text(text) => text
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid term: {}", text))),
    }
}

/// Serializable summary of a terms facet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsFacetReport {
    #[serde(rename = "_type")]
    pub facet_type: String,
    pub missing: u64,
    pub total: u64,
    pub other: u64,
    pub terms: Vec<TermCount>,
}

impl TermsFacetReport {
    /// Project a facet into its report, keeping entry order
    pub fn from_facet(facet: &ShardFacet) -> Self {
        Self {
            facet_type: REPORT_TYPE_LABEL.to_string(),
            missing: facet.missing_count(),
            total: facet.total_count(),
            other: facet.other_count(),
            terms: facet.entries().iter().map(TermCount::from).collect(),
        }
    }
}

impl From<&ShardFacet> for TermsFacetReport {
    fn from(facet: &ShardFacet) -> Self {
        Self::from_facet(facet)
    }
}
