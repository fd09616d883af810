//! Structured result documents for capability findings.
//!
//! The matching engine hands over its findings as rule name to location
//! mappings. This module assembles those, together with run metadata and the
//! rule set, into a [`ResultDocument`] and serializes it to JSON for
//! downstream tooling. Addresses keep their type-tagged lossless form in the
//! output, optional metadata fields are omitted when absent, and rendering
//! never fails for a well-formed match set.
//!
//! # Example
//! ```rust
//! use findscope::address::Address;
//! use findscope::report::{Flavor, MatchResults, Metadata, ResultDocument, RuleSet};
//!
//! let meta = Metadata::new(Flavor::Static);
//! let rules = RuleSet::default();
//! let mut matches = MatchResults::new();
//! matches
//!     .entry("create process".to_string())
//!     .or_default()
//!     .push(Address::absolute(0x401000)?);
//!
//! let json = ResultDocument::new(meta, &rules, &matches).to_json()?;
//! assert!(json.contains("create process"));
//! # Ok::<(), findscope::Error>(())
//! ```

use std::collections::BTreeMap;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;

use crate::address::Address;
use crate::Result;

/// Which kind of analysis produced a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Findings located in the file image and its mapped layout.
    Static,
    /// Findings located in a recorded execution trace.
    Dynamic,
}

/// Content hashes and origin of the analyzed sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleIdentity {
    /// MD5 digest, lowercase hex.
    pub md5: String,
    /// SHA-1 digest, lowercase hex.
    pub sha1: String,
    /// SHA-256 digest, lowercase hex.
    pub sha256: String,
    /// Path the sample was loaded from, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl SampleIdentity {
    /// Computes all three digests over the raw sample bytes.
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        SampleIdentity {
            md5: hex_digest(Md5::digest(data).as_slice()),
            sha1: hex_digest(Sha1::digest(data).as_slice()),
            sha256: hex_digest(Sha256::digest(data).as_slice()),
            path: None,
        }
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Metadata describing one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Version of the tool that produced the document.
    pub version: String,
    /// When the run happened, RFC 3339, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// The analysis flavor of the run.
    pub flavor: Flavor,
    /// Identity of the analyzed sample, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<SampleIdentity>,
}

impl Metadata {
    /// Creates run metadata for the given flavor, versioned as this crate.
    #[must_use]
    pub fn new(flavor: Flavor) -> Self {
        Metadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: None,
            flavor,
            sample: None,
        }
    }
}

/// Descriptive metadata of a single detection rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// The rule name, unique within a rule set.
    pub name: String,
    /// The namespace grouping related rules, when assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Free-form description, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Rule {
    /// Creates a rule entry carrying only a name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Rule {
            name: name.to_string(),
            namespace: None,
            description: None,
        }
    }
}

/// The rules known to a run, keyed by rule name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    /// Adds a rule, replacing any previous rule of the same name.
    pub fn insert(&mut self, rule: Rule) {
        self.rules.insert(rule.name.clone(), rule);
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Findings as handed over by the matching engine: the locations at which
/// each rule matched, keyed by rule name.
pub type MatchResults = BTreeMap<String, Vec<Address>>;

/// One rule's metadata paired with the locations it matched at.
///
/// Locations are sorted by the address total order and deduplicated; the
/// same finding reported twice by a backend collapses to one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatches {
    /// The matched rule.
    pub rule: Rule,
    /// Sorted, deduplicated match locations.
    pub matches: Vec<Address>,
}

/// The structured report aggregating metadata, rules, and match locations.
///
/// Serialization is lossless for every address variant, including the
/// no-location sentinel, and omits metadata fields that are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Metadata of the run that produced these findings.
    pub meta: Metadata,
    /// Per-rule findings, keyed by rule name.
    pub rules: BTreeMap<String, RuleMatches>,
}

impl ResultDocument {
    /// Assembles a document from run metadata, the rule set, and the raw
    /// match results.
    ///
    /// Rules that matched but are missing from `ruleset` still appear, with
    /// minimal metadata synthesized from the rule name.
    #[must_use]
    pub fn new(meta: Metadata, ruleset: &RuleSet, matches: &MatchResults) -> Self {
        let rules = matches
            .iter()
            .map(|(name, locations)| {
                let rule = ruleset
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| Rule::named(name));
                let mut matches = locations.clone();
                matches.sort();
                matches.dedup();
                (name.clone(), RuleMatches { rule, matches })
            })
            .collect();
        ResultDocument { meta, rules }
    }

    /// Serializes the document to a JSON string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Serialization`] if the underlying writer
    /// fails; this does not happen for well-formed documents.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Builds a result document from `(metadata, rule set, match results)` and
/// serializes it to JSON in one step.
///
/// # Errors
/// Returns [`crate::Error::Serialization`] if serialization fails; this does
/// not happen for well-formed match-result sets.
pub fn render_json(meta: Metadata, ruleset: &RuleSet, matches: &MatchResults) -> Result<String> {
    ResultDocument::new(meta, ruleset, matches).to_json()
}
