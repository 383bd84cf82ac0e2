//! Entity tagger implementations
//!
//! Provides two tagging strategies:
//! - Rule-based: regex patterns + dictionary matching over the
//!   car-sales vocabulary
//! - Remote: HTTP client for a HuggingFace-style NER inference endpoint

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{EntityTagger, TaggedSpan};
use sca_core::{Result, ScaError, TaggerConfig, TaggerProvider};

// ============================================================================
// Span Labels for the Car-Sales Domain
// ============================================================================

/// Labels assigned to tagged spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanLabel {
    // Vehicle attributes
    CarType,
    FuelType,
    Color,
    Transmission,
    Make,

    // Numeric facts
    Distance,
    Year,
    Price,

    // Conversation content
    PolicyTerm,
    ObjectionTerm,

    // Generic
    Organization,
    Person,
    Unknown,
}

impl SpanLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CarType => "CarType",
            Self::FuelType => "FuelType",
            Self::Color => "Color",
            Self::Transmission => "Transmission",
            Self::Make => "Make",
            Self::Distance => "Distance",
            Self::Year => "Year",
            Self::Price => "Price",
            Self::PolicyTerm => "PolicyTerm",
            Self::ObjectionTerm => "ObjectionTerm",
            Self::Organization => "Organization",
            Self::Person => "Person",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for SpanLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Rule-based Tagger
// ============================================================================

/// Dictionary entry for phrase matching
#[derive(Debug, Clone)]
pub struct DictionaryEntry {
    pub term: String,
    pub label: SpanLabel,
    pub aliases: Vec<String>,
}

/// Rule-based tagger using regex patterns and a domain dictionary.
///
/// The dictionary covers every policy and objection trigger phrase, so
/// downstream keyword matching always sees those phrases as spans.
pub struct RuleBasedTagger {
    /// Pattern rules (regex -> label)
    patterns: Vec<(Regex, SpanLabel, f32)>,
    /// Dictionary of known terms
    dictionary: HashMap<String, DictionaryEntry>,
}

impl RuleBasedTagger {
    /// Create a new tagger with the default car-sales rules
    pub fn new() -> Self {
        let mut tagger = Self {
            patterns: Vec::new(),
            dictionary: HashMap::new(),
        };

        tagger.init_patterns();
        tagger.init_dictionary();
        tagger
    }

    fn init_patterns(&mut self) {
        // Odometer readings, with optional thousands separators
        self.add_pattern(r"(?i)\d+(?:,\d+)*\s*km\b", SpanLabel::Distance, 0.9);

        // Model years
        self.add_pattern(r"\b20\d{2}\b", SpanLabel::Year, 0.9);

        // Price mentions
        self.add_pattern(r"(?i)(?:₹\s*|\brs\.?\s*)\d[\d,]*", SpanLabel::Price, 0.85);
        self.add_pattern(r"(?i)\d[\d,]*\s*(?:lakh|lakhs)\b", SpanLabel::Price, 0.85);
    }

    fn init_dictionary(&mut self) {
        // Body types
        self.add_term("suv", SpanLabel::CarType, vec!["crossover"]);
        self.add_term("sedan", SpanLabel::CarType, vec!["saloon"]);
        self.add_term("hatchback", SpanLabel::CarType, vec![]);
        self.add_term("mpv", SpanLabel::CarType, vec!["minivan"]);
        self.add_term("wagon", SpanLabel::CarType, vec!["estate"]);

        // Fuel types
        self.add_term("diesel", SpanLabel::FuelType, vec![]);
        self.add_term("petrol", SpanLabel::FuelType, vec!["gasoline"]);
        self.add_term("gas", SpanLabel::FuelType, vec!["cng", "lpg"]);
        self.add_term("electric", SpanLabel::FuelType, vec![]);

        // Colors
        self.add_term("blue", SpanLabel::Color, vec![]);
        self.add_term("white", SpanLabel::Color, vec![]);
        self.add_term("red", SpanLabel::Color, vec![]);
        self.add_term("black", SpanLabel::Color, vec![]);
        self.add_term("grey", SpanLabel::Color, vec!["gray"]);
        self.add_term("green", SpanLabel::Color, vec![]);

        // Transmissions
        self.add_term("manual", SpanLabel::Transmission, vec![]);
        self.add_term("automatic", SpanLabel::Transmission, vec!["amt"]);

        // Common makes
        self.add_term("maruti", SpanLabel::Make, vec!["maruti suzuki"]);
        self.add_term("hyundai", SpanLabel::Make, vec![]);
        self.add_term("honda", SpanLabel::Make, vec![]);
        self.add_term("toyota", SpanLabel::Make, vec![]);
        self.add_term("tata", SpanLabel::Make, vec![]);
        self.add_term("mahindra", SpanLabel::Make, vec![]);

        // Policy phrases
        self.add_term(
            "rc transfer",
            SpanLabel::PolicyTerm,
            vec!["registration transfer"],
        );
        self.add_term(
            "money back guarantee",
            SpanLabel::PolicyTerm,
            vec!["money-back guarantee"],
        );
        self.add_term("roadside assistance", SpanLabel::PolicyTerm, vec!["rsa"]);
        self.add_term("return policy", SpanLabel::PolicyTerm, vec![]);

        // Objection phrases
        self.add_term("refurbishment", SpanLabel::ObjectionTerm, vec![]);
        self.add_term("car issues", SpanLabel::ObjectionTerm, vec!["reliability"]);
        self.add_term("price", SpanLabel::ObjectionTerm, vec!["overpriced", "expensive"]);
        self.add_term("wait time", SpanLabel::ObjectionTerm, vec!["waiting time"]);
        self.add_term(
            "salesperson behavior",
            SpanLabel::ObjectionTerm,
            vec!["salesperson behaviour"],
        );
    }

    /// Add a regex pattern
    fn add_pattern(&mut self, pattern: &str, label: SpanLabel, confidence: f32) {
        if let Ok(regex) = Regex::new(pattern) {
            self.patterns.push((regex, label, confidence));
        }
    }

    /// Add a dictionary term with lowercase aliases
    fn add_term(&mut self, term: &str, label: SpanLabel, aliases: Vec<&str>) {
        let entry = DictionaryEntry {
            term: term.to_string(),
            label,
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
        };
        self.dictionary.insert(term.to_string(), entry);
    }

    /// Tag spans using pattern matching
    fn tag_by_patterns(&self, text: &str) -> Vec<TaggedSpan> {
        let mut spans = Vec::new();

        for (regex, label, confidence) in &self.patterns {
            for mat in regex.find_iter(text) {
                spans.push(TaggedSpan {
                    text: mat.as_str().to_string(),
                    label: label.to_string(),
                    start: mat.start(),
                    end: mat.end(),
                    confidence: *confidence,
                });
            }
        }

        spans
    }

    /// Tag spans using case-insensitive dictionary lookup
    fn tag_by_dictionary(&self, text: &str) -> Vec<TaggedSpan> {
        let mut spans = Vec::new();
        let text_lower = text.to_lowercase();

        for entry in self.dictionary.values() {
            self.collect_term(text, &text_lower, &entry.term, entry.label, 0.95, &mut spans);

            for alias in &entry.aliases {
                self.collect_term(text, &text_lower, alias, entry.label, 0.9, &mut spans);
            }
        }

        spans
    }

    fn collect_term(
        &self,
        text: &str,
        text_lower: &str,
        term: &str,
        label: SpanLabel,
        confidence: f32,
        spans: &mut Vec<TaggedSpan>,
    ) {
        for (start, matched) in text_lower.match_indices(term) {
            let end = start + matched.len();
            // Offsets are computed on the lowercased text; fall back to the
            // lowercase surface if they don't land on a char boundary in the
            // original (possible around non-ASCII case folding).
            let surface = text.get(start..end).unwrap_or(matched).to_string();

            spans.push(TaggedSpan {
                text: surface,
                label: label.to_string(),
                start,
                end,
                confidence,
            });
        }
    }

    /// Remove overlapping spans, keeping the highest confidence one
    fn deduplicate(&self, mut spans: Vec<TaggedSpan>) -> Vec<TaggedSpan> {
        spans.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(b.confidence.total_cmp(&a.confidence))
                .then(b.end.cmp(&a.end))
        });

        let mut result: Vec<TaggedSpan> = Vec::new();
        let mut covered: HashSet<usize> = HashSet::new();

        for span in spans {
            let overlaps = (span.start..span.end).any(|i| covered.contains(&i));

            if !overlaps {
                for i in span.start..span.end {
                    covered.insert(i);
                }
                result.push(span);
            }
        }

        result.sort_by_key(|s| s.start);
        result
    }
}

impl Default for RuleBasedTagger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EntityTagger for RuleBasedTagger {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        let mut spans = self.tag_by_patterns(text);
        spans.extend(self.tag_by_dictionary(text));

        Ok(self.deduplicate(spans))
    }

    fn name(&self) -> &str {
        "rule"
    }
}

// ============================================================================
// Remote Tagger
// ============================================================================

/// Entity as returned by a HuggingFace-style token classification endpoint
#[derive(Debug, Deserialize)]
struct RemoteEntity {
    word: String,
    #[serde(default)]
    entity_group: Option<String>,
    #[serde(default)]
    entity: Option<String>,
    score: f32,
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
}

#[derive(Debug, Serialize)]
struct RemoteRequest<'a> {
    inputs: &'a str,
}

/// HTTP client for a NER inference endpoint.
///
/// Expects the pipeline output format: a JSON array of entities with
/// `word`, `entity_group` (or `entity`), `score`, and offsets.
pub struct RemoteTagger {
    client: Client,
    endpoint: String,
    model: String,
    min_confidence: f32,
}

impl RemoteTagger {
    /// Create a new remote tagger
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        min_confidence: f32,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            min_confidence,
        }
    }

    /// Create from config, applying the request timeout
    pub fn from_config(config: &TaggerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScaError::Tagger(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            min_confidence: config.min_confidence,
        })
    }

    /// Convert raw endpoint entities into spans, dropping low-confidence ones
    fn convert(&self, raw: Vec<RemoteEntity>) -> Vec<TaggedSpan> {
        raw.into_iter()
            .filter(|e| e.score >= self.min_confidence)
            .map(|e| {
                let start = e.start.unwrap_or(0);
                let end = e.end.unwrap_or(start + e.word.len());
                let label = e
                    .entity_group
                    .or(e.entity)
                    .unwrap_or_else(|| SpanLabel::Unknown.to_string());

                TaggedSpan {
                    text: e.word,
                    label,
                    start,
                    end,
                    confidence: e.score,
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl EntityTagger for RemoteTagger {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        let request = RemoteRequest { inputs: text };

        let response = self
            .client
            .post(format!("{}/models/{}", self.endpoint, self.model))
            .json(&request)
            .send()
            .await
            .map_err(|e| ScaError::Tagger(format!("NER request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScaError::Tagger(format!("NER endpoint error: {error_text}")));
        }

        let raw: Vec<RemoteEntity> = response
            .json()
            .await
            .map_err(|e| ScaError::Tagger(format!("Failed to parse NER response: {e}")))?;

        Ok(self.convert(raw))
    }

    fn name(&self) -> &str {
        "remote"
    }
}

// ============================================================================
// Factory function
// ============================================================================

/// Create an entity tagger from config
pub fn create_tagger(config: &TaggerConfig) -> Result<Arc<dyn EntityTagger>> {
    match config.provider {
        TaggerProvider::Rule => Ok(Arc::new(RuleBasedTagger::new())),
        TaggerProvider::Remote => Ok(Arc::new(RemoteTagger::from_config(config)?)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dictionary_tagging() {
        let tagger = RuleBasedTagger::new();

        let text = "We offer free RC transfer and roadside assistance.";
        let spans = tagger.tag(text).await.unwrap();

        let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert!(texts.contains(&"RC transfer"));
        assert!(texts.contains(&"roadside assistance"));
    }

    #[tokio::test]
    async fn test_pattern_tagging() {
        let tagger = RuleBasedTagger::new();

        let text = "A 2019 model with 32,000 km on the odometer.";
        let spans = tagger.tag(text).await.unwrap();

        let labels: Vec<&str> = spans.iter().map(|s| s.label.as_str()).collect();
        assert!(labels.contains(&"Year"));
        assert!(labels.contains(&"Distance"));
    }

    #[tokio::test]
    async fn test_case_insensitive_lookup() {
        let tagger = RuleBasedTagger::new();

        let spans = tagger.tag("RETURN POLICY applies here").await.unwrap();

        assert!(spans.iter().any(|s| s.label == "PolicyTerm"));
        // Surface text keeps the document casing
        assert!(spans.iter().any(|s| s.text == "RETURN POLICY"));
    }

    #[tokio::test]
    async fn test_overlap_deduplication() {
        let tagger = RuleBasedTagger::new();

        // "roadside assistance" contains no sub-entry, but "rsa" appears
        // inside other words in principle; overlapping spans must not both
        // survive for the same byte range.
        let spans = tagger.tag("roadside assistance").await.unwrap();

        for (i, a) in spans.iter().enumerate() {
            for b in spans.iter().skip(i + 1) {
                assert!(a.end <= b.start || b.end <= a.start, "overlap: {a:?} / {b:?}");
            }
        }
    }

    #[tokio::test]
    async fn test_empty_text() {
        let tagger = RuleBasedTagger::new();
        let spans = tagger.tag("").await.unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_remote_conversion_applies_threshold() {
        let tagger = RemoteTagger::new("http://localhost:8090", "test-model", 0.6);

        let raw = vec![
            RemoteEntity {
                word: "Honda".to_string(),
                entity_group: Some("ORG".to_string()),
                entity: None,
                score: 0.97,
                start: Some(0),
                end: Some(5),
            },
            RemoteEntity {
                word: "maybe".to_string(),
                entity_group: None,
                entity: Some("MISC".to_string()),
                score: 0.3,
                start: Some(6),
                end: Some(11),
            },
        ];

        let spans = tagger.convert(raw);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Honda");
        assert_eq!(spans[0].label, "ORG");
    }

    #[test]
    fn test_create_tagger_rule_provider() {
        let config = TaggerConfig::default();
        let tagger = create_tagger(&config).unwrap();
        assert_eq!(tagger.name(), "rule");
    }

    #[test]
    fn test_span_label_display() {
        assert_eq!(SpanLabel::PolicyTerm.to_string(), "PolicyTerm");
        assert_eq!(SpanLabel::ObjectionTerm.as_str(), "ObjectionTerm");
    }
}
