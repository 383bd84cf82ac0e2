//! Attribute extraction
//!
//! Consumes the entity tagger's spans plus the raw transcript and
//! produces the three attribute maps of the report:
//! - Customer requirements: regex over the raw text, first match wins
//! - Company policies and customer objections: keyword triggers over
//!   lower-cased span text, collected into sets then applied so each
//!   boolean flips to true at most once, order-independent

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;

use crate::{EntityTagger, TaggedSpan};
use sca_core::{AttributeReport, ObjectionKey, PolicyKey, Result, ScaError};

/// Substrings whose presence in a span marks a policy as discussed
const POLICY_TRIGGERS: [(&str, PolicyKey); 5] = [
    ("rc transfer", PolicyKey::FreeRcTransfer),
    ("money back guarantee", PolicyKey::MoneyBackGuarantee),
    ("rsa", PolicyKey::FreeRsa),
    ("roadside assistance", PolicyKey::FreeRsa),
    ("return policy", PolicyKey::ReturnPolicy),
];

/// Substrings whose presence in a span marks an objection as raised
const OBJECTION_TRIGGERS: [(&str, ObjectionKey); 6] = [
    ("refurbishment", ObjectionKey::RefurbishmentQuality),
    ("car issues", ObjectionKey::CarIssues),
    ("reliability", ObjectionKey::CarIssues),
    ("price", ObjectionKey::PriceIssues),
    ("wait time", ObjectionKey::CustomerExperience),
    ("salesperson behavior", ObjectionKey::CustomerExperience),
];

/// Compiled requirement patterns. All static and pre-validated: compiling
/// happens once at construction, never per document.
struct RequirementPatterns {
    car_type: Regex,
    fuel_type: Regex,
    color: Regex,
    distance_travelled: Regex,
    make_year: Regex,
    transmission_type: Regex,
}

impl RequirementPatterns {
    fn compile() -> Result<Self> {
        Ok(Self {
            car_type: pattern(r"(?i)\b(suv|sedan|hatchback|mpv|wagon)\b")?,
            fuel_type: pattern(r"(?i)\b(diesel|petrol|gas|electric)\b")?,
            color: pattern(r"(?i)\b(blue|white|red|black|grey|green)\b")?,
            distance_travelled: pattern(r"(?i)\b\d+(?:,\d+)*\s*km\b")?,
            make_year: pattern(r"\b20\d{2}\b")?,
            transmission_type: pattern(r"(?i)\b(manual|automatic|any)\b")?,
        })
    }
}

fn pattern(source: &str) -> Result<Regex> {
    Regex::new(source).map_err(|e| ScaError::Extraction(format!("Invalid pattern: {e}")))
}

/// Leftmost match of `re` in `text`, keeping the full matched text
fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}

/// Extracts the attribute report for one transcript.
///
/// Holds the tagger for the process lifetime and the compiled regexes;
/// each `extract` call is independent and produces a fresh report.
pub struct AttributeExtractor {
    tagger: Arc<dyn EntityTagger>,
    patterns: RequirementPatterns,
}

impl AttributeExtractor {
    /// Create an extractor around the given tagger
    pub fn new(tagger: Arc<dyn EntityTagger>) -> Result<Self> {
        Ok(Self {
            tagger,
            patterns: RequirementPatterns::compile()?,
        })
    }

    /// Name of the underlying tagger, for logging
    pub fn tagger_name(&self) -> &str {
        self.tagger.name()
    }

    /// Run one full extraction pass over the transcript
    pub async fn extract(&self, text: &str) -> Result<AttributeReport> {
        let spans = self.tagger.tag(text).await?;

        let mut report = AttributeReport::default();

        let (policies, objections) = collect_triggers(&spans);
        for key in policies {
            report.company_policies.mark(key);
        }
        for key in objections {
            report.customer_objections.mark(key);
        }

        // Requirements come from the raw text, not the tagger output
        let patterns = &self.patterns;
        let requirements = &mut report.customer_requirements;
        requirements.car_type = first_match(&patterns.car_type, text);
        requirements.fuel_type = first_match(&patterns.fuel_type, text);
        requirements.color = first_match(&patterns.color, text);
        requirements.distance_travelled = first_match(&patterns.distance_travelled, text);
        requirements.make_year = first_match(&patterns.make_year, text);
        requirements.transmission_type = first_match(&patterns.transmission_type, text);

        Ok(report)
    }
}

/// Scan spans for trigger keywords, deduplicated into key sets.
///
/// A single span can contribute to multiple categories; the sets make
/// the subsequent application idempotent and order-independent.
fn collect_triggers(spans: &[TaggedSpan]) -> (HashSet<PolicyKey>, HashSet<ObjectionKey>) {
    let mut policies = HashSet::new();
    let mut objections = HashSet::new();

    for span in spans {
        let word = span.text.to_lowercase();

        for (trigger, key) in POLICY_TRIGGERS {
            if word.contains(trigger) {
                policies.insert(key);
            }
        }
        for (trigger, key) in OBJECTION_TRIGGERS {
            if word.contains(trigger) {
                objections.insert(key);
            }
        }
    }

    (policies, objections)
}

// ============================================================================
// Tests
// ============================================================================
