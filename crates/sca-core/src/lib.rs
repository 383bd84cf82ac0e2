//! SCA Core - Domain models, errors, and configuration
//!
//! This crate defines the shared types used throughout the sales
//! conversation analyzer:
//! - The attribute report (requirements, policies, objections)
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{AppConfig, ConfigError, LoggingConfig, ServerConfig, TaggerConfig, TaggerProvider};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for analyzer operations
#[derive(Error, Debug)]
pub enum ScaError {
    #[error("Input decode error: {0}")]
    InputDecode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tagger error: {0}")]
    Tagger(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ScaError>;

// ============================================================================
// Attribute Report
// ============================================================================

/// Full extraction result for one conversation transcript.
///
/// Serializes to exactly the three-key JSON document the downloadable
/// artifact uses. Produced fresh per document and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeReport {
    #[serde(rename = "Customer Requirements")]
    pub customer_requirements: CustomerRequirements,

    #[serde(rename = "Company Policies Discussed")]
    pub company_policies: CompanyPolicies,

    #[serde(rename = "Customer Objections")]
    pub customer_objections: CustomerObjections,
}

/// Vehicle attributes the customer asked for. All fields start empty and
/// are filled by regex matching against the raw transcript; the stored
/// value is the full matched text, first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRequirements {
    #[serde(rename = "Car Type")]
    pub car_type: Option<String>,

    #[serde(rename = "Fuel Type")]
    pub fuel_type: Option<String>,

    #[serde(rename = "Color")]
    pub color: Option<String>,

    #[serde(rename = "Distance Travelled")]
    pub distance_travelled: Option<String>,

    #[serde(rename = "Make Year")]
    pub make_year: Option<String>,

    #[serde(rename = "Transmission Type")]
    pub transmission_type: Option<String>,
}

impl CustomerRequirements {
    /// Field labels paired with the matched values, in report order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("Car Type", self.car_type.as_deref()),
            ("Fuel Type", self.fuel_type.as_deref()),
            ("Color", self.color.as_deref()),
            ("Distance Travelled", self.distance_travelled.as_deref()),
            ("Make Year", self.make_year.as_deref()),
            ("Transmission Type", self.transmission_type.as_deref()),
        ]
    }

    /// True when no regex produced a match.
    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, v)| v.is_none())
    }
}

/// Company policies surfaced during the conversation.
///
/// Booleans are monotonic within one extraction: a keyword match can flip
/// a field to true but nothing ever flips one back to false, so the
/// pre-seeded `true` defaults always stand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPolicies {
    #[serde(rename = "Free RC Transfer")]
    pub free_rc_transfer: bool,

    #[serde(rename = "5-Day Money Back Guarantee")]
    pub money_back_guarantee: bool,

    #[serde(rename = "Free RSA for One Year")]
    pub free_rsa: bool,

    #[serde(rename = "Return Policy")]
    pub return_policy: bool,
}

impl Default for CompanyPolicies {
    fn default() -> Self {
        Self {
            free_rc_transfer: false,
            money_back_guarantee: true,
            free_rsa: false,
            return_policy: true,
        }
    }
}

impl CompanyPolicies {
    /// Mark a policy as discussed. True-only by design.
    pub fn mark(&mut self, key: PolicyKey) {
        match key {
            PolicyKey::FreeRcTransfer => self.free_rc_transfer = true,
            PolicyKey::MoneyBackGuarantee => self.money_back_guarantee = true,
            PolicyKey::FreeRsa => self.free_rsa = true,
            PolicyKey::ReturnPolicy => self.return_policy = true,
        }
    }

    /// Field labels paired with their flags, in report order.
    pub fn entries(&self) -> [(&'static str, bool); 4] {
        [
            ("Free RC Transfer", self.free_rc_transfer),
            ("5-Day Money Back Guarantee", self.money_back_guarantee),
            ("Free RSA for One Year", self.free_rsa),
            ("Return Policy", self.return_policy),
        ]
    }
}

/// Objections the customer raised.
///
/// Same monotonic true-only update rule as [`CompanyPolicies`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerObjections {
    #[serde(rename = "Refurbishment Quality")]
    pub refurbishment_quality: bool,

    #[serde(rename = "Car Issues")]
    pub car_issues: bool,

    #[serde(rename = "Price Issues")]
    pub price_issues: bool,

    #[serde(rename = "Customer Experience Issues")]
    pub customer_experience: bool,
}

impl Default for CustomerObjections {
    fn default() -> Self {
        Self {
            refurbishment_quality: false,
            car_issues: true,
            price_issues: true,
            customer_experience: false,
        }
    }
}

impl CustomerObjections {
    /// Mark an objection as raised. True-only by design.
    pub fn mark(&mut self, key: ObjectionKey) {
        match key {
            ObjectionKey::RefurbishmentQuality => self.refurbishment_quality = true,
            ObjectionKey::CarIssues => self.car_issues = true,
            ObjectionKey::PriceIssues => self.price_issues = true,
            ObjectionKey::CustomerExperience => self.customer_experience = true,
        }
    }

    /// Field labels paired with their flags, in report order.
    pub fn entries(&self) -> [(&'static str, bool); 4] {
        [
            ("Refurbishment Quality", self.refurbishment_quality),
            ("Car Issues", self.car_issues),
            ("Price Issues", self.price_issues),
            ("Customer Experience Issues", self.customer_experience),
        ]
    }
}

// ============================================================================
// Fixed Key Sets
// ============================================================================

/// The closed set of policy keys. No dynamic keys exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKey {
    FreeRcTransfer,
    MoneyBackGuarantee,
    FreeRsa,
    ReturnPolicy,
}

impl PolicyKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreeRcTransfer => "Free RC Transfer",
            Self::MoneyBackGuarantee => "5-Day Money Back Guarantee",
            Self::FreeRsa => "Free RSA for One Year",
            Self::ReturnPolicy => "Return Policy",
        }
    }
}

impl std::fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The closed set of objection keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectionKey {
    RefurbishmentQuality,
    CarIssues,
    PriceIssues,
    CustomerExperience,
}

impl ObjectionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RefurbishmentQuality => "Refurbishment Quality",
            Self::CarIssues => "Car Issues",
            Self::PriceIssues => "Price Issues",
            Self::CustomerExperience => "Customer Experience Issues",
        }
    }
}

impl std::fmt::Display for ObjectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults() {
        let report = AttributeReport::default();

        assert!(report.customer_requirements.is_empty());
        assert!(!report.company_policies.free_rc_transfer);
        assert!(report.company_policies.money_back_guarantee);
        assert!(!report.company_policies.free_rsa);
        assert!(report.company_policies.return_policy);
        assert!(!report.customer_objections.refurbishment_quality);
        assert!(report.customer_objections.car_issues);
        assert!(report.customer_objections.price_issues);
        assert!(!report.customer_objections.customer_experience);
    }

    #[test]
    fn test_mark_is_monotonic() {
        let mut policies = CompanyPolicies::default();

        // Marking an already-true field keeps it true
        policies.mark(PolicyKey::MoneyBackGuarantee);
        policies.mark(PolicyKey::MoneyBackGuarantee);
        assert!(policies.money_back_guarantee);

        policies.mark(PolicyKey::FreeRsa);
        assert!(policies.free_rsa);
    }

    #[test]
    fn test_json_key_names() {
        let report = AttributeReport::default();
        let value = serde_json::to_value(&report).unwrap();

        assert!(value["Customer Requirements"].is_object());
        assert!(value["Company Policies Discussed"].is_object());
        assert!(value["Customer Objections"].is_object());
        assert!(value["Customer Requirements"]["Car Type"].is_null());
        assert_eq!(
            value["Company Policies Discussed"]["5-Day Money Back Guarantee"],
            serde_json::json!(true)
        );
        assert_eq!(
            value["Customer Objections"]["Customer Experience Issues"],
            serde_json::json!(false)
        );
    }

    #[test]
    fn test_json_round_trip() {
        let mut report = AttributeReport::default();
        report.customer_requirements.car_type = Some("SUV".to_string());
        report.company_policies.mark(PolicyKey::FreeRcTransfer);
        report.customer_objections.mark(ObjectionKey::CustomerExperience);

        let json = serde_json::to_string(&report).unwrap();
        let parsed: AttributeReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, report);
    }

    #[test]
    fn test_key_display_names() {
        assert_eq!(PolicyKey::FreeRsa.as_str(), "Free RSA for One Year");
        assert_eq!(
            ObjectionKey::CustomerExperience.to_string(),
            "Customer Experience Issues"
        );
    }
}
