//! Chart adapter
//!
//! Turns one attribute map into pie-chart data: one slice of equal
//! weight per key whose value is true (or non-null); false and null
//! keys are excluded entirely. Rendering itself happens elsewhere,
//! this is purely the data contract.

use serde::{Deserialize, Serialize};

use sca_core::{CompanyPolicies, CustomerObjections, CustomerRequirements};

/// One slice of a pie chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: u32,
}

/// Pie chart data for one attribute map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<ChartSlice>,
}

impl PieChart {
    /// Build a chart from labelled flags; false entries contribute nothing
    pub fn from_flags<'a, I>(title: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let slices = entries
            .into_iter()
            .filter(|(_, included)| *included)
            .map(|(label, _)| ChartSlice {
                label: label.to_string(),
                value: 1,
            })
            .collect();

        Self {
            title: title.into(),
            slices,
        }
    }

    /// Chart of the policies discussed
    pub fn policies(policies: &CompanyPolicies) -> Self {
        Self::from_flags("Company Policies Discussed", policies.entries())
    }

    /// Chart of the objections raised
    pub fn objections(objections: &CustomerObjections) -> Self {
        Self::from_flags("Customer Objections", objections.entries())
    }

    /// Chart of the requirements that matched
    pub fn requirements(requirements: &CustomerRequirements) -> Self {
        Self::from_flags(
            "Customer Requirements",
            requirements
                .entries()
                .into_iter()
                .map(|(label, value)| (label, value.is_some())),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sca_core::PolicyKey;

    #[test]
    fn test_default_policies_chart() {
        let chart = PieChart::policies(&CompanyPolicies::default());

        // Only the two pre-seeded true policies appear
        let labels: Vec<&str> = chart.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["5-Day Money Back Guarantee", "Return Policy"]);
        assert!(chart.slices.iter().all(|s| s.value == 1));
    }

    #[test]
    fn test_marked_policy_adds_slice() {
        let mut policies = CompanyPolicies::default();
        policies.mark(PolicyKey::FreeRcTransfer);

        let chart = PieChart::policies(&policies);
        assert_eq!(chart.slices.len(), 3);
        assert_eq!(chart.slices[0].label, "Free RC Transfer");
    }

    #[test]
    fn test_empty_requirements_chart() {
        let chart = PieChart::requirements(&CustomerRequirements::default());
        assert!(chart.is_empty());
        assert_eq!(chart.title, "Customer Requirements");
    }

    #[test]
    fn test_matched_requirement_included() {
        let requirements = CustomerRequirements {
            color: Some("blue".to_string()),
            ..Default::default()
        };

        let chart = PieChart::requirements(&requirements);
        assert_eq!(chart.slices.len(), 1);
        assert_eq!(chart.slices[0].label, "Color");
    }

    #[test]
    fn test_objections_chart_defaults() {
        let chart = PieChart::objections(&CustomerObjections::default());
        let labels: Vec<&str> = chart.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Car Issues", "Price Issues"]);
    }
}
