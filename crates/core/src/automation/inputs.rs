//! Count inputs consumed by the automation score engine.
//!
//! The engine never looks at raw tools or SOPs. Callers aggregate their
//! storage into these counts (see [`crate::inventory`]) and validate them
//! at the boundary with [`DimensionInputs::validate`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

/// Tool breadth and depth across business categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ToolCoverageInput {
    pub total_tools: u32,
    pub total_categories: u32,
    pub categories_with_tools: u32,
}

/// Tool-to-tool connection counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ToolIntegrationInput {
    pub total_tools: u32,
    pub integrated_pairs: u32,
}

impl ToolIntegrationInput {
    /// Number of distinct unordered tool pairs, `n * (n - 1) / 2`.
    pub fn max_possible_pairs(&self) -> u64 {
        let n = u64::from(self.total_tools);
        n * n.saturating_sub(1) / 2
    }

    /// Fraction of possible pairs that are integrated.
    pub fn integration_density(&self) -> f64 {
        f64::from(self.integrated_pairs) / self.max_possible_pairs().max(1) as f64
    }
}

/// Tool counts keyed by tier name ("free", "low-cost", "enterprise", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct AutomationSophisticationInput {
    #[serde(default)]
    #[ts(type = "Record<string, number>")]
    pub tools_by_tier: BTreeMap<String, u32>,
    pub total_tools: u32,
}

/// SOP coverage and depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocumentationInput {
    pub sop_count: u32,
    pub total_categories: u32,
    pub average_sop_steps: f64,
}

/// Number of adopted tools in one named category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct CategoryToolCount {
    pub category: String,
    pub tool_count: u32,
}

/// Everything the score engine needs for one scope (a tenant or a module).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct DimensionInputs {
    pub tool_coverage: ToolCoverageInput,
    pub tool_integration: ToolIntegrationInput,
    pub automation_sophistication: AutomationSophisticationInput,
    pub process_documentation: ProcessDocumentationInput,
    /// Optional per-category gap data for category recommendations.
    #[serde(default)]
    pub category_tool_counts: Vec<CategoryToolCount>,
}

impl DimensionInputs {
    /// Boundary validation for inputs that arrive from outside the process.
    ///
    /// The engine itself tolerates any values without panicking; this check
    /// rejects combinations that cannot describe a real tenant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let coverage = &self.tool_coverage;
        if coverage.total_categories == 0 || self.process_documentation.total_categories == 0 {
            return Err(ValidationError::NoCategories);
        }
        if coverage.categories_with_tools > coverage.total_categories {
            return Err(ValidationError::CoverageExceedsCategories {
                covered: coverage.categories_with_tools,
                total: coverage.total_categories,
            });
        }
        let steps = self.process_documentation.average_sop_steps;
        if !steps.is_finite() || steps < 0.0 {
            return Err(ValidationError::InvalidStepAverage { value: steps });
        }
        for gap in &self.category_tool_counts {
            if gap.category.trim().is_empty() {
                return Err(ValidationError::EmptyField { field: "category" });
            }
        }
        Ok(())
    }

    /// Sum several scopes into one.
    ///
    /// Counts add up, saturating at `u32::MAX`. Tier maps merge, and the SOP
    /// step average is weighted by each scope's SOP count.
    pub fn aggregate<'a>(scopes: impl IntoIterator<Item = &'a DimensionInputs>) -> Self {
        let mut total = DimensionInputs::default();
        let mut weighted_steps = 0.0;

        for scope in scopes {
            let c = &scope.tool_coverage;
            let cov = &mut total.tool_coverage;
            cov.total_tools = cov.total_tools.saturating_add(c.total_tools);
            cov.total_categories = cov.total_categories.saturating_add(c.total_categories);
            cov.categories_with_tools =
                cov.categories_with_tools.saturating_add(c.categories_with_tools);

            let i = &scope.tool_integration;
            let int = &mut total.tool_integration;
            int.total_tools = int.total_tools.saturating_add(i.total_tools);
            int.integrated_pairs = int.integrated_pairs.saturating_add(i.integrated_pairs);

            let s = &scope.automation_sophistication;
            let soph = &mut total.automation_sophistication;
            soph.total_tools = soph.total_tools.saturating_add(s.total_tools);
            for (tier, count) in &s.tools_by_tier {
                let slot = soph.tools_by_tier.entry(tier.clone()).or_insert(0);
                *slot = slot.saturating_add(*count);
            }

            let d = &scope.process_documentation;
            let docs = &mut total.process_documentation;
            docs.sop_count = docs.sop_count.saturating_add(d.sop_count);
            docs.total_categories = docs.total_categories.saturating_add(d.total_categories);
            if d.average_sop_steps.is_finite() && d.average_sop_steps > 0.0 {
                weighted_steps += d.average_sop_steps * f64::from(d.sop_count);
            }

            total
                .category_tool_counts
                .extend(scope.category_tool_counts.iter().cloned());
        }

        total.process_documentation.average_sop_steps =
            weighted_steps / f64::from(total.process_documentation.sop_count.max(1));
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_inputs() -> DimensionInputs {
        DimensionInputs {
            tool_coverage: ToolCoverageInput {
                total_tools: 4,
                total_categories: 2,
                categories_with_tools: 2,
            },
            tool_integration: ToolIntegrationInput {
                total_tools: 4,
                integrated_pairs: 1,
            },
            automation_sophistication: AutomationSophisticationInput {
                tools_by_tier: BTreeMap::from([("free".to_string(), 4)]),
                total_tools: 4,
            },
            process_documentation: ProcessDocumentationInput {
                sop_count: 2,
                total_categories: 2,
                average_sop_steps: 4.0,
            },
            category_tool_counts: vec![],
        }
    }

    #[test]
    fn test_max_possible_pairs() {
        let input = ToolIntegrationInput {
            total_tools: 10,
            integrated_pairs: 0,
        };
        assert_eq!(input.max_possible_pairs(), 45);

        let single = ToolIntegrationInput {
            total_tools: 1,
            integrated_pairs: 0,
        };
        assert_eq!(single.max_possible_pairs(), 0);
    }

    #[test]
    fn test_integration_density_zero_tools() {
        let input = ToolIntegrationInput::default();
        assert_eq!(input.integration_density(), 0.0);
    }

    #[test]
    fn test_validate_accepts_consistent_inputs() {
        assert_eq!(valid_inputs().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_categories() {
        let mut inputs = valid_inputs();
        inputs.tool_coverage.total_categories = 0;
        inputs.tool_coverage.categories_with_tools = 0;
        assert_eq!(inputs.validate(), Err(ValidationError::NoCategories));
    }

    #[test]
    fn test_validate_rejects_excess_coverage() {
        let mut inputs = valid_inputs();
        inputs.tool_coverage.categories_with_tools = 3;
        assert!(matches!(
            inputs.validate(),
            Err(ValidationError::CoverageExceedsCategories { covered: 3, total: 2 })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_steps() {
        let mut inputs = valid_inputs();
        inputs.process_documentation.average_sop_steps = f64::NAN;
        assert!(matches!(
            inputs.validate(),
            Err(ValidationError::InvalidStepAverage { .. })
        ));
    }

    #[test]
    fn test_aggregate_weights_step_average_by_sop_count() {
        let mut a = valid_inputs();
        a.process_documentation.sop_count = 1;
        a.process_documentation.average_sop_steps = 10.0;
        let mut b = valid_inputs();
        b.process_documentation.sop_count = 3;
        b.process_documentation.average_sop_steps = 2.0;

        let total = DimensionInputs::aggregate([&a, &b]);
        assert_eq!(total.process_documentation.sop_count, 4);
        assert!((total.process_documentation.average_sop_steps - 4.0).abs() < 1e-9);
        assert_eq!(total.tool_coverage.total_tools, 8);
        assert_eq!(total.tool_coverage.total_categories, 4);
        assert_eq!(
            total.automation_sophistication.tools_by_tier.get("free"),
            Some(&8)
        );
    }

    #[test]
    fn test_aggregate_saturates_instead_of_overflowing() {
        let mut huge = valid_inputs();
        huge.tool_coverage.total_tools = u32::MAX;
        huge.tool_integration.integrated_pairs = u32::MAX;
        huge.automation_sophistication
            .tools_by_tier
            .insert("free".to_string(), u32::MAX);
        huge.process_documentation.sop_count = u32::MAX;

        let total = DimensionInputs::aggregate([&huge, &valid_inputs()]);
        assert_eq!(total.tool_coverage.total_tools, u32::MAX);
        assert_eq!(total.tool_integration.integrated_pairs, u32::MAX);
        assert_eq!(
            total.automation_sophistication.tools_by_tier.get("free"),
            Some(&u32::MAX)
        );
        assert_eq!(total.process_documentation.sop_count, u32::MAX);
        assert_eq!(total.tool_coverage.total_categories, 4);
    }

    #[test]
    fn test_aggregate_empty() {
        let total = DimensionInputs::aggregate(std::iter::empty());
        assert_eq!(total, DimensionInputs::default());
    }

    #[test]
    fn test_inputs_deserialize_camel_case() {
        let json = r#"{
            "toolCoverage": {"totalTools": 3, "totalCategories": 5, "categoriesWithTools": 2},
            "toolIntegration": {"totalTools": 3, "integratedPairs": 1},
            "automationSophistication": {"toolsByTier": {"free": 3}, "totalTools": 3},
            "processDocumentation": {"sopCount": 1, "totalCategories": 5, "averageSopSteps": 4.5}
        }"#;
        let inputs: DimensionInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.tool_coverage.categories_with_tools, 2);
        assert_eq!(inputs.process_documentation.average_sop_steps, 4.5);
        assert!(inputs.category_tool_counts.is_empty());
    }
}
