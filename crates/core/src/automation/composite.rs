//! Weighted composite of the four sub-scores.
//!
//! The weights are fixed so scores stay comparable across tenants and over
//! time:
//! - Tools coverage (30%)
//! - Tools integration (20%)
//! - Automation sophistication (25%)
//! - Process documentation (25%)

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::components::{
    automation_sophistication_score, process_documentation_score, tools_coverage_score,
    tools_integration_score,
};
use super::inputs::DimensionInputs;
use super::recommendations::{generate_recommendations, AutomationRecommendation};

pub const W_COVERAGE: f64 = 0.30;
pub const W_INTEGRATION: f64 = 0.20;
pub const W_SOPHISTICATION: f64 = 0.25;
pub const W_DOCUMENTATION: f64 = 0.25;

/// Scope id used for recommendations produced by the tenant-wide summary.
pub const OVERALL_SCOPE: &str = "overall";

/// The four sub-scores, each 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    pub tools_coverage: u8,
    pub tools_integration: u8,
    pub automation_sophistication: u8,
    pub process_documentation: u8,
}

impl ComponentScores {
    /// Run all four calculators over one scope.
    pub fn from_inputs(inputs: &DimensionInputs) -> Self {
        Self {
            tools_coverage: tools_coverage_score(&inputs.tool_coverage),
            tools_integration: tools_integration_score(&inputs.tool_integration),
            automation_sophistication: automation_sophistication_score(
                &inputs.automation_sophistication,
            ),
            process_documentation: process_documentation_score(&inputs.process_documentation),
        }
    }

    /// Weighted composite, 0-100.
    pub fn composite(&self) -> u8 {
        let raw = f64::from(self.tools_coverage) * W_COVERAGE
            + f64::from(self.tools_integration) * W_INTEGRATION
            + f64::from(self.automation_sophistication) * W_SOPHISTICATION
            + f64::from(self.process_documentation) * W_DOCUMENTATION;
        raw.round().clamp(0.0, 100.0) as u8
    }
}

/// Qualitative tier of a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            75..=u8::MAX => ScoreTier::Excellent,
            50..=74 => ScoreTier::Good,
            _ => ScoreTier::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent Automation",
            ScoreTier::Good => "Good Progress",
            ScoreTier::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Description label for a score.
pub fn describe_score(score: u8) -> &'static str {
    ScoreTier::from_score(score).label()
}

/// Result of the dashboard summary score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct AutomationScoreResult {
    pub score: u8,
    pub component_scores: ComponentScores,
    pub description: String,
    pub recommendations: Vec<AutomationRecommendation>,
}

/// Compute the dashboard summary score for one tenant.
///
/// Pure: identical inputs always produce identical output, including the
/// order of recommendations.
pub fn compute_automation_score(inputs: &DimensionInputs) -> AutomationScoreResult {
    let component_scores = ComponentScores::from_inputs(inputs);
    let score = component_scores.composite();
    let recommendations = generate_recommendations(OVERALL_SCOPE, &component_scores, inputs);

    tracing::debug!(
        score,
        coverage = component_scores.tools_coverage,
        integration = component_scores.tools_integration,
        sophistication = component_scores.automation_sophistication,
        documentation = component_scores.process_documentation,
        recommendations = recommendations.len(),
        "Computed automation score"
    );

    AutomationScoreResult {
        score,
        component_scores,
        description: describe_score(score).to_string(),
        recommendations,
    }
}
