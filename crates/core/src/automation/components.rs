//! The four automation sub-scores.
//!
//! Each calculator maps one input dimension to an integer in [0, 100].
//! Every division is guarded with `max(1, denominator)` and every result
//! is clamped, so extreme or all-zero inputs never produce NaN or
//! out-of-range values.

use super::inputs::{
    AutomationSophisticationInput, ProcessDocumentationInput, ToolCoverageInput,
    ToolIntegrationInput,
};

/// Breadth (categories covered) outweighs depth (tools per category).
const COVERAGE_BREADTH_WEIGHT: f64 = 0.7;
const COVERAGE_DEPTH_WEIGHT: f64 = 0.3;
/// Tools per category that count as full depth.
const TOOLS_PER_CATEGORY_TARGET: f64 = 2.0;

const DOCUMENTATION_COVERAGE_WEIGHT: f64 = 0.6;
const DOCUMENTATION_DEPTH_WEIGHT: f64 = 0.4;
/// Average SOP step count at which depth saturates.
pub const SOP_STEPS_SATURATION: f64 = 10.0;

/// Weight of the lowest tier; also used for tier names we don't recognize.
pub const BASE_TIER_WEIGHT: f64 = 0.3;
const MID_TIER_WEIGHT: f64 = 0.6;
const TOP_TIER_WEIGHT: f64 = 1.0;

/// Convert a 0.0-1.0 fraction to a clamped integer percentage.
fn to_score(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Tools coverage: 70% category breadth, 30% tool depth.
///
/// One tool covering one of five categories scores far below ten tools
/// spread over the same five categories.
pub fn tools_coverage_score(input: &ToolCoverageInput) -> u8 {
    let categories = f64::from(input.total_categories.max(1));
    let covered = f64::from(input.categories_with_tools.min(input.total_categories));

    let breadth = (covered / categories).min(1.0);
    let depth = (f64::from(input.total_tools) / (categories * TOOLS_PER_CATEGORY_TARGET)).min(1.0);

    to_score(breadth * COVERAGE_BREADTH_WEIGHT + depth * COVERAGE_DEPTH_WEIGHT)
}

/// Tools integration: saturates once there is about one integration per tool.
pub fn tools_integration_score(input: &ToolIntegrationInput) -> u8 {
    if input.total_tools == 0 {
        return 0;
    }
    let ratio = f64::from(input.integrated_pairs) / f64::from(input.total_tools.max(1));
    to_score(ratio.min(1.0))
}

/// Weight of a tool tier. Matching ignores case, and `_` or spaces count as `-`.
pub fn tier_weight(tier: &str) -> f64 {
    let normalized = tier.trim().to_ascii_lowercase().replace(['_', ' '], "-");
    match normalized.as_str() {
        "free" | "basic" | "starter" => BASE_TIER_WEIGHT,
        "low-cost" | "intermediate" | "standard" | "pro" => MID_TIER_WEIGHT,
        "enterprise" | "advanced" | "premium" | "custom" => TOP_TIER_WEIGHT,
        _ => BASE_TIER_WEIGHT,
    }
}

/// Automation sophistication: tier-weighted share of adopted tools.
pub fn automation_sophistication_score(input: &AutomationSophisticationInput) -> u8 {
    let weighted: f64 = input
        .tools_by_tier
        .iter()
        .map(|(tier, count)| f64::from(*count) * tier_weight(tier))
        .sum();
    to_score(weighted / f64::from(input.total_tools.max(1)))
}

/// Process documentation: 60% SOP coverage, 40% step depth.
pub fn process_documentation_score(input: &ProcessDocumentationInput) -> u8 {
    let coverage =
        (f64::from(input.sop_count) / f64::from(input.total_categories.max(1))).min(1.0);

    let steps = if input.average_sop_steps.is_finite() {
        input.average_sop_steps.max(0.0)
    } else {
        0.0
    };
    let depth = (steps / SOP_STEPS_SATURATION).min(1.0);

    to_score(coverage * DOCUMENTATION_COVERAGE_WEIGHT + depth * DOCUMENTATION_DEPTH_WEIGHT)
}
