//! Recommendation generator: turns low sub-scores and category gaps into
//! ranked, de-duplicated improvement actions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::components::{tier_weight, BASE_TIER_WEIGHT, SOP_STEPS_SATURATION};
use super::composite::ComponentScores;
use super::inputs::DimensionInputs;
use super::templates::{self, get_template, render_template};
use crate::error::RecommendationError;

/// Sub-scores below this get targeted recommendations.
pub const GOOD_THRESHOLD: u8 = 70;
/// Integration scores below this also get a cross-department workflow.
const WORKFLOW_THRESHOLD: u8 = 35;
/// SOPs averaging fewer steps than this are considered shallow.
const SHALLOW_SOP_STEPS: f64 = 5.0;
/// Most undocumented processes suggested at once.
const MAX_PROCESSES_TO_DOCUMENT: u32 = 3;

/// Implementation effort. Ordering is easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Adding a standalone tool or writing a document.
    Easy,
    /// Connecting tools or changing plans.
    Medium,
    /// Workflow automation spanning departments.
    Complex,
}

/// An actionable improvement suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct AutomationRecommendation {
    /// `{module_id}-{rank}`, stable for identical inputs.
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// 1-10, larger when the related sub-score is further below target.
    pub impact_score: u8,
    pub time_to_implement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_required: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<String>,
    pub implemented: bool,
    pub in_progress: bool,
}

/// Partial update to a recommendation's progress flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct RecommendationUpdate {
    #[serde(default)]
    pub implemented: Option<bool>,
    #[serde(default)]
    pub in_progress: Option<bool>,
}

impl AutomationRecommendation {
    /// Apply a progress update. `implemented` and `in_progress` never end up
    /// both `true`.
    pub fn apply_update(&mut self, update: RecommendationUpdate) -> Result<(), RecommendationError> {
        if update.implemented == Some(true) && update.in_progress == Some(true) {
            return Err(RecommendationError::ConflictingUpdate {
                id: self.id.clone(),
            });
        }

        if let Some(implemented) = update.implemented {
            self.implemented = implemented;
            if implemented {
                self.in_progress = false;
            }
        }
        if let Some(in_progress) = update.in_progress {
            self.in_progress = in_progress;
            if in_progress {
                self.implemented = false;
            }
        }
        Ok(())
    }
}

/// Map how far a sub-score sits below target onto 1-10.
pub fn impact_for_score(score: u8) -> u8 {
    let gap = f64::from(GOOD_THRESHOLD.saturating_sub(score));
    let impact = 1.0 + (9.0 * gap / f64::from(GOOD_THRESHOLD)).round();
    impact.clamp(1.0, 10.0) as u8
}

/// Sort by impact descending, then difficulty ascending. Stable, so equal
/// entries keep their generation order.
pub fn sort_by_priority(recommendations: &mut [AutomationRecommendation]) {
    recommendations.sort_by(|a, b| {
        b.impact_score
            .cmp(&a.impact_score)
            .then(a.difficulty.cmp(&b.difficulty))
    });
}

/// Collects rendered candidates in generation order.
struct Candidates<'a> {
    module_id: &'a str,
    items: Vec<AutomationRecommendation>,
}

impl<'a> Candidates<'a> {
    fn new(module_id: &'a str) -> Self {
        Self {
            module_id,
            items: Vec::new(),
        }
    }

    fn push(&mut self, key: &str, impact: u8, vars: HashMap<&str, String>) {
        let Some(template) = get_template(key) else {
            tracing::warn!(key, "Missing recommendation template");
            return;
        };
        let tools_required = (!template.tools_required.is_empty())
            .then(|| template.tools_required.iter().map(|t| t.to_string()).collect());

        self.items.push(AutomationRecommendation {
            id: String::new(),
            module_id: self.module_id.to_string(),
            title: render_template(template.title, &vars),
            description: render_template(template.description, &vars),
            difficulty: template.difficulty,
            impact_score: impact.clamp(1, 10),
            time_to_implement: template.time_to_implement.to_string(),
            tools_required,
            cost_estimate: template.cost_estimate.map(str::to_string),
            implemented: false,
            in_progress: false,
        });
    }

    /// Drop repeated titles, rank, and assign ids.
    fn finish(self) -> Vec<AutomationRecommendation> {
        let mut seen = HashSet::new();
        let mut items: Vec<_> = self
            .items
            .into_iter()
            .filter(|r| seen.insert((r.module_id.clone(), r.title.clone())))
            .collect();

        sort_by_priority(&mut items);
        for (rank, item) in items.iter_mut().enumerate() {
            item.id = format!("{}-{}", self.module_id, rank + 1);
        }
        items
    }
}

/// Generate ranked recommendations for one scope.
///
/// Dimensions that are absent (no categories, too few tools) are skipped
/// rather than producing entries with meaningless numbers.
pub fn generate_recommendations(
    module_id: &str,
    scores: &ComponentScores,
    inputs: &DimensionInputs,
) -> Vec<AutomationRecommendation> {
    let mut out = Candidates::new(module_id);

    coverage_recommendations(&mut out, scores, inputs);
    category_recommendations(&mut out, scores, inputs);
    integration_recommendations(&mut out, scores, inputs);
    sophistication_recommendations(&mut out, scores, inputs);
    documentation_recommendations(&mut out, scores, inputs);

    out.finish()
}

fn coverage_recommendations(out: &mut Candidates, scores: &ComponentScores, inputs: &DimensionInputs) {
    let coverage = &inputs.tool_coverage;
    if coverage.total_categories == 0 || scores.tools_coverage >= GOOD_THRESHOLD {
        return;
    }
    let impact = impact_for_score(scores.tools_coverage);
    let uncovered = coverage
        .total_categories
        .saturating_sub(coverage.categories_with_tools);

    if uncovered > 0 {
        // Per-category data produces one entry per gap instead.
        if inputs.category_tool_counts.is_empty() {
            out.push(
                templates::COVERAGE_EXPAND,
                impact,
                HashMap::from([
                    ("uncovered", uncovered.to_string()),
                    ("total_categories", coverage.total_categories.to_string()),
                ]),
            );
        }
    } else {
        out.push(
            templates::COVERAGE_DEEPEN,
            impact,
            HashMap::from([
                ("total_tools", coverage.total_tools.to_string()),
                ("total_categories", coverage.total_categories.to_string()),
            ]),
        );
    }
}

fn category_recommendations(out: &mut Candidates, scores: &ComponentScores, inputs: &DimensionInputs) {
    if inputs.tool_coverage.total_categories == 0 {
        return;
    }
    let base = impact_for_score(scores.tools_coverage);

    for gap in &inputs.category_tool_counts {
        let (key, impact) = match gap.tool_count {
            0 => (templates::CATEGORY_EMPTY, base.saturating_add(1)),
            1 => (templates::CATEGORY_MINIMAL, base.saturating_sub(1)),
            _ => continue,
        };
        out.push(key, impact, HashMap::from([("category", gap.category.clone())]));
    }
}

fn integration_recommendations(
    out: &mut Candidates,
    scores: &ComponentScores,
    inputs: &DimensionInputs,
) {
    let integration = &inputs.tool_integration;
    if integration.total_tools < 2 || scores.tools_integration >= GOOD_THRESHOLD {
        return;
    }
    let impact = impact_for_score(scores.tools_integration);

    out.push(
        templates::INTEGRATION_CONNECT,
        impact,
        HashMap::from([
            ("integrated_pairs", integration.integrated_pairs.to_string()),
            ("total_tools", integration.total_tools.to_string()),
        ]),
    );

    if scores.tools_integration < WORKFLOW_THRESHOLD {
        let density = (integration.integration_density() * 100.0).min(100.0);
        out.push(
            templates::INTEGRATION_WORKFLOW,
            impact,
            HashMap::from([("density", density.to_string())]),
        );
    }
}

fn sophistication_recommendations(
    out: &mut Candidates,
    scores: &ComponentScores,
    inputs: &DimensionInputs,
) {
    let sophistication = &inputs.automation_sophistication;
    if sophistication.total_tools == 0 || scores.automation_sophistication >= GOOD_THRESHOLD {
        return;
    }
    let basic: u32 = sophistication
        .tools_by_tier
        .iter()
        .filter(|(tier, _)| tier_weight(tier) <= BASE_TIER_WEIGHT)
        .map(|(_, count)| *count)
        .sum();
    let basic_share =
        (f64::from(basic) / f64::from(sophistication.total_tools) * 100.0).min(100.0);

    out.push(
        templates::SOPHISTICATION_UPGRADE,
        impact_for_score(scores.automation_sophistication),
        HashMap::from([("basic_share", basic_share.to_string())]),
    );
}

fn documentation_recommendations(
    out: &mut Candidates,
    scores: &ComponentScores,
    inputs: &DimensionInputs,
) {
    let docs = &inputs.process_documentation;
    if docs.total_categories == 0 || scores.process_documentation >= GOOD_THRESHOLD {
        return;
    }
    let impact = impact_for_score(scores.process_documentation);

    if docs.sop_count < docs.total_categories {
        let count = (docs.total_categories - docs.sop_count).min(MAX_PROCESSES_TO_DOCUMENT);
        out.push(
            templates::DOCUMENTATION_COVER,
            impact,
            HashMap::from([
                ("count", count.to_string()),
                ("sop_count", docs.sop_count.to_string()),
                ("total_categories", docs.total_categories.to_string()),
            ]),
        );
    }

    let steps = docs.average_sop_steps;
    if docs.sop_count > 0 && steps.is_finite() && steps < SHALLOW_SOP_STEPS {
        out.push(
            templates::DOCUMENTATION_DEEPEN,
            impact,
            HashMap::from([
                ("average_steps", steps.max(0.0).to_string()),
                ("target_steps", SOP_STEPS_SATURATION.to_string()),
            ]),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
