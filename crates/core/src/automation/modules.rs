//! Per-module breakdown ("Automation Score 2.0").
//!
//! Every business module is scored independently with the same calculators,
//! aggregator and recommendation generator as the tenant summary. The
//! result carries two composites that are derived independently:
//! - `overall_score`: unweighted mean of the module scores
//! - the four dimension scores: computed from the summed module inputs

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::composite::{describe_score, ComponentScores};
use super::inputs::DimensionInputs;
use super::recommendations::{
    generate_recommendations, sort_by_priority, AutomationRecommendation, RecommendationUpdate,
};
use crate::error::RecommendationError;

/// State of a tool-to-tool connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    Active,
    Inactive,
    Partial,
}

/// Direction data travels across an integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
pub enum DataFlow {
    #[serde(rename = "one-way")]
    OneWay,
    #[serde(rename = "bi-directional")]
    BiDirectional,
}

/// One edge of the display-only integration map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct IntegrationEdge {
    pub source_tool: String,
    pub target_tool: String,
    pub status: IntegrationStatus,
    pub data_flow: DataFlow,
}

impl IntegrationEdge {
    /// Direction-free identity of the connected pair. Tool names are
    /// trimmed and lowercased.
    pub fn pair_key(&self) -> (String, String) {
        let a = self.source_tool.trim().to_ascii_lowercase();
        let b = self.target_tool.trim().to_ascii_lowercase();
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Scoped inputs for one business module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ModuleInputs {
    pub module_id: String,
    pub module_name: String,
    #[serde(default)]
    pub color: String,
    pub dimensions: DimensionInputs,
    #[serde(default)]
    pub automated_process_count: u32,
    #[serde(default)]
    pub manual_process_count: u32,
    #[serde(default)]
    pub integrations: Vec<IntegrationEdge>,
}

/// Score and recommendations for one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ModuleAutomationScore {
    pub module_id: String,
    pub module_name: String,
    pub score: u8,
    /// Presentation hint for the frontend.
    pub color: String,
    pub automated_process_count: u32,
    pub manual_process_count: u32,
    pub total_processes: u32,
    pub component_scores: ComponentScores,
    pub recommendations: Vec<AutomationRecommendation>,
}

/// Full detailed breakdown across modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct AutomationScoreDetails {
    pub overall_score: u8,
    pub description: String,
    pub module_scores: Vec<ModuleAutomationScore>,
    pub tools_coverage_score: u8,
    pub tools_integration_score: u8,
    pub automation_sophistication_score: u8,
    pub process_documentation_score: u8,
    pub integration_map: Vec<IntegrationEdge>,
    /// Every module recommendation, ranked across modules.
    pub recommendations: Vec<AutomationRecommendation>,
}

/// Score a single module.
pub fn build_module_score(inputs: &ModuleInputs) -> ModuleAutomationScore {
    let component_scores = ComponentScores::from_inputs(&inputs.dimensions);
    let recommendations =
        generate_recommendations(&inputs.module_id, &component_scores, &inputs.dimensions);

    ModuleAutomationScore {
        module_id: inputs.module_id.clone(),
        module_name: inputs.module_name.clone(),
        score: component_scores.composite(),
        color: inputs.color.clone(),
        automated_process_count: inputs.automated_process_count,
        manual_process_count: inputs.manual_process_count,
        total_processes: inputs
            .automated_process_count
            .saturating_add(inputs.manual_process_count),
        component_scores,
        recommendations,
    }
}

/// Concatenate module edges, keeping the first edge for each connected
/// pair regardless of direction or name case.
pub fn build_integration_map<'a>(
    modules: impl IntoIterator<Item = &'a ModuleInputs>,
) -> Vec<IntegrationEdge> {
    let mut seen = HashSet::new();
    modules
        .into_iter()
        .flat_map(|m| m.integrations.iter())
        .filter(|edge| seen.insert(edge.pair_key()))
        .cloned()
        .collect()
}

/// Unweighted mean of module scores, 0 when there are none.
fn mean_module_score(modules: &[ModuleAutomationScore]) -> u8 {
    if modules.is_empty() {
        return 0;
    }
    let total: u32 = modules.iter().map(|m| u32::from(m.score)).sum();
    (f64::from(total) / modules.len() as f64).round().clamp(0.0, 100.0) as u8
}

/// Compute the detailed breakdown for a set of modules.
pub fn compute_automation_score_details(modules: &[ModuleInputs]) -> AutomationScoreDetails {
    let module_scores: Vec<ModuleAutomationScore> =
        modules.iter().map(build_module_score).collect();

    let global = DimensionInputs::aggregate(modules.iter().map(|m| &m.dimensions));
    let dimension_scores = ComponentScores::from_inputs(&global);

    let mut recommendations: Vec<AutomationRecommendation> = module_scores
        .iter()
        .flat_map(|m| m.recommendations.iter().cloned())
        .collect();
    sort_by_priority(&mut recommendations);

    let overall_score = mean_module_score(&module_scores);

    tracing::debug!(
        overall_score,
        modules = module_scores.len(),
        recommendations = recommendations.len(),
        "Computed automation score details"
    );

    AutomationScoreDetails {
        overall_score,
        description: describe_score(overall_score).to_string(),
        tools_coverage_score: dimension_scores.tools_coverage,
        tools_integration_score: dimension_scores.tools_integration,
        automation_sophistication_score: dimension_scores.automation_sophistication,
        process_documentation_score: dimension_scores.process_documentation,
        integration_map: build_integration_map(modules),
        module_scores,
        recommendations,
    }
}

impl AutomationScoreDetails {
    /// Update a recommendation everywhere it appears (flat list and module
    /// list) and return the updated record.
    pub fn update_recommendation(
        &mut self,
        id: &str,
        update: RecommendationUpdate,
    ) -> Result<AutomationRecommendation, RecommendationError> {
        if update.implemented == Some(true) && update.in_progress == Some(true) {
            return Err(RecommendationError::ConflictingUpdate { id: id.to_string() });
        }

        let mut updated = None;
        let module_copies = self
            .module_scores
            .iter_mut()
            .flat_map(|m| m.recommendations.iter_mut());
        for rec in self.recommendations.iter_mut().chain(module_copies) {
            if rec.id == id {
                rec.apply_update(update)?;
                updated = Some(rec.clone());
            }
        }

        updated.ok_or_else(|| RecommendationError::not_found(id))
    }

    /// Find a recommendation by id in the flat list.
    pub fn recommendation(&self, id: &str) -> Option<&AutomationRecommendation> {
        self.recommendations.iter().find(|r| r.id == id)
    }

    /// Re-apply progress flags from an earlier result, matching on
    /// `(module_id, title)` since ids are rank-based and may shift.
    pub fn carry_over_progress(&mut self, previous: &AutomationScoreDetails) {
        let flags: HashMap<(&str, &str), (bool, bool)> = previous
            .recommendations
            .iter()
            .filter(|r| r.implemented || r.in_progress)
            .map(|r| ((r.module_id.as_str(), r.title.as_str()), (r.implemented, r.in_progress)))
            .collect();
        if flags.is_empty() {
            return;
        }

        let module_copies = self
            .module_scores
            .iter_mut()
            .flat_map(|m| m.recommendations.iter_mut());
        for rec in self.recommendations.iter_mut().chain(module_copies) {
            if let Some(&(implemented, in_progress)) =
                flags.get(&(rec.module_id.as_str(), rec.title.as_str()))
            {
                rec.implemented = implemented;
                rec.in_progress = in_progress && !implemented;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
