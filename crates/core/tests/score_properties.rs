//! Property tests for the automation score engine.

use std::collections::BTreeMap;

use dmphq_core::{
    compute_automation_score, compute_automation_score_details, process_documentation_score,
    tools_integration_score, AutomationSophisticationInput, CategoryToolCount, DimensionInputs,
    ModuleInputs, ProcessDocumentationInput, ToolCoverageInput, ToolIntegrationInput,
};
use proptest::prelude::*;

const TIERS: &[&str] = &["free", "basic", "low-cost", "pro", "enterprise", "custom", "mystery"];

fn arb_inputs() -> impl Strategy<Value = DimensionInputs> {
    (
        1u32..20,
        0u32..60,
        0u32..200,
        0u32..40,
        0.0f64..30.0,
        prop::collection::vec((0usize..TIERS.len(), 0u32..10), 0..5),
    )
        .prop_flat_map(|(categories, tools, pairs, sops, steps, tiers)| {
            (0..=categories).prop_map(move |covered| {
                let mut tools_by_tier = BTreeMap::new();
                for (tier, count) in &tiers {
                    *tools_by_tier.entry(TIERS[*tier].to_string()).or_insert(0) += count;
                }
                DimensionInputs {
                    tool_coverage: ToolCoverageInput {
                        total_tools: tools,
                        total_categories: categories,
                        categories_with_tools: covered,
                    },
                    tool_integration: ToolIntegrationInput {
                        total_tools: tools,
                        integrated_pairs: pairs,
                    },
                    automation_sophistication: AutomationSophisticationInput {
                        tools_by_tier,
                        total_tools: tools,
                    },
                    process_documentation: ProcessDocumentationInput {
                        sop_count: sops,
                        total_categories: categories,
                        average_sop_steps: steps,
                    },
                    category_tool_counts: (0..categories)
                        .map(|i| CategoryToolCount {
                            category: format!("Category {i}"),
                            tool_count: u32::from(i < covered),
                        })
                        .collect(),
                }
            })
        })
}

proptest! {
    #[test]
    fn scores_stay_in_range(inputs in arb_inputs()) {
        let result = compute_automation_score(&inputs);
        prop_assert!(result.score <= 100);
        let c = result.component_scores;
        for s in [c.tools_coverage, c.tools_integration, c.automation_sophistication, c.process_documentation] {
            prop_assert!(s <= 100);
        }
        for rec in &result.recommendations {
            prop_assert!((1..=10).contains(&rec.impact_score));
            prop_assert!(!(rec.implemented && rec.in_progress));
        }
    }

    #[test]
    fn compute_is_deterministic(inputs in arb_inputs()) {
        prop_assert_eq!(compute_automation_score(&inputs), compute_automation_score(&inputs));
    }

    #[test]
    fn recommendations_are_ranked(inputs in arb_inputs()) {
        let recs = compute_automation_score(&inputs).recommendations;
        for pair in recs.windows(2) {
            prop_assert!(
                pair[0].impact_score > pair[1].impact_score
                    || (pair[0].impact_score == pair[1].impact_score
                        && pair[0].difficulty <= pair[1].difficulty)
            );
        }
        let mut titles: Vec<_> = recs.iter().map(|r| r.title.as_str()).collect();
        titles.sort_unstable();
        titles.dedup();
        prop_assert_eq!(titles.len(), recs.len());
    }

    #[test]
    fn more_pairs_never_lower_integration(tools in 0u32..50, pairs in 0u32..100, extra in 0u32..20) {
        let before = tools_integration_score(&ToolIntegrationInput { total_tools: tools, integrated_pairs: pairs });
        let after = tools_integration_score(&ToolIntegrationInput { total_tools: tools, integrated_pairs: pairs + extra });
        prop_assert!(after >= before);
    }

    #[test]
    fn more_sops_never_lower_documentation(
        categories in 1u32..20,
        sops in 0u32..40,
        extra in 0u32..10,
        steps in 0.0f64..20.0,
    ) {
        let score = |sop_count| process_documentation_score(&ProcessDocumentationInput {
            sop_count,
            total_categories: categories,
            average_sop_steps: steps,
        });
        prop_assert!(score(sops + extra) >= score(sops));
    }

    #[test]
    fn details_overall_is_module_mean(scopes in prop::collection::vec(arb_inputs(), 0..6)) {
        let modules: Vec<ModuleInputs> = scopes
            .into_iter()
            .enumerate()
            .map(|(i, dimensions)| ModuleInputs {
                module_id: format!("m{i}"),
                module_name: format!("Module {i}"),
                dimensions,
                ..Default::default()
            })
            .collect();
        let details = compute_automation_score_details(&modules);
        prop_assert_eq!(details.module_scores.len(), modules.len());
        if modules.is_empty() {
            prop_assert_eq!(details.overall_score, 0);
        } else {
            let sum: u32 = details.module_scores.iter().map(|m| u32::from(m.score)).sum();
            let mean = (f64::from(sum) / modules.len() as f64).round() as u8;
            prop_assert_eq!(details.overall_score, mean);
        }
        let module_total: usize = details.module_scores.iter().map(|m| m.recommendations.len()).sum();
        prop_assert_eq!(details.recommendations.len(), module_total);
    }
}

#[test]
fn zero_inputs_floor_at_zero() {
    let inputs = DimensionInputs {
        tool_coverage: ToolCoverageInput {
            total_tools: 0,
            total_categories: 4,
            categories_with_tools: 0,
        },
        process_documentation: ProcessDocumentationInput {
            sop_count: 0,
            total_categories: 4,
            average_sop_steps: 0.0,
        },
        ..Default::default()
    };
    let result = compute_automation_score(&inputs);
    assert_eq!(result.score, 0);
    assert_eq!(result.description, "Needs Improvement");
    assert!(!result.recommendations.is_empty());
}
