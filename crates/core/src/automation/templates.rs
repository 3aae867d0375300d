//! Template-based recommendation text.
//!
//! Each recommendation kind has a title, a description template and fixed
//! effort metadata. Titles and descriptions use `{variable}` placeholders
//! that are substituted at render time.

use std::collections::HashMap;

use super::recommendations::Difficulty;

/// A template for one kind of automation recommendation.
pub struct RecommendationTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub time_to_implement: &'static str,
    pub tools_required: &'static [&'static str],
    pub cost_estimate: Option<&'static str>,
}

pub const COVERAGE_EXPAND: &str = "coverage.expand";
pub const COVERAGE_DEEPEN: &str = "coverage.deepen";
pub const CATEGORY_EMPTY: &str = "category.empty";
pub const CATEGORY_MINIMAL: &str = "category.minimal";
pub const INTEGRATION_CONNECT: &str = "integration.connect";
pub const INTEGRATION_WORKFLOW: &str = "integration.workflow";
pub const SOPHISTICATION_UPGRADE: &str = "sophistication.upgrade";
pub const DOCUMENTATION_COVER: &str = "documentation.cover";
pub const DOCUMENTATION_DEEPEN: &str = "documentation.deepen";

/// All recommendation templates, indexed by key.
pub static TEMPLATES: &[RecommendationTemplate] = &[
    // ============================
    // Tools coverage
    // ============================
    RecommendationTemplate {
        key: COVERAGE_EXPAND,
        title: "Expand Tool Coverage",
        description: "{uncovered} of {total_categories} categories have no adopted tools. Add at least one tool to each uncovered category.",
        difficulty: Difficulty::Easy,
        time_to_implement: "1-2 days",
        tools_required: &[],
        cost_estimate: Some("Free - $50/month"),
    },
    RecommendationTemplate {
        key: COVERAGE_DEEPEN,
        title: "Add Depth to Thin Categories",
        description: "{total_tools} tools spread over {total_categories} categories. Aim for about two tools per category so no area depends on manual work.",
        difficulty: Difficulty::Easy,
        time_to_implement: "1-2 days",
        tools_required: &[],
        cost_estimate: Some("Free - $50/month"),
    },
    RecommendationTemplate {
        key: CATEGORY_EMPTY,
        title: "Adopt Tooling for {category}",
        description: "You have no tools in {category}. Start with one core tool to take over routine {category} work.",
        difficulty: Difficulty::Easy,
        time_to_implement: "2-4 hours",
        tools_required: &[],
        cost_estimate: Some("Free - $30/month"),
    },
    RecommendationTemplate {
        key: CATEGORY_MINIMAL,
        title: "Strengthen {category} Tooling",
        description: "{category} relies on a single tool. Add a complementary tool to cover the remaining manual steps.",
        difficulty: Difficulty::Easy,
        time_to_implement: "2-4 hours",
        tools_required: &[],
        cost_estimate: Some("Free - $30/month"),
    },
    // ============================
    // Tools integration
    // ============================
    RecommendationTemplate {
        key: INTEGRATION_CONNECT,
        title: "Connect Your Core Tools",
        description: "{integrated_pairs} integrations connect {total_tools} tools. Link the tools that share data, such as your CRM and email platform, to remove manual transfers.",
        difficulty: Difficulty::Medium,
        time_to_implement: "1-3 days",
        tools_required: &["Zapier", "Make"],
        cost_estimate: Some("$20-100/month"),
    },
    RecommendationTemplate {
        key: INTEGRATION_WORKFLOW,
        title: "Automate a Cross-Department Workflow",
        description: "Only {density:.0}% of possible tool pairs are connected. Build one end-to-end workflow across departments, for example order-to-invoice or lead-to-onboarding.",
        difficulty: Difficulty::Complex,
        time_to_implement: "1-2 weeks",
        tools_required: &["Zapier", "Make", "n8n"],
        cost_estimate: Some("$50-300/month"),
    },
    // ============================
    // Automation sophistication
    // ============================
    RecommendationTemplate {
        key: SOPHISTICATION_UPGRADE,
        title: "Upgrade Key Tools to Advanced Tiers",
        description: "{basic_share:.0}% of your tools run on free or basic tiers. Upgrading the busiest ones unlocks workflows, APIs and bulk actions.",
        difficulty: Difficulty::Medium,
        time_to_implement: "1-2 days",
        tools_required: &[],
        cost_estimate: Some("$50-200/month"),
    },
    // ============================
    // Process documentation
    // ============================
    RecommendationTemplate {
        key: DOCUMENTATION_COVER,
        title: "Document Your Top {count} Undocumented Processes",
        description: "{sop_count} SOPs cover {total_categories} categories. Write SOPs for the {count} processes you repeat most often.",
        difficulty: Difficulty::Easy,
        time_to_implement: "2-4 hours",
        tools_required: &[],
        cost_estimate: None,
    },
    RecommendationTemplate {
        key: DOCUMENTATION_DEEPEN,
        title: "Deepen Existing SOPs",
        description: "Your SOPs average {average_steps:.1} steps. Break them into around {target_steps} concrete steps so they can be handed off or automated.",
        difficulty: Difficulty::Easy,
        time_to_implement: "1-2 hours",
        tools_required: &[],
        cost_estimate: None,
    },
];

/// Look up a template by key.
pub fn get_template(key: &str) -> Option<&'static RecommendationTemplate> {
    TEMPLATES.iter().find(|t| t.key == key)
}

/// Render a template string by substituting `{key}` placeholders with values.
///
/// Handles format specifiers like `{key:.0}` and `{key:.1}`.
pub fn render_template(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let plain = format!("{{{key}}}");
        if result.contains(&plain) {
            result = result.replace(&plain, value);
        }
        for precision in 0..=1 {
            let pattern = format!("{{{key}:.{precision}}}");
            if result.contains(&pattern) {
                let formatted = match value.parse::<f64>() {
                    Ok(f) if precision == 0 => format!("{f:.0}"),
                    Ok(f) => format!("{f:.1}"),
                    Err(_) => value.clone(),
                };
                result = result.replace(&pattern, &formatted);
            }
        }
    }
    result
}
