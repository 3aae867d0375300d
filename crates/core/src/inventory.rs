// crates/core/src/inventory.rs
//! Raw tenant records (tools, SOPs, integrations) and their reduction to
//! score engine inputs.
//!
//! Only `active` integrations count towards `integrated_pairs`, and each
//! connected pair counts once whatever its direction or name case. A module
//! owns an integration when it owns the integration's source tool, so
//! module pair counts add up to the tenant total.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::automation::inputs::{
    AutomationSophisticationInput, CategoryToolCount, DimensionInputs, ProcessDocumentationInput,
    ToolCoverageInput, ToolIntegrationInput,
};
use crate::automation::modules::{IntegrationEdge, IntegrationStatus, ModuleInputs};
use crate::catalog::ModuleCatalog;
use crate::error::ValidationError;

/// An adopted tool or subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    pub category: String,
    /// Free-form tier name, e.g. "free", "low-cost", "enterprise".
    pub tier: String,
}

/// A documented standard operating procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct Sop {
    pub title: String,
    pub category: String,
    pub steps: u32,
    /// Whether the procedure runs through tooling rather than by hand.
    #[serde(default)]
    pub automated: bool,
}

/// Everything recorded for one tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct TenantInventory {
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub sops: Vec<Sop>,
    #[serde(default)]
    pub integrations: Vec<IntegrationEdge>,
}

fn in_scope(category: &str, scope: &[String]) -> bool {
    let category = category.trim();
    scope.iter().any(|c| c.eq_ignore_ascii_case(category))
}

impl Tool {
    pub fn validate(&self, catalog: &ModuleCatalog) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if self.tier.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "tier" });
        }
        validate_category(&self.category, catalog)
    }
}

impl Sop {
    pub fn validate(&self, catalog: &ModuleCatalog) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "title" });
        }
        validate_category(&self.category, catalog)
    }
}

fn validate_category(category: &str, catalog: &ModuleCatalog) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "category" });
    }
    if catalog.module_for_category(category).is_none() {
        return Err(ValidationError::UnknownCategory {
            category: category.to_string(),
        });
    }
    Ok(())
}

impl TenantInventory {
    /// Check every record against the catalog and against each other.
    pub fn validate(&self, catalog: &ModuleCatalog) -> Result<(), ValidationError> {
        let mut names = HashSet::new();
        for tool in &self.tools {
            tool.validate(catalog)?;
            if !names.insert(tool.name.trim().to_ascii_lowercase()) {
                return Err(ValidationError::Duplicate {
                    kind: "tool",
                    name: tool.name.clone(),
                });
            }
        }
        for sop in &self.sops {
            sop.validate(catalog)?;
        }
        let mut pairs = HashSet::new();
        for edge in &self.integrations {
            self.validate_integration_with(edge, &names)?;
            if !pairs.insert(edge.pair_key()) {
                return Err(ValidationError::Duplicate {
                    kind: "integration",
                    name: format!("{} -> {}", edge.source_tool, edge.target_tool),
                });
            }
        }
        Ok(())
    }

    /// Check a single integration against the tools already recorded.
    pub fn validate_integration(&self, edge: &IntegrationEdge) -> Result<(), ValidationError> {
        let names: HashSet<String> = self
            .tools
            .iter()
            .map(|t| t.name.trim().to_ascii_lowercase())
            .collect();
        self.validate_integration_with(edge, &names)?;
        let key = edge.pair_key();
        let exists = self.integrations.iter().any(|e| e.pair_key() == key);
        if exists {
            return Err(ValidationError::Duplicate {
                kind: "integration",
                name: format!("{} -> {}", edge.source_tool, edge.target_tool),
            });
        }
        Ok(())
    }

    fn validate_integration_with(
        &self,
        edge: &IntegrationEdge,
        names: &HashSet<String>,
    ) -> Result<(), ValidationError> {
        for tool in [&edge.source_tool, &edge.target_tool] {
            if !names.contains(&tool.trim().to_ascii_lowercase()) {
                return Err(ValidationError::UnknownTool { tool: tool.clone() });
            }
        }
        if edge.source_tool.trim().eq_ignore_ascii_case(edge.target_tool.trim()) {
            return Err(ValidationError::SelfIntegration {
                tool: edge.source_tool.clone(),
            });
        }
        Ok(())
    }

    /// Check that a new tool would not collide with an existing one.
    pub fn validate_new_tool(&self, tool: &Tool, catalog: &ModuleCatalog) -> Result<(), ValidationError> {
        tool.validate(catalog)?;
        let taken = self
            .tools
            .iter()
            .any(|t| t.name.trim().eq_ignore_ascii_case(tool.name.trim()));
        if taken {
            return Err(ValidationError::Duplicate {
                kind: "tool",
                name: tool.name.clone(),
            });
        }
        Ok(())
    }

    /// Reduce the records that fall into `categories` to engine inputs.
    pub fn dimension_inputs(&self, categories: &[String]) -> DimensionInputs {
        let tools: Vec<&Tool> = self
            .tools
            .iter()
            .filter(|t| in_scope(&t.category, categories))
            .collect();
        let total_tools = tools.len() as u32;

        let category_tool_counts: Vec<CategoryToolCount> = categories
            .iter()
            .map(|category| CategoryToolCount {
                category: category.clone(),
                tool_count: tools
                    .iter()
                    .filter(|t| t.category.trim().eq_ignore_ascii_case(category))
                    .count() as u32,
            })
            .collect();
        let categories_with_tools =
            category_tool_counts.iter().filter(|c| c.tool_count > 0).count() as u32;

        let mut tools_by_tier: BTreeMap<String, u32> = BTreeMap::new();
        for tool in &tools {
            *tools_by_tier
                .entry(tool.tier.trim().to_ascii_lowercase())
                .or_insert(0) += 1;
        }

        let owned: HashSet<String> = tools
            .iter()
            .map(|t| t.name.trim().to_ascii_lowercase())
            .collect();
        let integrated_pairs = self
            .integrations
            .iter()
            .filter(|e| e.status == IntegrationStatus::Active)
            .filter(|e| owned.contains(&e.source_tool.trim().to_ascii_lowercase()))
            .map(IntegrationEdge::pair_key)
            .collect::<HashSet<_>>()
            .len() as u32;

        let sops: Vec<&Sop> = self
            .sops
            .iter()
            .filter(|s| in_scope(&s.category, categories))
            .collect();
        let sop_count = sops.len() as u32;
        let total_steps: u64 = sops.iter().map(|s| u64::from(s.steps)).sum();
        let average_sop_steps = total_steps as f64 / f64::from(sop_count.max(1));

        let total_categories = categories.len() as u32;
        DimensionInputs {
            tool_coverage: ToolCoverageInput {
                total_tools,
                total_categories,
                categories_with_tools,
            },
            tool_integration: ToolIntegrationInput {
                total_tools,
                integrated_pairs,
            },
            automation_sophistication: AutomationSophisticationInput {
                tools_by_tier,
                total_tools,
            },
            process_documentation: ProcessDocumentationInput {
                sop_count,
                total_categories,
                average_sop_steps,
            },
            category_tool_counts,
        }
    }

    /// Tenant-wide inputs over every catalog category.
    pub fn tenant_dimensions(&self, catalog: &ModuleCatalog) -> DimensionInputs {
        self.dimension_inputs(&catalog.all_categories())
    }

    /// One [`ModuleInputs`] per catalog module, in catalog order.
    pub fn module_inputs(&self, catalog: &ModuleCatalog) -> Vec<ModuleInputs> {
        let owner: HashMap<String, &str> = self
            .tools
            .iter()
            .filter_map(|t| {
                catalog
                    .module_for_category(&t.category)
                    .map(|m| (t.name.trim().to_ascii_lowercase(), m.id.as_str()))
            })
            .collect();

        catalog
            .modules
            .iter()
            .map(|module| {
                let sops = self
                    .sops
                    .iter()
                    .filter(|s| in_scope(&s.category, &module.categories));
                let (automated, manual) = sops.fold((0u32, 0u32), |(a, m), sop| {
                    if sop.automated {
                        (a + 1, m)
                    } else {
                        (a, m + 1)
                    }
                });

                let integrations = self
                    .integrations
                    .iter()
                    .filter(|e| {
                        owner.get(&e.source_tool.trim().to_ascii_lowercase())
                            == Some(&module.id.as_str())
                    })
                    .cloned()
                    .collect();

                ModuleInputs {
                    module_id: module.id.clone(),
                    module_name: module.name.clone(),
                    color: module.color.clone(),
                    dimensions: self.dimension_inputs(&module.categories),
                    automated_process_count: automated,
                    manual_process_count: manual,
                    integrations,
                }
            })
            .collect()
    }
}
