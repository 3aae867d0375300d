// crates/core/src/catalog.rs
//! Business module catalog.
//!
//! The set of modules (and the categories each one owns) is configuration,
//! not code. The built-in default mirrors the reference dashboard; a TOML
//! file can replace it:
//!
//! ```toml
//! [[modules]]
//! id = "finance"
//! name = "Finance"
//! color = "#10b981"
//! categories = ["Accounting", "Payroll", "Invoicing"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CatalogError;

/// One business module and the tool/SOP categories it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ModuleDefinition {
    pub id: String,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub categories: Vec<String>,
}

fn default_color() -> String {
    "#64748b".to_string()
}

/// Ordered list of modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
pub struct ModuleCatalog {
    pub modules: Vec<ModuleDefinition>,
}

fn module(id: &str, name: &str, color: &str, categories: &[&str]) -> ModuleDefinition {
    ModuleDefinition {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
    }
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self {
            modules: vec![
                module("finance", "Finance", "#10b981", &["Accounting", "Payroll", "Invoicing"]),
                module(
                    "operations",
                    "Operations",
                    "#6366f1",
                    &["Inventory", "Project Management", "Logistics"],
                ),
                module(
                    "marketing",
                    "Marketing",
                    "#f59e0b",
                    &["Email Marketing", "Social Media", "Analytics"],
                ),
                module("sales", "Sales", "#3b82f6", &["CRM", "E-commerce", "Proposals"]),
                module(
                    "customer",
                    "Customer",
                    "#ec4899",
                    &["Support", "Communication", "Feedback"],
                ),
            ],
        }
    }
}

impl ModuleCatalog {
    /// Parse a catalog from TOML. `path` is only used in error messages.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, CatalogError> {
        let catalog: ModuleCatalog =
            toml::from_str(content).map_err(|e| CatalogError::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if catalog.modules.is_empty() {
            return Err(CatalogError::Empty {
                path: path.to_path_buf(),
            });
        }
        // Each category belongs to exactly one module, matched ignoring case.
        let mut ids = HashSet::new();
        let mut categories = HashSet::new();
        for m in &catalog.modules {
            if !ids.insert(m.id.as_str()) {
                return Err(CatalogError::DuplicateModule {
                    path: path.to_path_buf(),
                    module_id: m.id.clone(),
                });
            }
            if m.categories.iter().all(|c| c.trim().is_empty()) {
                return Err(CatalogError::NoCategories {
                    path: path.to_path_buf(),
                    module_id: m.id.clone(),
                });
            }
            for category in &m.categories {
                if !categories.insert(category.trim().to_ascii_lowercase()) {
                    return Err(CatalogError::DuplicateCategory {
                        path: path.to_path_buf(),
                        category: category.clone(),
                        module_id: m.id.clone(),
                    });
                }
            }
        }
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let catalog = Self::from_toml_str(&content, path)?;
        tracing::info!(
            path = %path.display(),
            modules = catalog.modules.len(),
            "Loaded module catalog"
        );
        Ok(catalog)
    }

    /// Load `path` if it exists, otherwise the built-in catalog.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => match Self::load(p) {
                Err(CatalogError::NotFound { path }) => {
                    tracing::debug!(path = %path.display(), "No catalog file, using defaults");
                    Ok(Self::default())
                }
                other => other,
            },
            None => Ok(Self::default()),
        }
    }

    pub fn get(&self, module_id: &str) -> Option<&ModuleDefinition> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Module owning a category. Matching ignores ASCII case.
    pub fn module_for_category(&self, category: &str) -> Option<&ModuleDefinition> {
        let category = category.trim();
        self.modules
            .iter()
            .find(|m| m.categories.iter().any(|c| c.eq_ignore_ascii_case(category)))
    }

    /// Every category across all modules, in catalog order.
    pub fn all_categories(&self) -> Vec<String> {
        self.modules
            .iter()
            .flat_map(|m| m.categories.iter().cloned())
            .collect()
    }
}
