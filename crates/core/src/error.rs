// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when raw scoring inputs fail boundary validation.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("totalCategories must be greater than zero")]
    NoCategories,

    #[error("categoriesWithTools ({covered}) exceeds totalCategories ({total})")]
    CoverageExceedsCategories { covered: u32, total: u32 },

    #[error("averageSopSteps must be a finite, non-negative number (got {value})")]
    InvalidStepAverage { value: f64 },

    #[error("{field} is empty")]
    EmptyField { field: &'static str },

    #[error("Unknown tool referenced by integration: {tool}")]
    UnknownTool { tool: String },

    #[error("Integration connects tool {tool} to itself")]
    SelfIntegration { tool: String },

    #[error("Category {category} does not belong to any module")]
    UnknownCategory { category: String },

    #[error("Duplicate {kind}: {name}")]
    Duplicate { kind: &'static str, name: String },
}

/// Errors raised when mutating a generated recommendation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("Recommendation not found: {id}")]
    NotFound { id: String },

    #[error("Recommendation {id} cannot be both implemented and in progress")]
    ConflictingUpdate { id: String },
}

/// Errors raised when loading a module catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error reading catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Catalog {path} defines no modules")]
    Empty { path: PathBuf },

    #[error("Catalog {path} defines module {module_id} more than once")]
    DuplicateModule { path: PathBuf, module_id: String },

    #[error("Catalog {path}: module {module_id} has no categories")]
    NoCategories { path: PathBuf, module_id: String },

    #[error("Catalog {path}: category {category} is listed more than once (in module {module_id})")]
    DuplicateCategory {
        path: PathBuf,
        category: String,
        module_id: String,
    },
}

impl RecommendationError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}
