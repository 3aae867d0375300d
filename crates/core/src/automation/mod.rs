//! Automation score engine: component calculators, weighted composite,
//! recommendation generation and the per-module breakdown.

pub mod components;
pub mod composite;
pub mod inputs;
pub mod modules;
pub mod recommendations;
pub mod templates;

pub use components::*;
pub use composite::*;
pub use inputs::*;
pub use modules::*;
pub use recommendations::*;
pub use templates::{get_template, render_template, RecommendationTemplate};
