pub mod classify;
pub mod controller;
pub mod eval;
pub mod expression;
pub mod popup;
pub mod search;
pub mod state;

pub use crate::domain::model::{FeatureRecord, Legend, SearchOutcome};
pub use crate::domain::ports::{MapConfigProvider, RenderSurface};
pub use crate::utils::error::Result;
