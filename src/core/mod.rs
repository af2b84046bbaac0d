pub mod category;
pub mod orchestrator;
pub mod outreach;
pub mod roster;
pub mod selector;

pub use crate::domain::model::{Category, ClassificationResult, Creator, RawCreatorRow};
pub use crate::domain::ports::{Classifier, RosterSource, StageObserver};
pub use crate::utils::error::Result;
