pub mod modeling;
pub mod pipeline;
pub mod validator;

pub use modeling::{ModelingOutput, ModelingPrep, ModelingSettings};
pub use pipeline::{prepare_cards, PipelineResult, PrepPipeline};
pub use validator::{CardValidator, ValidationResult, ValidationStats};
