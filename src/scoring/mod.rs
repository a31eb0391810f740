pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::*;
pub use factors::RangeOp;
pub use engine::{classify, score_lead, FactorContribution, ScoreBreakdown, ScoringResult};
pub use validation::validate_scoring;
