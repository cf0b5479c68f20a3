pub mod rules;
pub mod summarisation;
pub mod validation;

pub use rules::ManualRuleSet;
pub use summarisation::{SummarisationPlan, SummarisationPlanStore};
pub use validation::{ValidationPlan, ValidationPlanStore};
