#[macro_use]
pub mod xmlmap;

pub mod cerp;
pub mod error;
pub mod models;
pub mod validation;

pub use error::{Error, Result};

use validation::rules::{RuleCm001, RuleDs001, RuleDs002, RuleDs003, RuleEm001, RuleFmt001};
use validation::ValidationEngine;

/// Every repository-object rule, in reporting order.
pub fn standard_validator() -> ValidationEngine {
    ValidationEngine::new()
        .add_rule(RuleCm001)
        .add_rule(RuleDs001)
        .add_rule(RuleDs002)
        .add_rule(RuleDs003)
        .add_rule(RuleFmt001)
        .add_rule(RuleEm001)
}
