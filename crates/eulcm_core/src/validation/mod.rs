use serde::Serialize;

use crate::models::object::DigitalObject;
use crate::models::ContentModel;

pub mod rules;

pub const SEVERITY_ERROR: &str = "Error";
pub const SEVERITY_WARNING: &str = "Warning";

// One finding against one object
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: String,              // e.g. "DS-002"
    pub severity: String,          // "Error", "Warning"
    pub message: String,
    pub target_id: Option<String>, // datastream id or field, when narrower than the object
}

impl ValidationError {
    pub fn is_error(&self) -> bool {
        self.severity == SEVERITY_ERROR
    }
}

// The contract every rule must fulfill
pub trait ValidationRule {
    fn check(&self, object: &DigitalObject, model: &ContentModel) -> Vec<ValidationError>;
    fn rule_id(&self) -> &str;
}

// Registry of rules, run in insertion order
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule<R: ValidationRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.rule_id()).collect()
    }

    pub fn run(&self, object: &DigitalObject, model: &ContentModel) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for rule in &self.rules {
            let mut rule_errors = rule.check(object, model);
            if !rule_errors.is_empty() {
                tracing::debug!(
                    rule = rule.rule_id(),
                    pid = %object.pid,
                    findings = rule_errors.len(),
                    "validation rule reported findings"
                );
            }
            errors.append(&mut rule_errors);
        }
        errors
    }
}
