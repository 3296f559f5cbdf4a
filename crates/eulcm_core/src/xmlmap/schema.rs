use serde::Serialize;

use super::dom::Element;
use super::path::{Namespaces, XPath};
use crate::error::{Error, Result};

pub type SchemaRef = fn() -> &'static Schema;

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Integer,
    /// Maps `true_value` to `true`; anything else (or nothing) is `false`.
    Boolean {
        true_value: &'static str,
        false_value: Option<&'static str>,
    },
    Node(SchemaRef),
    NodeList(SchemaRef),
}

impl FieldKind {
    pub fn label(&self) -> String {
        match self {
            FieldKind::String => "string".to_string(),
            FieldKind::Integer => "integer".to_string(),
            FieldKind::Boolean { true_value, .. } => format!("boolean({})", true_value),
            FieldKind::Node(schema) => format!("node<{}>", schema().name),
            FieldKind::NodeList(schema) => format!("node-list<{}>", schema().name),
        }
    }
}

/// Field name, location and semantic type: one row of a schema.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: &'static str,
    pub xpath: XPath,
    pub kind: FieldKind,
    pub required: bool,
    pub verbose_name: Option<&'static str>,
    pub help_text: Option<&'static str>,
}

impl FieldInfo {
    /// Field paths are static declarations, so a bad one is a programming
    /// error caught the first time the schema is touched.
    pub fn new(name: &'static str, path: &str, namespaces: Namespaces, kind: FieldKind) -> Self {
        let xpath = XPath::parse(path, namespaces)
            .unwrap_or_else(|err| panic!("field '{}' has an invalid path: {}", name, err));
        Self {
            name,
            xpath,
            kind,
            required: false,
            verbose_name: None,
            help_text: None,
        }
    }
}

/// A problem with one field of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub root_name: &'static str,
    pub root_ns: Option<&'static str>,
    pub prefix: Option<&'static str>,
    pub namespaces: Namespaces,
    pub fields: Vec<FieldInfo>,
}

impl Schema {
    /// Root element in the first namespace of `namespaces`, if any.
    pub fn new(name: &'static str, root_name: &'static str, namespaces: Namespaces) -> Self {
        let (prefix, root_ns) = match namespaces.first() {
            Some((prefix, uri)) => (Some(*prefix), Some(*uri)),
            None => (None, None),
        };
        Self {
            name,
            root_name,
            root_ns,
            prefix,
            namespaces,
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldInfo>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn new_root(&self) -> Element {
        let mut root = Element::new(self.root_ns, self.prefix, self.root_name);
        root.namespaces = self
            .namespaces
            .iter()
            .map(|(prefix, uri)| (Some(prefix.to_string()), uri.to_string()))
            .collect();
        root
    }

    pub fn check_root(&self, root: &Element) -> Result<()> {
        if root.is(self.root_ns, self.root_name) {
            return Ok(());
        }
        let expected = match self.root_ns {
            Some(ns) => format!("{{{}}}{}", ns, self.root_name),
            None => self.root_name.to_string(),
        };
        let found = match &root.ns {
            Some(ns) => format!("{{{}}}{}", ns, root.local),
            None => root.local.clone(),
        };
        Err(Error::RootMismatch { expected, found })
    }

    /// Required fields that are missing and values that cannot be coerced,
    /// descending into nested nodes.
    pub fn validate(&self, node: &Element) -> Vec<FieldError> {
        let mut errors = Vec::new();
        self.validate_into(node, "", &mut errors);
        errors
    }

    fn validate_into(&self, node: &Element, scope: &str, errors: &mut Vec<FieldError>) {
        for field in &self.fields {
            let name = if scope.is_empty() {
                field.name.to_string()
            } else {
                format!("{}.{}", scope, field.name)
            };
            let missing = |errors: &mut Vec<FieldError>| {
                if field.required {
                    errors.push(FieldError {
                        field: name.clone(),
                        message: format!("required value missing at {}", field.xpath),
                    });
                }
            };

            match field.kind {
                FieldKind::String | FieldKind::Boolean { .. } => {
                    if field.xpath.value(node).is_none() {
                        missing(errors);
                    }
                }
                FieldKind::Integer => match field.xpath.value(node) {
                    None => missing(errors),
                    Some(text) => {
                        if text.trim().parse::<i64>().is_err() {
                            errors.push(FieldError {
                                field: name.clone(),
                                message: format!("'{}' is not an integer", text),
                            });
                        }
                    }
                },
                FieldKind::Node(schema) => match field.xpath.select(node).first() {
                    None => missing(errors),
                    Some(child) => schema().validate_into(child, &name, errors),
                },
                FieldKind::NodeList(schema) => {
                    let children = field.xpath.select(node);
                    if children.is_empty() {
                        missing(errors);
                    }
                    for (idx, child) in children.into_iter().enumerate() {
                        schema().validate_into(child, &format!("{}[{}]", name, idx), errors);
                    }
                }
            }
        }
    }
}
