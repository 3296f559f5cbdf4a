//! Location expressions for mapped fields.
//!
//! Only the subset the schemas in this crate use is understood:
//!
//! - `prefix:name` element steps, with any number of predicates
//! - `@attr` as the final step
//! - `text()` as the final step
//! - predicates `[@attr="value"]` (either quote style) and `[contains(., "text")]`
//!
//! Reads take the first match in document order. Writes create whatever
//! elements are missing, copying `@attr="value"` predicates onto the new
//! node. A `contains()` predicate can only be satisfied by the value written.

use std::fmt;

use super::dom::{Element, Node};
use crate::error::{Error, Result};

/// Prefix-to-URI map used to resolve names inside expressions.
pub type Namespaces = &'static [(&'static str, &'static str)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    AttributeEquals { name: String, value: String },
    Contains(String),
}

impl Predicate {
    fn matches(&self, el: &Element) -> bool {
        match self {
            Predicate::AttributeEquals { name, value } => el.attribute(name) == Some(value.as_str()),
            Predicate::Contains(needle) => el.text().contains(needle.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementStep {
    pub ns: Option<String>,
    pub prefix: Option<String>,
    pub local: String,
    pub predicates: Vec<Predicate>,
}

impl ElementStep {
    fn matches(&self, el: &Element) -> bool {
        el.is(self.ns.as_deref(), &self.local) && self.predicates.iter().all(|p| p.matches(el))
    }

    fn create(&self) -> Element {
        let mut el = Element::new(self.ns.as_deref(), self.prefix.as_deref(), &self.local);
        self.stamp(&mut el);
        el
    }

    /// Applies the step's name and attribute predicates to `el`.
    fn stamp(&self, el: &mut Element) {
        el.rename(self.ns.as_deref(), self.prefix.as_deref(), &self.local);
        for predicate in &self.predicates {
            if let Predicate::AttributeEquals { name, value } = predicate {
                el.set_attribute(name, value);
            }
        }
    }

    fn contains_requirement(&self) -> Option<&str> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Contains(needle) => Some(needle.as_str()),
            Predicate::AttributeEquals { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Element(ElementStep),
    Attribute(String),
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPath {
    source: String,
    parents: Vec<ElementStep>,
    target: Target,
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl XPath {
    pub fn parse(source: &str, namespaces: Namespaces) -> Result<Self> {
        let fail = |reason: &str| Error::Path {
            path: source.to_string(),
            reason: reason.to_string(),
        };

        let raw_steps = split_steps(source).map_err(|reason| fail(&reason))?;
        let Some((last, leading)) = raw_steps.split_last() else {
            return Err(fail("empty expression"));
        };

        let mut parents = Vec::with_capacity(leading.len());
        for step in leading {
            match parse_step(step, namespaces).map_err(|reason| fail(&reason))? {
                Target::Element(el) => parents.push(el),
                _ => return Err(fail("only the final step may select an attribute or text")),
            }
        }
        let target = parse_step(last, namespaces).map_err(|reason| fail(&reason))?;

        Ok(Self {
            source: source.to_string(),
            parents,
            target,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Elements matched by an expression whose final step is an element.
    pub fn select<'a>(&self, node: &'a Element) -> Vec<&'a Element> {
        let Target::Element(last) = &self.target else {
            return Vec::new();
        };
        let mut current = vec![node];
        for step in self.parents.iter().chain(std::iter::once(last)) {
            current = current
                .into_iter()
                .flat_map(|el| el.elements().filter(|child| step.matches(child)))
                .collect();
        }
        current
    }

    pub fn exists(&self, node: &Element) -> bool {
        self.value(node).is_some()
    }

    /// String value at the location: attribute value, direct text, or the
    /// full text content of the first matching element.
    pub fn value(&self, node: &Element) -> Option<String> {
        match &self.target {
            Target::Element(_) => self.select(node).first().map(|el| el.text()),
            Target::Attribute(name) => self
                .parents_of(node)
                .into_iter()
                .find_map(|el| el.attribute(name).map(str::to_string)),
            Target::Text => self
                .parents_of(node)
                .into_iter()
                .find_map(|el| el.direct_text()),
        }
    }

    pub fn set_value(&self, node: &mut Element, value: &str) -> Result<()> {
        if let Target::Element(last) = &self.target {
            if let Some(needle) = last.contains_requirement() {
                if !value.contains(needle) {
                    return Err(Error::Validation {
                        field: self.source.clone(),
                        message: format!("value '{}' must contain '{}'", value, needle),
                    });
                }
            }
        }

        let parent = ensure_path(node, &self.parents);
        match &self.target {
            Target::Attribute(name) => parent.set_attribute(name, value),
            Target::Text => parent.set_direct_text(value),
            Target::Element(last) => ensure_step(parent, last).set_text(value),
        }
        Ok(())
    }

    /// Removes the first matching node or attribute, if present.
    pub fn remove(&self, node: &mut Element) {
        let Some(parent) = find_path_mut(node, &self.parents) else {
            return;
        };
        match &self.target {
            Target::Attribute(name) => {
                parent.remove_attribute(name);
            }
            Target::Text => parent.remove_direct_text(),
            Target::Element(last) => {
                if let Some(idx) = position(parent, last) {
                    parent.children.remove(idx);
                }
            }
        }
    }

    /// Puts `value` at the location, replacing the first existing match.
    pub fn set_node(&self, node: &mut Element, mut value: Element) -> Result<()> {
        let last = self.element_target()?;
        last.stamp(&mut value);
        let parent = ensure_path(node, &self.parents);
        match position(parent, last) {
            Some(idx) => parent.children[idx] = Node::Element(value),
            None => parent.children.push(Node::Element(value)),
        }
        Ok(())
    }

    /// Replaces every match with `values`, in order, at the place the first
    /// match occupied.
    pub fn set_nodes(&self, node: &mut Element, values: Vec<Element>) -> Result<()> {
        let last = self.element_target()?;
        let parent = ensure_path(node, &self.parents);
        // nothing before the first match is removed, so its index stays valid
        let mut at = position(parent, last).unwrap_or(parent.children.len());
        parent
            .children
            .retain(|child| !matches!(child, Node::Element(el) if last.matches(el)));

        for mut value in values {
            last.stamp(&mut value);
            parent.children.insert(at, Node::Element(value));
            at += 1;
        }
        Ok(())
    }

    /// Appends `value` after the last existing match.
    pub fn push_node(&self, node: &mut Element, mut value: Element) -> Result<()> {
        let last = self.element_target()?;
        last.stamp(&mut value);
        let parent = ensure_path(node, &self.parents);
        let after = parent
            .children
            .iter()
            .rposition(|child| matches!(child, Node::Element(el) if last.matches(el)));
        match after {
            Some(idx) => parent.children.insert(idx + 1, Node::Element(value)),
            None => parent.children.push(Node::Element(value)),
        }
        Ok(())
    }

    fn element_target(&self) -> Result<&ElementStep> {
        match &self.target {
            Target::Element(step) => Ok(step),
            _ => Err(Error::Path {
                path: self.source.clone(),
                reason: "expression does not select an element".to_string(),
            }),
        }
    }

    fn parents_of<'a>(&self, node: &'a Element) -> Vec<&'a Element> {
        let mut current = vec![node];
        for step in &self.parents {
            current = current
                .into_iter()
                .flat_map(|el| el.elements().filter(|child| step.matches(child)))
                .collect();
        }
        current
    }
}

fn position(parent: &Element, step: &ElementStep) -> Option<usize> {
    parent
        .children
        .iter()
        .position(|child| matches!(child, Node::Element(el) if step.matches(el)))
}

fn ensure_step<'a>(parent: &'a mut Element, step: &ElementStep) -> &'a mut Element {
    let idx = match position(parent, step) {
        Some(idx) => idx,
        None => {
            parent.children.push(Node::Element(step.create()));
            parent.children.len() - 1
        }
    };
    match &mut parent.children[idx] {
        Node::Element(el) => el,
        // position() and push() only ever point at element nodes
        Node::Text(_) => unreachable!("step index points at a text node"),
    }
}

fn ensure_path<'a>(node: &'a mut Element, steps: &[ElementStep]) -> &'a mut Element {
    let mut current = node;
    for step in steps {
        current = ensure_step(current, step);
    }
    current
}

fn find_path_mut<'a>(node: &'a mut Element, steps: &[ElementStep]) -> Option<&'a mut Element> {
    let mut current = node;
    for step in steps {
        let idx = position(current, step)?;
        current = match &mut current.children[idx] {
            Node::Element(el) => el,
            Node::Text(_) => return None,
        };
    }
    Some(current)
}

/// Splits on `/` outside of brackets and quotes.
fn split_steps(source: &str) -> std::result::Result<Vec<String>, String> {
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in source.trim().chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '[') => {
                depth += 1;
                current.push(ch);
            }
            (None, ']') => {
                depth = depth.checked_sub(1).ok_or("unbalanced ']'")?;
                current.push(ch);
            }
            (None, '/') if depth == 0 => {
                if current.trim().is_empty() {
                    return Err("empty step".to_string());
                }
                steps.push(std::mem::take(&mut current));
            }
            (None, c) => current.push(c),
        }
    }
    if quote.is_some() || depth != 0 {
        return Err("unterminated predicate".to_string());
    }
    if current.trim().is_empty() {
        return Err("empty step".to_string());
    }
    steps.push(current);
    Ok(steps)
}

fn parse_step(step: &str, namespaces: Namespaces) -> std::result::Result<Target, String> {
    let step = step.trim();
    if step == "text()" {
        return Ok(Target::Text);
    }
    if let Some(name) = step.strip_prefix('@') {
        if name.is_empty() || name.contains(':') {
            return Err(format!("unsupported attribute step '{}'", step));
        }
        return Ok(Target::Attribute(name.to_string()));
    }

    let (name, mut rest) = match step.find('[') {
        Some(idx) => (&step[..idx], &step[idx..]),
        None => (step, ""),
    };
    let (prefix, local) = match name.split_once(':') {
        Some((p, l)) => (Some(p), l),
        None => (None, name),
    };
    if local.is_empty() {
        return Err(format!("missing element name in '{}'", step));
    }
    let ns = match prefix {
        Some(p) => Some(
            namespaces
                .iter()
                .find(|(declared, _)| *declared == p)
                .map(|(_, uri)| uri.to_string())
                .ok_or_else(|| format!("unknown namespace prefix '{}'", p))?,
        ),
        None => None,
    };

    let mut predicates = Vec::new();
    while !rest.is_empty() {
        let close = find_predicate_end(rest).ok_or("unterminated predicate")?;
        predicates.push(parse_predicate(&rest[1..close])?);
        rest = rest[close + 1..].trim_start();
        if !rest.is_empty() && !rest.starts_with('[') {
            return Err(format!("unexpected text after predicate in '{}'", step));
        }
    }

    Ok(Target::Element(ElementStep {
        ns,
        prefix: prefix.map(str::to_string),
        local: local.to_string(),
        predicates,
    }))
}

/// Index of the `]` closing the predicate that opens at `rest[0]`.
fn find_predicate_end(rest: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in rest.char_indices().skip(1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, ']') => return Some(idx),
            _ => {}
        }
    }
    None
}

fn unquote(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    let first = raw.chars().next()?;
    if (first == '"' || first == '\'') && raw.len() >= 2 && raw.ends_with(first) {
        Some(&raw[1..raw.len() - 1])
    } else {
        None
    }
}

fn parse_predicate(body: &str) -> std::result::Result<Predicate, String> {
    let body = body.trim();
    if let Some(attr) = body.strip_prefix('@') {
        let (name, value) = attr
            .split_once('=')
            .ok_or_else(|| format!("unsupported predicate '[{}]'", body))?;
        let value = unquote(value).ok_or_else(|| format!("predicate value must be quoted in '[{}]'", body))?;
        return Ok(Predicate::AttributeEquals {
            name: name.trim().to_string(),
            value: value.to_string(),
        });
    }
    if let Some(args) = body.strip_prefix("contains(").and_then(|s| s.strip_suffix(')')) {
        let (context, needle) = args
            .split_once(',')
            .ok_or_else(|| format!("contains() takes two arguments in '[{}]'", body))?;
        if context.trim() != "." {
            return Err(format!("contains() only supports the context node in '[{}]'", body));
        }
        let needle = unquote(needle).ok_or_else(|| format!("contains() needle must be quoted in '[{}]'", body))?;
        return Ok(Predicate::Contains(needle.to_string()));
    }
    Err(format!("unsupported predicate '[{}]'", body))
}
