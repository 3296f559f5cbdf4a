use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace declaration made on an element: `(prefix, uri)`, where a
/// `None` prefix is the default namespace and an empty uri undeclares it.
pub type NamespaceDecl = (Option<String>, String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub prefix: Option<String>,
    pub local: String,
    pub ns: Option<String>,
    pub value: String,
}

impl Attribute {
    fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => self.local.clone(),
        }
    }
}

/// Owned element tree. Names are resolved to namespace URIs when parsed;
/// the original prefixes are kept so documents write back the way they came in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub prefix: Option<String>,
    pub local: String,
    pub ns: Option<String>,
    pub namespaces: Vec<NamespaceDecl>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(ns: Option<&str>, prefix: Option<&str>, local: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local: local.to_string(),
            ns: ns.map(str::to_string),
            namespaces: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => self.local.clone(),
        }
    }

    pub fn is(&self, ns: Option<&str>, local: &str) -> bool {
        self.local == local && self.ns.as_deref() == ns
    }

    pub fn rename(&mut self, ns: Option<&str>, prefix: Option<&str>, local: &str) {
        self.ns = ns.map(str::to_string);
        self.prefix = prefix.map(str::to_string);
        self.local = local.to_string();
    }

    /// Value of an attribute in no namespace.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.ns.is_none() && a.local == local)
            .map(|a| a.value.as_str())
    }

    pub fn set_attribute(&mut self, local: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.ns.is_none() && a.local == local)
        {
            Some(attr) => attr.value = value.to_string(),
            None => self.attributes.push(Attribute {
                prefix: None,
                local: local.to_string(),
                ns: None,
                value: value.to_string(),
            }),
        }
    }

    pub fn remove_attribute(&mut self, local: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|a| !(a.ns.is_none() && a.local == local));
        before != self.attributes.len()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// All descendant text, concatenated in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Text nodes that are direct children of this element, if any.
    pub fn direct_text(&self) -> Option<String> {
        let mut found = false;
        let mut out = String::new();
        for node in &self.children {
            if let Node::Text(text) = node {
                found = true;
                out.push_str(text);
            }
        }
        found.then_some(out)
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, value: &str) {
        self.children.clear();
        self.children.push(Node::Text(value.to_string()));
    }

    /// Replaces the direct text nodes, leaving child elements in place.
    pub fn set_direct_text(&mut self, value: &str) {
        self.remove_direct_text();
        self.children.insert(0, Node::Text(value.to_string()));
    }

    pub fn remove_direct_text(&mut self) {
        self.children.retain(|node| !matches!(node, Node::Text(_)));
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for node in &el.children {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(Error::xml)? {
            Event::Start(start) => {
                let el = open_element(&start, &stack)?;
                stack.push(el);
            }
            Event::Empty(start) => {
                let el = open_element(&start, &stack)?;
                attach(el, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                attach(el, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let value = text.unescape().map_err(Error::xml)?;
                    parent.children.push(Node::Text(value.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let value = String::from_utf8(data.into_inner().into_owned())
                        .map_err(Error::xml)?;
                    parent.children.push(Node::Text(value));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry no mapped values.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::Xml(format!(
            "unclosed element <{}>",
            stack[stack.len() - 1].qualified_name()
        )));
    }
    root.ok_or_else(|| Error::Xml("document has no root element".to_string()))
}

fn attach(el: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None if root.is_none() => *root = Some(el),
        None => return Err(Error::Xml("multiple root elements".to_string())),
    }
    Ok(())
}

fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

fn open_element(start: &BytesStart, ancestors: &[Element]) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref()).map_err(Error::xml)?.to_string();
    let (prefix, local) = split_name(&name);

    let mut namespaces = Vec::new();
    let mut raw_attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(Error::xml)?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(Error::xml)?.to_string();
        let value = attr.unescape_value().map_err(Error::xml)?.into_owned();
        if key == "xmlns" {
            namespaces.push((None, value));
        } else if let Some(declared) = key.strip_prefix("xmlns:") {
            namespaces.push((Some(declared.to_string()), value));
        } else {
            raw_attributes.push((key, value));
        }
    }

    let ns = resolve_element_ns(prefix, &namespaces, ancestors)
        .ok_or_else(|| Error::Xml(format!("unbound namespace prefix in <{}>", name)))?;

    let mut attributes = Vec::with_capacity(raw_attributes.len());
    for (key, value) in raw_attributes {
        let (attr_prefix, attr_local) = split_name(&key);
        let attr_ns = match attr_prefix {
            None => None,
            Some(p) => Some(lookup(Some(p), &namespaces, ancestors).ok_or_else(|| {
                Error::Xml(format!("unbound namespace prefix on attribute {}", key))
            })?),
        };
        attributes.push(Attribute {
            prefix: attr_prefix.map(str::to_string),
            local: attr_local.to_string(),
            ns: attr_ns,
            value,
        });
    }

    Ok(Element {
        prefix: prefix.map(str::to_string),
        local: local.to_string(),
        ns,
        namespaces,
        attributes,
        children: Vec::new(),
    })
}

/// Outer `None` means the prefix is unbound; inner `None` means no namespace.
fn resolve_element_ns(
    prefix: Option<&str>,
    own: &[NamespaceDecl],
    ancestors: &[Element],
) -> Option<Option<String>> {
    match prefix {
        Some(p) => lookup(Some(p), own, ancestors).map(Some),
        None => Some(lookup(None, own, ancestors).filter(|uri| !uri.is_empty())),
    }
}

fn lookup(prefix: Option<&str>, own: &[NamespaceDecl], ancestors: &[Element]) -> Option<String> {
    if prefix == Some("xml") {
        return Some(XML_NS.to_string());
    }
    let scopes = std::iter::once(own).chain(ancestors.iter().rev().map(|el| el.namespaces.as_slice()));
    for decls in scopes {
        if let Some((_, uri)) = decls.iter().find(|(p, _)| p.as_deref() == prefix) {
            return Some(uri.clone());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Serializes an element tree as a standalone UTF-8 document.
pub fn to_string(root: &Element) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(Error::xml)?;
    let mut scopes: Vec<Vec<NamespaceDecl>> = Vec::new();
    write_element(&mut writer, root, &mut scopes)?;
    String::from_utf8(writer.into_inner()).map_err(Error::xml)
}

fn in_scope(prefix: Option<&str>, pending: &[NamespaceDecl], scopes: &[Vec<NamespaceDecl>]) -> Option<String> {
    if prefix == Some("xml") {
        return Some(XML_NS.to_string());
    }
    let all = std::iter::once(pending).chain(scopes.iter().rev().map(Vec::as_slice));
    for decls in all {
        if let Some((_, uri)) = decls.iter().find(|(p, _)| p.as_deref() == prefix) {
            return Some(uri.clone());
        }
    }
    None
}

fn require_binding(
    prefix: Option<&str>,
    ns: &str,
    decls: &mut Vec<NamespaceDecl>,
    scopes: &[Vec<NamespaceDecl>],
) {
    if in_scope(prefix, decls, scopes).as_deref() != Some(ns) {
        decls.retain(|(p, _)| p.as_deref() != prefix);
        decls.push((prefix.map(str::to_string), ns.to_string()));
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    el: &Element,
    scopes: &mut Vec<Vec<NamespaceDecl>>,
) -> Result<()> {
    // skip declarations an ancestor already made
    let mut decls: Vec<NamespaceDecl> = el
        .namespaces
        .iter()
        .filter(|(prefix, uri)| in_scope(prefix.as_deref(), &[], scopes).as_ref() != Some(uri))
        .cloned()
        .collect();
    match (&el.prefix, &el.ns) {
        (prefix, Some(ns)) => require_binding(prefix.as_deref(), ns, &mut decls, scopes),
        (None, None) => {
            let default = in_scope(None, &decls, scopes);
            if default.is_some_and(|uri| !uri.is_empty()) {
                decls.retain(|(p, _)| p.is_some());
                decls.push((None, String::new()));
            }
        }
        (Some(_), None) => {}
    }
    for attr in &el.attributes {
        if let (Some(prefix), Some(ns)) = (&attr.prefix, &attr.ns) {
            require_binding(Some(prefix), ns, &mut decls, scopes);
        }
    }

    let name = el.qualified_name();
    let mut start = BytesStart::new(name.as_str());
    for (prefix, uri) in &decls {
        let key = match prefix {
            Some(p) => format!("xmlns:{}", p),
            None => "xmlns".to_string(),
        };
        start.push_attribute((key.as_str(), uri.as_str()));
    }
    for attr in &el.attributes {
        start.push_attribute((attr.qualified_name().as_str(), attr.value.as_str()));
    }

    scopes.push(decls);
    if el.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(Error::xml)?;
    } else {
        writer.write_event(Event::Start(start)).map_err(Error::xml)?;
        for child in &el.children {
            match child {
                Node::Element(child) => write_element(writer, child, scopes)?,
                Node::Text(text) => writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(Error::xml)?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(name.as_str())))
            .map_err(Error::xml)?;
    }
    scopes.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGHTS_NS: &str = "http://pid.emory.edu/ns/2010/rights";

    #[test]
    fn test_parse_resolves_prefixed_and_default_namespaces() {
        let xml = r#"<?xml version="1.0"?>
            <rt:rights xmlns:rt="http://pid.emory.edu/ns/2010/rights">
                <rt:accessStatus code="2">Public Domain</rt:accessStatus>
                <note xmlns="urn:example">plain</note>
            </rt:rights>"#;
        let root = parse(xml).unwrap();
        assert!(root.is(Some(RIGHTS_NS), "rights"));

        let children: Vec<_> = root.elements().collect();
        assert_eq!(children.len(), 2);
        assert!(children[0].is(Some(RIGHTS_NS), "accessStatus"));
        assert_eq!(children[0].attribute("code"), Some("2"));
        assert_eq!(children[0].text(), "Public Domain");
        assert!(children[1].is(Some("urn:example"), "note"));
    }

    #[test]
    fn test_parse_rejects_unbound_prefix() {
        let err = parse("<rt:rights/>").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn test_parse_rejects_unclosed_document() {
        assert!(parse("<a><b></b>").is_err());
    }

    #[test]
    fn test_serializer_declares_namespaces_for_detached_nodes() {
        let root = parse(
            r#"<rt:rights xmlns:rt="http://pid.emory.edu/ns/2010/rights"><rt:ipNotes>n &amp; m</rt:ipNotes></rt:rights>"#,
        )
        .unwrap();
        let detached = root.elements().next().unwrap().clone();

        let xml = to_string(&detached).unwrap();
        assert!(xml.contains(r#"xmlns:rt="http://pid.emory.edu/ns/2010/rights""#));

        let reparsed = parse(&xml).unwrap();
        assert!(reparsed.is(Some(RIGHTS_NS), "ipNotes"));
        assert_eq!(reparsed.text(), "n & m");
    }

    #[test]
    fn test_round_trip_preserves_child_order() {
        let xml = r#"<list xmlns="urn:x"><item n="1"/><item n="2"/><item n="3"/></list>"#;
        let root = parse(xml).unwrap();
        let again = parse(&to_string(&root).unwrap()).unwrap();
        let order: Vec<_> = again.elements().filter_map(|e| e.attribute("n")).collect();
        assert_eq!(order, vec!["1", "2", "3"]);
    }
}
