use std::marker::PhantomData;

use super::dom::Element;
use super::path::Namespaces;
use super::schema::{FieldInfo, FieldKind};
use super::XmlObject;
use crate::error::{Error, Result};

/// Shared builder surface for every field descriptor.
pub trait Field: Sized {
    fn info(&self) -> &FieldInfo;
    fn info_mut(&mut self) -> &mut FieldInfo;

    fn required(mut self) -> Self {
        self.info_mut().required = true;
        self
    }

    fn verbose_name(mut self, name: &'static str) -> Self {
        self.info_mut().verbose_name = Some(name);
        self
    }

    fn help_text(mut self, text: &'static str) -> Self {
        self.info_mut().help_text = Some(text);
        self
    }
}

macro_rules! impl_field {
    ($ty:ty $(, $generic:ident)?) => {
        impl$(<$generic: XmlObject>)? Field for $ty {
            fn info(&self) -> &FieldInfo {
                &self.info
            }

            fn info_mut(&mut self) -> &mut FieldInfo {
                &mut self.info
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Scalar fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StringField {
    info: FieldInfo,
}

impl StringField {
    pub fn new(name: &'static str, path: &str, namespaces: Namespaces) -> Self {
        Self {
            info: FieldInfo::new(name, path, namespaces, FieldKind::String),
        }
    }

    pub fn get(&self, node: &Element) -> Option<String> {
        self.info.xpath.value(node)
    }

    /// `None` removes the value.
    pub fn set(&self, node: &mut Element, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.info.xpath.set_value(node, value),
            None => {
                self.info.xpath.remove(node);
                Ok(())
            }
        }
    }
}

impl_field!(StringField);

#[derive(Debug, Clone)]
pub struct IntegerField {
    info: FieldInfo,
}

impl IntegerField {
    pub fn new(name: &'static str, path: &str, namespaces: Namespaces) -> Self {
        Self {
            info: FieldInfo::new(name, path, namespaces, FieldKind::Integer),
        }
    }

    pub fn get(&self, node: &Element) -> Result<Option<i64>> {
        match self.info.xpath.value(node) {
            None => Ok(None),
            Some(text) => text.trim().parse::<i64>().map(Some).map_err(|_| Error::Validation {
                field: self.info.name.to_string(),
                message: format!("'{}' is not an integer", text),
            }),
        }
    }

    pub fn set(&self, node: &mut Element, value: Option<i64>) -> Result<()> {
        match value {
            Some(value) => self.info.xpath.set_value(node, &value.to_string()),
            None => {
                self.info.xpath.remove(node);
                Ok(())
            }
        }
    }
}

impl_field!(IntegerField);

#[derive(Debug, Clone)]
pub struct SimpleBooleanField {
    info: FieldInfo,
    true_value: &'static str,
    false_value: Option<&'static str>,
}

impl SimpleBooleanField {
    pub fn new(
        name: &'static str,
        path: &str,
        namespaces: Namespaces,
        true_value: &'static str,
        false_value: Option<&'static str>,
    ) -> Self {
        Self {
            info: FieldInfo::new(
                name,
                path,
                namespaces,
                FieldKind::Boolean {
                    true_value,
                    false_value,
                },
            ),
            true_value,
            false_value,
        }
    }

    pub fn get(&self, node: &Element) -> bool {
        self.info.xpath.value(node).as_deref() == Some(self.true_value)
    }

    /// `false` writes the false value when there is one, otherwise removes the node.
    pub fn set(&self, node: &mut Element, value: bool) -> Result<()> {
        match (value, self.false_value) {
            (true, _) => self.info.xpath.set_value(node, self.true_value),
            (false, Some(false_value)) => self.info.xpath.set_value(node, false_value),
            (false, None) => {
                self.info.xpath.remove(node);
                Ok(())
            }
        }
    }
}

impl_field!(SimpleBooleanField);

// ---------------------------------------------------------------------------
// Structured fields
// ---------------------------------------------------------------------------

/// A single nested mapped node. Reads hand back an owned copy; writes replace
/// the node in the parent document.
#[derive(Debug, Clone)]
pub struct NodeField<T> {
    info: FieldInfo,
    _marker: PhantomData<fn() -> T>,
}

impl<T: XmlObject> NodeField<T> {
    pub fn new(name: &'static str, path: &str, namespaces: Namespaces) -> Self {
        Self {
            info: FieldInfo::new(name, path, namespaces, FieldKind::Node(T::schema)),
            _marker: PhantomData,
        }
    }

    pub fn get(&self, node: &Element) -> Option<T> {
        self.info
            .xpath
            .select(node)
            .first()
            .map(|el| T::from_node((*el).clone()))
    }

    pub fn set(&self, node: &mut Element, value: Option<T>) -> Result<()> {
        match value {
            Some(value) => self.info.xpath.set_node(node, value.into_node()),
            None => {
                self.info.xpath.remove(node);
                Ok(())
            }
        }
    }
}

impl_field!(NodeField<T>, T);

/// Repeatable nested nodes in document order.
#[derive(Debug, Clone)]
pub struct NodeListField<T> {
    info: FieldInfo,
    _marker: PhantomData<fn() -> T>,
}

impl<T: XmlObject> NodeListField<T> {
    pub fn new(name: &'static str, path: &str, namespaces: Namespaces) -> Self {
        Self {
            info: FieldInfo::new(name, path, namespaces, FieldKind::NodeList(T::schema)),
            _marker: PhantomData,
        }
    }

    pub fn get(&self, node: &Element) -> Vec<T> {
        self.info
            .xpath
            .select(node)
            .into_iter()
            .map(|el| T::from_node(el.clone()))
            .collect()
    }

    pub fn set(&self, node: &mut Element, values: Vec<T>) -> Result<()> {
        let nodes = values.into_iter().map(XmlObject::into_node).collect();
        self.info.xpath.set_nodes(node, nodes)
    }

    pub fn push(&self, node: &mut Element, value: T) -> Result<()> {
        self.info.xpath.push_node(node, value.into_node())
    }
}

impl_field!(NodeListField<T>, T);
