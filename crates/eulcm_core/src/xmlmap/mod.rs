//! Declarative XML mappings.
//!
//! A mapped type is a thin owner of an [`Element`] tree plus a static set of
//! field descriptors. Accessors read and write through the descriptors, so
//! anything in the document that is not mapped survives a round trip.

use crate::error::{Error, Result};

pub use dom::Element;
pub use fields::{Field, IntegerField, NodeField, NodeListField, SimpleBooleanField, StringField};
pub use path::{Namespaces, XPath};
pub use schema::{FieldError, FieldInfo, FieldKind, Schema, SchemaRef};

pub trait XmlObject: Sized + Clone {
    fn schema() -> &'static Schema;
    fn from_node(node: Element) -> Self;
    fn node(&self) -> &Element;
    fn node_mut(&mut self) -> &mut Element;
    fn into_node(self) -> Element;

    /// Parses a full document and checks its root element.
    fn from_xml(xml: &str) -> Result<Self> {
        let root = dom::parse(xml)?;
        Self::schema().check_root(&root)?;
        tracing::trace!(schema = Self::schema().name, "parsed mapped document");
        Ok(Self::from_node(root))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes).map_err(Error::xml)?;
        Self::from_xml(xml)
    }

    fn to_xml(&self) -> Result<String> {
        dom::to_string(self.node())
    }

    fn validation_errors(&self) -> Vec<FieldError> {
        Self::schema().validate(self.node())
    }

    fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }
}

/// Declares a mapped type backed by an element tree.
macro_rules! xml_object {
    ($(#[$meta:meta])* $name:ident => $schema:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            node: $crate::xmlmap::Element,
        }

        impl $crate::xmlmap::XmlObject for $name {
            fn schema() -> &'static $crate::xmlmap::Schema {
                $schema
            }

            fn from_node(node: $crate::xmlmap::Element) -> Self {
                Self { node }
            }

            fn node(&self) -> &$crate::xmlmap::Element {
                &self.node
            }

            fn node_mut(&mut self) -> &mut $crate::xmlmap::Element {
                &mut self.node
            }

            fn into_node(self) -> $crate::xmlmap::Element {
                self.node
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    node: <Self as $crate::xmlmap::XmlObject>::schema().new_root(),
                }
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl $crate::models::datastream::DatastreamContent for $name {
            fn empty() -> Self {
                Self::default()
            }

            fn decode(bytes: &[u8]) -> $crate::error::Result<Self> {
                <Self as $crate::xmlmap::XmlObject>::from_bytes(bytes)
            }

            fn encode(&self) -> $crate::error::Result<Vec<u8>> {
                Ok(<Self as $crate::xmlmap::XmlObject>::to_xml(self)?.into_bytes())
            }
        }
    };
}

/// Getter/setter pairs for string fields of a static field map.
macro_rules! string_accessors {
    ($vis:vis $map:ident: $($field:ident / $setter:ident),* $(,)?) => {
        $(
            $vis fn $field(&self) -> Option<String> {
                $map.$field.get($crate::xmlmap::XmlObject::node(self))
            }

            $vis fn $setter(&mut self, value: Option<&str>) -> $crate::error::Result<()> {
                $map.$field.set($crate::xmlmap::XmlObject::node_mut(self), value)
            }
        )*
    };
}

/// Getter/setter pairs for single nested nodes.
macro_rules! node_accessors {
    ($vis:vis $map:ident: $($field:ident / $setter:ident: $ty:ty),* $(,)?) => {
        $(
            $vis fn $field(&self) -> Option<$ty> {
                $map.$field.get($crate::xmlmap::XmlObject::node(self))
            }

            $vis fn $setter(&mut self, value: Option<$ty>) -> $crate::error::Result<()> {
                $map.$field.set($crate::xmlmap::XmlObject::node_mut(self), value)
            }
        )*
    };
}

/// Read, replace and append accessors for repeatable nested nodes.
macro_rules! list_accessors {
    ($vis:vis $map:ident: $($field:ident / $setter:ident / $pusher:ident: $ty:ty),* $(,)?) => {
        $(
            $vis fn $field(&self) -> Vec<$ty> {
                $map.$field.get($crate::xmlmap::XmlObject::node(self))
            }

            $vis fn $setter(&mut self, values: Vec<$ty>) -> $crate::error::Result<()> {
                $map.$field.set($crate::xmlmap::XmlObject::node_mut(self), values)
            }

            $vis fn $pusher(&mut self, value: $ty) -> $crate::error::Result<()> {
                $map.$field.push($crate::xmlmap::XmlObject::node_mut(self), value)
            }
        )*
    };
}

pub mod dom;
pub mod fields;
pub mod path;
pub mod schema;

pub mod filetech;
pub mod mods;
pub mod mods_ext;
pub mod rights;
pub mod series;
