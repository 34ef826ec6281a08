//! Entities
//!
//! Declarations of a namespace, classified once into a closed set of kinds. The
//! `*Decl` side is what callers (or a YAML/JSON description) provide; [`Entity`] is the
//! indexed form stored in a [`Namespace`](super::Namespace).

use serde::{Deserialize, Serialize};

/// Index of an entity inside its namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

/// A function argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// C `...`
    #[serde(default)]
    pub varargs: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            varargs: false,
        }
    }

    pub fn varargs() -> Self {
        Self {
            name: "...".into(),
            varargs: true,
        }
    }
}

/// Signature data shared by functions, vfuncs, signals and callbacks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// The `self` argument of a method, not part of `parameters`
    #[serde(default)]
    pub instance_parameter: Option<Parameter>,
    #[serde(default)]
    pub is_method: bool,
    #[serde(default)]
    pub is_constructor: bool,
    /// Public name this callable is exposed under
    #[serde(default)]
    pub shadows: Option<String>,
    #[serde(default)]
    pub shadowed_by: Option<String>,
}

impl Callable {
    pub fn with_parameters<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameters: names.into_iter().map(Parameter::new).collect(),
            ..Self::default()
        }
    }

    pub fn method(mut self, instance: impl Into<String>) -> Self {
        self.instance_parameter = Some(Parameter::new(instance));
        self.is_method = true;
        self
    }

    pub fn constructor(mut self) -> Self {
        self.is_constructor = true;
        self
    }

    pub fn shadowing(mut self, shadows: impl Into<String>) -> Self {
        self.shadows = Some(shadows.into());
        self
    }

    /// Look a parameter up by name, the instance parameter included
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.instance_parameter
            .iter()
            .chain(self.parameters.iter())
            .find(|p| p.name == name)
    }

    pub fn is_instance_parameter(&self, parameter: &Parameter) -> bool {
        self.instance_parameter.as_ref() == Some(parameter)
    }
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFlags {
    #[serde(default = "yes")]
    pub readable: bool,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub construct: bool,
    #[serde(default)]
    pub construct_only: bool,
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self {
            readable: true,
            writable: false,
            construct: false,
            construct_only: false,
        }
    }
}

/// The closed set of declaration kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    Class {
        /// Qualified `Ns.Name` of the parent class
        #[serde(default)]
        parent_type: Option<String>,
        /// Qualified names of the implemented interfaces
        #[serde(default)]
        interfaces: Vec<String>,
        #[serde(default)]
        gtype_name: Option<String>,
    },
    Interface {
        #[serde(default)]
        prerequisites: Vec<String>,
        #[serde(default)]
        gtype_name: Option<String>,
    },
    Record,
    Boxed,
    Union,
    Enum,
    Bitfield,
    Alias,
    Constant,
    Callback(Callable),
    Function(Callable),
    #[serde(rename = "vfunc")]
    VFunction(Callable),
    Signal(Callable),
    Property(PropertyFlags),
    Field,
    /// A value of an enum or bitfield
    Member,
    DocSection,
}

impl EntityKind {
    pub fn class() -> Self {
        EntityKind::Class {
            parent_type: None,
            interfaces: Vec::new(),
            gtype_name: None,
        }
    }

    pub fn interface() -> Self {
        EntityKind::Interface {
            prerequisites: Vec::new(),
            gtype_name: None,
        }
    }
}

/// A declaration as supplied by the caller, children nested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDecl {
    pub name: String,
    /// C symbol or identifier (`gtk_widget_show`, `GTK_ALIGN_FILL`)
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default = "yes")]
    pub introspectable: bool,
    #[serde(flatten)]
    pub kind: EntityKind,
    #[serde(default)]
    pub children: Vec<EntityDecl>,
}

impl EntityDecl {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            symbol: None,
            private: false,
            introspectable: true,
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_child(mut self, child: EntityDecl) -> Self {
        self.children.push(child);
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn not_introspectable(mut self) -> Self {
        self.introspectable = false;
        self
    }
}

/// An indexed declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub symbol: Option<String>,
    pub private: bool,
    pub introspectable: bool,
    pub kind: EntityKind,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
}

impl Entity {
    pub fn callable(&self) -> Option<&Callable> {
        match &self.kind {
            EntityKind::Callback(c)
            | EntityKind::Function(c)
            | EntityKind::VFunction(c)
            | EntityKind::Signal(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, EntityKind::Function(_))
    }

    /// Functions with an instance parameter, and every vfunc
    pub fn is_method(&self) -> bool {
        match &self.kind {
            EntityKind::Function(c) => c.is_method,
            EntityKind::VFunction(_) => true,
            _ => false,
        }
    }

    pub fn is_constructor(&self) -> bool {
        matches!(&self.kind, EntityKind::Function(c) if c.is_constructor)
    }

    /// Shadowed name of a function, if any
    pub fn shadows(&self) -> Option<&str> {
        match &self.kind {
            EntityKind::Function(c) => c.shadows.as_deref(),
            _ => None,
        }
    }

    pub fn gtype_name(&self) -> Option<&str> {
        match &self.kind {
            EntityKind::Class { gtype_name, .. } | EntityKind::Interface { gtype_name, .. } => {
                gtype_name.as_deref()
            }
            _ => None,
        }
    }

    /// Type-like entities get a page named after the type alone in gtk-doc
    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::Class { .. }
                | EntityKind::Interface { .. }
                | EntityKind::Record
                | EntityKind::Enum
                | EntityKind::Callback(_)
                | EntityKind::Alias
        )
    }
}
