//! Namespaces
//!
//! A namespace owns its entities in an arena and indexes the top-level ones by name and
//! every entity carrying a C symbol by that symbol.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityDecl, EntityId};

/// Serializable description of a namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub name: String,
    pub version: String,
    /// Type prefixes, e.g. `Gtk` for `GtkWidget`
    #[serde(default)]
    pub identifier_prefixes: Vec<String>,
    /// Symbol prefixes, e.g. `gtk` for `gtk_widget_show`
    #[serde(default)]
    pub symbol_prefixes: Vec<String>,
    /// Package identifiers, e.g. `gtk+-3.0`
    #[serde(default)]
    pub exported_packages: Vec<String>,
    #[serde(default)]
    pub entities: Vec<EntityDecl>,
}

#[derive(Debug, Clone, Default)]
pub struct Namespace {
    pub name: String,
    pub version: String,
    pub identifier_prefixes: Vec<String>,
    pub symbol_prefixes: Vec<String>,
    pub exported_packages: Vec<String>,
    entities: Vec<Entity>,
    by_name: HashMap<String, EntityId>,
    by_symbol: HashMap<String, EntityId>,
}

impl Namespace {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_identifier_prefixes<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        prefixes: I,
    ) -> Self {
        self.identifier_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_symbol_prefixes<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        prefixes: I,
    ) -> Self {
        self.symbol_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exported_packages<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        packages: I,
    ) -> Self {
        self.exported_packages = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_decl(decl: NamespaceDecl) -> Self {
        let mut namespace = Namespace::new(decl.name, decl.version)
            .with_identifier_prefixes(decl.identifier_prefixes)
            .with_symbol_prefixes(decl.symbol_prefixes)
            .with_exported_packages(decl.exported_packages);
        for entity in decl.entities {
            namespace.add(entity);
        }
        namespace
    }

    /// Add a top-level declaration and its children
    pub fn add(&mut self, decl: EntityDecl) -> EntityId {
        self.insert(decl, None)
    }

    fn insert(&mut self, decl: EntityDecl, parent: Option<EntityId>) -> EntityId {
        let id = EntityId(self.entities.len());
        let EntityDecl {
            name,
            symbol,
            private,
            introspectable,
            kind,
            children,
        } = decl;

        if parent.is_none() {
            self.by_name.insert(name.clone(), id);
        }
        if let Some(symbol) = &symbol {
            self.by_symbol.insert(symbol.clone(), id);
        }
        self.entities.push(Entity {
            name,
            symbol,
            private,
            introspectable,
            kind,
            parent,
            children: Vec::new(),
        });

        for child in children {
            let child_id = self.insert(child, Some(id));
            self.entities[id.0].children.push(child_id);
        }
        id
    }

    /// Top-level entity by name
    pub fn get(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn get_by_symbol(&self, symbol: &str) -> Option<EntityId> {
        self.by_symbol.get(symbol).copied()
    }

    /// Panics if `id` does not come from this namespace.
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId(i), e))
    }

    /// Direct children of `parent` named `name` that satisfy `filter`
    pub fn find_child(
        &self,
        parent: EntityId,
        name: &str,
        filter: impl Fn(&Entity) -> bool,
    ) -> Option<EntityId> {
        self.entity(parent)
            .children
            .iter()
            .copied()
            .find(|&child| {
                let entity = self.entity(child);
                entity.name == name && filter(entity)
            })
    }
}
