//! Repository
//!
//! The namespace being documented plus the namespaces it depends on, in declaration
//! order. This is where identifiers are split into `(namespace, local name)` candidates.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::namespace::{Namespace, NamespaceDecl};
use crate::config;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(pub usize);

/// An entity anywhere in the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub namespace: NamespaceId,
    pub id: EntityId,
}

/// Raised when no declared namespace can own an identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no namespace matches identifier `{0}`")]
pub struct UnsplittableIdentifier(pub String);

/// Serializable description of a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDecl {
    pub namespace: NamespaceDecl,
    #[serde(default)]
    pub includes: Vec<NamespaceDecl>,
}

#[derive(Debug, Clone)]
pub struct Repository {
    /// The documented namespace comes first
    namespaces: Vec<Namespace>,
}

impl Repository {
    pub fn new(current: Namespace) -> Self {
        Self {
            namespaces: vec![current],
        }
    }

    pub fn with_include(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn from_decl(decl: RepositoryDecl) -> Self {
        decl.includes.into_iter().fold(
            Repository::new(Namespace::from_decl(decl.namespace)),
            |repo, include| repo.with_include(Namespace::from_decl(include)),
        )
    }

    /// Load a YAML or JSON repository description
    pub fn load(path: &Path) -> Result<Self> {
        let decl: RepositoryDecl = config::read_structured(path)?;
        Ok(Self::from_decl(decl))
    }

    pub fn current_id(&self) -> NamespaceId {
        NamespaceId(0)
    }

    pub fn current(&self) -> &Namespace {
        &self.namespaces[0]
    }

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.0]
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (NamespaceId, &Namespace)> {
        self.namespaces
            .iter()
            .enumerate()
            .map(|(i, ns)| (NamespaceId(i), ns))
    }

    pub fn entity(&self, entity: EntityRef) -> &Entity {
        self.namespace(entity.namespace).entity(entity.id)
    }

    pub fn is_current(&self, entity: EntityRef) -> bool {
        entity.namespace == self.current_id()
    }

    pub fn parent(&self, entity: EntityRef) -> Option<EntityRef> {
        self.entity(entity).parent.map(|id| EntityRef {
            namespace: entity.namespace,
            id,
        })
    }

    pub fn children(&self, entity: EntityRef) -> impl Iterator<Item = EntityRef> + '_ {
        self.entity(entity).children.iter().map(move |&id| EntityRef {
            namespace: entity.namespace,
            id,
        })
    }

    pub fn namespace_by_name(&self, name: &str) -> Option<NamespaceId> {
        self.namespaces()
            .find(|(_, ns)| ns.name == name)
            .map(|(id, _)| id)
    }

    /// Look up `Ns.Name`, or a deeper `Ns.Type.member` path
    pub fn lookup_qualified(&self, qualified: &str) -> Option<EntityRef> {
        let mut parts = qualified.split('.');
        let namespace = self.namespace_by_name(parts.next()?)?;
        let ns = self.namespace(namespace);
        let mut id = ns.get(parts.next()?)?;
        for part in parts {
            id = ns.find_child(id, part, |_| true)?;
        }
        Some(EntityRef { namespace, id })
    }

    /// `Ns.Name` of a top-level entity
    pub fn qualified_name(&self, entity: EntityRef) -> String {
        format!(
            "{}.{}",
            self.namespace(entity.namespace).name,
            self.entity(entity).name
        )
    }

    /// Split a type identifier like `GtkWidget` into namespace candidates.
    ///
    /// Namespaces are tried in declaration order, longer prefixes first. A namespace
    /// without identifier prefixes takes the identifier as is.
    pub fn split_ctype_namespaces<'i>(
        &self,
        ident: &'i str,
    ) -> std::result::Result<Vec<(NamespaceId, &'i str)>, UnsplittableIdentifier> {
        let mut matches = Vec::new();
        for (id, ns) in self.namespaces() {
            if ns.identifier_prefixes.iter().all(|p| p.is_empty()) {
                matches.push((id, ident));
                continue;
            }
            for prefix in by_length(&ns.identifier_prefixes) {
                if let Some(rest) = ident.strip_prefix(prefix) {
                    if !rest.is_empty() {
                        matches.push((id, rest));
                    }
                }
            }
        }
        non_empty(matches, ident)
    }

    /// Split a C symbol like `gtk_widget_show` into namespace candidates.
    ///
    /// Symbol prefixes match case-insensitively and must be followed by `_`, so
    /// `GTK_ALIGN_FILL` splits like `gtk_align_fill` does.
    pub fn split_csymbol_namespaces<'i>(
        &self,
        symbol: &'i str,
    ) -> std::result::Result<Vec<(NamespaceId, &'i str)>, UnsplittableIdentifier> {
        let mut matches = Vec::new();
        for (id, ns) in self.namespaces() {
            for prefix in by_length(&ns.symbol_prefixes) {
                let prefix = prefix.trim_end_matches('_');
                let n = prefix.len();
                if n == 0 || symbol.len() <= n + 1 || !symbol.is_char_boundary(n) {
                    continue;
                }
                if symbol[..n].eq_ignore_ascii_case(prefix) && symbol.as_bytes()[n] == b'_' {
                    matches.push((id, &symbol[n + 1..]));
                }
            }
        }
        non_empty(matches, symbol)
    }

    /// Every entity of the current namespace, for page walks
    pub fn current_entities(&self) -> impl Iterator<Item = EntityRef> + '_ {
        let namespace = self.current_id();
        self.current()
            .entities()
            .map(move |(id, _)| EntityRef { namespace, id })
    }
}

fn by_length(prefixes: &[String]) -> Vec<&str> {
    let mut sorted: Vec<&str> = prefixes
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    sorted
}

fn non_empty<'i>(
    matches: Vec<(NamespaceId, &'i str)>,
    ident: &str,
) -> std::result::Result<Vec<(NamespaceId, &'i str)>, UnsplittableIdentifier> {
    if matches.is_empty() {
        Err(UnsplittableIdentifier(ident.to_string()))
    } else {
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::{EntityDecl, EntityKind};

    fn repo() -> Repository {
        let mut gtk = Namespace::new("Gtk", "3.0")
            .with_identifier_prefixes(["Gtk"])
            .with_symbol_prefixes(["gtk"]);
        gtk.add(
            EntityDecl::new("Widget", EntityKind::class())
                .with_child(EntityDecl::new("visible", EntityKind::Property(Default::default()))),
        );
        let gobject = Namespace::new("GObject", "2.0")
            .with_identifier_prefixes(["G"])
            .with_symbol_prefixes(["g"]);
        let glib = Namespace::new("GLib", "2.0")
            .with_identifier_prefixes(["G"])
            .with_symbol_prefixes(["g", "glib"]);
        Repository::new(gtk).with_include(gobject).with_include(glib)
    }

    #[test]
    fn test_split_ctype_is_ambiguous_across_namespaces() {
        let repo = repo();
        let matches = repo.split_ctype_namespaces("GObject").unwrap();
        assert_eq!(
            matches,
            vec![(NamespaceId(1), "Object"), (NamespaceId(2), "Object")]
        );
    }

    #[test]
    fn test_split_ctype_without_candidates_fails() {
        let repo = repo();
        assert!(repo.split_ctype_namespaces("Widget").is_err());
    }

    #[test]
    fn test_split_csymbol_requires_separator_after_prefix() {
        let repo = repo();
        let matches = repo.split_csymbol_namespaces("glib_check_version").unwrap();
        assert_eq!(matches, vec![(NamespaceId(2), "check_version")]);
    }

    #[test]
    fn test_split_csymbol_follows_declaration_order() {
        let repo = repo();
        let matches = repo.split_csymbol_namespaces("g_object_new").unwrap();
        assert_eq!(
            matches,
            vec![(NamespaceId(1), "object_new"), (NamespaceId(2), "object_new")]
        );
    }

    #[test]
    fn test_split_csymbol_ignores_case() {
        let repo = repo();
        let matches = repo.split_csymbol_namespaces("GTK_ALIGN_FILL").unwrap();
        assert_eq!(matches, vec![(NamespaceId(0), "ALIGN_FILL")]);
    }

    #[test]
    fn test_lookup_qualified_paths() {
        let repo = repo();
        let widget = repo.lookup_qualified("Gtk.Widget").unwrap();
        assert_eq!(repo.qualified_name(widget), "Gtk.Widget");
        let visible = repo.lookup_qualified("Gtk.Widget.visible").unwrap();
        assert_eq!(repo.parent(visible), Some(widget));
        assert!(repo.lookup_qualified("Gtk.Missing").is_none());
        assert!(repo.lookup_qualified("Nope.Widget").is_none());
    }
}
