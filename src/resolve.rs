//! Identifier resolution
//!
//! Maps C type names (`GtkWidget`) and C symbols (`gtk_widget_show`, `GTK_ALIGN_FILL`) to
//! entities of the repository. Namespaces are tried in declaration order; the first hit
//! wins.

pub mod words;

use crate::model::{Entity, EntityKind, EntityRef, Repository};

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    repo: &'r Repository,
}

impl<'r> Resolver<'r> {
    pub fn new(repo: &'r Repository) -> Self {
        Self { repo }
    }

    /// A top-level entity named by a C type identifier
    pub fn resolve_type(&self, ident: &str) -> Option<EntityRef> {
        let matches = self.repo.split_ctype_namespaces(ident).ok()?;
        matches.into_iter().find_map(|(namespace, name)| {
            self.repo
                .namespace(namespace)
                .get(name)
                .map(|id| EntityRef { namespace, id })
        })
    }

    /// An entity named by a C symbol.
    ///
    /// Exact symbols are looked up in every candidate namespace before falling back to the
    /// top-level entity named by the unprefixed rest.
    pub fn resolve_symbol(&self, symbol: &str) -> Option<EntityRef> {
        let matches = self.repo.split_csymbol_namespaces(symbol).ok()?;
        let by_symbol = matches.iter().find_map(|&(namespace, _)| {
            self.repo
                .namespace(namespace)
                .get_by_symbol(symbol)
                .map(|id| EntityRef { namespace, id })
        });
        by_symbol.or_else(|| {
            matches.iter().find_map(|&(namespace, name)| {
                self.repo
                    .namespace(namespace)
                    .get(name)
                    .map(|id| EntityRef { namespace, id })
            })
        })
    }

    /// A type first, a symbol otherwise
    pub fn resolve_word(&self, word: &str) -> Option<EntityRef> {
        self.resolve_type(word).or_else(|| self.resolve_symbol(word))
    }

    pub fn find_property(&self, owner: EntityRef, name: &str) -> Option<EntityRef> {
        self.find_child(owner, name, |e| matches!(e.kind, EntityKind::Property(_)))
    }

    pub fn find_signal(&self, owner: EntityRef, name: &str) -> Option<EntityRef> {
        self.find_child(owner, name, |e| matches!(e.kind, EntityKind::Signal(_)))
    }

    fn find_child(
        &self,
        owner: EntityRef,
        name: &str,
        filter: impl Fn(&Entity) -> bool,
    ) -> Option<EntityRef> {
        self.repo
            .namespace(owner.namespace)
            .find_child(owner.id, name, filter)
            .map(|id| EntityRef {
                namespace: owner.namespace,
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Callable, EntityDecl, Namespace};

    fn repo() -> Repository {
        let mut gtk = Namespace::new("Gtk", "3.0")
            .with_identifier_prefixes(["Gtk"])
            .with_symbol_prefixes(["gtk"]);
        gtk.add(
            EntityDecl::new("Widget", EntityKind::class())
                .with_child(
                    EntityDecl::new(
                        "show",
                        EntityKind::Function(Callable::default().method("widget")),
                    )
                    .with_symbol("gtk_widget_show"),
                )
                .with_child(EntityDecl::new("visible", EntityKind::Property(Default::default())))
                .with_child(EntityDecl::new("destroy", EntityKind::Signal(Callable::default()))),
        );
        gtk.add(EntityDecl::new("main", EntityKind::Function(Callable::default())));
        let mut gobject = Namespace::new("GObject", "2.0")
            .with_identifier_prefixes(["G"])
            .with_symbol_prefixes(["g"]);
        gobject.add(EntityDecl::new("Object", EntityKind::class()));
        Repository::new(gtk).with_include(gobject)
    }

    #[test]
    fn test_resolve_type_across_namespaces() {
        let repo = repo();
        let resolver = Resolver::new(&repo);
        let widget = resolver.resolve_type("GtkWidget").unwrap();
        assert_eq!(repo.qualified_name(widget), "Gtk.Widget");
        let object = resolver.resolve_type("GObject").unwrap();
        assert_eq!(repo.qualified_name(object), "GObject.Object");
        assert!(resolver.resolve_type("GtkMissing").is_none());
        assert!(resolver.resolve_type("Widget").is_none());
    }

    #[test]
    fn test_resolve_symbol_prefers_exact_symbol() {
        let repo = repo();
        let resolver = Resolver::new(&repo);
        let show = resolver.resolve_symbol("gtk_widget_show").unwrap();
        assert_eq!(repo.entity(show).name, "show");
        let main = resolver.resolve_symbol("gtk_main").unwrap();
        assert_eq!(repo.qualified_name(main), "Gtk.main");
        assert!(resolver.resolve_symbol("gtk_nothing").is_none());
        assert!(resolver.resolve_symbol("plain").is_none());
    }

    #[test]
    fn test_children_by_kind() {
        let repo = repo();
        let resolver = Resolver::new(&repo);
        let widget = resolver.resolve_type("GtkWidget").unwrap();
        assert!(resolver.find_property(widget, "visible").is_some());
        assert!(resolver.find_property(widget, "destroy").is_none());
        assert!(resolver.find_signal(widget, "destroy").is_some());
    }
}
