//! Cross-reference links
//!
//! Entities of the documented namespace link to their page by id. Foreign entities link
//! to the page of their own namespace's documentation, or into an installed gtk-doc
//! reference when that is enabled. Incomplete gtk-doc references are reported once per
//! namespace.

use std::cell::RefCell;
use std::collections::HashSet;

use super::page_id::{make_gtkdoc_id, make_page_id, INDEX_PAGE};
use super::references::{FoundReference, ReferenceMap};
use crate::language::Language;
use crate::model::{EntityKind, EntityRef, Repository};
use crate::xml::{build_tag, Element};

/// The attributes and text of a `<link>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub attrs: Vec<(&'static str, String)>,
    pub text: Option<String>,
}

impl Link {
    fn new(key: &'static str, value: impl Into<String>, text: Option<String>) -> Self {
        Self {
            attrs: vec![(key, value.into())],
            text,
        }
    }

    pub fn to_markup(&self) -> String {
        let attrs: Vec<(&str, &str)> = self.attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        build_tag("link", &attrs, self.text.as_deref())
    }

    pub fn into_element(self) -> Element {
        let mut element = Element::new("link");
        element.attrs = self.attrs.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        element.text = self.text;
        element
    }
}

/// Builds links for one rendering run
#[derive(Debug)]
pub struct Linker<'r> {
    repo: &'r Repository,
    language: Language,
    references: ReferenceMap,
    link_to_gtk_doc: bool,
    online: bool,
    warned: RefCell<HashSet<String>>,
}

impl<'r> Linker<'r> {
    pub fn new(repo: &'r Repository, language: Language) -> Self {
        Self {
            repo,
            language,
            references: ReferenceMap::new(),
            link_to_gtk_doc: false,
            online: false,
            warned: RefCell::new(HashSet::new()),
        }
    }

    /// Link foreign entities into `references`
    pub fn with_gtk_doc(mut self, references: ReferenceMap, online: bool) -> Self {
        self.references = references;
        self.link_to_gtk_doc = true;
        self.online = online;
        self
    }

    pub fn repository(&self) -> &'r Repository {
        self.repo
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Namespaces a gtk-doc warning was already emitted for
    pub fn warned_namespaces(&self) -> Vec<String> {
        let mut warned: Vec<String> = self.warned.borrow().iter().cloned().collect();
        warned.sort();
        warned
    }

    /// Render a link to `entity`.
    ///
    /// Without an entity the link points at the namespace index. Enum members link to
    /// their enum page followed by `.member`, except when they are linked into gtk-doc.
    pub fn format_xref(
        &self,
        entity: Option<EntityRef>,
        linkname: Option<&str>,
        pluralize: bool,
    ) -> String {
        if let Some(entity) = entity {
            let node = self.repo.entity(entity);
            let member_page = matches!(node.kind, EntityKind::Member)
                && (!self.link_to_gtk_doc || self.repo.is_current(entity));
            if let Some(parent) = self.repo.parent(entity).filter(|_| member_page) {
                return format!(
                    "{}.{}",
                    self.format_xref(Some(parent), linkname, pluralize),
                    node.name
                );
            }
        }
        self.link(entity, linkname, pluralize).to_markup()
    }

    /// The link element for `entity`, without the enum member suffix
    pub fn link(&self, entity: Option<EntityRef>, linkname: Option<&str>, pluralize: bool) -> Link {
        let linkname = linkname.filter(|l| !l.is_empty()).map(str::to_string);
        let Some(entity) = entity else {
            return Link::new("xref", INDEX_PAGE, linkname);
        };

        if self.repo.is_current(entity) {
            let page_id = make_page_id(self.repo, entity);
            let text = linkname.or_else(|| pluralize.then(|| format!("{page_id}s")));
            return Link::new("xref", page_id, text);
        }

        let href = if self.link_to_gtk_doc {
            self.gtk_doc_href(entity)
        } else {
            let ns = self.repo.namespace(entity.namespace);
            format!(
                "../{}-{}/{}.html",
                ns.name,
                ns.version,
                make_page_id(self.repo, entity)
            )
        };
        let text = linkname.unwrap_or_else(|| {
            let name = self.language.page_name(self.repo, entity);
            if pluralize {
                format!("{name}s")
            } else {
                name
            }
        });
        Link::new("href", href, Some(text))
    }

    fn gtk_doc_href(&self, entity: EntityRef) -> String {
        let ns = self.repo.namespace(entity.namespace);
        let found = self.references.find(&ns.exported_packages);
        self.warn_incomplete_reference(&ns.name, &ns.version, found.as_ref());

        let Some(found) = found else {
            return format!("FIXME broken link to {}", self.repo.entity(entity).name);
        };
        let anchor = make_gtkdoc_id(self.repo, entity);
        let Some(href) = found.reference.anchors.get(&anchor) else {
            return format!("FIXME broken link to {}", self.repo.entity(entity).name);
        };
        // Anchors are relative to the reference root, starting with the package directory
        let page = href.split_once('/').map_or(href.as_str(), |(_, page)| page);

        match (&found.reference.online, self.online) {
            (Some(online), true) => format!("{}/{page}", online.trim_end_matches('/')),
            _ => found.reference.dir.join(page).display().to_string(),
        }
    }

    fn warn_incomplete_reference(
        &self,
        namespace: &str,
        version: &str,
        found: Option<&FoundReference<'_>>,
    ) {
        if self.warned.borrow().contains(namespace) {
            return;
        }
        let warned = match found {
            None => {
                tracing::warn!("No reference found for {namespace}{version}");
                true
            }
            Some(found) if self.online && found.reference.online.is_none() => {
                tracing::warn!("No online reference found for {namespace}{version}");
                true
            }
            Some(found) if !found.exact => {
                tracing::warn!(
                    "Using an approximate match for reference {namespace}{version}:{}",
                    found.reference.dir.display()
                );
                true
            }
            Some(_) => false,
        };
        if warned {
            self.warned.borrow_mut().insert(namespace.to_string());
        }
    }
}
