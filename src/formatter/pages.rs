//! Helpers for page templates

use super::DocFormatter;
use crate::hierarchy::Hierarchy;
use crate::model::{EntityKind, EntityRef};
use crate::xml::build_tag;
use crate::xref::{make_page_id, node_kind};

/// Navigation direction between pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    fn link_type(self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Previous => "previous",
        }
    }
}

/// `A`, `A and B`, `A, B and C`
fn join_and<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} and {}", init.join(", "), last.as_ref())
        }
    }
}

impl<'r> DocFormatter<'r> {
    /// Render a link to `entity`, see [`Linker::format_xref`](crate::xref::Linker::format_xref)
    pub fn format_xref(
        &self,
        entity: Option<EntityRef>,
        linkname: Option<&str>,
        pluralize: bool,
    ) -> String {
        self.linker.format_xref(entity, linkname, pluralize)
    }

    /// Page id of a C symbol or, failing that, a C type; empty when neither resolves
    pub fn format_xref_from_identifier(&self, identifier: &str) -> String {
        self.resolver
            .resolve_symbol(identifier)
            .or_else(|| self.resolver.resolve_type(identifier))
            .map(|entity| make_page_id(self.repo, entity))
            .unwrap_or_default()
    }

    pub fn link_next_doc(&self, entity: EntityRef) -> String {
        self.link_doc(entity, Direction::Next)
    }

    pub fn link_prev_doc(&self, entity: EntityRef) -> String {
        self.link_doc(entity, Direction::Previous)
    }

    /// `<link xref="..." type="next"/>` to the neighbouring page, or nothing.
    ///
    /// Functions move along the symbols of their section, types and doc sections move
    /// between sections.
    pub fn link_doc(&self, entity: EntityRef, direction: Direction) -> String {
        let Some(sections) = &self.sections else {
            return String::new();
        };
        let node = self.repo.entity(entity);

        let neighbour_section = |title: &str| match direction {
            Direction::Next => sections.next_section(title),
            Direction::Previous => sections.previous_section(title),
        };
        let target = match &node.kind {
            EntityKind::Function(_) => node.symbol.as_deref().and_then(|symbol| match direction {
                Direction::Next => sections.next_symbol(symbol),
                Direction::Previous => sections.previous_symbol(symbol),
            }),
            EntityKind::Class { .. } | EntityKind::Interface { .. } => node
                .gtype_name()
                .and_then(neighbour_section)
                .map(|section| section.title.as_str()),
            EntityKind::DocSection => {
                neighbour_section(&node.name).map(|section| section.title.as_str())
            }
            _ => None,
        };

        let Some(target) = target else {
            return String::new();
        };
        let page_id = self.format_xref_from_identifier(target);
        if page_id.is_empty() {
            return String::new();
        }
        build_tag(
            "link",
            &[("xref", &page_id), ("type", direction.link_type())],
            None,
        )
    }

    /// `Read / Write / Construct / Construct Only`, as they apply
    pub fn format_property_flags(&self, property: EntityRef, construct_only: bool) -> String {
        let EntityKind::Property(flags) = &self.repo.entity(property).kind else {
            return String::new();
        };
        let mut out = Vec::new();
        if flags.readable && !construct_only {
            out.push("Read");
        }
        if flags.writable && !construct_only {
            out.push("Write");
        }
        if flags.construct {
            out.push("Construct");
        }
        if flags.construct_only {
            out.push("Construct Only");
        }
        out.join(" / ")
    }

    /// Prerequisites of an interface, `GObject.Object` when none are declared
    pub fn format_prerequisites(&self, interface: EntityRef) -> String {
        match &self.repo.entity(interface).kind {
            EntityKind::Interface { prerequisites, .. } if !prerequisites.is_empty() => {
                join_and(prerequisites.as_slice())
            }
            _ => "GObject.Object".to_string(),
        }
    }

    /// Classes of the interface's namespace implementing it
    pub fn format_known_implementations(&self, interface: EntityRef) -> String {
        let node = self.repo.entity(interface);
        let qualified = self.repo.qualified_name(interface);
        let namespace = self.repo.namespace(interface.namespace);

        let implementations: Vec<&str> = namespace
            .entities()
            .filter(|(_, entity)| entity.parent.is_none())
            .filter_map(|(_, entity)| match &entity.kind {
                EntityKind::Class { interfaces, .. } if interfaces.contains(&qualified) => {
                    Some(entity.name.as_str())
                }
                _ => None,
            })
            .collect();

        if implementations.is_empty() {
            "None".to_string()
        } else {
            format!("{} is implemented by {}", node.name, join_and(implementations.as_slice()))
        }
    }

    pub fn should_render(&self, entity: EntityRef) -> bool {
        self.language.should_render(self.repo, entity)
    }

    pub fn node_kind(&self, entity: EntityRef) -> &'static str {
        node_kind(self.repo, entity)
    }

    pub fn format_function_name(&self, function: EntityRef) -> String {
        self.language.function_name(self.repo, function)
    }

    pub fn format_page_name(&self, entity: EntityRef) -> String {
        self.language.page_name(self.repo, entity)
    }

    /// The indented `<tree>` of a type's class hierarchy
    pub fn dump_class_hierarchy(&self, entity: EntityRef) -> String {
        Hierarchy::build(self.repo, entity).dump(&self.linker)
    }
}
