//! Page identifiers
//!
//! Every entity gets a stable page id (`Gtk.Widget`, `Gtk.Widget.show`,
//! `Gtk.Widget-can-focus`) and, for linking into gtk-doc references, the anchor gtk-doc
//! would have generated for it (`GtkWidget`, `gtk-widget-show`, `GTK-ALIGN-FILL:CAPS`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{EntityKind, EntityRef, Repository};

/// Page id of the namespace index
pub const INDEX_PAGE: &str = "index";

static CAMEL_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("camel word pattern is valid"));
static CAMEL_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("camel tail pattern is valid"));

/// Page id of an entity, unique within its namespace
pub fn make_page_id(repo: &Repository, entity: EntityRef) -> String {
    let node = repo.entity(entity);
    let name = node.shadows().unwrap_or(&node.name);

    let Some(parent) = repo.parent(entity) else {
        return format!("{}.{}", repo.namespace(entity.namespace).name, name);
    };

    let parent_id = make_page_id(repo, parent);
    match node.kind {
        EntityKind::Property(_)
        | EntityKind::Signal(_)
        | EntityKind::VFunction(_)
        | EntityKind::Field => format!("{parent_id}-{}", node.name),
        _ => format!("{parent_id}.{name}"),
    }
}

/// `GtkWidget` style, used for types
fn class_style(name: &str) -> String {
    name.to_string()
}

/// `gtk-widget-show` style, used for everything else
fn function_style(name: &str) -> String {
    let snake = CAMEL_WORD.replace_all(name, "${1}_${2}");
    let snake = CAMEL_TAIL.replace_all(&snake, "${1}_${2}");
    snake.to_lowercase().replace('_', "-")
}

/// The anchor gtk-doc generates for an entity.
///
/// Types are spelled `GtkWidget`, everything else `gtk-widget-show`; the style picked for
/// the entity itself is used for its whole parent chain.
pub fn make_gtkdoc_id(repo: &Repository, entity: EntityRef) -> String {
    let node = repo.entity(entity);
    let id = if node.is_type() {
        gtkdoc_id(repo, entity, "", class_style)
    } else {
        gtkdoc_id(repo, entity, "-", function_style)
    };
    match node.kind {
        EntityKind::Constant | EntityKind::Member => format!("{}:CAPS", id.to_uppercase()),
        _ => id,
    }
}

fn gtkdoc_id(
    repo: &Repository,
    entity: EntityRef,
    separator: &str,
    style: fn(&str) -> String,
) -> String {
    let node = repo.entity(entity);
    let name = style(node.shadows().unwrap_or(&node.name));
    let prefix = match repo.parent(entity) {
        Some(parent) => gtkdoc_id(repo, parent, separator, style),
        None => style(&repo.namespace(entity.namespace).name),
    };
    format!("{prefix}{separator}{name}")
}

/// Kind name used to pick a page template
pub fn node_kind(repo: &Repository, entity: EntityRef) -> &'static str {
    let node = repo.entity(entity);
    match &node.kind {
        EntityKind::Class { .. } | EntityKind::Boxed | EntityKind::Union => "class",
        EntityKind::Record => "record",
        EntityKind::Interface { .. } => "interface",
        EntityKind::Function(c) if c.is_method => "method",
        EntityKind::Function(c) if c.is_constructor => "constructor",
        EntityKind::Function(_) => "function",
        EntityKind::Enum | EntityKind::Bitfield => "enum",
        EntityKind::Property(_) if node.parent.is_some() => "property",
        EntityKind::Signal(_) => "signal",
        EntityKind::VFunction(_) => "vfunc",
        EntityKind::Callback(_) => "callback",
        EntityKind::Field => "field",
        EntityKind::DocSection => "docsection",
        _ => "default",
    }
}
