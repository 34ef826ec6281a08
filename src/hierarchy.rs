//! Class hierarchy trees
//!
//! The hierarchy of one type is built by walking its parent chain and its interfaces.
//! Nodes are memoized by qualified name so a type reached twice (a diamond through two
//! interfaces, say) appears once. Interfaces hang under a synthetic `GObject.GInterface`
//! root, as they don't inherit from anything themselves.
//!
//! The dump walks down from every root reachable from the starting type:
//!
//! ```text
//! <tree>
//!       <item>
//!         <link xref="GObject.Object">GObject.Object</link>
//!         <item>
//!           <link xref="Gtk.Widget">Gtk.Widget</link>
//!         </item>
//!       </item>
//!     </tree>
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::model::{EntityKind, EntityRef, Repository};
use crate::xml::Element;
use crate::xref::Linker;

/// Qualified name of the synthetic root of all interfaces
pub const BASE_INTERFACE: &str = "GObject.GInterface";

/// Indentation level of the dumped tree inside a page template
const DUMP_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyClass {
    pub name: String,
    /// None for the synthetic base interface and for parents missing from the repository
    pub entity: Option<EntityRef>,
    pub parents: Vec<ClassId>,
    pub children: Vec<ClassId>,
}

#[derive(Debug, Clone)]
pub struct Hierarchy {
    classes: Vec<HierarchyClass>,
    by_name: HashMap<String, ClassId>,
    start: ClassId,
}

impl Hierarchy {
    /// Build the hierarchy around `entity`
    pub fn build(repo: &Repository, entity: EntityRef) -> Self {
        let mut hierarchy = Hierarchy {
            classes: Vec::new(),
            by_name: HashMap::new(),
            start: ClassId(0),
        };
        let (start, _) = hierarchy.class_for(repo.qualified_name(entity), Some(entity));
        hierarchy.start = start;
        hierarchy.add_parents(repo, entity, start);
        if matches!(repo.entity(entity).kind, EntityKind::Interface { .. }) {
            let base = hierarchy.base_interface();
            hierarchy.link(start, base);
        }
        hierarchy
    }

    /// The type the hierarchy was built for
    pub fn start(&self) -> ClassId {
        self.start
    }

    pub fn class(&self, id: ClassId) -> &HierarchyClass {
        &self.classes[id.0]
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Every node without parents reachable upwards from `from`
    pub fn get_leaves(&self, from: ClassId) -> BTreeSet<ClassId> {
        let mut leaves = BTreeSet::new();
        let mut stack = vec![from];
        let mut seen = BTreeSet::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let class = self.class(id);
            if class.parents.is_empty() {
                leaves.insert(id);
            }
            stack.extend(class.parents.iter().copied());
        }
        leaves
    }

    /// Roots of the start type, in the order they are dumped (descending by name)
    pub fn roots(&self) -> Vec<ClassId> {
        let mut roots: Vec<ClassId> = self.get_leaves(self.start).into_iter().collect();
        roots.sort_by(|a, b| self.class(*b).name.cmp(&self.class(*a).name));
        roots
    }

    /// The `<tree>` element for the start type
    pub fn to_element(&self, linker: &Linker<'_>) -> Element {
        let mut tree = Element::new("tree");
        for root in self.roots() {
            tree.push(self.item(linker, root, &mut Vec::new()));
        }
        tree
    }

    /// `path` holds the ancestors of `id` in the dump; a child already on it closes a
    /// cycle in the repository's parent chain and is not descended into
    fn item(&self, linker: &Linker<'_>, id: ClassId, path: &mut Vec<ClassId>) -> Element {
        let class = self.class(id);
        let mut item = Element::new("item");
        item.push(linker.link(class.entity, Some(&class.name), false).into_element());
        path.push(id);
        for &child in &class.children {
            if path.contains(&child) {
                continue;
            }
            item.push(self.item(linker, child, path));
        }
        path.pop();
        item
    }

    /// Indented markup of the tree
    pub fn dump(&self, linker: &Linker<'_>) -> String {
        let mut tree = self.to_element(linker);
        tree.indent(DUMP_INDENT);
        tree.tail = None;
        tree.to_markup()
    }

    fn class_for(&mut self, name: String, entity: Option<EntityRef>) -> (ClassId, bool) {
        if let Some(&id) = self.by_name.get(&name) {
            return (id, false);
        }
        let id = ClassId(self.classes.len());
        self.by_name.insert(name.clone(), id);
        self.classes.push(HierarchyClass {
            name,
            entity,
            parents: Vec::new(),
            children: Vec::new(),
        });
        (id, true)
    }

    fn base_interface(&mut self) -> ClassId {
        self.class_for(BASE_INTERFACE.to_string(), None).0
    }

    fn link(&mut self, child: ClassId, parent: ClassId) {
        if child == parent || self.classes[child.0].parents.contains(&parent) {
            return;
        }
        self.classes[child.0].parents.push(parent);
        self.classes[parent.0].children.push(child);
    }

    fn add_parents(&mut self, repo: &Repository, entity: EntityRef, class: ClassId) {
        let EntityKind::Class {
            parent_type,
            interfaces,
            ..
        } = &repo.entity(entity).kind
        else {
            return;
        };

        let mut inherited: &[String] = &[];
        if let Some(parent_type) = parent_type {
            let parent = repo.lookup_qualified(parent_type);
            if let Some(EntityKind::Class { interfaces, .. }) = parent.map(|p| &repo.entity(p).kind)
            {
                inherited = interfaces;
            }
            let (parent_class, created) = self.class_for(parent_type.clone(), parent);
            self.link(class, parent_class);
            if let Some(parent) = parent.filter(|_| created) {
                self.add_parents(repo, parent, parent_class);
            }
        }

        for interface in interfaces {
            if inherited.contains(interface) {
                continue;
            }
            let target = repo.lookup_qualified(interface);
            let (interface_class, _) = self.class_for(interface.clone(), target);
            self.link(class, interface_class);
            let base = self.base_interface();
            self.link(interface_class, base);
        }
    }
}
