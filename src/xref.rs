//! Cross references
//!
//! - [page_id]: page ids and gtk-doc anchors
//! - [references]: the installed gtk-doc reference index
//! - [linker]: renders `<link>` elements

pub mod linker;
pub mod page_id;
pub mod references;

pub use linker::{Link, Linker};
pub use page_id::{make_gtkdoc_id, make_page_id, node_kind, INDEX_PAGE};
pub use references::{FoundReference, PackageReference, ReferenceMap};
