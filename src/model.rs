//! Namespace model
//!
//! The read-only view of introspected declarations the formatter queries. Parsing the
//! introspection format is someone else's job; this model is filled either in code or
//! from a YAML/JSON [`RepositoryDecl`].

pub mod entity;
pub mod namespace;
pub mod repository;

pub use entity::{
    Callable, Entity, EntityDecl, EntityId, EntityKind, Parameter, PropertyFlags,
};
pub use namespace::{Namespace, NamespaceDecl};
pub use repository::{EntityRef, NamespaceId, Repository, RepositoryDecl, UnsplittableIdentifier};
