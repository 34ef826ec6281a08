//! # girdoc
//!
//! Renders the markup of API documentation comments (`#GtkWidget`, `%TRUE`,
//! `gtk_widget_show()`, `|[ code ]|`, `# Heading`, ...) into page markup with
//! cross-reference links, for documentation generated from introspection data.
//!
//! - [markup]: the grammar compiler, scanner and docstring tokens
//! - [model]: the queryable namespace model
//! - [resolve]: type and symbol lookup
//! - [xref]: page ids, gtk-doc references and link rendering
//! - [formatter]: the docstring transducer and page helpers
//! - [hierarchy]: class hierarchy trees
//! - [sections]: next/previous page ordering
//! - [language]: per-language spelling
//! - [config]: formatter configuration
//!
//! ```text
//! let repo = Repository::load(Path::new("gtk.yaml"))?;
//! let formatter = DocFormatter::new(&repo, FormatterConfig::default())?;
//! let owner = repo.lookup_qualified("Gtk.Widget.show");
//! println!("{}", formatter.format(owner, Some("Shows @widget. See gtk_widget_hide().")));
//! ```

pub mod config;
pub mod error;
pub mod formatter;
pub mod hierarchy;
pub mod language;
pub mod markup;
pub mod model;
pub mod resolve;
pub mod sections;
pub mod xml;
pub mod xref;

pub use config::FormatterConfig;
pub use error::{Error, Result};
pub use formatter::{DocFormatter, TransducerState};
pub use hierarchy::Hierarchy;
pub use language::Language;
pub use model::{EntityRef, Repository};
pub use sections::SectionsIndex;
