//! Shared fixtures: a small `Foo` namespace depending on `GObject`

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use girdoc::model::RepositoryDecl;
use girdoc::{DocFormatter, FormatterConfig, Repository};
use tracing_subscriber::fmt::MakeWriter;

pub const REPOSITORY: &str = r#"
namespace:
  name: Foo
  version: "1.0"
  identifier_prefixes: [Foo]
  symbol_prefixes: [foo]
  exported_packages: [foo-1.0]
  entities:
    - name: bar
      kind: function
      symbol: foo_bar
    - name: Widget
      kind: class
      parent_type: GObject.Object
      interfaces: [Foo.Buildable]
      gtype_name: FooWidget
      children:
        - name: show
          kind: function
          symbol: foo_widget_show
          is_method: true
          instance_parameter: { name: widget }
          parameters:
            - { name: flags }
        - name: visible
          kind: property
          writable: true
        - name: destroy
          kind: signal
    - name: Button
      kind: class
      parent_type: Foo.Widget
      interfaces: [Foo.Buildable, Foo.Activatable]
      gtype_name: FooButton
    - name: Buildable
      kind: interface
    - name: Activatable
      kind: interface
      prerequisites: [Foo.Widget]
    - name: Align
      kind: enum
      children:
        - name: fill
          kind: member
          symbol: FOO_ALIGN_FILL
includes:
  - name: GObject
    version: "2.0"
    identifier_prefixes: [G]
    symbol_prefixes: [g]
    exported_packages: [gobject-2.0]
    entities:
      - name: Object
        kind: class
        gtype_name: GObject
"#;

pub fn repository() -> Repository {
    let decl: RepositoryDecl = serde_yaml::from_str(REPOSITORY).unwrap();
    Repository::from_decl(decl)
}

pub fn formatter(repo: &Repository, config: FormatterConfig) -> DocFormatter<'_> {
    DocFormatter::new(repo, config).unwrap()
}

/// Format `doc` as documentation of `owner` with the default configuration
pub fn render(owner: Option<&str>, doc: &str) -> String {
    let repo = repository();
    let formatter = formatter(&repo, FormatterConfig::default());
    let owner = owner.map(|name| repo.lookup_qualified(name).unwrap());
    formatter.format(owner, Some(doc))
}

#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` and return its result along with the warnings it logged
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, captured.contents())
}
