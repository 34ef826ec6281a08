//! Output languages
//!
//! The documentation can be written for C, Python or Gjs consumers. The language decides
//! how literals, parameters and callables are spelled in the rendered text.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::{Entity, EntityKind, EntityRef, Parameter, Repository};
use crate::xref::page_id::make_page_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Python,
    Gjs,
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Language::C),
            "python" => Ok(Language::Python),
            "gjs" => Ok(Language::Gjs),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::C => "C",
            Language::Python => "Python",
            Language::Gjs => "Gjs",
        })
    }
}

/// MIME type for a `|[<!-- language="..." -->` tag, case-insensitive
pub fn code_mime_type(tag: &str) -> Option<&'static str> {
    Some(match tag.to_ascii_lowercase().as_str() {
        "bash-script" | "shell" => "application/x-shellscript",
        "csharp" => "text/x-csharp",
        "css" => "text/css",
        "diff" => "text/xpatch",
        "html" => "text/html",
        "java" => "text/x-java",
        "javascript" => "application/javascript",
        "lisp" => "text/x-scheme",
        "lua" => "text/x-lua",
        "c" => "text/x-csrc",
        "c++" => "text/x-c++src",
        "pascal" => "text/x-pascal",
        "perl" => "application/x-perl",
        "php" => "application/x-php",
        "python" => "text/x-python",
        "ruby" => "application/x-ruby",
        "sql" => "text/x-sql",
        "yaml" => "application/x-yaml",
        _ => return None,
    })
}

impl Language {
    /// MIME type of code written in this language
    pub fn mime_type(self) -> &'static str {
        match self {
            Language::C => "text/x-csrc",
            Language::Python => "text/python",
            Language::Gjs => "text/x-gjs",
        }
    }

    /// Spelling of `%TRUE`, `%FALSE` and `%NULL`
    pub fn fundamental(self, name: &str) -> Option<&'static str> {
        let (t, f, n) = match self {
            Language::C => ("TRUE", "FALSE", "NULL"),
            Language::Python => ("True", "False", "None"),
            Language::Gjs => ("true", "false", "null"),
        };
        match name {
            "TRUE" => Some(t),
            "FALSE" => Some(f),
            "NULL" => Some(n),
            _ => None,
        }
    }

    /// Display name of a parameter of `callable`
    pub fn parameter_name(self, callable: &Entity, parameter: &Parameter) -> String {
        let is_instance = callable
            .callable()
            .is_some_and(|c| c.is_instance_parameter(parameter));
        if self == Language::Python && callable.is_method() && is_instance {
            "self".into()
        } else if parameter.varargs {
            "...".into()
        } else {
            parameter.name.clone()
        }
    }

    /// Display name of a function
    pub fn function_name(self, repo: &Repository, function: EntityRef) -> String {
        let entity = repo.entity(function);
        let parent = repo.parent(function);
        match self {
            Language::C => match (&entity.kind, &entity.symbol) {
                (EntityKind::Function(_), Some(symbol)) => symbol.clone(),
                _ => entity.name.clone(),
            },
            Language::Python => match parent {
                Some(parent) => format!("{}.{}", self.page_name(repo, parent), entity.name),
                None => entity.name.clone(),
            },
            Language::Gjs => {
                let name = entity.shadows().unwrap_or(&entity.name);
                match parent {
                    Some(parent) if entity.is_method() => {
                        format!("{}.prototype.{}", self.page_name(repo, parent), name)
                    }
                    Some(parent) => format!("{}.{}", self.page_name(repo, parent), name),
                    None => name.to_string(),
                }
            }
        }
    }

    /// Human readable page name, used as the text of external links
    pub fn page_name(self, repo: &Repository, entity: EntityRef) -> String {
        let node = repo.entity(entity);
        let Some(parent) = repo.parent(entity) else {
            return match node.kind {
                EntityKind::Function(_) => self.function_name(repo, entity),
                _ => make_page_id(repo, entity),
            };
        };

        match (&node.kind, self) {
            (EntityKind::Field | EntityKind::Property(_), Language::Gjs) => {
                format!("{}.{}", self.page_name(repo, parent), to_underscores(node))
            }
            (EntityKind::Function(_), _) => self.function_name(repo, entity),
            (EntityKind::Property(_), _) => {
                format!("{}:{}", self.page_name(repo, parent), node.name)
            }
            (EntityKind::Signal(_) | EntityKind::VFunction(_), _) => {
                format!("{}::{}", self.page_name(repo, parent), node.name)
            }
            (EntityKind::Field, _) => format!("{}->{}", self.page_name(repo, parent), node.name),
            _ => make_page_id(repo, entity),
        }
    }

    /// Whether a page should be generated for `entity`
    pub fn should_render(self, repo: &Repository, entity: EntityRef) -> bool {
        let node = repo.entity(entity);
        if node.private {
            return false;
        }
        if self == Language::C {
            return true;
        }

        if !node.introspectable {
            return false;
        }
        if matches!(&node.kind, EntityKind::Function(c) if c.shadowed_by.is_some()) {
            return false;
        }

        match self {
            Language::Python => !node.is_constructor(),
            Language::Gjs => {
                let parent_kind = repo.parent(entity).map(|p| &repo.entity(p).kind);
                !(matches!(node.kind, EntityKind::Field)
                    && matches!(
                        parent_kind,
                        Some(EntityKind::Class { .. } | EntityKind::Union)
                    ))
            }
            Language::C => true,
        }
    }
}

/// `can-focus` -> `can_focus`, `lastChild` -> `last_child`
fn to_underscores(node: &Entity) -> String {
    if matches!(node.kind, EntityKind::Property(_)) {
        return node.name.replace('-', "_");
    }
    let mut out = String::with_capacity(node.name.len() + 4);
    let mut previous: Option<char> = None;
    for c in node.name.chars() {
        if c.is_ascii_uppercase() && previous.is_some_and(|p| !p.is_ascii_uppercase() && p != '_') {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
        previous = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Callable, EntityDecl, Namespace};
    use rstest::rstest;

    #[rstest]
    #[case("c", Language::C)]
    #[case("Python", Language::Python)]
    #[case("GJS", Language::Gjs)]
    fn test_language_names(#[case] input: &str, #[case] expected: Language) {
        assert_eq!(input.parse::<Language>().unwrap(), expected);
    }

    #[test]
    fn test_unsupported_language_is_fatal() {
        let err = "perl".parse::<Language>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(l) if l == "perl"));
    }

    #[rstest]
    #[case("python", Some("text/x-python"))]
    #[case("PYTHON", Some("text/x-python"))]
    #[case("c", Some("text/x-csrc"))]
    #[case("javascript", Some("application/javascript"))]
    #[case("shell", Some("application/x-shellscript"))]
    #[case("cobol", None)]
    fn test_code_mime_types(#[case] tag: &str, #[case] expected: Option<&str>) {
        assert_eq!(code_mime_type(tag), expected);
    }

    #[rstest]
    #[case(Language::C, "NULL", Some("NULL"))]
    #[case(Language::Python, "TRUE", Some("True"))]
    #[case(Language::Gjs, "FALSE", Some("false"))]
    #[case(Language::Python, "MAYBE", None)]
    fn test_fundamentals(
        #[case] lang: Language,
        #[case] name: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(lang.fundamental(name), expected);
    }

    fn repo() -> (Repository, EntityRef, EntityRef) {
        let mut ns = Namespace::new("Gtk", "3.0");
        ns.add(
            EntityDecl::new("Button", EntityKind::class())
                .with_child(
                    EntityDecl::new(
                        "set_label",
                        EntityKind::Function(Callable::with_parameters(["label"]).method("button")),
                    )
                    .with_symbol("gtk_button_set_label"),
                )
                .with_child(EntityDecl::new(
                    "use-underline",
                    EntityKind::Property(Default::default()),
                )),
        );
        let repo = Repository::new(ns);
        let set_label = repo.lookup_qualified("Gtk.Button.set_label").unwrap();
        let prop = repo.lookup_qualified("Gtk.Button.use-underline").unwrap();
        (repo, set_label, prop)
    }

    #[test]
    fn test_python_names_instance_parameter_self() {
        let (repo, set_label, _) = repo();
        let entity = repo.entity(set_label);
        let callable = entity.callable().unwrap();
        let instance = callable.parameter("button").unwrap();
        let label = callable.parameter("label").unwrap();

        assert_eq!(Language::Python.parameter_name(entity, instance), "self");
        assert_eq!(Language::C.parameter_name(entity, instance), "button");
        assert_eq!(Language::Python.parameter_name(entity, label), "label");
        assert_eq!(Language::C.parameter_name(entity, &Parameter::varargs()), "...");
    }

    #[test]
    fn test_function_names() {
        let (repo, set_label, _) = repo();
        assert_eq!(Language::C.function_name(&repo, set_label), "gtk_button_set_label");
        assert_eq!(Language::Python.function_name(&repo, set_label), "Gtk.Button.set_label");
        assert_eq!(
            Language::Gjs.function_name(&repo, set_label),
            "Gtk.Button.prototype.set_label"
        );
    }

    #[test]
    fn test_property_page_names() {
        let (repo, _, prop) = repo();
        assert_eq!(Language::C.page_name(&repo, prop), "Gtk.Button:use-underline");
        assert_eq!(Language::Gjs.page_name(&repo, prop), "Gtk.Button.use_underline");
    }
}
