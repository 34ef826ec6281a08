//! Grammar Composition
//!
//! Builds one alternation regex out of a list of named sub-patterns.
//!
//! ## Placeholders
//!
//! A pattern may embed other patterns by name:
//!
//! ```text
//! <<alpha>>             inline `alpha`, no capture
//! <<type_name:alpha>>   inline `alpha` captured as property `type_name`
//! ```
//!
//! Placeholders are resolved as a dependency graph over the declared specs, once, when
//! the grammar is compiled. Inlined patterns are always wrapped in a non-capturing group
//! and their own aliases are dropped: only the aliases written directly inside a
//! top-level spec become captures, named `<spec>_<alias>` in the final regex and exposed
//! as `<alias>` on the tokens.
//!
//! ## Private specs
//!
//! Specs whose name starts with `!` can be referenced but are never matched on their own.
//!
//! ## Priority
//!
//! The top-level alternatives keep their declaration order, so at a given position the
//! first declared spec that matches wins.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

/// Marks a spec that only exists to be referenced by other specs
pub const PRIVATE_MARKER: char = '!';

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<<([a-zA-Z_:]+)>>").expect("placeholder pattern is valid"));

/// A named pattern, possibly referencing other specs through placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
    pub name: String,
    pub pattern: String,
}

impl PatternSpec {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// Private specs are only used through placeholders
    pub fn is_private(&self) -> bool {
        self.name.starts_with(PRIVATE_MARKER)
    }

    /// The name placeholders use to refer to this spec
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches(PRIVATE_MARKER)
    }
}

/// Fatal grammar configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("pattern `{owner}` references unknown pattern `{reference}`")]
    UnknownReference { owner: String, reference: String },

    #[error("pattern references form a cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("pattern `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("pattern `{owner}` captures `{alias}` more than once")]
    DuplicateAlias { owner: String, alias: String },

    #[error("grammar has no public patterns")]
    Empty,

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Raised by grammars layered on top of this one when an alternative has no meaning
    #[error("grammar alternative `{0}` has no markup construct")]
    UnknownAlternative(String),
}

/// One piece of a parsed spec pattern
#[derive(Debug, Clone)]
enum Piece {
    Literal(String),
    Reference { alias: Option<String>, target: usize },
}

#[derive(Debug)]
struct ParsedSpec {
    name: String,
    private: bool,
    pieces: Vec<Piece>,
}

/// A named capture of an alternative, exposed on tokens under `key`
#[derive(Debug, Clone)]
pub(crate) struct PropertySlot {
    pub(crate) key: String,
    pub(crate) group: usize,
}

/// One top-level alternative of a compiled grammar
#[derive(Debug, Clone)]
pub struct Alternative {
    name: String,
    pub(crate) group: usize,
    pub(crate) properties: Vec<PropertySlot>,
}

impl Alternative {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property names this alternative can yield, in pattern order
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.key.as_str())
    }
}

/// An immutable matcher built from a list of [`PatternSpec`]
#[derive(Debug, Clone)]
pub struct CompiledGrammar {
    pub(crate) regex: Regex,
    pub(crate) alternatives: Vec<Alternative>,
}

impl CompiledGrammar {
    /// Compile `specs` into a single alternation.
    pub fn compile(specs: &[PatternSpec]) -> Result<Self, GrammarError> {
        let parsed = parse_specs(specs)?;
        let mut expander = Expander::new(&parsed);

        let mut branches = Vec::new();
        let mut captures: Vec<(String, Vec<(String, String)>)> = Vec::new();

        for (idx, spec) in parsed.iter().enumerate() {
            if spec.private {
                continue;
            }
            let (body, properties) = expander.expand_named(idx)?;
            branches.push(format!("(?P<{}>{})", spec.name, body));
            captures.push((spec.name.clone(), properties));
        }

        if branches.is_empty() {
            return Err(GrammarError::Empty);
        }

        let source = branches.join("|");
        let regex = Regex::new(&source).map_err(|e| GrammarError::InvalidPattern(e.to_string()))?;

        let groups: HashMap<&str, usize> = regex
            .capture_names()
            .enumerate()
            .filter_map(|(i, name)| name.map(|n| (n, i)))
            .collect();

        let alternatives = captures
            .into_iter()
            .map(|(name, properties)| {
                let group = group_index(&groups, &name)?;
                let properties = properties
                    .into_iter()
                    .map(|(key, group_name)| {
                        Ok(PropertySlot {
                            key,
                            group: group_index(&groups, &group_name)?,
                        })
                    })
                    .collect::<Result<Vec<_>, GrammarError>>()?;
                Ok(Alternative {
                    name,
                    group,
                    properties,
                })
            })
            .collect::<Result<Vec<_>, GrammarError>>()?;

        tracing::debug!(alternatives = alternatives.len(), "compiled docstring grammar");

        Ok(Self {
            regex,
            alternatives,
        })
    }

    /// The top-level alternatives in priority order
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// The composed regex source
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn group_index(groups: &HashMap<&str, usize>, name: &str) -> Result<usize, GrammarError> {
    groups
        .get(name)
        .copied()
        .ok_or_else(|| GrammarError::InvalidPattern(format!("missing capture group `{name}`")))
}

fn parse_specs(specs: &[PatternSpec]) -> Result<Vec<ParsedSpec>, GrammarError> {
    let mut index = HashMap::new();
    for (i, spec) in specs.iter().enumerate() {
        if index.insert(spec.bare_name(), i).is_some() {
            return Err(GrammarError::DuplicateName(spec.bare_name().to_string()));
        }
    }

    specs
        .iter()
        .map(|spec| {
            let mut pieces = Vec::new();
            let mut last = 0;
            for caps in PLACEHOLDER.captures_iter(&spec.pattern) {
                let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                if whole.start() > last {
                    pieces.push(Piece::Literal(spec.pattern[last..whole.start()].to_string()));
                }
                let (alias, reference) = match inner.as_str().split_once(':') {
                    Some((alias, reference)) => (Some(alias.to_string()), reference),
                    None => (None, inner.as_str()),
                };
                let target = *index
                    .get(reference)
                    .ok_or_else(|| GrammarError::UnknownReference {
                        owner: spec.bare_name().to_string(),
                        reference: reference.to_string(),
                    })?;
                pieces.push(Piece::Reference { alias, target });
                last = whole.end();
            }
            if last < spec.pattern.len() {
                pieces.push(Piece::Literal(spec.pattern[last..].to_string()));
            }
            Ok(ParsedSpec {
                name: spec.bare_name().to_string(),
                private: spec.is_private(),
                pieces,
            })
        })
        .collect()
}

/// Resolves placeholders depth-first, memoizing the anonymous expansion of each spec
struct Expander<'a> {
    specs: &'a [ParsedSpec],
    anonymous: Vec<Option<String>>,
    visiting: Vec<usize>,
}

impl<'a> Expander<'a> {
    fn new(specs: &'a [ParsedSpec]) -> Self {
        Self {
            specs,
            anonymous: vec![None; specs.len()],
            visiting: Vec::new(),
        }
    }

    /// Expansion of a top-level spec: its own aliases become named captures.
    ///
    /// Returns the pattern body plus `(property key, capture group name)` pairs.
    fn expand_named(
        &mut self,
        idx: usize,
    ) -> Result<(String, Vec<(String, String)>), GrammarError> {
        let spec = &self.specs[idx];
        let mut body = String::new();
        let mut properties: Vec<(String, String)> = Vec::new();
        let mut seen = HashSet::new();

        self.visiting.push(idx);
        for piece in &spec.pieces {
            match piece {
                Piece::Literal(text) => body.push_str(text),
                Piece::Reference { alias, target } => {
                    let inner = self.expand_anonymous(*target)?;
                    match alias {
                        Some(alias) => {
                            if !seen.insert(alias.as_str()) {
                                return Err(GrammarError::DuplicateAlias {
                                    owner: spec.name.clone(),
                                    alias: alias.clone(),
                                });
                            }
                            let group = format!("{}_{}", spec.name, alias);
                            body.push_str(&format!("(?P<{group}>{inner})"));
                            properties.push((alias.clone(), group));
                        }
                        None => body.push_str(&inner),
                    }
                }
            }
        }
        self.visiting.pop();

        Ok((body, properties))
    }

    /// Expansion used when a spec is inlined: every nested alias stays unnamed.
    fn expand_anonymous(&mut self, idx: usize) -> Result<String, GrammarError> {
        if let Some(done) = &self.anonymous[idx] {
            return Ok(done.clone());
        }
        if let Some(pos) = self.visiting.iter().position(|&v| v == idx) {
            let mut cycle: Vec<String> = self.visiting[pos..]
                .iter()
                .map(|&v| self.specs[v].name.clone())
                .collect();
            cycle.push(self.specs[idx].name.clone());
            return Err(GrammarError::Cycle(cycle));
        }

        self.visiting.push(idx);
        let mut body = String::from("(?:");
        for piece in &self.specs[idx].pieces {
            match piece {
                Piece::Literal(text) => body.push_str(text),
                Piece::Reference { target, .. } => {
                    let inner = self.expand_anonymous(*target)?;
                    body.push_str(&inner);
                }
            }
        }
        body.push(')');
        self.visiting.pop();

        self.anonymous[idx] = Some(body.clone());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(list: &[(&str, &str)]) -> Vec<PatternSpec> {
        list.iter().map(|(n, p)| PatternSpec::new(*n, *p)).collect()
    }

    #[test]
    fn test_private_specs_are_not_alternatives() {
        let grammar = CompiledGrammar::compile(&specs(&[
            ("!word", r"[a-z]+"),
            ("call", r"<<name:word>>\(\)"),
        ]))
        .unwrap();

        let names: Vec<_> = grammar.alternatives().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["call"]);
        assert_eq!(
            grammar.alternatives()[0].property_names().collect::<Vec<_>>(),
            vec!["name"]
        );
    }

    #[test]
    fn test_alias_is_prefixed_with_owner() {
        let grammar = CompiledGrammar::compile(&specs(&[
            ("!word", r"[a-z]+"),
            ("call", r"<<name:word>>\(\)"),
        ]))
        .unwrap();

        assert!(grammar.as_str().contains("(?P<call_name>"));
        assert!(grammar.as_str().starts_with("(?P<call>"));
    }

    #[test]
    fn test_nested_aliases_stay_unnamed() {
        let grammar = CompiledGrammar::compile(&specs(&[
            ("!word", r"[a-z]+"),
            ("!pair", r"<<left:word>>=<<right:word>>"),
            ("assign", r"<<binding:pair>>;"),
        ]))
        .unwrap();

        assert!(!grammar.as_str().contains("left"));
        assert!(!grammar.as_str().contains("right"));
        assert_eq!(
            grammar.alternatives()[0].property_names().collect::<Vec<_>>(),
            vec!["binding"]
        );
    }

    #[test]
    fn test_unknown_reference_is_fatal() {
        let err = CompiledGrammar::compile(&specs(&[("call", r"<<name:missing>>\(\)")]))
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnknownReference {
                owner: "call".into(),
                reference: "missing".into()
            }
        );
    }

    #[test]
    fn test_cycle_is_fatal() {
        let err = CompiledGrammar::compile(&specs(&[
            ("!a", r"x<<b>>"),
            ("!b", r"y<<a>>"),
            ("top", r"<<a>>"),
        ]))
        .unwrap_err();
        assert!(matches!(err, GrammarError::Cycle(_)));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let err = CompiledGrammar::compile(&specs(&[("loop", r"a<<loop>>")])).unwrap_err();
        assert_eq!(err, GrammarError::Cycle(vec!["loop".into(), "loop".into()]));
    }

    #[test]
    fn test_duplicate_names_are_fatal() {
        let err =
            CompiledGrammar::compile(&specs(&[("!a", "x"), ("a", "y")])).unwrap_err();
        assert_eq!(err, GrammarError::DuplicateName("a".into()));
    }

    #[test]
    fn test_duplicate_alias_is_fatal() {
        let err = CompiledGrammar::compile(&specs(&[
            ("!w", "[a-z]+"),
            ("twice", "<<x:w>>-<<x:w>>"),
        ]))
        .unwrap_err();
        assert!(matches!(err, GrammarError::DuplicateAlias { .. }));
    }

    #[test]
    fn test_only_private_specs_is_empty() {
        let err = CompiledGrammar::compile(&specs(&[("!a", "x")])).unwrap_err();
        assert_eq!(err, GrammarError::Empty);
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let err = CompiledGrammar::compile(&specs(&[("bad", "(unclosed")])).unwrap_err();
        assert!(matches!(err, GrammarError::InvalidPattern(_)));
    }

    #[test]
    fn test_inlined_alternation_keeps_precedence() {
        let grammar = CompiledGrammar::compile(&specs(&[
            ("!ab", "a|b"),
            ("wrapped", "x<<ab>>y"),
        ]))
        .unwrap();
        assert!(grammar.regex.is_match("xby"));
        assert!(!grammar.regex.is_match("b"));
    }
}
