//! Property tests for the scanner and the formatter

mod common;

use common::{formatter, repository};
use girdoc::markup::escape::escape;
use girdoc::markup::DocstringScanner;
use girdoc::FormatterConfig;
use proptest::prelude::*;

/// Plain prose: no character any markup rule starts with
fn plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.;:!?'-]{0,60}"
}

/// Arbitrary docstring-ish input, markup characters included
fn docstring() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z ]{1,8}",
            Just("\n".to_string()),
            Just("\n\n".to_string()),
            Just("|[".to_string()),
            Just("]|".to_string()),
            "#[A-Za-z]{1,6}",
            "%[A-Z_]{1,6}",
            "@[a-z]{1,4}",
            "[a-z_]{1,6}\\(\\)",
            "#{1,3} [a-z]{1,6}",
            Just("<&>".to_string()),
        ],
        0..20,
    )
    .prop_map(|parts| parts.concat())
}

/// Headings of random levels with some body text in between
fn outline() -> impl Strategy<Value = String> {
    prop::collection::vec((1usize..5, "[a-z]{1,8}", "[a-z ]{0,12}"), 0..8).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(level, title, body)| format!("{} {title}\n{body}\n", "#".repeat(level)))
            .collect()
    })
}

proptest! {
    #[test]
    fn test_scanning_is_deterministic(input in docstring()) {
        let first = DocstringScanner::new().unwrap();
        let second = DocstringScanner::new().unwrap();
        let a: Vec<_> = first.scan(&input).collect();
        let b: Vec<_> = second.scan(&input).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_tokens_cover_the_input(input in docstring()) {
        let scanner = DocstringScanner::new().unwrap();
        let joined: String = scanner.scan(&input).map(|token| token.text).collect();
        prop_assert_eq!(joined, input);
    }

    #[test]
    fn test_plain_text_is_wrapped_once(input in plain_text()) {
        let repo = repository();
        let formatter = formatter(&repo, FormatterConfig::default());
        prop_assert_eq!(formatter.format(None, Some(&input)), format!("<p>{input}</p>"));
    }

    #[test]
    fn test_sections_are_balanced(input in outline()) {
        let repo = repository();
        let formatter = formatter(&repo, FormatterConfig::default());
        let out = formatter.format(None, Some(&input));

        let mut depth = 0i64;
        let mut rest = out.as_str();
        while let Some(at) = rest.find("section>") {
            let closing = rest[..at].ends_with("</");
            depth += if closing { -1 } else { 1 };
            prop_assert!(depth >= 0, "closed more sections than opened: {}", out);
            rest = &rest[at + "section>".len()..];
        }
        prop_assert_eq!(depth, 0, "unbalanced output: {}", out);
    }

    #[test]
    fn test_escaping_is_idempotent(input in any::<String>()) {
        let once = escape(&input);
        prop_assert_eq!(escape(&once), once.clone());
        prop_assert!(!once.contains('<'));
    }

    #[test]
    fn test_arbitrary_docstrings_keep_sections_balanced(input in docstring()) {
        let repo = repository();
        let formatter = formatter(&repo, FormatterConfig::default());
        let out = formatter.format(None, Some(&input));
        prop_assert_eq!(out.matches("<section>").count(), out.matches("</section>").count());
    }
}
