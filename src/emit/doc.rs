//! Turn a [`DocInfo`] into `///` comment lines.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::emit::writer::CodeWriter;
use crate::model::DocInfo;

static SUSPICIOUS_BOOL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)default(?:s)?\s+to\s+true",
        r"(?i)default\s+is\s+true",
        r"(?i)true\s+by\s+default",
        r"(?i)if\s+omitted[^.\n]*true",
        r"(?i)when\s+omitted[^.\n]*true",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Whether `documentation` reads like it's claiming `true` as the
/// default-when-omitted value for an optional boolean.
pub fn suggests_true_default(documentation: &str) -> bool {
    let doc = documentation.trim();
    if doc.is_empty() {
        return false;
    }
    SUSPICIOUS_BOOL_PATTERNS.iter().any(|re| re.is_match(doc))
}

fn mentions_tag(documentation: &Option<String>, tag: &str) -> bool {
    documentation
        .as_deref()
        .map(|d| d.contains(&format!("@{tag}")))
        .unwrap_or(false)
}

/// Build the full `///` comment body for a doc-bearing node: the raw
/// documentation text (split on newlines), followed by any `@since`,
/// `@sinceTags`, `@deprecated`, `@proposed` tag lines not already present
/// verbatim in the documentation text.
pub fn build_doc_lines(doc: &DocInfo) -> Vec<String> {
    let mut lines: Vec<String> = doc
        .documentation
        .as_deref()
        .map(|d| d.lines().map(str::to_string).collect())
        .unwrap_or_default();

    let has_since = mentions_tag(&doc.documentation, "since");
    let has_since_tags = mentions_tag(&doc.documentation, "sinceTags");
    let has_deprecated = mentions_tag(&doc.documentation, "deprecated");
    let has_proposed = mentions_tag(&doc.documentation, "proposed");

    if let Some(since) = &doc.since {
        if !has_since {
            lines.push(format!("@since {since}"));
        }
    }
    if !doc.since_tags.is_empty() && !has_since && !has_since_tags {
        lines.push(format!("@sinceTags {}", doc.since_tags.join(", ")));
    }
    if let Some(deprecated) = &doc.deprecated {
        if !has_deprecated {
            lines.push(format!("@deprecated {deprecated}"));
        }
    }
    if doc.proposed && !has_proposed {
        lines.push("@proposed".to_string());
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Append `///`-prefixed comment lines to the writer at the writer's
/// current indentation. A no-op when `comments` is empty.
pub fn write_doc(w: &mut CodeWriter, comments: &[String]) {
    for line in comments {
        if line.is_empty() {
            w.line("///");
        } else {
            w.line(&format!("/// {line}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_documentation_is_split_into_lines() {
        let doc = DocInfo {
            documentation: Some("line one\nline two".to_string()),
            ..Default::default()
        };
        assert_eq!(build_doc_lines(&doc), vec!["line one", "line two"]);
    }

    #[test]
    fn since_and_proposed_tags_are_appended_once() {
        let doc = DocInfo {
            documentation: Some("does a thing".to_string()),
            since: Some("3.17.0".to_string()),
            proposed: true,
            ..Default::default()
        };
        assert_eq!(
            build_doc_lines(&doc),
            vec!["does a thing", "@since 3.17.0", "@proposed"]
        );
    }

    #[test]
    fn existing_since_tag_is_not_duplicated() {
        let doc = DocInfo {
            documentation: Some("@since 3.17.0 already here".to_string()),
            since: Some("3.17.0".to_string()),
            ..Default::default()
        };
        assert_eq!(build_doc_lines(&doc), vec!["@since 3.17.0 already here"]);
    }

    #[test]
    fn detects_suspicious_true_default_phrasing() {
        assert!(suggests_true_default("If omitted the server assumes true."));
        assert!(suggests_true_default("Defaults to true when absent."));
        assert!(!suggests_true_default("Controls whether X is enabled."));
        assert!(!suggests_true_default(""));
    }
}
