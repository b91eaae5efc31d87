//! `safe.enum('Type', 'Value')` scanning and rewriting.
//!
//! A single left-to-right pass over non-overlapping matches. Valid references
//! become the SQL literal `'Value'`; invalid ones stay as written and are
//! reported. Rewritten output is never rescanned.

use crate::enum_index::EnumIndex;
use crate::error::ValidationError;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

/// Whitespace is tolerated around the comma and just inside the parentheses,
/// never inside the quotes or between `safe.enum` and `(`.
static ANNOTATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"safe\.enum\([\t\n\f\r ]*'([A-Za-z0-9_-]+)'[\t\n\f\r ]*,[\t\n\f\r ]*'([A-Za-z0-9_-]+)'[\t\n\f\r ]*\)",
    )
    .unwrap()
});

/// One annotation found in a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRef<'a> {
    pub enum_type: &'a str,
    pub value: &'a str,
    /// Byte range of the whole annotation in the scanned text
    pub span: Range<usize>,
}

impl<'a> AnnotationRef<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let whole = caps.get(0)?;
        let enum_type = caps.get(1)?.as_str();
        let value = caps.get(2)?.as_str();
        if enum_type.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self {
            enum_type,
            value,
            span: whole.range(),
        })
    }

    /// The SQL literal that replaces a valid annotation. Not escaped: the
    /// identifier pattern cannot capture a quote.
    pub fn literal(&self) -> String {
        format!("'{}'", self.value)
    }
}

/// Result of scanning one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Query text with every valid annotation replaced
    pub text: String,
    /// Number of annotations replaced by literals
    pub rewrites: usize,
    /// Failures in left-to-right order
    pub errors: Vec<ValidationError>,
}

impl QueryOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Every annotation in `text`, left to right.
pub fn find_annotations(text: &str) -> Vec<AnnotationRef<'_>> {
    ANNOTATION_PATTERN
        .captures_iter(text)
        .filter_map(|caps| AnnotationRef::from_captures(&caps))
        .collect()
}

/// Rewrite the annotations of one query against `index`.
///
/// Never fails and never logs: errors are returned for the caller to aggregate.
pub fn rewrite_annotations(text: &str, index: &EnumIndex) -> QueryOutcome {
    let mut out = String::with_capacity(text.len());
    let mut rewrites = 0;
    let mut errors = Vec::new();
    let mut last = 0;

    for caps in ANNOTATION_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        last = whole.end();

        let Some(annotation) = AnnotationRef::from_captures(&caps) else {
            errors.push(ValidationError::MalformedAnnotation(whole.as_str().to_string()));
            out.push_str(whole.as_str());
            continue;
        };

        match index.contains(annotation.enum_type, annotation.value) {
            Some(true) => {
                out.push_str(&annotation.literal());
                rewrites += 1;
            }
            Some(false) => {
                errors.push(ValidationError::ValueNotInEnum {
                    enum_type: annotation.enum_type.to_string(),
                    value: annotation.value.to_string(),
                });
                out.push_str(whole.as_str());
            }
            None => {
                errors.push(ValidationError::UnknownEnumType(annotation.enum_type.to_string()));
                out.push_str(whole.as_str());
            }
        }
    }
    out.push_str(&text[last..]);

    QueryOutcome {
        text: out,
        rewrites,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safe_enum_protocol::{Enum, Schema};

    fn index() -> EnumIndex {
        EnumIndex::build(&[
            Schema::new("public")
                .with_enum(Enum::new("status", ["active", "inactive"]))
                .with_enum(Enum::new("job-state", ["queued", "in-progress", "done_2"])),
        ])
    }

    #[test]
    fn test_text_without_annotations_is_unchanged() {
        let text = "SELECT * FROM t WHERE s = 'active' AND enum('status', 'active') IS NOT NULL";
        let outcome = rewrite_annotations(text, &index());
        assert_eq!(outcome.text, text);
        assert_eq!(outcome.rewrites, 0);
        assert!(outcome.is_valid());
    }

    #[test]
    fn test_valid_annotation_becomes_literal() {
        let outcome = rewrite_annotations(
            "SELECT * FROM t WHERE s = safe.enum('status', 'active')",
            &index(),
        );
        assert_eq!(outcome.text, "SELECT * FROM t WHERE s = 'active'");
        assert_eq!(outcome.rewrites, 1);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_unknown_type_keeps_original_text() {
        let text = "SELECT * FROM t WHERE c = safe.enum('color', 'red')";
        let outcome = rewrite_annotations(text, &index());
        assert_eq!(outcome.text, text);
        assert_eq!(outcome.errors, vec![ValidationError::UnknownEnumType("color".into())]);
    }

    #[test]
    fn test_unlisted_value_keeps_original_text() {
        let text = "SELECT * FROM t WHERE s = safe.enum('status', 'archived')";
        let outcome = rewrite_annotations(text, &index());
        assert_eq!(outcome.text, text);
        assert_eq!(
            outcome.errors,
            vec![ValidationError::ValueNotInEnum {
                enum_type: "status".into(),
                value: "archived".into(),
            }]
        );
    }

    #[test]
    fn test_mixed_matches_rewrite_valid_and_report_invalid_in_order() {
        let text = "UPDATE t SET s = safe.enum('status', 'inactive') \
                    WHERE s = safe.enum('status', 'gone') OR c = safe.enum('color', 'red') \
                    OR s = safe.enum('status', 'active')";
        let outcome = rewrite_annotations(text, &index());

        assert_eq!(
            outcome.text,
            "UPDATE t SET s = 'inactive' \
             WHERE s = safe.enum('status', 'gone') OR c = safe.enum('color', 'red') \
             OR s = 'active'"
        );
        assert_eq!(outcome.rewrites, 2);
        assert_eq!(
            outcome.errors,
            vec![
                ValidationError::ValueNotInEnum {
                    enum_type: "status".into(),
                    value: "gone".into(),
                },
                ValidationError::UnknownEnumType("color".into()),
            ]
        );
    }

    #[test]
    fn test_whitespace_tolerance() {
        let idx = index();
        for text in [
            "safe.enum('status','active')",
            "safe.enum('status' ,  'active')",
            "safe.enum('status',\t'active')",
            "safe.enum( 'status', 'active' )",
            "safe.enum('status',\n    'active')",
        ] {
            let outcome = rewrite_annotations(text, &idx);
            assert_eq!(outcome.text, "'active'", "input: {:?}", text);
            assert!(outcome.is_valid());
        }
    }

    #[test]
    fn test_near_misses_are_not_annotations() {
        let idx = index();
        for text in [
            "safe.enum ('status', 'active')",
            "safe.enum(' status', 'active')",
            "safe.enum(status, active)",
            "safe.enum(\"status\", \"active\")",
            "safeXenum('status', 'active')",
            "safe.enum('status')",
            "safe.enum('status', 'act ive')",
            "safe.enum('', 'active')",
        ] {
            let outcome = rewrite_annotations(text, &idx);
            assert_eq!(outcome.text, text, "input: {:?}", text);
            assert!(outcome.is_valid(), "input: {:?}", text);
        }
    }

    #[test]
    fn test_hyphen_digit_and_underscore_identifiers() {
        let outcome = rewrite_annotations(
            "VALUES (safe.enum('job-state', 'in-progress'), safe.enum('job-state', 'done_2'))",
            &index(),
        );
        assert_eq!(outcome.text, "VALUES ('in-progress', 'done_2')");
        assert_eq!(outcome.rewrites, 2);
    }

    #[test]
    fn test_value_lookup_is_case_sensitive() {
        let outcome = rewrite_annotations("safe.enum('status', 'Active')", &index());
        assert_eq!(outcome.text, "safe.enum('status', 'Active')");
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_adjacent_annotations() {
        let outcome = rewrite_annotations(
            "safe.enum('status', 'active')safe.enum('status', 'inactive')",
            &index(),
        );
        assert_eq!(outcome.text, "'active''inactive'");
    }

    #[test]
    fn test_rerun_on_rewritten_text_is_noop() {
        let idx = index();
        let first = rewrite_annotations(
            "SELECT * FROM t WHERE s IN (safe.enum('status', 'active'), safe.enum('status', 'inactive'))",
            &idx,
        );
        let second = rewrite_annotations(&first.text, &idx);
        assert_eq!(second.text, first.text);
        assert_eq!(second.rewrites, 0);
        assert!(second.is_valid());
    }

    #[test]
    fn test_deterministic() {
        let idx = index();
        let text = "safe.enum('status', 'x') safe.enum('status', 'active') safe.enum('y', 'z')";
        assert_eq!(rewrite_annotations(text, &idx), rewrite_annotations(text, &idx));
    }

    #[test]
    fn test_find_annotations_reports_spans() {
        let text = "a = safe.enum('status', 'active') AND b = safe.enum( 'color','red' )";
        let found = find_annotations(text);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].enum_type, "status");
        assert_eq!(found[0].value, "active");
        assert_eq!(&text[found[0].span.clone()], "safe.enum('status', 'active')");
        assert_eq!(found[1].enum_type, "color");
        assert_eq!(&text[found[1].span.clone()], "safe.enum( 'color','red' )");
        assert_eq!(found[1].literal(), "'red'");
    }
}
