//! Shorthand identifier selectors: `#/<body>/<flags>`.
//!
//! `#/^foo$/i` means "identifiers whose name matches `/^foo$/i`", i.e.
//! `Kind=Identifier[name=/^foo$/i]`. The body is extracted by a single scan
//! and compiled directly into that selector structure; it is never spliced
//! into selector text, so characters like `]` or `,` in the body keep their
//! regex meaning.

use std::fmt;

use crate::selector::errors::SelectorSyntaxError;
use crate::selector::syntax::{compile_regex, Attribute, AttributeTest, Compound, SelectorList};

pub const SHORTHAND_PREFIX: &str = "#/";

/// The body and flags extracted from a shorthand selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShorthandPattern {
    pub body: String,
    pub flags: String,
}

impl ShorthandPattern {
    /// Extract the pattern if `selector` uses the shorthand form.
    ///
    /// Returns `None` when the selector does not start with `#/`. Flags are
    /// copied verbatim; they are only checked when the regex is compiled.
    pub fn scan(selector: &str) -> Option<Result<Self, SelectorSyntaxError>> {
        let rest = selector.strip_prefix(SHORTHAND_PREFIX)?;
        Some(match split_regex_literal(rest) {
            Some((body, flags)) => Ok(Self {
                body,
                flags: flags.to_string(),
            }),
            None => Err(SelectorSyntaxError::UnterminatedShorthand {
                selector: selector.to_string(),
            }),
        })
    }

    pub(crate) fn desugar(&self) -> Result<SelectorList, SelectorSyntaxError> {
        let regex = compile_regex(&self.body, &self.flags)?;
        Ok(SelectorList::single(Compound {
            kind: Some("Identifier".to_string()),
            attributes: vec![Attribute {
                path: vec!["name".to_string()],
                test: AttributeTest::Regex {
                    regex,
                    negated: false,
                },
            }],
            pseudos: Vec::new(),
        }))
    }
}

/// Canonical spelling of the expanded selector.
impl fmt::Display for ShorthandPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind=Identifier[name=/{}/{}]", self.body, self.flags)
    }
}

/// Split `body/rest` at the first unescaped `/`.
///
/// A backslash starts a two-character escape that is copied into the body
/// as written. Returns `None` if no terminator is found.
pub(crate) fn split_regex_literal(input: &str) -> Option<(String, &str)> {
    let mut body = String::new();
    let mut chars = input.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                body.push(c);
                if let Some((_, escaped)) = chars.next() {
                    body.push(escaped);
                }
            }
            '/' => return Some((body, &input[index + 1..])),
            _ => body.push(c),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_shorthand_selectors_pass_through() {
        assert!(ShorthandPattern::scan("Identifier").is_none());
        assert!(ShorthandPattern::scan("#foo").is_none());
        assert!(ShorthandPattern::scan(" #/foo/").is_none());
    }

    #[test]
    fn scans_body_and_flags() {
        let pattern = ShorthandPattern::scan("#/^foo$/gi").unwrap().unwrap();
        assert_eq!(pattern.body, "^foo$");
        assert_eq!(pattern.flags, "gi");
    }

    #[test]
    fn escaped_slash_does_not_terminate() {
        let pattern = ShorthandPattern::scan(r"#/a\/b/").unwrap().unwrap();
        assert_eq!(pattern.body, r"a\/b");
        assert_eq!(pattern.flags, "");
    }

    #[test]
    fn escaped_backslash_before_slash_terminates() {
        let pattern = ShorthandPattern::scan(r"#/a\\/m").unwrap().unwrap();
        assert_eq!(pattern.body, r"a\\");
        assert_eq!(pattern.flags, "m");
    }

    #[test]
    fn flags_are_copied_verbatim() {
        let pattern = ShorthandPattern::scan("#/x/not flags").unwrap().unwrap();
        assert_eq!(pattern.flags, "not flags");
        assert!(pattern.desugar().is_err());
    }

    #[test]
    fn unterminated_body_is_rejected() {
        let err = ShorthandPattern::scan("#/abc").unwrap().unwrap_err();
        assert!(matches!(err, SelectorSyntaxError::UnterminatedShorthand { .. }));
    }

    #[test]
    fn displays_canonical_form() {
        let pattern = ShorthandPattern::scan("#/^foo$/").unwrap().unwrap();
        assert_eq!(pattern.to_string(), "Kind=Identifier[name=/^foo$/]");
    }

    #[test]
    fn selector_characters_in_body_stay_in_regex() {
        let pattern = ShorthandPattern::scan("#/^a]|b,c$/").unwrap().unwrap();
        let list = pattern.desugar().unwrap();
        assert_eq!(list.len(), 1);
    }
}
