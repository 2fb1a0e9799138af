//! Rewrite engine: substitutes selector matches with a replacement fragment
//! and prints the result.
//!
//! ```
//! use esrewrite::rewrite::replace;
//!
//! let output = replace("Number[value=2]", "3", "const x = 1 + 2;").unwrap();
//! assert_eq!(output, "const x = 1 + 3;");
//! ```

pub mod engine;
pub mod errors;
pub mod fragment;
pub(crate) mod precedence;

pub use engine::{rewrite, RewriteStats};
pub use errors::ReplacementShapeError;
pub use fragment::ReplacementFragment;

use std::str::FromStr;

use serde::Serialize;

use crate::dialect::Dialect;
use crate::error::Error;
use crate::printer::print_tree;
use crate::ts;

/// Rewritten source plus how many substitutions produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceOutcome {
    pub output: String,
    pub replacements: usize,
}

impl ReplaceOutcome {
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Replace every node of `source` matched by `selector` with `replacement`
/// and return the rewritten source.
///
/// Either every match is substituted or the call fails; no partial output is
/// produced.
pub fn replace(selector: &str, replacement: &str, source: &str) -> Result<String, Error> {
    replace_report(selector, replacement, source).map(|outcome| outcome.output)
}

/// [`replace`] with an explicit matching dialect name.
pub fn replace_with_mode(
    mode: &str,
    selector: &str,
    replacement: &str,
    source: &str,
) -> Result<String, Error> {
    let dialect = Dialect::from_str(mode)?;
    replace_in(dialect, selector, replacement, source).map(|outcome| outcome.output)
}

/// [`replace`], also reporting the number of substitutions.
pub fn replace_report(
    selector: &str,
    replacement: &str,
    source: &str,
) -> Result<ReplaceOutcome, Error> {
    replace_in(Dialect::default(), selector, replacement, source)
}

pub(crate) fn replace_in(
    dialect: Dialect,
    selector: &str,
    replacement: &str,
    source: &str,
) -> Result<ReplaceOutcome, Error> {
    let selector = dialect.compile(selector)?;
    let fragment = ReplacementFragment::parse(replacement)?;
    let mut tree = ts::parse(source)?;

    let stats = rewrite(&mut tree, &selector, &fragment);
    Ok(ReplaceOutcome {
        output: print_tree(&tree),
        replacements: stats.replaced,
    })
}
