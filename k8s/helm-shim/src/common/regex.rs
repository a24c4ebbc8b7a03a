use crate::common::error::{RegexCompile, Result};
use regex::Regex as BackendRegex;
use snafu::ResultExt;

/// This is a wrapper around regex::Regex.
pub(crate) struct Regex {
    inner: BackendRegex,
}

impl Regex {
    /// This is a wrapper around regex::Regex::new(). Compile failures become crate errors, so
    /// callers can chain the lookup after the try operator:
    ///
    /// ```ignore
    /// let version = Regex::new(r"^v([0-9.]+)")?.first_capture("v3.12.1");
    /// assert_eq!(version, Some("3.12.1"));
    /// ```
    pub(crate) fn new(expr: &str) -> Result<Regex> {
        let regex = BackendRegex::new(expr).context(RegexCompile {
            expression: expr.to_string(),
        })?;

        Ok(Self { inner: regex })
    }

    /// Returns the text of the first capture group, if the expression matches.
    pub(crate) fn first_capture<'h>(&self, haystack: &'h str) -> Option<&'h str> {
        self.inner
            .captures(haystack)
            .and_then(|captures| captures.get(1))
            .map(|group| group.as_str())
    }
}
