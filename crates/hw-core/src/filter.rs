//! Acceptance filter deciding which files belong in a catalog
//!
//! A file is accepted when at least one path pattern matches its directory
//! (relative to the gallery root, `""` for top-level files) and at least one
//! extension pattern matches its file name. Patterns are unanchored regex
//! searches; case handling is whatever the pattern spells out. An empty
//! pattern list accepts nothing.

use regex::Regex;

use crate::catalog::Catalog;
use crate::{Error, Result};

/// Catch-all path pattern that also accepts files directly in the root
pub const ANY_PATH: &str = ".*";

/// JPEG extension patterns offered to new galleries
pub const JPEG_PATTERNS: [&str; 2] = [r"\.[jJ][pP][gG]$", r"\.[jJ][pP][eE][gG]$"];

/// PNG extension pattern offered to new galleries
pub const PNG_PATTERN: &str = r"\.[pP][nN][gG]$";

/// Compiled path and extension patterns
#[derive(Debug, Clone)]
pub struct AcceptanceFilter {
    path_patterns: Vec<Regex>,
    extension_patterns: Vec<Regex>,
}

impl AcceptanceFilter {
    /// Compile both pattern lists.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPattern`] naming the first pattern that fails.
    pub fn new<P, E>(path_patterns: &[P], extension_patterns: &[E]) -> Result<Self>
    where
        P: AsRef<str>,
        E: AsRef<str>,
    {
        Ok(Self {
            path_patterns: compile(path_patterns)?,
            extension_patterns: compile(extension_patterns)?,
        })
    }

    /// Filter configured by a catalog's pattern lists
    pub fn for_catalog(catalog: &Catalog) -> Result<Self> {
        Self::new(catalog.path_include_patterns(), catalog.extension_patterns())
    }

    /// Whether a file named `filename` in directory `dir` is accepted.
    pub fn accepts(&self, dir: &str, filename: &str) -> bool {
        let path_accepted = self.path_patterns.iter().any(|re| re.is_match(dir));
        let extension_accepted = self.extension_patterns.iter().any(|re| re.is_match(filename));
        path_accepted && extension_accepted
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NONE: [&str; 0] = [];

    #[rstest]
    #[case(".+", r"\.jpg$", "2020/trip", "photo.jpg", true)]
    #[case(".+", r"\.jpg$", "2020/trip", "photo.txt", false)]
    #[case(".+", r"\.jpg$", "", "photo.jpg", false)]
    #[case(".*", r"\.jpg$", "", "photo.jpg", true)]
    #[case("trip", r"\.jpg$", "2020/trip/day1", "photo.jpg", true)]
    #[case("^trip", r"\.jpg$", "2020/trip", "photo.jpg", false)]
    #[case(".*", r"\.jpg$", "2020", "photo.JPG", false)]
    #[case(".*", r"\.[jJ][pP][gG]$", "2020", "photo.JPG", true)]
    #[case(".*", r"\.jpg$", "2020", "photo.jpg.bak", false)]
    fn accepts_follows_search_semantics(
        #[case] path_pattern: &str,
        #[case] ext_pattern: &str,
        #[case] dir: &str,
        #[case] filename: &str,
        #[case] expected: bool,
    ) {
        let filter = AcceptanceFilter::new(&[path_pattern], &[ext_pattern]).unwrap();
        assert_eq!(filter.accepts(dir, filename), expected);
    }

    #[test]
    fn any_matching_pattern_is_enough() {
        let filter = AcceptanceFilter::new(&["^archive", "^2020"], &JPEG_PATTERNS).unwrap();
        assert!(filter.accepts("2020/trip", "a.jpeg"));
        assert!(filter.accepts("archive", "a.JPG"));
        assert!(!filter.accepts("2021", "a.jpg"));
    }

    #[test]
    fn empty_path_patterns_accept_nothing() {
        let filter = AcceptanceFilter::new(&NONE, &[".*"]).unwrap();
        assert!(!filter.accepts("2020", "a.jpg"));
    }

    #[test]
    fn empty_extension_patterns_accept_nothing() {
        let filter = AcceptanceFilter::new(&[".*"], &NONE).unwrap();
        assert!(!filter.accepts("2020", "a.jpg"));
    }

    #[test]
    fn invalid_pattern_is_named() {
        let err = AcceptanceFilter::new(&[".*"], &["(unclosed"]).unwrap_err();
        match err {
            Error::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }
}
