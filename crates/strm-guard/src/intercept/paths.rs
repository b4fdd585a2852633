/// Path prefixes whose responses are captured for inspection.
///
/// Matching is a plain case-sensitive `starts_with`; `/strm` and `/strm/` are
/// different prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPrefixSet {
    prefixes: Vec<String>,
}

impl PathPrefixSet {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn should_capture(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
