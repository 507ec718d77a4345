use crate::error::{GraphError, Result};
use regex::Regex;

/// Compiled search query.
///
/// Matching is case-insensitive on both sides. A query without `*` matches
/// any display name containing it as a substring; a query with `*` becomes an
/// anchored glob where each `*` spans any sequence of characters and the
/// pattern must cover the entire display name.
#[derive(Debug, Clone)]
pub enum QueryPattern {
    Substring(String),
    Wildcard(Regex),
}

impl QueryPattern {
    /// Compile a user query. Rejects queries that are empty after trimming.
    pub fn parse(query: &str) -> Result<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(GraphError::EmptyQuery);
        }

        let lowered = trimmed.to_lowercase();
        if !lowered.contains('*') {
            return Ok(Self::Substring(lowered));
        }

        let mut pattern = String::with_capacity(lowered.len() + 4);
        pattern.push('^');
        for (i, literal) in lowered.split('*').enumerate() {
            if i > 0 {
                pattern.push_str(".*");
            }
            pattern.push_str(&regex::escape(literal));
        }
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|err| GraphError::InvalidPattern(err.to_string()))?;
        Ok(Self::Wildcard(regex))
    }

    /// Test a node display name against the query.
    #[must_use]
    pub fn matches(&self, display_name: &str) -> bool {
        let haystack = display_name.to_lowercase();
        match self {
            Self::Substring(needle) => haystack.contains(needle),
            Self::Wildcard(regex) => regex.is_match(&haystack),
        }
    }
}
