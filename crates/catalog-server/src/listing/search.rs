//! Token search over display text
//!
//! The store has no full-text search, so listings that carry `search` fetch the
//! whole index for the selected filter and match each display text here.

/// Compiled search terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
    match_any: bool,
}

impl SearchQuery {
    /// Split on whitespace, lower-case each token and drop duplicates,
    /// keeping first-seen order.
    pub fn compile(query: &str, match_any: bool) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for token in query.split_whitespace() {
            let token = token.to_lowercase();
            if !terms.contains(&token) {
                terms.push(token);
            }
        }
        Self { terms, match_any }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn match_any(&self) -> bool {
        self.match_any
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Case-insensitive substring test. An empty query matches everything.
    pub fn matches(&self, candidate: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }

        let haystack = candidate.to_lowercase();
        if self.match_any {
            self.terms.iter().any(|term| haystack.contains(term.as_str()))
        } else {
            self.terms.iter().all(|term| haystack.contains(term.as_str()))
        }
    }
}
