// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Compilation of search phrases into boolean prefix-match queries.
//!
//! A query is an OR across phrases, where each phrase is an AND across
//! its tokens and every token matches any indexed word it prefixes.

use crate::text::tokenize;

/// A compiled full-text query: AND within a phrase, OR across phrases.
///
/// Phrases that tokenize to nothing are dropped at compile time, so a
/// query built entirely from punctuation is empty and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsQuery {
    phrases: Vec<Vec<String>>,
}

impl TsQuery {
    /// Compiles a single phrase into a query.
    ///
    /// # Arguments
    ///
    /// * `phrase` - The search phrase, possibly multi-word
    #[must_use]
    pub fn compile_phrase(phrase: &str) -> Self {
        Self::compile(std::slice::from_ref(&phrase))
    }

    /// Compiles an ordered collection of phrases into one query.
    ///
    /// # Arguments
    ///
    /// * `phrases` - The search phrases, ORed together
    #[must_use]
    pub fn compile<S: AsRef<str>>(phrases: &[S]) -> Self {
        let compiled: Vec<Vec<String>> = phrases
            .iter()
            .map(|phrase| tokenize(phrase.as_ref()))
            .filter(|tokens| !tokens.is_empty())
            .collect();
        Self { phrases: compiled }
    }

    /// Returns whether this query has no phrases.
    ///
    /// An empty query matches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Evaluates this query against a sequence of indexed tokens.
    ///
    /// A document matches when at least one phrase matches, and a phrase
    /// matches when every one of its tokens is a prefix of some document
    /// token.
    ///
    /// # Arguments
    ///
    /// * `tokens` - The indexed tokens of one document
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.phrases.iter().any(|phrase| {
            phrase.iter().all(|query_token| {
                tokens
                    .iter()
                    .any(|doc_token| doc_token.as_ref().starts_with(query_token))
            })
        })
    }

    /// Evaluates this query against a stored search index value.
    ///
    /// The index value is the space-joined token form produced by
    /// [`crate::tokenize`] at write time.
    ///
    /// # Arguments
    ///
    /// * `index` - The stored `search_index` column value
    #[must_use]
    pub fn matches_index(&self, index: &str) -> bool {
        let tokens: Vec<&str> = index.split_whitespace().collect();
        self.matches(&tokens)
    }
}

impl std::fmt::Display for TsQuery {
    /// Renders the query in `tsquery` syntax.
    ///
    /// Tokens are suffixed with `:*` (prefix match) and joined with ` & `
    /// within a phrase; phrases are joined with ` | `. A multi-token
    /// phrase is parenthesized only when the query holds more than one
    /// phrase, matching the reference formatting exactly:
    /// `staff:* & consultant:*` for one phrase, but
    /// `(interpretation:* & services:*) | disposal:*` for two.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let group: bool = self.phrases.len() > 1;
        let rendered: Vec<String> = self
            .phrases
            .iter()
            .map(|phrase| {
                let joined: String = phrase
                    .iter()
                    .map(|token| format!("{token}:*"))
                    .collect::<Vec<String>>()
                    .join(" & ");
                if group && phrase.len() > 1 {
                    format!("({joined})")
                } else {
                    joined
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" | "))
    }
}
