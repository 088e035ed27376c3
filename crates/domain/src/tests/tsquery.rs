// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::TsQuery;

#[test]
fn test_single_phrase_renders_without_grouping() {
    let query: TsQuery = TsQuery::compile_phrase("staff  consultant");
    assert_eq!(query.to_string(), "staff:* & consultant:*");
}

#[test]
fn test_single_phrase_strips_punctuation() {
    let query: TsQuery = TsQuery::compile_phrase("senior typist (st)");
    assert_eq!(query.to_string(), "senior:* & typist:* & st:*");
}

#[test]
fn test_pure_punctuation_phrase_renders_empty() {
    let query: TsQuery = TsQuery::compile_phrase("@$(#)%&**#");
    assert_eq!(query.to_string(), "");
    assert!(query.is_empty());
}

#[test]
fn test_multiple_phrases_group_multi_token_phrases_only() {
    let query: TsQuery = TsQuery::compile(&["interpretation services", "disposal"]);
    assert_eq!(
        query.to_string(),
        "(interpretation:* & services:*) | disposal:*"
    );
}

#[test]
fn test_compile_drops_phrases_with_no_tokens() {
    let query: TsQuery = TsQuery::compile(&["@$(#)", "disposal"]);
    assert_eq!(query.to_string(), "disposal:*");
}

#[test]
fn test_compile_of_all_empty_phrases_is_empty() {
    let query: TsQuery = TsQuery::compile(&["@$(#)", "%&**#"]);
    assert!(query.is_empty());
}

#[test]
fn test_empty_query_matches_nothing() {
    let query: TsQuery = TsQuery::compile_phrase("@$(#)%&**#");
    assert!(!query.matches(&["interpretation", "services"]));
}

#[test]
fn test_phrase_tokens_are_anded() {
    let query: TsQuery = TsQuery::compile_phrase("interpretation services");
    assert!(query.matches(&["interpretation", "services", "class", "1"]));
    assert!(!query.matches(&["disposal", "services"]));
}

#[test]
fn test_phrases_are_ored() {
    let query: TsQuery = TsQuery::compile(&["interpretation services", "disposal"]);
    assert!(query.matches(&["disposal", "services"]));
    assert!(query.matches(&["interpretation", "services"]));
    assert!(!query.matches(&["aircraft", "servicer"]));
}

#[test]
fn test_tokens_match_by_prefix() {
    let query: TsQuery = TsQuery::compile_phrase("interp");
    assert!(query.matches(&["interpretation", "services"]));
    assert!(query.matches(&["interpreter"]));
    assert!(!query.matches(&["disposal"]));
}

#[test]
fn test_matches_index_splits_stored_value() {
    let query: TsQuery = TsQuery::compile_phrase("sign language");
    assert!(query.matches_index("sign language interpreter"));
    assert!(!query.matches_index("aircraft servicer"));
}
