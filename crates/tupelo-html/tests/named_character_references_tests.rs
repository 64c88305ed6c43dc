//! Integration tests for named character reference lookup.

use tupelo_html::tokenizer::named_character_references::{any_entity_has_prefix, lookup_entity};

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("gt;"), Some(">"));
    assert_eq!(lookup_entity("quot;"), Some("\""));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
}

#[test]
fn test_lookup_legacy_entities() {
    // Legacy entities without semicolon
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("lt"), Some("<"));
    assert_eq!(lookup_entity("copy"), Some("\u{00A9}"));
}

#[test]
fn test_lookup_multi_character_expansions() {
    // Some references expand to more than one scalar value.
    assert_eq!(lookup_entity("fjlig;"), Some("fj"));
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_prefix_matching() {
    assert!(any_entity_has_prefix("a")); // amp, apos, alpha, etc.
    assert!(any_entity_has_prefix("am")); // amp
    assert!(any_entity_has_prefix("amp")); // amp, amp;
    assert!(any_entity_has_prefix("amp;")); // amp;
    assert!(!any_entity_has_prefix("ampx")); // nothing
    assert!(!any_entity_has_prefix("xyz")); // nothing
}

#[test]
fn test_semicolon_form_preferred_over_legacy() {
    // "not" is a legacy entity, but longer semicolon forms also exist and
    // the tokenizer relies on prefix matching to find them.
    assert_eq!(lookup_entity("not"), Some("\u{00AC}"));
    assert!(any_entity_has_prefix("noti")); // notin;, notindot;, ...
    assert_eq!(lookup_entity("notin;"), Some("\u{2209}"));
}
