use pretty_assertions::assert_eq;

use super::*;

#[test]
fn ids_are_stable_and_start_at_one() {
    let mut tags = TagRegistry::new();
    assert!(tags.is_empty());
    assert_eq!(tags.intern("Int"), 1);
    assert_eq!(tags.intern("main::Point"), 2);
    assert_eq!(tags.intern("Int"), 1);
    assert_eq!(tags.len(), 2);
    assert_eq!(tags.lookup("main::Point"), Some(2));
    assert_eq!(tags.lookup("Float"), None);
}

#[test]
fn name_of_reverses_intern() {
    let mut tags = TagRegistry::new();
    let id = tags.intern("$Char");
    assert_eq!(tags.name_of(id), Some("$Char"));
    assert_eq!(tags.name_of(0), None);
    assert_eq!(tags.name_of(9), None);
}
