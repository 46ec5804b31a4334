//! Property-based tests for the text model, layering and reconciliation.
//!
//! These tests use proptest to generate random documents and property lists
//! and verify that invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeMap;

    use crate::document::{Document, Property, Section};
    use crate::merge::merge;
    use crate::reconcile::reconcile;
    use proptest::prelude::*;

    fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9_]{0,8}"
    }

    fn property_strategy() -> impl Strategy<Value = Property> {
        (
            name_strategy(),
            "[A-Za-z0-9_,.]{0,10}",
            "[A-Za-z0-9 ]{0,8}",
        )
            .prop_map(|(key, value, comment)| Property::new(key, value).with_comment(comment.trim()))
    }

    /// Properties with unique keys
    fn properties_strategy() -> impl Strategy<Value = Vec<Property>> {
        prop::collection::btree_map(name_strategy(), property_strategy(), 0..6).prop_map(
            |by_key: BTreeMap<String, Property>| {
                by_key
                    .into_iter()
                    .map(|(key, property)| Property { key, ..property })
                    .collect()
            },
        )
    }

    /// Properties drawn from a small key and value pool, so that base,
    /// overlay and desired lists overlap often
    fn entity_properties_strategy() -> impl Strategy<Value = Vec<Property>> {
        let key = prop::sample::select(vec!["Cost", "Speed", "Armor", "Pip", "UIName", "Ammo"]);
        let value = prop::sample::select(vec!["", "1", "2", "Light"]);
        let comment = prop::sample::select(vec!["", "note"]);
        prop::collection::btree_map(key, (value, comment), 0..6).prop_map(|by_key| {
            by_key
                .into_iter()
                .map(|(key, (value, comment))| Property::new(key, value).with_comment(comment))
                .collect()
        })
    }

    fn document_strategy() -> impl Strategy<Value = Document> {
        prop::collection::vec((name_strategy(), properties_strategy()), 0..5).prop_map(|sections| {
            let mut document = Document::new();
            for (name, properties) in sections {
                let section = document.ensure_section(&name);
                for property in properties {
                    section.set_property(property);
                }
            }
            document
        })
    }

    // ============================================================================
    // Document property tests
    // ============================================================================

    proptest! {
        /// Property: parsing serialized output restores the document
        #[test]
        fn serialize_then_parse_round_trips(document in document_strategy()) {
            let text = document.serialize();
            let parsed = Document::parse(&text).unwrap();
            prop_assert_eq!(parsed, document);
        }

        /// Property: serialization is stable across a round trip
        #[test]
        fn serialize_is_a_fixed_point(document in document_strategy()) {
            let once = document.serialize();
            let twice = Document::parse(&once).unwrap().serialize();
            prop_assert_eq!(once, twice);
        }
    }

    // ============================================================================
    // Merge property tests
    // ============================================================================

    proptest! {
        /// Property: an empty layer is the identity on both sides
        #[test]
        fn merge_with_empty_is_identity(document in document_strategy()) {
            let empty = Document::new();
            prop_assert_eq!(&merge(&document, &[&empty]), &document);
            prop_assert_eq!(&merge(&empty, &[&document]), &document);
        }

        /// Property: every overlay key wins and every other base key survives
        #[test]
        fn merge_overlay_wins(base in document_strategy(), overlay in document_strategy()) {
            let merged = merge(&base, &[&overlay]);
            for section in overlay.sections() {
                let merged_section = merged.section(section.name()).unwrap();
                for property in section.properties() {
                    prop_assert_eq!(merged_section.get(&property.key), Some(property));
                }
            }
            for section in base.sections() {
                let merged_section = merged.section(section.name()).unwrap();
                for property in section.properties() {
                    let shadowed = overlay
                        .section(section.name())
                        .is_some_and(|s| s.contains_key(&property.key));
                    if !shadowed {
                        prop_assert_eq!(merged_section.get(&property.key), Some(property));
                    }
                }
            }
        }
    }

    // ============================================================================
    // Reconcile property tests
    // ============================================================================

    proptest! {
        /// Property: the effective entity shows exactly the desired values, with
        /// dropped base keys reading as empty, whatever the overlay held before
        #[test]
        fn reconcile_produces_desired_view(
            origin in entity_properties_strategy(),
            user in prop::option::of(entity_properties_strategy()),
            desired in entity_properties_strategy(),
        ) {
            let mut overlay = Section::new("E");
            for property in user.iter().flatten() {
                overlay.set_property(property.clone());
            }
            let existing = user.as_ref().map(|_| overlay.properties().to_vec());
            reconcile(Some(origin.as_slice()), existing.as_deref(), &desired).apply(&mut overlay);

            let mut effective = Section::new("E");
            for property in origin.iter().chain(overlay.properties()) {
                effective.set_property(property.clone());
            }

            let mut expected = desired.clone();
            for base in &origin {
                if !desired.iter().any(|p| p.key == base.key) {
                    expected.push(Property::new(base.key.as_str(), ""));
                }
            }
            let mut actual = effective.properties().to_vec();
            expected.sort_by(|a, b| a.key.cmp(&b.key));
            actual.sort_by(|a, b| a.key.cmp(&b.key));
            prop_assert_eq!(actual, expected);
        }

        /// Property: reconciling the same desired state again changes nothing
        #[test]
        fn reconcile_is_idempotent(
            origin in entity_properties_strategy(),
            user in entity_properties_strategy(),
            desired in entity_properties_strategy(),
        ) {
            let mut overlay = Section::new("E");
            for property in user {
                overlay.set_property(property);
            }
            reconcile(Some(origin.as_slice()), Some(overlay.properties()), &desired).apply(&mut overlay);

            let again = reconcile(Some(origin.as_slice()), Some(overlay.properties()), &desired);
            prop_assert!(again.is_empty(), "second pass produced {:?}", again.ops);
        }
    }
}
