//! Layer merging
//!
//! Composes a base document with one or more overlays into the effective
//! document. Overlays only add or override: every base section and key passes
//! through unless a later layer sets the same key, in which case the later
//! value and comment replace the earlier ones at the earlier position.
//!
//! ```
//! use rules_overlay::document::Document;
//! use rules_overlay::merge::merge;
//!
//! let base = Document::parse("[E1]\nCost=100\nSpeed=5\n").unwrap();
//! let user = Document::parse("[E1]\nSpeed=6\nArmor=Light\n").unwrap();
//!
//! let effective = merge(&base, &[&user]);
//! assert_eq!(effective.serialize(), "[E1]\nCost=100\nSpeed=6\nArmor=Light\n");
//! ```

use log::debug;

use crate::document::Document;

/// Merge `overlays` over `base`, left to right
///
/// Neither input is modified; the result is a fresh document.
pub fn merge(base: &Document, overlays: &[&Document]) -> Document {
    let mut merged = base.clone();
    for overlay in overlays {
        merge_into(&mut merged, overlay);
    }
    merged
}

/// Merge every layer in order; the first one is the base
pub fn merge_layers(layers: &[&Document]) -> Document {
    match layers.split_first() {
        Some((base, overlays)) => merge(base, overlays),
        None => Document::new(),
    }
}

/// Apply one overlay onto `dest` in place
pub fn merge_into(dest: &mut Document, overlay: &Document) {
    for source_section in overlay.sections() {
        let dest_section = dest.ensure_section(source_section.name());
        for property in source_section.properties() {
            dest_section.set_property(property.clone());
        }
    }
    debug!(
        "Merged {} overlay section(s), effective document has {} section(s)",
        overlay.len(),
        dest.len()
    );
}
