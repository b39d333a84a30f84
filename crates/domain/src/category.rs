//! Category inference for events arriving without an explicit category.
//!
//! The table is a fixed, ordered slice rather than a map so the first-match
//! rule is reproducible: earlier rows shadow later ones regardless of how
//! the title happens to hash.

use crate::types::event::EventCategory;

/// Ordered keyword table. First match on the lowercased title wins.
const CATEGORY_RULES: &[(&str, EventCategory)] = &[
    ("doctor", EventCategory::Appointment),
    ("dentist", EventCategory::Appointment),
    ("meeting", EventCategory::Meeting),
    ("call", EventCategory::Meeting),
    ("school", EventCategory::Education),
    ("class", EventCategory::Education),
    ("birthday", EventCategory::Social),
    ("party", EventCategory::Social),
    ("family", EventCategory::Family),
    ("dinner", EventCategory::Family),
];

/// Infer an event category from its title.
///
/// Falls back to [`EventCategory::Other`] when no keyword matches.
#[must_use]
pub fn infer_category(title: &str) -> EventCategory {
    let lowered = title.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map_or(EventCategory::Other, |(_, category)| *category)
}
