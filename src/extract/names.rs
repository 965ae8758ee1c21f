//! Join-key normalization for commodity labels.
//!
//! Basket and CPI rows spell the same commodity identically up to punctuation,
//! digits and footnote markers, so both sides are keyed by `sanitize_name`.
//! The function is idempotent and must stay collision-free for the commodity
//! vocabulary below; both properties are tested here.

/// Keep alphabetic characters and spaces, dropping everything else.
pub fn sanitize_name(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphabetic() || *c == ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    /// Top-level commodity labels as spelled in the basket and CPI files.
    const COMMODITIES: [&str; 9] = [
        "All-items",
        "Food 5",
        "Shelter 6",
        "Household operations, furnishings and equipment",
        "Clothing and footwear",
        "Transportation",
        "Health and personal care",
        "Recreation, education and reading",
        "Alcoholic beverages, tobacco products and recreational cannabis",
    ];

    #[test]
    fn strips_punctuation_and_digits() {
        assert_eq!(sanitize_name("All-items"), "Allitems");
        assert_eq!(sanitize_name("Food 5"), "Food ");
        assert_eq!(
            sanitize_name("Recreation, education and reading"),
            "Recreation education and reading"
        );
    }

    #[test]
    fn commodity_vocabulary_has_no_collisions() {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for label in COMMODITIES {
            if let Some(prev) = seen.insert(sanitize_name(label), label) {
                panic!("'{label}' collides with '{prev}'");
            }
        }
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(sanitize_name("Énergie (3)"), "Énergie ");
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(label in ".{0,40}") {
            let once = sanitize_name(&label);
            prop_assert_eq!(sanitize_name(&once), once.clone());
            prop_assert!(once.chars().all(|c| c.is_alphabetic() || c == ' '));
        }
    }
}
