//! Property tests for page text normalization

use proptest::prelude::*;

use leadscrape::utils::clean_text;

proptest! {
    #[test]
    fn clean_text_is_idempotent(input in "[a-zA-Z0-9 \t\n.,:+()/'!&#\u{C0}-\u{FF}\u{E000}-\u{E0FF}\u{1F600}-\u{1F64F}-]{0,64}") {
        let once = clean_text(&input);
        prop_assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn clean_text_has_no_edge_or_repeated_whitespace(input in "[ \t\na-zA-Z0-9\u{E000}-\u{E0FF},.]{0,64}") {
        let cleaned = clean_text(&input);
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        prop_assert!(!cleaned.contains("  "));
        prop_assert!(!cleaned.contains('\n'));
        let has_private_use = cleaned.chars().any(|c| ('\u{E000}'..='\u{F8FF}').contains(&c));
        prop_assert!(!has_private_use);
    }
}

#[test]
fn clean_text_reduces_decorated_listing_names() {
    assert_eq!(clean_text("\u{E0C8} Dr. Ali's   Clinic ⭐ 24/7"), "Dr. Alis Clinic 24/7");
    assert_eq!(clean_text("Ünïcödé Dental"), "Unicode Dental");
}
