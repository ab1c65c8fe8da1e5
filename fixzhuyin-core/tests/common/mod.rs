use fixzhuyin_core::{CandidatePopup, CandidateSet, PopupKey, PopupOutcome};

/// Creates a candidate set without a position
pub fn candidates(origin: &str, items: &[&str]) -> CandidateSet {
    CandidateSet::new(origin, items.iter().map(|s| s.to_string()).collect(), None)
}

/// Creates a popup already showing `items`
pub fn popup_with(items: &[&str]) -> CandidatePopup {
    let mut popup = CandidatePopup::new();
    popup.show_candidates(candidates("origin", items));
    popup
}

/// Presses a DOM key on the popup
pub fn press(popup: &mut CandidatePopup, key: &str) -> PopupOutcome {
    let key = PopupKey::from_key(key).unwrap_or_else(|| panic!("unhandled key {:?}", key));
    popup.key_down(key)
}

/// Candidate lists of every size from 1 to 5
#[allow(dead_code)]
pub fn all_sizes() -> Vec<Vec<&'static str>> {
    let pool = ["一", "二", "三", "四", "五"];
    (1..=pool.len()).map(|n| pool[..n].to_vec()).collect()
}
