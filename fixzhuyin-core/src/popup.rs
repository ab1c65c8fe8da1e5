//! Candidate selection popup
//!
//! Shows up to [`MAX_CANDIDATES`] corrections for a piece of text, tracks a
//! single selected row and reports the chosen text once the user confirms.
//! Rendering and the actual replacement request are left to the caller,
//! driven by the returned [`PopupOutcome`].

use crate::event::{Position, ShowCandidates};

/// Most candidates shown at once; also the highest digit shortcut
pub const MAX_CANDIDATES: usize = 5;

/// An ordered list of corrections for `origin`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateSet {
    origin: String,
    items: Vec<String>,
    position: Option<Position>,
}

impl CandidateSet {
    /// Build a set, keeping only the first [`MAX_CANDIDATES`] items
    pub fn new(origin: impl Into<String>, items: Vec<String>, position: Option<Position>) -> Self {
        let mut items = items;
        items.truncate(MAX_CANDIDATES);
        Self {
            origin: origin.into(),
            items,
            position,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<ShowCandidates> for CandidateSet {
    fn from(payload: ShowCandidates) -> Self {
        CandidateSet::new(payload.origin, payload.items, payload.position)
    }
}

/// Keys the popup reacts to, named after `KeyboardEvent.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKey {
    Escape,
    ArrowUp,
    ArrowDown,
    Enter,
    /// Digit shortcut, 1-based
    Digit(u8),
}

impl PopupKey {
    /// Map a DOM key name; keys the popup does not handle yield `None`
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(PopupKey::Escape),
            "ArrowUp" => Some(PopupKey::ArrowUp),
            "ArrowDown" => Some(PopupKey::ArrowDown),
            "Enter" => Some(PopupKey::Enter),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c @ '1'..='5'), None) => Some(PopupKey::Digit(c as u8 - b'0')),
                    _ => None,
                }
            }
        }
    }
}

/// What a popup operation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupOutcome {
    /// Nothing changed
    Ignored,
    /// State changed and the popup needs redrawing
    Redraw,
    /// The popup closed without a choice
    Hidden,
    /// The popup closed and this text should replace the origin
    Confirmed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    /// 1-based number shown next to the text
    pub ordinal: usize,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub visible: bool,
    pub title: String,
    pub rows: Vec<CandidateRow>,
    /// Reported caret position. Not used for placement yet.
    pub position: Option<Position>,
}

#[derive(Debug, Default)]
pub struct CandidatePopup {
    visible: bool,
    candidates: CandidateSet,
    selected: usize,
}

impl CandidatePopup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Replace the candidate list and show it with the first row selected.
    ///
    /// An empty list hides the popup instead, so there is never a visible
    /// popup without a valid selection.
    pub fn show_candidates(&mut self, candidates: CandidateSet) -> PopupOutcome {
        self.candidates = candidates;
        self.selected = 0;

        if self.candidates.is_empty() {
            log::debug!("no candidates for {:?}, popup suppressed", self.candidates.origin());
            return self.hide();
        }

        log::debug!(
            "showing {} candidates for {:?}",
            self.candidates.len(),
            self.candidates.origin()
        );
        self.visible = true;
        PopupOutcome::Redraw
    }

    pub fn key_down(&mut self, key: PopupKey) -> PopupOutcome {
        if !self.visible {
            return PopupOutcome::Ignored;
        }

        let len = self.candidates.len();
        match key {
            PopupKey::Escape => self.hide(),
            PopupKey::ArrowDown => {
                self.selected = (self.selected + 1) % len;
                PopupOutcome::Redraw
            }
            PopupKey::ArrowUp => {
                self.selected = (self.selected + len - 1) % len;
                PopupOutcome::Redraw
            }
            PopupKey::Digit(n) => self.choose(usize::from(n).wrapping_sub(1)),
            PopupKey::Enter => self.confirm(),
        }
    }

    /// Select and confirm the row at `index`, as a mouse click does
    pub fn click(&mut self, index: usize) -> PopupOutcome {
        if !self.visible {
            return PopupOutcome::Ignored;
        }
        self.choose(index)
    }

    /// Hide the popup and hand back the selected text
    pub fn confirm(&mut self) -> PopupOutcome {
        if !self.visible {
            return PopupOutcome::Ignored;
        }
        let Some(chosen) = self.candidates.items().get(self.selected).cloned() else {
            return self.hide();
        };
        self.visible = false;
        log::debug!("candidate {} confirmed: {:?}", self.selected + 1, chosen);
        PopupOutcome::Confirmed(chosen)
    }

    pub fn hide(&mut self) -> PopupOutcome {
        self.visible = false;
        PopupOutcome::Hidden
    }

    pub fn view(&self) -> PopupView {
        let rows = if self.visible {
            self.candidates
                .items()
                .iter()
                .enumerate()
                .map(|(i, text)| CandidateRow {
                    ordinal: i + 1,
                    text: text.clone(),
                    selected: i == self.selected,
                })
                .collect()
        } else {
            Vec::new()
        };

        PopupView {
            visible: self.visible,
            title: format!("Fix: {}", self.candidates.origin()),
            rows,
            position: self.candidates.position(),
        }
    }

    fn choose(&mut self, index: usize) -> PopupOutcome {
        if index >= self.candidates.len() {
            return PopupOutcome::Ignored;
        }
        self.selected = index;
        self.confirm()
    }
}
