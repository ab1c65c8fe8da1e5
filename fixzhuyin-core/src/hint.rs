//! Dismissible banner reminding the user to switch the IME to Zhuyin

use std::time::Duration;

/// Default time a reminder flash stays up
pub const FLASH_DURATION: Duration = Duration::from_millis(2000);

/// Token identifying one reminder flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashToken(u64);

#[derive(Debug, Default)]
pub struct HintBanner {
    visible: bool,
    dismissed: bool,
    generation: u64,
}

impl HintBanner {
    /// `dismissed` is the persisted "never show again" flag
    pub fn new(dismissed: bool) -> Self {
        Self {
            visible: false,
            dismissed,
            generation: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Startup behaviour: show unless permanently dismissed
    pub fn show_if_not_dismissed(&mut self) -> bool {
        if !self.dismissed {
            self.visible = true;
        }
        self.visible
    }

    /// Hide the banner. Returns true when the persisted flag must be written,
    /// which is on every permanent dismissal until [`mark_dismissed`] records
    /// a successful write.
    ///
    /// [`mark_dismissed`]: Self::mark_dismissed
    pub fn dismiss(&mut self, permanent: bool) -> bool {
        self.visible = false;
        // Any pending flash expiry is now moot
        self.generation += 1;
        permanent && !self.dismissed
    }

    /// The persisted flag has been written
    pub fn mark_dismissed(&mut self) {
        self.dismissed = true;
    }

    /// Show the banner regardless of the dismissal flag
    pub fn flash(&mut self) -> FlashToken {
        self.generation += 1;
        self.visible = true;
        FlashToken(self.generation)
    }

    /// End a flash without touching the persisted flag. Stale tokens are ignored.
    pub fn expire_flash(&mut self, token: FlashToken) -> bool {
        if token.0 != self.generation || !self.visible {
            return false;
        }
        self.visible = false;
        true
    }
}
