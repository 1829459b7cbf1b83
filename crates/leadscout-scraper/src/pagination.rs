//! Scroll-and-count state machine for an infinite-scroll results feed.
//!
//! The feed never says how many listings exist. The controller walks the
//! listings rendered so far, asks for a scroll when it runs out, and decides
//! the feed is exhausted once the rendered count stops changing for a number
//! of consecutive rounds.
//!
//! ```text
//!            ┌─────────── scrolled() ───────────┐
//!            v                                  │
//!        Scanning ── all visible done ──> LoadingMore
//!         │  │  │
//!  stop ──┘  │  └── stagnant >= threshold ──> Exhausted
//!  flag      └──── current_index == max ────> Capped
//!    v
//! Cancelled
//! ```
//!
//! The controller is pure; the session feeds it the visible count and the
//! stop flag and performs the browser work each [`Step`] asks for.

/// Listings per results page, used only to report progress.
pub const LISTINGS_PER_PAGE: usize = 20;

/// Default number of unchanged rounds before the feed counts as exhausted.
pub const DEFAULT_STAGNATION_ROUNDS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    Scanning,
    LoadingMore,
    Exhausted,
    Cancelled,
    Capped,
}

impl PaginationState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exhausted | Self::Cancelled | Self::Capped)
    }
}

/// What the session should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Process the listing at this feed index.
    Process(usize),
    /// Scroll the feed, then call [`Paginator::scrolled`]. `page` is the
    /// progress page to report once the scroll completes.
    Scroll { page: usize },
    /// Terminal; carries the final state.
    Stop(PaginationState),
}

#[derive(Debug, Clone)]
pub struct Paginator {
    max_results: usize,
    stagnation_threshold: u32,
    current_index: usize,
    last_count: usize,
    stagnant_rounds: u32,
    state: PaginationState,
}

impl Paginator {
    #[must_use]
    pub fn new(max_results: usize, stagnation_threshold: u32) -> Self {
        Self {
            max_results,
            stagnation_threshold: stagnation_threshold.max(1),
            current_index: 0,
            last_count: 0,
            stagnant_rounds: 0,
            state: PaginationState::Scanning,
        }
    }

    #[must_use]
    pub fn state(&self) -> PaginationState {
        self.state
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn stagnant_rounds(&self) -> u32 {
        self.stagnant_rounds
    }

    /// Progress page derived from the cursor, starting at 1.
    #[must_use]
    pub fn page_number(&self) -> usize {
        (self.current_index / LISTINGS_PER_PAGE + 1).max(1)
    }

    /// Advances the machine given the number of listings currently rendered
    /// and whether a stop was requested.
    ///
    /// Returning [`Step::Process`] already moves the cursor past that index:
    /// a listing that fails is not retried.
    pub fn next_step(&mut self, visible: usize, stop_requested: bool) -> Step {
        if self.state.is_terminal() {
            return Step::Stop(self.state);
        }
        if stop_requested {
            return self.finish(PaginationState::Cancelled);
        }
        if self.state == PaginationState::LoadingMore {
            // Scroll was requested but never confirmed; ask again.
            return Step::Scroll {
                page: self.page_number(),
            };
        }

        if self.current_index < visible.min(self.max_results) {
            let index = self.current_index;
            self.current_index += 1;
            return Step::Process(index);
        }

        if self.current_index >= self.max_results {
            return self.finish(PaginationState::Capped);
        }

        if visible == self.last_count {
            self.stagnant_rounds += 1;
        } else {
            self.stagnant_rounds = 0;
            self.last_count = visible;
        }

        if self.stagnant_rounds >= self.stagnation_threshold {
            return self.finish(PaginationState::Exhausted);
        }

        self.state = PaginationState::LoadingMore;
        Step::Scroll {
            page: self.page_number(),
        }
    }

    /// Closes the pending scroll round, whether or not the scroll succeeded.
    pub fn scrolled(&mut self) {
        if self.state == PaginationState::LoadingMore {
            self.state = PaginationState::Scanning;
        }
    }

    fn finish(&mut self, state: PaginationState) -> Step {
        self.state = state;
        Step::Stop(state)
    }
}
