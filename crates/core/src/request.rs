//! Request lifecycle tracking.
//!
//! Every backend call the storefront makes on behalf of a visitor moves a
//! [`RequestState`] through `Idle → Loading → Succeeded | Failed`. Requests of
//! the same kind may overlap (two searches typed in quick succession), so
//! each dispatch also draws a [`FetchTicket`] from a [`RequestTracker`]. Only
//! the ticket of the latest dispatch may apply its result; anything older
//! resolved out of order and is dropped.

/// Lifecycle of one kind of request, as shown to the view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState<T = ()> {
    /// Never dispatched.
    #[default]
    Idle,
    /// Dispatched and not yet resolved.
    Loading,
    /// Last dispatch succeeded.
    Succeeded(T),
    /// Last dispatch failed; carries a loggable description.
    Failed(String),
}

impl<T> RequestState<T> {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The failure description, if the last dispatch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Proof of dispatch handed out by [`RequestTracker::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    /// Sequence number of the dispatch, starting at 1.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Monotonic dispatch counter for one kind of request.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Record a new dispatch and return its ticket.
    pub const fn dispatch(&mut self) -> FetchTicket {
        self.latest += 1;
        FetchTicket(self.latest)
    }

    /// Whether `ticket` belongs to the most recent dispatch.
    #[must_use]
    pub const fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }
}
