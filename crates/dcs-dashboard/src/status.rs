use std::fmt::Display;

/// Identifies one in-flight action. Outcomes carrying a ticket from before
/// the last [`ActionStatus::reset`] are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Loading flag and banners of one page. Each page has a single loading
/// flag that disables all of its controls.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ActionStatus {
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    epoch: u64,
}

impl ActionStatus {
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Clears both banners. Every action starts with this.
    pub fn dismiss(&mut self) {
        self.error = None;
        self.notice = None;
    }

    /// Drop everything, including any action still in flight.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.loading = false;
        self.dismiss();
    }

    pub(crate) fn start(&mut self) -> Ticket {
        self.loading = true;
        Ticket(self.epoch)
    }

    /// Ends loading for `ticket`. Returns `false` if the ticket is stale and
    /// its outcome must be ignored.
    pub(crate) fn settle(&mut self, ticket: Ticket) -> bool {
        if ticket.0 != self.epoch {
            return false;
        }
        self.loading = false;
        true
    }

    pub(crate) fn fail(&mut self, err: impl Display) {
        self.loading = false;
        self.error = Some(err.to_string());
    }

    pub(crate) fn succeed(&mut self, notice: &str) {
        self.notice = Some(notice.to_owned());
    }
}
