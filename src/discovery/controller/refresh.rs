/// Identifies one requested refetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Hands out increasing tickets so a fetch that completes after a newer one
/// was requested can be recognised and dropped.
#[derive(Debug, Default)]
pub struct RefreshTracker {
    latest: u64,
}

impl RefreshTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> RefreshTicket {
        self.latest += 1;
        RefreshTicket(self.latest)
    }

    pub fn is_latest(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_newest_ticket_is_current() {
        let mut tracker = RefreshTracker::new();
        let first = tracker.begin();
        assert!(tracker.is_latest(first));

        let second = tracker.begin();
        assert!(!tracker.is_latest(first));
        assert!(tracker.is_latest(second));
        assert!(second > first);
    }
}
