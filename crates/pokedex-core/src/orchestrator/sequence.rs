/// Identifies one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Issues monotonically increasing tickets so that only the most recently
/// started load is allowed to update the screen.
#[derive(Debug, Default)]
pub struct LoadSequence {
    latest: u64,
}

impl LoadSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load. Every ticket issued before this one becomes stale.
    pub fn issue(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }
}
