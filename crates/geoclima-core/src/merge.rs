//! Index-wise pairing of two independent event streams.

use std::collections::VecDeque;

use tracing::debug;

/// Whether a buffered element is waiting for its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingStatus {
    Idle,
    /// Bounds events buffered without a configuration partner.
    AwaitingConfig(usize),
    /// Configuration events buffered without a bounds partner.
    AwaitingBounds(usize),
}

impl PairingStatus {
    pub fn is_stalled(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Strict zip of bounds events and configuration events.
///
/// The i-th pair always holds the i-th element of each stream, whichever
/// arrived first. Buffers are unbounded: a stream that stops producing
/// leaves its partner's elements waiting.
#[derive(Debug, Clone)]
pub struct MergeCoordinator<B, C> {
    bounds: VecDeque<B>,
    configs: VecDeque<C>,
    paired: u64,
}

impl<B, C> Default for MergeCoordinator<B, C> {
    fn default() -> Self {
        Self {
            bounds: VecDeque::new(),
            configs: VecDeque::new(),
            paired: 0,
        }
    }
}

impl<B, C> MergeCoordinator<B, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bounds(&mut self, event: B) -> Option<(B, C)> {
        self.bounds.push_back(event);
        self.try_pair()
    }

    pub fn push_config(&mut self, event: C) -> Option<(B, C)> {
        self.configs.push_back(event);
        self.try_pair()
    }

    /// Number of pairs emitted so far.
    pub fn paired(&self) -> u64 {
        self.paired
    }

    pub fn pairing_status(&self) -> PairingStatus {
        match (self.bounds.len(), self.configs.len()) {
            (0, 0) => PairingStatus::Idle,
            (waiting, 0) => PairingStatus::AwaitingConfig(waiting),
            (_, waiting) => PairingStatus::AwaitingBounds(waiting),
        }
    }

    fn try_pair(&mut self) -> Option<(B, C)> {
        if self.bounds.is_empty() || self.configs.is_empty() {
            debug!(status = ?self.pairing_status(), "pairing unresolved");
            return None;
        }
        let bounds = self.bounds.pop_front()?;
        let config = self.configs.pop_front()?;
        self.paired += 1;
        debug!(index = self.paired, "paired bounds with configuration");
        Some((bounds, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_by_index_when_bounds_arrive_first() {
        let mut merge = MergeCoordinator::new();
        assert_eq!(merge.push_bounds("B1"), None);
        assert_eq!(merge.push_bounds("B2"), None);
        assert_eq!(merge.pairing_status(), PairingStatus::AwaitingConfig(2));
        assert_eq!(merge.push_config("C1"), Some(("B1", "C1")));
        assert_eq!(merge.push_config("C2"), Some(("B2", "C2")));
        assert_eq!(merge.pairing_status(), PairingStatus::Idle);
        assert_eq!(merge.paired(), 2);
    }

    #[test]
    fn pairs_by_index_when_config_arrives_first() {
        let mut merge = MergeCoordinator::new();
        assert_eq!(merge.push_config("C1"), None);
        assert_eq!(merge.push_bounds("B1"), Some(("B1", "C1")));
        assert_eq!(merge.push_config("C2"), None);
        assert!(merge.pairing_status().is_stalled());
        assert_eq!(merge.push_bounds("B2"), Some(("B2", "C2")));
    }
}
