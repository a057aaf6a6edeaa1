use std::fmt;

/// Identifier of one dispatched request.
///
/// Ids from one [`RequestSequence`] increase strictly, so a larger id was
/// issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id generator scoped to one transport instance.
///
/// # Examples
/// ```
/// use wikilayer_core::RequestSequence;
///
/// let mut sequence = RequestSequence::new();
/// let first = sequence.next_id();
/// let second = sequence.next_id();
/// assert!(second > first);
/// assert_eq!(sequence.last_issued(), Some(second));
/// ```
#[derive(Debug, Default, Clone)]
pub struct RequestSequence {
    issued: u64,
}

impl RequestSequence {
    /// Sequence that has issued nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    /// Allocate the next id. The first id is 1.
    pub const fn next_id(&mut self) -> RequestId {
        self.issued = self.issued.saturating_add(1);
        RequestId(self.issued)
    }

    /// Most recently allocated id.
    #[must_use]
    pub const fn last_issued(&self) -> Option<RequestId> {
        if self.issued == 0 {
            None
        } else {
            Some(RequestId(self.issued))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fresh_sequence_has_issued_nothing() {
        assert_eq!(RequestSequence::new().last_issued(), None);
    }

    #[rstest]
    fn ids_start_at_one_and_increase() {
        let mut sequence = RequestSequence::new();
        let ids: Vec<u64> = (0..3).map(|_| sequence.next_id().get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[rstest]
    fn separate_sequences_are_independent() {
        let mut left = RequestSequence::new();
        let mut right = RequestSequence::new();
        left.next_id();
        left.next_id();
        assert_eq!(right.next_id().get(), 1);
    }
}
