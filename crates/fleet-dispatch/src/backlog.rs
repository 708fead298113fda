//! FIFO of requests waiting for a vehicle.

use std::collections::VecDeque;

use crate::Request;

/// Unmatched requests in arrival order.
///
/// Requests never expire and are never reordered: iteration order is both
/// the pickup priority and the greedy tie-break order.  There is no aging,
/// so a request nobody can reach waits forever.
#[derive(Debug, Clone, Default)]
pub struct RequestBacklog {
    queue: VecDeque<Request>,
}

impl RequestBacklog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Append requests at the tail, preserving their order.
    pub fn extend<I: IntoIterator<Item = Request>>(&mut self, requests: I) {
        self.queue.extend(requests);
    }

    /// Requests from oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Request> + '_ {
        self.queue.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Request> {
        self.queue.get(index)
    }

    /// Remove the requests at the given positions (as seen by [`iter`](Self::iter)),
    /// keeping the order of the rest.  Out-of-range positions are ignored.
    pub fn remove_positions(&mut self, positions: &[usize]) {
        if positions.is_empty() {
            return;
        }
        let mut doomed = vec![false; self.queue.len()];
        for &p in positions {
            if let Some(slot) = doomed.get_mut(p) {
                *slot = true;
            }
        }
        let mut i = 0;
        self.queue.retain(|_| {
            let keep = !doomed[i];
            i += 1;
            keep
        });
    }
}
