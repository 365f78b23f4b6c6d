//! Time-ordering of pre-fetched secondary packets against the primary stream

use std::collections::VecDeque;

/// Secondary packets sorted by decode time, waiting for a primary packet to pass them.
///
/// Keys are decode timestamps in a common time base. Equal keys keep their
/// read order.
#[derive(Debug)]
pub struct SubtitleQueue<T> {
    queue: VecDeque<(i64, T)>,
}

impl<T> SubtitleQueue<T> {
    /// Build the queue from packets in read order
    pub fn new(mut items: Vec<(i64, T)>) -> Self {
        items.sort_by_key(|(key, _)| *key);
        Self {
            queue: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Pop the next packet whose key is at or before `anchor`
    pub fn pop_due(&mut self, anchor: i64) -> Option<T> {
        match self.queue.front() {
            Some((key, _)) if *key <= anchor => self.queue.pop_front().map(|(_, item)| item),
            _ => None,
        }
    }

    /// Everything still queued, in order
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.queue.drain(..).map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
