use crate::types::{EventCursor, RuntimeEvent};
use sim_core::Tick;
use std::collections::VecDeque;

/// Bounded event log with cursor-based retrieval.
///
/// Sequence numbers are assigned in push order and never reused. When the
/// buffer is full the oldest entry is dropped, so a cursor that lags too far
/// behind skips ahead to the oldest retained event.
pub struct EventBuffer<E> {
    entries: VecDeque<RuntimeEvent<E>>,
    capacity: usize,
    next_sequence: u64,
}

impl<E: Clone> EventBuffer<E> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    /// Append an event, evicting the oldest entry when full.
    pub fn push(&mut self, tick: Tick, event: E) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(RuntimeEvent {
            sequence: self.next_sequence,
            tick,
            event,
        });
        self.next_sequence += 1;
    }

    /// Get events starting from the given cursor.
    /// Returns the events and a new cursor pointing past the last returned event.
    pub fn get_from_cursor(&self, cursor: EventCursor) -> (Vec<RuntimeEvent<E>>, EventCursor) {
        // Entries are contiguous in sequence, so the offset of the first
        // requested event is its distance from the oldest retained one.
        let events = match self.entries.front() {
            Some(oldest) => {
                let start = cursor.0.max(oldest.sequence);
                let skip = (start - oldest.sequence) as usize;
                self.entries.iter().skip(skip).cloned().collect()
            }
            None => Vec::new(),
        };
        (events, EventCursor(self.next_sequence))
    }

    /// Get the current sequence number (next cursor position).
    pub fn current_sequence(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_retrieve() {
        let mut buffer: EventBuffer<i32> = EventBuffer::new(10);

        buffer.push(1, 100);
        buffer.push(2, 200);
        buffer.push(3, 300);

        let (events, cursor) = buffer.get_from_cursor(EventCursor(0));
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].sequence, 0);
        assert_eq!(events[0].tick, 1);
        assert_eq!(events[0].event, 100);
        assert_eq!(events[1].sequence, 1);
        assert_eq!(events[2].sequence, 2);
        assert_eq!(cursor.0, 3);
    }

    #[test]
    fn test_cursor_continuation() {
        let mut buffer: EventBuffer<i32> = EventBuffer::new(10);

        buffer.push(1, 100);
        buffer.push(2, 200);

        let (events, cursor) = buffer.get_from_cursor(EventCursor(0));
        assert_eq!(events.len(), 2);

        buffer.push(3, 300);
        buffer.push(4, 400);

        let (events, cursor) = buffer.get_from_cursor(cursor);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sequence, 2);
        assert_eq!(events[1].sequence, 3);
        assert_eq!(cursor.0, 4);
    }

    #[test]
    fn test_overflow_drops_old_events() {
        let mut buffer: EventBuffer<i32> = EventBuffer::new(3);

        buffer.push(1, 100);
        buffer.push(2, 200);
        buffer.push(3, 300);
        buffer.push(4, 400);

        let (events, cursor) = buffer.get_from_cursor(EventCursor(0));
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].sequence, 1);
        assert_eq!(events[0].event, 200);
        assert_eq!(cursor.0, 4);
    }

    #[test]
    fn test_cursor_past_available() {
        let mut buffer: EventBuffer<i32> = EventBuffer::new(3);

        for i in 0..10 {
            buffer.push(i, i as i32 * 100);
        }

        let (events, cursor) = buffer.get_from_cursor(EventCursor(0));
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].sequence, 7);
        assert_eq!(cursor.0, 10);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer: EventBuffer<i32> = EventBuffer::new(10);
        let (events, cursor) = buffer.get_from_cursor(EventCursor(0));
        assert!(events.is_empty());
        assert_eq!(cursor.0, 0);
    }

    #[test]
    fn test_cursor_at_end() {
        let mut buffer: EventBuffer<i32> = EventBuffer::new(10);

        buffer.push(1, 100);
        buffer.push(2, 200);

        let (events, _) = buffer.get_from_cursor(EventCursor(2));
        assert!(events.is_empty());
    }
}
