//! Fixed-capacity circular event log

use super::KeyEvent;

/// Ring buffer holding the most recent events
///
/// Storage is allocated once. When full, each push overwrites the oldest
/// event and raises the overflow flag, which stays set until the buffer is
/// cleared.
#[derive(Debug, Clone)]
pub struct EventBuffer {
    slots: Box<[KeyEvent]>,
    /// Index the next event is written to
    head: usize,
    len: usize,
    overflow: bool,
}

impl EventBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![KeyEvent::default(); capacity].into_boxed_slice(),
            head: 0,
            len: 0,
            overflow: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether events were lost since the last clear
    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    pub fn push(&mut self, event: KeyEvent) {
        let capacity = self.capacity();
        if capacity == 0 {
            self.overflow = true;
            return;
        }

        self.slots[self.head] = event;
        self.head = (self.head + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        } else {
            self.overflow = true;
        }
    }

    /// Up to `max_count` most recent events, oldest first
    pub fn recent(&self, max_count: usize) -> impl Iterator<Item = &KeyEvent> + '_ {
        let capacity = self.capacity();
        let count = self.len.min(max_count);
        let start = if capacity == 0 {
            0
        } else {
            (self.head + capacity - count) % capacity
        };
        (0..count).map(move |i| &self.slots[(start + i) % capacity])
    }

    /// Append up to `max_count` most recent events to `out`, oldest first.
    ///
    /// Does not allocate when `out` already has room for `capacity()` events.
    pub fn copy_recent_into(&self, out: &mut Vec<KeyEvent>, max_count: usize) {
        out.extend(self.recent(max_count).copied());
    }

    /// Drop all events and the overflow flag
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
        self.overflow = false;
    }
}
