use serde::{Deserialize, Serialize};

use crate::fixed_point::Fixed;

/// Slots per channel buffer and per mailbox.
pub const CAPACITY: usize = 8;

/// A value in flight; a slot with `delay == 0` is free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub delay: u8,
    pub value: Fixed,
}

/// Bounded FIFO at the receiving end of an edge.
///
/// Pushes land in a pending region and only become poppable after
/// [`Mailbox::commit`], which the network calls once per step. Pending and
/// visible values share the capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mailbox {
    slots: [Fixed; CAPACITY],
    head: usize,
    len: usize,
    visible: usize,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a value, or hands it back when the mailbox is full.
    pub fn try_push(&mut self, value: Fixed) -> core::result::Result<(), Fixed> {
        if self.len == CAPACITY {
            return Err(value);
        }
        self.slots[(self.head + self.len) % CAPACITY] = value;
        self.len += 1;
        Ok(())
    }

    /// Takes the oldest committed value.
    pub fn try_pop(&mut self) -> Option<Fixed> {
        if self.visible == 0 {
            return None;
        }
        let value = self.slots[self.head];
        self.head = (self.head + 1) % CAPACITY;
        self.len -= 1;
        self.visible -= 1;
        Some(value)
    }

    /// Makes everything pushed so far poppable.
    pub fn commit(&mut self) {
        self.visible = self.len;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Values a pop can return right now.
    pub fn visible(&self) -> usize {
        self.visible
    }
}

/// Delayed, lossy link from one node to a mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    delay: u8,
    buffer: [Message; CAPACITY],
    target: usize,
}

impl Channel {
    pub fn new(delay: u8, target: usize) -> Self {
        Channel {
            delay,
            buffer: [Message::default(); CAPACITY],
            target,
        }
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Mailbox index this channel delivers into.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Messages still waiting out their delay.
    pub fn in_flight(&self) -> usize {
        self.buffer.iter().filter(|m| m.delay != 0).count()
    }

    /// Sends `value` now (delay 0) or parks it in the first free slot.
    ///
    /// Full mailboxes and full buffers drop the value silently.
    pub fn send(&mut self, value: Fixed, mailboxes: &mut [Mailbox]) {
        if self.delay == 0 {
            let _ = mailboxes[self.target].try_push(value);
            return;
        }
        if let Some(slot) = self.buffer.iter_mut().find(|m| m.delay == 0) {
            *slot = Message {
                delay: self.delay,
                value,
            };
        }
    }

    /// Ages every parked message; those reaching zero are delivered and freed.
    pub fn step(&mut self, mailboxes: &mut [Mailbox]) {
        let target = &mut mailboxes[self.target];
        for message in self.buffer.iter_mut().filter(|m| m.delay != 0) {
            message.delay -= 1;
            if message.delay == 0 {
                let _ = target.try_push(message.value);
            }
        }
    }
}
