use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use super::channel::{Channel, Mailbox};
use crate::fixed_point::Fixed;

/// Two-tap linear recurrence with delayed coupling.
///
/// `weights` are `[w0, w1, w2, w3]`: feedback on the last two states,
/// coupling gain on the averaged input, and the firing threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonicNode {
    pub states: [Fixed; 2],
    pub weights: [Fixed; 4],
    /// Value sent on every channel when firing; `None` sends the state itself
    pub fire_value: Option<Fixed>,
    pub note: u8,
    outbox: Vec<Channel>,
    inbox: Vec<usize>,
}

impl HarmonicNode {
    pub fn new(states: [Fixed; 2], weights: [Fixed; 4], fire_value: Option<Fixed>) -> Self {
        HarmonicNode {
            states,
            weights,
            fire_value,
            note: 0,
            outbox: Vec::new(),
            inbox: Vec::new(),
        }
    }

    /// Current amplitude `s0`.
    pub fn amplitude(&self) -> Fixed {
        self.states[0]
    }

    pub fn outbox(&self) -> &[Channel] {
        &self.outbox
    }

    pub fn inbox(&self) -> &[usize] {
        &self.inbox
    }

    pub(crate) fn add_output(&mut self, channel: Channel) {
        self.outbox.push(channel);
    }

    pub(crate) fn add_input(&mut self, mailbox: usize) {
        self.inbox.push(mailbox);
    }

    /// Advances the node one step and reports whether it fired.
    pub fn step(&mut self, mailboxes: &mut [Mailbox]) -> bool {
        for channel in self.outbox.iter_mut() {
            channel.step(mailboxes);
        }

        let mut sum = Fixed::ZERO;
        let mut count = 0usize;
        for &i in &self.inbox {
            while let Some(value) = mailboxes[i].try_pop() {
                sum += value;
                count += 1;
            }
        }

        let [w0, w1, w2, w3] = self.weights;
        let previous = self.states[0];
        let mut next = w0.mul(previous) + w1.mul(self.states[1]);
        if count > 0 {
            next += w2.mul(sum.div_int(count));
        }
        self.states = [next, previous];

        if next.abs() <= w3.abs() {
            return false;
        }
        let out = match self.fire_value {
            Some(magnitude) => Fixed::with_sign_of(magnitude, next),
            None => next,
        };
        for channel in self.outbox.iter_mut() {
            channel.send(out, mailboxes);
        }
        true
    }
}
