/// Harmonic oscillators coupled through delayed channels.
///
/// Every node runs `s0 <- w0·s0 + w1·s1 (+ w2·mean(inputs))` in fixed point
/// and fires when `|s0| > |w3|`. A firing node writes to each outgoing
/// [`Channel`], which holds the value for its delay before pushing it into
/// the receiver's [`Mailbox`]. Delivery is best effort: full buffers drop
/// values and empty mailboxes read as no input.
pub mod channel;
pub mod network;
pub mod node;

pub use channel::{Channel, Mailbox, Message};
pub use network::{HarmonicLayout, HarmonicNetwork};
pub use node::HarmonicNode;
