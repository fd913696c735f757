/// Elementary cellular automata used as spiking oscillators.
///
/// Each node runs an elementary CA over a packed, circular bit-vector and
/// low-pass filters its activity:
/// 1. `on` counts live cells after a step
/// 2. `low` tracks the typical `on`
/// 3. `complexity` tracks how far `on` strays from `low`
/// 4. `spike = exp(-complexity)` is high when the node has been calm
///
/// A calm node fires and swaps one word of state with its most chaotic
/// neighbor, which is the only coupling between nodes.
pub mod bits;
pub mod network;
pub mod node;

pub use bits::{Bits, Rule};
pub use network::{CaNetwork, Firing};
pub use node::CaNode;
