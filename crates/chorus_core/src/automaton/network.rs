use alloc::format;
use alloc::vec::Vec;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::bits::Bits;
use super::node::CaNode;
use crate::config::AutomatonConfig;
use crate::error::{CoreError, Result};

/// A node firing on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Firing {
    /// Tick counter at the time of firing
    pub tick: u64,
    pub node: usize,
    /// Neighbor the node swapped state with
    pub partner: usize,
    pub spike: f64,
    pub note: u8,
}

/// Swap-coupled network of cellular automata.
///
/// Owns its RNG, so two networks built from the same seed and driven the
/// same way produce the same notes; nothing is shared between networks.
#[derive(Debug, Clone)]
pub struct CaNetwork {
    nodes: Vec<CaNode>,
    rng: ChaCha8Rng,
    scratch: Bits,
    ticks: u64,
}

impl CaNetwork {
    /// Builds `config.size` nodes with random states drawn from `seed`.
    pub fn new(seed: u64, config: &AutomatonConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let nodes = (0..config.size)
            .map(|_| CaNode::new(config, &mut rng))
            .collect();
        Ok(CaNetwork {
            nodes,
            rng,
            scratch: Bits::zeros(config.words),
            ticks: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[CaNode] {
        &self.nodes
    }

    pub fn node(&self, i: usize) -> &CaNode {
        &self.nodes[i]
    }

    pub fn node_mut(&mut self, i: usize) -> &mut CaNode {
        &mut self.nodes[i]
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Connects node `from` to node `to`; both must belong to this network.
    pub fn connect(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.nodes.len();
        if from >= len || to >= len {
            return Err(CoreError::InvalidConfig(format!(
                "connection {} -> {} outside a {}-node network",
                from, to, len
            )));
        }
        self.nodes[from].add_connection(to);
        Ok(())
    }

    /// Connects every node to its ring neighbors `i - 1` and `i + 1`.
    ///
    /// Neighbors are added in index order, once each, never the node itself.
    pub fn connect_ring(&mut self) {
        let n = self.nodes.len();
        for i in 0..n {
            let mut neighbors = [(i + n - 1) % n, (i + 1) % n];
            neighbors.sort_unstable();
            if neighbors[0] != i {
                self.nodes[i].add_connection(neighbors[0]);
            }
            if neighbors[1] != i && neighbors[1] != neighbors[0] {
                self.nodes[i].add_connection(neighbors[1]);
            }
        }
    }

    /// Gives node `i` the note `notes[i]`; extra nodes stay silent.
    pub fn attach_notes(&mut self, notes: &[u8]) {
        for (node, &note) in self.nodes.iter_mut().zip(notes) {
            node.note = note;
        }
    }

    /// Steps every node once, in index order, through the shared scratch buffer.
    pub fn step(&mut self) {
        for node in self.nodes.iter_mut() {
            node.step(&mut self.scratch);
        }
    }

    /// Exchanges a random word of node `n` with a random word of node `m`.
    ///
    /// The word index into `n` is drawn first, then the one into `m`.
    pub fn swap(&mut self, m: usize, n: usize) {
        let words = self.scratch.words().len();
        let a = self.rng.gen_range(0..words);
        let b = self.rng.gen_range(0..words);
        let from_n = self.nodes[n].state().word(a);
        let from_m = self.nodes[m].state().word(b);
        self.nodes[n].state_mut().set_word(a, from_m);
        self.nodes[m].state_mut().set_word(b, from_n);
    }

    /// Connected neighbor of `i` with the highest complexity (first wins ties).
    pub fn busiest_neighbor(&self, i: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &c in self.nodes[i].connections() {
            let complexity = self.nodes[c].complexity();
            match best {
                Some((_, max)) if complexity <= max => {}
                _ => best = Some((c, complexity)),
            }
        }
        best.map(|(c, _)| c)
    }

    /// One round of the driving policy followed by a network step.
    ///
    /// Every firing node with at least one connection swaps with its
    /// busiest neighbor and is reported to `on_fire`. Unconnected nodes
    /// never fire.
    pub fn tick<F: FnMut(Firing)>(&mut self, mut on_fire: F) {
        for i in 0..self.nodes.len() {
            if !self.nodes[i].test() {
                continue;
            }
            let Some(partner) = self.busiest_neighbor(i) else {
                continue;
            };
            self.swap(i, partner);
            on_fire(Firing {
                tick: self.ticks,
                node: i,
                partner,
                spike: self.nodes[i].spike(),
                note: self.nodes[i].note,
            });
        }
        self.step();
        self.ticks += 1;
    }

    /// Runs `iterations` ticks and returns the notes emitted, in order.
    pub fn run(&mut self, iterations: usize) -> Vec<u8> {
        let mut notes = Vec::new();
        for _ in 0..iterations {
            self.tick(|firing| {
                if firing.note > 0 {
                    notes.push(firing.note);
                }
            });
        }
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NOTES;

    fn config(size: usize) -> AutomatonConfig {
        AutomatonConfig {
            size,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_network() {
        let a = CaNetwork::new(5, &config(3)).unwrap();
        let b = CaNetwork::new(5, &config(3)).unwrap();
        let c = CaNetwork::new(6, &config(3)).unwrap();
        for i in 0..3 {
            assert_eq!(a.node(i).state(), b.node(i).state());
        }
        assert_ne!(a.node(0).state(), c.node(0).state());
    }

    #[test]
    fn test_swap_exchanges_exactly_one_word() {
        let mut net = CaNetwork::new(1, &config(3)).unwrap();
        net.node_mut(0).set_state(Bits::zeros(8)).unwrap();
        net.node_mut(1)
            .set_state(Bits::from_words(alloc::vec![u64::MAX; 8]))
            .unwrap();
        let bystander = net.node(2).state().clone();

        net.swap(1, 0);

        let moved_in: Vec<_> = net.node(0).state().words().iter().filter(|&&w| w != 0).collect();
        assert_eq!(moved_in, [&u64::MAX]);
        let moved_out: Vec<_> = net
            .node(1)
            .state()
            .words()
            .iter()
            .filter(|&&w| w != u64::MAX)
            .collect();
        assert_eq!(moved_out, [&0]);
        assert_eq!(net.node(0).state().count_ones(), 64);
        assert_eq!(net.node(1).state().count_ones(), 7 * 64);
        assert_eq!(net.node(2).state(), &bystander);
    }

    #[test]
    fn test_step_uses_shared_scratch_sequentially() {
        let mut net = CaNetwork::new(9, &config(4)).unwrap();
        let mut reference: Vec<CaNode> = net.nodes().to_vec();
        net.step();
        for node in reference.iter_mut() {
            let mut scratch = Bits::zeros(8);
            node.step(&mut scratch);
        }
        for (a, b) in net.nodes().iter().zip(&reference) {
            assert_eq!(a.state(), b.state());
            assert_eq!(a.on(), b.on());
        }
    }

    #[test]
    fn test_connect_rejects_foreign_nodes() {
        let mut net = CaNetwork::new(1, &config(2)).unwrap();
        assert!(net.connect(0, 1).is_ok());
        assert!(net.connect(0, 2).is_err());
        assert!(net.connect(5, 0).is_err());
    }

    #[test]
    fn test_unconnected_network_is_silent() {
        let mut net = CaNetwork::new(1, &config(7)).unwrap();
        net.attach_notes(&NOTES);
        assert!(net.run(2_000).is_empty());
        assert_eq!(net.ticks(), 2_000);
    }

    #[test]
    fn test_ring_network_plays_its_notes() {
        let mut net = CaNetwork::new(1, &config(7)).unwrap();
        net.connect_ring();
        net.attach_notes(&NOTES);
        for i in 0..7 {
            net.node_mut(i).threshold = 0.0;
        }
        let mut firings = Vec::new();
        net.tick(|f| firings.push(f));
        assert!(firings.is_empty(), "no node fires before its first step");

        // with a zero threshold every stepped node fires, in index order
        let notes = net.run(10);
        assert_eq!(notes.len(), 70);
        assert_eq!(&notes[..7], &NOTES);
        assert_eq!(&notes[63..], &NOTES);
    }

    #[test]
    fn test_busiest_neighbor_picks_highest_complexity() {
        let mut net = CaNetwork::new(2, &config(3)).unwrap();
        net.connect(0, 1).unwrap();
        net.connect(0, 2).unwrap();
        // before any step every complexity is zero: first connection wins
        assert_eq!(net.busiest_neighbor(0), Some(1));
        assert_eq!(net.busiest_neighbor(1), None);
        net.step();
        let expected = if net.node(2).complexity() > net.node(1).complexity() {
            2
        } else {
            1
        };
        assert_eq!(net.busiest_neighbor(0), Some(expected));
    }
}
