use alloc::vec::Vec;

use super::channel::{Channel, Mailbox};
use super::node::HarmonicNode;
use crate::config::{FireValue, HarmonicConfig, NoteSelection};
use crate::error::{expect_len, Result};
use crate::fixed_point::Fixed;

/// Flat parameter arrays a harmonic network is built from.
///
/// `delays` is row-major `size × size`: entry `i * size + j` is the delay of
/// the edge `i -> j`, and `no_edge` (or the diagonal) means no edge.
#[derive(Debug, Clone, Copy)]
pub struct HarmonicLayout<'a> {
    pub delays: &'a [u8],
    /// Two initial states per node
    pub states: &'a [Fixed],
    /// Three weights per node: `w0`, `w1`, `w2`
    pub weights: &'a [Fixed],
    /// One firing threshold `w3` per node
    pub thresholds: &'a [Fixed],
}

/// Mesh of harmonic nodes joined by delayed channels.
#[derive(Debug, Clone)]
pub struct HarmonicNetwork {
    nodes: Vec<HarmonicNode>,
    mailboxes: Vec<Mailbox>,
    selection: NoteSelection,
}

impl HarmonicNetwork {
    /// Builds the network described by `layout`.
    ///
    /// Every array must have exactly the length `config.size` implies.
    pub fn new(config: &HarmonicConfig, layout: HarmonicLayout<'_>) -> Result<Self> {
        config.validate()?;
        let n = config.size;
        expect_len("harmonic delays", n * n, layout.delays.len())?;
        expect_len("harmonic states", 2 * n, layout.states.len())?;
        expect_len("harmonic weights", 3 * n, layout.weights.len())?;
        expect_len("harmonic thresholds", n, layout.thresholds.len())?;

        let fire_value = match config.fire_value {
            FireValue::Signed(magnitude) => Some(Fixed::from_f64(magnitude)?),
            FireValue::Raw => None,
        };

        let mut nodes: Vec<HarmonicNode> = (0..n)
            .map(|i| {
                let s = &layout.states[2 * i..2 * i + 2];
                let w = &layout.weights[3 * i..3 * i + 3];
                HarmonicNode::new(
                    [s[0], s[1]],
                    [w[0], w[1], w[2], layout.thresholds[i]],
                    fire_value,
                )
            })
            .collect();

        let mut mailboxes = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let delay = layout.delays[i * n + j];
                if i == j || delay == config.no_edge {
                    continue;
                }
                nodes[i].add_output(Channel::new(delay, mailboxes.len()));
                nodes[j].add_input(mailboxes.len());
                mailboxes.push(Mailbox::new());
            }
        }

        for (node, &note) in nodes.iter_mut().zip(&config.notes) {
            node.note = note;
        }

        log::trace!(
            "harmonic network: {} nodes, {} channels",
            nodes.len(),
            mailboxes.len()
        );
        Ok(HarmonicNetwork {
            nodes,
            mailboxes,
            selection: config.note_selection,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[HarmonicNode] {
        &self.nodes
    }

    pub fn mailboxes(&self) -> &[Mailbox] {
        &self.mailboxes
    }

    /// Number of directed edges.
    pub fn channels(&self) -> usize {
        self.mailboxes.len()
    }

    /// Current amplitude of every node, in index order.
    pub fn amplitudes(&self) -> impl Iterator<Item = Fixed> + '_ {
        self.nodes.iter().map(HarmonicNode::amplitude)
    }

    /// Steps every node once in index order, appending this step's notes.
    ///
    /// Values delivered during the step become readable on the next one.
    pub fn step(&mut self, notes: &mut Vec<u8>) {
        let mut loudest: Option<(Fixed, u8)> = None;
        for node in self.nodes.iter_mut() {
            if !node.step(&mut self.mailboxes) || node.note == 0 {
                continue;
            }
            match self.selection {
                NoteSelection::All => notes.push(node.note),
                NoteSelection::Loudest => {
                    let amplitude = node.amplitude().abs();
                    if loudest.map_or(true, |(max, _)| amplitude > max) {
                        loudest = Some((amplitude, node.note));
                    }
                }
            }
        }
        if let Some((_, note)) = loudest {
            notes.push(note);
        }
        for mailbox in self.mailboxes.iter_mut() {
            mailbox.commit();
        }
    }

    /// Runs `iterations` steps and returns every note emitted.
    pub fn run(&mut self, iterations: usize) -> Vec<u8> {
        let mut notes = Vec::new();
        for _ in 0..iterations {
            self.step(&mut notes);
        }
        notes
    }
}
