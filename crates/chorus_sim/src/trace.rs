//! CSV export of traces and run statistics.
//!
//! Every writer emits a header row and flushes before returning.

use std::io::Write;

use csv::Writer;

use crate::analysis::WindowEntropy;
use crate::error::Result;
use crate::runner::{FireEvent, HarmonicTrace, PairTrace};

/// `step,spike_0,spike_1`, one row per step.
pub fn write_spikes<W: Write>(trace: &PairTrace, out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["step", "spike_0", "spike_1"])?;
    for (step, [a, b]) in trace.spikes.iter().enumerate() {
        wtr.write_record([step.to_string(), a.to_string(), b.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per firing.
pub fn write_events<W: Write>(events: &[FireEvent], out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    for event in events {
        wtr.serialize(event)?;
    }
    if events.is_empty() {
        wtr.write_record(["step", "node", "partner", "spike", "note"])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `step,node_0,..,node_{n-1}`, one row per step.
pub fn write_amplitudes<W: Write>(trace: &HarmonicTrace, out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    let mut header = vec!["step".to_string()];
    header.extend((0..trace.amplitudes.len()).map(|n| format!("node_{}", n)));
    wtr.write_record(&header)?;

    let mut row = Vec::with_capacity(header.len());
    for step in 0..trace.steps() {
        row.clear();
        row.push(step.to_string());
        row.extend(trace.amplitudes.iter().map(|series| series[step].to_string()));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per entropy window.
pub fn write_windows<W: Write>(windows: &[WindowEntropy], out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    for window in windows {
        wtr.serialize(window)?;
    }
    if windows.is_empty() {
        wtr.write_record(["start", "histogram", "markov"])?;
    }
    wtr.flush()?;
    Ok(())
}
