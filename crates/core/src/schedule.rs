//! The producing side: one line per tick, handed to the writer.

use crate::line::LineAssembler;
use crossbeam_channel::{tick, Sender};
use rand::{rngs::SmallRng, Rng};
use std::{thread::JoinHandle, time::Duration};

pub struct Scheduler<R = SmallRng> {
    assembler: LineAssembler<R>,
    period: Duration,
    count: Option<u64>,
}

impl<R: Rng> Scheduler<R> {
    /// `count` limits the number of lines, `None` runs until the writer goes away.
    pub fn new(assembler: LineAssembler<R>, period: Duration, count: Option<u64>) -> Self {
        Self {
            assembler,
            period,
            count,
        }
    }

    /// Produce a line every period and send it on `lines`.
    ///
    /// `lines` is expected to be a rendezvous channel, so a writer that falls
    /// behind holds back the next send and the effective rate drops instead
    /// of lines piling up. Returns the number of lines handed over.
    pub fn run(mut self, lines: Sender<String>) -> u64 {
        let ticker = tick(self.period);
        let mut sent = 0;

        tracing::info!(period = ?self.period, count = ?self.count, "scheduler started");
        while self.count.map_or(true, |count| sent < count) {
            if ticker.recv().is_err() {
                break;
            }

            let line = self.assembler.next_line();
            if lines.send(line).is_err() {
                tracing::warn!("writer went away, stopping");
                break;
            }
            sent += 1;
        }

        tracing::info!(sent, "scheduler stopped");
        sent
    }

    pub fn spawn(self, lines: Sender<String>) -> JoinHandle<u64>
    where
        R: Send + 'static,
    {
        std::thread::spawn(move || self.run(lines))
    }
}
