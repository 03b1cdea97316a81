//! The consuming side: receives finished lines and writes them to the
//! destination, reopening the destination when asked to.

use crate::timestamp::TimestampFormat;
use crossbeam_channel::{never, select, Receiver};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, Write},
    path::PathBuf,
    thread::JoinHandle,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File { path: PathBuf, truncate: bool },
}

impl Destination {
    /// Open the destination for writing. Files are created if missing and
    /// either truncated or appended to.
    pub fn open(&self) -> io::Result<Handle> {
        match self {
            Self::Stdout => Ok(Handle::Stdout(io::stdout())),
            Self::File { path, truncate } => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(*truncate)
                .append(!*truncate)
                .open(path)
                .map(Handle::File),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

/// An open destination. Dropping it closes the file; standard output is
/// never closed.
pub enum Handle {
    Stdout(io::Stdout),
    File(File),
}

impl Write for Handle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(out) => out.write(buf),
            Self::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(out) => out.flush(),
            Self::File(file) => file.flush(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Keep one handle open, reopen it when triggered.
    #[default]
    Persistent,
    /// Open, write and close the destination for every line.
    ReopenPerLine,
}

/// Counters reported when the writer shuts down.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriterStats {
    pub written: u64,
    pub failed: u64,
    pub reopens: u64,
}

enum State {
    Open(Handle),
    Closed,
}

enum Event {
    Line(String),
    Reopen,
    LinesClosed,
    TriggersClosed,
}

pub struct OutputWriter {
    destination: Destination,
    policy: WritePolicy,
    /// Used for the reopen marker line.
    timestamp: TimestampFormat,
    stats: WriterStats,
}

impl OutputWriter {
    pub fn new(destination: Destination, policy: WritePolicy, timestamp: TimestampFormat) -> Self {
        Self {
            destination,
            policy,
            timestamp,
            stats: WriterStats::default(),
        }
    }

    /// Run the writer on its own thread.
    pub fn spawn(self, lines: Receiver<String>, reopen: Receiver<()>) -> JoinHandle<WriterStats> {
        std::thread::spawn(move || self.run(lines, reopen))
    }

    /// Write every line received on `lines` until the channel disconnects.
    ///
    /// Failures to open or write are logged and the line is dropped; the
    /// writer itself keeps going.
    pub fn run(mut self, lines: Receiver<String>, mut reopen: Receiver<()>) -> WriterStats {
        tracing::info!(destination = %self.destination, policy = ?self.policy, "writer started");

        let mut state = State::Closed;
        loop {
            let event = select! {
                recv(lines) -> msg => msg.map_or(Event::LinesClosed, Event::Line),
                recv(reopen) -> msg => msg.map_or(Event::TriggersClosed, |()| Event::Reopen),
            };

            match (event, self.policy) {
                (Event::Line(line), WritePolicy::Persistent) => {
                    if let State::Closed = state {
                        state = self.acquire();
                    }
                    match &mut state {
                        State::Open(handle) => self.write_line(handle, &line),
                        State::Closed => self.stats.failed += 1,
                    }
                }
                (Event::Line(line), WritePolicy::ReopenPerLine) => match self.acquire() {
                    State::Open(mut handle) => self.write_line(&mut handle, &line),
                    State::Closed => self.stats.failed += 1,
                },
                (Event::Reopen, WritePolicy::Persistent) => {
                    state = self.reopen(state);
                }
                (Event::Reopen, WritePolicy::ReopenPerLine) => {
                    tracing::debug!("reopen requested, destination is already reopened per line");
                }
                (Event::TriggersClosed, _) => reopen = never(),
                (Event::LinesClosed, _) => break,
            }
        }

        if let State::Open(mut handle) = state {
            if let Err(err) = handle.flush() {
                tracing::error!(%err, destination = %self.destination, "unable to flush");
            }
        }

        tracing::info!(
            written = self.stats.written,
            failed = self.stats.failed,
            reopens = self.stats.reopens,
            "writer stopped"
        );
        self.stats
    }

    fn acquire(&self) -> State {
        match self.destination.open() {
            Ok(handle) => State::Open(handle),
            Err(err) => {
                tracing::error!(%err, destination = %self.destination, "unable to open outfile");
                State::Closed
            }
        }
    }

    /// Mark the old handle, close it and open the destination again with the
    /// same flags.
    fn reopen(&mut self, state: State) -> State {
        // A trigger before the first line still leaves a marker.
        let state = match state {
            State::Closed => self.acquire(),
            open => open,
        };
        if let State::Open(mut handle) = state {
            let marker = format!("{} HUP\n", self.timestamp.now());
            if let Err(err) = handle.write_all(marker.as_bytes()).and_then(|()| handle.flush()) {
                tracing::error!(%err, destination = %self.destination, "unable to write reopen marker");
            }
        }

        self.stats.reopens += 1;
        tracing::info!(destination = %self.destination, "reopening");
        self.acquire()
    }

    fn write_line(&mut self, handle: &mut Handle, line: &str) {
        match handle.write_all(line.as_bytes()).and_then(|()| handle.flush()) {
            Ok(()) => self.stats.written += 1,
            Err(err) => {
                self.stats.failed += 1;
                tracing::error!(%err, destination = %self.destination, "unable to write line");
            }
        }
    }
}
