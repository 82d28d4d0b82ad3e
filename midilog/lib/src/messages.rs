//! Append-only log of described MIDI messages.
//!
//! Any number of [`LogWriter`]s, possibly on device threads, feed a
//! single [`MessageLog`] owned by the UI thread. Writes go through a
//! channel so they are never lost or interleaved, and a shared dirty
//! flag tells the UI there is something new to draw.

use crate::midi::{describe, MidiEvent};
use crossbeam::channel::{Receiver, Sender};
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: f64,
    pub description: String,
}

impl LogEntry {
    pub fn new(event: &MidiEvent) -> Self {
        Self {
            timestamp: event.timestamp(),
            description: describe(event),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  -  {}",
            crate::clock::format_time_of_day(self.timestamp),
            self.description
        )
    }
}

/// Coalescing "please refresh" notification.
#[derive(Debug, Clone, Default)]
pub struct RefreshSignal {
    dirty: Arc<AtomicBool>,
}

impl RefreshSignal {
    pub fn request(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether a refresh was requested since
    /// the last call.
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}

#[derive(Clone)]
pub struct LogWriter {
    sender: Sender<LogEntry>,
    refresh: RefreshSignal,
}

impl LogWriter {
    /// Describe the event and queue it for display. Never blocks.
    pub fn append(&self, event: &MidiEvent) {
        if let Err(e) = self.sender.send(LogEntry::new(event)) {
            log::warn!("message log is gone, dropping : {}", e.0.description);
            return;
        }

        self.refresh.request();
    }
}

pub struct MessageLog {
    entries: Vec<LogEntry>,
    receiver: Receiver<LogEntry>,
    refresh: RefreshSignal,
}

impl MessageLog {
    pub fn new() -> (Self, LogWriter) {
        let (sender, receiver) = crossbeam::channel::unbounded();
        let refresh = RefreshSignal::default();

        let log = Self {
            entries: vec![],
            receiver,
            refresh: refresh.clone(),
        };

        (log, LogWriter { sender, refresh })
    }

    pub fn refresh_signal(&self) -> &RefreshSignal {
        &self.refresh
    }

    /// Move every queued entry into the log. Returns `true` when new
    /// entries arrived, i.e. when the display should be refreshed.
    pub fn collect(&mut self) -> bool {
        if !self.refresh.take() {
            return false;
        }

        let count = self.entries.len();
        self.entries.extend(self.receiver.try_iter());
        self.entries.len() > count
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_at(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[LogEntry] {
        self.entries.as_slice()
    }
}
