//! Log destinations.

use crate::error::Result;
use crate::log_message::LogMessage;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, PoisonError};

/// Where a logger's messages end up.
#[derive(Clone)]
pub(crate) enum Destination {
    /// A dedicated thread appends to a file.
    File(Sender<LogMessage>),
    /// Lines are kept in memory for inspection.
    Memory(Arc<Mutex<Vec<String>>>),
}

impl Destination {
    pub fn send(&self, message: LogMessage) {
        match self {
            Destination::File(sender) => {
                let _ = sender.send(message);
            }
            // Keep recording after a writer panicked mid-push.
            Destination::Memory(lines) => lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(message.line()),
        }
    }
}

/// Appends messages to a file.
struct FileWriter {
    file: File,
}

impl FileWriter {
    fn open(log_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        Ok(Self { file })
    }

    fn write_message(&mut self, message: &LogMessage) {
        let line = format!("{}\n", message.line());
        if let Err(e) = self.file.write_all(line.as_bytes()) {
            eprintln!("Error writing log: {}", e);
            return;
        }
        if let Err(e) = self.file.flush() {
            eprintln!("Error flushing log: {}", e);
        }
    }

    fn run(mut self, receiver: Receiver<LogMessage>) {
        for message in receiver {
            self.write_message(&message);
        }
    }
}

/// Opens `log_path` and starts its writer thread.
///
/// The thread exits once every sender has been dropped.
pub(crate) fn spawn_file_destination(log_path: &Path) -> Result<Destination> {
    let writer = FileWriter::open(log_path)?;
    let (sender, receiver) = channel();
    std::thread::spawn(move || writer.run(receiver));
    Ok(Destination::File(sender))
}
