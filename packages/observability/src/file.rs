//! Append-only JSONL log file sink.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Line-flushed writer appending to a log file.
///
/// Cloning shares the underlying handle, so one instance can serve as its
/// own `MakeWriter`.
#[derive(Clone)]
pub struct LogFileWriter {
    inner: Arc<Mutex<BufWriter<File>>>,
}

impl LogFileWriter {
    /// Open `path` for appending, creating parent directories as needed.
    pub fn new(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            inner: Arc::new(Mutex::new(BufWriter::with_capacity(8192, file))),
        })
    }
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.inner.lock();
        let written = guard.write(buf)?;
        // One line per event; flush so a crashed run still leaves its tail.
        guard.flush()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
