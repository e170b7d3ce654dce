//! Capturing `tracing` output in tests
//!
//! ```ignore
//! let logs = LogCapture::new();
//! let _guard = logs.set_default();
//! tracing::error!("boom");
//! assert!(logs.contains("boom"));
//! ```

use std::io;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log lines in memory
#[derive(Clone, Default)]
pub struct LogCapture {
  buffer: Arc<Mutex<Vec<u8>>>,
}

/// Writer handed to the fmt layer for each event
pub struct CaptureWriter {
  buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self
      .buffer
      .lock()
      .map_err(|_poisoned| io::Error::other("log buffer poisoned"))?
      .extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl<'a> MakeWriter<'a> for LogCapture {
  type Writer = CaptureWriter;

  fn make_writer(&'a self) -> Self::Writer {
    CaptureWriter {
      buffer: Arc::clone(&self.buffer),
    }
  }
}

impl LogCapture {
  pub fn new() -> Self {
    Self::default()
  }

  /// Route events on the current thread into this capture until the guard is
  /// dropped. Everything down to TRACE is recorded, without colors or
  /// timestamps.
  pub fn set_default(&self) -> DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
      .with_writer(self.clone())
      .with_max_level(tracing::Level::TRACE)
      .with_ansi(false)
      .without_time()
      .finish();
    tracing::subscriber::set_default(subscriber)
  }

  /// Everything captured so far
  pub fn contents(&self) -> String {
    let buffer = self.buffer.lock().expect("log buffer poisoned");
    String::from_utf8_lossy(&buffer).into_owned()
  }

  /// Lines containing `needle`
  pub fn lines_containing(&self, needle: &str) -> Vec<String> {
    self
      .contents()
      .lines()
      .filter(|line| line.contains(needle))
      .map(str::to_string)
      .collect()
  }

  pub fn contains(&self, needle: &str) -> bool {
    self.contents().contains(needle)
  }
}
