//! Output sinks
//!
//! The rendered DOM and the verbose request/response echo go to a normal
//! output sink; validation and runtime errors go to a separate diagnostic
//! sink. Both default to the process streams but can be redirected to
//! files (or, for diagnostics, to stdout). Sinks are created before the
//! run and flushed after it; clones share the underlying writer so the
//! CDP event-listener tasks can emit echo lines.

use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::Arc;

enum SinkKind {
    Stdout(io::Stdout),
    Stderr(io::Stderr),
    File(LineWriter<File>),
}

/// A line-oriented writer shared across tasks.
#[derive(Clone)]
pub struct Sink {
    inner: Arc<Mutex<SinkKind>>,
}

impl Sink {
    /// A sink writing to standard output.
    pub fn stdout() -> Self {
        Self::from_kind(SinkKind::Stdout(io::stdout()))
    }

    /// A sink writing to standard error.
    pub fn stderr() -> Self {
        Self::from_kind(SinkKind::Stderr(io::stderr()))
    }

    /// A sink writing to the given file, created or truncated.
    pub fn file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_kind(SinkKind::File(LineWriter::new(file))))
    }

    fn from_kind(kind: SinkKind) -> Self {
        Self {
            inner: Arc::new(Mutex::new(kind)),
        }
    }

    /// Write one line, appending a newline.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self.inner.lock();
        match &mut *guard {
            SinkKind::Stdout(s) => writeln!(s, "{line}"),
            SinkKind::Stderr(s) => writeln!(s, "{line}"),
            SinkKind::File(f) => writeln!(f, "{line}"),
        }
    }

    /// Flush the underlying writer.
    pub fn flush(&self) -> io::Result<()> {
        let mut guard = self.inner.lock();
        match &mut *guard {
            SinkKind::Stdout(s) => s.flush(),
            SinkKind::Stderr(s) => s.flush(),
            SinkKind::File(f) => f.flush(),
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &*self.inner.lock() {
            SinkKind::Stdout(_) => "stdout",
            SinkKind::Stderr(_) => "stderr",
            SinkKind::File(_) => "file",
        };
        f.debug_tuple("Sink").field(&kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_file_sink_writes_lines() {
        let dir = std::env::temp_dir().join("domcurl-sink-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.txt");

        let sink = Sink::file(&path).unwrap();
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();
        sink.flush().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_clones_share_the_writer() {
        let dir = std::env::temp_dir().join("domcurl-sink-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("shared.txt");

        let sink = Sink::file(&path).unwrap();
        let clone = sink.clone();
        sink.write_line("from original").unwrap();
        clone.write_line("from clone").unwrap();
        clone.flush().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "from original\nfrom clone\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_stdout_sink_does_not_fail() {
        let sink = Sink::stdout();
        assert!(sink.flush().is_ok());
    }
}
