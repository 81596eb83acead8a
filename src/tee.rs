//! Console and log file fan-out
//!
//! [`TeeWriter`] is both the report sink handed to the merge core and the
//! writer behind the tracing subscriber, so summary text and diagnostics end
//! up in the same places in the same order. Every write is flushed to every
//! sink before returning.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

type Sink = Arc<Mutex<dyn Write + Send>>;

/// Writes everything to stdout and, optionally, to an appended log file
#[derive(Clone, Default)]
pub struct TeeWriter {
    sinks: Vec<Sink>,
    has_file: bool,
}

impl TeeWriter {
    /// Writer without any sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer mirroring to stdout only
    pub fn console() -> Self {
        Self::new().with_sink(io::stdout())
    }

    /// Stdout plus `log`, when given
    pub fn for_log(log: Option<&Path>) -> io::Result<Self> {
        let tee = Self::console();
        match log {
            Some(path) => tee.with_log_file(path),
            None => Ok(tee),
        }
    }

    /// Add any writer as an additional sink
    pub fn with_sink<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.sinks.push(Arc::new(Mutex::new(writer)));
        self
    }

    /// Append to `path`, creating it if needed
    pub fn with_log_file(mut self, path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.has_file = true;
        Ok(self.with_sink(file))
    }

    /// True when a log file is among the sinks
    pub fn has_file(&self) -> bool {
        self.has_file
    }

    fn each_sink(&self, mut f: impl FnMut(&mut dyn Write) -> io::Result<()>) -> io::Result<()> {
        for sink in &self.sinks {
            let mut sink = sink
                .lock()
                .map_err(|_| io::Error::other("output sink lock poisoned"))?;
            f(&mut *sink)?;
        }
        Ok(())
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.each_sink(|sink| {
            sink.write_all(buf)?;
            sink.flush()
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.each_sink(|sink| sink.flush())
    }
}

impl<'a> MakeWriter<'a> for TeeWriter {
    type Writer = TeeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fans_out_to_every_sink() {
        let first = Shared::default();
        let second = Shared::default();
        let mut tee = TeeWriter::new()
            .with_sink(first.clone())
            .with_sink(second.clone());

        writeln!(tee, "Combined to: out.ngc").unwrap();
        assert_eq!(first.0.lock().unwrap().as_slice(), b"Combined to: out.ngc\n");
        assert_eq!(second.0.lock().unwrap().as_slice(), b"Combined to: out.ngc\n");
        assert!(!tee.has_file());
    }

    #[test]
    fn test_log_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge.log");
        std::fs::write(&path, "previous run\n").unwrap();

        let mut tee = TeeWriter::new().with_log_file(&path).unwrap();
        assert!(tee.has_file());
        tee.write_all(b"next run\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "previous run\nnext run\n"
        );
    }

    #[test]
    fn test_clones_share_sinks() {
        let sink = Shared::default();
        let tee = TeeWriter::new().with_sink(sink.clone());
        let mut writer = tee.make_writer();
        writer.write_all(b"via subscriber\n").unwrap();
        assert_eq!(sink.0.lock().unwrap().as_slice(), b"via subscriber\n");
    }
}
