//! Opt-in diagnostic tracing for IR transformations.
//!
//! Tracing is configured by the caller and handed to the transformation at
//! construction time. Whether it is enabled never changes what a
//! transformation does, only what gets reported.

use std::fmt;
use std::io::Write;

/// Where trace output goes.
pub enum TraceSink {
    /// `log::debug!` under the transformation's debug category.
    Log,
    /// Caller-provided writer. Write errors are ignored.
    Writer(Box<dyn Write>),
}

impl fmt::Debug for TraceSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceSink::Log => f.write_str("Log"),
            TraceSink::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Trace switch plus sink.
#[derive(Debug)]
pub struct TraceConfig {
    enabled: bool,
    sink: TraceSink,
}

impl TraceConfig {
    pub fn disabled() -> Self {
        Self { enabled: false, sink: TraceSink::Log }
    }

    pub fn to_log() -> Self {
        Self { enabled: true, sink: TraceSink::Log }
    }

    pub fn to_writer<W: Write + 'static>(writer: W) -> Self {
        Self { enabled: true, sink: TraceSink::Writer(Box::new(writer)) }
    }

    /// Enable tracing if `spec` mentions `category` anywhere.
    ///
    /// `spec` is typically the value of a debug environment variable that
    /// the caller read itself, e.g. `"sycl-target-postfix,fusion"`.
    pub fn from_debug_spec(spec: Option<&str>, category: &str, sink: TraceSink) -> Self {
        let enabled = spec.is_some_and(|spec| spec.contains(category));
        Self { enabled, sink }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Emit one trace message for `category` if enabled.
    pub fn emit(&mut self, category: &str, args: fmt::Arguments<'_>) {
        if !self.enabled {
            return;
        }
        match &mut self.sink {
            TraceSink::Log => log::debug!(target: category, "{}", args),
            TraceSink::Writer(writer) => {
                let _ = writer.write_fmt(args);
            }
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_debug_spec_substring_match() {
        let cfg = TraceConfig::from_debug_spec(Some("foo,sycl-target-postfix"), "sycl-target-postfix", TraceSink::Log);
        assert!(cfg.is_enabled());

        let cfg = TraceConfig::from_debug_spec(Some("sycl-kernel-fusion"), "sycl-target-postfix", TraceSink::Log);
        assert!(!cfg.is_enabled());

        let cfg = TraceConfig::from_debug_spec(None, "sycl-target-postfix", TraceSink::Log);
        assert!(!cfg.is_enabled());
    }

    #[test]
    fn test_writer_sink_only_when_enabled() {
        let buf = SharedBuf::default();
        let mut cfg = TraceConfig::to_writer(buf.clone());
        cfg.emit("cat", format_args!("hello {}", 1));
        assert_eq!(String::from_utf8_lossy(&buf.0.borrow()), "hello 1");

        let buf = SharedBuf::default();
        let mut cfg = TraceConfig::from_debug_spec(Some("other"), "cat", TraceSink::Writer(Box::new(buf.clone())));
        cfg.emit("cat", format_args!("hello"));
        assert!(buf.0.borrow().is_empty());
    }
}
