use log::{Level, Log, Metadata, Record};
use std::fmt;

/// The target attached to every reported event.
const LOG_TARGET: &str = "png2icons";

/// Where a conversion reports its progress and failures.
///
/// A logger wraps an optional [`log::Log`] sink that the caller passes in
/// explicitly.  A silent logger reports nothing at all, not even errors;
/// callers that want to know why a conversion returned `None` must supply a
/// sink.  Pass `log::logger()` to forward to the globally installed logger.
#[derive(Clone, Copy, Default)]
pub struct Logger<'a> {
    sink: Option<&'a dyn Log>,
}

impl<'a> Logger<'a> {
    /// Creates a logger that reports to `sink`.
    pub fn new(sink: &'a dyn Log) -> Logger<'a> {
        Logger { sink: Some(sink) }
    }

    /// Creates a logger that reports nothing.
    pub fn silent() -> Logger<'a> {
        Logger { sink: None }
    }

    /// Returns true if this logger has a sink.
    pub fn is_silent(&self) -> bool {
        self.sink.is_none()
    }

    /// Reports progress.
    pub fn info(&self, args: fmt::Arguments) {
        self.emit(Level::Info, args);
    }

    /// Reports a failure.
    pub fn error(&self, args: fmt::Arguments) {
        self.emit(Level::Error, args);
    }

    fn emit(&self, level: Level, args: fmt::Arguments) {
        if let Some(sink) = self.sink {
            let metadata = Metadata::builder()
                .level(level)
                .target(LOG_TARGET)
                .build();
            if sink.enabled(&metadata) {
                sink.log(&Record::builder()
                    .metadata(metadata)
                    .args(args)
                    .module_path_static(Some(module_path!()))
                    .build());
            }
        }
    }
}

impl<'a> From<Option<&'a dyn Log>> for Logger<'a> {
    fn from(sink: Option<&'a dyn Log>) -> Logger<'a> {
        Logger { sink: sink }
    }
}

impl<'a> fmt::Debug for Logger<'a> {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.debug_struct("Logger")
            .field("silent", &self.is_silent())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// A sink that remembers every record it receives.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) records: Mutex<Vec<(Level, String)>>,
    }

    impl RecordingSink {
        pub(crate) fn messages(&self, level: Level) -> Vec<String> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|&&(record_level, _)| record_level == level)
                .map(|&(_, ref message)| message.clone())
                .collect()
        }
    }

    impl Log for RecordingSink {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            assert_eq!(record.target(), "png2icons");
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    #[test]
    fn reports_to_sink() {
        let sink = RecordingSink::default();
        let logger = Logger::new(&sink);
        logger.info(format_args!("made {} chunks", 3));
        logger.error(format_args!("failed"));
        assert_eq!(sink.messages(Level::Info), vec!["made 3 chunks"]);
        assert_eq!(sink.messages(Level::Error), vec!["failed"]);
    }

    #[test]
    fn silent_logger_reports_nothing() {
        let logger = Logger::silent();
        assert!(logger.is_silent());
        logger.error(format_args!("nobody hears this"));
        assert!(Logger::from(None::<&dyn Log>).is_silent());
    }
}
