//! Human-readable status lines emitted while a run progresses

/// Receives status lines for live feedback.
///
/// The change log is the authoritative output; status lines are informative.
pub trait ProgressSink {
    fn status(&mut self, line: &str);
}

/// Discards every line
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn status(&mut self, _line: &str) {}
}

/// Forwards lines to `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn status(&mut self, line: &str) {
        tracing::info!("{}", line);
    }
}

/// Collects lines, mostly for tests
impl ProgressSink for Vec<String> {
    fn status(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl<P: ProgressSink + ?Sized> ProgressSink for &mut P {
    fn status(&mut self, line: &str) {
        (**self).status(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(sink: &mut dyn ProgressSink) {
        sink.status("comparing 2 sheets");
        sink.status("total differences: 3");
    }

    #[test]
    fn test_collecting_sink() {
        let mut lines: Vec<String> = Vec::new();
        emit(&mut lines);
        assert_eq!(lines, vec!["comparing 2 sheets", "total differences: 3"]);

        emit(&mut NoProgress);
    }
}
