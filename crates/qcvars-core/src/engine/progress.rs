/// Events emitted while a batch of quantities (or of input files) is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// `total_steps` is the number of targets (or files) the following increments count toward.
    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// Free-form status line, e.g. a quantity that could not be resolved.
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn is_active(&self) -> bool {
        self.callback.is_some()
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Sends a [`Progress::Message`], building the text only when someone is listening.
    pub fn message(&self, text: impl FnOnce() -> String) {
        if let Some(cb) = &self.callback {
            cb(Progress::Message(text()));
        }
    }
}

impl std::fmt::Debug for ProgressReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));

        reporter.report(Progress::PhaseStart { name: "Resolving" });
        reporter.report(Progress::TaskStart { total_steps: 2 });
        reporter.report(Progress::TaskIncrement);
        drop(reporter);

        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::PhaseStart { name: "Resolving" },
                Progress::TaskStart { total_steps: 2 },
                Progress::TaskIncrement,
            ]
        );
    }

    #[test]
    fn message_text_is_built_only_for_active_reporters() {
        let silent = ProgressReporter::new();
        assert!(!silent.is_active());
        silent.message(|| panic!("text must not be built without a listener"));

        let received = Mutex::new(None);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            *received.lock().unwrap() = Some(event);
        }));
        assert!(reporter.is_active());
        reporter.message(|| format!("{} failed", "SAPT2 TOTAL ENERGY"));
        drop(reporter);

        assert_eq!(
            received.into_inner().unwrap(),
            Some(Progress::Message("SAPT2 TOTAL ENERGY failed".to_string()))
        );
    }
}
