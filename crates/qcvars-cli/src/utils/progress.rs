use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use qcvars::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Renders core progress events on stderr. `ProgressBar` is internally shared, so clones of
/// the handler (and the callbacks it hands out) all drive the same bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
    unit: &'static str,
}

impl CliProgressHandler {
    pub fn new(unit: &'static str) -> Self {
        Self::with_target(unit, ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state but never draws, for `--quiet` runs.
    pub fn hidden(unit: &'static str) -> Self {
        Self::with_target(unit, ProgressDrawTarget::hidden())
    }

    fn with_target(unit: &'static str, target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.finish_and_clear();
        Self { pb, unit }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();
        let unit = self.unit;

        Box::new(move |progress: Progress| match progress {
            Progress::PhaseStart { name } => {
                pb.reset();
                pb.set_length(0);
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                pb.set_message(name);
            }
            Progress::PhaseFinish => {
                pb.disable_steady_tick();
                pb.finish_with_message("✓ Done");
            }
            Progress::TaskStart { total_steps } => {
                pb.disable_steady_tick();
                pb.reset();
                pb.set_length(total_steps);
                pb.set_position(0);
                pb.set_style(Self::bar_style(unit));
            }
            Progress::TaskIncrement => pb.inc(1),
            Progress::TaskFinish => {
                let total = pb.length().unwrap_or(0);
                if pb.position() < total {
                    pb.set_position(total);
                }
                pb.finish();
            }
            Progress::Message(msg) => {
                if pb.is_finished() {
                    pb.set_message(msg);
                } else {
                    pb.println(format!("  {}", msg));
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style(unit: &str) -> ProgressStyle {
        let template = format!(
            "{{msg:<24}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{elapsed}})",
            unit
        );
        ProgressStyle::with_template(&template)
            .expect("Failed to create bar style template")
            .progress_chars("##-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::hidden("quantities");
        assert_eq!(handler.pb.length(), Some(0));
        assert!(handler.pb.is_finished());
    }

    #[test]
    fn callback_updates_progress_bar_state() {
        let handler = CliProgressHandler::hidden("quantities");
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Resolving Quantities",
        });
        assert_eq!(handler.pb.message(), "Resolving Quantities");
        assert!(!handler.pb.is_finished());

        callback(Progress::TaskStart { total_steps: 89 });
        assert_eq!(handler.pb.length(), Some(89));
        assert_eq!(handler.pb.position(), 0);

        callback(Progress::TaskIncrement);
        assert_eq!(handler.pb.position(), 1);

        callback(Progress::TaskFinish);
        assert!(handler.pb.is_finished());
        assert_eq!(handler.pb.position(), 89);

        callback(Progress::PhaseFinish);
        assert_eq!(handler.pb.message(), "✓ Done");
    }

    #[test]
    fn message_after_finish_replaces_bar_message() {
        let handler = CliProgressHandler::hidden("files");
        let callback = handler.get_callback();
        callback(Progress::Message("SAPT2 TOTAL ENERGY: missing input".to_string()));
        assert_eq!(handler.pb.message(), "SAPT2 TOTAL ENERGY: missing input");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::hidden("files");
        let callback = handler.get_callback();
        callback(Progress::TaskStart { total_steps: 8 });

        let callback = std::sync::Arc::new(callback);
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let callback = callback.clone();
                thread::spawn(move || {
                    callback(Progress::TaskIncrement);
                    callback(Progress::TaskIncrement);
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(handler.pb.position(), 8);
    }
}
