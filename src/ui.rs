//! Terminal rendering for the watcher: a spinner stands in for the loading
//! indicator and messages are printed in colour.
//!
//! Uses `indicatif` for the spinner and `console` for styling.

use std::sync::Mutex;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::sink::{Message, StatusSink};
use crate::watcher::{WatchOutcome, WatchReport};

/// [`StatusSink`] that writes to the terminal.
///
/// A terminal cannot un-print lines, so `clear` only removes the spinner and
/// `collapse`/`reveal` toggle whether anything is drawn at all.
pub struct TerminalSink {
    spinner: Mutex<Option<ProgressBar>>,
    // Line currently fading in, if any.
    fading: Mutex<Option<ProgressBar>>,
    visible: Mutex<bool>,
    job_label: String,
    green: Style,
    red: Style,
    dim: Style,
}

impl TerminalSink {
    pub fn new(job_label: impl Into<String>) -> Self {
        Self {
            spinner: Mutex::new(None),
            fading: Mutex::new(None),
            visible: Mutex::new(true),
            job_label: job_label.into(),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    fn is_visible(&self) -> bool {
        self.visible.lock().map(|v| *v).unwrap_or(true)
    }

    fn set_visible(&self, visible: bool) {
        if let Ok(mut v) = self.visible.lock() {
            *v = visible;
        }
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.spinner.lock().ok().and_then(|mut s| s.take())
    }

    /// Print the final report as pretty JSON.
    pub fn print_report(&self, report: &WatchReport) {
        let style = match report.outcome {
            Some(WatchOutcome::JobFailed(_)) => &self.red,
            _ => &self.dim,
        };
        println!();
        println!("{}", style.apply_to("─── Watch Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }
}

impl StatusSink for TerminalSink {
    fn collapse(&self) {
        self.set_visible(false);
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
    }

    fn clear(&self) {
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
    }

    fn show_loading(&self) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("checking {}", self.job_label));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(old) = slot.replace(pb)
        {
            old.finish_and_clear();
        }
    }

    fn reveal(&self) {
        self.set_visible(true);
    }

    /// Fading is approximated: the line is drawn dimmed, then redrawn in full
    /// colour once `fade_in` has elapsed. Without a Tokio runtime, or with a
    /// zero duration, it is printed in full colour straight away.
    fn append_message(&self, message: &Message, fade_in: Duration) {
        if !self.is_visible() {
            return;
        }
        let line = match message {
            Message::Status(_) => format!("  {} {message}", self.green.apply_to("•")),
            Message::Error(_) => format!("  {} {message}", self.red.apply_to("✗")),
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) if !fade_in.is_zero() => handle,
            _ => {
                println!("{line}");
                return;
            }
        };

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            pb.set_style(style);
        }
        pb.set_message(self.dim.apply_to(format!("  {message}")).to_string());
        if let Ok(mut slot) = self.fading.lock() {
            *slot = Some(pb.clone());
        }
        runtime.spawn(async move {
            tokio::time::sleep(fade_in).await;
            pb.finish_with_message(line);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_hides_and_reveal_shows() {
        let sink = TerminalSink::new("job-1");
        assert!(sink.is_visible());
        sink.collapse();
        assert!(!sink.is_visible());
        sink.reveal();
        assert!(sink.is_visible());
    }

    #[test]
    fn clear_drops_loading_spinner() {
        let sink = TerminalSink::new("job-1");
        sink.show_loading();
        assert!(sink.spinner.lock().unwrap().is_some());
        sink.clear();
        assert!(sink.spinner.lock().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn message_fades_in_over_given_duration() {
        let sink = TerminalSink::new("job-1");
        sink.append_message(&Message::Status("running".into()), Duration::from_millis(500));

        let pb = sink.fading.lock().unwrap().clone().unwrap();
        assert!(!pb.is_finished());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(pb.is_finished());
    }

    #[test]
    fn zero_fade_prints_immediately() {
        let sink = TerminalSink::new("job-1");
        sink.append_message(&Message::Error("boom".into()), Duration::ZERO);
        assert!(sink.fading.lock().unwrap().is_none());
    }
}
