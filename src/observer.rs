//! Sinks for the aggregated status line.
use indicatif::{ProgressBar, ProgressStyle};

/// Receives rendered status lines from the aggregator.
pub trait StatusObserver: Send + Sync {
    /// Replaces the current status line.
    fn update(&self, line: &str);
    /// Shows the final status line and stops redrawing.
    fn finish(&self, line: &str);
    /// Prints a message above the status line.
    fn println(&self, message: &str);
}

/// Writes status to the terminal as a single overwritten line.
pub struct ConsoleObserver {
    pub pb: ProgressBar,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        // Plain message template keeps the line free of spinner glyphs.
        pb.set_style(
            ProgressStyle::with_template("{wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { pb }
    }

    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusObserver for ConsoleObserver {
    fn update(&self, line: &str) {
        self.pb.set_message(line.to_string());
    }

    fn finish(&self, line: &str) {
        self.pb.finish_with_message(line.to_string());
        if self.pb.is_hidden() {
            println!("{}", line);
        }
    }

    fn println(&self, message: &str) {
        if self.pb.is_hidden() {
            println!("{}", message);
        } else {
            self.pb.println(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_console_observer_tracks_message() {
        let observer = ConsoleObserver::hidden();
        observer.update("a.bin 42%");
        assert_eq!(observer.pb.message(), "a.bin 42%");
        observer.finish("a.bin 100%");
        assert!(observer.pb.is_finished());
    }
}
