//! Interruption signals that trigger a coordinated shutdown.
use std::io;

/// Installed handlers for SIGINT, SIGTERM and SIGQUIT.
///
/// Handlers are registered when this value is created, so signals that
/// arrive before anyone waits on [`Interrupts::recv`] are still caught
/// instead of killing the process.
#[cfg(unix)]
pub struct Interrupts {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
    sigquit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Interrupts {
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
            sigquit: signal(SignalKind::quit())?,
        })
    }

    /// Waits for the next signal and returns its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigint.recv() => "SIGINT",
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigquit.recv() => "SIGQUIT",
        }
    }
}

/// Installed Ctrl+C handler.
#[cfg(windows)]
pub struct Interrupts {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl Interrupts {
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    pub async fn recv(&mut self) -> &'static str {
        self.ctrl_c.recv().await;
        "Ctrl+C"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn catches_signal_sent_before_waiting() {
        let mut interrupts = Interrupts::install().unwrap();

        let status = std::process::Command::new("kill")
            .args(["-QUIT", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let name = tokio::time::timeout(Duration::from_secs(5), interrupts.recv())
            .await
            .expect("signal was not delivered");
        assert_eq!(name, "SIGQUIT");
    }
}
