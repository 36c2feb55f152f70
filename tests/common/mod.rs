#![allow(dead_code)]

use multiget::StatusObserver;
use std::sync::Mutex;

/// Keeps every line it receives so tests can inspect what was drawn.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    updates: Mutex<Vec<String>>,
    finished: Mutex<Option<String>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub fn finished(&self) -> Option<String> {
        self.finished.lock().ok().and_then(|f| f.clone())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl StatusObserver for RecordingObserver {
    fn update(&self, line: &str) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push(line.to_string());
        }
    }

    fn finish(&self, line: &str) {
        if let Ok(mut finished) = self.finished.lock() {
            *finished = Some(line.to_string());
        }
    }

    fn println(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

