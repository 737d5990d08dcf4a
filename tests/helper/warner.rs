//! Warner test utilities

use std::sync::Mutex;

use cms_fingerprint::fingerprint::changelog::Warner;

/// Warner that keeps every message it receives
#[derive(Default)]
pub struct RecordingWarner {
    messages: Mutex<Vec<String>>,
}

impl RecordingWarner {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Warner for RecordingWarner {
    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
