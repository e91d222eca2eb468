// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Outbound push/local notifications. Fire-and-forget: nothing reports
//! delivery back.

use std::sync::{Arc, Mutex};

pub trait Dispatcher: Send + Sync {
    fn schedule(&self, title: &str, body: &str);
}

/// Default dispatcher for the CLI: the message only reaches the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

impl Dispatcher for LogDispatcher {
    fn schedule(&self, title: &str, body: &str) {
        tracing::info!(title, body, "notification scheduled");
    }
}

/// Keeps every scheduled message in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingDispatcher {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn schedule(&self, title: &str, body: &str) {
        if let Ok(mut v) = self.sent.lock() {
            v.push((title.to_string(), body.to_string()));
        }
    }
}
