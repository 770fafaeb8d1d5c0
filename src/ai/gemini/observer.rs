//! Side channel for raw response bodies.
//!
//! The transport hands every body it reads to a [`ResponseObserver`] before
//! returning it. Observers get a borrowed view, so they cannot change what the
//! decoder sees.

use reqwest::StatusCode;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub trait ResponseObserver: Send + Sync {
    fn observe(&self, status: StatusCode, body: &str);
}

/// Logs bodies at `debug` under the `typed_gemini::response` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResponseObserver for TracingObserver {
    fn observe(&self, status: StatusCode, body: &str) {
        tracing::debug!(
            target: "typed_gemini::response",
            status = %status,
            "Gemini response body: {}",
            body
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ResponseObserver for NoopObserver {
    fn observe(&self, _status: StatusCode, _body: &str) {}
}

/// Call the observer, swallowing any panic so logging never breaks a call.
pub(crate) fn notify(observer: &Arc<dyn ResponseObserver>, status: StatusCode, body: &str) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| observer.observe(status, body)));
    if outcome.is_err() {
        tracing::warn!("Response observer panicked; continuing without it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<(u16, String)>>);

    impl ResponseObserver for Recording {
        fn observe(&self, status: StatusCode, body: &str) {
            self.0
                .lock()
                .unwrap()
                .push((status.as_u16(), body.to_string()));
        }
    }

    struct Exploding;

    impl ResponseObserver for Exploding {
        fn observe(&self, _status: StatusCode, _body: &str) {
            panic!("log sink unavailable");
        }
    }

    #[test]
    fn test_notify_forwards_body() {
        let recording = Arc::new(Recording::default());
        let observer: Arc<dyn ResponseObserver> = recording.clone();

        notify(&observer, StatusCode::OK, "{\"candidates\":[]}");

        let seen = recording.0.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(200, "{\"candidates\":[]}".to_string())]);
    }

    #[test]
    fn test_notify_survives_panicking_observer() {
        let observer: Arc<dyn ResponseObserver> = Arc::new(Exploding);
        notify(&observer, StatusCode::OK, "body");
    }
}
