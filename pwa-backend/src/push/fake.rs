use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{PushFailure, PushTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Deliver,
    Gone,
    Reject,
    Hang,
}

/// Records every send and answers with a scripted outcome.
pub struct RecordingTransport {
    outcome: Outcome,
    sent: Mutex<Vec<(serde_json::Value, serde_json::Value)>>,
}

impl RecordingTransport {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// `(subscription, decoded payload)` for every call so far.
    pub fn sent(&self) -> Vec<(serde_json::Value, serde_json::Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    async fn send(&self, subscription: &serde_json::Value, payload: &[u8]) -> Result<(), PushFailure> {
        let decoded = serde_json::from_slice(payload).expect("payload is JSON");
        self.sent.lock().unwrap().push((subscription.clone(), decoded));

        match self.outcome {
            Outcome::Deliver => Ok(()),
            Outcome::Gone => Err(PushFailure::PermanentlyInvalid),
            Outcome::Reject => Err(PushFailure::Rejected("503 Service Unavailable".into())),
            Outcome::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }
}
