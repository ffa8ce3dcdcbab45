//! Push transport port. Delivery failures are classified here so that
//! transport-specific status codes never travel further up.

mod webpush;
#[cfg(test)]
pub(crate) mod fake;

pub use self::webpush::WebPushTransport;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum PushFailure {
    /// The push service answered 410 Gone: the subscription will never work again.
    #[error("subscription is no longer valid")]
    PermanentlyInvalid,

    #[error("push delivery rejected: {0}")]
    Rejected(String),
}

impl PushFailure {
    pub fn is_permanent(&self) -> bool {
        matches!(self, PushFailure::PermanentlyInvalid)
    }

    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            PushFailure::PermanentlyInvalid => "gone",
            PushFailure::Rejected(_) => "rejected",
        }
    }
}

#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Encrypt and deliver `payload` to the endpoint described by `subscription`.
    async fn send(&self, subscription: &serde_json::Value, payload: &[u8]) -> Result<(), PushFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_gone_is_permanent() {
        assert!(PushFailure::PermanentlyInvalid.is_permanent());
        assert!(!PushFailure::Rejected("timed out after 10s".into()).is_permanent());
        assert_eq!(PushFailure::PermanentlyInvalid.reason(), "gone");
        assert_eq!(PushFailure::Rejected(String::new()).reason(), "rejected");
    }
}
