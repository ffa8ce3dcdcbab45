use async_trait::async_trait;
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder, URL_SAFE_NO_PAD,
};

use super::{PushFailure, PushTransport};

/// Web Push delivery with VAPID authentication.
pub struct WebPushTransport {
    client: IsahcWebPushClient,
    private_key: String,
    subject: String,
    ttl: u32,
}

impl WebPushTransport {
    pub fn new(private_key: &str, subject: &str, ttl: u32) -> anyhow::Result<Self> {
        let client = IsahcWebPushClient::new()?;
        // Fail at startup rather than on the first send if the key is unusable.
        VapidSignatureBuilder::from_base64_no_sub(private_key, URL_SAFE_NO_PAD)?;

        Ok(Self {
            client,
            private_key: private_key.to_string(),
            subject: subject.to_string(),
            ttl,
        })
    }
}

fn classify(err: WebPushError) -> PushFailure {
    match err {
        WebPushError::EndpointNotValid => PushFailure::PermanentlyInvalid,
        other => PushFailure::Rejected(other.to_string()),
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn send(&self, subscription: &serde_json::Value, payload: &[u8]) -> Result<(), PushFailure> {
        let info: SubscriptionInfo = serde_json::from_value(subscription.clone())
            .map_err(|e| PushFailure::Rejected(format!("malformed subscription: {e}")))?;

        let mut signature = VapidSignatureBuilder::from_base64(&self.private_key, URL_SAFE_NO_PAD, &info)
            .map_err(classify)?;
        signature.add_claim("sub", self.subject.as_str());
        let signature = signature.build().map_err(classify)?;

        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_ttl(self.ttl);
        builder.set_vapid_signature(signature);
        let message = builder.build().map_err(classify)?;

        self.client.send(message).await.map_err(classify)?;
        tracing::debug!(endpoint = %info.endpoint, "push message accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // P-256 private scalar, URL-safe base64 without padding.
    const PRIVATE_KEY: &str = "IQ9Ur0ykXoHS9gzfYX0aBjy9lvdrjx_PFUXmie9YRcY";

    #[test]
    fn only_gone_endpoints_are_permanent() {
        assert!(classify(WebPushError::EndpointNotValid).is_permanent());
        assert!(!classify(WebPushError::EndpointNotFound).is_permanent());
        assert!(!classify(WebPushError::ServerError(None)).is_permanent());
        assert!(!classify(WebPushError::Unauthorized).is_permanent());
    }

    #[test]
    fn new_checks_the_vapid_key() {
        assert!(WebPushTransport::new(PRIVATE_KEY, "mailto:admin@example.com", 60).is_ok());
        assert!(WebPushTransport::new("not a key!", "mailto:admin@example.com", 60).is_err());
    }

    #[tokio::test]
    async fn descriptor_without_keys_is_rejected() {
        let transport = WebPushTransport::new(PRIVATE_KEY, "mailto:admin@example.com", 60).unwrap();
        let result = transport.send(&serde_json::json!({ "endpoint": "x" }), b"{}").await;

        assert!(matches!(result, Err(PushFailure::Rejected(_))));
    }
}
