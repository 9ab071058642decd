use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::config::WebhookConfig;
use crate::domain::ports::{ChangeEvent, Notifier};

/// Fire-and-forget webhook fan-out.
///
/// Each subscriber gets its own detached task, so one slow or failing
/// endpoint never blocks the others - and none of them ever block the
/// request path. Delivery failures are logged and swallowed.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoints: Arc<Vec<String>>,
}

impl WebhookNotifier {
    pub fn new(cfg: &WebhookConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoints: Arc::new(cfg.endpoints.clone()),
        })
    }
}

impl Notifier for WebhookNotifier {
    fn publish(&self, event: ChangeEvent) {
        let body = json!({
            "type": event.kind.as_str(),
            "data": event.data,
        });

        for endpoint in self.endpoints.iter() {
            let client = self.client.clone();
            let endpoint = endpoint.clone();
            let body = body.clone();
            let event_type = event.kind.as_str();

            tokio::spawn(async move {
                match client.post(&endpoint).json(&body).send().await {
                    Ok(response) if response.status().is_success() => {
                        tracing::debug!(endpoint, event = event_type, "Webhook delivered");
                    }
                    Ok(response) => {
                        tracing::warn!(
                            endpoint,
                            event = event_type,
                            status = %response.status(),
                            "Webhook delivery rejected (continuing)"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            endpoint,
                            event = event_type,
                            error = %e,
                            "Webhook delivery failed (continuing)"
                        );
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use httpmock::prelude::*;
    use serde_json::json;

    use crate::domain::ports::EventKind;

    use super::*;

    async fn wait_for_hits(mock: &httpmock::Mock<'_>, expected: usize) {
        for _ in 0..50 {
            if mock.hits_async().await >= expected {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("mock did not receive {expected} hits in time");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn event_reaches_every_subscriber() {
        let first = MockServer::start_async().await;
        let second = MockServer::start_async().await;

        let first_mock = first
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/hooks")
                    .json_body_includes(r#"{"type": "branch.created"}"#);
                then.status(200);
            })
            .await;
        let second_mock = second
            .mock_async(|when, then| {
                when.method(POST).path("/hooks");
                then.status(200);
            })
            .await;

        let notifier = WebhookNotifier::new(&WebhookConfig {
            endpoints: vec![
                format!("{}/hooks", first.base_url()),
                format!("{}/hooks", second.base_url()),
            ],
            timeout_secs: 2,
        })
        .unwrap();

        notifier.publish(ChangeEvent {
            kind: EventKind::BranchCreated,
            data: json!({"id": "b-1"}),
        });

        wait_for_hits(&first_mock, 1).await;
        wait_for_hits(&second_mock, 1).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failing_subscriber_does_not_block_the_rest() {
        let healthy = MockServer::start_async().await;
        let healthy_mock = healthy
            .mock_async(|when, then| {
                when.method(POST).path("/hooks");
                then.status(200);
            })
            .await;

        let notifier = WebhookNotifier::new(&WebhookConfig {
            endpoints: vec![
                // Nothing listens here; delivery fails.
                "http://127.0.0.1:1/hooks".to_owned(),
                format!("{}/hooks", healthy.base_url()),
            ],
            timeout_secs: 1,
        })
        .unwrap();

        notifier.publish(ChangeEvent {
            kind: EventKind::ReviewCreated,
            data: json!({"id": "r-1"}),
        });

        wait_for_hits(&healthy_mock, 1).await;
    }
}
