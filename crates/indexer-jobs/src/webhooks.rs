use indexer_api::IndexerApiClient;
use indexer_api::requests::CreateWebhook;
use indexer_api::types::WebhookType;

use crate::error::{BackendError, post};

/// A webhook subscription to register with the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRegistration {
    /// subscription kind
    pub webhook_type: WebhookType,
    /// addresses to watch
    pub addresses: Vec<String>,
}

impl WebhookRegistration {
    /// The two subscriptions the indexer runs with: NFT bids and lending activity
    #[must_use]
    pub fn defaults(nft_address: String, lending_address: String) -> Vec<Self> {
        vec![
            Self {
                webhook_type: WebhookType::NftBids,
                addresses: vec![nft_address],
            },
            Self {
                webhook_type: WebhookType::Lending,
                addresses: vec![lending_address],
            },
        ]
    }
}

/// Result of registering a single webhook
#[derive(Debug)]
pub struct WebhookOutcome {
    /// which subscription this is about
    pub webhook_type: WebhookType,
    /// `Ok` when the backend accepted the registration
    pub result: Result<(), BackendError>,
}

impl WebhookOutcome {
    /// true when the backend accepted the registration
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Register one webhook.
///
/// # Errors
///
/// When the backend cannot be reached or rejects the registration
#[tracing::instrument(skip(backend), fields(webhook_type = %registration.webhook_type), err)]
pub async fn register_webhook(
    backend: &IndexerApiClient,
    registration: &WebhookRegistration,
) -> Result<(), BackendError> {
    post(
        backend,
        &CreateWebhook {
            webhook_type: registration.webhook_type,
            addresses: &registration.addresses,
        },
    )
    .await
}

/// Register every webhook one after the other.
///
/// A failed registration is logged and recorded, the remaining ones still run.
pub async fn register_webhooks(
    backend: &IndexerApiClient,
    registrations: &[WebhookRegistration],
) -> Vec<WebhookOutcome> {
    let mut outcomes = Vec::with_capacity(registrations.len());
    for registration in registrations {
        let result = register_webhook(backend, registration).await;
        match &result {
            Ok(()) => tracing::info!(webhook_type = %registration.webhook_type, "webhook registered"),
            Err(err) => {
                tracing::error!(webhook_type = %registration.webhook_type, %err, "webhook failed");
            }
        }
        outcomes.push(WebhookOutcome {
            webhook_type: registration.webhook_type,
            result,
        });
    }
    outcomes
}

/// true when every registration went through
#[must_use]
pub fn all_succeeded(outcomes: &[WebhookOutcome]) -> bool {
    outcomes.iter().all(WebhookOutcome::is_success)
}
