//! Email relay boundary
//!
//! The contact form hands validated messages to a third-party relay service.
//! The account's public key authenticates the call; the service id and
//! template id pick the mailbox and message layout. [`EmailRelay`] is the
//! seam; [`DryRunRelay`] records messages instead of sending them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Relay account settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub public_key: String,
    pub service_id: String,
    pub template_id: String,
}

impl ContactConfig {
    /// All three account fields are present
    pub fn is_configured(&self) -> bool {
        [&self.public_key, &self.service_id, &self.template_id]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Template parameters sent for one contact message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    /// `"Not specified"` when the visitor left it empty
    pub budget: String,
    pub message: String,
    /// `"Yes"` or `"No"`
    pub newsletter: String,
}

#[async_trait]
pub trait EmailRelay: Send {
    /// Deliver one message with the given account; resolves exactly once
    async fn send(
        &mut self,
        account: &ContactConfig,
        params: &TemplateParams,
    ) -> Result<(), RelayError>;
}

/// A message accepted by [`DryRunRelay`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub public_key: String,
    pub service_id: String,
    pub template_id: String,
    pub params: TemplateParams,
}

/// Relay that keeps messages in memory, optionally failing every send
#[derive(Debug, Default)]
pub struct DryRunRelay {
    sent: Vec<SentMessage>,
    failure: Option<RelayError>,
}

impl DryRunRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: RelayError) -> Self {
        Self {
            sent: Vec::new(),
            failure: Some(error),
        }
    }

    pub fn sent(&self) -> &[SentMessage] {
        &self.sent
    }
}

#[async_trait]
impl EmailRelay for DryRunRelay {
    async fn send(
        &mut self,
        account: &ContactConfig,
        params: &TemplateParams,
    ) -> Result<(), RelayError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        tracing::info!(
            service = %account.service_id,
            template = %account.template_id,
            from = %params.from_email,
            subject = %params.subject,
            "Contact message accepted (dry run)"
        );
        self.sent.push(SentMessage {
            public_key: account.public_key.clone(),
            service_id: account.service_id.clone(),
            template_id: account.template_id.clone(),
            params: params.clone(),
        });
        Ok(())
    }
}
