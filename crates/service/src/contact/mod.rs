//! Contact form: validate, store, then notify by email.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use configs::EmailConfig;
use models::contact_message::{self, CreateContactMessage};

use crate::crud::CrudService;
use crate::errors::ServiceError;
use crate::metrics::CONTACT_EMAILS_TOTAL;

pub mod mailer;

pub use mailer::{HttpMailer, MailError, Mailer, NoopMailer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContactReceipt {
    pub id: Uuid,
    pub email_sent: bool,
}

pub struct ContactService {
    messages: Arc<CrudService<contact_message::Model>>,
    mailer: Arc<dyn Mailer>,
}

impl ContactService {
    pub fn new(messages: Arc<CrudService<contact_message::Model>>, mailer: Arc<dyn Mailer>) -> Self {
        Self { messages, mailer }
    }

    /// Pick the HTTP mailer when credentials are present, otherwise disable delivery.
    pub fn from_config(messages: Arc<CrudService<contact_message::Model>>, cfg: &EmailConfig) -> Self {
        let mailer: Arc<dyn Mailer> = match HttpMailer::new(cfg.clone()) {
            Ok(m) => Arc::new(m),
            Err(e) => {
                warn!(error = %e, "contact emails disabled");
                Arc::new(NoopMailer)
            }
        };
        Self::new(messages, mailer)
    }

    /// The message is stored even when the email cannot be sent.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn submit(&self, input: CreateContactMessage) -> Result<ContactReceipt, ServiceError> {
        let input = input.validated()?;
        let stored = self.messages.create(input).await?;

        let email_sent = match self.mailer.send(&stored).await {
            Ok(()) => {
                CONTACT_EMAILS_TOTAL.with_label_values(&["sent"]).inc();
                true
            }
            Err(MailError::Config(reason)) => {
                CONTACT_EMAILS_TOTAL.with_label_values(&["disabled"]).inc();
                info!(message_id = %stored.id, %reason, "contact email skipped");
                false
            }
            Err(e) => {
                CONTACT_EMAILS_TOTAL.with_label_values(&["failed"]).inc();
                warn!(message_id = %stored.id, error = %e, "contact email failed");
                false
            }
        };

        Ok(ContactReceipt { id: stored.id, email_sent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheSettings;
    use crate::catalog::Catalog;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Recorder {
        sent: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for Recorder {
        async fn send(&self, _message: &contact_message::Model) -> Result<(), MailError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(MailError::Rejected { status: 502, body: "bad gateway".into() })
            } else {
                Ok(())
            }
        }
    }

    fn form(message: &str) -> CreateContactMessage {
        CreateContactMessage {
            name: "Huda".into(),
            email: "huda@example.com".into(),
            message: message.into(),
            ..Default::default()
        }
    }

    fn service(fail: bool) -> (Catalog, Arc<Recorder>, ContactService) {
        let catalog = Catalog::memory(CacheSettings::default());
        let recorder = Arc::new(Recorder { sent: AtomicUsize::new(0), fail });
        let svc = ContactService::new(catalog.messages.clone(), recorder.clone());
        (catalog, recorder, svc)
    }

    #[tokio::test]
    async fn invalid_form_stores_and_sends_nothing() {
        let (catalog, recorder, svc) = service(false);
        let err = svc.submit(form("too short")).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(recorder.sent.load(Ordering::SeqCst), 0);
        assert!(catalog.messages.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_form_is_stored_and_sent() {
        let (catalog, recorder, svc) = service(false);
        let receipt = svc.submit(form("Please call me about a redesign")).await.unwrap();
        assert!(receipt.email_sent);
        assert_eq!(recorder.sent.load(Ordering::SeqCst), 1);
        let stored = catalog.messages.require(receipt.id).await.unwrap();
        assert!(!stored.read);
    }

    #[tokio::test]
    async fn delivery_failure_keeps_the_message() {
        let (catalog, _, svc) = service(true);
        let receipt = svc.submit(form("Please call me about a redesign")).await.unwrap();
        assert!(!receipt.email_sent);
        assert_eq!(catalog.messages.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unconfigured_email_falls_back_to_noop() {
        let catalog = Catalog::memory(CacheSettings::default());
        let svc = ContactService::from_config(catalog.messages.clone(), &EmailConfig::default());
        let receipt = svc.submit(form("Please call me about a redesign")).await.unwrap();
        assert!(!receipt.email_sent);
    }
}
