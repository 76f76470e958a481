//! Outbound email for contact submissions.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use configs::EmailConfig;
use models::contact_message;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email is not configured: {0}")]
    Config(String),
    #[error("email transport failed: {0}")]
    Transport(String),
    #[error("email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &contact_message::Model) -> Result<(), MailError>;
}

/// Template variables handed to the email provider.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl From<&contact_message::Model> for TemplateParams {
    fn from(m: &contact_message::Model) -> Self {
        Self {
            from_name: m.name.clone(),
            from_email: m.email.clone(),
            phone: m.phone.clone().unwrap_or_default(),
            subject: m.subject.clone().unwrap_or_default(),
            message: m.message.clone(),
        }
    }
}

/// EmailJS-compatible JSON API client.
pub struct HttpMailer {
    client: reqwest::Client,
    cfg: EmailConfig,
}

impl HttpMailer {
    pub fn new(cfg: EmailConfig) -> Result<Self, MailError> {
        if !cfg.is_configured() {
            return Err(MailError::Config("service_id, template_id and public_key are required".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(Self { client, cfg })
    }

    pub fn body(&self, message: &contact_message::Model) -> serde_json::Value {
        let mut body = json!({
            "service_id": self.cfg.service_id,
            "template_id": self.cfg.template_id,
            "user_id": self.cfg.public_key,
            "template_params": TemplateParams::from(message),
        });
        if let Some(token) = &self.cfg.access_token {
            body["accessToken"] = json!(token);
        }
        body
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &contact_message::Model) -> Result<(), MailError> {
        let resp = self
            .client
            .post(&self.cfg.endpoint)
            .json(&self.body(message))
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status, body });
        }
        Ok(())
    }
}

/// Used when no provider is configured; every send reports `Config`.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, _message: &contact_message::Model) -> Result<(), MailError> {
        Err(MailError::Config("email delivery disabled".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn configured() -> EmailConfig {
        EmailConfig {
            service_id: "svc".into(),
            template_id: "tpl".into(),
            public_key: "pk".into(),
            ..Default::default()
        }
    }

    fn message() -> contact_message::Model {
        contact_message::Model {
            id: Uuid::new_v4(),
            name: "Omar".into(),
            email: "omar@example.com".into(),
            phone: None,
            subject: Some("Quote".into()),
            message: "We need a new website".into(),
            read: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn unconfigured_mailer_is_rejected() {
        assert!(matches!(HttpMailer::new(EmailConfig::default()), Err(MailError::Config(_))));
    }

    #[test]
    fn body_matches_provider_shape() {
        let mailer = HttpMailer::new(configured()).unwrap();
        let body = mailer.body(&message());
        assert_eq!(body["service_id"], "svc");
        assert_eq!(body["user_id"], "pk");
        assert_eq!(body["template_params"]["from_email"], "omar@example.com");
        assert_eq!(body["template_params"]["phone"], "");
        assert!(body.get("accessToken").is_none());

        let mailer = HttpMailer::new(EmailConfig { access_token: Some("secret".into()), ..configured() }).unwrap();
        assert_eq!(mailer.body(&message())["accessToken"], "secret");
    }
}
