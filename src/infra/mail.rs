//! HTTP mail relay used for order and review notifications.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::application::notify::{Notification, NotificationDispatcher, Notifier, NotifyError};
use crate::config::NotificationSettings;

use super::error::InfraError;

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Posts `{from, to, subject, html}` JSON to a mail relay endpoint.
#[derive(Clone)]
pub struct HttpMailNotifier {
    client: Client,
    endpoint: Url,
    token: Option<String>,
    sender: String,
    recipient: String,
}

impl HttpMailNotifier {
    pub fn new(
        endpoint: Url,
        token: Option<String>,
        sender: String,
        recipient: String,
    ) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .timeout(RELAY_TIMEOUT)
            .build()
            .map_err(|err| InfraError::configuration(format!("mail relay client: {err}")))?;

        Ok(Self {
            client,
            endpoint,
            token,
            sender,
            recipient,
        })
    }
}

#[async_trait]
impl Notifier for HttpMailNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut request = self.client.post(self.endpoint.clone()).json(&RelayMessage {
            from: &self.sender,
            to: &self.recipient,
            subject: &notification.subject,
            html: &notification.html,
        });
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Build the dispatcher for the configured relay, or a disabled one.
pub fn dispatcher_from_settings(
    settings: &NotificationSettings,
) -> Result<NotificationDispatcher, InfraError> {
    match (settings.endpoint.clone(), settings.recipient.clone()) {
        (Some(endpoint), Some(recipient)) => {
            let notifier = HttpMailNotifier::new(
                endpoint,
                settings.token.clone(),
                settings.sender.clone(),
                recipient,
            )?;
            Ok(NotificationDispatcher::new(Arc::new(notifier)))
        }
        _ => Ok(NotificationDispatcher::disabled()),
    }
}
