use reqwest::Client;
use serde_json::json;
use std::env;

use agora_app::mailer::{MailTransport, TransportError};

/// Delivers mail through an HTTP mail-provider API.
///
/// The provider endpoint accepts a JSON payload with sender, recipient,
/// subject and HTML body, authenticated by an optional bearer token. Any
/// non-success response or connection problem is reported as one opaque
/// transport failure; interpreting provider error codes is not our job.
pub struct HttpMailTransport {
    client: Client,
    url: String,
    token: Option<String>,
    from: String,
}

impl HttpMailTransport {
    pub fn from_env(mail_from: &str) -> Self {
        dotenvy::dotenv().ok();

        let url = match env::var("AGORA_MAIL_API_URL") {
            Ok(val) => val,
            Err(_) => panic!("You need to set env AGORA_MAIL_API_URL"),
        };
        let token = env::var("AGORA_MAIL_API_TOKEN").ok();

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            url,
            token,
            from: mail_from.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        let payload = json!({
            "from": self.from,
            "to": to,
            "subject": subject,
            "html_body": body,
        });

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError(format!(
                "mail provider returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
