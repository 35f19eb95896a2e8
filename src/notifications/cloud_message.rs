use super::Notifier;
use crate::config::NotifySettings;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

lazy_static! {
    static ref DISALLOWED: Regex =
        Regex::new(r#"[^a-zA-Z0-9 ~!@#$%^&*()_+=\[\]{}"'|\\-]+"#).unwrap();
}

#[derive(Serialize)]
struct CloudMessage<'a> {
    secret: &'a str,
    to: &'a str,
    device: Option<&'a str>,
    priority: &'a str,
    payload: &'a str,
}

/// Newlines become a literal `\n`; runs of any other character outside the
/// safe set become a single space.
pub fn sanitize(payload: &str) -> String {
    DISALLOWED
        .replace_all(&payload.replace('\n', "\\n"), " ")
        .into_owned()
}

/// `from [host]|priority|message`, with `|` stripped from the free text.
pub fn format_payload(from: &str, host: &str, priority: u8, message: &str) -> String {
    format!(
        "{} [{}]|{}|{}",
        from.replace('|', ""),
        host,
        priority,
        message.replace('|', "")
    )
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|h| h.trim().to_string())
        })
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Sends messages through an Automate-style cloud message endpoint.
pub struct CloudMessageNotifier {
    client: reqwest::Client,
    url: String,
    secret: String,
    to: String,
    from: String,
    host: String,
}

impl CloudMessageNotifier {
    pub fn new(client: reqwest::Client, settings: &NotifySettings, from: impl Into<String>) -> Self {
        Self {
            client,
            url: settings.url.clone(),
            secret: settings.secret.clone(),
            to: settings.to.clone(),
            from: from.into(),
            host: hostname(),
        }
    }
}

#[async_trait]
impl Notifier for CloudMessageNotifier {
    async fn notify(&self, priority: u8, message: &str) -> Result<()> {
        let payload = sanitize(&format_payload(&self.from, &self.host, priority, message));
        debug!("Sending cloud message to {}", self.to);

        let response = self
            .client
            .post(&self.url)
            .json(&CloudMessage {
                secret: &self.secret,
                to: &self.to,
                device: None,
                priority: "normal",
                payload: &payload,
            })
            .send()
            .await
            .context("Cloud message request failed")?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Cloud message request failed with status: {} {}",
                status,
                body
            ));
        }
        Ok(())
    }
}
