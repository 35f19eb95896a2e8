//! Push notifications for the end-of-run report.

mod cloud_message;

pub use cloud_message::{format_payload, sanitize, CloudMessageNotifier};

use anyhow::Result;
use async_trait::async_trait;

/// Report worth a human's attention.
pub const PRIORITY_ISSUES: u8 = 1;
/// Routine report.
pub const PRIORITY_STATS: u8 = 0;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, priority: u8, message: &str) -> Result<()>;
}
