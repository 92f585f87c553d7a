use std::fmt;

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

/// 使用者通知的接收端；呼叫端不等待、也不檢查結果。 /
/// Fire-and-forget receiver for user-facing notifications.
pub trait NotificationSink {
    fn notify(&self, message: &str, severity: Severity);
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}

/// 將通知寫入 `tracing`。 / Routes notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => warn!(target: "dropsort::notify", %severity, "{message}"),
            Severity::Success | Severity::Info => {
                info!(target: "dropsort::notify", %severity, "{message}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn notify(&self, _message: &str, _severity: Severity) {}
}
