//! Audit-log collaborator for booking and status-change actions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub actor: String,
    pub action: String,
    pub target: String,
    pub detail: serde_json::Value,
    pub at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        target: impl Into<String>,
        detail: serde_json::Value,
    ) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            target: target.into(),
            detail,
            at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> anyhow::Result<()>;
}

/// Writes audit entries to the `audit` tracing target
#[derive(Debug, Default, Clone)]
pub struct TracingAuditLog;

#[async_trait]
impl AuditLog for TracingAuditLog {
    async fn record(&self, entry: AuditEntry) -> anyhow::Result<()> {
        info!(
            target: "audit",
            actor = %entry.actor,
            action = %entry.action,
            target_id = %entry.target,
            detail = %entry.detail,
            "[Audit] {} {} {}",
            entry.actor,
            entry.action,
            entry.target
        );
        Ok(())
    }
}

/// Record on a background task; the action being audited never waits on it
pub fn record(audit: &Arc<dyn AuditLog>, entry: AuditEntry) {
    let audit = audit.clone();
    tokio::spawn(async move {
        if let Err(e) = audit.record(entry).await {
            warn!("[Audit] Failed to record entry: {}", e);
        }
    });
}
