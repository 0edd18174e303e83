use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    db::{Database, Repository},
    error::AppResult,
    models::AuditLog,
};

pub fn log_audit(
    db: &Database,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    db.audit_logs.insert(AuditLog {
        id: Uuid::new_v4(),
        user_id,
        action: action.to_string(),
        resource: resource.map(str::to_string),
        metadata,
        created_at: Utc::now(),
    })?;

    Ok(())
}
