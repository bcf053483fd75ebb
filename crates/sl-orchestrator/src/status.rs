use std::sync::Arc;

use sl_db::Store;
use sl_domain::error::Result;
use sl_domain::model::SessionStatus;
use sl_domain::trace::TraceEvent;
use uuid::Uuid;

/// Project an outcome onto every affected session's status, emitting one
/// trace event per session so a single failed batch doesn't hide which
/// sessions it touched.
pub async fn mark_sessions(store: &Arc<dyn Store>, session_ids: &[Uuid], status: SessionStatus) -> Result<()> {
    for &id in session_ids {
        store.set_session_status(id, status).await?;
        TraceEvent::SessionStatusChanged {
            session_id: id.to_string(),
            status: status.as_str().to_string(),
        }
        .emit();
    }
    Ok(())
}
