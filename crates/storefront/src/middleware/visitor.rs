//! Visitor identification.
//!
//! A visitor is whoever holds a given session cookie. The first request of a
//! new session mints a UUID and stores it under [`VISITOR_ID`]; later
//! requests read it back.

use tower_sessions::Session;
use uuid::Uuid;

/// Session key for the visitor ID.
pub const VISITOR_ID: &str = "visitor_id";

/// Get the visitor ID from the session, minting one if the session is new.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn visitor_id(session: &Session) -> Result<Uuid, tower_sessions::session::Error> {
    if let Some(id) = session.get::<Uuid>(VISITOR_ID).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    session.insert(VISITOR_ID, id).await?;
    tracing::debug!(visitor = %id, "Assigned visitor ID");
    Ok(id)
}
