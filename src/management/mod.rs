mod auth;
mod session;

pub use auth::{CredentialProvider, StaticCredential, TokenManager};
pub use session::{
    KEY_LAST_FOUND, KEY_LAST_NOT_FOUND, KEY_LAST_NOT_FOUND_COUNT, KEY_LAST_PLAYLIST_URL,
    KEY_LAST_TOTAL, OperationGuard, Session, SessionStore,
};
