use std::sync::RwLock;

use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::auth::{AuthContext, User};
use shared_utils::jwt;

/// Source of the bearer token and target of the forced logout on `401`.
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn logout(&self);

    fn auth_context(&self) -> AuthContext {
        match self.token() {
            Some(token) => AuthContext::bearer(token),
            None => AuthContext::anonymous(),
        }
    }
}

/// Process-local session holding at most one access token.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.is_empty())),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.access_token.clone())
    }

    pub fn login(&self, token: impl Into<String>) {
        let token = token.into();
        debug!("[Auth] Storing access token ({} chars)", token.len());
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token).filter(|t| !t.is_empty());
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The user named by the token's claims, if the token is a readable JWT.
    pub fn user(&self) -> Option<User> {
        let token = self.token()?;
        match jwt::decode_claims(&token) {
            Ok(claims) => {
                if jwt::is_expired(&claims) {
                    warn!("[Auth] Access token for {} has expired", claims.sub);
                }
                Some(jwt::user_from_claims(claims))
            }
            Err(e) => {
                debug!("[Auth] Token is not a readable JWT: {}", e);
                None
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.token()
            .and_then(|token| jwt::decode_claims(&token).ok())
            .map(|claims| jwt::is_expired(&claims))
            .unwrap_or(false)
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn logout(&self) {
        info!("[Auth] Logging out, clearing session");
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}
