use super::{StoreError, TokenStore, DEFAULT_LOGIN_ROUTE, NEXT_QUERY_KEY};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// A confirmed session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value for the `Authorization` header of calls made on behalf of this session.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Session state handed explicitly to a protected view tree.
///
/// Every call to [`SessionContext::session`] reads the token store again, so
/// a token cleared elsewhere (logout, a rejected call) is seen on the next
/// navigation.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    login_route: String,
}

impl SessionContext {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
        }
    }

    pub fn with_login_route(mut self, login_route: impl Into<String>) -> Self {
        self.login_route = login_route.into();
        self
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// Current session, if storage holds a non-empty token. Storage failures
    /// count as signed out.
    pub fn session(&self) -> Option<Session> {
        match self.store.load() {
            Ok(Some(token)) if !token.trim().is_empty() => Some(Session { token }),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read session token, treating as signed out");
                None
            }
        }
    }

    pub fn sign_in(&self, token: &str) -> Result<(), StoreError> {
        if token.trim().is_empty() {
            return Err(StoreError::EmptyToken);
        }
        self.store.save(token)?;
        info!("Session started");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.store.clear()?;
        info!("Session ended");
        Ok(())
    }

    /// Feed back the status of a proxied call. A 401 means the backend no
    /// longer accepts the token: it is cleared so the next guarded navigation
    /// redirects to login. Returns `true` when the session was invalidated.
    pub fn observe_status(&self, status: u16) -> bool {
        if status != 401 {
            return false;
        }

        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear rejected session token");
        }
        info!("Session rejected by backend");
        true
    }

    /// Redirect target for an unauthenticated visit, carrying the requested
    /// path as `next` so login can return there.
    pub fn login_redirect(&self, requested: Option<&str>) -> String {
        match requested.filter(|path| !path.is_empty() && *path != self.login_route) {
            Some(path) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair(NEXT_QUERY_KEY, path)
                    .finish();
                format!("{}?{}", self.login_route, query)
            }
            None => self.login_route.clone(),
        }
    }
}
