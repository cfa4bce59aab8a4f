use super::{Navigator, Session, SessionContext};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unknown,
    Checking,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    fn can_transition_to(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Unknown, SessionState::Checking)
                | (SessionState::Checking, SessionState::Authenticated)
                | (SessionState::Checking, SessionState::Unauthenticated)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Authenticated | SessionState::Unauthenticated
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unknown => "unknown",
            SessionState::Checking => "checking",
            SessionState::Authenticated => "authenticated",
            SessionState::Unauthenticated => "unauthenticated",
        };
        f.write_str(name)
    }
}

/// Gate in front of one mount of a protected view tree.
///
/// Create a fresh guard on every navigation. The guard checks the session
/// once, issues at most one redirect, and [`SessionGuard::render`] consumes
/// it, so protected children are produced at most once per mount.
pub struct SessionGuard<'a> {
    context: &'a SessionContext,
    navigator: &'a dyn Navigator,
    requested_path: Option<String>,
    state: SessionState,
    transitions: Vec<SessionState>,
    session: Option<Session>,
}

impl<'a> SessionGuard<'a> {
    pub fn mount(context: &'a SessionContext, navigator: &'a dyn Navigator) -> Self {
        Self {
            context,
            navigator,
            requested_path: None,
            state: SessionState::Unknown,
            transitions: vec![SessionState::Unknown],
            session: None,
        }
    }

    /// Path of the view being guarded, carried to login as `next`.
    pub fn for_path(mut self, path: impl Into<String>) -> Self {
        self.requested_path = Some(path.into());
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state this mount has been in, starting with `Unknown`.
    pub fn transitions(&self) -> &[SessionState] {
        &self.transitions
    }

    /// Run the session check. Later calls return the settled state without
    /// touching storage or the navigator again.
    pub fn check(&mut self) -> SessionState {
        if self.state != SessionState::Unknown {
            return self.state;
        }

        self.transition(SessionState::Checking);

        match self.context.session() {
            Some(session) => {
                self.session = Some(session);
                self.transition(SessionState::Authenticated);
                debug!(path = ?self.requested_path, "Session confirmed");
            }
            None => {
                self.transition(SessionState::Unauthenticated);
                let target = self
                    .context
                    .login_redirect(self.requested_path.as_deref());
                info!(path = ?self.requested_path, target = %target, "No session, redirecting to login");
                self.navigator.redirect(&target);
            }
        }

        self.state
    }

    /// Render the protected children when the session is confirmed. Returns
    /// `None` (and renders nothing at all) otherwise.
    pub fn render<T>(mut self, children: impl FnOnce(&Session) -> T) -> Option<T> {
        self.check();

        match (self.state, self.session.as_ref()) {
            (SessionState::Authenticated, Some(session)) => Some(children(session)),
            _ => None,
        }
    }

    fn transition(&mut self, next: SessionState) {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "Ignoring invalid session transition");
            return;
        }
        self.state = next;
        self.transitions.push(next);
    }
}
