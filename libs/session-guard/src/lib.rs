mod context;
mod error;
mod guard;
mod navigator;
mod store;

pub use context::{Session, SessionContext};
pub use error::StoreError;
pub use guard::{SessionGuard, SessionState};
pub use navigator::{HistoryNavigator, Navigator};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const NEXT_QUERY_KEY: &str = "next";
