//! Outbound side of the clinic front end: where the backend lives and how
//! calls addressed to the front end's own API namespace reach it.

mod client;
mod error;
mod locator;
mod rewriter;

pub use client::{ApiClient, ApiResponse};
pub use error::{ClientError, LocatorError};
pub use locator::{BackendLocator, BACKEND_URL_ENV, DEFAULT_BACKEND_URL};
pub use rewriter::{RequestRewriter, Rewrite, DEFAULT_API_NAMESPACE};
