mod error;
mod extractor;

pub use error::AuthError;
pub use extractor::{Credential, CredentialExtractor};

pub const AUTHORIZATION_HEADER: &str = "Authorization";
