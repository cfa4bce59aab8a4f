use super::{AuthError, AUTHORIZATION_HEADER};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use tracing::debug;

/// The caller's credential, exactly as it arrived. The gateway never
/// inspects its structure; the backend decides whether it is valid.
#[derive(Clone)]
pub struct Credential {
    value: HeaderValue,
}

impl Credential {
    /// Header value to forward verbatim to the backend.
    pub fn header_value(&self) -> &HeaderValue {
        &self.value
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct CredentialExtractor {
    header: HeaderName,
}

impl CredentialExtractor {
    pub fn new() -> Self {
        Self {
            header: HeaderName::from_static("authorization"),
        }
    }

    pub fn with_header(header: HeaderName) -> Self {
        Self { header }
    }

    /// Look up the credential header. Blank values and values that are not
    /// visible ASCII count as missing.
    pub fn extract(&self, headers: &HeaderMap) -> Option<Credential> {
        let value = headers.get(&self.header)?;

        match value.to_str() {
            Ok(text) if !text.trim().is_empty() => Some(Credential {
                value: value.clone(),
            }),
            Ok(_) => {
                debug!(header = AUTHORIZATION_HEADER, "Credential header is blank");
                None
            }
            Err(_) => {
                debug!(header = AUTHORIZATION_HEADER, "Credential header is not valid text");
                None
            }
        }
    }

    pub fn require(&self, headers: &HeaderMap) -> Result<Credential, AuthError> {
        self.extract(headers).ok_or(AuthError::MissingCredential)
    }
}

impl Default for CredentialExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(name: &'static str, value: &'static [u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_bytes(value).unwrap(),
        );
        headers
    }

    #[test]
    fn finds_credential_regardless_of_header_case() {
        let extractor = CredentialExtractor::new();
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_bytes(b"AUTHORIZATION").unwrap(),
            HeaderValue::from_static("Bearer abc.def"),
        );

        let credential = extractor.extract(&map).expect("credential present");
        assert_eq!(credential.header_value(), "Bearer abc.def");
    }

    #[test]
    fn missing_or_blank_is_missing() {
        let extractor = CredentialExtractor::new();
        assert!(extractor.extract(&HeaderMap::new()).is_none());
        assert!(extractor.extract(&headers("authorization", b"   ")).is_none());
        assert!(extractor
            .extract(&headers("authorization", b"Bearer \xff"))
            .is_none());
        assert_eq!(
            extractor.require(&HeaderMap::new()).unwrap_err(),
            AuthError::MissingCredential
        );
    }

    #[test]
    fn any_scheme_is_forwarded_verbatim() {
        let extractor = CredentialExtractor::new();
        let credential = extractor
            .extract(&headers("authorization", b"opaque-session-id"))
            .unwrap();
        assert_eq!(credential.header_value(), "opaque-session-id");

        let lower = extractor
            .extract(&headers("authorization", b"bearer xyz"))
            .unwrap();
        assert_eq!(lower.header_value(), "bearer xyz");
    }

    #[test]
    fn debug_output_hides_token() {
        let credential = CredentialExtractor::new()
            .extract(&headers("authorization", b"Bearer secret"))
            .unwrap();
        assert!(!format!("{:?}", credential).contains("secret"));
    }

    #[test]
    fn custom_header_name() {
        let extractor = CredentialExtractor::with_header(HeaderName::from_static("x-session"));
        assert!(extractor.extract(&headers("x-session", b"s-1")).is_some());
        assert!(extractor.extract(&headers("authorization", b"s-1")).is_none());
    }
}
