use super::LocatorError;
use tracing::debug;
use url::Url;

pub const BACKEND_URL_ENV: &str = "BACKEND_URL";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8080";

/// Resolves the base address of the clinical backend.
///
/// The address is read once when the locator is built and never changes
/// afterwards, so callers can hold a locator for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendLocator {
    base: Url,
}

impl BackendLocator {
    /// Build a locator from an optionally configured address. A missing or
    /// blank value falls back to [`DEFAULT_BACKEND_URL`].
    pub fn new(configured: Option<&str>) -> Result<Self, LocatorError> {
        let raw = configured
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BACKEND_URL);

        let base = Url::parse(raw).map_err(|e| LocatorError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match base.scheme() {
            "http" | "https" => {}
            other => return Err(LocatorError::UnsupportedScheme(other.to_string())),
        }

        if base.host_str().is_none() {
            return Err(LocatorError::InvalidUrl {
                url: raw.to_string(),
                reason: "missing host".to_string(),
            });
        }

        if base.query().is_some() || base.fragment().is_some() {
            return Err(LocatorError::InvalidUrl {
                url: raw.to_string(),
                reason: "base address cannot carry a query or fragment".to_string(),
            });
        }

        debug!(backend = %base, "Backend locator initialized");
        Ok(Self { base })
    }

    pub fn resolve(&self) -> &Url {
        &self.base
    }

    /// Append an absolute path (and optional query) to the base address.
    /// A path prefix on the base, such as `/v2`, is kept.
    pub fn join(&self, path_and_query: &str) -> Result<Url, LocatorError> {
        let base = self.base.as_str().trim_end_matches('/');
        let joined = if path_and_query.starts_with('/') {
            format!("{}{}", base, path_and_query)
        } else {
            format!("{}/{}", base, path_and_query)
        };

        Url::parse(&joined).map_err(|e| LocatorError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_loopback_default() {
        let locator = BackendLocator::new(None).unwrap();
        assert_eq!(locator.resolve().as_str(), "http://127.0.0.1:8080/");

        let blank = BackendLocator::new(Some("   ")).unwrap();
        assert_eq!(blank, locator);
    }

    #[test]
    fn configured_address_wins() {
        let locator = BackendLocator::new(Some("https://records.clinic.internal:9443")).unwrap();
        assert_eq!(locator.resolve().host_str(), Some("records.clinic.internal"));
        assert_eq!(locator.resolve().port(), Some(9443));
    }

    #[test]
    fn rejects_unusable_addresses() {
        assert!(matches!(
            BackendLocator::new(Some("not a url")),
            Err(LocatorError::InvalidUrl { .. })
        ));
        assert!(matches!(
            BackendLocator::new(Some("ftp://files.local")),
            Err(LocatorError::UnsupportedScheme(_))
        ));
        assert!(BackendLocator::new(Some("http://backend.local/?x=1")).is_err());
    }

    #[test]
    fn join_keeps_base_prefix_and_query() {
        let locator = BackendLocator::new(Some("http://backend.local:8000/v2/")).unwrap();
        let url = locator
            .join("/api/appointments/range?start=2024-01-01&end=2024-01-31")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://backend.local:8000/v2/api/appointments/range?start=2024-01-01&end=2024-01-31"
        );

        let relative = locator.join("api/rooms").unwrap();
        assert_eq!(relative.path(), "/v2/api/rooms");
    }
}
