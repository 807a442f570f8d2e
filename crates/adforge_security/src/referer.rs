//! Strict referer origin checking.

use adforge_error::{SecurityError, SecurityErrorKind};
use tracing::{debug, instrument};
use url::Url;

/// Allow-list of origins permitted to call the API.
///
/// Matching is by exact origin (scheme, host, port), not by string prefix,
/// so `https://example.app.evil.com` cannot ride on an `https://example.app`
/// entry.
#[derive(Debug, Clone)]
pub struct RefererPolicy {
    allowed: Vec<Url>,
}

impl RefererPolicy {
    /// Builds a policy from configured origin strings.
    ///
    /// Entries that fail to parse as URLs are dropped with a warning rather
    /// than poisoning the whole policy.
    pub fn new(origins: &[String]) -> Self {
        let allowed = origins
            .iter()
            .filter_map(|origin| match Url::parse(origin) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(origin, error = %e, "Ignoring unparseable allowed origin");
                    None
                }
            })
            .collect();
        Self { allowed }
    }

    /// Checks a request's `Referer` header against the allow-list.
    #[instrument(skip(self))]
    pub fn check(&self, referer: Option<&str>) -> Result<(), SecurityError> {
        let Some(referer) = referer else {
            debug!("Request carried no referer");
            return Err(SecurityError::new(SecurityErrorKind::RefererMissing));
        };

        let url = Url::parse(referer).map_err(|_| {
            SecurityError::new(SecurityErrorKind::RefererRejected(referer.to_string()))
        })?;

        let permitted = self.allowed.iter().any(|allowed| {
            allowed.scheme() == url.scheme()
                && allowed.host_str() == url.host_str()
                && allowed.port_or_known_default() == url.port_or_known_default()
        });
        if permitted {
            debug!("Referer accepted");
            Ok(())
        } else {
            Err(SecurityError::new(SecurityErrorKind::RefererRejected(
                referer.to_string(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RefererPolicy {
        RefererPolicy::new(&[
            "http://localhost:3000".to_string(),
            "https://ai-ad-generator.vercel.app".to_string(),
        ])
    }

    #[test]
    fn allows_listed_origin_with_path() {
        assert!(policy()
            .check(Some("https://ai-ad-generator.vercel.app/generator?tab=auto"))
            .is_ok());
        assert!(policy().check(Some("http://localhost:3000/")).is_ok());
    }

    #[test]
    fn rejects_missing_referer() {
        let err = policy().check(None).unwrap_err();
        assert!(matches!(err.kind, SecurityErrorKind::RefererMissing));
    }

    #[test]
    fn rejects_foreign_origin() {
        assert!(policy().check(Some("https://evil.example.com/")).is_err());
    }

    #[test]
    fn rejects_prefix_spoofing() {
        assert!(policy()
            .check(Some("https://ai-ad-generator.vercel.app.evil.com/"))
            .is_err());
    }

    #[test]
    fn scheme_and_port_must_match() {
        assert!(policy().check(Some("https://localhost:3000/")).is_err());
        assert!(policy().check(Some("http://localhost:4000/")).is_err());
    }

    #[test]
    fn garbage_referer_is_rejected_not_fatal() {
        assert!(policy().check(Some("not a url")).is_err());
    }
}
