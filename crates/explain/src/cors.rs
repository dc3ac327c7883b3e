use axum::http::HeaderValue;
use config::{AllowedOrigins, CorsConfig};

/// Decides the `Access-Control-Allow-Origin` value for a request.
pub(crate) struct CorsPolicy {
    allowed: AllowedOrigins,
}

impl CorsPolicy {
    pub(crate) fn new(config: CorsConfig) -> Self {
        Self {
            allowed: config.allow_origins,
        }
    }

    /// The allow-origin header value for the given request origin, if the
    /// origin is permitted.
    pub(crate) fn allow_origin(&self, origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        match &self.allowed {
            AllowedOrigins::Any => Some(HeaderValue::from_static("*")),
            AllowedOrigins::Explicit(urls) => {
                let origin = origin?;
                let origin_str = origin.to_str().ok()?;

                urls.iter()
                    .any(|url| &url[..url::Position::BeforePath] == origin_str)
                    .then(|| origin.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use config::{AllowedOrigins, CorsConfig};

    use super::CorsPolicy;

    #[test]
    fn wildcard_allows_without_an_origin_header() {
        let policy = CorsPolicy::new(CorsConfig::default());

        assert_eq!(Some(HeaderValue::from_static("*")), policy.allow_origin(None));
    }

    #[test]
    fn explicit_origins_echo_the_matching_origin() {
        let policy = CorsPolicy::new(CorsConfig {
            allow_origins: AllowedOrigins::Explicit(vec!["https://app.example.com".parse().unwrap()]),
        });

        let origin = HeaderValue::from_static("https://app.example.com");
        assert_eq!(Some(origin.clone()), policy.allow_origin(Some(&origin)));

        let other = HeaderValue::from_static("https://evil.example.com");
        assert_eq!(None, policy.allow_origin(Some(&other)));
        assert_eq!(None, policy.allow_origin(None));
    }
}
