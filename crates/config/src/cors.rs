//! CORS configuration for the explain endpoint.

use url::Url;

/// Configuration for CORS (Cross-Origin Resource Sharing).
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Origins from which browsers may call the explain endpoint.
    pub allow_origins: AllowedOrigins,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: AllowedOrigins::Any,
        }
    }
}

/// Either the `"*"` wildcard or an explicit list of origins.
#[derive(Clone, Debug, PartialEq)]
pub enum AllowedOrigins {
    /// Any origin is allowed.
    Any,
    /// A specific, explicit list of allowed origins.
    Explicit(Vec<Url>),
}

impl<'de> serde::Deserialize<'de> for AllowedOrigins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AllowedOriginsVisitor;

        impl<'de> serde::de::Visitor<'de> for AllowedOriginsVisitor {
            type Value = AllowedOrigins;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("expecting string \"*\", or an array of origin URLs")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if value == "*" {
                    Ok(AllowedOrigins::Any)
                } else {
                    value
                        .parse::<Url>()
                        .map_err(E::custom)
                        .map(|url| AllowedOrigins::Explicit(vec![url]))
                }
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut origins = Vec::new();

                while let Some(url) = seq.next_element()? {
                    origins.push(url);
                }

                Ok(AllowedOrigins::Explicit(origins))
            }
        }

        deserializer.deserialize_any(AllowedOriginsVisitor)
    }
}
