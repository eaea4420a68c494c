use crate::error::ConfigError;
use std::fmt;

/// Object store flavours reachable through the S3 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreScheme {
    /// AWS S3 or any S3-compatible endpoint (MinIO, R2, ...)
    S3,
    /// Google Cloud Storage via its S3-interoperable XML API
    Gcs,
}

impl StoreScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreScheme::S3 => "s3",
            StoreScheme::Gcs => "gs",
        }
    }

    /// Endpoint used when none is configured explicitly.
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            StoreScheme::S3 => None,
            StoreScheme::Gcs => Some("https://storage.googleapis.com"),
        }
    }
}

/// A `scheme://bucket/prefix` location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUri {
    pub scheme: StoreScheme,
    pub bucket: String,
    pub prefix: String,
}

impl StoreUri {
    /// Splits the URI at the first `/` after the bucket name. The prefix is
    /// kept verbatim; an empty prefix selects the whole bucket.
    pub fn parse(uri: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidStoreUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| invalid("missing scheme"))?;

        let scheme = match scheme.to_ascii_lowercase().as_str() {
            "s3" => StoreScheme::S3,
            "gs" => StoreScheme::Gcs,
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };

        let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(invalid("missing bucket name"));
        }

        Ok(Self {
            scheme,
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        })
    }
}

impl fmt::Display for StoreUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme.as_str(), self.bucket, self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bucket_and_prefix() {
        let uri = StoreUri::parse("gs://my-bucket/data/2024/").unwrap();
        assert_eq!(uri.scheme, StoreScheme::Gcs);
        assert_eq!(uri.bucket, "my-bucket");
        assert_eq!(uri.prefix, "data/2024/");
    }

    #[test]
    fn test_parse_without_prefix() {
        let uri = StoreUri::parse("s3://bucket").unwrap();
        assert_eq!(uri.scheme, StoreScheme::S3);
        assert_eq!(uri.bucket, "bucket");
        assert_eq!(uri.prefix, "");

        let uri = StoreUri::parse("s3://bucket/").unwrap();
        assert_eq!(uri.prefix, "");
    }

    #[test]
    fn test_prefix_is_kept_verbatim() {
        let uri = StoreUri::parse("s3://b/a dir/with%20escapes//x").unwrap();
        assert_eq!(uri.prefix, "a dir/with%20escapes//x");
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        let err = StoreUri::parse("ftp://bucket/x").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(s) if s == "ftp"));
    }

    #[test]
    fn test_rejects_missing_scheme_or_bucket() {
        assert!(matches!(
            StoreUri::parse("bucket/prefix"),
            Err(ConfigError::InvalidStoreUri { .. })
        ));
        assert!(matches!(
            StoreUri::parse("s3:///prefix"),
            Err(ConfigError::InvalidStoreUri { .. })
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let uri = StoreUri::parse("gs://bucket/a/b").unwrap();
        assert_eq!(uri.to_string(), "gs://bucket/a/b");
    }
}
