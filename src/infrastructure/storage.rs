use crate::config::StorageConfig;
use crate::services::storage::S3ObjectStore;
use crate::utils::uri::StoreUri;
use aws_sdk_s3::config::{Credentials, Region};
use std::sync::Arc;
use tracing::info;

/// Builds the S3 client for `uri`. Google Cloud Storage is reached through
/// its S3-interoperable endpoint with HMAC keys.
pub async fn setup_storage(uri: &StoreUri, config: &StorageConfig) -> Arc<S3ObjectStore> {
    let endpoint_url = config
        .endpoint_url
        .clone()
        .or_else(|| uri.scheme.default_endpoint().map(str::to_string));

    let mut loader = aws_config::from_env().region(Region::new(config.region.clone()));

    match &endpoint_url {
        Some(endpoint) => {
            info!("☁️  Object store: {} (Bucket: {})", endpoint, uri.bucket);
            loader = loader.endpoint_url(endpoint);
        }
        None => info!("☁️  Object store: AWS S3 (Bucket: {})", uri.bucket),
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        loader = loader.credentials_provider(Credentials::new(
            access_key, secret_key, None, None, "static",
        ));
    }

    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.force_path_style || config.endpoint_url.is_some())
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
    Arc::new(S3ObjectStore::new(s3_client, uri.bucket.clone()))
}
