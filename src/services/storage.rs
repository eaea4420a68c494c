use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use bytes::Bytes;

/// Read-only view of one bucket in a remote object store.
///
/// Implementations are shared by every copy worker of a run and must be safe
/// for concurrent use.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;

    /// Every key starting with `prefix`, in store order. Pagination is handled
    /// internally; a partial listing is never returned as success.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>>;

    /// Full content of one object.
    async fn get_file(&self, key: &str) -> Result<Bytes>;
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        let mut objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let res = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token)
                .send()
                .await
                .with_context(|| format!("listing objects in bucket {}", self.bucket))?;

            if let Some(contents) = res.contents {
                for object in contents {
                    if let Some(key) = object.key {
                        objects.push(key);
                    }
                }
            }

            if res.is_truncated.unwrap_or(false) {
                continuation_token = res.next_continuation_token;
                if continuation_token.is_none() {
                    anyhow::bail!("truncated listing without a continuation token");
                }
            } else {
                break;
            }
        }

        Ok(objects)
    }

    async fn get_file(&self, key: &str) -> Result<Bytes> {
        let res = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("opening object {}", key))?;

        let data = res
            .body
            .collect()
            .await
            .with_context(|| format!("reading body of {}", key))?
            .into_bytes();
        Ok(data)
    }
}
