//! Azure Blob / Data Lake Storage provider
//!
//! Built on `object_store::azure`. A bucket maps to a container; each
//! container gets its own client, created on first use and cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::BytesMut;
use futures::{StreamExt, TryStreamExt};
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore, ObjectStoreExt, PutPayload};

use csutil_core::{AzureAuth, AzureConfig, ByteStream, Error, ObjectInfo, Result, StorageProvider};

pub struct AzureProvider {
    config: AzureConfig,
    containers: Mutex<HashMap<String, Arc<MicrosoftAzure>>>,
}

impl AzureProvider {
    pub fn new(config: AzureConfig) -> Self {
        Self {
            config,
            containers: Mutex::new(HashMap::new()),
        }
    }

    fn container(&self, name: &str) -> Result<Arc<MicrosoftAzure>> {
        let mut containers = self
            .containers
            .lock()
            .map_err(|_| Error::Transfer("Azure client cache poisoned".into()))?;

        if let Some(client) = containers.get(name) {
            return Ok(Arc::clone(client));
        }

        let builder = MicrosoftAzureBuilder::new()
            .with_account(&self.config.account)
            .with_container_name(name);
        let builder = match &self.config.auth {
            AzureAuth::AccessKey(key) => builder.with_access_key(key),
            AzureAuth::ServicePrincipal {
                tenant_id,
                client_id,
                client_secret,
            } => builder
                .with_tenant_id(tenant_id)
                .with_client_id(client_id)
                .with_client_secret(client_secret),
        };

        let client = Arc::new(
            builder
                .build()
                .map_err(|e| Error::Config(format!("Azure client for container {name}: {e}")))?,
        );
        tracing::debug!(account = %self.config.account, container = name, "Azure client ready");
        containers.insert(name.to_string(), Arc::clone(&client));
        Ok(client)
    }
}

fn map_store_error(err: object_store::Error, target: impl FnOnce() -> String) -> Error {
    match err {
        object_store::Error::NotFound { .. } => Error::NotFound(target()),
        other => Error::Transfer(other.to_string()),
    }
}

/// object_store lists whole path segments, so list from the last `/` and
/// filter the remainder as a plain string prefix
fn listing_root(prefix: &str) -> Option<Path> {
    prefix
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .filter(|dir| !dir.is_empty())
        .map(Path::from)
}

fn to_object_info(meta: ObjectMeta) -> ObjectInfo {
    let mut info = ObjectInfo::file(meta.location.to_string(), meta.size);
    info.last_modified = jiff::Timestamp::from_second(meta.last_modified.timestamp()).ok();
    info.etag = meta.e_tag.map(|etag| etag.trim_matches('"').to_string());
    info
}

#[async_trait]
impl StorageProvider for AzureProvider {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let store = self.container(bucket)?;
        let root = listing_root(prefix);

        let items: Vec<ObjectInfo> = store
            .list(root.as_ref())
            .map_err(|e| map_store_error(e, || format!("container {bucket}")))
            .try_filter_map(|meta| async move {
                let info = to_object_info(meta);
                Ok(info.key.starts_with(prefix).then_some(info))
            })
            .try_collect()
            .await?;

        Ok(items)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream> {
        let store = self.container(bucket)?;
        let result = store
            .get(&Path::from(key))
            .await
            .map_err(|e| map_store_error(e, || format!("{bucket}/{key}")))?;

        Ok(result
            .into_stream()
            .map_err(|e| Error::Transfer(e.to_string()))
            .boxed())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        size_hint: Option<u64>,
    ) -> Result<()> {
        let store = self.container(bucket)?;
        let capacity = size_hint.unwrap_or(0).min(usize::MAX as u64) as usize;
        let data = body
            .try_fold(BytesMut::with_capacity(capacity), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await?
            .freeze();

        store
            .put(&Path::from(key), PutPayload::from(data))
            .await
            .map_err(|e| map_store_error(e, || format!("container {bucket}")))?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let store = self.container(bucket)?;
        match store.delete(&Path::from(key)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(Error::Transfer(e.to_string())),
        }
    }

    async fn close(&self) -> Result<()> {
        if let Ok(mut containers) = self.containers.lock() {
            containers.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_root() {
        assert_eq!(listing_root(""), None);
        assert_eq!(listing_root("report"), None);
        assert_eq!(listing_root("logs/"), Some(Path::from("logs")));
        assert_eq!(listing_root("logs/2024/app"), Some(Path::from("logs/2024")));
    }

    #[test]
    fn test_container_clients_are_cached() {
        let provider = AzureProvider::new(AzureConfig {
            account: "devstoreaccount1".into(),
            auth: AzureAuth::AccessKey("a2V5".into()),
        });
        let first = provider.container("reports").unwrap();
        let second = provider.container("reports").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let other = provider.container("archive").unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn test_not_found_mapping() {
        let err = object_store::Error::NotFound {
            path: "a.txt".into(),
            source: "missing".into(),
        };
        assert!(matches!(
            map_store_error(err, || "c/a.txt".into()),
            Error::NotFound(_)
        ));
    }
}
