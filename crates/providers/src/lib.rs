//! csutil-providers: storage backends for csutil
//!
//! Implements the `StorageProvider` trait from csutil-core for IBM Cloud
//! Object Storage (aws-sdk-s3), Azure Blob Storage (object_store) and a
//! local directory. This is the only crate that depends on cloud SDKs.

use std::sync::Arc;

use csutil_core::{CloudConfiguration, ProviderConfig, Result, StorageProvider};

pub mod azure;
pub mod ibm;
pub mod local;

pub use azure::AzureProvider;
pub use ibm::IbmCosProvider;
pub use local::LocalProvider;

/// Build the provider selected by the configuration
pub async fn connect(config: &CloudConfiguration) -> Result<Arc<dyn StorageProvider>> {
    let provider: Arc<dyn StorageProvider> = match &config.provider {
        ProviderConfig::Ibm(ibm) => Arc::new(IbmCosProvider::new(ibm).await?),
        ProviderConfig::Azure(azure) => Arc::new(AzureProvider::new(azure.clone())),
        ProviderConfig::Local(local) => Arc::new(LocalProvider::new(&local.root)),
    };
    tracing::debug!(provider = provider.name(), "Storage provider connected");
    Ok(provider)
}
