//! IBM Cloud Object Storage provider
//!
//! Wraps aws-sdk-s3 pointed at the COS S3-compatible endpoint with HMAC
//! credentials and path-style addressing.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream as SdkByteStream;
use bytes::BytesMut;
use futures::{StreamExt, TryStreamExt};

use csutil_core::{ByteStream, Error, IbmConfig, ObjectInfo, Result, StorageProvider};

/// IBM COS client wrapper
pub struct IbmCosProvider {
    inner: aws_sdk_s3::Client,
}

impl IbmCosProvider {
    /// Create a new client from resolved IBM settings
    pub async fn new(config: &IbmConfig) -> Result<Self> {
        let credentials = aws_credential_types::Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None, // session token
            None, // expiry
            "csutil-ibm-hmac",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&config.cos_endpoint)
            .load()
            .await;

        // COS bucket names are not resolvable as virtual hosts on every endpoint
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        tracing::debug!(endpoint = %config.cos_endpoint, region = %config.region, "IBM COS client ready");

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }
}

/// Map an SDK failure to NotFound on HTTP 404, Transfer otherwise
fn map_sdk_error<E>(err: SdkError<E>, target: impl FnOnce() -> String) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    if is_not_found(&err) {
        Error::NotFound(target())
    } else {
        Error::Transfer(DisplayErrorContext(&err).to_string())
    }
}

fn is_not_found<E>(err: &SdkError<E>) -> bool {
    err.raw_response()
        .is_some_and(|response| response.status().as_u16() == 404)
}

#[async_trait]
impl StorageProvider for IbmCosProvider {
    fn name(&self) -> &'static str {
        "ibm"
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let mut items = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.inner.list_objects_v2().bucket(bucket);
            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| map_sdk_error(e, || format!("bucket {bucket}")))?;

            for object in response.contents() {
                let key = object.key().unwrap_or_default();
                let mut info = ObjectInfo::file(key, object.size().unwrap_or(0).max(0) as u64);

                if let Some(modified) = object.last_modified() {
                    info.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
                }
                if let Some(etag) = object.e_tag() {
                    info.etag = Some(etag.trim_matches('"').to_string());
                }

                items.push(info);
            }

            continuation_token = response
                .next_continuation_token()
                .map(ToString::to_string);
            if !response.is_truncated().unwrap_or(false) || continuation_token.is_none() {
                break;
            }
            tracing::debug!(bucket, fetched = items.len(), "Fetching next listing page");
        }

        Ok(items)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, || format!("{bucket}/{key}")))?;

        let body = futures::stream::try_unfold(response.body, |mut body| async move {
            match body.try_next().await {
                Ok(Some(chunk)) => Ok(Some((chunk, body))),
                Ok(None) => Ok(None),
                Err(e) => Err(Error::Transfer(e.to_string())),
            }
        });

        Ok(body.boxed())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        size_hint: Option<u64>,
    ) -> Result<()> {
        let capacity = size_hint.unwrap_or(0).min(usize::MAX as u64) as usize;
        let data = body
            .try_fold(BytesMut::with_capacity(capacity), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await?
            .freeze();

        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(data.len() as i64)
            .body(SdkByteStream::from(data))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, || format!("bucket {bucket}")))?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        match self
            .inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_not_found(&e) => {
                tracing::debug!(bucket, key, "Object already absent");
                Ok(())
            }
            Err(e) => Err(map_sdk_error(e, || format!("{bucket}/{key}"))),
        }
    }
}
