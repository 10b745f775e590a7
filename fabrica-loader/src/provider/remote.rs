use crate::provider::SourceProvider;
use crate::retry::{with_backoff, RetryConfig};
use crate::{DefinitionSource, LoaderError, LoaderResult};
use async_trait::async_trait;
use fabrica_types::ContentPath;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

/// Wire shape of one source as served by the structure API.
#[derive(Debug, Deserialize)]
struct RemoteSource {
    path: String,
    content: String,
}

/// Structure-API provider used in deployed/browser mode.
///
/// `GET {base}/structure` lists every source; `GET {base}/structure/{name}`
/// fetches one. Request failures retry with backoff before surfacing.
pub struct RemoteProvider {
    base_url: String,
    client: reqwest::Client,
    retry: RetryConfig,
}

impl RemoteProvider {
    #[must_use]
    pub fn new(base_url: impl Into<String>, retry: RetryConfig) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            retry,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> LoaderResult<Option<T>> {
        with_backoff("structure api", &self.retry, || async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|err| LoaderError::source_read(url, err))?;
            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let response = response
                .error_for_status()
                .map_err(|err| LoaderError::source_read(url, err))?;
            response
                .json::<T>()
                .await
                .map(Some)
                .map_err(|err| LoaderError::source_read(url, err))
        })
        .await
    }

    fn convert(&self, remote: RemoteSource) -> Option<DefinitionSource> {
        match ContentPath::parse(&remote.path) {
            Ok(path) => Some(DefinitionSource::new(path, remote.content)),
            Err(err) => {
                warn!(path = %remote.path, error = %err, "skipping remote source with invalid path");
                None
            }
        }
    }
}

#[async_trait]
impl SourceProvider for RemoteProvider {
    async fn list_sources(&self) -> LoaderResult<Vec<DefinitionSource>> {
        let url = format!("{}/structure", self.base_url);
        let listed: Vec<RemoteSource> = self
            .get_json(&url)
            .await?
            .ok_or_else(|| LoaderError::source_read(&url, "structure endpoint missing"))?;
        Ok(listed
            .into_iter()
            .filter_map(|remote| self.convert(remote))
            .collect())
    }

    async fn fetch_source(&self, name: &str) -> LoaderResult<Option<DefinitionSource>> {
        let url = format!("{}/structure/{}", self.base_url, name);
        let fetched: Option<RemoteSource> = self.get_json(&url).await?;
        Ok(fetched.and_then(|remote| self.convert(remote)))
    }
}
