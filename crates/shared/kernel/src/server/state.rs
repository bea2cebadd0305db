use axum::extract::FromRef;
use lectio_corpus::Corpus;
use lectio_domain::config::ApiConfig;
use lectio_domain::passage::PassageResult;
use lectio_passage::{LookupService, Services};
use moka::sync::Cache;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiStateError {
    #[error("State validation error: {message}")]
    Validation { message: Cow<'static, str> },
}

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub corpus: Corpus,
    pub lookup: LookupService,
    /// Read-through cache over rendered passage responses. Bounded and
    /// TTL-evicted per the lookup config; module install/remove flows call
    /// [`ApiState::invalidate_passages`].
    pub passage_cache: Cache<String, Arc<PassageResult>>,
}

#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }

    /// Drops every cached passage response. Called whenever the installed
    /// module set changes.
    pub fn invalidate_passages(&self) {
        self.inner.passage_cache.invalidate_all();
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<ApiState> for LookupService {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.lookup.clone()
    }
}

impl FromRef<ApiState> for Corpus {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.corpus.clone()
    }
}

#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    corpus: Option<Corpus>,
}

impl ApiStateBuilder {
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn corpus(mut self, corpus: Corpus) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Finalizes the state: wires the lookup service over the corpus and
    /// sizes the passage cache from the config.
    ///
    /// # Errors
    /// Returns an error when config or corpus were not provided.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let config = self.config.ok_or_else(|| ApiStateError::Validation {
            message: "ApiConfig not provided".into(),
        })?;
        let corpus = self.corpus.ok_or_else(|| ApiStateError::Validation {
            message: "Corpus not provided".into(),
        })?;

        let lookup = LookupService::new(Services::from_corpus(&corpus));
        let passage_cache = Cache::builder()
            .max_capacity(config.lookup.cache_capacity)
            .time_to_live(Duration::from_secs(config.lookup.cache_ttl_seconds))
            .build();

        Ok(ApiState {
            inner: Arc::new(ApiStateInner { config, corpus, lookup, passage_cache }),
        })
    }
}
