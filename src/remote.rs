use std::future::Future;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::AppError;
use crate::meal::{MealDetail, MealSummary};

/// Remote recipe search and lookup
pub trait MealApi: Clone + Send + Sync + 'static {
    /// Meals matching `query`; no matches is an empty list
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<MealSummary>, AppError>> + Send;

    /// Full record for `id`, if the remote knows it
    fn lookup(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<MealDetail>, AppError>> + Send;
}

/// Response shape shared by search and lookup; `meals` is null on no match
#[derive(Debug, Deserialize)]
struct MealsEnvelope<T> {
    meals: Option<Vec<T>>,
}

impl<T> MealsEnvelope<T> {
    fn into_meals(self) -> Vec<T> {
        self.meals.unwrap_or_default()
    }
}

/// Detail for the first lookup record, if any
fn first_detail(records: &[Value]) -> Result<Option<MealDetail>, AppError> {
    records.first().map(MealDetail::from_record).transpose()
}

/// TheMealDB client
#[derive(Debug, Clone)]
pub struct MealDbClient {
    http: reqwest::Client,
    base: Url,
}

impl MealDbClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// Build `{base}/{endpoint}?{key}={value}`
    pub fn endpoint(&self, endpoint: &str, key: &str, value: &str) -> Result<Url, AppError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(endpoint);
        url.query_pairs_mut().append_pair(key, value);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, AppError> {
        debug!(%url, "Fetching");
        let envelope = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<MealsEnvelope<T>>()
            .await?;
        Ok(envelope.into_meals())
    }
}

impl MealApi for MealDbClient {
    async fn search(&self, query: &str) -> Result<Vec<MealSummary>, AppError> {
        let url = self.endpoint("search.php", "s", query)?;
        self.fetch(url).await
    }

    async fn lookup(&self, id: &str) -> Result<Option<MealDetail>, AppError> {
        let url = self.endpoint("lookup.php", "i", id)?;
        let records: Vec<Value> = self.fetch(url).await?;
        first_detail(&records)
    }
}
