//! Search history endpoints of the account-data API.

use crate::account::RequestContext;
use crate::error::Result;
use crate::http;
use crate::types::AddSearchRequest;
use encore_core::{SearchEntryId, SearchHistoryEntry};
use reqwest::Method;

const HISTORY_PATH: &str = "/api/UserSearchHistory";

pub struct SearchHistoryClient<'a> {
    ctx: &'a RequestContext,
}

impl<'a> SearchHistoryClient<'a> {
    pub(crate) fn new(ctx: &'a RequestContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> Result<Vec<SearchHistoryEntry>> {
        let response = self
            .ctx
            .request(Method::GET, HISTORY_PATH)
            .send()
            .await
            .map_err(http::send_error)?;

        http::read_json(response, "search history").await
    }

    pub async fn add(&self, query: &str) -> Result<Option<SearchHistoryEntry>> {
        let response = self
            .ctx
            .request(Method::POST, HISTORY_PATH)
            .json(&AddSearchRequest { query })
            .send()
            .await
            .map_err(http::send_error)?;

        http::read_json_opt(response, "search history entry").await
    }

    pub async fn delete(&self, id: SearchEntryId) -> Result<()> {
        let response = self
            .ctx
            .request(Method::DELETE, &format!("{}/{}", HISTORY_PATH, id))
            .send()
            .await
            .map_err(http::send_error)?;

        http::expect_success(response).await
    }
}
