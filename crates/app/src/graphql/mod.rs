//! GraphQL API client
//!
//! Implements the coupon lookup and link decoding ports against the remote
//! API over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use couponbook::{
    coupon::CouponRecord,
    errors::{DecodeError, LookupError},
    payload::DecodedPayload,
    ports::{CouponLookup, ParamDecoder},
};
use reqwest::{Client, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::config::ApiConfig;

mod queries;
mod response;

pub use response::GraphQlResponse;

use queries::{
    COUPON_BY_CODE, CouponByCodeData, CouponByCodeVariables, DECODE_COUPON_LINK,
    DecodeCouponLinkData, DecodeCouponLinkVariables,
};

/// Request body for a single GraphQL operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphQlRequest<'a, V> {
    pub(crate) operation_name: &'a str,
    pub(crate) query: &'a str,
    pub(crate) variables: V,
}

/// HTTP client for the coupon API.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    endpoint: Url,
    access_token: Option<String>,
    http: Client,
}

impl GraphQlClient {
    /// Create a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, access_token: Option<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            endpoint: config.api_url.clone(),
            access_token,
            http,
        })
    }

    /// Run one operation and return its `data`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Transport`] when the request fails or the body
    /// is unreadable, [`LookupError::GraphQl`] when the server reports errors
    /// and [`LookupError::EmptyResponse`] when it returns neither.
    #[tracing::instrument(
        name = "graphql.execute",
        skip(self, query, variables),
        fields(endpoint = %self.endpoint),
        err(level = "debug")
    )]
    pub async fn execute<V, T>(
        &self,
        operation_name: &str,
        query: &str,
        variables: V,
    ) -> Result<T, LookupError>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        let body = GraphQlRequest {
            operation_name,
            query,
            variables,
        };

        let mut request = self.http.post(self.endpoint.clone()).json(&body);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|error| LookupError::Transport(error.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| LookupError::Transport(error.to_string()))?;

        debug!(%status, bytes = text.len(), "graphql response received");

        // Servers often send GraphQL errors with a non-2xx status
        match serde_json::from_str::<GraphQlResponse<T>>(&text) {
            Ok(parsed) => parsed.into_data(),
            Err(_) if !status.is_success() => Err(LookupError::Transport(format!(
                "request failed with status {status}"
            ))),
            Err(error) => Err(LookupError::Transport(format!(
                "unreadable response: {error}"
            ))),
        }
    }
}

#[async_trait]
impl CouponLookup for GraphQlClient {
    async fn find_coupon(&self, code: &str) -> Result<Option<CouponRecord>, LookupError> {
        let data: CouponByCodeData = self
            .execute(
                "CouponByCode",
                COUPON_BY_CODE,
                CouponByCodeVariables { code },
            )
            .await?;

        Ok(data.coupon_by_code)
    }
}

#[async_trait]
impl ParamDecoder for GraphQlClient {
    async fn decode(&self, encoded: &str) -> Result<Option<DecodedPayload>, DecodeError> {
        let data: DecodeCouponLinkData = self
            .execute(
                "DecodeCouponLink",
                DECODE_COUPON_LINK,
                DecodeCouponLinkVariables { enc: encoded },
            )
            .await
            .map_err(|error| DecodeError::Decoder(error.user_message()))?;

        Ok(data.decode_coupon_link)
    }
}
