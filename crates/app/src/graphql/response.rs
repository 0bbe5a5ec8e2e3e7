//! GraphQL response envelope.

use couponbook::errors::{GraphQlError, LookupError};
use serde::Deserialize;

/// The `{ data, errors }` envelope every GraphQL response uses.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphQlResponse<T> {
    /// Operation result, absent when the whole operation failed.
    #[serde(default)]
    pub data: Option<T>,

    /// Errors reported by the server.
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl<T> GraphQlResponse<T> {
    /// Take the data, treating any reported error as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::GraphQl`] when errors are present and
    /// [`LookupError::EmptyResponse`] when there is no data.
    pub fn into_data(self) -> Result<T, LookupError> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(LookupError::GraphQl(errors)),
            _ => self.data.ok_or(LookupError::EmptyResponse),
        }
    }
}
