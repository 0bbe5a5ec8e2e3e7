//! App Context

use std::sync::Arc;

use couponbook::pipeline::PipelineContext;
use thiserror::Error;

use crate::{
    auth::SessionAuthStore,
    config::{ApiConfig, SessionConfig},
    devices::{NoCamera, RqrrDecoder},
    graphql::GraphQlClient,
    notifications::LogSink,
};

/// Failure wiring the host's collaborators.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The HTTP client could not be built.
    #[error("failed to build http client")]
    HttpClient(#[source] reqwest::Error),
}

/// Build the pipeline context for this host.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built.
pub fn pipeline_context(
    api: &ApiConfig,
    session: &SessionConfig,
) -> Result<PipelineContext, AppInitError> {
    let auth = SessionAuthStore::from_config(session);

    let client = Arc::new(
        GraphQlClient::new(api, auth.access_token().map(str::to_owned))
            .map_err(AppInitError::HttpClient)?,
    );

    Ok(PipelineContext {
        lookup: client.clone(),
        param_decoder: client,
        qr_decoder: Arc::new(RqrrDecoder),
        camera: Arc::new(NoCamera),
        auth: Arc::new(auth),
        notifications: Arc::new(LogSink),
    })
}
