use clap::Args;
use couponbook::pipeline::{ENC_PARAM, RedemptionPipeline};
use reqwest::Url;

use super::{describe, render};

#[derive(Debug, Args)]
pub(crate) struct OpenArgs {
    /// Link to the coupon page
    url: Url,
}

pub(crate) async fn run(args: OpenArgs, pipeline: &RedemptionPipeline) -> Result<(), String> {
    let outcome = pipeline
        .load_from_params(args.url.query_pairs())
        .await
        .map_err(|error| describe(&error))?;

    let Some(outcome) = outcome else {
        return Err(format!("link has no `{ENC_PARAM}` parameter"));
    };

    render::submit_outcome(pipeline, &outcome);

    Ok(())
}
