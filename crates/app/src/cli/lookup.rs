use clap::Args;
use couponbook::pipeline::RedemptionPipeline;

use super::{describe, render};

#[derive(Debug, Args)]
pub(crate) struct LookupArgs {
    /// Coupon code, as printed or typed
    pub(crate) code: String,
}

pub(crate) async fn run(args: LookupArgs, pipeline: &RedemptionPipeline) -> Result<(), String> {
    pipeline.begin_entry().map_err(|error| describe(&error))?;
    pipeline.set_code(args.code);

    let outcome = pipeline.submit().await.map_err(|error| describe(&error))?;

    render::submit_outcome(pipeline, &outcome);

    Ok(())
}
