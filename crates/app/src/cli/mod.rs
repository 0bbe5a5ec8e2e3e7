use clap::{Parser, Subcommand};
use couponbook::pipeline::{PipelineError, RedemptionPipeline};
use couponbook_app::{
    config::{self, ApiConfig, LoggingConfig, SessionConfig},
    context,
};

mod countdown;
mod lookup;
mod open;
mod render;
mod upload;

#[derive(Debug, Parser)]
#[command(name = "couponbook", about = "Couponbook redemption CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    api: ApiConfig,

    #[command(flatten)]
    session: SessionConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look a coupon up by its code
    Lookup(lookup::LookupArgs),

    /// Redeem a coupon link carrying an `enc` parameter
    Open(open::OpenArgs),

    /// Read a coupon from an uploaded QR image
    Upload(upload::UploadArgs),

    /// Show when a discount is next redeemable
    Countdown(countdown::CountdownArgs),
}

impl Cli {
    /// Parse flags after loading `.env`.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        config::load_dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Lookup(args) => {
                lookup::run(args, &pipeline(&self.api, &self.session)?).await
            }
            Commands::Open(args) => open::run(args, &pipeline(&self.api, &self.session)?).await,
            Commands::Upload(args) => {
                upload::run(args, &pipeline(&self.api, &self.session)?).await
            }
            Commands::Countdown(args) => countdown::run(args).await,
        }
    }
}

fn pipeline(api: &ApiConfig, session: &SessionConfig) -> Result<RedemptionPipeline, String> {
    context::pipeline_context(api, session)
        .map(RedemptionPipeline::new)
        .map_err(|error| format!("failed to start: {error}"))
}

/// The message a user should see for a failed pipeline operation.
fn describe(error: &PipelineError) -> String {
    match error {
        PipelineError::Decode(source) => source.user_message(),
        PipelineError::Lookup(source) => source.user_message(),
        other => other.to_string(),
    }
}
