use std::{fs, path::PathBuf, sync::Arc};

use clap::Args;
use couponbook::{
    availability::{Countdown, Discount},
    clock::{Clock, SystemClock},
    schedule::CountdownTicker,
};

#[derive(Debug, Args)]
pub(crate) struct CountdownArgs {
    /// Discount as returned by the API, in JSON
    #[arg(long)]
    file: PathBuf,

    /// Keep printing once per second until the discount opens
    #[arg(long)]
    watch: bool,
}

pub(crate) async fn run(args: CountdownArgs) -> Result<(), String> {
    let json = fs::read_to_string(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let discount: Discount =
        serde_json::from_str(&json).map_err(|error| format!("invalid discount: {error}"))?;

    for line in exclusion_lines(&discount) {
        println!("{line}");
    }

    if !args.watch {
        println!("{}", status_line(discount.countdown_at(&SystemClock.now())));

        return Ok(());
    }

    let (_ticker, mut ticks) = CountdownTicker::start(discount, Arc::new(SystemClock));

    while let Some(countdown) = ticks.recv().await {
        println!("{}", status_line(countdown));
    }

    Ok(())
}

fn status_line(countdown: Countdown) -> String {
    countdown
        .label()
        .unwrap_or_else(|| "Not available".to_owned())
}

fn exclusion_lines(discount: &Discount) -> Vec<String> {
    let days = discount.excluded_day_labels();
    let hours = discount.excluded_hour_labels();
    let mut lines = Vec::new();

    if !days.is_empty() {
        lines.push(format!("excluded days:  {}", days.join(", ")));
    }

    if !hours.is_empty() {
        lines.push(format!("excluded hours: {}", hours.join(", ")));
    }

    lines
}
