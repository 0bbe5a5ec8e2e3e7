use std::{fs, path::PathBuf, str::FromStr};

use clap::Args;
use couponbook::pipeline::{CropOffset, CropRegion, DEFAULT_ZOOM_PERCENT, RedemptionPipeline};

use super::{describe, render};

#[derive(Debug, Args)]
pub(crate) struct UploadArgs {
    /// Image containing a coupon QR code
    file: PathBuf,

    /// Crop region as `x,y,width,height` in image pixels
    #[arg(long)]
    region: Option<Region>,

    /// Zoom level in percent
    #[arg(long, default_value_t = DEFAULT_ZOOM_PERCENT)]
    zoom: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region(CropRegion);

impl FromStr for Region {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| format!("invalid region `{value}`: {error}"))?;

        match parts.as_slice() {
            [x, y, width, height] => Ok(Self(CropRegion::new(*x, *y, *width, *height))),
            _ => Err(format!("region `{value}` needs four numbers")),
        }
    }
}

pub(crate) async fn run(args: UploadArgs, pipeline: &RedemptionPipeline) -> Result<(), String> {
    let bytes = fs::read(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    pipeline
        .open_upload(&bytes)
        .map_err(|error| describe(&error))?;

    pipeline
        .adjust_crop(
            CropOffset::default(),
            args.zoom,
            args.region.map(|region| region.0),
        )
        .map_err(|error| describe(&error))?;

    let outcome = pipeline
        .confirm_crop()
        .await
        .map_err(|error| describe(&error))?;

    render::acquire_outcome(pipeline, &outcome);

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn region_parses_four_numbers() -> TestResult {
        assert_eq!(
            "10, 20,30,40".parse::<Region>()?,
            Region(CropRegion::new(10, 20, 30, 40))
        );

        Ok(())
    }

    #[test]
    fn region_rejects_bad_input() {
        assert!("1,2,3".parse::<Region>().is_err(), "too few numbers");
        assert!("1,2,3,x".parse::<Region>().is_err(), "not a number");
    }
}
