use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use expstat_plot::ScatterOptions;

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct ScatterArg {
    /// Path to the dataset JSON file
    pub data: PathBuf,

    /// Numeric column for the horizontal axis
    #[arg(long)]
    pub x: String,

    /// Numeric column for the vertical axis
    #[arg(long)]
    pub y: String,

    #[arg(long, default_value = "X")]
    pub x_label: String,

    #[arg(long, default_value = "Y")]
    pub y_label: String,

    #[arg(long, default_value = "Scatter Plot")]
    pub title: String,

    /// Marker color: a name such as `blue` or `#rrggbb`
    #[arg(long, default_value = "blue")]
    pub color: String,

    /// Marker opacity
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Marker area
    #[arg(long, default_value_t = 10.0)]
    pub size: f64,

    /// SVG output file path
    #[arg(long)]
    pub output: PathBuf,
}

impl ScatterArg {
    fn options(&self) -> ScatterOptions {
        ScatterOptions {
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            title: self.title.clone(),
            color: self.color.clone(),
            alpha: self.alpha,
            size: self.size,
            ..ScatterOptions::default()
        }
    }
}

pub(crate) fn run(arg: &ScatterArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset_file(&arg.data)?;
    let [x, y] = [&arg.x, &arg.y].map(|name| {
        dataset
            .numeric_column(name)
            .map(|column| {
                column
                    .iter()
                    .map(|v| v.unwrap_or(f64::NAN))
                    .collect::<Vec<_>>()
            })
            .with_context(|| format!("Failed to read plot column '{name}'"))
    });
    let (x, y) = (x?, y?);

    expstat_plot::scatter_plot(&x, &y, &arg.options(), &arg.output)
        .with_context(|| format!("Failed to draw scatter plot to {}", arg.output.display()))?;
    eprintln!("Wrote scatter plot to {}", arg.output.display());
    Ok(())
}
