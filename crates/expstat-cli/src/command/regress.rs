use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use expstat_analysis::analyzer::Analyzer;

use crate::{
    command::{TableOutputArg, as_strs},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct RegressArg {
    /// Path to the dataset JSON file
    pub data: PathBuf,

    /// Dependent variable
    #[arg(long)]
    pub outcome: String,

    /// Independent variables (comma-separated); an intercept is always added
    #[arg(long, value_delimiter = ',', required = true)]
    pub covariates: Vec<String>,

    /// Fit on per-level means instead of raw rows
    #[arg(long)]
    pub level: Option<String>,

    #[clap(flatten)]
    pub output: TableOutputArg,
}

pub(crate) fn run(arg: &RegressArg) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(util::read_dataset_file(&arg.data)?);
    let results = analyzer
        .regression_results(
            &arg.outcome,
            &as_strs(&arg.covariates),
            arg.level.as_deref(),
        )
        .with_context(|| format!("Failed to fit regression of '{}'", arg.outcome))?;
    eprintln!(
        "Fitted {} observations (R^2 = {:.4})",
        results.n_obs, results.r_squared
    );
    arg.output.write_table(&results.table)
}
