use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use expstat_analysis::analyzer::Analyzer;

use crate::{
    command::{TableOutputArg, as_strs},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummaryArg {
    /// Path to the dataset JSON file
    pub data: PathBuf,

    /// Numeric columns to summarize (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub variables: Vec<String>,

    /// Grouping columns (comma-separated); validated but not used for grouping
    #[arg(long, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Column whose values each get their own row
    #[arg(long)]
    pub level: Option<String>,

    #[clap(flatten)]
    pub output: TableOutputArg,
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(util::read_dataset_file(&arg.data)?);
    let summary = analyzer
        .create_summary_stats(
            &as_strs(&arg.variables),
            &as_strs(&arg.groups),
            arg.level.as_deref(),
        )
        .context("Failed to compute summary statistics")?;
    arg.output.write_table(&summary.table)
}
