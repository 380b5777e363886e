use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use expstat_analysis::analyzer::Analyzer;

use crate::{
    command::{TableOutputArg, as_strs},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DiffArg {
    /// Path to the dataset JSON file
    pub data: PathBuf,

    /// Numeric column whose group means are compared
    #[arg(long)]
    pub outcome: String,

    /// Grouping columns (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub groups: Vec<String>,

    /// Outer grouping column; differences are taken within each of its values
    #[arg(long)]
    pub level: Option<String>,

    #[clap(flatten)]
    pub output: TableOutputArg,
}

pub(crate) fn run(arg: &DiffArg) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(util::read_dataset_file(&arg.data)?);
    let diff = analyzer
        .create_diff_table(&arg.outcome, &as_strs(&arg.groups), arg.level.as_deref())
        .with_context(|| format!("Failed to compute difference table of '{}'", arg.outcome))?;
    arg.output.write_table(&diff.table)
}
