use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use expstat_analysis::table::ResultTable;

use crate::util::Output;

use self::{diff::DiffArg, regress::RegressArg, scatter::ScatterArg, summary::SummaryArg};

mod diff;
mod regress;
mod scatter;
mod summary;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Analysis to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Mean and standard deviation of variables, optionally per level
    Summary(#[clap(flatten)] SummaryArg),
    /// Pairwise differences of group means of an outcome
    Diff(#[clap(flatten)] DiffArg),
    /// OLS regression of an outcome on covariates
    Regress(#[clap(flatten)] RegressArg),
    /// Scatter plot of two numeric columns, written as SVG
    Scatter(#[clap(flatten)] ScatterArg),
}

/// Where and how a result table is written.
#[derive(Debug, Clone, Args)]
pub(crate) struct TableOutputArg {
    /// Print the table as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TableOutputArg {
    fn write_table(&self, table: &ResultTable) -> anyhow::Result<()> {
        let mut output = Output::from_output_path(self.output.clone())?;
        tracing::debug!(output = %output.display_path(), json = self.json, "writing table");
        if self.json {
            output.write_json(table)?;
        } else {
            output.write_text(table)?;
        }
        if let Output::File { path, .. } = &output {
            eprintln!("Wrote {} rows to {}", table.rows().len(), path.display());
        }
        Ok(())
    }
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    tracing::debug!(?args.mode, "parsed command line");
    match args.mode {
        Mode::Summary(arg) => summary::run(&arg)?,
        Mode::Diff(arg) => diff::run(&arg)?,
        Mode::Regress(arg) => regress::run(&arg)?,
        Mode::Scatter(arg) => scatter::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_comma_separated_columns() {
        let args = CommandArgs::try_parse_from([
            "expstat",
            "diff",
            "data.json",
            "--outcome",
            "y",
            "--groups",
            "arm,site",
            "--level",
            "period",
            "--json",
        ])
        .unwrap();
        let Mode::Diff(arg) = args.mode else {
            panic!("expected diff mode");
        };
        assert_eq!(arg.groups, ["arm", "site"]);
        assert_eq!(arg.level.as_deref(), Some("period"));
        assert!(arg.output.json);
    }

    #[test]
    fn test_scatter_requires_output() {
        assert!(
            CommandArgs::try_parse_from(["expstat", "scatter", "data.json", "--x", "a", "--y", "b"])
                .is_err()
        );
    }

    #[test]
    fn test_as_strs() {
        let values = vec!["a".to_owned(), "b".to_owned()];
        assert_eq!(as_strs(&values), ["a", "b"]);
    }
}
