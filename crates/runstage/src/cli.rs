//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};

pub use crate::commands::compare::CompareArgs;
pub use crate::commands::materialize::MaterializeArgs;

/// runstage - materialize run metadata into a working directory
#[derive(Parser, Debug)]
#[command(name = "runstage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Download, extract and catalogue the files of a run, then write a report
    Materialize(MaterializeArgs),

    /// Compare a report against a reference report
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_materialize() {
        let cli = Cli::try_parse_from([
            "runstage",
            "-vv",
            "materialize",
            "--json",
            "run.json",
            "--outputs",
            "result.json",
            "--test",
            "reference.json",
            "--hash",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Materialize(args) => {
                assert_eq!(args.json.as_str(), "run.json");
                assert_eq!(args.outputs.as_deref().map(|p| p.as_str()), Some("result.json"));
                assert_eq!(args.test.as_deref().map(|p| p.as_str()), Some("reference.json"));
                assert!(args.hash);
                assert!(args.workdir.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_materialize_requires_json() {
        assert!(Cli::try_parse_from(["runstage", "materialize"]).is_err());
    }

    #[test]
    fn test_parse_compare() {
        let cli =
            Cli::try_parse_from(["runstage", "-q", "compare", "new.json", "old.json"]).unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.candidate.as_str(), "new.json");
                assert_eq!(args.reference.as_str(), "old.json");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
