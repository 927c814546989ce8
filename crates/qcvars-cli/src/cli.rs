use crate::utils::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "qcvars developers",
    version,
    about = "qcvars CLI - Derive composite quantum-chemistry variables, such as SAPT energy components, from the base values a calculation reports.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used when evaluating several input files.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate derived quantities from one or more base value files.
    Eval(EvalArgs),
    /// List the derived quantities defined by the loaded families.
    List(ListArgs),
    /// Show what a derived quantity depends on.
    Deps(DepsArgs),
    /// Validate the loaded families: duplicates, cycles and evaluation order.
    Check(CheckArgs),
}

/// Arguments for the `eval` subcommand.
#[derive(Args, Debug)]
pub struct EvalArgs {
    // --- Core Arguments ---
    /// Base value file(s) in TOML (`"NAME" = value`) or CSV (`name,value`) format.
    /// Repeat the flag to evaluate several systems in parallel.
    #[arg(short, long = "input", required = true, value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Write results here instead of standard output.
    /// With several inputs this is a directory receiving one file per input.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to an evaluation configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Selection Overrides ---
    /// Quantity families to load (e.g., 'sapt'). Can be used multiple times.
    #[arg(short = 'f', long = "family", value_name = "NAME")]
    pub families: Vec<String>,

    #[command(flatten)]
    pub targets: TargetArgs,

    /// Override `mode` from the config file.
    #[command(flatten)]
    pub mode: ModeFlags,

    // --- Output Overrides ---
    /// Output format for the results.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Override `include-base-values` from the config file.
    #[command(flatten)]
    pub base_values: IncludeBaseValues,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S mode=collect-errors
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive ways of choosing which quantities to evaluate.
#[derive(Args, Debug, Clone, Default)]
#[group(required = false, multiple = false)]
pub struct TargetArgs {
    /// Evaluate only the named quantity. Can be used multiple times.
    #[arg(short = 't', long = "target", value_name = "NAME")]
    pub names: Vec<String>,
    /// Evaluate every quantity the loaded families define.
    #[arg(long)]
    pub all: bool,
}

/// A group to handle mutually exclusive batch-mode flags.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct ModeFlags {
    /// Keep evaluating after a quantity fails and report every failure.
    #[arg(long)]
    pub collect_errors: bool,
    /// Stop at the first quantity that cannot be evaluated.
    #[arg(long)]
    pub fail_fast: bool,
}

/// A group to handle mutually exclusive flags for echoing the input base values.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct IncludeBaseValues {
    /// Append the input base values to the written results.
    #[arg(long)]
    pub with_base_values: bool,
    /// Write only the derived quantities.
    #[arg(long)]
    pub no_base_values: bool,
}

/// Arguments for the `list` subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Quantity families to load. Defaults to every available family.
    #[arg(short = 'f', long = "family", value_name = "NAME")]
    pub families: Vec<String>,

    /// Print each quantity's rule next to its name.
    #[arg(long)]
    pub rules: bool,
}

/// Arguments for the `deps` subcommand.
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// The derived quantity to inspect (e.g., 'SAPT0 TOTAL ENERGY').
    #[arg(required = true, value_name = "NAME")]
    pub name: String,

    /// Quantity families to load. Defaults to every available family.
    #[arg(short = 'f', long = "family", value_name = "NAME")]
    pub families: Vec<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Quantity families to load. Defaults to every available family.
    #[arg(short = 'f', long = "family", value_name = "NAME")]
    pub families: Vec<String>,

    /// Print the full evaluation order, dependencies first.
    #[arg(long)]
    pub order: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn eval_accepts_repeated_inputs_and_targets() {
        let cli = Cli::parse_from([
            "qcvars",
            "eval",
            "-i",
            "a.toml",
            "-i",
            "b.csv",
            "-t",
            "SAPT0 TOTAL ENERGY",
            "-t",
            "SAPT EXCHSCAL",
            "--collect-errors",
            "--format",
            "csv",
        ]);
        let Commands::Eval(args) = cli.command else {
            panic!("Expected 'eval' subcommand");
        };
        assert_eq!(
            args.inputs,
            vec![PathBuf::from("a.toml"), PathBuf::from("b.csv")]
        );
        assert_eq!(args.targets.names.len(), 2);
        assert!(!args.targets.all);
        assert!(args.mode.collect_errors);
        assert_eq!(args.format, Some(OutputFormat::Csv));
    }

    #[test]
    fn eval_rejects_targets_together_with_all() {
        let result = Cli::try_parse_from([
            "qcvars", "eval", "-i", "a.toml", "-t", "SAPT EXCHSCAL", "--all",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn eval_rejects_conflicting_mode_flags() {
        let result = Cli::try_parse_from([
            "qcvars",
            "eval",
            "-i",
            "a.toml",
            "--collect-errors",
            "--fail-fast",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn eval_requires_an_input() {
        assert!(Cli::try_parse_from(["qcvars", "eval", "--all"]).is_err());
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::parse_from(["qcvars", "list", "-vv", "-j", "4", "--family", "sapt"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::List(args) = cli.command else {
            panic!("Expected 'list' subcommand");
        };
        assert_eq!(args.families, vec!["sapt".to_string()]);
    }

    #[test]
    fn deps_takes_a_positional_name() {
        let cli = Cli::parse_from(["qcvars", "deps", "SAPT0 TOTAL ENERGY"]);
        let Commands::Deps(args) = cli.command else {
            panic!("Expected 'deps' subcommand");
        };
        assert_eq!(args.name, "SAPT0 TOTAL ENERGY");
        assert!(args.families.is_empty());
    }
}
