use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate tool-switch accessors from MSBuild-style rule schemas"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to KDL config file (default: ./switchgen.kdl if present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate accessor source for one or more rule schemas
    Generate(GenerateArgs),
    /// Parse a rule schema and print what the generator sees, as JSON
    Inspect(InspectArgs),
    /// Run as a build task: relay the generated lines to the log
    Task(TaskArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct GeneratorArgs {
    /// How far to scan for properties once the rule is found
    #[arg(long, value_enum)]
    pub scan_scope: Option<ScanScopeArg>,

    /// Getter shape for bool, int and enum accessors
    #[arg(long, value_enum)]
    pub getters: Option<GetterArg>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Schema files, directories or quoted glob patterns (default: config sources)
    pub inputs: Vec<String>,

    /// Output file (stdout if omitted); single input only
    #[arg(short = 'o', long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Write one file per schema into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Schema file to inspect
    pub input: PathBuf,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

#[derive(Args, Debug)]
pub struct TaskArgs {
    /// Schema file to generate from
    pub source: PathBuf,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanScopeArg {
    /// Scan to the end of the document
    Document,
    /// Stop at the end of the rule element
    Rule,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetterArg {
    /// Kind-correct getters
    Typed,
    /// Every getter reads StringList, as the legacy templates do
    Verbatim,
}
