use crate::agents::DumpFormat;
use crate::agents::maven_execution::{DEFAULT_GOALS, DEFAULT_VERSIONS_VERSION};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fvu",
    about = "Fast Version Update - run the Versions Maven Plugin on declared dependencies only",
    version,
    author
)]
pub struct Cli {
    /// Project directory or POM file (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    pub path: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run Versions plugin goals with computed includes and excludes
    ///
    /// Filters are passed as -Dincludes/-Dexcludes. On Windows, mvn.cmd runs
    /// under cmd.exe, whose command line is limited to 8191 characters, so
    /// very large reactors may need `dump` plus manual plugin configuration.
    Update(UpdateArgs),

    /// Print or save the computed includes and excludes
    Dump(DumpArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Comma-separated Versions plugin goals; "dump" only prints the filters
    #[arg(long, env = "FVU_GOALS", default_value = DEFAULT_GOALS)]
    pub goals: String,

    /// Version of org.codehaus.mojo:versions-maven-plugin to invoke
    #[arg(long, env = "FVU_VERSIONS_VERSION", default_value = DEFAULT_VERSIONS_VERSION)]
    pub versions_version: String,

    /// Maven executable (defaults to ./mvnw when present, otherwise mvn)
    #[arg(long, env = "FVU_MAVEN", value_name = "EXE")]
    pub maven: Option<PathBuf>,

    /// Print the Maven commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the clean working tree check
    #[arg(long)]
    pub no_git: bool,

    #[command(flatten)]
    pub dump: DumpArgs,

    /// Extra arguments passed to every Maven invocation (after `--`)
    #[arg(last = true, value_name = "MAVEN_ARGS")]
    pub maven_args: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
    /// Write the dump to FILE instead of stdout
    #[arg(long, env = "FVU_DUMP_FILE", value_name = "FILE")]
    pub dump_file: Option<PathBuf>,

    /// Dump output format
    #[arg(long, value_enum, default_value_t = DumpFormat::Properties)]
    pub format: DumpFormat,

    /// Maven local repository used to find parent POMs (defaults to ~/.m2/repository)
    #[arg(long, env = "FVU_LOCAL_REPOSITORY", value_name = "DIR")]
    pub local_repository: Option<PathBuf>,
}
