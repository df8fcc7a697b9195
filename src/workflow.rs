use crate::agents::maven_execution::{GOAL_DUMP, parse_goals};
use crate::agents::project_scanner::ProjectInfo;
use crate::agents::{
    DumpWriter, FilterConfig, MavenExecutionAgent, ProjectScannerAgent, VersionControlAgent,
};
use crate::cli::{DumpArgs, UpdateArgs};
use crate::collector::{Collection, collect};
use crate::error::{FvuError, Result};
use crate::maven::{Reactor, default_local_repository};
use crate::utils::log;
use colored::Colorize;
use std::path::Path;

/// Execute the update workflow
pub fn execute_update<P: AsRef<Path>>(project_path: P, args: UpdateArgs) -> Result<()> {
    if args.goals.trim() == GOAL_DUMP {
        return execute_dump(project_path, &args.dump);
    }

    let project_path = project_path.as_ref();
    println!("{}", "Starting fast version update...".cyan().bold());

    let goals = parse_goals(&args.goals);
    if goals.is_empty() {
        return Err(FvuError::ProjectValidation(
            "No goals given. Example: --goals use-latest-versions,update-properties".into(),
        ));
    }
    validate_versions_version(&args.versions_version)?;

    // Step 1: Validate project structure
    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!("{}", "✓ Project structure is valid".green());

    // Step 2: Check Git status (if Git is available and not disabled)
    if args.dry_run {
        println!("\n{}", "2. Dry run, skipping Git checks".yellow());
    } else if project_info.has_git && !args.no_git {
        println!("\n{}", "2. Checking Git status...".yellow());
        let git_agent = VersionControlAgent::new(&project_info.project_path)?;

        if !git_agent.is_working_directory_clean()? {
            println!(
                "{}",
                "⚠ Warning: Working directory has uncommitted changes".red()
            );
            println!("Please commit or stash your changes before proceeding.");
            return Ok(());
        }
        println!("{}", "✓ Working directory is clean".green());
    } else if !args.no_git {
        println!(
            "\n{}",
            "2. Git repository not detected, skipping Git checks".yellow()
        );
    }

    // Step 3: Read POM hierarchy and compute filters
    println!("\n{}", "3. Reading POM hierarchy...".yellow());
    let collection = collect_filters(&project_info, &args.dump)?;
    print_collection_summary(&collection);

    // Step 4: Run the Versions plugin
    println!("\n{}", "4. Running Versions plugin goals...".yellow());
    let maven_path = args
        .maven
        .clone()
        .unwrap_or_else(|| project_info.maven_path.clone());
    let agent = MavenExecutionAgent::new(
        &maven_path,
        &project_info.project_path,
        &args.versions_version,
    )
    .with_extra_args(args.maven_args);
    let filters = FilterConfig::from_collection(&collection);
    agent.run_goals(&goals, &filters, args.dry_run)?;

    println!(
        "\n{}",
        "✨ Update process completed successfully!".green().bold()
    );
    Ok(())
}

/// Execute the dump workflow - output includes and excludes only
pub fn execute_dump<P: AsRef<Path>>(project_path: P, args: &DumpArgs) -> Result<()> {
    let scanner = ProjectScannerAgent::new(project_path.as_ref());
    let project_info = scanner.validate()?;

    let collection = collect_filters(&project_info, args)?;
    let writer = DumpWriter::new(&collection, args.format);

    match &args.dump_file {
        Some(file) => {
            writer.write_to(file)?;
            println!(
                "{}",
                format!("✓ Includes and excludes written to {}", file.display()).green()
            );
        }
        None => writer.print()?,
    }

    Ok(())
}

fn collect_filters(project_info: &ProjectInfo, args: &DumpArgs) -> Result<Collection> {
    let local_repository = args
        .local_repository
        .clone()
        .or_else(default_local_repository);
    let reactor = Reactor::load(&project_info.pom_path, local_repository.as_deref())?;

    log::verbose(format!(
        "Project {} with {} module(s)",
        reactor.root().coordinate(),
        reactor.modules().len()
    ));

    Ok(collect(&reactor))
}

/// Accepts Maven-style plugin versions such as `2.7`, `2.8.1` or
/// `2.17.1-SNAPSHOT`. Missing minor and patch numbers count as zero.
fn validate_versions_version(version: &str) -> Result<()> {
    let invalid = |reason: String| {
        FvuError::ProjectValidation(format!(
            "Invalid versions-maven-plugin version '{version}': {reason}"
        ))
    };

    if version.is_empty() {
        return Err(invalid("version is empty".to_string()));
    }
    if version.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err(invalid("whitespace and ':' are not allowed".to_string()));
    }

    semver::Version::parse(&pad_release(version))
        .map(|_| ())
        .map_err(|e| invalid(e.to_string()))
}

/// `2.7` becomes `2.7.0` and `3-SNAPSHOT` becomes `3.0.0-SNAPSHOT`.
fn pad_release(version: &str) -> String {
    let split = version.find(['-', '+']).unwrap_or(version.len());
    let (release, suffix) = version.split_at(split);
    let missing = 2usize.saturating_sub(release.matches('.').count());
    format!("{release}{}{suffix}", ".0".repeat(missing))
}

fn print_collection_summary(collection: &Collection) {
    println!(
        "   Found {} declared and {} inherited-only coordinates",
        collection.declared().len().to_string().bright_cyan(),
        collection.transitive().len().to_string().bright_cyan()
    );
    for coordinate in collection.includes() {
        println!("   • {} {}", "include".green(), coordinate);
    }
    if !collection.transitive().is_empty() {
        println!(
            "   {}",
            format!("({} coordinates excluded)", collection.transitive().len()).dimmed()
        );
    }
}
