use crate::collector::Collection;
use crate::error::{FvuError, Result};
use crate::utils::log;
use colored::Colorize;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const VERSIONS_PLUGIN_GROUP_ID: &str = "org.codehaus.mojo";
pub const VERSIONS_PLUGIN_ARTIFACT_ID: &str = "versions-maven-plugin";
pub const DEFAULT_VERSIONS_VERSION: &str = "2.8.1";

pub const GOAL_USE_LATEST_VERSIONS: &str = "use-latest-versions";
pub const GOAL_UPDATE_PROPERTIES: &str = "update-properties";
#[allow(dead_code)]
pub const GOAL_UPDATE_PARENT: &str = "update-parent";
/// Prints the computed filters instead of invoking Maven.
pub const GOAL_DUMP: &str = "dump";
pub const DEFAULT_GOALS: &str = "use-latest-versions,update-properties,update-parent";

/// Goals that understand `includes`/`excludes`; all others run unfiltered.
const FILTERED_GOALS: &[&str] = &[GOAL_USE_LATEST_VERSIONS, GOAL_UPDATE_PROPERTIES];

/// Longest command line cmd.exe accepts, which bounds `mvn.cmd`/`mvnw.cmd`.
pub const CMD_COMMAND_LINE_LIMIT: usize = 8191;

/// Splits a comma-separated goal list, trimming entries and dropping blanks.
pub fn parse_goals(goals: &str) -> Vec<String> {
    goals
        .split(',')
        .map(str::trim)
        .filter(|goal| !goal.is_empty())
        .map(str::to_string)
        .collect()
}

/// Include and exclude filters handed to the Versions plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl FilterConfig {
    pub fn from_collection(collection: &Collection) -> Self {
        let config = Self {
            includes: collection.includes().into_iter().map(String::from).collect(),
            excludes: collection.excludes().into_iter().map(String::from).collect(),
        };
        config.log_table();
        config
    }

    /// `-Dincludes=`/`-Dexcludes=` properties for `goal`; empty sets are omitted.
    pub fn properties_for(&self, goal: &str) -> Vec<String> {
        if !FILTERED_GOALS.contains(&goal) {
            return Vec::new();
        }

        let mut properties = Vec::new();
        if !self.includes.is_empty() {
            properties.push(format!("-Dincludes={}", self.includes.join(",")));
        }
        if !self.excludes.is_empty() {
            properties.push(format!("-Dexcludes={}", self.excludes.join(",")));
        }
        properties
    }

    fn log_table(&self) {
        if !log::is_verbose() {
            return;
        }
        let title = "== INCLUSIONS AND EXCLUSIONS ";
        log::verbose(format!("{title}{}", "=".repeat(80 - title.len())));
        for coordinate in &self.includes {
            log::verbose(format!("include {coordinate}"));
        }
        for coordinate in &self.excludes {
            log::verbose(format!("exclude {coordinate}"));
        }
        log::verbose("=".repeat(80));
    }
}

/// MavenExecutionAgent runs Versions plugin goals through Maven
pub struct MavenExecutionAgent {
    maven_path: PathBuf,
    project_path: PathBuf,
    versions_version: String,
    extra_args: Vec<String>,
}

impl MavenExecutionAgent {
    pub fn new<P: AsRef<Path>>(maven_path: P, project_path: P, versions_version: &str) -> Self {
        Self {
            maven_path: maven_path.as_ref().to_path_buf(),
            project_path: project_path.as_ref().to_path_buf(),
            versions_version: versions_version.to_string(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments appended to every invocation, e.g. `-DgenerateBackupPoms=false`.
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Fully qualified goal, `group:artifact:version:goal`.
    pub fn plugin_goal(&self, goal: &str) -> String {
        format!(
            "{}:{}:{}:{}",
            VERSIONS_PLUGIN_GROUP_ID, VERSIONS_PLUGIN_ARTIFACT_ID, self.versions_version, goal
        )
    }

    pub fn goal_args(&self, goal: &str, filters: &FilterConfig) -> Vec<String> {
        let mut args = vec![self.plugin_goal(goal)];
        args.extend(filters.properties_for(goal));
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Length of the command line `args` produce, program name included.
    pub fn command_line_length(&self, args: &[String]) -> usize {
        args.iter()
            .fold(self.maven_path.as_os_str().len(), |len, arg| len + 1 + arg.len())
    }

    /// Whether `args` overflow cmd.exe when Maven is a `.cmd`/`.bat` script.
    pub fn exceeds_cmd_limit(&self, args: &[String]) -> bool {
        let batch = self
            .maven_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("cmd") || ext.eq_ignore_ascii_case("bat"));
        batch && self.command_line_length(args) > CMD_COMMAND_LINE_LIMIT
    }

    /// Runs each goal in order, one Maven process per goal. Stops at the
    /// first failure.
    pub fn run_goals(&self, goals: &[String], filters: &FilterConfig, dry_run: bool) -> Result<()> {
        for goal in goals {
            let args = self.goal_args(goal, filters);
            if self.exceeds_cmd_limit(&args) {
                println!(
                    "   {} goal {} needs a {}-character command line; cmd.exe stops at {}",
                    "⚠".yellow(),
                    goal,
                    self.command_line_length(&args),
                    CMD_COMMAND_LINE_LIMIT
                );
            }
            if dry_run {
                println!(
                    "   {} {} {}",
                    "would run".dimmed(),
                    self.maven_path.display(),
                    args.join(" ")
                );
                continue;
            }

            println!("\n   {} {}", "▶".cyan(), goal.bright_cyan().bold());
            self.execute_maven_command(&args).map_err(|e| match e {
                FvuError::MavenExecution(message) => {
                    FvuError::MavenExecution(format!("goal '{goal}': {message}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Execute a Maven command with live output streaming
    fn execute_maven_command(&self, args: &[String]) -> Result<()> {
        log::verbose(format!(
            "Executing: {} {}",
            self.maven_path.display(),
            args.join(" ")
        ));

        let mut command = Command::new(&self.maven_path);
        command
            .current_dir(&self.project_path)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut child = command
            .spawn()
            .map_err(|e| FvuError::MavenExecution(format!("Failed to spawn process: {}", e)))?;

        // Stream stdout
        if let Some(stdout) = child.stdout.take() {
            let reader = BufReader::new(stdout);
            for line in reader.lines().map_while(|line| line.ok()) {
                println!("{}", line);
            }
        }

        let status = child
            .wait()
            .map_err(|e| FvuError::MavenExecution(format!("Failed to wait for process: {}", e)))?;

        if !status.success() {
            return Err(FvuError::MavenExecution(format!(
                "Maven command failed with exit code: {}",
                status.code().unwrap_or(-1)
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters() -> FilterConfig {
        FilterConfig {
            includes: vec!["com.example:lib".into(), "org.p:parent".into()],
            excludes: vec!["org.slf4j:slf4j-api".into()],
        }
    }

    fn agent() -> MavenExecutionAgent {
        MavenExecutionAgent::new("mvn", ".", DEFAULT_VERSIONS_VERSION)
    }

    #[test]
    fn parses_goal_list() {
        assert_eq!(
            parse_goals(" use-latest-versions, ,update-parent ,"),
            vec!["use-latest-versions", "update-parent"]
        );
        assert_eq!(
            parse_goals(DEFAULT_GOALS),
            vec![GOAL_USE_LATEST_VERSIONS, GOAL_UPDATE_PROPERTIES, GOAL_UPDATE_PARENT]
        );
    }

    #[test]
    fn filtered_goal_receives_includes_and_excludes() {
        let args = agent()
            .with_extra_args(vec!["-DgenerateBackupPoms=false".into()])
            .goal_args(GOAL_USE_LATEST_VERSIONS, &filters());

        assert_eq!(
            args,
            vec![
                "org.codehaus.mojo:versions-maven-plugin:2.8.1:use-latest-versions",
                "-Dincludes=com.example:lib,org.p:parent",
                "-Dexcludes=org.slf4j:slf4j-api",
                "-DgenerateBackupPoms=false",
            ]
        );
    }

    #[test]
    fn update_parent_and_unknown_goals_run_unfiltered() {
        let agent = agent();
        for goal in [GOAL_UPDATE_PARENT, "display-dependency-updates"] {
            assert_eq!(agent.goal_args(goal, &filters()), vec![agent.plugin_goal(goal)]);
        }
    }

    #[test]
    fn empty_sets_are_omitted() {
        let only_includes = FilterConfig {
            includes: vec!["a:b".into()],
            excludes: Vec::new(),
        };
        assert_eq!(
            only_includes.properties_for(GOAL_UPDATE_PROPERTIES),
            vec!["-Dincludes=a:b"]
        );
        assert!(
            FilterConfig::default()
                .properties_for(GOAL_UPDATE_PROPERTIES)
                .is_empty()
        );
    }

    #[test]
    fn builds_filters_from_collection() {
        let config = FilterConfig::from_collection(&Collection::default());
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn pinned_plugin_version_is_used() {
        let agent = MavenExecutionAgent::new("mvn", ".", "2.16.2");
        assert_eq!(
            agent.plugin_goal(GOAL_UPDATE_PARENT),
            "org.codehaus.mojo:versions-maven-plugin:2.16.2:update-parent"
        );
    }

    #[test]
    fn long_filters_overflow_cmd_scripts_only() {
        let many = FilterConfig {
            includes: (0..400).map(|i| format!("com.example.group{i}:artifact{i}")).collect(),
            excludes: Vec::new(),
        };

        let cmd = MavenExecutionAgent::new("mvnw.cmd", ".", DEFAULT_VERSIONS_VERSION);
        let args = cmd.goal_args(GOAL_USE_LATEST_VERSIONS, &many);
        assert!(cmd.command_line_length(&args) > CMD_COMMAND_LINE_LIMIT);
        assert!(cmd.exceeds_cmd_limit(&args));
        assert!(!cmd.exceeds_cmd_limit(&cmd.goal_args(GOAL_UPDATE_PARENT, &many)));

        let unix = agent();
        assert!(!unix.exceeds_cmd_limit(&unix.goal_args(GOAL_USE_LATEST_VERSIONS, &many)));
    }

    #[test]
    fn command_line_length_counts_separators() {
        let agent = agent();
        let args = vec!["ab".to_string(), "c".to_string()];
        assert_eq!(agent.command_line_length(&args), "mvn ab c".len());
    }

    #[test]
    fn dry_run_does_not_spawn_maven() {
        let agent = MavenExecutionAgent::new("/nonexistent/mvn", ".", DEFAULT_VERSIONS_VERSION);
        let goals = parse_goals(DEFAULT_GOALS);
        assert!(agent.run_goals(&goals, &filters(), true).is_ok());
    }

    #[test]
    fn missing_executable_is_reported() {
        let agent = MavenExecutionAgent::new("/nonexistent/mvn", ".", DEFAULT_VERSIONS_VERSION);
        let err = agent
            .run_goals(&["update-parent".to_string()], &filters(), false)
            .unwrap_err();
        match err {
            FvuError::MavenExecution(message) => assert!(message.contains("update-parent")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
