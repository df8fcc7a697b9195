pub mod dump_writer;
pub mod maven_execution;
pub mod project_scanner;
pub mod version_control;

pub use dump_writer::{DumpFormat, DumpWriter};
pub use maven_execution::{FilterConfig, MavenExecutionAgent};
pub use project_scanner::ProjectScannerAgent;
pub use version_control::VersionControlAgent;
