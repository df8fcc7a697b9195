use crate::collector::Collection;
use crate::error::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// `includes=...` and `excludes=...` lines
    #[default]
    Properties,
    /// `{"includes": [...], "excludes": [...]}`
    Json,
}

#[derive(Debug, Serialize)]
struct DumpReport<'a> {
    includes: Vec<&'a str>,
    excludes: Vec<&'a str>,
}

/// Writes the computed includes and excludes to stdout or a file.
pub struct DumpWriter<'a> {
    collection: &'a Collection,
    format: DumpFormat,
}

impl<'a> DumpWriter<'a> {
    pub fn new(collection: &'a Collection, format: DumpFormat) -> Self {
        Self { collection, format }
    }

    pub fn includes_line(&self) -> String {
        format!("includes={}", self.collection.includes().join(","))
    }

    pub fn excludes_line(&self) -> String {
        format!("excludes={}", self.collection.excludes().join(","))
    }

    pub fn to_json(&self) -> Result<String> {
        let report = DumpReport {
            includes: self.collection.includes(),
            excludes: self.collection.excludes(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn print(&self) -> Result<()> {
        match self.format {
            DumpFormat::Properties => {
                println!("{}", self.includes_line());
                println!("{}", self.excludes_line());
            }
            DumpFormat::Json => println!("{}", self.to_json()?),
        }
        Ok(())
    }

    /// The first write truncates the file, the rest append to it.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match self.format {
            DumpFormat::Properties => {
                File::create(path)?.write_all(self.includes_line().as_bytes())?;
                let mut file = OpenOptions::new().append(true).open(path)?;
                file.write_all(LINE_SEPARATOR.as_bytes())?;
                file.write_all(self.excludes_line().as_bytes())?;
            }
            DumpFormat::Json => {
                File::create(path)?.write_all(self.to_json()?.as_bytes())?;
            }
        }
        Ok(())
    }
}
