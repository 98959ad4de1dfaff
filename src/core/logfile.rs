// src/core/logfile.rs

//! Append-mode diagnostic log files.
//!
//! Two options point at log files: `log` receives a record of every run and
//! `log_file` receives the record of a run whose command failed.

use crate::models::ResolvedConfig;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const SEPARATOR: &str = "------------------------------------------------------------";

/// An open log file. Closed when dropped.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: File,
}

impl LogFile {
    /// Where the log is being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the run header: the quoted command line and a timestamp.
    pub fn write_header(&mut self, argv: &[String]) -> io::Result<()> {
        let command_line = shlex::try_join(argv.iter().map(String::as_str))
            .unwrap_or_else(|_| argv.join(" "));
        writeln!(self.file, "{}", SEPARATOR)?;
        writeln!(
            self.file,
            "{} run on {}",
            command_line,
            chrono::Local::now().format("%c")
        )
    }

    /// Writes every resolved option and the layer it came from, as JSON.
    pub fn write_config(&mut self, config: &ResolvedConfig) -> io::Result<()> {
        writeln!(self.file, "Resolved options for '{}':", config.command())?;
        serde_json::to_writer_pretty(&mut self.file, config)?;
        writeln!(self.file)
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Opens `path` for appending, creating it if needed.
///
/// Missing parent directories are created only when the path has a directory
/// component; a bare filename lands in the current directory.
pub fn open_logfile(path: impl AsRef<Path>) -> io::Result<LogFile> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    log::debug!("Opened log file {}", path.display());
    Ok(LogFile {
        path: path.to_path_buf(),
        file,
    })
}
