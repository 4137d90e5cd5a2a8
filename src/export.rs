use crate::inventory::Inventory;
use crate::types::NetworkRecord;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use thiserror::Error;

pub const DELIMITER: char = ',';
pub const CSV_HEADER: &str = "SSID,BSSID,Signal,Frequency,Channel,Security,Encryption";

const JSON_INDENT: &[u8] = b"    ";

#[cfg(unix)]
const EXPORT_FILE_MODE: u32 = 0o644;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported export format '{0}' (expected csv or json)")]
    InvalidFormat(String),

    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated text
    Delimited,
    /// Pretty-printed JSON array
    Structured,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Delimited, ExportFormat::Structured];

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Delimited => "CSV",
            ExportFormat::Structured => "JSON",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Delimited => "csv",
            ExportFormat::Structured => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "csv" | "delimited" => Ok(ExportFormat::Delimited),
            "2" | "json" | "structured" => Ok(ExportFormat::Structured),
            _ => Err(ExportError::InvalidFormat(s.to_string())),
        }
    }
}

/// Export with a format named by the operator ("csv", "json", "1", "2", ...)
pub fn export(inventory: &Inventory, format: &str, destination: &str) -> Result<PathBuf, ExportError> {
    let format = format.parse::<ExportFormat>()?;
    export_with(inventory, format, destination)
}

/// Write the inventory to `destination` plus the format's extension.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// failed export never leaves a truncated file behind.
pub fn export_with(inventory: &Inventory, format: ExportFormat, destination: &str) -> Result<PathBuf, ExportError> {
    let path = destination_path(destination, format);
    log::info!("[export] export: format={} path={} records={}", format, path.display(), inventory.len());

    let write_failure = |source: io::Error| ExportError::WriteFailure { path: path.clone(), source };

    if destination.trim().is_empty() {
        return Err(write_failure(io::Error::new(io::ErrorKind::InvalidInput, "empty file name")));
    }

    let contents = match format {
        ExportFormat::Delimited => to_delimited(inventory.records()).into_bytes(),
        ExportFormat::Structured => to_structured(inventory.records()).map_err(write_failure)?,
    };

    write_atomically(&path, &contents).map_err(write_failure)?;

    log::info!("[export] export_completed: path={} bytes={}", path.display(), contents.len());
    Ok(path)
}

/// Append the format's extension unless the name already carries it
pub fn destination_path(destination: &str, format: ExportFormat) -> PathBuf {
    let destination = destination.trim();
    let suffix = format!(".{}", format.extension());

    if destination.to_ascii_lowercase().ends_with(&suffix) {
        PathBuf::from(destination)
    } else {
        PathBuf::from(format!("{}{}", destination, suffix))
    }
}

/// Header line plus one line per record. Fields are not escaped: an SSID
/// containing the delimiter shifts the columns of its row.
pub fn to_delimited(records: &[NetworkRecord]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        let fields = [
            record.ssid.clone(),
            record.bssid.clone(),
            record.signal.to_string(),
            record.frequency_label(),
            record.channel.to_string(),
            record.security.to_string(),
            record.encryption.to_string(),
        ];
        out.push_str(&fields.join(&DELIMITER.to_string()));
        out.push('\n');
    }

    out
}

pub fn to_structured(records: &[NetworkRecord]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(JSON_INDENT));
    records.serialize(&mut serializer).map_err(io::Error::other)?;
    Ok(out)
}

fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    // Temp files start out 0600; exports are usually written under sudo
    // and must stay readable by the operator afterwards.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file().set_permissions(std::fs::Permissions::from_mode(EXPORT_FILE_MODE))?;
    }
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
