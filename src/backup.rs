use crate::error::CliError;
use crate::model::Schedule;
use crate::transfer::{validate_entries, RawShareEntry, ScheduleInput};
use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Interchange document for file backups. Full schedule records go out;
/// import only reads the shareable fields and mints fresh ids.
#[derive(serde::Serialize)]
struct BackupDocument<'a> {
    schedules: &'a [Schedule],
    #[serde(rename = "exportDate")]
    export_date: &'a str,
    #[serde(rename = "appVersion")]
    app_version: &'a str,
}

#[derive(serde::Deserialize)]
struct RawBackupDocument {
    #[serde(default)]
    schedules: Option<Vec<RawShareEntry>>,
}

pub fn default_backup_filename(today: &str) -> String {
    format!("binday-backup-{}.json", today)
}

pub fn export_to_path(
    path: &str,
    schedules: &[Schedule],
    export_date: &str,
) -> Result<(), CliError> {
    let doc = BackupDocument {
        schedules,
        export_date,
        app_version: env!("CARGO_PKG_VERSION"),
    };
    let data = serde_json::to_string_pretty(&doc).map_err(|_| CliError::storage("DB IO error"))?
        + "\n";

    let mut f = fs::File::create(Path::new(path))
        .map_err(|_| CliError::storage(format!("Cannot write backup file: {}", path)))?;
    #[cfg(unix)]
    {
        let _ = f.set_permissions(fs::Permissions::from_mode(0o600));
    }
    f.write_all(data.as_bytes())
        .map_err(|_| CliError::storage(format!("Cannot write backup file: {}", path)))?;

    Ok(())
}

/// Reads a backup document. Extra fields are ignored; `schedules` must be
/// present and every entry must validate, or nothing is imported.
pub fn import_from_path(path: &str) -> Result<Vec<ScheduleInput>, CliError> {
    let txt = fs::read_to_string(path)
        .map_err(|_| CliError::storage(format!("Cannot read backup file: {}", path)))?;

    let raw: RawBackupDocument =
        serde_json::from_str(&txt).map_err(|_| CliError::decode("Invalid backup file"))?;
    let entries = raw
        .schedules
        .ok_or_else(|| CliError::decode("Invalid backup file: missing schedules"))?;

    validate_entries(&entries, "backup file")
}
