use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use log::LevelFilter;
use serde::Serialize;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use crate::report::{AuditRecord, ReportSink};

/// Install a stderr logger at `level` ("info", "debug", ...).
/// Unknown levels fall back to `info`; a second call is a no-op.
pub fn init_logger(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);
    let _ = TermLogger::init(
        filter,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    );
}

/// Appends audit records as JSON lines.
/// Best-effort: failures are logged and otherwise ignored (auditing must never block evaluation).
pub struct FileSink {
    path: PathBuf,
}

#[derive(Serialize)]
struct Line<'a> {
    ts: String,
    #[serde(flatten)]
    record: &'a AuditRecord,
}

impl FileSink {
    /// `path` may start with `~`.
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(shellexpand::tilde(path).into_owned()),
        }
    }

    fn append(&self, records: &[AuditRecord]) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        for record in records {
            let line = serde_json::to_string(&Line {
                ts: ts.clone(),
                record,
            })?;
            writeln!(file, "{line}")?;
        }
        Ok(())
    }
}

impl ReportSink for FileSink {
    fn record(&self, records: &[AuditRecord]) {
        if let Err(e) = self.append(records) {
            log::warn!("audit log {} not written: {e}", self.path.display());
        }
    }
}
