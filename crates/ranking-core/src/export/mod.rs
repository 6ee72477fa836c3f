//! Export of a ranking as `;`-separated text.

mod sink;

pub use sink::{DirectorySink, DownloadSink};

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::game::RecordPath;
use crate::ranking::{RankingEntry, RankingList};

pub const SEPARATOR: char = ';';
pub const ROW_TERMINATOR: char = '\n';

const HEADER: [&str; 5] = ["Nombre", "Apellido", "Email", "Puntaje", "Posicion"];

/// Serialize a ranking: a header row, then one row per entry with given
/// name, family name, email, stored score text, and position. Rows are
/// joined by `\n` without a trailing terminator.
pub fn serialize(list: &RankingList) -> String {
    std::iter::once(format_row(HEADER))
        .chain(list.iter().map(format_entry))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_entry(entry: &RankingEntry) -> String {
    let position = entry.position.to_string();
    let record = &entry.record;
    format_row([
        record.given_name.as_str(),
        record.family_name.as_str(),
        record.email.as_str(),
        record.score.as_str(),
        position.as_str(),
    ])
}

fn format_row(fields: [&str; 5]) -> String {
    fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(";")
}

/// Quote a field containing the separator, a double quote, or a newline,
/// doubling embedded quotes. Other fields are returned unchanged.
pub fn escape_field(field: &str) -> String {
    if field.contains([SEPARATOR, '"', ROW_TERMINATOR]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// `ranking-<game>-<YYYY-MM-DD>.csv`
pub fn file_name(game_id: &str, date: NaiveDate) -> String {
    format!("ranking-{}-{}.csv", game_id, date.format("%Y-%m-%d"))
}

/// Password-gated export.
///
/// The gate is a plain string comparison against a secret shipped with the
/// configuration. It is not a security control: anyone who can read the
/// config or the binary knows the secret. It only keeps casual viewers from
/// downloading the participant list by accident.
pub struct RankingExporter {
    secret: String,
}

impl RankingExporter {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn authorize(&self, secret: &str) -> bool {
        secret == self.secret
    }

    /// Check `secret`, then hand the serialized ranking to `sink`.
    ///
    /// Returns the file name on success and [`Error::Unauthorized`] when the
    /// secret does not match, in which case nothing is delivered.
    pub fn export(
        &self,
        secret: &str,
        path: RecordPath,
        list: &RankingList,
        date: NaiveDate,
        sink: &mut dyn DownloadSink,
    ) -> Result<String> {
        if !self.authorize(secret) {
            warn!("Export of {} rejected: wrong password", path);
            return Err(Error::Unauthorized);
        }

        let name = file_name(path.game_id(), date);
        sink.deliver(&name, &serialize(list))?;
        info!("Exported {} entries to {}", list.len(), name);
        Ok(name)
    }

    /// [`export`](Self::export) dated with the local current date.
    pub fn export_today(
        &self,
        secret: &str,
        path: RecordPath,
        list: &RankingList,
        sink: &mut dyn DownloadSink,
    ) -> Result<String> {
        self.export(secret, path, list, Local::now().date_naive(), sink)
    }
}
