//! Settings shared by the command line binaries.

use std::path::PathBuf;

use rusqlite::Connection;
use time::UtcOffset;

use crate::{Error, db::initialize, timezone::get_local_offset};

/// The settings every binary accepts, flattened into its own arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "TRACKER_DB_PATH", default_value = "expense_tracker.db")]
    pub db_path: PathBuf,

    /// The canonical timezone name used for dates and charts, e.g. "Pacific/Auckland".
    #[arg(long, env = "TRACKER_TIMEZONE", default_value = "UTC")]
    pub timezone: String,

    /// Append debug logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// The current UTC offset of the configured timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone name is unknown.
    pub fn local_offset(&self) -> Result<UtcOffset, Error> {
        get_local_offset(&self.timezone)
            .ok_or_else(|| Error::InvalidTimezoneError(self.timezone.clone()))
    }

    /// Open the database at `db_path`, creating the tables if needed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened as an SQLite database or
    /// the tables cannot be created.
    pub fn open_database(&self) -> Result<Connection, Error> {
        let connection = Connection::open(&self.db_path)?;
        initialize(&connection)?;

        tracing::debug!("Opened database at {}", self.db_path.display());

        Ok(connection)
    }
}
