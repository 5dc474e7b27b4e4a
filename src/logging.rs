//! Tracing setup with independent sinks.
//!
//! Each enabled sink is its own subscriber layer, so every event reaches all
//! of them. The console sink writes to stderr; stdout carries report text.

use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Local;
use rusqlite::Connection;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::db::{kv, SCHEMA};
use crate::error::Result;

/// Hash key holding database log entries (field = timestamp, value = message).
pub const LOG_KEY: &str = "log";

pub fn init(config: &LoggingConfig, db_path: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console = config
        .console
        .then(|| fmt::layer().with_writer(std::io::stderr));
    let file = if config.file {
        Some(file_layer(&config.log_filename)?)
    } else {
        None
    };
    let database = if config.database {
        Some(DatabaseLayer::open(db_path)?)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .with(database)
        .try_init()
        .map_err(anyhow::Error::from)?;

    Ok(())
}

fn open_append(path: &str) -> Result<File> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}

/// Plain-text fmt layer appending to `path`.
pub type FileLayer<S> = fmt::Layer<S, DefaultFields, Format, Mutex<File>>;

pub fn file_layer<S>(path: &str) -> Result<FileLayer<S>> {
    let file = open_append(path)?;
    Ok(fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file)))
}

/// Writes each event's message into the `log` hash, keyed by local timestamp.
pub struct DatabaseLayer {
    conn: Mutex<Connection>,
}

impl DatabaseLayer {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl<S: Subscriber> Layer<S> for DatabaseLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.9f").to_string();
        let Ok(conn) = self.conn.lock() else {
            return;
        };
        // Write failures go to stderr only
        if let Err(e) = kv::hset(&conn, LOG_KEY, &timestamp, &visitor.finish()) {
            eprintln!("failed to write log entry to database: {}", e);
        }
    }
}

/// Flattens an event into `message key=value ...`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        let fields = self.fields.join(" ");
        if self.message.is_empty() {
            fields
        } else {
            format!("{} {}", self.message, fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_layer_records_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.db");
        let path = path.to_str().unwrap();

        let subscriber = tracing_subscriber::registry().with(DatabaseLayer::open(path).unwrap());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(id = 3, name = "Sports", "Report inserted into database");
            tracing::warn!("second entry");
        });

        let conn = Connection::open(path).unwrap();
        let entries = kv::hgetall(&conn, LOG_KEY).unwrap();
        let messages: Vec<&str> = entries.iter().map(|(_, msg)| msg.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Report inserted into database id=3 name=Sports", "second entry"]
        );
    }

    #[test]
    fn test_file_layer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let path = path.to_str().unwrap();

        for message in ["first run", "second run"] {
            let subscriber = tracing_subscriber::registry().with(file_layer(path).unwrap());
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!("{}", message);
            });
        }

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first run"));
        assert!(lines[1].ends_with("second run"));
    }

    #[test]
    fn test_all_sinks_receive_every_event() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("reports.db");
        let db_path = db_path.to_str().unwrap();
        let log_path = dir.path().join("app.log");
        let log_path = log_path.to_str().unwrap();

        let subscriber = tracing_subscriber::registry()
            .with(file_layer(log_path).unwrap())
            .with(DatabaseLayer::open(db_path).unwrap());
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Selected main page option 2");
        });

        let contents = std::fs::read_to_string(log_path).unwrap();
        assert!(contents.contains("Selected main page option 2"));

        let conn = Connection::open(db_path).unwrap();
        let entries = kv::hgetall(&conn, LOG_KEY).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1, "Selected main page option 2");
    }
}
