use rusqlite::types::Type;
use rusqlite::Connection as SqliteConnection;
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::{NewReport, ReportDefinition};

use super::kv;
use super::schema::SCHEMA;
use super::terms;

const COUNT_KEY: &str = "report:count";
const FIELD_NAME: &str = "report_name";
const FIELD_SOURCE_ID: &str = "source_id";
const FIELD_TITLE_TERMS: &str = "title_search_terms";
const FIELD_ALL_TERMS: &str = "all_search_terms";

fn report_key(id: i64) -> String {
    format!("report:{}", id)
}

/// Report definitions stored as `report:{id}` hash records, with `report:count`
/// holding both the last assigned id and the number of definitions.
///
/// Ids are dense from 1. Only one writer is expected at a time.
pub struct ReportRepository {
    conn: Connection,
}

impl ReportRepository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Store a new definition and return its id. The counter bump and the
    /// field writes commit together.
    pub async fn create(&self, report: NewReport) -> Result<i64> {
        let name = report.name.clone();
        let id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let count = read_count(&tx)?;
                let id = count
                    .checked_add(1)
                    .ok_or(rusqlite::Error::IntegralValueOutOfRange(0, count))?;
                kv::set(&tx, COUNT_KEY, &id.to_string())?;

                let key = report_key(id);
                kv::hset(&tx, &key, FIELD_NAME, &report.name)?;
                kv::hset(&tx, &key, FIELD_SOURCE_ID, &report.source_id)?;
                kv::hset(&tx, &key, FIELD_TITLE_TERMS, &terms::encode(&report.title_search_terms))?;
                kv::hset(&tx, &key, FIELD_ALL_TERMS, &terms::encode(&report.all_search_terms))?;
                tx.commit()?;
                Ok(id)
            })
            .await?;

        tracing::info!(id, name = %name, "Report inserted into database");
        Ok(id)
    }

    /// Number of stored definitions; an absent counter means none.
    #[allow(dead_code)]
    pub async fn count(&self) -> Result<i64> {
        let count = self.conn.call(|conn| Ok(read_count(conn)?)).await?;
        Ok(count)
    }

    /// Names of all definitions, ordered by id.
    pub async fn list_names(&self) -> Result<Vec<String>> {
        let names = self
            .conn
            .call(|conn| {
                let count = read_count(conn)?;
                let mut names = Vec::new();
                for id in 1..=count {
                    match kv::hget(conn, &report_key(id), FIELD_NAME)? {
                        Some(name) => names.push(name),
                        // Ids are dense, so the first gap ends the listing
                        None => return Ok(Err(id)),
                    }
                }
                Ok(Ok(names))
            })
            .await?
            .map_err(AppError::ReportNotFound)?;

        tracing::info!(count = names.len(), "Report names retrieved: {:?}", names);
        Ok(names)
    }

    /// Look up a definition. `None` when nothing is stored under the id.
    pub async fn get(&self, id: i64) -> Result<Option<ReportDefinition>> {
        let definition = self
            .conn
            .call(move |conn| {
                let key = report_key(id);
                let Some(source_id) = kv::hget(conn, &key, FIELD_SOURCE_ID)? else {
                    return Ok(None);
                };
                let name = kv::hget(conn, &key, FIELD_NAME)?.unwrap_or_default();
                let title_terms = kv::hget(conn, &key, FIELD_TITLE_TERMS)?.unwrap_or_default();
                let all_terms = kv::hget(conn, &key, FIELD_ALL_TERMS)?.unwrap_or_default();

                Ok(Some(ReportDefinition {
                    id,
                    name,
                    source_id,
                    title_search_terms: terms::decode(&title_terms),
                    all_search_terms: terms::decode(&all_terms),
                }))
            })
            .await?;

        if definition.is_some() {
            tracing::info!(id, "Retrieved report data");
        } else {
            tracing::debug!(id, "No report data stored");
        }
        Ok(definition)
    }
}

fn read_count(conn: &SqliteConnection) -> rusqlite::Result<i64> {
    let Some(value) = kv::get(conn, COUNT_KEY)? else {
        return Ok(0);
    };
    let count = value
        .trim()
        .parse::<i64>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    if count < 0 {
        return Err(rusqlite::Error::IntegralValueOutOfRange(0, count));
    }
    Ok(count)
}
