//! `SQLite` property store.
//!
//! Plays the role of the server-side property manager: vector properties
//! and their range domains persist in a `SQLite` database, and the store
//! implements [`PropertyRegistry`] so controls can be bound against it.

// SQLite stores all integers as i64; push counts are never negative.
#![allow(clippy::cast_sign_loss)]

use crate::core::DomainRange;
use crate::error::{PropertyError, Result};
use crate::property::schema::{
    CHECK_SCHEMA_SQL, CURRENT_SCHEMA_VERSION, GET_VERSION_SQL, SCHEMA_SQL, SET_VERSION_SQL,
};
use crate::property::traits::{PropertyRegistry, VectorProperty};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Snapshot of one stored property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    /// Property name.
    pub name: String,
    /// Committed elements.
    pub elements: Vec<f64>,
    /// Range domain, if declared.
    pub domain: Option<DomainRange>,
    /// Number of pushes received.
    pub push_count: u64,
    /// Unix timestamp of the last change.
    pub updated_at: i64,
}

impl PropertyRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<(Self, String)> {
        let low: Option<f64> = row.get(2)?;
        let high: Option<f64> = row.get(3)?;
        let push_count: i64 = row.get(4)?;
        let domain = if low.is_some() || high.is_some() {
            Some(DomainRange { low, high })
        } else {
            None
        };
        Ok((
            Self {
                name: row.get(0)?,
                elements: Vec::new(),
                domain,
                push_count: push_count as u64,
                updated_at: row.get(5)?,
            },
            row.get(1)?,
        ))
    }
}

const SELECT_PROPERTY_SQL: &str = r"
SELECT name, elements, domain_low, domain_high, push_count, updated_at
FROM properties
";

/// SQLite-backed property registry.
///
/// # Examples
///
/// ```no_run
/// use rangebind::property::SqliteRegistry;
///
/// let mut registry = SqliteRegistry::open(".rangebind/properties.db").unwrap();
/// registry.init().unwrap();
/// ```
pub struct SqliteRegistry {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl SqliteRegistry {
    /// Opens or creates a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| PropertyError::Store(e.to_string()))?;
        }

        let conn = Connection::open(&path).map_err(PropertyError::from)?;

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Creates an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(PropertyError::from)?;
        Ok(Self { conn, path: None })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Creates the schema or migrates an older one. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation or migration fails.
    pub fn init(&mut self) -> Result<()> {
        let is_init: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(PropertyError::from)?;

        if is_init == 0 {
            self.conn
                .execute_batch(SCHEMA_SQL)
                .map_err(PropertyError::from)?;
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
        } else if let Some(current) = self.get_schema_version()?
            && current < CURRENT_SCHEMA_VERSION
        {
            for migration in crate::property::schema::get_migrations_from(current) {
                self.conn
                    .execute_batch(migration.sql)
                    .map_err(PropertyError::from)?;
            }
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
        }

        Ok(())
    }

    /// Checks whether the schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot be performed.
    pub fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(PropertyError::from)?;
        Ok(count > 0)
    }

    /// Gets the current schema version.
    fn get_schema_version(&self) -> Result<Option<u32>> {
        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(PropertyError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    /// Sets the schema version.
    fn set_schema_version(&self, version: u32) -> Result<()> {
        self.conn
            .execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(PropertyError::from)?;
        Ok(())
    }

    /// Returns current Unix timestamp.
    #[allow(clippy::cast_possible_wrap)]
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    /// Declares a new property.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::AlreadyDefined`] if the name is taken.
    pub fn define(
        &mut self,
        name: &str,
        elements: &[f64],
        domain: Option<DomainRange>,
    ) -> Result<()> {
        if self.get(name)?.is_some() {
            return Err(PropertyError::AlreadyDefined {
                name: name.to_string(),
            }
            .into());
        }

        let json = serde_json::to_string(elements).map_err(PropertyError::from)?;
        let domain = domain.unwrap_or_default();
        let now = Self::now();
        self.conn
            .execute(
                r"
            INSERT INTO properties (name, elements, domain_low, domain_high, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
        ",
                params![name, json, domain.low, domain.high, now, now],
            )
            .map_err(PropertyError::from)?;
        Ok(())
    }

    /// Replaces a property's range domain, as a data refresh would.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::NotFound`] for an unknown name.
    pub fn set_domain(&mut self, name: &str, domain: DomainRange) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE properties SET domain_low = ?, domain_high = ?, updated_at = ? WHERE name = ?",
                params![domain.low, domain.high, Self::now(), name],
            )
            .map_err(PropertyError::from)?;
        if changed == 0 {
            return Err(PropertyError::NotFound {
                name: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Loads one property.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or element decoding fails.
    pub fn get(&self, name: &str) -> Result<Option<PropertyRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_PROPERTY_SQL} WHERE name = ?"),
                params![name],
                PropertyRecord::from_row,
            )
            .optional()
            .map_err(PropertyError::from)?;

        row.map(decode_elements).transpose()
    }

    /// Lists all properties ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or element decoding fails.
    pub fn list(&self) -> Result<Vec<PropertyRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_PROPERTY_SQL} ORDER BY name"))
            .map_err(PropertyError::from)?;

        let rows = stmt
            .query_map([], PropertyRecord::from_row)
            .map_err(PropertyError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(PropertyError::from)?;

        rows.into_iter().map(decode_elements).collect()
    }
}

fn decode_elements((mut record, json): (PropertyRecord, String)) -> Result<PropertyRecord> {
    record.elements = serde_json::from_str(&json).map_err(PropertyError::from)?;
    Ok(record)
}

/// Live handle on a stored property.
struct SqlProperty<'r> {
    conn: &'r Connection,
    record: PropertyRecord,
}

impl VectorProperty for SqlProperty<'_> {
    fn name(&self) -> &str {
        &self.record.name
    }

    fn len(&self) -> usize {
        self.record.elements.len()
    }

    fn set_elements(&mut self, values: &[f64]) -> Result<()> {
        let json = serde_json::to_string(values).map_err(PropertyError::from)?;
        self.conn
            .execute(
                r"
            UPDATE properties
            SET elements = ?, push_count = push_count + 1, updated_at = ?
            WHERE name = ?
        ",
                params![json, SqliteRegistry::now(), self.record.name],
            )
            .map_err(PropertyError::from)?;
        values.clone_into(&mut self.record.elements);
        self.record.push_count += 1;
        Ok(())
    }

    fn element(&self, index: usize) -> Result<f64> {
        self.record.elements.get(index).copied().ok_or_else(|| {
            PropertyError::ElementOutOfRange {
                name: self.record.name.clone(),
                index,
            }
            .into()
        })
    }

    fn domain(&self) -> Option<DomainRange> {
        self.record.domain
    }
}

impl PropertyRegistry for SqliteRegistry {
    fn resolve<'r>(&'r mut self, name: &str) -> Result<Option<Box<dyn VectorProperty + 'r>>> {
        let record = self.get(name)?;
        Ok(record.map(|record| {
            Box::new(SqlProperty {
                conn: &self.conn,
                record,
            }) as Box<dyn VectorProperty + 'r>
        }))
    }
}
