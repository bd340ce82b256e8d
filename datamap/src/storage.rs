use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub struct Storage {
    connection: Connection,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document field '{field}' is missing")]
    FieldNotFound { field: String },
    #[error("malformed document {world}.{name}: {source}")]
    Document {
        world: String,
        name: String,
        source: serde_json::Error,
    },
}

/// Persisted document of one gate. Documents are keyed by world and gate name,
/// the body is an arbitrary JSON object owned by the caller.
#[derive(Debug, Clone)]
pub struct Entry {
    pub world: String,
    pub name: String,
    pub document: Value,
}

impl Entry {
    pub fn get<'a, T: Deserialize<'a>>(&'a self, field: &str) -> Result<T, StorageError> {
        let value = self
            .document
            .get(field)
            .ok_or_else(|| StorageError::FieldNotFound {
                field: field.to_string(),
            })?;
        let value = T::deserialize(value)?;
        Ok(value)
    }

    pub fn get_string(&self, field: &str) -> Result<&str, StorageError> {
        self.get(field)
    }

    pub fn get_bool(&self, field: &str) -> Result<bool, StorageError> {
        self.get(field)
    }
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let connection = Connection::open(path.as_ref())?;
        info!("Open gate storage {:?}", path.as_ref());
        let storage = Storage { connection };
        storage.setup()?;
        Ok(storage)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let connection = Connection::open_in_memory()?;
        let storage = Storage { connection };
        storage.setup()?;
        Ok(storage)
    }

    #[inline]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn setup(&self) -> Result<(), StorageError> {
        let schema = "create table if not exists gates (
            world text not null,
            name text not null,
            document text not null,
            timestamp integer not null default (strftime('%s', 'now')),
            primary key (world, name)
        );";
        self.connection.execute_batch(schema)?;
        Ok(())
    }

    pub fn worlds(&self) -> Result<Vec<String>, StorageError> {
        let mut statement = self
            .connection
            .prepare("select distinct world from gates order by world")?;
        let mut rows = statement.query([])?;
        let mut worlds = vec![];
        while let Some(row) = rows.next()? {
            worlds.push(row.get("world")?);
        }
        Ok(worlds)
    }

    /// Fetches every document of the world. A row that cannot be decoded is
    /// reported in place so the rest of the world still loads.
    pub fn fetch_all(&self, world: &str) -> Result<Vec<Result<Entry, StorageError>>, StorageError> {
        let mut statement = self
            .connection
            .prepare("select world, name, document from gates where world = ? order by name")?;
        let mut rows = statement.query([world])?;
        let mut entries = vec![];
        while let Some(row) = rows.next()? {
            let world: String = row.get("world")?;
            let name: String = row.get("name")?;
            let document: String = row.get("document")?;
            let entry = match serde_json::from_str(&document) {
                Ok(document) => Ok(Entry {
                    world,
                    name,
                    document,
                }),
                Err(source) => Err(StorageError::Document {
                    world,
                    name,
                    source,
                }),
            };
            entries.push(entry);
        }
        Ok(entries)
    }

    pub fn fetch_one(&self, world: &str, name: &str) -> Result<Option<Entry>, StorageError> {
        let document: Option<String> = self
            .connection
            .query_row(
                "select document from gates where world = ? and name = ?",
                params![world, name],
                |row| row.get("document"),
            )
            .optional()?;
        match document {
            Some(document) => Ok(Some(Entry {
                world: world.to_string(),
                name: name.to_string(),
                document: serde_json::from_str(&document)?,
            })),
            None => Ok(None),
        }
    }

    pub fn save(&self, world: &str, name: &str, document: &Value) -> Result<(), StorageError> {
        let document = serde_json::to_string(document)?;
        self.connection.execute(
            "insert or replace into gates (world, name, document, timestamp)
            values (?, ?, ?, strftime('%s', 'now'))",
            params![world, name, document],
        )?;
        Ok(())
    }

    pub fn delete(&self, world: &str, name: &str) -> Result<bool, StorageError> {
        let deleted = self.connection.execute(
            "delete from gates where world = ? and name = ?",
            params![world, name],
        )?;
        Ok(deleted > 0)
    }
}
