use crate::db::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "sessions.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the store in the per-user data directory.
    pub fn new() -> Result<Db> {
        Self::in_storage(&DataStorage::new())
    }

    pub fn in_storage(storage: &DataStorage) -> Result<Db> {
        Self::open(&storage.get_path(DB_FILE_NAME)?)
    }

    /// Opens the store at `path` and brings its schema up to date.
    pub fn open(path: &Path) -> Result<Db> {
        let mut conn = Self::open_without_migrations(path)?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    pub fn open_without_migrations(path: &Path) -> Result<Connection> {
        Ok(Connection::open(path)?)
    }
}
