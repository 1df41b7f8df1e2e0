use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, ToSql, params_from_iter};
use tracing::debug;

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Value};

/// SQLStore backed by rusqlite (bundled SQLite).
///
/// A single connection is shared behind a mutex; every call holds the lock
/// for the duration of one statement (or one migration transaction).
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path).map_err(|e| SQLError::Connection(e.to_string()))?;

        // WAL keeps readers off the writer's back.
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        debug!("opened sqlite database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn =
            Connection::open_in_memory().map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SQLError> {
        self.conn
            .lock()
            .map_err(|_| SQLError::Connection("connection mutex poisoned".into()))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

fn column_value(raw: ValueRef<'_>) -> Result<Value, SQLError> {
    match raw {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Integer(i)),
        ValueRef::Real(f) => Ok(Value::Real(f)),
        ValueRef::Text(bytes) => Ok(Value::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(_) => Err(SQLError::Query("blob columns are not supported".into())),
    }
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(|e| SQLError::Query(e.to_string()))?;

        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(|e| SQLError::Query(e.to_string()))? {
            let mut columns = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let raw = row.get_ref(i).map_err(|e| SQLError::Query(e.to_string()))?;
                columns.push((name.clone(), column_value(raw)?));
            }
            result.push(Row { columns });
        }
        Ok(result)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self.lock()?;
        let affected = conn
            .execute(sql, params_from_iter(params.iter()))
            .map_err(|e| SQLError::Execution(e.to_string()))?;
        Ok(affected as u64)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError> {
        let conn = self.lock()?;
        conn.execute(sql, params_from_iter(params.iter()))
            .map_err(|e| SQLError::Execution(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    fn migrate(&self, statements: &[&str]) -> Result<(), SQLError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| SQLError::Migration(e.to_string()))?;
        for stmt in statements {
            tx.execute_batch(stmt)
                .map_err(|e| SQLError::Migration(format!("{e} in `{stmt}`")))?;
        }
        tx.commit().map_err(|e| SQLError::Migration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .migrate(&["CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, score REAL, level INTEGER)"])
            .unwrap();
        store
    }

    #[test]
    fn insert_returns_increasing_rowids() {
        let s = store();
        let a = s.insert("INSERT INTO t (name) VALUES (?1)", &[Value::from("a")]).unwrap();
        let b = s.insert("INSERT INTO t (name) VALUES (?1)", &[Value::from("b")]).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn query_maps_column_types() {
        let s = store();
        s.insert(
            "INSERT INTO t (name, score, level) VALUES (?1, ?2, ?3)",
            &[Value::Text("x".into()), Value::Real(1.5), Value::Null],
        )
        .unwrap();

        let rows = s.query("SELECT id, name, score, level FROM t", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.get_i64("id"), Some(1));
        assert_eq!(row.get_str("name"), Some("x"));
        assert_eq!(row.get("score"), Some(&Value::Real(1.5)));
        assert_eq!(row.get("level"), Some(&Value::Null));
        assert_eq!(row.get_i64("level"), None);
    }

    #[test]
    fn exec_reports_affected_rows() {
        let s = store();
        s.insert("INSERT INTO t (name) VALUES (?1)", &[Value::from("a")]).unwrap();
        let n = s
            .exec("UPDATE t SET level = ?1 WHERE id = ?2", &[Value::Integer(3), Value::Integer(1)])
            .unwrap();
        assert_eq!(n, 1);
        let n = s
            .exec("UPDATE t SET level = ?1 WHERE id = ?2", &[Value::Integer(3), Value::Integer(99)])
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn failed_migration_rolls_back() {
        let s = SqliteStore::open_in_memory().unwrap();
        let err = s.migrate(&["CREATE TABLE a (id INTEGER)", "NOT VALID SQL"]);
        assert!(matches!(err, Err(SQLError::Migration(_))));

        let rows = s
            .query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'a'", &[])
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        {
            let s = SqliteStore::open(&path).unwrap();
            s.migrate(&["CREATE TABLE kv (k TEXT PRIMARY KEY, v TEXT)"]).unwrap();
            s.exec("INSERT INTO kv (k, v) VALUES (?1, ?2)", &[Value::from("a"), Value::from("b")])
                .unwrap();
        }
        let s = SqliteStore::open(&path).unwrap();
        let rows = s.query("SELECT v FROM kv WHERE k = ?1", &[Value::from("a")]).unwrap();
        assert_eq!(rows[0].get_str("v"), Some("b"));
    }
}
