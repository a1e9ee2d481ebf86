//! SQLite connection pool: one serialized writer, a fixed set of
//! read-only connections.
//!
//! SQLite permits a single writer at a time; funneling every mutation
//! through the mutex-guarded write connection avoids SQLITE_BUSY churn,
//! while WAL mode lets the readers proceed concurrently. An in-memory
//! database is private to the connection that opened it, so the
//! in-memory pool has no readers at all and routes reads through the
//! writer instead.

pub mod pragmas;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use quarry_core::errors::{QuarryError, QuarryResult, StorageError};

use crate::to_storage_err;

/// Default number of read connections for a file-backed pool.
pub const DEFAULT_READERS: usize = 4;

/// Upper bound on read connections.
const MAX_READERS: usize = 8;

/// The connection pool behind `StorageEngine`.
pub struct ConnectionPool {
    writer: Mutex<Connection>,
    /// Empty for in-memory pools; reads then fall back to the writer.
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
}

impl ConnectionPool {
    /// Open a file-backed pool. The writer is opened (and WAL
    /// configured) first so the read-only connections always find an
    /// initialized database file.
    pub fn open(path: &Path, reader_count: usize) -> QuarryResult<Self> {
        let writer = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        pragmas::apply_pragmas(&writer)?;

        let mut readers = Vec::with_capacity(reader_count.clamp(1, MAX_READERS));
        for _ in 0..reader_count.clamp(1, MAX_READERS) {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            pragmas::apply_read_pragmas(&conn)?;
            readers.push(Mutex::new(conn));
        }

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
        })
    }

    /// Open an in-memory pool (for testing). Reader-less: every
    /// operation goes through the single writer connection.
    pub fn open_in_memory() -> QuarryResult<Self> {
        let writer = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        pragmas::apply_pragmas(&writer)?;
        Ok(Self {
            writer: Mutex::new(writer),
            readers: Vec::new(),
            next_reader: AtomicUsize::new(0),
        })
    }

    /// Execute a closure with exclusive access to the write connection.
    pub fn with_writer<F, T>(&self, f: F) -> QuarryResult<T>
    where
        F: FnOnce(&Connection) -> QuarryResult<T>,
    {
        let guard = self.writer.lock().map_err(|e| {
            QuarryError::Storage(StorageError::LockPoisoned {
                message: e.to_string(),
            })
        })?;
        f(&guard)
    }

    /// Execute a read-only closure on the next reader (round-robin),
    /// or on the writer when the pool has no readers (in-memory mode).
    pub fn with_reader<F, T>(&self, f: F) -> QuarryResult<T>
    where
        F: FnOnce(&Connection) -> QuarryResult<T>,
    {
        if self.readers.is_empty() {
            return self.with_writer(f);
        }
        let idx = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let guard = self.readers[idx].lock().map_err(|e| {
            QuarryError::Storage(StorageError::LockPoisoned {
                message: e.to_string(),
            })
        })?;
        f(&guard)
    }

    /// Number of dedicated read connections (0 for in-memory pools).
    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_pool_has_no_readers_and_reads_through_writer() {
        let pool = ConnectionPool::open_in_memory().unwrap();
        assert_eq!(pool.reader_count(), 0);

        pool.with_writer(|conn| {
            conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (7)")
                .map_err(|e| to_storage_err(e.to_string()))
        })
        .unwrap();

        // Reads must see the writer's data despite the lack of readers.
        let x: i64 = pool
            .with_reader(|conn| {
                conn.query_row("SELECT x FROM t", [], |row| row.get(0))
                    .map_err(|e| to_storage_err(e.to_string()))
            })
            .unwrap();
        assert_eq!(x, 7);
    }

    #[test]
    fn file_pool_opens_bounded_readers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.db");

        let pool = ConnectionPool::open(&path, 2).unwrap();
        assert_eq!(pool.reader_count(), 2);

        // Requests beyond the cap are clamped.
        let big = ConnectionPool::open(&path, 99).unwrap();
        assert!(big.reader_count() <= 8);
    }

    #[test]
    fn wal_mode_is_active_on_file_pools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.db");
        let pool = ConnectionPool::open(&path, 1).unwrap();

        let wal = pool
            .with_writer(|conn| pragmas::verify_wal_mode(conn))
            .unwrap();
        assert!(wal);
    }
}
