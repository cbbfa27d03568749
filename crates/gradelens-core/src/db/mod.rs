//! Database access layer with connection pooling and migrations
//!
//! This module is organized by concern:
//! - `records` - Approved-record reads and the fixture write helpers
//! - `aggregates` - Per-student, per-subject and comparative aggregations

use chrono::{DateTime, NaiveDateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};

mod aggregates;
mod records;

pub use records::StoreCounts;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "GRADELENS_DB_KEY";

/// Timestamp format used for `created_at` columns
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the same key,
/// regardless of database path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this would invalidate all existing encrypted databases
    const APP_SALT: &[u8; 16] = b"gradelens-salt-1";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let hash_str = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(hash_str.as_bytes()))
}

/// Parse a SQLite datetime string into a DateTime<Utc>
///
/// Accepts `YYYY-MM-DD HH:MM:SS` with optional fractional seconds, and RFC 3339.
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    for format in [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidData(format!("Unparseable timestamp: {}", s)))
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Opened with a SQLCipher key
    keyed: bool,
    /// Scratch directory owning a throwaway database; dropped after the pool
    #[cfg(any(test, feature = "test-utils"))]
    scratch: Option<std::sync::Arc<tempfile::TempDir>>,
}

impl Database {
    /// Create a new database connection pool with encryption
    ///
    /// Requires `GRADELENS_DB_KEY` environment variable to be set.
    /// Returns an error if it is not. Use `new_unencrypted()` for
    /// development/testing without encryption.
    pub fn new(path: &str) -> Result<Self> {
        match std::env::var(DB_KEY_ENV).ok() {
            Some(key) => Self::new_with_key(path, Some(&key)),
            None => Err(Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for unencrypted databases.",
                DB_KEY_ENV
            ))),
        }
    }

    /// Create a new unencrypted database connection pool
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Create a new database with an explicit encryption key
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);

        let pool = if let Some(pass) = passphrase {
            let key = derive_key(pass)?;
            let key_pragma = format!("PRAGMA key = 'x\"{}\"';", key);

            // Every pooled connection needs the key before first use
            let manager = manager.with_init(move |conn| {
                conn.execute_batch(&key_pragma)?;
                Ok(())
            });

            Pool::builder().max_size(10).build(manager)?
        } else {
            Pool::builder().max_size(10).build(manager)?
        };

        let db = Self {
            pool,
            keyed: passphrase.is_some(),
            #[cfg(any(test, feature = "test-utils"))]
            scratch: None,
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because SQLCipher
    /// has issues with in-memory databases in the connection pool. The file
    /// and its WAL sidecars are removed when the last clone is dropped.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("gradelens_test_").tempdir()?;
        let path = dir.path().join("gradelens.db");
        let path = path
            .to_str()
            .ok_or_else(|| Error::InvalidData("Temp path is not valid UTF-8".to_string()))?;

        let mut db = Self::new_unencrypted(path)?;
        db.scratch = Some(std::sync::Arc::new(dir));
        Ok(db)
    }

    /// Check if the database is encrypted
    ///
    /// True only when the pool was opened with a key and SQLCipher reports a
    /// cipher version on a live connection.
    pub fn is_encrypted(&self) -> Result<bool> {
        if !self.keyed {
            return Ok(false);
        }
        let conn = self.conn()?;
        let version: rusqlite::Result<String> =
            conn.query_row("PRAGMA cipher_version;", [], |row| row.get(0));
        Ok(version.is_ok())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    ///
    /// Only the tables the insight engine reads are created here; the
    /// registry and review workflow own everything else.
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Students (registry-owned, used as join key and display label)
            CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY,
                student_id TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                class TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_students_class ON students(class);

            -- Subjects
            CREATE TABLE IF NOT EXISTS subjects (
                id INTEGER PRIMARY KEY,
                subject_code TEXT UNIQUE NOT NULL,
                subject_name TEXT NOT NULL
            );

            -- Results (one row per assessment; only 'approved' rows are analysed)
            CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY,
                student_id TEXT NOT NULL REFERENCES students(student_id),
                subject_code TEXT NOT NULL REFERENCES subjects(subject_code),
                marks REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',    -- pending, approved, rejected
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_results_student_status ON results(student_id, status);
            CREATE INDEX IF NOT EXISTS idx_results_subject ON results(subject_code);
            CREATE INDEX IF NOT EXISTS idx_results_created ON results(created_at);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}
