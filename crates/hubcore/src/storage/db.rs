use std::time::Duration;

use chrono::Utc;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Result, ToSql};

use crate::types::AccountType;

/// A registered user.
///
/// Rows are created lazily on first contact and never updated afterwards;
/// `balance` is a read-only display field with no write path.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Telegram-assigned user ID, the identity key
    pub telegram_id: i64,
    /// Telegram username, if set
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Every user starts as a client; no transition path exists yet
    pub account_type: AccountType,
    /// Balance in the marketplace currency
    pub balance: f64,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// How long a connection waits on a locked database before giving up.
/// Concurrent first contacts from the same identity serialize on the
/// `users` write lock instead of surfacing SQLITE_BUSY.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and runs schema
/// migrations on the first connection.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Returns
///
/// Returns a `DbPool` on success or an `r2d2::Error` if pool creation fails.
pub fn create_pool(database_path: &str) -> std::result::Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
    let pool = Pool::builder().max_size(10).build(manager)?;

    // Ensure schema is up to date on first connection
    let conn = pool.get()?;
    if let Err(e) = migrate_schema(&conn) {
        log::warn!("Failed to migrate schema: {}", e);
        // Don't fail on migration errors, as they might be expected
    }

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is automatically returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> std::result::Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Migrate database schema to ensure the users table and all required
/// columns exist. Safely adds missing columns to legacy databases.
pub fn migrate_schema(conn: &rusqlite::Connection) -> Result<()> {
    let table_exists: bool = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='users'",
        [],
        |row| Ok(row.get::<_, i32>(0)? > 0),
    )?;

    if !table_exists {
        conn.execute(
            "CREATE TABLE users (
                telegram_id INTEGER PRIMARY KEY,
                username TEXT,
                first_name TEXT,
                last_name TEXT,
                account_type TEXT NOT NULL DEFAULT 'client',
                balance REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        return Ok(());
    }

    // Table exists, check which columns it carries
    let mut stmt = conn.prepare("PRAGMA table_info(users)")?;
    let rows = stmt.query_map([], |row| {
        row.get::<_, String>(1) // column name
    })?;

    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }

    let needed: [(&str, &str); 6] = [
        ("username", "TEXT"),
        ("first_name", "TEXT"),
        ("last_name", "TEXT"),
        ("account_type", "TEXT NOT NULL DEFAULT 'client'"),
        ("balance", "REAL NOT NULL DEFAULT 0"),
        ("created_at", "TEXT NOT NULL DEFAULT ''"),
    ];

    for (name, definition) in needed {
        if !columns.iter().any(|c| c == name) {
            log::info!("Adding missing column: {} to users table", name);
            if let Err(e) = conn.execute(&format!("ALTER TABLE users ADD COLUMN {} {}", name, definition), []) {
                log::warn!("Failed to add {} column: {}", name, e);
            }
        }
    }

    Ok(())
}

/// Inserts a new user row with defaults (`client` account, zero balance,
/// `created_at` = now).
///
/// # Errors
///
/// Returns a constraint violation if a row for `telegram_id` already
/// exists; `ensure_user` treats that as "lost the race".
pub fn create_user(
    conn: &DbConnection,
    telegram_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<User> {
    let account_type = AccountType::default();
    let created_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO users (telegram_id, username, first_name, last_name, account_type, balance, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        &[
            &telegram_id as &dyn ToSql,
            &username,
            &first_name,
            &last_name,
            &account_type,
            &created_at,
        ],
    )?;
    Ok(User {
        telegram_id,
        username,
        first_name,
        last_name,
        account_type,
        balance: 0.0,
        created_at,
    })
}

/// Fetches a user by Telegram ID.
///
/// Returns `Ok(None)` when no row exists. Columns added by migration on a
/// legacy database read back with their defaults.
pub fn get_user(conn: &DbConnection, telegram_id: i64) -> Result<Option<User>> {
    let mut stmt = conn.prepare(
        "SELECT telegram_id, username, first_name, last_name, account_type, balance, created_at
         FROM users WHERE telegram_id = ?",
    )?;
    let mut rows = stmt.query(&[&telegram_id as &dyn ToSql])?;

    if let Some(row) = rows.next()? {
        let telegram_id: i64 = row.get(0)?;
        let username: Option<String> = row.get(1)?;
        let first_name: Option<String> = row.get(2)?;
        let last_name: Option<String> = row.get(3)?;
        let account_type: AccountType = row.get(4).unwrap_or_default();
        let balance: f64 = row.get(5).unwrap_or(0.0);
        let created_at: String = row.get(6).unwrap_or_default();

        Ok(Some(User {
            telegram_id,
            username,
            first_name,
            last_name,
            account_type,
            balance,
            created_at,
        }))
    } else {
        Ok(None)
    }
}

/// Insert-if-absent, else return-existing, without modifying existing fields.
///
/// Repeated contacts from the same identity must not alter stored metadata,
/// so display fields are only taken from the call that creates the row.
/// The race between two concurrent first contacts is decided by the
/// PRIMARY KEY constraint: the loser's insert fails with a constraint
/// violation and re-fetches the winner's row.
///
/// Returns the resolved user and whether this call created the row.
pub fn ensure_user(
    conn: &DbConnection,
    telegram_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<(User, bool)> {
    if let Some(user) = get_user(conn, telegram_id)? {
        return Ok((user, false));
    }

    match create_user(conn, telegram_id, username, first_name, last_name) {
        Ok(user) => Ok((user, true)),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            // A concurrent first contact won the race between our lookup
            // and insert; their row is the authoritative one.
            let user = get_user(conn, telegram_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
            Ok((user, false))
        }
        Err(e) => Err(e),
    }
}

/// Returns the stored balance, or 0 when no row exists.
///
/// Read-only: never creates a row, unlike `ensure_user`.
pub fn get_balance(conn: &DbConnection, telegram_id: i64) -> Result<f64> {
    let mut stmt = conn.prepare("SELECT balance FROM users WHERE telegram_id = ?")?;
    let mut rows = stmt.query(&[&telegram_id as &dyn ToSql])?;

    match rows.next()? {
        Some(row) => row.get(0),
        None => Ok(0.0),
    }
}

/// All registered users, newest first. Used by the `users` ops subcommand.
pub fn get_all_users(conn: &DbConnection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT telegram_id, username, first_name, last_name, account_type, balance, created_at
         FROM users ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(User {
            telegram_id: row.get(0)?,
            username: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            account_type: row.get(4).unwrap_or_default(),
            balance: row.get(5).unwrap_or(0.0),
            created_at: row.get(6).unwrap_or_default(),
        })
    })?;

    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

/// Number of registered users.
pub fn count_users(conn: &DbConnection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    // Pooled connections need a real file so they all see one database;
    // per-connection :memory: would give every connection its own.
    fn test_pool() -> (TempDir, DbPool) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.db");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        (dir, pool)
    }

    #[test]
    fn test_ensure_user_creates_with_defaults() {
        let (_dir, pool) = test_pool();
        let conn = get_connection(&pool).unwrap();

        let (user, created) = ensure_user(
            &conn,
            1001,
            Some("alice".to_string()),
            Some("Alice".to_string()),
            None,
        )
        .unwrap();

        assert!(created);
        assert_eq!(user.telegram_id, 1001);
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.account_type, AccountType::Client);
        assert_eq!(user.balance, 0.0);
        assert!(!user.created_at.is_empty());
        assert_eq!(count_users(&conn).unwrap(), 1);
    }

    #[test]
    fn test_ensure_user_is_idempotent() {
        let (_dir, pool) = test_pool();
        let conn = get_connection(&pool).unwrap();

        let (first, created) = ensure_user(&conn, 42, Some("alice".to_string()), Some("Alice".to_string()), None).unwrap();
        assert!(created);

        // A second contact with different display fields must not refresh
        // the stored row.
        let (second, created) = ensure_user(
            &conn,
            42,
            Some("renamed".to_string()),
            Some("Someone".to_string()),
            Some("Else".to_string()),
        )
        .unwrap();

        assert!(!created);
        assert_eq!(second, first);
        assert_eq!(count_users(&conn).unwrap(), 1);
    }

    #[test]
    fn test_concurrent_first_contact_creates_one_row() {
        let (_dir, pool) = test_pool();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            handles.push(std::thread::spawn(move || {
                let conn = get_connection(&pool).unwrap();
                let (_, created) = ensure_user(&conn, 777, Some("racer".to_string()), None, None).unwrap();
                created
            }));
        }

        let created_count = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|created| *created)
            .count();
        assert_eq!(created_count, 1, "exactly one contact should create the row");

        let conn = get_connection(&pool).unwrap();
        assert_eq!(count_users(&conn).unwrap(), 1);
    }

    #[test]
    fn test_get_balance_missing_row_is_zero() {
        let (_dir, pool) = test_pool();
        let conn = get_connection(&pool).unwrap();

        assert_eq!(get_balance(&conn, 555).unwrap(), 0.0);
        // The read-only path must not have created a row
        assert_eq!(count_users(&conn).unwrap(), 0);
    }

    #[test]
    fn test_get_balance_existing_row() {
        let (_dir, pool) = test_pool();
        let conn = get_connection(&pool).unwrap();

        ensure_user(&conn, 9, None, None, None).unwrap();
        conn.execute("UPDATE users SET balance = 12.5 WHERE telegram_id = 9", [])
            .unwrap();

        assert_eq!(get_balance(&conn, 9).unwrap(), 12.5);
    }

    #[test]
    fn test_migrate_schema_adds_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = rusqlite::Connection::open(&path).unwrap();
            conn.execute("CREATE TABLE users (telegram_id INTEGER PRIMARY KEY, username TEXT)", [])
                .unwrap();
            conn.execute("INSERT INTO users (telegram_id, username) VALUES (7, 'old')", [])
                .unwrap();
        }

        let pool = create_pool(path.to_str().unwrap()).unwrap();
        let conn = get_connection(&pool).unwrap();

        let user = get_user(&conn, 7).unwrap().unwrap();
        assert_eq!(user.username.as_deref(), Some("old"));
        assert_eq!(user.account_type, AccountType::Client);
        assert_eq!(user.balance, 0.0);
    }

    #[test]
    fn test_get_all_users_and_count() {
        let (_dir, pool) = test_pool();
        let conn = get_connection(&pool).unwrap();

        ensure_user(&conn, 1, Some("a".to_string()), None, None).unwrap();
        ensure_user(&conn, 2, Some("b".to_string()), None, None).unwrap();

        let users = get_all_users(&conn).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(count_users(&conn).unwrap(), 2);
    }
}
