//! Database layer
//!
//! Connection pooling over SQLite (default) or MySQL, embedded migrations,
//! and the repositories that the service layer talks to.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, require_mysql, require_sqlite, DatabasePool, DynDatabasePool,
    MysqlDatabase, SqliteDatabase,
};
