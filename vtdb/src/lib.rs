//! vtdb - cursors for tablet servers
//!
//! A DB-API style client layer for a backend that is either a single tablet
//! server or a sharded set of them. Cursors do not speak any wire protocol;
//! they hand statements and routing hints to a [`Connection`] and turn what
//! it returns into a fetchable, iterable result buffer.
//!
//! # Features
//!
//! - **Cursor family**: [`TabletCursor`], [`RoutedCursor`], [`KeyedCursor`]
//!   and [`BatchCursor`] share one execute/fetch state machine
//! - **Transaction words**: `begin`, `commit` and `rollback` statements are
//!   routed to the connection's transaction methods
//! - **Batching**: queue statements and flush them in one round-trip
//! - **MySQL tablets**: [`MySqlConnection`] implements [`Connection`] on
//!   `mysql_async`
//!
//! # Example
//!
//! ```ignore
//! use vtdb::{MySqlConnection, Params};
//!
//! let conn = MySqlConnection::from_url("mysql://root@localhost/test")?;
//! let mut cursor = conn.cursor();
//! cursor.execute("select id, name from users where id = %(id)s", Params::named([("id", 7)]))?;
//! for row in cursor.rows() {
//!     let row = row?;
//!     let name: String = row.get(1)?;
//! }
//! ```

pub mod config;
pub mod connection;
pub mod cursor;
pub mod error;
pub mod mysql;
pub mod params;
pub mod routing;
pub mod row;
pub mod statement;
pub mod times;
pub mod value;

// Re-export main types
pub use crate::config::ConnectionSettings;
pub use connection::{Connection, QueryResult};
pub use cursor::{
    BaseCursor, BatchCursor, BatchQueryItem, KeyedCursor, RoutedCursor, Rows, TabletCursor,
};
pub use error::{Error, Result, UNAVAILABLE};
pub use mysql::MySqlConnection;
pub use params::Params;
pub use routing::RoutingHints;
pub use row::{Field, Row};
pub use statement::StatementKind;
pub use value::{FromValue, Value};
