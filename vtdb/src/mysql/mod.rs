//! MySQL tablet connection for vtdb

mod connection;
mod types;

pub use connection::MySqlConnection;
