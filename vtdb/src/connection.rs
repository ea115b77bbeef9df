//! The connection interface cursors dispatch through

use std::sync::Arc;

use crate::cursor::BatchQueryItem;
use crate::error::Result;
use crate::params::Params;
use crate::routing::RoutingHints;
use crate::row::{Field, Row};

/// Everything a connection returns for one executed statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Materialized rows, empty for statements without a result set
    pub rows: Vec<Row>,
    /// Rows returned or affected
    pub row_count: u64,
    /// Last insert ID (for INSERT statements)
    pub last_insert_id: Option<u64>,
    /// Column description, if the statement produced a result set
    pub description: Option<Vec<Field>>,
}

/// A connection to a tablet server or a sharded set of them.
///
/// Cursors hold a shared reference to their connection, so every method
/// takes `&self`. Implementations own whatever synchronization they need
/// when many cursors share one connection.
///
/// Errors are surfaced to callers verbatim. A transport failure reported as
/// [`Error::Transport`](crate::Error::Transport) with the message
/// [`UNAVAILABLE`](crate::UNAVAILABLE) tells routed cursors that the shard
/// topology is stale.
pub trait Connection {
    /// Execute one statement.
    fn execute(&self, statement: &str, params: &Params, routing: &RoutingHints)
        -> Result<QueryResult>;

    /// Execute queued statements in order as one round-trip, returning the
    /// aggregate row count.
    fn execute_batch(&self, items: Vec<BatchQueryItem>) -> Result<u64>;

    /// Open a transaction.
    fn begin(&self) -> Result<()>;

    /// Commit the open transaction.
    fn commit(&self) -> Result<()>;

    /// Roll back the open transaction.
    fn rollback(&self) -> Result<()>;

    /// Refresh shard/tablet topology. Unsharded connections have none.
    fn reload_topology(&self) -> Result<()> {
        Ok(())
    }
}

macro_rules! forward_connection {
    ($($ty:ty),+) => {
        $(
            impl<C: Connection + ?Sized> Connection for $ty {
                fn execute(
                    &self,
                    statement: &str,
                    params: &Params,
                    routing: &RoutingHints,
                ) -> Result<QueryResult> {
                    (**self).execute(statement, params, routing)
                }

                fn execute_batch(&self, items: Vec<BatchQueryItem>) -> Result<u64> {
                    (**self).execute_batch(items)
                }

                fn begin(&self) -> Result<()> {
                    (**self).begin()
                }

                fn commit(&self) -> Result<()> {
                    (**self).commit()
                }

                fn rollback(&self) -> Result<()> {
                    (**self).rollback()
                }

                fn reload_topology(&self) -> Result<()> {
                    (**self).reload_topology()
                }
            }
        )+
    };
}

forward_connection!(&C, Arc<C>, Box<C>);
