use tracing::warn;

use crate::connection::Connection;
use crate::error::Result;
use crate::params::Params;
use crate::routing::RoutingHints;

use super::{deref_base, BaseCursor};

/// Cursor for a sharded backend, routed per statement.
pub struct RoutedCursor<'c, C: ?Sized> {
    base: BaseCursor<'c, C>,
}

impl<'c, C: Connection + ?Sized> RoutedCursor<'c, C> {
    pub fn new(connection: &'c C) -> Self {
        Self {
            base: BaseCursor::new(connection),
        }
    }

    /// Execute a statement against the shard(s) named by `routing`.
    ///
    /// When the connection reports the shard as unavailable, its topology is
    /// reloaded and the original error is returned. The statement is not
    /// retried; that is up to the caller.
    pub fn execute(
        &mut self,
        statement: &str,
        params: impl Into<Params>,
        routing: RoutingHints,
    ) -> Result<Option<u64>> {
        match self.base.dispatch(statement, &params.into(), &routing) {
            Err(err) if err.is_unavailable() => {
                warn!(?routing, "shard unavailable, reloading topology");
                if let Ok(connection) = self.base.connection() {
                    if let Err(reload_err) = connection.reload_topology() {
                        warn!(error = %reload_err, "topology reload failed");
                    }
                }
                Err(err)
            }
            other => other,
        }
    }
}

deref_base!(RoutedCursor);
