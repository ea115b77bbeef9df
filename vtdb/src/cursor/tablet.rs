use crate::connection::Connection;
use crate::error::Result;
use crate::params::Params;
use crate::routing::RoutingHints;

use super::{deref_base, BaseCursor};

/// Cursor for a connection to exactly one unsharded tablet.
///
/// Statements are never accompanied by routing hints.
pub struct TabletCursor<'c, C: ?Sized> {
    base: BaseCursor<'c, C>,
}

impl<'c, C: Connection + ?Sized> TabletCursor<'c, C> {
    pub fn new(connection: &'c C) -> Self {
        Self {
            base: BaseCursor::new(connection),
        }
    }

    /// Execute a statement, returning its row count.
    ///
    /// `begin`, `commit` and `rollback` return `None`.
    pub fn execute(&mut self, statement: &str, params: impl Into<Params>) -> Result<Option<u64>> {
        self.base
            .dispatch(statement, &params.into(), &RoutingHints::none())
    }
}

deref_base!(TabletCursor);
