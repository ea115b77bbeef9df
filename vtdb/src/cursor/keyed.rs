use crate::connection::Connection;
use crate::error::Result;
use crate::params::Params;
use crate::routing::RoutingHints;

use super::{deref_base, BaseCursor};

/// Cursor pinned to fixed routing hints.
///
/// Every statement goes to the shard(s) chosen at construction; callers
/// cannot override the hints per statement.
pub struct KeyedCursor<'c, C: ?Sized> {
    base: BaseCursor<'c, C>,
    routing: RoutingHints,
}

impl<'c, C: Connection + ?Sized> KeyedCursor<'c, C> {
    pub fn new(connection: &'c C, routing: RoutingHints) -> Self {
        Self {
            base: BaseCursor::new(connection),
            routing,
        }
    }

    pub fn routing(&self) -> &RoutingHints {
        &self.routing
    }

    pub fn execute(&mut self, statement: &str, params: impl Into<Params>) -> Result<Option<u64>> {
        self.base.dispatch(statement, &params.into(), &self.routing)
    }
}

deref_base!(KeyedCursor);
