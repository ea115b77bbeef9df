use tracing::debug;

use crate::connection::Connection;
use crate::error::Result;
use crate::params::Params;
use crate::routing::RoutingHints;
use crate::value::Value;

use super::{deref_base, BaseCursor};

/// One statement queued on a [`BatchCursor`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchQueryItem {
    statement: String,
    params: Params,
    routing: RoutingHints,
}

impl BatchQueryItem {
    fn new(statement: String, params: Params, routing: RoutingHints) -> Self {
        Self {
            statement,
            params,
            routing,
        }
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn routing(&self) -> &RoutingHints {
        &self.routing
    }

    pub fn key(&self) -> Option<&Value> {
        self.routing.key.as_ref()
    }

    pub fn keys(&self) -> Option<&[Value]> {
        self.routing.keys.as_deref()
    }

    pub fn into_parts(self) -> (String, Params, RoutingHints) {
        (self.statement, self.params, self.routing)
    }
}

/// Cursor that defers execution until [`flush`](Self::flush).
///
/// `execute` only queues; nothing reaches the connection and no rows are
/// buffered until the whole queue is sent as one batch. Fetching between
/// queueing and flushing fails as it does before any execute.
pub struct BatchCursor<'c, C: ?Sized> {
    base: BaseCursor<'c, C>,
    queue: Vec<BatchQueryItem>,
}

impl<'c, C: Connection + ?Sized> BatchCursor<'c, C> {
    pub fn new(connection: &'c C) -> Self {
        Self {
            base: BaseCursor::new(connection),
            queue: Vec::new(),
        }
    }

    /// Queue a statement.
    pub fn execute(
        &mut self,
        statement: impl Into<String>,
        params: impl Into<Params>,
        routing: RoutingHints,
    ) -> Result<()> {
        self.base.connection()?;
        self.queue.push(BatchQueryItem::new(
            statement.into(),
            params.into(),
            routing,
        ));
        Ok(())
    }

    /// Statements queued since the last flush, in submission order.
    pub fn pending(&self) -> &[BatchQueryItem] {
        &self.queue
    }

    /// Send every queued statement to the connection in one call.
    ///
    /// The queue is emptied whether or not the batch succeeds. On success the
    /// aggregate row count is stored and returned; on failure the row count
    /// stays 0.
    pub fn flush(&mut self) -> Result<u64> {
        let items = std::mem::take(&mut self.queue);
        self.base.buffer.reset();
        let connection = self.base.connection()?;

        debug!(items = items.len(), "flushing batch");
        let row_count = connection.execute_batch(items)?;
        self.base.buffer.row_count = row_count;
        Ok(row_count)
    }

    /// Close the cursor, discarding anything still queued.
    pub fn close(&mut self) {
        self.queue.clear();
        self.base.close();
    }
}

deref_base!(BatchCursor);
