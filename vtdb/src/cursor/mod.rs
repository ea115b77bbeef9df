//! DB-API style cursors.
//!
//! Every cursor variant wraps a [`BaseCursor`], which owns the result buffer
//! of the most recent statement and borrows the connection it dispatches
//! through. The variants differ only in how `execute` routes a statement:
//!
//! - [`TabletCursor`]: single unsharded tablet, never sends routing hints
//! - [`RoutedCursor`]: sharded backend, routing hints per statement
//! - [`KeyedCursor`]: sharded backend, routing hints fixed at construction
//! - [`BatchCursor`]: queues statements and sends them in one round-trip
//!
//! Fetching, iteration and the buffer accessors are shared through `Deref`
//! to the base cursor.
//!
//! # Example
//!
//! ```ignore
//! use vtdb::{Params, TabletCursor};
//!
//! let mut cursor = TabletCursor::new(&conn);
//! cursor.execute("select id, name from users where id = %(id)s", Params::named([("id", 7)]))?;
//! while let Some(row) = cursor.fetch_one()? {
//!     let name: String = row.get(1)?;
//! }
//! ```

mod batch;
mod keyed;
mod routed;
mod tablet;

use tracing::debug;

use crate::connection::{Connection, QueryResult};
use crate::error::{Error, Result};
use crate::params::Params;
use crate::routing::RoutingHints;
use crate::row::{Field, Row};
use crate::statement::StatementKind;

pub use batch::{BatchCursor, BatchQueryItem};
pub use keyed::KeyedCursor;
pub use routed::RoutedCursor;
pub use tablet::TabletCursor;

/// Default number of rows returned by [`BaseCursor::fetch_many`].
pub const DEFAULT_ARRAYSIZE: usize = 1;

/// Materialized result of the most recent statement.
///
/// `rows` is `None` until a non-transaction statement succeeds; the read
/// index never exceeds the number of rows.
#[derive(Debug, Default)]
struct ResultBuffer {
    rows: Option<Vec<Row>>,
    row_count: u64,
    last_insert_id: Option<u64>,
    description: Option<Vec<Field>>,
    index: usize,
}

impl ResultBuffer {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn load(&mut self, result: QueryResult) {
        self.rows = Some(result.rows);
        self.row_count = result.row_count;
        self.last_insert_id = result.last_insert_id;
        self.description = result.description;
        self.index = 0;
    }

    fn rows(&self) -> Result<&[Row]> {
        self.rows
            .as_deref()
            .ok_or_else(|| Error::Programming("fetch called before execute".to_string()))
    }

    fn fetch_one(&mut self) -> Result<Option<Row>> {
        let row = self.rows()?.get(self.index).cloned();
        if row.is_some() {
            self.index += 1;
        }
        Ok(row)
    }

    fn fetch_many(&mut self, size: usize) -> Result<Vec<Row>> {
        let rows = self.rows()?;
        let start = self.index.min(rows.len());
        let end = start.saturating_add(size).min(rows.len());
        let chunk = rows[start..end].to_vec();
        self.index = end;
        Ok(chunk)
    }

    fn remaining(&self) -> Result<usize> {
        Ok(self.rows()?.len().saturating_sub(self.index))
    }
}

/// State and behavior shared by every cursor variant.
pub struct BaseCursor<'c, C: ?Sized> {
    connection: Option<&'c C>,
    buffer: ResultBuffer,
    arraysize: usize,
}

impl<'c, C: Connection + ?Sized> BaseCursor<'c, C> {
    pub fn new(connection: &'c C) -> Self {
        Self {
            connection: Some(connection),
            buffer: ResultBuffer::default(),
            arraysize: DEFAULT_ARRAYSIZE,
        }
    }

    /// Release the connection and the buffered rows.
    ///
    /// Afterwards fetches fail as they would on a fresh cursor and execute
    /// fails with [`Error::Programming`]. Closing twice is harmless.
    pub fn close(&mut self) {
        self.connection = None;
        self.buffer.reset();
    }

    pub fn is_closed(&self) -> bool {
        self.connection.is_none()
    }

    fn connection(&self) -> Result<&'c C> {
        self.connection
            .ok_or_else(|| Error::Programming("cursor is closed".to_string()))
    }

    /// Run one statement and buffer its result.
    ///
    /// Transaction control words go to the matching connection method and
    /// return `None`; the buffer stays empty. Anything else is forwarded with
    /// its routing hints and returns the row count.
    pub(crate) fn dispatch(
        &mut self,
        statement: &str,
        params: &Params,
        routing: &RoutingHints,
    ) -> Result<Option<u64>> {
        self.buffer.reset();
        let connection = self.connection()?;

        let kind = StatementKind::classify(statement);
        match kind {
            StatementKind::Begin => connection.begin()?,
            StatementKind::Commit => connection.commit()?,
            StatementKind::Rollback => connection.rollback()?,
            StatementKind::Query => {
                let result = connection.execute(statement, params, routing)?;
                let row_count = result.row_count;
                self.buffer.load(result);
                debug!(row_count, "statement executed");
                return Ok(Some(row_count));
            }
        }
        debug!(?kind, "transaction control");
        Ok(None)
    }

    /// Next row, or `None` once the buffer is drained.
    pub fn fetch_one(&mut self) -> Result<Option<Row>> {
        self.buffer.fetch_one()
    }

    /// Up to `size` rows, defaulting to [`arraysize`](Self::arraysize).
    pub fn fetch_many(&mut self, size: Option<usize>) -> Result<Vec<Row>> {
        let size = size.unwrap_or(self.arraysize);
        self.buffer.fetch_many(size)
    }

    /// All remaining rows.
    pub fn fetch_all(&mut self) -> Result<Vec<Row>> {
        let remaining = self.buffer.remaining()?;
        self.buffer.fetch_many(remaining)
    }

    /// Iterate the remaining rows.
    ///
    /// Stops when [`fetch_one`](Self::fetch_one) would return `None`. An
    /// error is yielded once and ends the iteration.
    pub fn rows(&mut self) -> Rows<'_, 'c, C> {
        Rows {
            cursor: self,
            done: false,
        }
    }

    pub fn call_proc(&mut self, _name: &str, _params: impl Into<Params>) -> Result<()> {
        Err(Error::NotSupported("callproc".to_string()))
    }

    pub fn execute_many(&mut self, _statement: &str, _params: Vec<Params>) -> Result<u64> {
        Err(Error::NotSupported("executemany".to_string()))
    }

    pub fn next_set(&mut self) -> Result<bool> {
        Err(Error::NotSupported("nextset".to_string()))
    }

    /// Accepted and ignored.
    pub fn set_input_sizes(&mut self, _sizes: &[usize]) {}

    /// Accepted and ignored.
    pub fn set_output_size(&mut self, _size: usize, _column: Option<usize>) {}

    /// Position of the next row to be fetched.
    pub fn row_number(&self) -> usize {
        self.buffer.index
    }

    pub fn arraysize(&self) -> usize {
        self.arraysize
    }

    pub fn set_arraysize(&mut self, arraysize: usize) {
        self.arraysize = arraysize;
    }

    pub fn row_count(&self) -> u64 {
        self.buffer.row_count
    }

    pub fn last_insert_id(&self) -> Option<u64> {
        self.buffer.last_insert_id
    }

    pub fn description(&self) -> Option<&[Field]> {
        self.buffer.description.as_deref()
    }

    /// Position of the column called `name` in the description.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.description()
            .and_then(|fields| fields.iter().position(|f| f.name == name))
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }
}

/// Iterator over the rows left in a cursor's buffer.
pub struct Rows<'a, 'c, C: ?Sized> {
    cursor: &'a mut BaseCursor<'c, C>,
    done: bool,
}

impl<C: Connection + ?Sized> Iterator for Rows<'_, '_, C> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.cursor.fetch_one() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<C: Connection + ?Sized> std::iter::FusedIterator for Rows<'_, '_, C> {}

/// Implements `Deref`/`DerefMut` to the wrapped [`BaseCursor`].
macro_rules! deref_base {
    ($cursor:ident) => {
        impl<'c, C: ?Sized> std::ops::Deref for $cursor<'c, C> {
            type Target = $crate::cursor::BaseCursor<'c, C>;

            fn deref(&self) -> &Self::Target {
                &self.base
            }
        }

        impl<'c, C: ?Sized> std::ops::DerefMut for $cursor<'c, C> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.base
            }
        }
    };
}

pub(crate) use deref_base;
