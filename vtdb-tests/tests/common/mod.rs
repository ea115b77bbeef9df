//! Shared helpers for vtdb integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Once;

use tracing_subscriber::EnvFilter;
use vtdb::{
    BatchQueryItem, Connection, Error, Field, Params, QueryResult, Result, Row, RoutingHints,
    Value,
};

/// Everything a cursor asked of the connection, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Execute {
        statement: String,
        params: Params,
        routing: RoutingHints,
    },
    Batch(Vec<BatchQueryItem>),
    Begin,
    Commit,
    Rollback,
    ReloadTopology,
}

/// In-memory connection that records calls and replays scripted responses.
///
/// Unscripted executes return an empty result; unscripted batches return 0.
#[derive(Default)]
pub struct MockConnection {
    calls: RefCell<Vec<Call>>,
    results: RefCell<VecDeque<Result<QueryResult>>>,
    batch_results: RefCell<VecDeque<Result<u64>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, result: QueryResult) {
        self.results.borrow_mut().push_back(Ok(result));
    }

    pub fn fail(&self, err: Error) {
        self.results.borrow_mut().push_back(Err(err));
    }

    pub fn respond_batch(&self, result: Result<u64>) {
        self.batch_results.borrow_mut().push_back(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn reload_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::ReloadTopology))
            .count()
    }
}

impl Connection for MockConnection {
    fn execute(
        &self,
        statement: &str,
        params: &Params,
        routing: &RoutingHints,
    ) -> Result<QueryResult> {
        self.calls.borrow_mut().push(Call::Execute {
            statement: statement.to_string(),
            params: params.clone(),
            routing: routing.clone(),
        });
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResult::default()))
    }

    fn execute_batch(&self, items: Vec<BatchQueryItem>) -> Result<u64> {
        self.calls.borrow_mut().push(Call::Batch(items));
        self.batch_results.borrow_mut().pop_front().unwrap_or(Ok(0))
    }

    fn begin(&self) -> Result<()> {
        self.calls.borrow_mut().push(Call::Begin);
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.calls.borrow_mut().push(Call::Commit);
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        self.calls.borrow_mut().push(Call::Rollback);
        Ok(())
    }

    fn reload_topology(&self) -> Result<()> {
        self.calls.borrow_mut().push(Call::ReloadTopology);
        Ok(())
    }
}

/// The `i`-th row of a [`rows`] result.
pub fn row(i: i64) -> Row {
    Row::new(vec![Value::Int(i), Value::String(format!("row{i}"))])
}

/// A two-column result set of `n` rows.
pub fn rows(n: i64) -> QueryResult {
    QueryResult {
        rows: (0..n).map(row).collect(),
        row_count: n as u64,
        last_insert_id: None,
        description: Some(vec![Field::new("id", "INT64"), Field::new("name", "VARCHAR")]),
    }
}

/// Install a test subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
