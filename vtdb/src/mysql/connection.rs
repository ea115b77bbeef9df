//! Blocking MySQL connection to a single tablet

use std::time::Duration;

use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, OptsBuilder, Params as MySqlParams, Row as MySqlAsyncRow};
use tokio::runtime::Runtime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::types::{from_mysql_row, to_field, to_mysql_params};
use crate::config::ConnectionSettings;
use crate::connection::{Connection, QueryResult};
use crate::cursor::{BatchQueryItem, TabletCursor};
use crate::error::{Error, Result};
use crate::params::{rewrite_pyformat, Params};
use crate::routing::RoutingHints;

/// A connection to one MySQL-speaking tablet.
///
/// The driver is asynchronous; each call is driven to completion on a
/// private current-thread runtime, so this type must not be used from
/// inside another tokio runtime.
///
/// Statements may use `%(name)s` bind variables with [`Params::Named`];
/// they are rewritten to the driver's `:name` form. Routing hints are
/// ignored.
///
/// # Example
///
/// ```ignore
/// use vtdb::{ConnectionSettings, MySqlConnection};
///
/// let conn = MySqlConnection::connect(&ConnectionSettings::load(None)?)?;
/// let mut cursor = conn.cursor();
/// cursor.execute("begin", ())?;
/// cursor.execute("insert into t (name) values (%(name)s)", Params::named([("name", "a")]))?;
/// cursor.execute("commit", ())?;
/// ```
pub struct MySqlConnection {
    // We use Mutex because the driver needs `&mut Conn`, but cursors share
    // `&MySqlConnection`.
    session: Mutex<Session>,
    runtime: Runtime,
    opts: Opts,
    connect_timeout: Duration,
    arraysize: usize,
}

struct Session {
    conn: Option<Conn>,
    in_transaction: bool,
}

impl Session {
    fn conn(&mut self) -> Result<&mut Conn> {
        self.conn
            .as_mut()
            .ok_or_else(|| Error::Operational("connection is closed".to_string()))
    }
}

impl MySqlConnection {
    /// Dial the tablet described by `settings`.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self> {
        settings.validate()?;

        let opts = Opts::from_url(&settings.url).map_err(|e| Error::Config(e.to_string()))?;
        let mut builder = OptsBuilder::from_opts(opts);
        if let Some(dbname) = &settings.dbname {
            builder = builder.db_name(Some(dbname.clone()));
        }
        let opts = Opts::from(builder);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Operational(format!("failed to start runtime: {e}")))?;

        let connect_timeout = settings.connect_timeout();
        let conn = runtime.block_on(dial(&opts, connect_timeout))?;
        info!(
            host = opts.ip_or_hostname(),
            port = opts.tcp_port(),
            db = opts.db_name(),
            "connected to tablet"
        );

        Ok(Self {
            session: Mutex::new(Session {
                conn: Some(conn),
                in_transaction: false,
            }),
            runtime,
            opts,
            connect_timeout,
            arraysize: settings.arraysize,
        })
    }

    /// Connect with default settings to the given URL.
    pub fn from_url(url: &str) -> Result<Self> {
        Self::connect(&ConnectionSettings::with_url(url))
    }

    /// A cursor over this connection using the configured arraysize.
    pub fn cursor(&self) -> TabletCursor<'_, Self> {
        let mut cursor = TabletCursor::new(self);
        cursor.set_arraysize(self.arraysize);
        cursor
    }

    pub fn in_transaction(&self) -> bool {
        self.session.blocking_lock().in_transaction
    }

    /// Roll back any open transaction and disconnect.
    ///
    /// Later statements fail with [`Error::Operational`].
    pub fn close(&self) -> Result<()> {
        let rollback = self.rollback();
        let conn = self.session.blocking_lock().conn.take();
        if let Some(conn) = conn {
            self.runtime.block_on(conn.disconnect())?;
            debug!("disconnected from tablet");
        }
        rollback
    }

    fn finish_transaction(&self, statement: &'static str) -> Result<()> {
        let mut session = self.session.blocking_lock();
        if !session.in_transaction {
            return Ok(());
        }
        // Cleared before the round-trip: whatever the server says, no more
        // statements belong to this transaction.
        session.in_transaction = false;
        let conn = session.conn()?;
        self.runtime.block_on(conn.query_drop(statement))?;
        debug!(statement, "transaction finished");
        Ok(())
    }
}

async fn dial(opts: &Opts, timeout: Duration) -> Result<Conn> {
    match tokio::time::timeout(timeout, Conn::new(opts.clone())).await {
        Ok(conn) => Ok(conn?),
        Err(_) => Err(Error::Transport(format!(
            "connect to {}:{} timed out after {}s",
            opts.ip_or_hostname(),
            opts.tcp_port(),
            timeout.as_secs()
        ))),
    }
}

async fn run_statement(conn: &mut Conn, statement: &str, params: &Params) -> Result<QueryResult> {
    let (sql, params) = rewrite_pyformat(statement, params)?;
    let mysql_params: MySqlParams = to_mysql_params(&params);

    let result = conn.exec_iter(sql.as_str(), mysql_params).await?;
    let columns = result.columns_ref();
    let description = if columns.is_empty() {
        None
    } else {
        Some(columns.iter().map(to_field).collect::<Vec<_>>())
    };
    let raw_rows: Vec<MySqlAsyncRow> = result.collect_and_drop().await?;

    let rows = raw_rows
        .into_iter()
        .map(from_mysql_row)
        .collect::<Result<Vec<_>>>()?;

    // Result sets report the rows returned; everything else what it touched.
    let row_count = match description {
        Some(_) => rows.len() as u64,
        None => conn.affected_rows(),
    };

    Ok(QueryResult {
        rows,
        row_count,
        last_insert_id: conn.last_insert_id(),
        description,
    })
}

impl Connection for MySqlConnection {
    fn execute(
        &self,
        statement: &str,
        params: &Params,
        _routing: &RoutingHints,
    ) -> Result<QueryResult> {
        let mut session = self.session.blocking_lock();
        let conn = session.conn()?;
        self.runtime
            .block_on(run_statement(conn, statement, params))
    }

    fn execute_batch(&self, items: Vec<BatchQueryItem>) -> Result<u64> {
        let mut session = self.session.blocking_lock();
        let conn = session.conn()?;
        self.runtime.block_on(async {
            let mut total = 0;
            for item in &items {
                total += run_statement(conn, item.statement(), item.params())
                    .await?
                    .row_count;
            }
            Ok::<_, Error>(total)
        })
    }

    fn begin(&self) -> Result<()> {
        let mut session = self.session.blocking_lock();
        if session.in_transaction {
            return Err(Error::NotSupported(
                "nested transactions not supported".to_string(),
            ));
        }
        let conn = session.conn()?;
        self.runtime.block_on(conn.query_drop("BEGIN"))?;
        session.in_transaction = true;
        debug!("transaction opened");
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.finish_transaction("COMMIT")
    }

    fn rollback(&self) -> Result<()> {
        self.finish_transaction("ROLLBACK")
    }

    /// Re-dial the tablet, abandoning any open transaction.
    fn reload_topology(&self) -> Result<()> {
        let conn = self
            .runtime
            .block_on(dial(&self.opts, self.connect_timeout))?;
        let mut session = self.session.blocking_lock();
        session.in_transaction = false;
        if let Some(old) = session.conn.replace(conn) {
            if let Err(e) = self.runtime.block_on(old.disconnect()) {
                warn!(error = %e, "failed to disconnect previous session");
            }
        }
        info!(host = self.opts.ip_or_hostname(), "re-dialed tablet");
        Ok(())
    }
}

impl Drop for MySqlConnection {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "error closing tablet connection");
        }
    }
}
