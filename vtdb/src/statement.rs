//! Statement classification

/// What a statement asks the cursor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Open a transaction on the connection
    Begin,
    /// Commit the open transaction
    Commit,
    /// Roll back the open transaction
    Rollback,
    /// Anything else; forwarded to the connection as-is
    Query,
}

impl StatementKind {
    /// Classify a statement.
    ///
    /// Only the bare words `begin`, `commit` and `rollback` (any case,
    /// surrounding whitespace ignored) are transaction control. `BEGIN WORK`
    /// or `COMMIT;` are ordinary queries.
    pub fn classify(sql: &str) -> Self {
        let word = sql.trim();
        if word.eq_ignore_ascii_case("begin") {
            StatementKind::Begin
        } else if word.eq_ignore_ascii_case("commit") {
            StatementKind::Commit
        } else if word.eq_ignore_ascii_case("rollback") {
            StatementKind::Rollback
        } else {
            StatementKind::Query
        }
    }

    pub fn is_transaction_control(self) -> bool {
        !matches!(self, StatementKind::Query)
    }
}
