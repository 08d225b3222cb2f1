//! Transaction helper shared by every store operation.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{Result, StoreError};

/// Run `f` inside a transaction.
///
/// Commits when `f` succeeds and rolls back when it fails. A failed rollback
/// is reported together with the error that triggered it. If commit itself
/// fails, dropping the transaction rolls it back, so no path leaves a
/// transaction open on the connection.
pub(crate) fn transaction<T, F>(
    conn: &mut Connection,
    behavior: TransactionBehavior,
    f: F,
) -> Result<T>
where
    F: FnOnce(&Transaction<'_>) -> Result<T>,
{
    let tx = conn.transaction_with_behavior(behavior)?;

    match f(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => match tx.rollback() {
            Ok(()) => Err(err),
            Err(rollback) => {
                tracing::warn!(error = %err, rollback = %rollback, "transaction rollback failed");
                Err(StoreError::Rollback {
                    source: Box::new(err),
                    rollback,
                })
            }
        },
    }
}
