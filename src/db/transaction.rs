//! Transaction delimiters. A sequence of writes between `begin_transaction`
//! and `commit` is one atomic unit; `rollback` discards it. Only one
//! transaction may be open on the connection at a time, and nesting is
//! rejected up front instead of being handed to the engine.

use log::debug;

use crate::error::{Error, Result};

use super::connection::Database;

impl Database {
    /// Start a transaction. Fails with a precondition error when one is
    /// already open; SQLite transactions do not nest.
    pub fn begin_transaction(&mut self) -> Result<()> {
        let conn = self.conn()?;
        if self.in_transaction {
            return Err(Error::precondition("a transaction is already open"));
        }
        conn.execute_batch("BEGIN TRANSACTION")?;
        self.in_transaction = true;
        debug!("transaction started");
        Ok(())
    }

    /// Make every write since the matching begin durable. If the engine
    /// rejects the commit the transaction flag is left untouched; callers
    /// must treat that as fatal for the current unit of work.
    pub fn commit(&mut self) -> Result<()> {
        let conn = self.conn()?;
        if !self.in_transaction {
            return Err(Error::precondition("no transaction is open"));
        }
        conn.execute_batch("COMMIT")?;
        self.in_transaction = false;
        debug!("transaction committed");
        Ok(())
    }

    /// Discard every write since the matching begin. Same failure contract
    /// as [`Database::commit`].
    pub fn rollback(&mut self) -> Result<()> {
        let conn = self.conn()?;
        if !self.in_transaction {
            return Err(Error::precondition("no transaction is open"));
        }
        conn.execute_batch("ROLLBACK")?;
        self.in_transaction = false;
        debug!("transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_begin_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        db.begin_transaction().unwrap();
        assert!(matches!(
            db.begin_transaction(),
            Err(Error::PreconditionFailed(_))
        ));
        db.rollback().unwrap();
    }

    #[test]
    fn commit_and_rollback_require_an_open_transaction() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(matches!(db.commit(), Err(Error::PreconditionFailed(_))));
        assert!(matches!(db.rollback(), Err(Error::PreconditionFailed(_))));
    }

    #[test]
    fn begin_after_commit_works_again() {
        let mut db = Database::open_in_memory().unwrap();
        db.begin_transaction().unwrap();
        db.commit().unwrap();
        db.begin_transaction().unwrap();
        db.rollback().unwrap();
    }

    #[test]
    fn transactions_on_a_closed_store_fail_fast() {
        let mut db = Database::open_in_memory().unwrap();
        db.close();
        assert!(matches!(
            db.begin_transaction(),
            Err(Error::PreconditionFailed(_))
        ));
    }
}
