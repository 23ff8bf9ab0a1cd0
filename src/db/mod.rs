//! Persistence layer split across logical submodules: connection lifecycle
//! and schema live in `connection`, book CRUD and search in `books`, and the
//! transaction delimiters in `transaction`. All of them hang methods off the
//! single [`Database`] type, which is the sole owner of the SQLite handle.

mod books;
mod connection;
mod transaction;

pub use connection::Database;
