//! Persistence core for a personal book-tracking application.
//!
//! The crate maps one rich entity ([`Book`]) onto rows in an embedded SQLite
//! file and exposes CRUD, free-text search, and transactional grouping of
//! writes through the [`Database`] store. Interactive layers (windows,
//! dialogs, theming) live outside this crate entirely: they call the public
//! operations here and get plain value objects back, never a live handle
//! into storage.
//!
//! ```no_run
//! use reading_tracker::{Book, Database};
//!
//! # fn main() -> reading_tracker::Result<()> {
//! let db = Database::open_default()?;
//! let mut book = Book::with_details("The Hobbit", "J.R.R. Tolkien", "", 310)?;
//! db.add_book(&mut book)?;
//!
//! for found in db.search_books("tolkien")? {
//!     println!("{found}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod error;
pub mod models;

/// The store that owns the SQLite connection and all of its operations.
pub use db::Database;

/// Crate-wide failure taxonomy and result alias.
pub use error::{Error, Result};

/// The domain entities callers construct and receive.
pub use models::{Book, ReadingSession, ReadingStatus};
