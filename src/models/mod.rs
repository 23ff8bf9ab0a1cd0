//! Domain entities that mirror the SQLite schema and get passed across the
//! library boundary. These types stay pure value objects: every read from the
//! store produces a fresh, disconnected copy, and nothing here performs I/O.

mod book;
mod session;
mod status;

pub use book::Book;
pub use session::ReadingSession;
pub use status::ReadingStatus;
