//! Book CRUD and free-text search, plus the row-to-entity mapping both
//! directions share. Every statement uses parameter binding; user text never
//! gets spliced into SQL.

use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::models::{Book, ReadingStatus};

use super::connection::Database;

/// The 17 columns in storage order. Kept as one constant so the INSERT,
/// SELECT, and UPDATE statements can never drift apart.
const BOOK_COLUMNS: &str = "id, title, author, isbn, page_count, current_page,
    start_date, completion_date, genre, publisher, year_published,
    notes, review, rating, cover_path, date_added, status";

const INSERT_BOOK: &str = "
    INSERT INTO books (
        title, author, isbn, page_count, current_page,
        start_date, completion_date, genre, publisher, year_published,
        notes, review, rating, cover_path, date_added, status
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";

const UPDATE_BOOK: &str = "
    UPDATE books
    SET title = ?1, author = ?2, isbn = ?3, page_count = ?4,
        current_page = ?5, start_date = ?6, completion_date = ?7,
        genre = ?8, publisher = ?9, year_published = ?10,
        notes = ?11, review = ?12, rating = ?13, cover_path = ?14,
        date_added = ?15, status = ?16
    WHERE id = ?17";

impl Database {
    /// Insert a new book and write the engine-assigned id back into the
    /// entity. If the insert fails the entity keeps its id of 0, so a retry
    /// later still looks like a fresh insert.
    pub fn add_book(&self, book: &mut Book) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            INSERT_BOOK,
            params![
                book.title,
                book.author,
                book.isbn,
                book.page_count,
                book.current_page,
                book.start_date.map(|d| d.timestamp()),
                book.completion_date.map(|d| d.timestamp()),
                book.genre,
                book.publisher,
                book.year_published,
                book.notes,
                book.review,
                book.rating,
                book.cover_path,
                book.date_added.timestamp(),
                book.status.code(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        book.id = id;
        debug!("added book '{}' (id {id})", book.title);
        Ok(id)
    }

    /// Look up one book by id. A missing row is `None`, never an error.
    pub fn get_book(&self, id: i64) -> Result<Option<Book>> {
        let conn = self.conn()?;
        let book = conn
            .query_row(
                &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
                params![id],
                book_from_row,
            )
            .optional()?;
        Ok(book)
    }

    /// Every book in the library, ordered by ascending id. Ids are assigned
    /// monotonically, so this is insertion order. An empty library yields an
    /// empty vector.
    pub fn get_all_books(&self) -> Result<Vec<Book>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))?;
        let books = stmt
            .query_map([], book_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!("retrieved {} books", books.len());
        Ok(books)
    }

    /// Case-insensitive substring search across title and author, ordered by
    /// title. An empty query returns no results rather than the whole
    /// library; callers wanting everything use [`Database::get_all_books`].
    /// LIKE wildcards (`%`, `_`) in the query are passed through unescaped.
    pub fn search_books(&self, query: &str) -> Result<Vec<Book>> {
        let conn = self.conn()?;
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT {BOOK_COLUMNS} FROM books
             WHERE LOWER(title) LIKE LOWER(?1) OR LOWER(author) LIKE LOWER(?1)
             ORDER BY title"
        ))?;
        let pattern = format!("%{query}%");
        let books = stmt
            .query_map(params![pattern], book_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!("search for '{query}' found {} books", books.len());
        Ok(books)
    }

    /// Overwrite every column of the row matching the book's id. Returns
    /// `true` when a row was changed and `false` when no row has that id;
    /// calling this with an unsaved book (id <= 0) is a caller bug and is
    /// rejected before touching storage.
    pub fn update_book(&self, book: &Book) -> Result<bool> {
        if book.id <= 0 {
            return Err(Error::invalid_argument(
                "id",
                "cannot update a book that has not been saved",
            ));
        }
        let conn = self.conn()?;

        let updated = conn.execute(
            UPDATE_BOOK,
            params![
                book.title,
                book.author,
                book.isbn,
                book.page_count,
                book.current_page,
                book.start_date.map(|d| d.timestamp()),
                book.completion_date.map(|d| d.timestamp()),
                book.genre,
                book.publisher,
                book.year_published,
                book.notes,
                book.review,
                book.rating,
                book.cover_path,
                book.date_added.timestamp(),
                book.status.code(),
                book.id,
            ],
        )?;

        debug!("update of book id {} touched {updated} row(s)", book.id);
        Ok(updated > 0)
    }

    /// Remove the row with this id. Returns `true` when a row was removed;
    /// deleting an id that never existed (or was already deleted) is `false`,
    /// not an error. The removal is permanent and cascades to the book's
    /// reading sessions.
    pub fn delete_book(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
        debug!("delete of book id {id} removed {deleted} row(s)");
        Ok(deleted > 0)
    }
}

/// Hydrate a `Book` from one result row, positionally. Nullable text columns
/// decode to empty strings and nullable date columns to `None`; the stored
/// status code goes through the defensive `from_code` mapping. This bypasses
/// the entity's setters on purpose: hydration must not re-trigger their
/// date-stamping side effects.
fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        author: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        isbn: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        page_count: row.get(4)?,
        current_page: row.get(5)?,
        start_date: row.get::<_, Option<i64>>(6)?.and_then(datetime_from_secs),
        completion_date: row.get::<_, Option<i64>>(7)?.and_then(datetime_from_secs),
        genre: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        publisher: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        year_published: row.get::<_, Option<i32>>(10)?.unwrap_or(0),
        notes: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
        review: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
        rating: row.get::<_, Option<i32>>(13)?.unwrap_or(0),
        cover_path: row.get::<_, Option<String>>(14)?.unwrap_or_default(),
        date_added: datetime_from_secs(row.get(15)?).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        status: ReadingStatus::from_code(row.get::<_, Option<i64>>(16)?.unwrap_or(0)),
    })
}

/// Unix seconds to a UTC timestamp; out-of-range values decode as absent.
fn datetime_from_secs(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Insert a minimal raw row so mapping can be tested against values the
    /// entity setters would never produce.
    fn insert_raw(db: &Database, status: i64) -> i64 {
        let conn = db.conn().unwrap();
        conn.execute(
            "INSERT INTO books (title, author, date_added, status)
             VALUES ('Raw', 'Row', 0, ?1)",
            params![status],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn null_text_columns_decode_to_empty_strings() {
        let db = Database::open_in_memory().unwrap();
        let id = insert_raw(&db, 0);

        let book = db.get_book(id).unwrap().unwrap();
        assert_eq!(book.isbn(), "");
        assert_eq!(book.genre(), "");
        assert_eq!(book.publisher(), "");
        assert_eq!(book.notes(), "");
        assert_eq!(book.review(), "");
        assert_eq!(book.cover_path(), "");
        assert_eq!(book.year_published(), 0);
    }

    #[test]
    fn null_dates_decode_to_absent_not_a_sentinel() {
        let db = Database::open_in_memory().unwrap();
        let id = insert_raw(&db, 0);

        let book = db.get_book(id).unwrap().unwrap();
        assert!(book.start_date().is_none());
        assert!(book.completion_date().is_none());
    }

    #[test]
    fn out_of_range_stored_status_decodes_to_to_read() {
        let db = Database::open_in_memory().unwrap();
        let id = insert_raw(&db, 42);

        let book = db.get_book(id).unwrap().unwrap();
        assert_eq!(book.status(), ReadingStatus::ToRead);
    }

    #[test]
    fn deleting_a_book_cascades_to_its_sessions() {
        let db = Database::open_in_memory().unwrap();
        let id = insert_raw(&db, 0);

        let conn = db.conn().unwrap();
        conn.execute(
            "INSERT INTO reading_sessions
                (book_id, session_date, duration_minutes, pages_read, start_page, end_page)
             VALUES (?1, 0, 30, 20, 0, 20)",
            params![id],
        )
        .unwrap();

        assert!(db.delete_book(id).unwrap());
        let sessions: i64 = db
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM reading_sessions", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(sessions, 0);
    }

    #[test]
    fn update_with_unsaved_id_is_rejected_before_io() {
        let db = Database::open_in_memory().unwrap();
        let book = Book::new("Unsaved", "Nobody").unwrap();
        assert!(matches!(
            db.update_book(&book),
            Err(Error::InvalidArgument { field: "id", .. })
        ));
    }
}
