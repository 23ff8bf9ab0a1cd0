//! The Book entity. All invariants are enforced right here at construction
//! and mutation time so the persistence layer can assume every `Book` it is
//! handed is internally consistent. The struct holds no connection or id
//! back-reference beyond the plain integer key the store assigns.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::models::ReadingStatus;

/// A book in the user's collection, combining catalogue metadata with
/// reading progress. Identity (`id`) is 0 until the store persists the
/// entity; afterwards it addresses exactly one row.
#[derive(Debug, Clone)]
pub struct Book {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) author: String,
    /// Either empty (unknown) or exactly 13 characters.
    pub(crate) isbn: String,
    pub(crate) page_count: i32,
    pub(crate) current_page: i32,
    pub(crate) start_date: Option<DateTime<Utc>>,
    pub(crate) completion_date: Option<DateTime<Utc>>,
    pub(crate) genre: String,
    pub(crate) publisher: String,
    /// 0 means unknown; otherwise 1..=9999.
    pub(crate) year_published: i32,
    pub(crate) notes: String,
    pub(crate) review: String,
    /// 0 means unrated; otherwise 1..=5 stars.
    pub(crate) rating: i32,
    pub(crate) cover_path: String,
    pub(crate) date_added: DateTime<Utc>,
    pub(crate) status: ReadingStatus,
}

impl Book {
    /// Create a book from the two required fields. Everything else starts at
    /// its default and can be filled in through the setters.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let author = author.into();
        validate_title(&title)?;
        validate_author(&author)?;

        Ok(Self {
            id: 0,
            title,
            author,
            isbn: String::new(),
            page_count: 0,
            current_page: 0,
            start_date: None,
            completion_date: None,
            genre: String::new(),
            publisher: String::new(),
            year_published: 0,
            notes: String::new(),
            review: String::new(),
            rating: 0,
            cover_path: String::new(),
            date_added: Utc::now(),
            status: ReadingStatus::ToRead,
        })
    }

    /// Create a book with the data a caller usually has up front: title,
    /// author, and optionally an ISBN and page count.
    pub fn with_details(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        page_count: i32,
    ) -> Result<Self> {
        let mut book = Self::new(title, author)?;
        book.set_isbn(isbn)?;
        book.set_page_count(page_count)?;
        Ok(book)
    }

    // ---- getters ----

    /// Row id assigned by the store; 0 while the book is unsaved.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn page_count(&self) -> i32 {
        self.page_count
    }

    pub fn current_page(&self) -> i32 {
        self.current_page
    }

    /// When reading started, if it has.
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// When reading finished, if it has.
    pub fn completion_date(&self) -> Option<DateTime<Utc>> {
        self.completion_date
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn year_published(&self) -> i32 {
        self.year_published
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn review(&self) -> &str {
        &self.review
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn cover_path(&self) -> &str {
        &self.cover_path
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    pub fn status(&self) -> ReadingStatus {
        self.status
    }

    // ---- setters ----

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        validate_title(&title)?;
        self.title = title;
        Ok(())
    }

    pub fn set_author(&mut self, author: impl Into<String>) -> Result<()> {
        let author = author.into();
        validate_author(&author)?;
        self.author = author;
        Ok(())
    }

    /// ISBN must stay empty or exactly 13 characters.
    pub fn set_isbn(&mut self, isbn: impl Into<String>) -> Result<()> {
        let isbn = isbn.into();
        if !isbn.is_empty() && isbn.chars().count() != 13 {
            return Err(Error::invalid_argument(
                "isbn",
                "must be empty or exactly 13 characters",
            ));
        }
        self.isbn = isbn;
        Ok(())
    }

    /// Change the page count. Shrinking it below the current page clamps the
    /// current page down so the `current <= count` invariant holds.
    pub fn set_page_count(&mut self, page_count: i32) -> Result<()> {
        if page_count < 0 {
            return Err(Error::invalid_argument(
                "page_count",
                "must not be negative",
            ));
        }
        self.page_count = page_count;
        if self.current_page > page_count {
            self.current_page = page_count;
        }
        Ok(())
    }

    /// Record where the reader currently is. Moving above page 0 for the
    /// first time stamps the start date; reaching the final page stamps the
    /// completion date. Neither stamp overwrites a date that already exists.
    pub fn set_current_page(&mut self, current_page: i32) -> Result<()> {
        if current_page < 0 {
            return Err(Error::invalid_argument(
                "current_page",
                "must not be negative",
            ));
        }
        if current_page > self.page_count {
            return Err(Error::invalid_argument(
                "current_page",
                format!("must not exceed the page count of {}", self.page_count),
            ));
        }

        self.current_page = current_page;

        if current_page > 0 && self.start_date.is_none() {
            self.start_date = Some(Utc::now());
        }
        if self.page_count > 0 && current_page == self.page_count && self.completion_date.is_none()
        {
            self.completion_date = Some(Utc::now());
        }
        Ok(())
    }

    pub fn set_genre(&mut self, genre: impl Into<String>) {
        self.genre = genre.into();
    }

    pub fn set_publisher(&mut self, publisher: impl Into<String>) {
        self.publisher = publisher.into();
    }

    /// Publication year, 0 for unknown.
    pub fn set_year_published(&mut self, year: i32) -> Result<()> {
        if !(0..=9999).contains(&year) {
            return Err(Error::invalid_argument(
                "year_published",
                "must be 0 (unknown) or within 1..=9999",
            ));
        }
        self.year_published = year;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_review(&mut self, review: impl Into<String>) {
        self.review = review.into();
    }

    /// Star rating, 0 for unrated.
    pub fn set_rating(&mut self, rating: i32) -> Result<()> {
        if !(0..=5).contains(&rating) {
            return Err(Error::invalid_argument(
                "rating",
                "must be within 0..=5 (0 = unrated)",
            ));
        }
        self.rating = rating;
        Ok(())
    }

    pub fn set_cover_path(&mut self, cover_path: impl Into<String>) {
        self.cover_path = cover_path.into();
    }

    pub fn set_date_added(&mut self, date_added: DateTime<Utc>) {
        self.date_added = date_added;
    }

    pub fn set_start_date(&mut self, start_date: Option<DateTime<Utc>>) {
        self.start_date = start_date;
    }

    pub fn set_completion_date(&mut self, completion_date: Option<DateTime<Utc>>) {
        self.completion_date = completion_date;
    }

    pub fn set_status(&mut self, status: ReadingStatus) {
        self.status = status;
    }

    // ---- utility ----

    /// Reading progress in percent, capped at 100. Zero whenever the page
    /// count or the current page is zero.
    pub fn progress_percentage(&self) -> f64 {
        if self.page_count <= 0 || self.current_page <= 0 {
            return 0.0;
        }
        let pct = f64::from(self.current_page) / f64::from(self.page_count) * 100.0;
        pct.min(100.0)
    }

    /// Whether any reading has happened.
    pub fn is_started(&self) -> bool {
        self.current_page > 0 || self.start_date.is_some()
    }

    /// Whether the book has been read to the end.
    pub fn is_completed(&self) -> bool {
        (self.page_count > 0 && self.current_page == self.page_count)
            || self.completion_date.is_some()
    }

    /// Jump straight to the last page and stamp the completion date. There
    /// is nothing to complete against when the page count is unknown, so
    /// that case fails instead of guessing.
    pub fn mark_as_completed(&mut self) -> Result<()> {
        if self.page_count == 0 {
            return Err(Error::precondition(
                "cannot mark a book with an unknown page count as completed",
            ));
        }
        self.current_page = self.page_count;
        if self.start_date.is_none() {
            self.start_date = Some(Utc::now());
        }
        if self.completion_date.is_none() {
            self.completion_date = Some(Utc::now());
        }
        Ok(())
    }

    /// Wind the book back to untouched: page 0 and no start or completion
    /// date. Always succeeds.
    pub fn reset_progress(&mut self) {
        self.current_page = 0;
        self.start_date = None;
        self.completion_date = None;
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(Error::invalid_argument("title", "must not be empty"));
    }
    Ok(())
}

fn validate_author(author: &str) -> Result<()> {
    if author.is_empty() {
        return Err(Error::invalid_argument("author", "must not be empty"));
    }
    Ok(())
}
