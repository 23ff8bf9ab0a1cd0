//! A single sitting spent reading one book. Sessions carry enough data to
//! derive reading-speed metrics; the store creates their table but the core
//! exposes no session CRUD yet.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// One period of time spent reading a specific book.
#[derive(Debug, Clone)]
pub struct ReadingSession {
    pub(crate) id: i64,
    pub(crate) book_id: i64,
    pub(crate) session_date: DateTime<Utc>,
    pub(crate) duration_minutes: i32,
    pub(crate) pages_read: i32,
    pub(crate) start_page: i32,
    pub(crate) end_page: i32,
    pub(crate) notes: String,
}

impl ReadingSession {
    /// Create a session record. The book id must reference a persisted book
    /// (> 0), durations and page figures must be non-negative, and the end
    /// page cannot precede the start page.
    pub fn new(
        book_id: i64,
        session_date: DateTime<Utc>,
        duration_minutes: i32,
        pages_read: i32,
        start_page: i32,
        end_page: i32,
    ) -> Result<Self> {
        validate_book_id(book_id)?;
        validate_duration(duration_minutes)?;
        validate_pages_read(pages_read)?;
        validate_page_span(start_page, end_page)?;

        Ok(Self {
            id: 0,
            book_id,
            session_date,
            duration_minutes,
            pages_read,
            start_page,
            end_page,
            notes: String::new(),
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn book_id(&self) -> i64 {
        self.book_id
    }

    pub fn session_date(&self) -> DateTime<Utc> {
        self.session_date
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn pages_read(&self) -> i32 {
        self.pages_read
    }

    pub fn start_page(&self) -> i32 {
        self.start_page
    }

    pub fn end_page(&self) -> i32 {
        self.end_page
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_book_id(&mut self, book_id: i64) -> Result<()> {
        validate_book_id(book_id)?;
        self.book_id = book_id;
        Ok(())
    }

    pub fn set_session_date(&mut self, session_date: DateTime<Utc>) {
        self.session_date = session_date;
    }

    pub fn set_duration_minutes(&mut self, duration_minutes: i32) -> Result<()> {
        validate_duration(duration_minutes)?;
        self.duration_minutes = duration_minutes;
        Ok(())
    }

    pub fn set_pages_read(&mut self, pages_read: i32) -> Result<()> {
        validate_pages_read(pages_read)?;
        self.pages_read = pages_read;
        Ok(())
    }

    /// Set both ends of the page span together so the `end >= start`
    /// invariant can be checked in one place.
    pub fn set_page_span(&mut self, start_page: i32, end_page: i32) -> Result<()> {
        validate_page_span(start_page, end_page)?;
        self.start_page = start_page;
        self.end_page = end_page;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Reading speed in pages per hour; 0 when the session has no duration.
    pub fn pages_per_hour(&self) -> f64 {
        if self.duration_minutes == 0 {
            return 0.0;
        }
        f64::from(self.pages_read) / f64::from(self.duration_minutes) * 60.0
    }

    /// Reading speed in pages per minute; 0 when the session has no duration.
    pub fn pages_per_minute(&self) -> f64 {
        if self.duration_minutes == 0 {
            return 0.0;
        }
        f64::from(self.pages_read) / f64::from(self.duration_minutes)
    }

    /// Human-readable duration, e.g. `"1h 30m"` or `"45m"`.
    pub fn formatted_duration(&self) -> String {
        let hours = self.duration_minutes / 60;
        let minutes = self.duration_minutes % 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }

    /// Whether the session describes an actual sitting: a real book, time
    /// spent, and a sane page figure.
    pub fn is_valid(&self) -> bool {
        self.book_id > 0 && self.duration_minutes > 0 && self.pages_read >= 0
    }
}

fn validate_book_id(book_id: i64) -> Result<()> {
    if book_id <= 0 {
        return Err(Error::invalid_argument(
            "book_id",
            "must reference a persisted book (> 0)",
        ));
    }
    Ok(())
}

fn validate_duration(duration_minutes: i32) -> Result<()> {
    if duration_minutes < 0 {
        return Err(Error::invalid_argument(
            "duration_minutes",
            "must not be negative",
        ));
    }
    Ok(())
}

fn validate_pages_read(pages_read: i32) -> Result<()> {
    if pages_read < 0 {
        return Err(Error::invalid_argument(
            "pages_read",
            "must not be negative",
        ));
    }
    Ok(())
}

fn validate_page_span(start_page: i32, end_page: i32) -> Result<()> {
    if start_page < 0 || end_page < 0 {
        return Err(Error::invalid_argument(
            "page_span",
            "page numbers must not be negative",
        ));
    }
    if end_page < start_page {
        return Err(Error::invalid_argument(
            "page_span",
            "end page must not precede the start page",
        ));
    }
    Ok(())
}
