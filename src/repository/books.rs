//! In-memory book collection

use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use crate::models::book::{Book, BookFilter, BookId, BookShort, ValidBook};

use super::Clock;

const ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Process-lifetime ordered collection of books.
///
/// Every operation runs under one lock acquisition, so each one completes
/// fully before the next begins.
#[derive(Clone)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
    id_length: usize,
    clock: Clock,
}

impl BooksRepository {
    /// `id_length` must be nonzero; `AppConfig` rejects 0 at load time.
    pub fn new(id_length: usize, clock: Clock) -> Self {
        debug_assert!(id_length > 0, "book id length must be nonzero");
        Self {
            books: Arc::new(RwLock::new(Vec::new())),
            id_length,
            clock,
        }
    }

    /// Append a new book and return its freshly generated id
    pub async fn books_create(&self, payload: ValidBook) -> BookId {
        let mut books = self.books.write().await;

        let id = loop {
            let candidate = generate_id(self.id_length);
            if !books.iter().any(|book| book.id == candidate) {
                break candidate;
            }
            tracing::debug!("Generated book id {} already taken, retrying", candidate);
        };

        books.push(Book::new(id.clone(), payload, (self.clock)()));
        id
    }

    /// Project every book matching `filter`, in insertion order
    pub async fn books_search(&self, filter: &BookFilter) -> Vec<BookShort> {
        self.books
            .read()
            .await
            .iter()
            .filter(|book| book.matches(filter))
            .map(BookShort::from)
            .collect()
    }

    pub async fn books_get_by_id(&self, id: &str) -> Option<Book> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
    }

    /// Replace the mutable fields of the book with `id`.
    ///
    /// `validate` runs after the existence check and under the same lock,
    /// so an unknown id is reported before any rule violation.
    pub async fn books_update<E>(
        &self,
        id: &str,
        validate: impl FnOnce() -> Result<ValidBook, E>,
    ) -> Result<Option<Book>, E> {
        let mut books = self.books.write().await;

        let Some(book) = books.iter_mut().find(|book| book.id == id) else {
            return Ok(None);
        };

        let payload = validate()?;

        // updatedAt must move strictly forward even within one millisecond
        let now = (self.clock)();
        let floor = book.updated_at + chrono::Duration::milliseconds(1);
        book.apply(payload, now.max(floor));

        Ok(Some(book.clone()))
    }

    /// Remove the book with `id`; returns false when absent
    pub async fn books_delete(&self, id: &str) -> bool {
        let mut books = self.books.write().await;

        match books.iter().position(|book| book.id == id) {
            Some(index) => {
                books.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of stored books
    pub async fn books_count(&self) -> usize {
        self.books.read().await.len()
    }
}

/// Random id over a URL-safe 64 symbol alphabet
fn generate_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}
