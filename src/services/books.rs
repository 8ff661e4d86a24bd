//! Book registry service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, BookId, BookPayload, BookRejection, BookShort},
    repository::Repository,
};

const CREATE_FAILED: &str = "Gagal menambahkan buku";
const UPDATE_FAILED: &str = "Gagal memperbarui buku";
const NOT_FOUND: &str = "Buku tidak ditemukan";
const UPDATE_NOT_FOUND: &str = "Gagal memperbarui buku. Id tidak ditemukan";
const DELETE_NOT_FOUND: &str = "Buku gagal dihapus. Id tidak ditemukan";

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate and store a new book, returning its id
    pub async fn create_book(&self, payload: BookPayload) -> AppResult<BookId> {
        let book = payload
            .validate()
            .map_err(|rejection| rejected(CREATE_FAILED, rejection))?;

        let name = book.name.clone();
        let id = self.repository.books.books_create(book).await;
        tracing::info!("Book created: id={} name={:?}", id, name);

        Ok(id)
    }

    /// List books matching the filter
    pub async fn search_books(&self, filter: &BookFilter) -> Vec<BookShort> {
        self.repository.books.books_search(filter).await
    }

    /// Number of books currently on the shelf
    pub async fn count_books(&self) -> usize {
        self.repository.books.books_count().await
    }

    /// Get a book by ID with full details
    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books
            .books_get_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    /// Update an existing book; an unknown id wins over invalid data
    pub async fn update_book(&self, id: &str, payload: BookPayload) -> AppResult<Book> {
        let updated = self
            .repository
            .books
            .books_update(id, || {
                payload
                    .validate()
                    .map_err(|rejection| rejected(UPDATE_FAILED, rejection))
            })
            .await?
            .ok_or_else(|| {
                tracing::debug!("Update of unknown book id={}", id);
                AppError::NotFound(UPDATE_NOT_FOUND.to_string())
            })?;

        tracing::info!("Book updated: id={} finished={}", updated.id, updated.finished);
        Ok(updated)
    }

    /// Delete a book
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        if !self.repository.books.books_delete(id).await {
            tracing::debug!("Delete of unknown book id={}", id);
            return Err(AppError::NotFound(DELETE_NOT_FOUND.to_string()));
        }

        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }
}

fn rejected(action: &str, rejection: BookRejection) -> AppError {
    tracing::debug!("{}: {:?}", action, rejection);
    AppError::Validation(format!("{}. {}", action, rejection))
}
