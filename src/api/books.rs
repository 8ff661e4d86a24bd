//! Book endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ErrorResponse},
    models::book::{Book, BookFilter, BookId, BookPayload, BookQuery, BookShort},
    AppState,
};

use super::{ApiJson, STATUS_SUCCESS};

/// Success envelope carrying a payload
#[derive(Serialize, ToSchema)]
#[aliases(
    BookCreatedResponse = DataResponse<BookIdData>,
    BookListResponse = DataResponse<BookListData>,
    BookDetailResponse = DataResponse<BookData>
)]
pub struct DataResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Always `success`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn new(message: Option<&str>, data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.map(str::to_string),
            data,
        }
    }
}

/// Success envelope carrying only a confirmation message
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    /// Always `success`
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct BookIdData {
    #[serde(rename = "bookId")]
    pub book_id: BookId,
}

#[derive(Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookShort>,
}

#[derive(Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

/// Add a book to the shelf
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = BookCreatedResponse),
        (status = 400, description = "Missing name, readPage above pageCount or malformed body", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<(StatusCode, Json<BookCreatedResponse>)> {
    let book_id = state.services.books.create_book(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(
            Some("Buku berhasil ditambahkan"),
            BookIdData { book_id },
        )),
    ))
}

/// List books, optionally filtered.
///
/// Never fails: an unreadable query string is treated as empty.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books in insertion order", body = BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<BookListResponse> {
    let pairs = pairs.map(|Query(pairs)| pairs).unwrap_or_else(|rejection| {
        tracing::debug!("Ignoring unreadable book query: {}", rejection);
        Vec::new()
    });

    let filter = BookFilter::from(BookQuery::from_pairs(pairs));
    let books = state.services.books.search_books(&filter).await;

    Json(DataResponse::new(None, BookListData { books }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{bookId}",
    tag = "books",
    params(
        ("bookId" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetailResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookDetailResponse>> {
    let book = state.services.books.get_book(&id).await?;
    Ok(Json(DataResponse::new(None, BookData { book })))
}

/// Replace the details of a book
#[utoipa::path(
    put,
    path = "/books/{bookId}",
    tag = "books",
    params(
        ("bookId" = String, Path, description = "Book ID")
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Missing name, readPage above pageCount or malformed body", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.update_book(&id, payload).await?;
    Ok(Json(MessageResponse::new("Buku berhasil diperbarui")))
}

/// Remove a book
#[utoipa::path(
    delete,
    path = "/books/{bookId}",
    tag = "books",
    params(
        ("bookId" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete_book(&id).await?;
    Ok(Json(MessageResponse::new("Buku berhasil dihapus")))
}
