//! Catalog service: book registration and availability read models

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookView, CreateBook},
    models::ids::{BookId, Isbn},
    repository::{Repository, UnitOfWork},
    services::idgen::IdGenerator,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    uow: UnitOfWork,
    ids: Arc<dyn IdGenerator>,
}

impl CatalogService {
    pub fn new(repository: Repository, uow: UnitOfWork, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            repository,
            uow,
            ids,
        }
    }

    /// Register a new book in the catalog
    pub async fn register_book(&self, request: CreateBook) -> AppResult<BookView> {
        let isbn = Isbn::new(&request.isbn)?;
        let book = Book::new(self.ids.book_id(), isbn, request.title, request.author);

        let mut tx = self.uow.begin().await?;
        self.repository.books.save(&mut *tx, &book).await?;
        tx.commit().await?;

        tracing::info!("Book {} registered: {}", book.id(), book.title());

        Ok(BookView {
            id: book.id().clone(),
            isbn_formatted: book.isbn().formatted(),
            isbn: book.isbn().clone(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            available: true,
            current_loan: None,
        })
    }

    /// List all books with loan-derived availability
    pub async fn list_books(&self) -> AppResult<Vec<BookView>> {
        let mut conn = self.uow.acquire().await?;
        self.repository.books.list_views(&mut *conn).await
    }

    /// Get a single book with its current loan, if any
    pub async fn get_book(&self, id: &str) -> AppResult<BookView> {
        let book_id = BookId::new(id)?;
        let mut conn = self.uow.acquire().await?;

        self.repository
            .books
            .find_view(&mut *conn, &book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {book_id} not found")))
    }
}
