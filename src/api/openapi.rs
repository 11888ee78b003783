//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "0.3.0",
        description = "Library Lending System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        // Users
        users::create_user,
        users::get_user,
        users::update_suspension,
        // Loans
        loans::borrow_book,
        loans::return_book,
        loans::extend_loan,
        loans::get_user_loans,
    ),
    components(
        schemas(
            // Books
            crate::models::book::CreateBook,
            crate::models::book::BookView,
            crate::models::book::LoanSummary,
            crate::models::book::BookStatus,
            // Users
            crate::models::user::CreateUser,
            crate::models::user::UpdateSuspension,
            crate::models::user::UserDetails,
            crate::models::user::UserStatus,
            // Loans
            crate::models::loan::BorrowBook,
            crate::models::loan::BorrowReceipt,
            crate::models::loan::ReturnReceipt,
            crate::models::loan::ExtendReceipt,
            crate::models::loan::LoanView,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog and availability"),
        (name = "users", description = "Member management"),
        (name = "loans", description = "Loan lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
