//! Loan lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{BorrowBook, BorrowReceipt, ExtendReceipt, LoanView, ReturnReceipt},
};

/// Borrow a book (create a loan)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = BorrowBook,
    responses(
        (status = 201, description = "Loan created", body = BorrowReceipt),
        (status = 400, description = "Invalid identifiers"),
        (status = 404, description = "Member or book not found"),
        (status = 422, description = "Borrowing denied by policy")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Json(request): Json<BorrowBook>,
) -> AppResult<(StatusCode, Json<BorrowReceipt>)> {
    let receipt = state.services.loans.borrow_book(request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnReceipt),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<String>,
) -> AppResult<Json<ReturnReceipt>> {
    let receipt = state.services.loans.return_book(&loan_id).await?;
    Ok(Json(receipt))
}

/// Extend a loan's due date
#[utoipa::path(
    post,
    path = "/loans/{id}/extend",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan extended", body = ExtendReceipt),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned"),
        (status = 422, description = "Loan overdue or extension limit reached")
    )
)]
pub async fn extend_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<String>,
) -> AppResult<Json<ExtendReceipt>> {
    let receipt = state.services.loans.extend_loan(&loan_id).await?;
    Ok(Json(receipt))
}

/// Get active loans for a member
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member's active loans", body = Vec<LoanView>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<LoanView>>> {
    let loans = state.services.loans.get_user_loans(&user_id).await?;
    Ok(Json(loans))
}
