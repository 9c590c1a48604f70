use axum::extract::FromRequestParts;

use crate::errors::AppError;

/// `axum::extract::Path` whose rejection is an `AppError`, so a malformed id
/// gets the usual JSON error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);
