use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` for request bodies, rejecting with the application's JSON error
/// body instead of axum's plain-text one.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
