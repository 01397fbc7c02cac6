use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections answer with the `AppError` body and status.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
