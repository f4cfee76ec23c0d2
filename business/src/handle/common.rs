use actix_web::{get, Responder};
use common::error::AppError;
use common::response::R;

/// GET /api/common/health
#[get("/api/common/health")]
pub async fn health() -> Result<impl Responder, AppError> {
    R::success("ok".to_string())
}
