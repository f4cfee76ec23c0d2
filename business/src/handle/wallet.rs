use actix_web::{get, post, web, Responder};
use chrono::{DateTime, Utc};
use common::enums::TransactionCode;
use common::error::AppError;
use common::response::R;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::handle::current_player;
use crate::service::wallet_service::TransactionQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DepositReq {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TransactionListReq {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/wallet/list
#[get("/api/wallet/list")]
pub async fn list_wallets(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let wallets = state
        .wallet_service
        .get_wallets(player.id.unwrap_or_default())
        .await?;
    R::success(wallets)
}

/// POST /api/wallet/deposit
#[post("/api/wallet/deposit")]
pub async fn deposit(
    req: web::Json<DepositReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let movement = state
        .wallet_service
        .deposit(
            player.id.unwrap_or_default(),
            player.tenant_id,
            req.amount,
            Utc::now(),
        )
        .await?;
    R::success(movement)
}

/// GET /api/wallet/{wallet_id}/transactions
#[get("/api/wallet/{wallet_id}/transactions")]
pub async fn list_transactions(
    path: web::Path<i64>,
    query: web::Query<TransactionListReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let query = query.into_inner();

    let transaction_code = match query.transaction_type.as_deref() {
        Some(code) => Some(
            TransactionCode::from_code(code)
                .ok_or_else(|| AppError::validation(format!("未知交易类型: {}", code)))?,
        ),
        None => None,
    };

    let rows = state
        .wallet_service
        .transactions(
            player.id.unwrap_or_default(),
            path.into_inner(),
            TransactionQuery {
                from: query.from,
                to: query.to,
                transaction_code,
                limit: query.limit,
            },
        )
        .await?;
    R::success(rows)
}
