// 错误处理模块
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::response::R;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("Redis错误: {0}")]
    RedisError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("验证错误: {0}")]
    ValidationError(String),

    #[error("未授权: {0}")]
    Unauthorized(String),

    #[error("未找到: {0}")]
    NotFound(String),

    #[error("内部服务器错误: {0}")]
    InternalServerError(String),

    // ==================== 结算核心业务错误 ====================
    /// 没有进行中的游戏会话
    #[error("没有进行中的游戏会话")]
    NoActiveSession,

    /// 游戏未对该租户开放
    #[error("游戏未对该租户开放")]
    GameNotEnabled,

    /// 投注金额超出限制范围
    #[error("投注金额超出范围: {0}")]
    BetOutOfBounds(String),

    /// 玩家处于自我排除期
    #[error("玩家处于自我排除期")]
    SelfExcluded,

    /// 超出每日投注限额
    #[error("超出每日投注限额")]
    DailyLimitExceeded,

    /// 超出每月投注限额
    #[error("超出每月投注限额")]
    MonthlyLimitExceeded,

    /// 余额不足
    #[error("余额不足")]
    InsufficientFunds,

    /// 已存在进行中的奖金任务
    #[error("已存在进行中的奖金任务")]
    BonusAlreadyActive,

    /// 奖金活动已过期
    #[error("奖金活动已过期")]
    BonusExpiredOffer,

    /// KYC 状态禁止提现
    #[error("KYC状态禁止提现: {0}")]
    KycBlocked(String),

    /// 提现状态流转非法
    #[error("提现状态非法: 当前 {current}, 请求 {requested}")]
    InvalidWithdrawalState { current: String, requested: String },

    /// 重复参与
    #[error("重复参与")]
    DuplicateEntry,

    /// 奖池不可用
    #[error("奖池不可用")]
    JackpotNotActive,

    /// 无人参与
    #[error("无人参与")]
    NoParticipants,

    /// 运营方配置缺失 (服务端故障, 非用户错误)
    #[error("缺少配置: {0}")]
    ConfigMissing(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn database_error(msg: impl Into<String>) -> Self {
        AppError::DatabaseError(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn business(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::InternalServerError(msg.into())
    }

    pub fn config_missing(what: impl Into<String>) -> Self {
        AppError::ConfigMissing(what.into())
    }

    /// HTTP 状态映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_)
            | AppError::RedisError(_)
            | AppError::ConfigError(_)
            | AppError::InternalServerError(_)
            | AppError::ConfigMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SelfExcluded
            | AppError::DailyLimitExceeded
            | AppError::MonthlyLimitExceeded
            | AppError::GameNotEnabled
            | AppError::KycBlocked(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

// 从 rbatis 错误转换 (rbatis::Error 包含了 rbdc::Error)
impl From<rbatis::Error> for AppError {
    fn from(err: rbatis::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

// 从 redis 错误转换
impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::RedisError(err.to_string())
    }
}

// 统一渲染为 R 响应体
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        let body: R<()> = R::error(self.http_status().as_u16(), self.to_string());
        HttpResponse::build(self.http_status()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_map_to_4xx() {
        assert_eq!(AppError::NoActiveSession.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InsufficientFunds.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::SelfExcluded.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::DailyLimitExceeded.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::KycBlocked("rejected".into()).http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn operator_faults_map_to_500() {
        // 缺少交易类型配置属于运营方故障, 不能当成用户错误返回
        assert_eq!(
            AppError::ConfigMissing("transaction_type BET".into()).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::database_error("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_withdrawal_state_names_both_states() {
        let err = AppError::InvalidWithdrawalState {
            current: "completed".into(),
            requested: "rejected".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("completed"));
        assert!(msg.contains("rejected"));
    }
}
