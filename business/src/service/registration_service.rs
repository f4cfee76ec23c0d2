use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::constants::topics;
use common::enums::status::KycStatus;
use common::error::AppError;
use common::mq::message_queue::MessageQueue;
use common::services::ledger_service::{AppWallet, LedgerService};
use common::utils::time_util;
use common::WalletKind;
use orm::entities::AppPlayer;
use rbatis::RBatis;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// 新玩家注册事件载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRegisteredPayload {
    pub player_id: i64,
    pub tenant_id: i64,
}

/// 玩家开户服务
///
/// 开户即按钱包类型逐一开通钱包 (CASH + BONUS), 钱包从不物理删除, 只停用
pub struct RegistrationService {
    rb: Arc<RBatis>,
    mq: Arc<MessageQueue>,
}

impl RegistrationService {
    pub fn new(rb: Arc<RBatis>, mq: Arc<MessageQueue>) -> Self {
        Self { rb, mq }
    }

    pub async fn create_player(
        &self,
        tenant_id: i64,
        currency_id: i64,
        player_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<AppPlayer, AppError> {
        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("玩家开户事务回滚");
            }
        });

        let db_now = time_util::to_db_time(now);
        let mut player = AppPlayer {
            id: None,
            tenant_id,
            player_name,
            status: Some("active".to_string()),
            kyc_status: Some(KycStatus::NotSubmitted.code().to_string()),
            kyc_verified_at: None,
            created_at: Some(db_now.clone()),
        };
        let res = AppPlayer::insert(&tx, &player).await?;
        player.id = res.last_insert_id.as_i64();
        let player_id = player.id.unwrap_or_default();

        // 每种钱包类型开一个零余额钱包
        for kind in WalletKind::iter() {
            let wallet_type_id = LedgerService::wallet_type_id(&tx, kind).await?;
            let wallet = AppWallet {
                id: None,
                player_id,
                tenant_id,
                currency_id,
                wallet_type_id,
                balance: Decimal::ZERO,
                is_active: Some(true),
                created_at: Some(db_now.clone()),
                updated_at: Some(db_now.clone()),
            };
            AppWallet::insert(&tx, &wallet).await?;
        }

        tx.commit().await?;
        log::info!("👤 玩家 {} 开户完成 (租户 {})", player_id, tenant_id);

        // 注册事件尽力而为
        let payload = PlayerRegisteredPayload {
            player_id,
            tenant_id,
        };
        if let Err(e) = self.mq.publish(topics::PLAYER_REGISTERED, &payload).await {
            log::error!("❌ 注册事件发布失败 player={}: {}", player_id, e);
        }

        Ok(player)
    }

    /// 停用钱包 (从不物理删除)
    pub async fn deactivate_wallet(&self, wallet_id: i64) -> Result<(), AppError> {
        let mut wallet = AppWallet::select_by_id(self.rb.as_ref(), wallet_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("钱包不存在: {}", wallet_id)))?;
        wallet.is_active = Some(false);
        AppWallet::update_by_map(self.rb.as_ref(), &wallet, rbs::value! { "id": wallet.id })
            .await?;
        Ok(())
    }
}
