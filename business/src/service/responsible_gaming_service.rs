use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use common::error::AppError;
use common::utils::time_util;
use orm::entities::AppResponsibleLimit;
use rbatis::executor::Executor;
use rbatis::RBatis;
use rust_decimal::Decimal;
use serde::Serialize;

/// 限额用量视图
#[derive(Debug, Clone, Serialize)]
pub struct LimitsUsage {
    pub daily_bet_limit: Option<Decimal>,
    pub daily_used: Decimal,
    pub daily_remaining: Option<Decimal>,
    pub monthly_bet_limit: Option<Decimal>,
    pub monthly_used: Decimal,
    pub monthly_remaining: Option<Decimal>,
    pub self_exclusion_until: Option<String>,
}

/// 自我排除校验: 截止日当天仍然生效
pub fn check_self_exclusion(
    limits: Option<&AppResponsibleLimit>,
    as_of: NaiveDate,
) -> Result<(), AppError> {
    if let Some(l) = limits {
        if let Some(until) = &l.self_exclusion_until {
            if time_util::from_db_time(until).date_naive() >= as_of {
                return Err(AppError::SelfExcluded);
            }
        }
    }
    Ok(())
}

/// 限额判断: 本次投注会把累计用量推过限额则拒绝; 未配置限额不设上限
pub fn would_exceed(used: Decimal, stake: Decimal, limit: Option<Decimal>) -> bool {
    match limit {
        Some(limit) => used + stake > limit,
        None => false,
    }
}

/// 自我排除只能设置未来日期, 且只能延长不能缩短
pub fn validate_exclusion_extension(
    current: Option<NaiveDate>,
    requested: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppError> {
    if requested <= today {
        return Err(AppError::validation("自我排除截止日必须是未来日期"));
    }
    if let Some(current) = current {
        if requested < current {
            return Err(AppError::validation("自我排除期只能延长"));
        }
    }
    Ok(())
}

/// 负责任博彩守卫
///
/// 在任何钱包加锁之前执行, 拒绝时对系统零副作用
pub struct ResponsibleGamingService {
    rb: Arc<RBatis>,
}

impl ResponsibleGamingService {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }

    /// 当日已结算投注总额 (bet -> round -> session 归属到玩家)
    async fn settled_stake_for_day(&self, player_id: i64, day: &str) -> Result<Decimal, AppError> {
        let sql = "select cast(coalesce(sum(b.bet_amount), 0) as decimal(18, 2)) \
                   from app_bet b \
                   join app_game_round r on r.id = b.round_id \
                   join app_game_session s on s.id = r.session_id \
                   where s.player_id = ? and b.bet_status = 'settled' \
                   and date_format(b.placed_at, '%Y-%m-%d') = ?";
        let v = Executor::query(
            self.rb.as_ref(),
            sql,
            vec![rbs::value!(player_id), rbs::value!(day)],
        )
        .await?;
        Ok(rbatis::decode(v)?)
    }

    /// 当月已结算投注总额
    async fn settled_stake_for_month(
        &self,
        player_id: i64,
        month: &str,
    ) -> Result<Decimal, AppError> {
        let sql = "select cast(coalesce(sum(b.bet_amount), 0) as decimal(18, 2)) \
                   from app_bet b \
                   join app_game_round r on r.id = b.round_id \
                   join app_game_session s on s.id = r.session_id \
                   where s.player_id = ? and b.bet_status = 'settled' \
                   and date_format(b.placed_at, '%Y-%m') = ?";
        let v = Executor::query(
            self.rb.as_ref(),
            sql,
            vec![rbs::value!(player_id), rbs::value!(month)],
        )
        .await?;
        Ok(rbatis::decode(v)?)
    }

    pub async fn get_limits(&self, player_id: i64) -> Result<Option<AppResponsibleLimit>, AppError> {
        Ok(AppResponsibleLimit::select_by_player(self.rb.as_ref(), player_id).await?)
    }

    /// 投注准入检查: 自我排除 -> 日限额 -> 月限额
    pub async fn enforce_bet_allowed(
        &self,
        player_id: i64,
        stake: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let limits = self.get_limits(player_id).await?;
        check_self_exclusion(limits.as_ref(), time_util::utc_date(now))?;

        let Some(limits) = limits else {
            return Ok(());
        };

        if limits.daily_bet_limit.is_some() {
            let used = self
                .settled_stake_for_day(player_id, &time_util::day_key(now))
                .await?;
            if would_exceed(used, stake, limits.daily_bet_limit) {
                return Err(AppError::DailyLimitExceeded);
            }
        }

        if limits.monthly_bet_limit.is_some() {
            let used = self
                .settled_stake_for_month(player_id, &time_util::month_key(now))
                .await?;
            if would_exceed(used, stake, limits.monthly_bet_limit) {
                return Err(AppError::MonthlyLimitExceeded);
            }
        }

        Ok(())
    }

    /// 设置日/月限额, 自我排除期内禁止修改
    pub async fn set_limits(
        &self,
        player_id: i64,
        daily: Option<Decimal>,
        monthly: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<AppResponsibleLimit, AppError> {
        if daily.map_or(false, |d| d <= Decimal::ZERO)
            || monthly.map_or(false, |m| m <= Decimal::ZERO)
        {
            return Err(AppError::validation("限额必须大于 0"));
        }

        let existing = self.get_limits(player_id).await?;
        check_self_exclusion(existing.as_ref(), time_util::utc_date(now))?;

        let mut row = existing.unwrap_or(AppResponsibleLimit {
            id: None,
            player_id,
            daily_bet_limit: None,
            monthly_bet_limit: None,
            self_exclusion_until: None,
            updated_at: None,
        });
        row.daily_bet_limit = daily;
        row.monthly_bet_limit = monthly;
        row.updated_at = Some(time_util::to_db_time(now));

        if row.id.is_some() {
            AppResponsibleLimit::update_by_map(
                self.rb.as_ref(),
                &row,
                rbs::value! { "id": row.id },
            )
            .await?;
        } else {
            let res = AppResponsibleLimit::insert(self.rb.as_ref(), &row).await?;
            row.id = res.last_insert_id.as_i64();
        }
        Ok(row)
    }

    /// 自我排除 (只能延长)
    pub async fn self_exclude(
        &self,
        player_id: i64,
        until: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<AppResponsibleLimit, AppError> {
        let existing = self.get_limits(player_id).await?;
        let current = existing
            .as_ref()
            .and_then(|l| l.self_exclusion_until.as_ref())
            .map(|d| time_util::from_db_time(d).date_naive());
        validate_exclusion_extension(current, until, time_util::utc_date(now))?;

        let until_dt = time_util::to_db_time(
            until
                .and_hms_opt(0, 0, 0)
                .map(|t| t.and_utc())
                .unwrap_or(now),
        );

        let mut row = existing.unwrap_or(AppResponsibleLimit {
            id: None,
            player_id,
            daily_bet_limit: None,
            monthly_bet_limit: None,
            self_exclusion_until: None,
            updated_at: None,
        });
        row.self_exclusion_until = Some(until_dt);
        row.updated_at = Some(time_util::to_db_time(now));

        if row.id.is_some() {
            AppResponsibleLimit::update_by_map(
                self.rb.as_ref(),
                &row,
                rbs::value! { "id": row.id },
            )
            .await?;
        } else {
            let res = AppResponsibleLimit::insert(self.rb.as_ref(), &row).await?;
            row.id = res.last_insert_id.as_i64();
        }

        log::info!("🚫 玩家 {} 自我排除至 {}", player_id, until);
        Ok(row)
    }

    /// 当期限额使用情况
    pub async fn get_limits_usage(
        &self,
        player_id: i64,
        now: DateTime<Utc>,
    ) -> Result<LimitsUsage, AppError> {
        let limits = self.get_limits(player_id).await?;
        let daily_used = self
            .settled_stake_for_day(player_id, &time_util::day_key(now))
            .await?;
        let monthly_used = self
            .settled_stake_for_month(player_id, &time_util::month_key(now))
            .await?;

        let daily_limit = limits.as_ref().and_then(|l| l.daily_bet_limit);
        let monthly_limit = limits.as_ref().and_then(|l| l.monthly_bet_limit);

        Ok(LimitsUsage {
            daily_bet_limit: daily_limit,
            daily_used,
            daily_remaining: daily_limit.map(|l| (l - daily_used).max(Decimal::ZERO)),
            monthly_bet_limit: monthly_limit,
            monthly_used,
            monthly_remaining: monthly_limit.map(|l| (l - monthly_used).max(Decimal::ZERO)),
            self_exclusion_until: limits
                .as_ref()
                .and_then(|l| l.self_exclusion_until.as_ref())
                .map(|d| time_util::from_db_time(d).date_naive().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn limits_with_exclusion(until: &str) -> AppResponsibleLimit {
        AppResponsibleLimit {
            id: Some(1),
            player_id: 9,
            daily_bet_limit: None,
            monthly_bet_limit: None,
            self_exclusion_until: Some(time_util::to_db_time(
                date(until).and_hms_opt(0, 0, 0).unwrap().and_utc(),
            )),
            updated_at: None,
        }
    }

    #[test]
    fn daily_limit_blocks_crossing_stake() {
        // 日限额 100, 已用 80, 再投 30 必须拒绝
        assert!(would_exceed(dec("80"), dec("30"), Some(dec("100"))));
        assert!(!would_exceed(dec("80"), dec("20"), Some(dec("100"))));
        assert!(!would_exceed(dec("999999"), dec("1"), None));
    }

    #[test]
    fn exclusion_is_inclusive_of_end_date() {
        let l = limits_with_exclusion("2025-06-10");
        assert!(matches!(
            check_self_exclusion(Some(&l), date("2025-06-10")),
            Err(AppError::SelfExcluded)
        ));
        assert!(check_self_exclusion(Some(&l), date("2025-06-11")).is_ok());
        assert!(check_self_exclusion(None, date("2025-06-10")).is_ok());
    }

    #[test]
    fn exclusion_can_only_extend() {
        let today = date("2025-06-01");
        assert!(validate_exclusion_extension(None, date("2025-06-01"), today).is_err());
        assert!(validate_exclusion_extension(None, date("2025-07-01"), today).is_ok());
        assert!(
            validate_exclusion_extension(Some(date("2025-08-01")), date("2025-07-01"), today)
                .is_err()
        );
        assert!(
            validate_exclusion_extension(Some(date("2025-08-01")), date("2025-09-01"), today)
                .is_ok()
        );
    }
}
