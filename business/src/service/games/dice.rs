use common::error::AppError;
use rand::Rng;

pub const EVEN: &str = "EVEN";
pub const ODD: &str = "ODD";

/// 解析玩家押注的奇偶
pub fn parse_choice(choice: &str) -> Result<&'static str, AppError> {
    match choice.trim().to_ascii_uppercase().as_str() {
        "EVEN" => Ok(EVEN),
        "ODD" => Ok(ODD),
        _ => Err(AppError::validation(format!(
            "无效的押注项: {} (可选 EVEN/ODD)",
            choice
        ))),
    }
}

/// 掷骰子, 1..=6 均匀
pub fn roll<R: Rng>(rng: &mut R) -> u8 {
    rng.gen_range(1..=6)
}

/// 点数映射到奇偶, 保证二选一等概率
pub fn outcome_of_roll(roll: u8) -> &'static str {
    if roll % 2 == 0 {
        EVEN
    } else {
        ODD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parity_mapping() {
        assert_eq!(outcome_of_roll(2), EVEN);
        assert_eq!(outcome_of_roll(4), EVEN);
        assert_eq!(outcome_of_roll(6), EVEN);
        assert_eq!(outcome_of_roll(1), ODD);
        assert_eq!(outcome_of_roll(3), ODD);
        assert_eq!(outcome_of_roll(5), ODD);
    }

    #[test]
    fn rolls_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let r = roll(&mut rng);
            assert!((1..=6).contains(&r));
        }
    }

    #[test]
    fn choice_parsing() {
        assert_eq!(parse_choice("even").unwrap(), EVEN);
        assert_eq!(parse_choice("Odd").unwrap(), ODD);
        assert!(parse_choice("2").is_err());
    }
}
