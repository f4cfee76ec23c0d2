use common::error::AppError;
use rand::Rng;

pub const HEAD: &str = "HEAD";
pub const TAIL: &str = "TAIL";

/// 解析玩家押注面, 大小写不敏感
pub fn parse_choice(choice: &str) -> Result<&'static str, AppError> {
    match choice.trim().to_ascii_uppercase().as_str() {
        "HEAD" | "HEADS" => Ok(HEAD),
        "TAIL" | "TAILS" => Ok(TAIL),
        _ => Err(AppError::validation(format!(
            "无效的押注面: {} (可选 HEAD/TAIL)",
            choice
        ))),
    }
}

/// 均匀抛硬币
pub fn draw<R: Rng>(rng: &mut R) -> &'static str {
    if rng.gen_bool(0.5) {
        HEAD
    } else {
        TAIL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn choice_parsing_is_case_insensitive() {
        assert_eq!(parse_choice("heads").unwrap(), HEAD);
        assert_eq!(parse_choice(" TAIL ").unwrap(), TAIL);
        assert!(parse_choice("side").is_err());
    }

    #[test]
    fn both_faces_appear() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(draw(&mut rng));
        }
        assert!(seen.contains(HEAD) && seen.contains(TAIL));
    }
}
