use actix_web::dev::ServiceRequest;
use std::sync::Arc;

/// 认证检查器 trait, 判断请求是否需要登录态
pub trait AuthChecker: Send + Sync {
    /// 返回 true 表示该路径需要鉴权
    fn check_auth_required(&self, req: &ServiceRequest) -> bool;

    /// 校验 LoginId, 默认全部放行
    fn valid_login_id(&self, _login_id: &str) -> bool {
        true
    }
}

/// 路径通配匹配: `*` 匹配单段, `**` 匹配任意后缀
fn path_matches(pattern: &str, path: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix("/**") {
        return path == prefix || path.starts_with(&format!("{}/", prefix));
    }
    let p_segs: Vec<&str> = pattern.split('/').collect();
    let s_segs: Vec<&str> = path.split('/').collect();
    if p_segs.len() != s_segs.len() {
        return false;
    }
    p_segs
        .iter()
        .zip(s_segs.iter())
        .all(|(p, s)| *p == "*" || p == s)
}

/// 基于路径匹配的默认认证检查器
pub struct DefaultAuthChecker {
    match_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    check_login_id_fn: Option<Arc<dyn Fn(&str) -> bool + Send + Sync>>,
}

impl DefaultAuthChecker {
    pub fn builder() -> AuthCheckerBuilder {
        AuthCheckerBuilder::new()
    }
}

impl AuthChecker for DefaultAuthChecker {
    fn check_auth_required(&self, req: &ServiceRequest) -> bool {
        let path = req.path();
        let hit = self.match_patterns.iter().any(|p| path_matches(p, path));
        let excluded = self.exclude_patterns.iter().any(|p| path_matches(p, path));
        hit && !excluded
    }

    fn valid_login_id(&self, login_id: &str) -> bool {
        if let Some(ref check_fn) = self.check_login_id_fn {
            (check_fn)(login_id)
        } else {
            true
        }
    }
}

/// AuthChecker 构建器
pub struct AuthCheckerBuilder {
    match_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    check_login_id_fn: Option<Arc<dyn Fn(&str) -> bool + Send + Sync>>,
}

impl AuthCheckerBuilder {
    pub fn new() -> Self {
        Self {
            match_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            check_login_id_fn: None,
        }
    }

    /// 添加匹配路径
    pub fn add_match(mut self, pattern: impl Into<String>) -> Self {
        self.match_patterns.push(pattern.into());
        self
    }

    /// 添加排除路径
    pub fn add_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// 设置 LoginId 检查函数
    pub fn check_login_id<F>(mut self, check_fn: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.check_login_id_fn = Some(Arc::new(check_fn));
        self
    }

    pub fn build(self) -> DefaultAuthChecker {
        DefaultAuthChecker {
            match_patterns: self.match_patterns,
            exclude_patterns: self.exclude_patterns,
            check_login_id_fn: self.check_login_id_fn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_star_matches_any_suffix() {
        assert!(path_matches("/api/**", "/api/wallet/list"));
        assert!(path_matches("/api/**", "/api"));
        assert!(!path_matches("/api/**", "/health"));
    }

    #[test]
    fn single_star_matches_one_segment() {
        assert!(path_matches("/api/*/detail", "/api/wallet/detail"));
        assert!(!path_matches("/api/*/detail", "/api/wallet/tx/detail"));
    }
}
