use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

/// 统一响应信封
///
/// 所有接口 (钱包/投注/提现/抽奖) 都返回 `{code, msg, data}`;
/// 成功固定 code=200, 失败由 AppError 渲染同样的结构,
/// data 为空时整个字段不出现在 JSON 里
#[derive(Debug, Serialize, Deserialize)]
pub struct R<T> {
    pub code: u16,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> R<T> {
    /// 带数据的成功响应, 直接作为 handler 的 Ok 分支
    pub fn success(data: T) -> Result<R<T>, crate::error::AppError> {
        Ok(R {
            code: 200,
            msg: "success".to_string(),
            data: Some(data),
        })
    }

    /// 失败响应体, code 跟随 HTTP 状态 (AppError::error_response 使用)
    pub fn error(code: u16, msg: String) -> Self {
        R {
            code,
            msg,
            data: None,
        }
    }
}

impl R<()> {
    /// 无数据的成功响应 (停用钱包等只需回执的操作)
    pub fn ok() -> Result<R<()>, crate::error::AppError> {
        Ok(R {
            code: 200,
            msg: "success".to_string(),
            data: None,
        })
    }
}

impl<T: Serialize> Responder for R<T> {
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::Ok().json(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_carries_data() {
        let r = R::success(vec![1, 2, 3]).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["msg"], "success");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn empty_success_omits_data_field() {
        let r = R::ok().unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["code"], 200);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn error_envelope_keeps_code_and_message() {
        let r: R<()> = R::error(403, "玩家处于自我排除期".to_string());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["code"], 403);
        assert_eq!(json["msg"], "玩家处于自我排除期");
        assert!(json.get("data").is_none());
    }
}
