use serde::Deserialize;

/// 内容接口统一的外层结构 `{"data": ...}`
#[derive(Debug, Deserialize)]
pub struct CommonResponse<T> {
    pub data: Option<T>,
}
