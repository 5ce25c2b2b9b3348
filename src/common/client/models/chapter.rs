use serde::Deserialize;

use crate::common::models::Page;

/// `/manga/{slug}/chapter` 返回的章节数据，只关心页面列表
#[derive(Debug, Default, Deserialize)]
pub struct ChapterData {
    #[serde(default)]
    pub pages: Vec<Page>,
}
