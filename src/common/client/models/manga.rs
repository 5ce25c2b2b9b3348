use serde::Deserialize;

use crate::common::models::{MangaDetails, SearchResult, Site};

#[derive(Debug, Default, Deserialize)]
pub struct Cover {
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Rating {
    #[serde(rename = "averageFormated", default)]
    pub average_formated: Option<String>,
}

/// 搜索接口中的单条结果
#[derive(Debug, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub id: u64,
    pub rus_name: Option<String>,
    pub eng_name: Option<String>,
    #[serde(default)]
    pub slug_url: String,
    pub cover: Option<Cover>,
    #[serde(default)]
    pub site: u32,
}

impl From<SearchItem> for SearchResult {
    fn from(item: SearchItem) -> Self {
        Self {
            id: item.id,
            rus_name: item.rus_name.unwrap_or_else(|| "No name".to_string()),
            eng_name: item.eng_name.unwrap_or_else(|| "No name".to_string()),
            slug_url: item.slug_url,
            cover_url: item.cover.and_then(|c| c.default).unwrap_or_default(),
            site_id: item.site,
            site_name: Site::display_name(item.site),
        }
    }
}

/// `/manga/{slug}` 的 data 部分
#[derive(Debug, Deserialize)]
pub struct MangaData {
    pub rus_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<Label>,
    pub status: Option<Label>,
    pub cover: Option<Cover>,
    pub rating: Option<Rating>,
}

impl From<MangaData> for MangaDetails {
    fn from(data: MangaData) -> Self {
        Self {
            title: data.rus_name.unwrap_or_default(),
            kind: data.kind.and_then(|l| l.label).unwrap_or_default(),
            status: data.status.and_then(|l| l.label).unwrap_or_default(),
            cover_url: data.cover.and_then(|c| c.default).unwrap_or_default(),
            rating: data
                .rating
                .and_then(|r| r.average_formated)
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_item_defaults() {
        let item: SearchItem = serde_json::from_str(
            r#"{"id": 7, "slug_url": "7--one", "cover": null, "site": 4}"#,
        )
        .unwrap();
        let result = SearchResult::from(item);
        assert_eq!(result.rus_name, "No name");
        assert_eq!(result.cover_url, "");
        assert_eq!(result.site_name, "HentaiLib");
    }

    #[test]
    fn manga_data_reads_nested_labels() {
        let data: MangaData = serde_json::from_str(
            r#"{
                "rus_name": "Ван Пис",
                "type": {"id": 1, "label": "Манга"},
                "status": {"id": 1, "label": "Онгоинг"},
                "cover": {"default": "https://cover.example/1.jpg"},
                "rating": {"average": "9.1", "averageFormated": "9.1"}
            }"#,
        )
        .unwrap();
        let details = MangaDetails::from(data);
        assert_eq!(details.title, "Ван Пис");
        assert_eq!(details.kind, "Манга");
        assert_eq!(details.status, "Онгоинг");
        assert_eq!(details.rating, "9.1");
    }
}
