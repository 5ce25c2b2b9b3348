use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// -----------------------------------------------------------------------------------------------

/// 支持的站点，id 与内容接口中的 `site_id` 一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    MangaLib,
    HentaiLib,
}

impl Site {
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Site::MangaLib),
            4 => Some(Site::HentaiLib),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Site::MangaLib => 1,
            Site::HentaiLib => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Site::MangaLib => "MangaLib",
            Site::HentaiLib => "HentaiLib",
        }
    }

    pub fn referer(self) -> &'static str {
        match self {
            Site::MangaLib => "https://mangalib.me/",
            Site::HentaiLib => "https://hentailib.me/",
        }
    }

    /// 图片服务器域名，页面的相对路径直接拼接在后面
    pub fn image_domain(self) -> &'static str {
        match self {
            Site::MangaLib => "https://img33.imgslib.link",
            Site::HentaiLib => "https://img2h.imgslib.link",
        }
    }

    pub fn display_name(id: u32) -> String {
        match Self::from_id(id) {
            Some(site) => site.name().to_string(),
            None => format!("Unknown ({})", id),
        }
    }

    // 元数据请求对未知站点沿用 MangaLib 的 Referer
    pub fn referer_for(id: u32) -> &'static str {
        Self::from_id(id).unwrap_or(Site::MangaLib).referer()
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub rus_name: String,
    pub eng_name: String,
    pub slug_url: String,
    pub cover_url: String,
    pub site_id: u32,
    pub site_name: String,
}

/// 详情接口返回的原始元数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MangaDetails {
    pub title: String,
    pub kind: String,
    pub status: String,
    pub cover_url: String,
    pub rating: String,
}

/// 当前选中的漫画
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaContext {
    pub slug_url: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub cover_url: String,
    pub rating: String,
    pub site: String,
    pub site_id: u32,
    pub referer: String,
}

impl MangaContext {
    pub fn new(slug_url: &str, site_id: u32, details: MangaDetails) -> Self {
        Self {
            slug_url: slug_url.to_string(),
            title: details.title,
            kind: details.kind,
            status: details.status,
            cover_url: details.cover_url,
            rating: details.rating,
            site: Site::display_name(site_id),
            site_id,
            referer: Site::referer_for(site_id).to_string(),
        }
    }
}

// -----------------------------------------------------------------------------------------------

/// 章节记录，未建模的字段原样保留并回传给调用方
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Chapter {
    pub fn new(volume: &str, number: &str) -> Self {
        Self {
            volume: Some(volume.to_string()),
            number: Some(number.to_string()),
            ..Default::default()
        }
    }

    fn sort_key(&self) -> (f64, f64) {
        (
            numeric_or_zero(self.volume.as_deref()),
            numeric_or_zero(self.number.as_deref()),
        )
    }
}

/// 页面描述，`slug` 是页码标签，`url` 是图片的相对路径，`image` 是原始文件名
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(deserialize_with = "string_or_number")]
    pub slug: String,
    pub url: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaptersInfo {
    pub volumes: usize,
    pub chapters: usize,
    pub chapters_list: Vec<Chapter>,
}

impl ChaptersInfo {
    pub fn new(mut chapters: Vec<Chapter>) -> Self {
        let volumes = chapters
            .iter()
            .filter_map(|c| c.volume.as_deref())
            .collect::<HashSet<_>>()
            .len();
        sort_chapters(&mut chapters);

        Self {
            volumes,
            chapters: chapters.len(),
            chapters_list: chapters,
        }
    }
}

/// 按 (卷, 章) 的数值升序排列，缺失或非数字按 0 处理
pub fn sort_chapters(chapters: &mut [Chapter]) {
    chapters.sort_by(|a, b| {
        let (av, ac) = a.sort_key();
        let (bv, bc) = b.sort_key();
        match av.total_cmp(&bv) {
            Ordering::Equal => ac.total_cmp(&bc),
            other => other,
        }
    });
}

fn numeric_or_zero(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

// -----------------------------------------------------------------------------------------------

// 接口里的卷号/章号有时是字符串，有时是数字
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "期望字符串或数字，实际为: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(chapters: &[Chapter]) -> Vec<(String, String)> {
        chapters
            .iter()
            .map(|c| {
                (
                    c.volume.clone().unwrap_or_default(),
                    c.number.clone().unwrap_or_default(),
                )
            })
            .collect()
    }

    #[test]
    fn chapters_sort_numerically() {
        let mut chapters = vec![
            Chapter::new("2", "1"),
            Chapter::new("1", "10"),
            Chapter::new("1", "2"),
        ];
        sort_chapters(&mut chapters);
        assert_eq!(
            order(&chapters),
            vec![
                ("1".to_string(), "2".to_string()),
                ("1".to_string(), "10".to_string()),
                ("2".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn missing_and_garbage_numbers_sort_as_zero() {
        let mut chapters = vec![
            Chapter::new("1", "1"),
            Chapter::new("abc", "5"),
            Chapter {
                volume: None,
                number: Some("3".to_string()),
                ..Default::default()
            },
            Chapter::new("0", "4.5"),
        ];
        sort_chapters(&mut chapters);
        let numbers: Vec<_> = chapters
            .iter()
            .map(|c| c.number.clone().unwrap_or_default())
            .collect();
        assert_eq!(numbers, vec!["3", "4.5", "5", "1"]);
    }

    #[test]
    fn chapter_accepts_numeric_fields_and_keeps_extra() {
        let chapter: Chapter =
            serde_json::from_str(r#"{"id": 42, "volume": 3, "number": "12.5", "name": null}"#)
                .unwrap();
        assert_eq!(chapter.volume.as_deref(), Some("3"));
        assert_eq!(chapter.number.as_deref(), Some("12.5"));
        assert_eq!(chapter.extra.get("id"), Some(&Value::from(42)));
    }

    #[test]
    fn chapters_info_counts_distinct_volumes() {
        let info = ChaptersInfo::new(vec![
            Chapter::new("1", "1"),
            Chapter::new("1", "2"),
            Chapter::new("2", "3"),
            Chapter {
                number: Some("4".to_string()),
                ..Default::default()
            },
        ]);
        assert_eq!(info.volumes, 2);
        assert_eq!(info.chapters, 4);
    }

    #[test]
    fn site_mapping() {
        assert_eq!(Site::from_id(1), Some(Site::MangaLib));
        assert_eq!(Site::from_id(4), Some(Site::HentaiLib));
        assert_eq!(Site::from_id(2), None);
        assert_eq!(Site::HentaiLib.image_domain(), "https://img2h.imgslib.link");
        assert_eq!(Site::display_name(9), "Unknown (9)");
        assert_eq!(Site::referer_for(9), "https://mangalib.me/");
    }

    #[test]
    fn page_slug_may_be_numeric() {
        let page: Page =
            serde_json::from_str(r#"{"slug": 3, "url": "/a/3.png", "image": "3.png"}"#).unwrap();
        assert_eq!(page.slug, "3");
    }
}
