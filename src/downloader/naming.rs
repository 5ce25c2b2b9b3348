use std::path::Path;

use crate::common::models::Page;

const DEFAULT_EXTENSION: &str = ".jpg";

// 替换路径中不能出现的字符
pub fn sanitize_component(value: &str) -> String {
    let sanitized: String = value
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match sanitized.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => sanitized,
    }
}

/// 章节目录名：`<标题>_Vol_<卷>_Ch_<章>`
pub fn chapter_folder_name(title: &str, volume: &str, chapter: &str) -> String {
    format!(
        "{}_Vol_{}_Ch_{}",
        sanitize_component(title),
        sanitize_component(volume),
        sanitize_component(chapter)
    )
}

/// 原始文件名的扩展名（带点），没有时用 .jpg
pub fn page_extension(image: &str) -> String {
    Path::new(image)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// 页面文件名：`page_<页码><扩展名>`
pub fn page_file_name(page: &Page) -> String {
    format!(
        "page_{}{}",
        sanitize_component(&page.slug),
        page_extension(&page.image)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(slug: &str, image: &str) -> Page {
        Page {
            slug: slug.to_string(),
            url: format!("/x/{}", image),
            image: image.to_string(),
        }
    }

    #[test]
    fn folder_name_is_deterministic() {
        assert_eq!(
            chapter_folder_name("Ван Пис", "1", "10"),
            "Ван Пис_Vol_1_Ch_10"
        );
        assert_eq!(
            chapter_folder_name("Fate/Zero: Part?", "2", "3.5"),
            "Fate_Zero_ Part__Vol_2_Ch_3.5"
        );
    }

    #[test]
    fn hostile_components_do_not_escape() {
        assert_eq!(sanitize_component(".."), "_");
        assert_eq!(sanitize_component("  "), "_");
        assert_eq!(sanitize_component("../etc"), ".._etc");
    }

    #[test]
    fn page_names_keep_original_extension() {
        assert_eq!(page_file_name(&page("1", "01.png")), "page_1.png");
        assert_eq!(page_file_name(&page("2", "scan.webp")), "page_2.webp");
        assert_eq!(page_file_name(&page("3", "noext")), "page_3.jpg");
        assert_eq!(page_file_name(&page("4", "")), "page_4.jpg");
    }
}
