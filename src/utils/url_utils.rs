// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &str, path: &str) -> Result<String, ParseError> {
    let base = Url::parse(base_url)?;
    Ok(base.join(path)?.into())
}

/// 从URL中提取站点域名（即漫画的page字段）
pub fn page_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_url() {
        assert_eq!(
            resolve_url("http://example.com/a/b", "http://t.co/c").unwrap(),
            "http://t.co/c"
        );
    }

    #[test]
    fn test_resolve_protocol_relative_url() {
        assert_eq!(
            resolve_url("https://example.com/a/b", "//t.co/c").unwrap(),
            "https://t.co/c"
        );
    }

    #[test]
    fn test_resolve_root_relative_url() {
        assert_eq!(
            resolve_url("http://example.com/a/b", "/c").unwrap(),
            "http://example.com/c"
        );
    }

    #[test]
    fn test_resolve_relative_url() {
        assert_eq!(
            resolve_url("http://example.com/a/b", "c").unwrap(),
            "http://example.com/a/c"
        );
    }

    #[test]
    fn test_page_of() {
        assert_eq!(
            page_of("https://comic.naver.com/webtoon/list?titleId=1").unwrap(),
            "comic.naver.com"
        );
        assert!(page_of("not a url").is_none());
    }
}
