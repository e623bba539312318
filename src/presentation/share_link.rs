//! 可分享的搜索链接 `?search=<关键词>`

use reqwest::Url;

use crate::error::ConfigError;

const SEARCH_PARAM: &str = "search";

/// 解析浏览页面地址
pub fn parse_site_url(site_url: &str) -> Result<Url, ConfigError> {
    Url::parse(site_url).map_err(|_| ConfigError::InvalidValue {
        field: "site_url",
        value: site_url.to_string(),
    })
}

/// 生成带搜索词的链接，搜索词为空时不带参数
///
/// 页面地址上原有的其他参数保留，原有的 `search` 参数被替换
pub fn share_link(site: &Url, query: &str) -> Url {
    let mut url = site.clone();
    let kept: Vec<(String, String)> = site
        .query_pairs()
        .filter(|(k, _)| k != SEARCH_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let query = query.trim();
    if kept.is_empty() && query.is_empty() {
        url.set_query(None);
        return url;
    }

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        if !query.is_empty() {
            pairs.append_pair(SEARCH_PARAM, query);
        }
    }
    url
}

/// 从链接中读取搜索词
pub fn search_query(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == SEARCH_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
