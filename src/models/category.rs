use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::question::deserialize_id;

/// 分类（`categories` 表的一行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// 带题目数量的分类，数量在读取时统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub question_count: usize,
}

/// 关联查询 `categories(name)` 的结果
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryNameRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// 分类名称 → 分类 ID 查找表
///
/// 名称精确匹配，区分大小写
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    by_name: HashMap<String, String>,
}

impl CategoryLookup {
    pub fn from_categories<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Self {
        let by_name = categories
            .into_iter()
            .map(|c| (c.name.clone(), c.id.clone()))
            .collect();
        Self { by_name }
    }

    /// 解析分类名称，返回分类 ID
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// 已知分类名称（按字母排序）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// 按分类 ID 统计题目数量
///
/// 没有题目的分类数量为 0，指向未知分类的 ID 被忽略
pub fn count_questions<S: AsRef<str>>(
    categories: Vec<Category>,
    question_category_ids: &[S],
) -> Vec<CategoryWithCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for id in question_category_ids {
        *counts.entry(id.as_ref()).or_insert(0) += 1;
    }

    categories
        .into_iter()
        .map(|category| {
            let question_count = counts.get(category.id.as_str()).copied().unwrap_or(0);
            CategoryWithCount {
                category,
                question_count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            logo_url: None,
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let categories = vec![category("1", "React"), category("2", "CSS")];
        let lookup = CategoryLookup::from_categories(&categories);

        assert_eq!(lookup.resolve("React"), Some("1"));
        assert_eq!(lookup.resolve("react"), None);
        assert_eq!(lookup.names(), vec!["CSS", "React"]);
    }

    #[test]
    fn test_count_questions_per_category() {
        let categories = vec![category("1", "React"), category("2", "CSS"), category("3", "HTML")];
        let ids = ["1", "1", "2", "9"];

        let counted = count_questions(categories, &ids);
        let counts: Vec<(&str, usize)> = counted
            .iter()
            .map(|c| (c.category.name.as_str(), c.question_count))
            .collect();
        assert_eq!(counts, vec![("React", 2), ("CSS", 1), ("HTML", 0)]);
    }
}
