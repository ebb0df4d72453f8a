use crate::news::Article;
use serde::{Deserialize, Serialize};

/// The warehouse-bound projection of an [`Article`].
///
/// Serializes to exactly `title`, `description` and `url`; missing values are
/// written as `null`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl From<&Article> for Row {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            url: article.url.clone(),
        }
    }
}

/// Projects every article to a row, keeping count and order.
pub fn to_rows(articles: &[Article]) -> Vec<Row> {
    articles.iter().map(Row::from).collect()
}
