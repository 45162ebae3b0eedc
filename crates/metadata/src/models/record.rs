use super::{Credit, GenericMetadata};
use serde::{Deserialize, Deserializer};

/// An issue as returned by an external metadata lookup, in its wire format.
///
/// Blank descriptions and page counts are treated as absent when converting
/// into [`GenericMetadata`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IssueRecord {
    /// Series name
    pub name: String,
    #[serde(rename = "issueName")]
    pub issue_name: String,
    #[serde(rename = "issueNumber")]
    pub issue_number: String,
    pub publisher: String,
    pub description: String,
    #[serde(deserialize_with = "lenient_count")]
    pub page_count: Option<u32>,
    pub credits: Vec<Credit>,
    #[serde(rename = "issueLink")]
    pub issue_link: String,
    pub genres: Vec<String>,
}

impl From<IssueRecord> for GenericMetadata {
    fn from(record: IssueRecord) -> Self {
        let non_blank = |s: String| Some(s).filter(|s| !s.trim().is_empty());
        GenericMetadata {
            series: non_blank(record.name),
            title: non_blank(record.issue_name),
            issue: non_blank(record.issue_number),
            publisher: non_blank(record.publisher),
            comments: non_blank(record.description),
            page_count: record.page_count,
            credits: record.credits,
            web_link: non_blank(record.issue_link),
            genre: record.genres,
            // A lookup result is authoritative even when sparse.
            is_empty: false,
            ..GenericMetadata::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u32),
    Text(String),
}

/// Page counts arrive as numbers, numeric strings, or empty strings.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Number(n)) => Some(n),
        Some(Count::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
