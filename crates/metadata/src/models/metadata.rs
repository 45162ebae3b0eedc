use super::Credit;

/// Bibliographic metadata of a single comic issue, independent of the
/// descriptor format it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericMetadata {
    pub series: Option<String>,
    pub title: Option<String>,
    /// Issue number; kept as text since issues like `0.5` or `1AU` exist.
    pub issue: Option<String>,
    /// Total issues in the series
    pub issue_count: Option<u32>,
    pub volume: Option<u32>,
    pub year: Option<u32>,
    pub publisher: Option<String>,
    pub genre: Vec<String>,
    /// Synopsis or description
    pub comments: Option<String>,
    pub page_count: Option<u32>,
    pub credits: Vec<Credit>,
    pub web_link: Option<String>,
    /// `true` until any field has been populated.
    pub is_empty: bool,
}
impl Default for GenericMetadata {
    fn default() -> Self {
        Self {
            series: None,
            title: None,
            issue: None,
            issue_count: None,
            volume: None,
            year: None,
            publisher: None,
            genre: Vec::new(),
            comments: None,
            page_count: None,
            credits: Vec::new(),
            web_link: None,
            is_empty: true,
        }
    }
}
impl GenericMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any field carries a value, regardless of the `is_empty` flag.
    pub fn has_fields(&self) -> bool {
        self.series.is_some()
            || self.title.is_some()
            || self.issue.is_some()
            || self.issue_count.is_some()
            || self.volume.is_some()
            || self.year.is_some()
            || self.publisher.is_some()
            || !self.genre.is_empty()
            || self.comments.is_some()
            || self.page_count.is_some()
            || !self.credits.is_empty()
            || self.web_link.is_some()
    }

    /// Recompute the `is_empty` flag from the fields.
    pub(crate) fn refresh(mut self) -> Self {
        self.is_empty = !self.has_fields();
        self
    }
}
