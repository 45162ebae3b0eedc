use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(YEAR_REGEX, r"\d{4}");
regex!(NON_DIGIT_REGEX, r"[^0-9]");

/// Root element of a ComicInfo.xml document.
pub(crate) const COMIC_INFO: &str = "ComicInfo";

pub(crate) const TITLE: &str = "Title";
pub(crate) const SERIES: &str = "Series";
pub(crate) const NUMBER: &str = "Number";
pub(crate) const COUNT: &str = "Count";
pub(crate) const VOLUME: &str = "Volume";
pub(crate) const SUMMARY: &str = "Summary";
pub(crate) const YEAR: &str = "Year";
pub(crate) const PUBLISHER: &str = "Publisher";
pub(crate) const GENRE: &str = "Genre";
pub(crate) const WEB: &str = "Web";
pub(crate) const PAGE_COUNT: &str = "PageCount";

/// Credit elements, in the order they are written.
pub(crate) const CREDIT_ELEMENTS: [&str; 7] = ["Writer", "Penciller", "Inker", "Colorist", "Letterer", "CoverArtist", "Editor"];
