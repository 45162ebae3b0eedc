use serde::Deserialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A contributor to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Credit {
    /// Contributor name
    pub person: String,
    /// Free-form role (e.g. "Writer", "Cover Artist")
    pub role: String,
    #[serde(default)]
    pub primary: bool,
}
impl Credit {
    pub fn new(person: impl Into<String>, role: impl Into<String>) -> Self {
        Self { person: person.into(), role: role.into(), primary: false }
    }

    /// The ComicInfo.xml elements this credit is written to. Unrecognised
    /// roles are not representable and map to nothing.
    pub fn elements(&self) -> &'static [&'static str] {
        match self.role.trim().to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "writer" | "plotter" | "scripter" | "author" => &["Writer"],
            "penciller" | "penciler" | "breakdowns" => &["Penciller"],
            "inker" | "finishes" | "inks" => &["Inker"],
            "artist" => &["Penciller", "Inker"],
            "colorist" | "colourist" | "colorer" | "colors" | "colours" => &["Colorist"],
            "letterer" | "letters" => &["Letterer"],
            "coverartist" | "cover" | "covers" | "coverart" => &["CoverArtist"],
            "editor" | "editorinchief" => &["Editor"],
            _ => &[],
        }
    }
}

impl Display for Credit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.person, self.role)
    }
}
