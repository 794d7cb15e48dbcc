// ABOUTME: Editorial content types: bulletins, devotionals, store books, study videos, worship songs.
// ABOUTME: Study categories double as the label set returned by the content-analysis service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

/// A bulletin shown on the announcements page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub priority: Priority,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// Stored fields without a typed counterpart, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Devotional {
    pub id: String,
    pub title: String,
    pub series: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub yt_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: String,
    pub cover_image: String,
    pub epub_url: String,
    pub pdf_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Category label of a bible-study video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyCategory {
    Theology,
    Evangelism,
    Youth,
    Family,
    Worship,
    Prophecy,
    #[default]
    General,
}

impl StudyCategory {
    pub const ALL: [StudyCategory; 7] = [
        StudyCategory::Theology,
        StudyCategory::Evangelism,
        StudyCategory::Youth,
        StudyCategory::Family,
        StudyCategory::Worship,
        StudyCategory::Prophecy,
        StudyCategory::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StudyCategory::Theology => "Theology",
            StudyCategory::Evangelism => "Evangelism",
            StudyCategory::Youth => "Youth",
            StudyCategory::Family => "Family",
            StudyCategory::Worship => "Worship",
            StudyCategory::Prophecy => "Prophecy",
            StudyCategory::General => "General",
        }
    }
}

impl fmt::Display for StudyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        StudyCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == trimmed)
            .ok_or_else(|| format!("unknown study category: {}", trimmed))
    }
}

/// A bible-study teaching video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub youtube_id: String,
    pub category: StudyCategory,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorshipSong {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub key: String,
    pub tempo: String,
    pub lyrics: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chord_chart_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
