// ABOUTME: Academy courses and their exclusively-owned lessons.
// ABOUTME: Lessons live inside Course.lessons and cannot outlive the course that holds them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::users::UserProgress;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Mastery,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseCategory {
    #[default]
    Theology,
    Prophecy,
    Leadership,
    Culture,
    Family,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Pdf,
    Link,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonResource {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub youtube_id: String,
    /// Free-form, e.g. "15 min".
    pub duration: String,
    /// Rich text.
    pub notes: String,
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<LessonResource>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub instructor: String,
    pub description: String,
    pub thumbnail: String,
    pub level: CourseLevel,
    pub category: CourseCategory,
    /// "0" for free.
    pub price: String,
    pub status: CourseStatus,
    pub lessons: Vec<Lesson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }

    /// Percentage of this course's lessons found in `progress`, rounded.
    /// A course with no lessons reports 0.
    pub fn completion_percent(&self, progress: &UserProgress) -> u8 {
        if self.lessons.is_empty() {
            return 0;
        }
        let done = self
            .lessons
            .iter()
            .filter(|l| progress.has_completed(&l.id))
            .count();
        ((done as f64 / self.lessons.len() as f64) * 100.0).round() as u8
    }

    /// True once every lesson is complete. Empty courses are never complete.
    pub fn is_complete_for(&self, progress: &UserProgress) -> bool {
        !self.lessons.is_empty() && self.lessons.iter().all(|l| progress.has_completed(&l.id))
    }

    /// Lesson that follows `lesson_id` in display order, if any.
    pub fn next_lesson_after(&self, lesson_id: &str) -> Option<&Lesson> {
        let mut ordered: Vec<&Lesson> = self.lessons.iter().collect();
        ordered.sort_by_key(|l| l.order);
        let idx = ordered.iter().position(|l| l.id == lesson_id)?;
        ordered.get(idx + 1).copied()
    }
}
