// ABOUTME: Display orderings the public pages apply to collections, plus YouTube URL parsing.
// ABOUTME: Consumers sort after loading; stored order is whatever the admin panel last saved.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::{Announcement, Devotional, Lesson, Priority, StaffMember};

/// Urgent bulletins first, then newest first.
pub fn sort_announcements(items: &mut [Announcement]) {
    items.sort_by(|a, b| match (a.priority, b.priority) {
        (Priority::Urgent, Priority::Normal) => Ordering::Less,
        (Priority::Normal, Priority::Urgent) => Ordering::Greater,
        _ => b.timestamp.cmp(&a.timestamp),
    });
}

/// Newest date first. Undated or unparseable entries sink to the end.
pub fn sort_devotionals(items: &mut [Devotional]) {
    items.sort_by(|a, b| {
        let da = NaiveDate::parse_from_str(&a.date, "%Y-%m-%d").ok();
        let db = NaiveDate::parse_from_str(&b.date, "%Y-%m-%d").ok();
        match (da, db) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

pub fn sort_staff(items: &mut [StaffMember]) {
    items.sort_by_key(|s| s.order);
}

pub fn sort_lessons(items: &mut [Lesson]) {
    items.sort_by_key(|l| l.order);
}

const YOUTUBE_ID_LEN: usize = 11;

/// Pull the 11-character video id out of the common YouTube URL shapes
/// (`youtu.be/ID`, `/embed/ID`, `/v/ID`, `watch?v=ID`, `&v=ID`).
pub fn extract_youtube_id(url: &str) -> Option<String> {
    const MARKERS: [&str; 6] = ["youtu.be/", "/embed/", "/v/", "watch?v=", "&v=", "/shorts/"];

    let url = url.trim();
    for marker in MARKERS {
        if let Some(pos) = url.find(marker) {
            let rest = &url[pos + marker.len()..];
            let id: String = rest
                .chars()
                .take_while(|c| !matches!(c, '#' | '&' | '?' | '/'))
                .collect();
            if id.len() == YOUTUBE_ID_LEN
                && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Some(id);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann(id: &str, priority: Priority, timestamp: i64) -> Announcement {
        Announcement {
            id: id.to_string(),
            priority,
            timestamp,
            ..Announcement::default()
        }
    }

    #[test]
    fn urgent_first_even_when_older() {
        let mut items = vec![ann("2", Priority::Normal, 200), ann("1", Priority::Urgent, 100)];
        sort_announcements(&mut items);
        let ids: Vec<&str> = items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn newest_first_within_priority() {
        let mut items = vec![
            ann("old", Priority::Normal, 1),
            ann("urgent-old", Priority::Urgent, 5),
            ann("new", Priority::Normal, 9),
            ann("urgent-new", Priority::Urgent, 7),
        ];
        sort_announcements(&mut items);
        let ids: Vec<&str> = items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["urgent-new", "urgent-old", "new", "old"]);
    }

    #[test]
    fn devotionals_newest_date_first() {
        let dev = |id: &str, date: &str| Devotional {
            id: id.to_string(),
            date: date.to_string(),
            ..Devotional::default()
        };
        let mut items = vec![dev("a", "2024-01-02"), dev("b", "not a date"), dev("c", "2024-03-01")];
        sort_devotionals(&mut items);
        let ids: Vec<&str> = items.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn youtube_ids_from_common_urls() {
        let cases = [
            ("https://youtu.be/Y2PblkqFaZE", Some("Y2PblkqFaZE")),
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10", Some("dQw4w9WgXcQ")),
            ("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1", Some("dQw4w9WgXcQ")),
            ("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://www.youtube.com/watch?v=short", None),
            ("https://example.org/video.mp4", None),
        ];
        for (url, expected) in cases {
            assert_eq!(extract_youtube_id(url).as_deref(), expected, "url: {}", url);
        }
    }
}
