//! Grouping and navigation over an album's photos.

use serde::Serialize;

use crate::db::Photo;

const UNKNOWN_DAY: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
pub struct DayGroup {
    pub key: String,
    pub photos: Vec<Photo>,
}

/// Key a photo is grouped under: its day label, else its capture date.
pub fn group_key(photo: &Photo) -> String {
    match (&photo.day_label, photo.created_at) {
        (Some(label), _) if !label.is_empty() => label.clone(),
        (_, Some(taken)) => taken.date().format("%Y-%m-%d").to_string(),
        _ => UNKNOWN_DAY.to_string(),
    }
}

/// Bucket photos by [`group_key`], groups sorted by key. Photos keep their
/// incoming order inside a group.
pub fn group_by_day(photos: Vec<Photo>) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for photo in photos {
        let key = group_key(&photo);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.photos.push(photo),
            None => groups.push(DayGroup {
                key,
                photos: vec![photo],
            }),
        }
    }
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

/// The sequence a single photo is viewed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewContext {
    All,
    Day(String),
}

impl ViewContext {
    /// `day:<label>` selects one day; anything else means the whole album.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.and_then(|r| r.strip_prefix("day:")) {
            Some(label) if !label.is_empty() => ViewContext::Day(label.to_string()),
            _ => ViewContext::All,
        }
    }

    pub fn day_label(&self) -> Option<&str> {
        match self {
            ViewContext::All => None,
            ViewContext::Day(label) => Some(label),
        }
    }
}

/// Previous and next ids around `current`. A photo outside the sequence is
/// treated as if it stood first.
pub fn neighbours(ids: &[i64], current: i64) -> (Option<i64>, Option<i64>) {
    let index = ids.iter().position(|&id| id == current).unwrap_or(0);
    let prev = index.checked_sub(1).and_then(|i| ids.get(i)).copied();
    let next = ids.get(index + 1).copied();
    (prev, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn photo(id: i64, day_label: Option<&str>, taken: Option<(i32, u32, u32)>) -> Photo {
        Photo {
            id,
            album_id: 1,
            file_path: format!("/photos/{id}.jpg"),
            filename: format!("{id}.jpg"),
            day_label: day_label.map(str::to_string),
            user_title: None,
            user_description: None,
            created_at: taken.and_then(|(y, m, d)| {
                NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(12, 0, 0))
            }),
            gps_lat: None,
            gps_lon: None,
        }
    }

    #[test]
    fn test_group_by_day() {
        let groups = group_by_day(vec![
            photo(1, None, None),
            photo(2, Some("day2"), Some((2024, 5, 2))),
            photo(3, None, Some((2024, 5, 1))),
            photo(4, Some("day1"), None),
            photo(5, Some("day2"), None),
            photo(6, Some(""), Some((2024, 5, 1))),
        ]);

        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-05-01", "Unknown", "day1", "day2"]);

        let ids = |key: &str| -> Vec<i64> {
            groups
                .iter()
                .find(|g| g.key == key)
                .map(|g| g.photos.iter().map(|p| p.id).collect())
                .unwrap_or_default()
        };
        assert_eq!(ids("2024-05-01"), vec![3, 6]);
        assert_eq!(ids("day2"), vec![2, 5]);
        assert_eq!(ids("Unknown"), vec![1]);
    }

    #[test]
    fn test_group_by_day_empty() {
        assert!(group_by_day(Vec::new()).is_empty());
    }

    #[test]
    fn test_view_context() {
        assert_eq!(ViewContext::parse(None), ViewContext::All);
        assert_eq!(ViewContext::parse(Some("all")), ViewContext::All);
        assert_eq!(ViewContext::parse(Some("day:")), ViewContext::All);
        assert_eq!(
            ViewContext::parse(Some("day:trip/morning")),
            ViewContext::Day("trip/morning".to_string())
        );
        assert_eq!(ViewContext::parse(Some("day:x")).day_label(), Some("x"));
    }

    #[test]
    fn test_neighbours() {
        let ids = [10, 20, 30];
        assert_eq!(neighbours(&ids, 10), (None, Some(20)));
        assert_eq!(neighbours(&ids, 20), (Some(10), Some(30)));
        assert_eq!(neighbours(&ids, 30), (Some(20), None));
        assert_eq!(neighbours(&ids, 99), (None, Some(20)));
        assert_eq!(neighbours(&[], 1), (None, None));
        assert_eq!(neighbours(&[7], 7), (None, None));
    }
}
