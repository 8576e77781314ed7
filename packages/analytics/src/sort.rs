//! Canonical row ordering: project name, then apartment type rank.

use std::cmp::Ordering;

use realty_dash_analytics_models::Row;
use realty_dash_market_models::RoomKey;

/// Collation key for project names: case-folded, with `ё` treated as `е`
/// the way Russian dictionaries order them.
fn collation_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect()
}

/// Locale-aware comparison of project names. Falls back to the raw
/// strings so that distinct names never compare equal.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Orders `(project, room)` pairs by project name, then canonical room
/// rank (`studio < 1-room < … < 4plus < unknown`).
#[must_use]
pub fn compare_keys(a: (&str, &RoomKey), b: (&str, &RoomKey)) -> Ordering {
    compare_names(a.0, b.0).then_with(|| a.1.cmp(b.1))
}

/// Compares two rows by their natural key.
#[must_use]
pub fn compare_rows(a: &Row, b: &Row) -> Ordering {
    compare_keys((&a.project, &a.room), (&b.project, &b.room))
}

/// Sorts rows in place into canonical order.
pub fn sort_rows(rows: &mut [Row]) {
    rows.sort_by(compare_rows);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use realty_dash_market_models::RoomType;

    fn row(project: &str, room: &str) -> Row {
        Row {
            project: project.to_string(),
            room: RoomKey::normalize(room),
            values: BTreeMap::new(),
        }
    }

    fn keys(rows: &[Row]) -> Vec<(String, String)> {
        rows.iter()
            .map(|r| (r.project.clone(), r.room.to_string()))
            .collect()
    }

    #[test]
    fn sorts_by_project_then_room_rank() {
        let mut rows = vec![
            row("Beta", "2-room"),
            row("Alpha", "4+-room"),
            row("Alpha", "Studio"),
            row("Beta", "studio"),
            row("Alpha", "loft"),
            row("Alpha", "1-room"),
        ];
        sort_rows(&mut rows);

        assert_eq!(
            keys(&rows),
            [
                ("Alpha".to_string(), "studio".to_string()),
                ("Alpha".to_string(), "1-room".to_string()),
                ("Alpha".to_string(), "4plus".to_string()),
                ("Alpha".to_string(), "loft".to_string()),
                ("Beta".to_string(), "studio".to_string()),
                ("Beta".to_string(), "2-room".to_string()),
            ]
        );
    }

    #[test]
    fn sorting_twice_is_stable() {
        let mut rows = vec![
            row("Ёлки", "2-room"),
            row("елки парк", "studio"),
            row("Азимут", "3-room"),
            row("азимут", "1-room"),
        ];
        sort_rows(&mut rows);
        let first = keys(&rows);
        sort_rows(&mut rows);
        assert_eq!(first, keys(&rows));
    }

    #[test]
    fn names_collate_case_insensitively() {
        assert_eq!(compare_names("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_names("Ёлки", "Жук"), Ordering::Less);
        assert_ne!(compare_names("Alpha", "alpha"), Ordering::Equal);
    }

    #[test]
    fn unknown_rooms_sort_last() {
        let studio = RoomKey::Known(RoomType::Studio);
        let other = RoomKey::Other("aaa".to_string());
        assert_eq!(
            compare_keys(("A", &other), ("A", &studio)),
            Ordering::Greater
        );
    }
}
