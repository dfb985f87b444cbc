//! Test-entry filtering for city lists.

/// Marker the upstream puts in city names of test broadcasts ("test" in Hebrew).
pub const DEFAULT_TEST_MARKER: &str = "בדיקה";

/// Trim city names and drop test entries and blanks, preserving order.
///
/// An empty `marker` disables test filtering.
pub fn filter_test_cities<I, S>(cities: I, marker: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cities
        .into_iter()
        .map(|city| city.as_ref().trim().to_string())
        .filter(|city| !city.is_empty())
        .filter(|city| marker.is_empty() || !city.contains(marker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_marker_entries() {
        let cities = vec!["Test City בדיקה", " חיפה ", "בדיקה"];
        assert_eq!(filter_test_cities(cities, DEFAULT_TEST_MARKER), vec!["חיפה"]);
    }

    #[test]
    fn test_all_test_entries_yield_empty() {
        let cities = vec!["בדיקה 1", "בדיקה 2"];
        assert!(filter_test_cities(cities, DEFAULT_TEST_MARKER).is_empty());
    }

    #[test]
    fn test_order_preserved_and_blanks_removed() {
        let cities = vec!["b", "", "a", "  "];
        assert_eq!(filter_test_cities(cities, DEFAULT_TEST_MARKER), vec!["b", "a"]);
    }

    #[test]
    fn test_empty_marker_keeps_everything() {
        let cities = vec!["בדיקה"];
        assert_eq!(filter_test_cities(cities, ""), vec!["בדיקה"]);
    }
}
