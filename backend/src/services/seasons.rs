//! Seasons offered by the season picker.

/// Selectable seasons, oldest first.
pub const SEASONS: &[&str] = &[
    "2018-19", "2019-20", "2020-21", "2021-22", "2022-23", "2023-24", "2024-25",
];

pub fn list_seasons() -> Vec<String> {
    SEASONS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seasons_are_ordered_and_complete() {
        let seasons = list_seasons();
        assert_eq!(seasons.len(), 7);
        assert_eq!(seasons.first().map(String::as_str), Some("2018-19"));
        assert_eq!(seasons.last().map(String::as_str), Some("2024-25"));
        assert!(seasons.windows(2).all(|w| w[0] < w[1]));
    }
}
