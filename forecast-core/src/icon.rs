//! Condition code to display-icon lookup.
//!
//! Codes follow the OpenWeatherMap icon scheme: two digits for the condition
//! and a `d`/`n` suffix for day or night.

const ICON_MAPPINGS: &[(&str, &str)] = &[
    ("01d", "wb_sunny"),
    ("02d", "wb_cloudy"),
    ("03d", "cloud"),
    ("04d", "cloud_queue"),
    ("09d", "umbrella"),
    ("10d", "beach_access"),
    ("11d", "flash_on"),
    ("13d", "ac_unit"),
    ("50d", "blur_on"),
    ("01n", "night_clear"),
    ("02n", "night_cloudy"),
    ("03n", "night_cloud"),
    ("04n", "night_cloud_queue"),
    ("09n", "night_showers"),
    ("10n", "night_rain"),
    ("11n", "night_thunderstorm"),
    ("13n", "night_snow"),
    ("50n", "night_fog"),
];

/// Map a condition code to its icon identifier.
///
/// Returns `None` for codes outside the known set; callers render without an
/// icon in that case.
pub fn map_condition_to_icon(code: &str) -> Option<&'static str> {
    ICON_MAPPINGS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, icon)| *icon)
}

/// All known condition codes.
pub fn known_codes() -> impl Iterator<Item = &'static str> {
    ICON_MAPPINGS.iter().map(|(code, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_code_has_a_non_empty_icon() {
        assert_eq!(known_codes().count(), 18);
        for code in known_codes() {
            let icon = map_condition_to_icon(code).expect("known code must map");
            assert!(!icon.is_empty(), "empty icon for {code}");
        }
    }

    #[test]
    fn day_and_night_variants_differ() {
        assert_eq!(map_condition_to_icon("01d"), Some("wb_sunny"));
        assert_eq!(map_condition_to_icon("01n"), Some("night_clear"));
        assert_eq!(map_condition_to_icon("50n"), Some("night_fog"));
    }

    #[test]
    fn unknown_codes_are_absent() {
        assert_eq!(map_condition_to_icon(""), None);
        assert_eq!(map_condition_to_icon("rain"), None);
        assert_eq!(map_condition_to_icon("01D"), None);
        assert_eq!(map_condition_to_icon("99x"), None);
    }
}
