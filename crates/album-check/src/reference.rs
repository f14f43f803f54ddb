// Reference data - Ground truth for the search suites
//
// The album application ships with a fixed set of images. The date suite checks
// rendered results against a synthesized copy of their upload dates; the keyword
// suite checks them against the keywords it tags onto the first album page.
//
// Timestamps are kept as RFC3339 strings and compared lexically. The format is
// fixed-width and zero-padded, so lexical order is chronological order.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

/// Timestamp format used by the album application (`2018-06-01T12:00:00Z`).
pub const RFC3339_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Marker written in place of a date when an identifier is not in the dataset.
pub const MISSING_IMAGE: &str = "No image with given ID";

/// Lower bound substituted for an empty start date (one day before the first image).
pub const START_SENTINEL: &str = "2018-05-31T12:00:00Z";

/// Upper bound substituted for an empty end date (one day after the last image).
pub const END_SENTINEL: &str = "2018-07-20T12:00:00Z";

/// Number of images uploaded per month: June 1-30, July 1-19.
const MONTHS: [(u32, u32); 2] = [(6, 30), (7, 19)];
const YEAR: i32 = 2018;
const UPLOAD_HOUR: u32 = 12;

/// A pre-set image in the album with its upload timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub id: String,
    pub timestamp: String,
}

/// The 49 dated images the date suite verifies against.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    images: Vec<ReferenceImage>,
}

impl ReferenceDataset {
    /// Builds the dataset: one image per day at 12:00:00 UTC, numbered from 1.
    pub fn build() -> Self {
        let mut images = Vec::new();
        let mut next_id = 1u32;

        for (month, days) in MONTHS {
            let Some(first) = first_upload(month) else {
                continue;
            };
            for day in 0..days {
                let at = first + Duration::days(i64::from(day));
                images.push(ReferenceImage {
                    id: next_id.to_string(),
                    timestamp: at.format(RFC3339_FORMAT).to_string(),
                });
                next_id += 1;
            }
        }

        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[ReferenceImage] {
        &self.images
    }

    /// Returns the timestamp of the image with the given identifier.
    pub fn timestamp_of(&self, id: &str) -> Option<&str> {
        self.images
            .iter()
            .find(|image| image.id == id)
            .map(|image| image.timestamp.as_str())
    }
}

fn first_upload(month: u32) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(YEAR, month, 1)?;
    let naive = date.and_hms_opt(UPLOAD_HOUR, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// An inclusive date range with empty bounds already replaced by sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: String,
    end: String,
}

impl DateRange {
    /// Normalizes the raw bounds typed into the search form.
    ///
    /// Only an empty bound is replaced; anything else is compared as typed, so a
    /// malformed bound behaves the same way the application's string filter does.
    pub fn from_bounds(start: &str, end: &str) -> Self {
        let start = if start.is_empty() { START_SENTINEL } else { start };
        let end = if end.is_empty() { END_SENTINEL } else { end };
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn contains(&self, timestamp: &str) -> bool {
        self.start.as_str() <= timestamp && timestamp <= self.end.as_str()
    }
}

/// Keywords tagged onto first-page images before the keyword suite runs.
///
/// Identifiers are also positions on the first album page.
#[derive(Debug, Clone)]
pub struct KeywordIndex {
    entries: BTreeMap<String, Vec<u32>>,
}

impl KeywordIndex {
    /// The fixed index: `aaa` → 0,1,2; `bbb` → 3,4,5; `ccc` → 6,7.
    pub fn standard() -> Self {
        let entries = [("aaa", vec![0, 1, 2]), ("bbb", vec![3, 4, 5]), ("ccc", vec![6, 7])]
            .into_iter()
            .map(|(keyword, ids)| (keyword.to_string(), ids))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids_for(&self, keyword: &str) -> Option<&[u32]> {
        self.entries.get(keyword).map(Vec::as_slice)
    }

    /// True if `id` is tagged with any of `keywords`. Unknown keywords match nothing.
    pub fn matches_any<S: AsRef<str>>(&self, id: u32, keywords: &[S]) -> bool {
        keywords
            .iter()
            .filter_map(|keyword| self.ids_for(keyword.as_ref()))
            .any(|ids| ids.contains(&id))
    }

    /// Iterates `(keyword, position)` pairs in keyword order, for tagging.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries
            .iter()
            .flat_map(|(keyword, ids)| ids.iter().map(move |id| (keyword.as_str(), *id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn parse(timestamp: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(timestamp, RFC3339_FORMAT).unwrap()
    }

    #[test]
    fn test_dataset_has_49_daily_images() {
        let dataset = ReferenceDataset::build();
        assert_eq!(dataset.len(), 49);

        let images = dataset.images();
        assert_eq!(images[0].id, "1");
        assert_eq!(images[0].timestamp, "2018-06-01T12:00:00Z");
        assert_eq!(images[29].id, "30");
        assert_eq!(images[29].timestamp, "2018-06-30T12:00:00Z");
        assert_eq!(images[30].id, "31");
        assert_eq!(images[30].timestamp, "2018-07-01T12:00:00Z");
        assert_eq!(images[48].id, "49");
        assert_eq!(images[48].timestamp, "2018-07-19T12:00:00Z");

        for pair in images.windows(2) {
            let gap = parse(&pair[1].timestamp) - parse(&pair[0].timestamp);
            assert_eq!(gap, Duration::days(1), "gap after image {}", pair[0].id);
            let prev: u32 = pair[0].id.parse().unwrap();
            let next: u32 = pair[1].id.parse().unwrap();
            assert_eq!(next, prev + 1);
        }
    }

    #[test]
    fn test_dataset_is_reproducible() {
        let a = ReferenceDataset::build();
        let b = ReferenceDataset::build();
        assert_eq!(a.images(), b.images());
    }

    #[test]
    fn test_lexical_order_matches_chronological_order() {
        let dataset = ReferenceDataset::build();
        let mut stamps: Vec<&str> = dataset
            .images()
            .iter()
            .map(|image| image.timestamp.as_str())
            .collect();
        stamps.push(START_SENTINEL);
        stamps.push(END_SENTINEL);

        for a in &stamps {
            for b in &stamps {
                assert_eq!(a.cmp(b), parse(a).cmp(&parse(b)), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_timestamp_lookup() {
        let dataset = ReferenceDataset::build();
        assert_eq!(dataset.timestamp_of("12"), Some("2018-06-12T12:00:00Z"));
        assert_eq!(dataset.timestamp_of("35"), Some("2018-07-05T12:00:00Z"));
        assert_eq!(dataset.timestamp_of("0"), None);
        assert_eq!(dataset.timestamp_of("50"), None);
        assert_eq!(dataset.timestamp_of("abc"), None);
    }

    #[test]
    fn test_empty_bounds_cover_every_image() {
        let dataset = ReferenceDataset::build();
        let range = DateRange::from_bounds("", "");
        assert_eq!(range.start(), START_SENTINEL);
        assert_eq!(range.end(), END_SENTINEL);
        assert!(
            dataset
                .images()
                .iter()
                .all(|image| range.contains(&image.timestamp))
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = DateRange::from_bounds("2018-06-10T12:00:00Z", "2018-06-12T12:00:00Z");
        assert!(!range.contains("2018-06-09T12:00:00Z"));
        assert!(range.contains("2018-06-10T12:00:00Z"));
        assert!(range.contains("2018-06-11T12:00:00Z"));
        assert!(range.contains("2018-06-12T12:00:00Z"));
        assert!(!range.contains("2018-06-13T12:00:00Z"));
    }

    #[test]
    fn test_keyword_index() {
        let index = KeywordIndex::standard();
        assert_eq!(index.len(), 3);
        assert_eq!(index.ids_for("aaa"), Some(&[0, 1, 2][..]));
        assert_eq!(index.ids_for("ccc"), Some(&[6, 7][..]));
        assert_eq!(index.ids_for("ddd"), None);

        assert!(index.matches_any(4, &["aaa", "bbb"]));
        assert!(!index.matches_any(4, &["aaa"]));
        assert!(!index.matches_any(0, &["zzz"]));
        assert!(!index.matches_any(9, &["aaa", "bbb", "ccc"]));
    }

    #[test]
    fn test_keyword_assignments_in_keyword_order() {
        let index = KeywordIndex::standard();
        let assignments: Vec<(&str, u32)> = index.assignments().collect();
        assert_eq!(assignments.len(), 8);
        assert_eq!(assignments[0], ("aaa", 0));
        assert_eq!(assignments[3], ("bbb", 3));
        assert_eq!(assignments[7], ("ccc", 7));
    }
}
