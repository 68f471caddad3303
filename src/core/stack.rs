use crate::types::SlcImage;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Acquisitions of a single burst, one per calendar date
pub type BurstStack<'a> = BTreeMap<NaiveDate, &'a SlcImage>;

/// Burst stacks keyed by provider identity
pub type BurstStacks<'a> = BTreeMap<&'a str, BurstStack<'a>>;

/// Group acquisitions into per-provider, date-indexed burst stacks
///
/// Images are visited in ascending `name` order and only the first image
/// seen for a given (provider, date) pair is kept, so among duplicates the
/// lexicographically smallest name wins. Later duplicates are dropped
/// without error. The input slice is not reordered.
pub fn group_into_stacks(images: &[SlcImage]) -> BurstStacks<'_> {
    let mut sorted: Vec<&SlcImage> = images.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let stacks = sorted.into_iter().fold(BurstStacks::new(), |mut stacks, image| {
        let burst_stack = stacks.entry(image.provider_id.as_str()).or_default();
        let date = image.acquisition_date();
        if burst_stack.contains_key(&date) {
            log::debug!(
                "Dropping duplicate {} for {} on {}",
                image.name,
                image.provider_id,
                date
            );
        } else {
            burst_stack.insert(date, image);
        }
        stacks
    });

    log::info!(
        "Grouped {} images into {} burst stacks",
        images.len(),
        stacks.len()
    );
    stacks
}

/// Ordered acquisition dates of one provider's stack
pub fn stack_dates(stacks: &BurstStacks<'_>, provider_id: &str) -> Vec<NaiveDate> {
    stacks
        .get(provider_id)
        .map(|stack| stack.keys().copied().collect())
        .unwrap_or_default()
}

/// Number of input images that did not make it into any stack
pub fn dropped_duplicates(images: &[SlcImage], stacks: &BurstStacks<'_>) -> usize {
    let kept: usize = stacks.values().map(|stack| stack.len()).sum();
    images.len().saturating_sub(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeoTransform;
    use chrono::{TimeZone, Utc};

    fn image(name: &str, provider: &str, day: u32, hour: u32) -> SlcImage {
        SlcImage {
            name: name.to_string(),
            provider_id: provider.to_string(),
            acquired: Utc.with_ymd_and_hms(2023, 3, day, hour, 0, 0).unwrap(),
            geotrans: GeoTransform::from_gdal([0.0, 5.0, 0.0, 0.0, 0.0, -10.0]),
            x_pixels: 100,
            y_pixels: 50,
        }
    }

    #[test]
    fn test_duplicate_keeps_smallest_name() {
        let images = vec![image("b", "t001_iw1", 4, 6), image("a", "t001_iw1", 4, 18)];
        let stacks = group_into_stacks(&images);

        let stack = &stacks["t001_iw1"];
        assert_eq!(stack.len(), 1);
        let date = NaiveDate::from_ymd_opt(2023, 3, 4).unwrap();
        assert_eq!(stack[&date].name, "a");
        assert_eq!(dropped_duplicates(&images, &stacks), 1);
    }

    #[test]
    fn test_input_order_preserved() {
        let images = vec![image("c", "p", 1, 0), image("a", "p", 2, 0), image("b", "p", 3, 0)];
        let _ = group_into_stacks(&images);

        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_stack_dates_sorted() {
        let images = vec![image("x3", "p", 9, 0), image("x1", "p", 1, 0), image("x2", "p", 5, 0)];
        let stacks = group_into_stacks(&images);

        let dates = stack_dates(&stacks, "p");
        assert_eq!(dates.len(), 3);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert!(stack_dates(&stacks, "missing").is_empty());
    }

    #[test]
    fn test_empty_input() {
        let stacks = group_into_stacks(&[]);
        assert!(stacks.is_empty());
    }
}
