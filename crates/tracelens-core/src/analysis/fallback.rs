//! Synthetic placeholder data.
//!
//! Produced whenever an upstream model is unavailable or answers with
//! something unusable. Shapes match the model-backed results exactly.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

use super::model::{
    Anomaly, ContentAnalysis, DemographicShare, PlatformShare, RelatedContentItem, Severity,
    SpreadAnalysis, SpreadData, SpreadPattern, TimelinePoint,
};

/// Content types the fallback classifier picks from.
pub const FALLBACK_CONTENT_TYPES: [&str; 2] = ["Article", "Social Media Post"];

/// Content type used when the model omits one.
pub const DEFAULT_CONTENT_TYPE: &str = "Article";

/// Furthest a fabricated first-seen timestamp reaches back (~116 days).
pub const MAX_FIRST_SEEN_AGE_MS: i64 = 10_000_000_000;

pub const PLATFORMS: [&str; 5] = ["Twitter", "Facebook", "Reddit", "Instagram", "TikTok"];

pub const AGE_BRACKETS: [&str; 5] = ["18-24", "25-34", "35-44", "45-54", "55+"];

pub const ANOMALY_DESCRIPTIONS: [&str; 3] = [
    "Unusual spike in sharing activity",
    "Coordinated posting pattern detected",
    "High proportion of newly created accounts",
];

/// Related-content fallback: URL plus the similarity range it is drawn from.
pub const FALLBACK_RELATED: [(&str, u32, u32); 3] = [
    ("https://example.com/similar-article-1", 85, 100),
    ("https://example.org/related-story", 70, 90),
    ("https://example.net/possible-source", 60, 90),
];

const TIMELINE_DAYS: i64 = 7;
const SEVERITIES: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

/// Uniform whole-number score in [0, 100).
pub fn ai_probability<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.random_range(0..100u32))
}

/// Default similarity for a model-listed item that omits one: [70, 100).
pub fn similarity<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.random_range(70..100u32))
}

/// A timestamp somewhere in the ~116 days before `now`.
pub fn first_seen<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> String {
    let age = Duration::milliseconds(rng.random_range(0..MAX_FIRST_SEEN_AGE_MS));
    (now - age).to_rfc3339()
}

/// Fully randomized classification.
pub fn content_analysis<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> ContentAnalysis {
    let content_type = FALLBACK_CONTENT_TYPES
        .choose(&mut *rng)
        .copied()
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    ContentAnalysis {
        content_type: content_type.to_string(),
        first_seen: first_seen(rng, now),
        ai_probability: ai_probability(rng),
    }
}

/// Fabricated spread report for the week ending `today`.
pub fn spread_analysis<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> SpreadAnalysis {
    let spread_pattern = if rng.random_bool(0.5) {
        SpreadPattern::Viral
    } else {
        SpreadPattern::Gradual
    };

    let timeline = (0..TIMELINE_DAYS)
        .rev()
        .map(|days_ago| TimelinePoint {
            date: (today - Duration::days(days_ago)).format("%Y-%m-%d").to_string(),
            shares: rng.random_range(0..1000),
        })
        .collect();

    let platforms = PLATFORMS
        .iter()
        .map(|name| PlatformShare {
            name: name.to_string(),
            shares: rng.random_range(0..5000),
        })
        .collect();

    // Percentages are independent draws; they do not sum to 100.
    let demographics = AGE_BRACKETS
        .iter()
        .map(|age| DemographicShare {
            age: age.to_string(),
            percentage: f64::from(rng.random_range(0..30u32)),
        })
        .collect();

    let anomalies = ANOMALY_DESCRIPTIONS
        .iter()
        .map(|description| Anomaly {
            description: description.to_string(),
            severity: *SEVERITIES.choose(&mut *rng).unwrap_or(&Severity::Low),
        })
        .collect();

    SpreadAnalysis {
        spread_pattern,
        spread_data: SpreadData {
            timeline,
            platforms,
            demographics,
        },
        anomalies,
    }
}

/// The three fixed related-content entries with randomized scores.
pub fn related_content<R: Rng + ?Sized>(rng: &mut R) -> Vec<RelatedContentItem> {
    FALLBACK_RELATED
        .iter()
        .map(|(url, low, high)| RelatedContentItem {
            url: url.to_string(),
            similarity: f64::from(rng.random_range(*low..*high)),
            ai_probability: ai_probability(rng),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_content_analysis_ranges() {
        let now = Utc::now();
        let mut rng = rng();
        for _ in 0..200 {
            let analysis = content_analysis(&mut rng, now);
            assert!(FALLBACK_CONTENT_TYPES.contains(&analysis.content_type.as_str()));
            assert!((0.0..100.0).contains(&analysis.ai_probability));

            let seen = DateTime::parse_from_rfc3339(&analysis.first_seen).unwrap();
            let age = now.signed_duration_since(seen.with_timezone(&Utc));
            assert!(age >= Duration::zero());
            assert!(age < Duration::milliseconds(MAX_FIRST_SEEN_AGE_MS));
        }
    }

    #[test]
    fn test_both_content_types_occur() {
        let now = Utc::now();
        let mut rng = rng();
        let types: Vec<String> = (0..100)
            .map(|_| content_analysis(&mut rng, now).content_type)
            .collect();
        assert!(types.iter().any(|t| t == "Article"));
        assert!(types.iter().any(|t| t == "Social Media Post"));
    }

    #[test]
    fn test_spread_analysis_shape() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let spread = spread_analysis(&mut rng(), today);

        let dates: Vec<&str> = spread.spread_data.timeline.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2026-03-04", "2026-03-05", "2026-03-06", "2026-03-07", "2026-03-08", "2026-03-09", "2026-03-10"]
        );

        let platforms: Vec<&str> = spread.spread_data.platforms.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(platforms, PLATFORMS.to_vec());

        let ages: Vec<&str> = spread.spread_data.demographics.iter().map(|d| d.age.as_str()).collect();
        assert_eq!(ages, AGE_BRACKETS.to_vec());
        assert!(spread
            .spread_data
            .demographics
            .iter()
            .all(|d| (0.0..=100.0).contains(&d.percentage)));

        let descriptions: Vec<&str> = spread.anomalies.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(descriptions, ANOMALY_DESCRIPTIONS.to_vec());
    }

    #[test]
    fn test_related_content_tiers() {
        let mut rng = rng();
        for _ in 0..200 {
            let related = related_content(&mut rng);
            assert_eq!(related.len(), 3);
            for (item, (url, low, high)) in related.iter().zip(FALLBACK_RELATED.iter()) {
                assert_eq!(item.url, *url);
                assert!(item.similarity >= f64::from(*low) && item.similarity < f64::from(*high));
                assert!((0.0..100.0).contains(&item.ai_probability));
            }
        }
    }

    #[test]
    fn test_similarity_default_range() {
        let mut rng = rng();
        assert!((0..200).all(|_| (70.0..100.0).contains(&similarity(&mut rng))));
    }
}
