//! Statistics over the student directory.
//!
//! This module turns a snapshot of [`StudentRecord`]s into the figures shown
//! on the statistics dashboard:
//!
//! - **Coverage**: registered students per cohort against the known cohort
//!   population.
//! - **Distributions**: counts and percentages by course, blood type,
//!   prefecture, star sign and personality type, plus courses within each
//!   cohort.
//! - **Word clouds**: frequency-ranked tokens from hobbies, circles, likes
//!   and dislikes.
//!
//! Every function here is pure. Callers fetch the full snapshot first and
//! compute over it once, so all sections of a report agree with each other.
//!
//! # Example
//!
//! ```
//! use studentstats::config::StatisticsConfig;
//! use studentstats::stats::StatisticsReport;
//! use studentstats::StudentRecord;
//!
//! let mut student = StudentRecord::new("25314986", "山田 太郎", "B3", "KIKAI_SYSTEM");
//! student.hobby = Some("サッカー、野球".to_string());
//!
//! let report = StatisticsReport::compute(&[student], &StatisticsConfig::default());
//! assert_eq!(report.total_students, 1);
//! assert_eq!(report.word_clouds.hobbies.len(), 2);
//! ```

mod distribution;
mod normalize;
mod words;

pub use distribution::{
    category_distribution, cohort_statistics, courses_by_cohort, percentage, CategoryCount,
    CohortCourses, CohortStatistic, CohortTotal, CourseCount, GroupOrder,
};
pub use normalize::{extract_prefecture, normalize_personality_code, NOT_SPECIFIED};
pub use words::{tokenize, word_frequency, WordCount, DEFAULT_TOP_N};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StatisticsConfig;
use crate::student::{snapshot_digest, StudentRecord};

/// Word clouds for the four free-text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordClouds {
    /// Hobbies.
    pub hobbies: Vec<WordCount>,
    /// Clubs and circles.
    pub circles: Vec<WordCount>,
    /// Likes.
    pub likes: Vec<WordCount>,
    /// Dislikes.
    pub dislikes: Vec<WordCount>,
}

impl WordClouds {
    /// Build all four clouds, keeping `top_n` words each.
    #[must_use]
    pub fn compute(records: &[StudentRecord], top_n: usize) -> Self {
        let cloud = |field: fn(&StudentRecord) -> Option<&str>| {
            word_frequency(records.iter().map(field), top_n)
        };
        Self {
            hobbies: cloud(|r| r.hobby.as_deref()),
            circles: cloud(|r| r.circle.as_deref()),
            likes: cloud(|r| r.likes.as_deref()),
            dislikes: cloud(|r| r.dislikes.as_deref()),
        }
    }
}

/// Everything the statistics dashboard displays, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    /// Number of records in the snapshot.
    pub total_students: usize,
    /// BLAKE3 fingerprint of the snapshot the report was computed from.
    pub snapshot_digest: String,
    /// Coverage per reference cohort.
    pub cohorts: Vec<CohortStatistic>,
    /// Course distribution, descending count.
    pub courses: Vec<CourseCount>,
    /// Course distribution within each cohort.
    pub courses_by_cohort: Vec<CohortCourses>,
    /// Blood type distribution in first-seen order.
    pub blood_types: Vec<CategoryCount>,
    /// Most common prefectures, descending count.
    pub prefectures: Vec<CategoryCount>,
    /// Star sign distribution in first-seen order.
    pub star_signs: Vec<CategoryCount>,
    /// Normalized personality types, descending count.
    pub personality_types: Vec<CategoryCount>,
    /// Word clouds for the free-text fields.
    pub word_clouds: WordClouds,
}

impl StatisticsReport {
    /// Compute a full report from a record snapshot.
    #[must_use]
    pub fn compute(records: &[StudentRecord], config: &StatisticsConfig) -> Self {
        debug!(
            records = records.len(),
            cohorts = config.cohorts.len(),
            "Computing statistics"
        );

        let courses = category_distribution(
            records,
            |r| Some(r.course.clone()),
            GroupOrder::ByCountDesc,
        )
        .into_iter()
        .map(CourseCount::from)
        .collect();

        let blood_types = category_distribution(
            records,
            |r| Some(non_blank(r.blood_type.as_deref()).unwrap_or(NOT_SPECIFIED).to_string()),
            GroupOrder::FirstSeen,
        );

        let mut prefectures = category_distribution(
            records,
            |r| non_blank(r.hometown.as_deref()).map(|h| extract_prefecture(h).to_string()),
            GroupOrder::ByCountDesc,
        );
        prefectures.truncate(config.prefecture_limit);

        let star_signs = category_distribution(
            records,
            |r| {
                Some(
                    r.effective_star_sign()
                        .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
                )
            },
            GroupOrder::FirstSeen,
        );

        let personality_types = category_distribution(
            records,
            |r| {
                non_blank(r.personality_code.as_deref())
                    .map(|code| normalize_personality_code(Some(code)))
            },
            GroupOrder::ByCountDesc,
        );

        Self {
            total_students: records.len(),
            snapshot_digest: snapshot_digest(records),
            cohorts: cohort_statistics(records, &config.cohorts),
            courses,
            courses_by_cohort: courses_by_cohort(records, &config.cohorts),
            blood_types,
            prefectures,
            star_signs,
            personality_types,
            word_clouds: WordClouds::compute(records, config.word_cloud_limit),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
