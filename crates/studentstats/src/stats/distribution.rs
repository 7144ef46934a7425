//! Group-by and percentage computations over a record snapshot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::course;
use crate::student::StudentRecord;

/// Known population of one cohort, from external reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortTotal {
    /// Cohort label as stored on records.
    pub label: String,
    /// True number of students in the cohort.
    pub total: usize,
}

impl CohortTotal {
    /// Create a reference entry.
    #[must_use]
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        Self {
            label: label.into(),
            total,
        }
    }
}

/// Registration coverage for one cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortStatistic {
    /// Cohort label.
    pub label: String,
    /// Records in the snapshot belonging to the cohort.
    pub registered_count: usize,
    /// Known population from the reference table.
    pub total_count: usize,
    /// `registered_count` as a rounded percentage of `total_count`.
    pub percentage: u64,
}

/// Count and share of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Group label.
    pub label: String,
    /// Number of records in the group.
    pub count: usize,
    /// Rounded percentage of the relevant total.
    pub percentage: u64,
}

/// A course group with its presentation details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCount {
    /// Code, count and percentage.
    #[serde(flatten)]
    pub category: CategoryCount,
    /// Display name from the course catalog, or the code itself.
    pub name: String,
    /// Chart color.
    pub color: String,
}

impl From<CategoryCount> for CourseCount {
    fn from(category: CategoryCount) -> Self {
        let name = course::display_name(&category.label).to_string();
        let color = course::color(&category.label).to_string();
        Self {
            category,
            name,
            color,
        }
    }
}

/// Course breakdown inside one cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortCourses {
    /// Cohort label.
    pub cohort: String,
    /// Records in the snapshot belonging to the cohort.
    pub registered_count: usize,
    /// Courses in descending count order; percentages are of `registered_count`.
    pub courses: Vec<CourseCount>,
}

/// How groups are ordered in a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// Descending count; equal counts keep first-seen order.
    #[default]
    ByCountDesc,
    /// Order in which each group was first encountered.
    FirstSeen,
}

/// Rounded percentage of `count` in `total`, with halves rounding up.
///
/// A zero `total` yields 0.
#[must_use]
pub fn percentage(count: usize, total: usize) -> u64 {
    if total == 0 {
        return 0;
    }
    let (count, total) = (count as u128, total as u128);
    let rounded = (count * 200 + total) / (total * 2);
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

/// Registration coverage for every cohort in the reference table.
///
/// Cohorts follow reference table order; cohorts without records are
/// reported with a zero count.
#[must_use]
pub fn cohort_statistics(records: &[StudentRecord], cohorts: &[CohortTotal]) -> Vec<CohortStatistic> {
    let registered = count_by(records, |r| Some(r.cohort.clone()));

    cohorts
        .iter()
        .map(|cohort| {
            let registered_count = registered.get(cohort.label.as_str()).copied().unwrap_or(0);
            CohortStatistic {
                label: cohort.label.clone(),
                registered_count,
                total_count: cohort.total,
                percentage: percentage(registered_count, cohort.total),
            }
        })
        .collect()
}

/// Group records by `key` and report each group's share of all records.
///
/// Records for which `key` returns `None` are left out of the groups but
/// still count toward the total.
pub fn category_distribution<F>(
    records: &[StudentRecord],
    key: F,
    order: GroupOrder,
) -> Vec<CategoryCount>
where
    F: Fn(&StudentRecord) -> Option<String>,
{
    let counts = count_by(records, key);
    to_categories(counts, records.len(), order)
}

/// Course distribution inside each cohort.
///
/// Cohorts appear in reference table order, followed by cohorts missing from
/// the table in first-seen order.
#[must_use]
pub fn courses_by_cohort(records: &[StudentRecord], cohorts: &[CohortTotal]) -> Vec<CohortCourses> {
    let mut grouped: IndexMap<&str, Vec<&StudentRecord>> = IndexMap::new();
    for record in records {
        grouped.entry(record.cohort.as_str()).or_default().push(record);
    }

    let rank = |label: &str| {
        cohorts
            .iter()
            .position(|c| c.label == label)
            .unwrap_or(cohorts.len())
    };
    grouped.sort_by(|a, _, b, _| rank(*a).cmp(&rank(*b)));

    grouped
        .into_iter()
        .map(|(cohort, members)| {
            let registered_count = members.len();
            let counts = count_by(members.iter().copied(), |r| Some(r.course.clone()));
            trace!(cohort, registered_count, groups = counts.len(), "grouped courses");
            let courses = to_categories(counts, registered_count, GroupOrder::ByCountDesc)
                .into_iter()
                .map(CourseCount::from)
                .collect();
            CohortCourses {
                cohort: cohort.to_string(),
                registered_count,
                courses,
            }
        })
        .collect()
}

fn count_by<'a, I, F>(records: I, key: F) -> IndexMap<String, usize>
where
    I: IntoIterator<Item = &'a StudentRecord>,
    F: Fn(&StudentRecord) -> Option<String>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for label in records.into_iter().filter_map(|record| key(record)) {
        *counts.entry(label).or_default() += 1;
    }
    counts
}

fn to_categories(
    counts: IndexMap<String, usize>,
    total: usize,
    order: GroupOrder,
) -> Vec<CategoryCount> {
    let mut categories: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label,
            count,
            percentage: percentage(count, total),
        })
        .collect();
    if order == GroupOrder::ByCountDesc {
        categories.sort_by(|a, b| b.count.cmp(&a.count));
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cohort: &str, course: &str) -> StudentRecord {
        StudentRecord::new(format!("{cohort}-{course}"), "name", cohort, course)
    }

    fn labels(categories: &[CategoryCount]) -> Vec<&str> {
        categories.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 10), 0);
        assert_eq!(percentage(10, 10), 100);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 2), 150);
    }

    #[test]
    fn test_percentage_bounded_when_count_within_total() {
        for total in 1..60 {
            for count in 0..=total {
                assert!(percentage(count, total) <= 100, "count={count} total={total}");
            }
        }
    }

    #[test]
    fn test_cohort_statistics() {
        let records = vec![record("B1", "A"), record("B1", "B"), record("B3", "A")];
        let cohorts = vec![
            CohortTotal::new("B1", 4),
            CohortTotal::new("B2", 10),
            CohortTotal::new("B3", 3),
        ];
        let stats = cohort_statistics(&records, &cohorts);
        assert_eq!(
            stats,
            vec![
                CohortStatistic {
                    label: "B1".to_string(),
                    registered_count: 2,
                    total_count: 4,
                    percentage: 50
                },
                CohortStatistic {
                    label: "B2".to_string(),
                    registered_count: 0,
                    total_count: 10,
                    percentage: 0
                },
                CohortStatistic {
                    label: "B3".to_string(),
                    registered_count: 1,
                    total_count: 3,
                    percentage: 33
                },
            ]
        );
    }

    #[test]
    fn test_cohort_statistics_empty_table() {
        let records = vec![record("B1", "A")];
        assert!(cohort_statistics(&records, &[]).is_empty());
    }

    #[test]
    fn test_cohort_statistics_zero_total() {
        let records = vec![record("M1", "A")];
        let stats = cohort_statistics(&records, &[CohortTotal::new("M1", 0)]);
        assert_eq!(stats[0].registered_count, 1);
        assert_eq!(stats[0].percentage, 0);
    }

    #[test]
    fn test_category_distribution_by_course() {
        let records = vec![record("B1", "A"), record("B1", "A"), record("B1", "B")];
        let dist = category_distribution(&records, |r| Some(r.course.clone()), GroupOrder::ByCountDesc);
        assert_eq!(
            dist,
            vec![
                CategoryCount {
                    label: "A".to_string(),
                    count: 2,
                    percentage: 67
                },
                CategoryCount {
                    label: "B".to_string(),
                    count: 1,
                    percentage: 33
                },
            ]
        );
    }

    #[test]
    fn test_category_distribution_first_seen_order() {
        let records = vec![record("B1", "Z"), record("B1", "A"), record("B1", "A")];
        let dist = category_distribution(&records, |r| Some(r.course.clone()), GroupOrder::FirstSeen);
        assert_eq!(labels(&dist), vec!["Z", "A"]);

        let dist = category_distribution(&records, |r| Some(r.course.clone()), GroupOrder::ByCountDesc);
        assert_eq!(labels(&dist), vec!["A", "Z"]);
    }

    #[test]
    fn test_category_distribution_excluded_keys_still_in_total() {
        let mut with_type = record("B1", "A");
        with_type.blood_type = Some("A".to_string());
        let records = vec![with_type, record("B1", "A")];
        let dist = category_distribution(&records, |r| r.blood_type.clone(), GroupOrder::FirstSeen);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].count, 1);
        assert_eq!(dist[0].percentage, 50);
    }

    #[test]
    fn test_category_distribution_unknown_codes_kept() {
        let records = vec![record("B1", "SOMETHING_NEW"), record("B1", "KIKAI_SYSTEM")];
        let dist = category_distribution(&records, |r| Some(r.course.clone()), GroupOrder::ByCountDesc);
        assert_eq!(dist.iter().map(|c| c.count).sum::<usize>(), 2);
        assert!(labels(&dist).contains(&"SOMETHING_NEW"));
    }

    #[test]
    fn test_category_distribution_empty() {
        let dist = category_distribution(&[], |r| Some(r.course.clone()), GroupOrder::ByCountDesc);
        assert!(dist.is_empty());
    }

    #[test]
    fn test_courses_by_cohort() {
        let records = vec![
            record("B3", "KIKAI_SYSTEM"),
            record("B1", "KIKAI_SYSTEM"),
            record("B1", "JOHO_COMMUNICATION"),
            record("B1", "JOHO_COMMUNICATION"),
            record("X9", "UNLISTED"),
        ];
        let cohorts = vec![CohortTotal::new("B1", 100), CohortTotal::new("B3", 100)];
        let breakdown = courses_by_cohort(&records, &cohorts);

        let order: Vec<&str> = breakdown.iter().map(|c| c.cohort.as_str()).collect();
        assert_eq!(order, vec!["B1", "B3", "X9"]);

        let b1 = &breakdown[0];
        assert_eq!(b1.registered_count, 3);
        assert_eq!(b1.courses[0].category.label, "JOHO_COMMUNICATION");
        assert_eq!(b1.courses[0].category.count, 2);
        assert_eq!(b1.courses[0].category.percentage, 67);
        assert_eq!(b1.courses[0].name, "情報・通信システム工学");
        assert_eq!(b1.courses[1].category.percentage, 33);

        let x9 = &breakdown[2];
        assert_eq!(x9.courses[0].category.percentage, 100);
        assert_eq!(x9.courses[0].name, "UNLISTED");
        assert_eq!(x9.courses[0].color, course::FALLBACK_COLOR);
    }

    #[test]
    fn test_course_count_serializes_flat() {
        let count = CourseCount::from(CategoryCount {
            label: "KIKAI_SYSTEM".to_string(),
            count: 1,
            percentage: 100,
        });
        let json = serde_json::to_value(&count).unwrap();
        assert_eq!(json["label"], "KIKAI_SYSTEM");
        assert_eq!(json["count"], 1);
        assert_eq!(json["name"], "機械システム工学");
        assert_eq!(json["color"], "#9F7AEA");
    }

    #[test]
    fn test_cohort_statistic_serializes_camel_case() {
        let stat = CohortStatistic {
            label: "B1".to_string(),
            registered_count: 1,
            total_count: 2,
            percentage: 50,
        };
        let json = serde_json::to_value(&stat).unwrap();
        assert_eq!(json["registeredCount"], 1);
        assert_eq!(json["totalCount"], 2);
    }
}
