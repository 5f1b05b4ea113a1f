use std::collections::BTreeMap;

use crate::grades;
use crate::models::{GradeDistributionBucket, GradedRecord, LetterGrade};

/// 100% expressed in tenths of a percent.
const WHOLE_IN_TENTHS: usize = 1000;

/// Grade histogram over every graded record, in canonical grade order.
/// Grades nobody received are omitted. Percentages carry one decimal and
/// always sum to exactly 100.0.
pub fn distribution(records: &[GradedRecord]) -> Vec<GradeDistributionBucket> {
    let mut counts: BTreeMap<LetterGrade, usize> = BTreeMap::new();
    for grade in records.iter().filter_map(|r| r.grade) {
        *counts.entry(grade).or_insert(0) += 1;
    }

    let counts: Vec<(LetterGrade, usize)> = counts.into_iter().collect();
    let tenths = apportion_tenths(&counts);
    counts
        .into_iter()
        .zip(tenths)
        .map(|((grade, count), tenths)| GradeDistributionBucket {
            grade,
            count,
            percentage: tenths as f64 / 10.0,
        })
        .collect()
}

/// [`distribution`] with a zero bucket for every grade nobody received.
pub fn dense_distribution(records: &[GradedRecord]) -> Vec<GradeDistributionBucket> {
    let sparse = distribution(records);
    LetterGrade::ALL
        .iter()
        .map(|grade| {
            sparse
                .iter()
                .find(|b| b.grade == *grade)
                .cloned()
                .unwrap_or(GradeDistributionBucket {
                    grade: *grade,
                    count: 0,
                    percentage: 0.0,
                })
        })
        .collect()
}

pub fn average_gpa(records: &[GradedRecord]) -> Option<f64> {
    grades::gpa(records)
}

// Largest-remainder split of 1000 tenths: each bucket takes the floor of
// its exact share, then the leftover tenths go to the largest remainders
// (earlier grades first on ties). Every bucket ends within 0.1 of exact.
fn apportion_tenths(counts: &[(LetterGrade, usize)]) -> Vec<usize> {
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let mut tenths: Vec<usize> = counts
        .iter()
        .map(|(_, count)| count * WHOLE_IN_TENTHS / total)
        .collect();
    let leftover = WHOLE_IN_TENTHS - tenths.iter().sum::<usize>();

    let mut by_remainder: Vec<usize> = (0..counts.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let rem_a = counts[a].1 * WHOLE_IN_TENTHS % total;
        let rem_b = counts[b].1 * WHOLE_IN_TENTHS % total;
        rem_b.cmp(&rem_a).then(a.cmp(&b))
    });
    for &index in by_remainder.iter().take(leftover) {
        tenths[index] += 1;
    }
    tenths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(grades: &[Option<&str>]) -> Vec<GradedRecord> {
        grades
            .iter()
            .enumerate()
            .map(|(i, g)| {
                GradedRecord::new(
                    format!("student-{i}"),
                    "2024FA",
                    g.map(|s| s.parse().unwrap()),
                    3.0,
                )
            })
            .collect()
    }

    #[test]
    fn counts_and_percentages() {
        let records = roster(&[Some("A"), Some("A"), Some("B+"), Some("C"), None]);
        let buckets = distribution(&records);

        assert_eq!(
            buckets,
            vec![
                GradeDistributionBucket {
                    grade: LetterGrade::A,
                    count: 2,
                    percentage: 50.0,
                },
                GradeDistributionBucket {
                    grade: LetterGrade::BPlus,
                    count: 1,
                    percentage: 25.0,
                },
                GradeDistributionBucket {
                    grade: LetterGrade::C,
                    count: 1,
                    percentage: 25.0,
                },
            ]
        );
    }

    #[test]
    fn counts_sum_to_graded_roster() {
        let records = roster(&[Some("A"), Some("W"), Some("P"), None, Some("F"), None]);
        let buckets = distribution(&records);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, 4);
        assert!(buckets.iter().all(|b| b.count > 0));
    }

    fn percentage_sum(buckets: &[GradeDistributionBucket]) -> f64 {
        buckets.iter().map(|b| b.percentage).sum()
    }

    #[test]
    fn thirds_give_the_spare_tenth_to_the_first_grade() {
        let records = roster(&[Some("A"), Some("B"), Some("C")]);
        let percentages: Vec<f64> = distribution(&records).iter().map(|b| b.percentage).collect();
        assert_eq!(percentages, vec![33.4, 33.3, 33.3]);
    }

    #[test]
    fn six_way_tie_sums_to_hundred() {
        let records = roster(&[Some("A"), Some("B"), Some("C"), Some("D"), Some("F"), Some("A-")]);
        let buckets = distribution(&records);
        assert_eq!(buckets.len(), 6);
        assert!((percentage_sum(&buckets) - 100.0).abs() < 1e-9);
        for bucket in &buckets {
            assert!((bucket.percentage - 100.0 / 6.0).abs() <= 0.1 + 1e-9);
        }
    }

    #[test]
    fn seven_way_tie_sums_to_hundred() {
        let records = roster(&[
            Some("A"),
            Some("A-"),
            Some("B+"),
            Some("B"),
            Some("B-"),
            Some("C+"),
            Some("C"),
        ]);
        let buckets = distribution(&records);
        assert_eq!(buckets.len(), 7);
        assert!((percentage_sum(&buckets) - 100.0).abs() < 1e-9);
        for bucket in &buckets {
            assert!((bucket.percentage - 100.0 / 7.0).abs() <= 0.1 + 1e-9);
        }
    }

    #[test]
    fn uneven_roster_stays_close_to_exact_shares() {
        // 1/13 and 12/13 of the roster: 7.69.. and 92.30..
        let mut grades = vec![Some("A"); 12];
        grades.push(Some("F"));
        let buckets = distribution(&roster(&grades));
        assert_eq!(buckets[0].percentage, 92.3);
        assert_eq!(buckets[1].percentage, 7.7);
    }

    #[test]
    fn percentages_sum_near_hundred() {
        let records = roster(&[
            Some("A"),
            Some("A-"),
            Some("A-"),
            Some("B+"),
            Some("B"),
            Some("B"),
            Some("B"),
            Some("C"),
        ]);
        let sum = percentage_sum(&distribution(&records));
        assert!((sum - 100.0).abs() <= 0.1 + 1e-9, "sum was {sum}");
    }

    #[test]
    fn empty_roster_has_no_buckets() {
        assert!(distribution(&[]).is_empty());
        assert!(distribution(&roster(&[None, None])).is_empty());
        assert_eq!(average_gpa(&[]), None);
    }

    #[test]
    fn dense_fills_missing_grades() {
        let records = roster(&[Some("B"), Some("B")]);
        let dense = dense_distribution(&records);
        assert_eq!(dense.len(), LetterGrade::ALL.len());
        assert_eq!(dense[0].grade, LetterGrade::APlus);
        assert_eq!(dense[0].count, 0);
        let b = dense.iter().find(|b| b.grade == LetterGrade::B).unwrap();
        assert_eq!((b.count, b.percentage), (2, 100.0));
    }

    #[test]
    fn average_matches_gpa() {
        let records = roster(&[Some("A"), Some("B"), Some("W"), None]);
        assert_eq!(average_gpa(&records), Some(3.5));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let records = roster(&[Some("A"), Some("C-"), Some("D+"), Some("A")]);
        assert_eq!(distribution(&records), distribution(&records));
    }
}
