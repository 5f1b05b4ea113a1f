use crate::models::{ConflictPair, MeetingPattern};

/// Two sections clash when they share a weekday and their time ranges
/// intersect. Touching endpoints do not clash.
pub fn overlaps(a: &MeetingPattern, b: &MeetingPattern) -> bool {
    a.start() < b.end() && b.start() < a.end() && a.days().intersection(b.days()).next().is_some()
}

pub fn has_conflict(patterns: &[MeetingPattern]) -> bool {
    patterns.iter().enumerate().any(|(i, a)| {
        patterns[i + 1..].iter().any(|b| overlaps(a, b))
    })
}

/// Every clashing pair in input order, with the weekdays they share.
pub fn find_conflicts(patterns: &[MeetingPattern]) -> Vec<ConflictPair> {
    let mut conflicts = Vec::new();

    for (i, a) in patterns.iter().enumerate() {
        for b in &patterns[i + 1..] {
            if !overlaps(a, b) {
                continue;
            }
            conflicts.push(ConflictPair {
                first: a.label().to_string(),
                second: b.label().to_string(),
                shared_days: a.days().intersection(b.days()).copied().collect(),
            });
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weekday;

    fn section(label: &str, days: &str, start: &str, end: &str) -> MeetingPattern {
        MeetingPattern::parse(label, days, start, end).unwrap()
    }

    #[test]
    fn partial_overlap_conflicts() {
        let patterns = vec![
            section("CS101", "Mon", "09:00", "10:00"),
            section("MATH200", "Mon", "09:30", "10:30"),
        ];
        assert!(has_conflict(&patterns));
    }

    #[test]
    fn different_days_do_not_conflict() {
        let patterns = vec![
            section("CS101", "Mon", "09:00", "10:00"),
            section("MATH200", "Tue", "09:00", "10:00"),
        ];
        assert!(!has_conflict(&patterns));
    }

    #[test]
    fn back_to_back_sections_do_not_conflict() {
        let patterns = vec![
            section("CS101", "MWF", "09:00", "09:50"),
            section("MATH200", "MWF", "09:50", "10:40"),
        ];
        assert!(!has_conflict(&patterns));
    }

    #[test]
    fn containment_conflicts() {
        let patterns = vec![
            section("LAB", "Thu", "13:00", "16:00"),
            section("SEM", "TTh", "14:00", "15:00"),
        ];
        assert!(has_conflict(&patterns));
    }

    #[test]
    fn empty_and_single_inputs_are_clear() {
        assert!(!has_conflict(&[]));
        assert!(!has_conflict(&[section("CS101", "Mon", "09:00", "10:00")]));
        assert!(find_conflicts(&[]).is_empty());
    }

    #[test]
    fn scans_every_pair_in_a_cart() {
        let patterns = vec![
            section("CS101", "MWF", "09:00", "09:50"),
            section("HIST110", "TTh", "11:00", "12:15"),
            section("BIO150", "MW", "14:00", "15:15"),
            section("ART101", "Fri", "09:30", "11:30"),
        ];
        assert!(has_conflict(&patterns));

        let conflicts = find_conflicts(&patterns);
        assert_eq!(
            conflicts,
            vec![ConflictPair {
                first: "CS101".to_string(),
                second: "ART101".to_string(),
                shared_days: vec![Weekday::Fri],
            }]
        );
    }

    #[test]
    fn reports_shared_days() {
        let patterns = vec![
            section("CS101", "MWF", "10:00", "11:00"),
            section("CHEM120", "Mon,Wed", "10:30", "12:00"),
        ];
        let conflicts = find_conflicts(&patterns);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].shared_days, vec![Weekday::Mon, Weekday::Wed]);
    }
}
