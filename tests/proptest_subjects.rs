//! Property-based tests for subject classification and tag stripping.

use git_subject_rewrite::commit::{
    CommitRecord, has_skip_marker, is_automated, parse_log, strip_skip_markers,
};
use git_subject_rewrite::tools::blocking::classify;
use proptest::prelude::*;

/// Subjects that can never look automated: no `m` (so no "merge"), no `b`
/// (so no "dependabot"), no uppercase.
fn human_subject(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select(
            "acdefghijklnopqrstuvwxyz0123456789 .,:"
                .chars()
                .collect::<Vec<char>>(),
        ),
        len,
    )
    .prop_map(|cs| cs.into_iter().collect())
}

/// Text without brackets, so removing one tag can never form another.
fn plain_text() -> impl Strategy<Value = String> {
    "[a-z ]{0,20}".prop_map(|s| s.to_string())
}

fn marker() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["[skip ci]", "[ci skip]"])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn short_subjects_are_never_blocking(subject in ".{0,72}") {
        prop_assume!(subject.chars().count() <= 72);
        let report = classify(vec![CommitRecord::new("abc", subject)], 72);
        prop_assert!(report.blocking.is_empty());
    }

    #[test]
    fn long_human_subjects_are_flagged_once(subject in human_subject(73..=140)) {
        let report = classify(vec![CommitRecord::new("abc", subject.clone())], 72);
        prop_assert_eq!(report.considered.len(), 1);
        prop_assert_eq!(report.blocking, vec![CommitRecord::new("abc", subject)]);
    }

    #[test]
    fn bot_marker_matches_in_any_case(
        prefix in plain_text(),
        flips in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let bot: String = "dependabot"
            .chars()
            .zip(flips)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect();
        let subject = format!("{}{}", prefix, bot);
        prop_assert!(is_automated(&subject));
    }

    #[test]
    fn stripping_removes_every_tag_and_trims(
        parts in proptest::collection::vec((plain_text(), marker()), 1..4),
        tail in plain_text(),
    ) {
        let mut subject = String::new();
        for (text, m) in &parts {
            subject.push_str(text);
            subject.push_str(m);
        }
        subject.push_str(&tail);

        prop_assert!(has_skip_marker(&subject));
        let stripped = strip_skip_markers(&subject);
        prop_assert!(!has_skip_marker(&stripped));
        prop_assert_eq!(stripped.trim(), stripped.as_str());
    }

    #[test]
    fn log_parser_does_not_panic(input in ".*") {
        let _ = parse_log(&input);
    }
}
