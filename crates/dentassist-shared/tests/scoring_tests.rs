//! Tests for score resolution and triage thresholds

use dentassist_shared::demo::demo_report;
use dentassist_shared::scoring::{manual_health_score, resolve, ResolverPolicy, ScoreSource, TriageTier};
use dentassist_shared::symptoms::SYMPTOMS;
use std::collections::BTreeSet;

fn first_n_symptoms(n: usize) -> BTreeSet<String> {
    SYMPTOMS.iter().take(n).map(|s| s.to_string()).collect()
}

#[test]
fn test_manual_score_bounded_and_monotonic() {
    for pain in 1..=5u8 {
        for count in 0..=8usize {
            let score = manual_health_score(pain, count);
            assert!(score <= 100);

            if pain < 5 {
                assert!(manual_health_score(pain + 1, count) <= score);
            }
            if count < 8 {
                assert!(manual_health_score(pain, count + 1) <= score);
            }
        }
    }
}

#[test]
fn test_no_pain_no_symptoms_is_good() {
    let r = resolve(1, 0, None, &ResolverPolicy::default());
    assert_eq!(r.score, 100);
    assert_eq!(r.tier, TriageTier::Good);
    assert_eq!(r.source, ScoreSource::Manual);
}

#[test]
fn test_score_fifty_is_consistent() {
    let mut report = demo_report(1, &BTreeSet::new());
    report.is_demo_mode = false;
    report.confidence = 50.0;

    let canonical = ResolverPolicy::default();
    let legacy = ResolverPolicy::legacy();
    let a = resolve(3, 2, Some(&report), &canonical);
    let b = resolve(3, 2, Some(&report), &legacy);
    assert_eq!(a.score, 50);
    assert_eq!(a.tier, TriageTier::AttentionNeeded);
    assert_eq!(b.tier, a.tier);

    // Variants only disagree strictly between 40 and 49
    for score in 0..=100u8 {
        let same = canonical.tier_for(score) == legacy.tier_for(score);
        assert_eq!(same, !(40..50).contains(&score), "score {}", score);
    }
}

#[test]
fn test_demo_report_resolves_to_manual_score() {
    for pain in 1..=5u8 {
        for count in 0..=8usize {
            let symptoms = first_n_symptoms(count);
            let report = demo_report(pain, &symptoms);
            let r = resolve(pain, symptoms.len(), Some(&report), &ResolverPolicy::default());
            assert_eq!(r.source, ScoreSource::Manual);
            assert_eq!(r.score, report.health_score);
        }
    }
}
