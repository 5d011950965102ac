use std::collections::HashMap;

use crate::models::{ConfidenceTier, Recommendation, RecommendationSource, SessionContext};

/// A response shorter than this is considered trivial by the confidence
/// ladder.
const MIN_RESPONSE_LEN: usize = 40;

/// Words that signal the response is actually talking about clubs.
const CLUB_NOUNS: &[&str] = &["club", "society", "team"];

/// Combines heuristic and AI-parsed candidates into one deduplicated list.
///
/// AI entries take precedence on a name collision: their reasoning and
/// position survive, the higher of the two confidences is kept, and the
/// entry is marked merged. The final list sorts descending by confidence
/// with a stable sort, so AI entries (seeded first) win ties.
pub fn merge(heuristic: Vec<Recommendation>, ai_parsed: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut combined = ai_parsed;
    let mut by_name: HashMap<String, usize> = combined
        .iter()
        .enumerate()
        .map(|(i, r)| (r.normalized_name(), i))
        .collect();

    for rec in heuristic {
        match by_name.get(&rec.normalized_name()) {
            Some(&index) => {
                let existing = &mut combined[index];
                if rec.confidence > existing.confidence {
                    existing.confidence = rec.confidence;
                }
                existing.source = RecommendationSource::Merged;
            }
            None => {
                by_name.insert(rec.normalized_name(), combined.len());
                combined.push(rec);
            }
        }
    }

    combined.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    combined
}

/// Three-tier overall confidence for one turn.
///
/// Monotonic ladder: starts low, may climb to medium, then to high, never
/// skips or descends within one computation.
pub fn overall_confidence(session: &SessionContext, response_text: &str) -> ConfidenceTier {
    let mut tier = ConfidenceTier::Low;

    let has_grade = session.grade.is_some();
    let has_interests = !session.interests.is_empty();
    let has_experience_types = session.activity_type.is_some();
    let has_history = !session.query_history.is_empty();
    let substantial_response = response_text.len() > MIN_RESPONSE_LEN;

    if has_grade || has_interests || substantial_response {
        tier = ConfidenceTier::Medium;
    }

    let richness = [has_grade, has_interests, has_experience_types, has_history]
        .iter()
        .filter(|&&present| present)
        .count();
    let mentions_clubs = {
        let lower = response_text.to_lowercase();
        CLUB_NOUNS.iter().any(|noun| lower.contains(noun))
    };

    if tier == ConfidenceTier::Medium && richness >= 2 && substantial_response && mentions_clubs {
        tier = ConfidenceTier::High;
    }

    tier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::SessionUpdate;
    use crate::models::{CONFIDENCE_AI, CONFIDENCE_HIGH, CONFIDENCE_MEDIUM};

    fn rec(name: &str, confidence: f64, source: RecommendationSource) -> Recommendation {
        Recommendation {
            club_name: name.to_string(),
            category: "STEM".to_string(),
            reasoning: format!("{} reasoning", name),
            confidence,
            source,
        }
    }

    #[test]
    fn ai_wins_collision_and_keeps_higher_confidence() {
        let heuristic = vec![rec(
            "Robotics Club",
            CONFIDENCE_HIGH,
            RecommendationSource::Heuristic,
        )];
        let ai = vec![rec(
            "robotics club ",
            CONFIDENCE_AI,
            RecommendationSource::AiParsed,
        )];

        let merged = merge(heuristic, ai);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence, CONFIDENCE_HIGH);
        assert_eq!(merged[0].source, RecommendationSource::Merged);
        // AI entry's reasoning survives the collision.
        assert_eq!(merged[0].reasoning, "robotics club  reasoning");
    }

    #[test]
    fn unique_entries_from_both_sides_are_retained() {
        let heuristic = vec![rec("Chess Club", CONFIDENCE_MEDIUM, RecommendationSource::Heuristic)];
        let ai = vec![rec("Drama Society", CONFIDENCE_AI, RecommendationSource::AiParsed)];

        let merged = merge(heuristic, ai);
        assert_eq!(merged.len(), 2);
        // Sorted descending by confidence.
        assert_eq!(merged[0].club_name, "Drama Society");
        assert_eq!(merged[1].club_name, "Chess Club");
    }

    #[test]
    fn ties_preserve_ai_first_order() {
        let heuristic = vec![rec("Chess Club", CONFIDENCE_AI, RecommendationSource::Heuristic)];
        let ai = vec![rec("Drama Society", CONFIDENCE_AI, RecommendationSource::AiParsed)];

        let merged = merge(heuristic, ai);
        assert_eq!(merged[0].club_name, "Drama Society");
    }

    #[test]
    fn no_duplicate_names_case_insensitively() {
        let heuristic = vec![
            rec("Key Club", CONFIDENCE_HIGH, RecommendationSource::Heuristic),
            rec("KEY CLUB", CONFIDENCE_MEDIUM, RecommendationSource::Heuristic),
        ];
        let merged = merge(heuristic, vec![]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn rich_session_and_substantial_response_reach_high() {
        let mut session = SessionContext::new();
        session.apply(SessionUpdate {
            grade: Some(10),
            interests: vec!["robotics".to_string()],
            activity_type: Some("academic".to_string()),
            query: Some("stem clubs".to_string()),
            ..Default::default()
        });

        let response = "Based on your interests, the Robotics Club is a great fit for you.";
        assert_eq!(overall_confidence(&session, response), ConfidenceTier::High);
    }

    #[test]
    fn partial_session_with_short_response_is_medium() {
        let mut session = SessionContext::new();
        session.apply(SessionUpdate {
            grade: Some(10),
            interests: vec!["art".to_string()],
            ..Default::default()
        });

        assert_eq!(overall_confidence(&session, "Sure."), ConfidenceTier::Medium);
    }

    #[test]
    fn empty_session_and_trivial_response_is_low() {
        assert_eq!(
            overall_confidence(&SessionContext::new(), "Hi there!"),
            ConfidenceTier::Low
        );
    }

    #[test]
    fn high_requires_club_mention() {
        let mut session = SessionContext::new();
        session.apply(SessionUpdate {
            grade: Some(10),
            interests: vec!["robotics".to_string()],
            ..Default::default()
        });

        let response = "That is an interesting question, let me think about it for a while.";
        assert_eq!(overall_confidence(&session, response), ConfidenceTier::Medium);
    }
}
