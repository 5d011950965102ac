use std::collections::HashSet;

use serde::Serialize;

use crate::models::{ClubRecord, ConfidenceTier, Intent, Recommendation, SessionContext};
use crate::services::providers::SuggestionProvider;
use crate::services::{context, merge, ranker::Ranker, suggestions};

/// Final list cap per turn, shared with the ranker
const MAX_RESULTS: usize = 5;

/// Which path produced the response the client sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Ai,
    Fallback,
}

/// Everything one recommendation turn needs, borrowed from the handler.
pub struct TurnInput<'a> {
    pub clubs: &'a [&'a ClubRecord],
    pub session: &'a SessionContext,
    pub interests: &'a [String],
    pub follow_up: Option<&'a str>,
    /// Normalized names recommended in earlier turns
    pub excluded: &'a HashSet<String>,
}

/// Result of one turn, ready for response shaping and store update.
pub struct TurnOutcome {
    pub recommendations: Vec<Recommendation>,
    pub source: ResponseSource,
    pub confidence: ConfidenceTier,
    pub message: String,
    pub intent: Option<Intent>,
}

/// Runs one recommendation turn.
///
/// The heuristic ranking always happens; the AI suggestion source gets
/// exactly one attempt, and any failure downgrades the turn to the
/// heuristic-only fallback without surfacing an error. The AI call is the
/// only await point.
pub async fn run_turn(provider: &dyn SuggestionProvider, input: TurnInput<'_>) -> TurnOutcome {
    let intent = input.follow_up.map(Intent::extract);

    let ranker = Ranker::new(input.clubs);
    let heuristic = ranker.rank(
        input.interests,
        input.follow_up,
        intent.as_ref(),
        input.excluded,
    );

    let query_text = match input.follow_up {
        Some(follow_up) => follow_up.to_string(),
        None => input.interests.join(", "),
    };
    let summary = context::build_context(input.session);
    let prompt = suggestions::build_prompt(&query_text, &summary, input.clubs);

    match provider.suggest(&prompt).await {
        Ok(text) => {
            let mut parsed = suggestions::parse_recommendations(&text, input.clubs);
            // The AI may happily re-suggest clubs from earlier turns; the
            // exclusion rule applies to its output too.
            if intent.is_some() {
                parsed.retain(|r| !input.excluded.contains(&r.normalized_name()));
            }

            let mut recommendations = merge::merge(heuristic, parsed);
            recommendations.truncate(MAX_RESULTS);

            let confidence = merge::overall_confidence(input.session, &text);
            let message = if text.trim().is_empty() {
                "Here are some clubs that match your preferences.".to_string()
            } else {
                text.trim().to_string()
            };

            tracing::info!(
                recommendations = recommendations.len(),
                confidence = ?confidence,
                "Recommendation turn completed with AI suggestions"
            );

            TurnOutcome {
                recommendations,
                source: ResponseSource::Ai,
                confidence,
                message,
                intent,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI suggestion source unavailable, using heuristic fallback");

            let confidence = merge::overall_confidence(input.session, "");
            TurnOutcome {
                recommendations: heuristic,
                source: ResponseSource::Fallback,
                confidence,
                message: "Our AI advisor is temporarily unavailable, so these picks come \
                          straight from your saved preferences."
                    .to_string(),
                intent,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ClubType, RecommendationSource, TimeCommitment};
    use crate::services::providers::MockSuggestionProvider;

    fn club(name: &str, category: &str, club_type: ClubType, description: &str) -> ClubRecord {
        ClubRecord {
            name: name.to_string(),
            school: "Alpha High".to_string(),
            category: category.to_string(),
            club_type,
            time_commitment: TimeCommitment::Medium,
            interests: vec![category.to_string()],
            description: description.to_string(),
            activities: vec![],
            benefits: vec![],
            grade_levels: vec![],
        }
    }

    fn sample() -> Vec<ClubRecord> {
        vec![
            club("Robotics Club", "STEM", ClubType::Academic, "robots and coding"),
            club("Drama Society", "Arts", ClubType::Creative, "theater and improv"),
            club("Debate Team", "Debate", ClubType::Competitive, "argumentation"),
        ]
    }

    #[tokio::test]
    async fn successful_ai_call_merges_and_reports_ai_source() {
        let clubs = sample();
        let refs: Vec<&ClubRecord> = clubs.iter().collect();
        let session = SessionContext::new();
        let excluded = HashSet::new();

        let mut provider = MockSuggestionProvider::new();
        provider
            .expect_suggest()
            .returning(|_| Ok("You should join the Drama Society, it suits you.".to_string()));

        let outcome = run_turn(
            &provider,
            TurnInput {
                clubs: &refs,
                session: &session,
                interests: &["robots".to_string()],
                follow_up: None,
                excluded: &excluded,
            },
        )
        .await;

        assert_eq!(outcome.source, ResponseSource::Ai);
        let names: Vec<&str> = outcome
            .recommendations
            .iter()
            .map(|r| r.club_name.as_str())
            .collect();
        assert!(names.contains(&"Robotics Club"));
        assert!(names.contains(&"Drama Society"));
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_heuristic_only() {
        let clubs = sample();
        let refs: Vec<&ClubRecord> = clubs.iter().collect();
        let session = SessionContext::new();
        let excluded = HashSet::new();

        let mut provider = MockSuggestionProvider::new();
        provider
            .expect_suggest()
            .returning(|_| Err(AppError::AiUnavailable("timed out".to_string())));

        let outcome = run_turn(
            &provider,
            TurnInput {
                clubs: &refs,
                session: &session,
                interests: &["robots".to_string()],
                follow_up: None,
                excluded: &excluded,
            },
        )
        .await;

        assert_eq!(outcome.source, ResponseSource::Fallback);
        assert!(outcome.message.contains("temporarily unavailable"));
        assert!(outcome
            .recommendations
            .iter()
            .all(|r| r.source == RecommendationSource::Heuristic));
        assert_eq!(outcome.recommendations[0].club_name, "Robotics Club");
    }

    #[tokio::test]
    async fn unparsable_ai_text_keeps_ai_source_with_heuristic_list() {
        let clubs = sample();
        let refs: Vec<&ClubRecord> = clubs.iter().collect();
        let session = SessionContext::new();
        let excluded = HashSet::new();

        let mut provider = MockSuggestionProvider::new();
        provider
            .expect_suggest()
            .returning(|_| Ok("Follow your heart and try new things!".to_string()));

        let outcome = run_turn(
            &provider,
            TurnInput {
                clubs: &refs,
                session: &session,
                interests: &["robots".to_string()],
                follow_up: None,
                excluded: &excluded,
            },
        )
        .await;

        assert_eq!(outcome.source, ResponseSource::Ai);
        assert!(outcome
            .recommendations
            .iter()
            .all(|r| r.source == RecommendationSource::Heuristic));
    }

    #[tokio::test]
    async fn follow_up_exclusion_covers_ai_mentions() {
        let clubs = sample();
        let refs: Vec<&ClubRecord> = clubs.iter().collect();
        let session = SessionContext::new();
        let excluded: HashSet<String> = ["robotics club".to_string()].into_iter().collect();

        let mut provider = MockSuggestionProvider::new();
        provider
            .expect_suggest()
            .returning(|_| Ok("The Robotics Club and Debate Team both compete.".to_string()));

        let outcome = run_turn(
            &provider,
            TurnInput {
                clubs: &refs,
                session: &session,
                interests: &[],
                follow_up: Some("something competitive"),
                excluded: &excluded,
            },
        )
        .await;

        assert!(outcome
            .recommendations
            .iter()
            .all(|r| r.normalized_name() != "robotics club"));
        assert!(outcome
            .recommendations
            .iter()
            .any(|r| r.club_name == "Debate Team"));
        assert_eq!(outcome.intent, Some(Intent::Competitive));
    }
}
