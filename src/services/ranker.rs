use std::collections::HashSet;

use crate::models::{
    normalize_club_name, ClubRecord, Intent, Recommendation, RecommendationSource, CONFIDENCE_HIGH,
    CONFIDENCE_MEDIUM,
};

/// Final list cap per turn
const MAX_RESULTS: usize = 5;
/// Tokens this short carry no signal in the general fallback
const MIN_TOKEN_LEN: usize = 3;

/// Deterministic, explainable recommendation scorer.
///
/// Operates on one school's catalog slice in iteration order; repeated
/// calls with identical input produce identical output, and ties within a
/// confidence tier keep catalog order rather than re-sorting.
pub struct Ranker<'a> {
    clubs: &'a [&'a ClubRecord],
}

impl<'a> Ranker<'a> {
    pub fn new(clubs: &'a [&'a ClubRecord]) -> Self {
        Self { clubs }
    }

    /// Ranks the catalog against the current turn.
    ///
    /// With no intent this is an initial-turn interest match; with an
    /// intent it applies the intent's predicate and excludes everything
    /// already recommended in earlier turns.
    pub fn rank(
        &self,
        interests: &[String],
        follow_up: Option<&str>,
        intent: Option<&Intent>,
        excluded: &HashSet<String>,
    ) -> Vec<Recommendation> {
        let mut results = match intent {
            Some(intent) => self.rank_follow_up(intent, follow_up.unwrap_or(""), excluded),
            None => self.rank_initial(interests),
        };
        results.truncate(MAX_RESULTS);
        results
    }

    fn rank_initial(&self, interests: &[String]) -> Vec<Recommendation> {
        let mut matches = Vec::new();

        for club in self.clubs.iter().copied() {
            let haystack = format!(
                "{} {}",
                club.interests.join(" ").to_lowercase(),
                club.description.to_lowercase()
            );
            if let Some(interest) = interests
                .iter()
                .map(|i| i.trim().to_lowercase())
                .filter(|i| !i.is_empty())
                .find(|i| haystack.contains(i.as_str()))
            {
                matches.push(recommendation(
                    club,
                    format!("Matches your interest in {}", interest),
                    CONFIDENCE_HIGH,
                ));
            }
        }

        if matches.is_empty() {
            // Category-based fallback: surface the first few catalog entries
            // rather than returning nothing.
            matches = self
                .clubs
                .iter()
                .copied()
                .take(3)
                .map(|club| {
                    recommendation(
                        club,
                        format!("A well-regarded {} option to explore", club.category),
                        CONFIDENCE_MEDIUM,
                    )
                })
                .collect();
        }

        matches
    }

    fn rank_follow_up(
        &self,
        intent: &Intent,
        follow_up: &str,
        excluded: &HashSet<String>,
    ) -> Vec<Recommendation> {
        let fresh: Vec<&ClubRecord> = self
            .clubs
            .iter()
            .copied()
            .filter(|club| !excluded.contains(&normalize_club_name(&club.name)))
            .collect();

        let matched: Vec<Recommendation> = fresh
            .iter()
            .copied()
            .filter(|&club| intent_predicate(intent, club))
            .map(|club| recommendation(club, intent_reasoning(intent, club), CONFIDENCE_HIGH))
            .collect();

        if !matched.is_empty() {
            return matched;
        }

        // General fallback: token containment over the club's combined text.
        let tokens: Vec<String> = follow_up
            .to_lowercase()
            .split_whitespace()
            .filter(|t| t.len() > MIN_TOKEN_LEN)
            .map(str::to_string)
            .collect();

        let mut strong = Vec::new();
        let mut weak = Vec::new();
        for club in fresh.iter().copied() {
            let text = club.search_text();
            if tokens.iter().any(|t| text.contains(t.as_str())) {
                strong.push(recommendation(
                    club,
                    "Related to what you mentioned".to_string(),
                    CONFIDENCE_HIGH,
                ));
            } else {
                weak.push(recommendation(
                    club,
                    "Another option you haven't seen yet".to_string(),
                    CONFIDENCE_MEDIUM,
                ));
            }
        }
        strong.extend(weak);
        strong
    }
}

/// Fixed intent → predicate table over the catalog.
fn intent_predicate(intent: &Intent, club: &ClubRecord) -> bool {
    use crate::models::ClubType;

    let themed = |needles: &[&str]| {
        let hay = format!("{} {}", club.category, club.interests.join(" ")).to_lowercase();
        needles.iter().any(|n| hay.contains(n))
    };

    match intent {
        Intent::Business => themed(&["business", "entrepreneur", "finance"]),
        Intent::Stem => themed(&["stem", "science", "technology", "engineering", "math", "robotics"]),
        Intent::Competitive => club.club_type == ClubType::Competitive,
        Intent::Creative => club.club_type == ClubType::Creative,
        Intent::Social => club.club_type == ClubType::Social,
        Intent::Academic => club.club_type == ClubType::Academic,
        Intent::Leadership => club.club_type == ClubType::Leadership,
        Intent::TimeAdjustment(target) => club.time_commitment == *target,
        // Exclusion of already-seen names is the whole filter here.
        Intent::DifferentClubs => true,
        // Always falls through to the token-based general path.
        Intent::General => false,
    }
}

fn intent_reasoning(intent: &Intent, club: &ClubRecord) -> String {
    match intent {
        Intent::Business => format!("{} has a business and entrepreneurship focus", club.name),
        Intent::Stem => format!("{} fits your STEM interests", club.name),
        Intent::Competitive => format!("{} offers competitive experience", club.name),
        Intent::Creative => format!("{} is a creative outlet", club.name),
        Intent::Social => format!("{} is a great way to meet people", club.name),
        Intent::Academic => format!("{} supports academic growth", club.name),
        Intent::Leadership => format!("{} builds leadership skills", club.name),
        Intent::TimeAdjustment(target) => format!(
            "{} fits a {} time commitment",
            club.name,
            commitment_word(*target)
        ),
        Intent::DifferentClubs | Intent::General => {
            format!("{} is something different to consider", club.name)
        }
    }
}

fn commitment_word(target: crate::models::TimeCommitment) -> &'static str {
    use crate::models::TimeCommitment;
    match target {
        TimeCommitment::Low => "low",
        TimeCommitment::Medium => "medium",
        TimeCommitment::High => "high",
    }
}

fn recommendation(club: &ClubRecord, reasoning: String, confidence: f64) -> Recommendation {
    Recommendation {
        club_name: club.name.clone(),
        category: club.category.clone(),
        reasoning,
        confidence,
        source: RecommendationSource::Heuristic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClubType, TimeCommitment};

    fn club(name: &str, category: &str, description: &str) -> ClubRecord {
        let club_type = match category {
            "STEM" => ClubType::Academic,
            "Arts" => ClubType::Creative,
            "Debate" => ClubType::Competitive,
            _ => ClubType::Social,
        };
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
            club("Robotics Club", "STEM", "Build and program robots"),
            club("Drama Society", "Arts", "Theater productions and improv"),
            club("Debate Team", "Debate", "Competitive policy debate"),
            club("Key Club", "Service", "Community volunteering"),
        ]
    }

    fn refs(clubs: &[ClubRecord]) -> Vec<&ClubRecord> {
        clubs.iter().collect()
    }

    #[test]
    fn initial_mode_matches_interests_with_high_confidence() {
        let clubs = sample();
        let refs = refs(&clubs);
        let ranker = Ranker::new(&refs);

        let results = ranker.rank(
            &["robots".to_string()],
            None,
            None,
            &HashSet::new(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].club_name, "Robotics Club");
        assert_eq!(results[0].confidence, CONFIDENCE_HIGH);
        assert_eq!(results[0].source, RecommendationSource::Heuristic);
    }

    #[test]
    fn initial_mode_falls_back_to_first_three() {
        let clubs = sample();
        let refs = refs(&clubs);
        let ranker = Ranker::new(&refs);

        let results = ranker.rank(&["underwater hockey".to_string()], None, None, &HashSet::new());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].club_name, "Robotics Club");
        assert!(results.iter().all(|r| r.confidence == CONFIDENCE_MEDIUM));
    }

    #[test]
    fn follow_up_applies_intent_predicate_and_exclusion() {
        let clubs = sample();
        let refs = refs(&clubs);
        let ranker = Ranker::new(&refs);

        let mut excluded = HashSet::new();
        excluded.insert("robotics club".to_string());

        let results = ranker.rank(
            &[],
            Some("anything competitive?"),
            Some(&Intent::Competitive),
            &excluded,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].club_name, "Debate Team");
    }

    #[test]
    fn excluded_names_never_reappear() {
        let clubs = sample();
        let refs = refs(&clubs);
        let ranker = Ranker::new(&refs);

        let excluded: HashSet<String> = ["robotics club", "drama society"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let results = ranker.rank(
            &[],
            Some("show me other clubs"),
            Some(&Intent::DifferentClubs),
            &excluded,
        );
        assert!(results
            .iter()
            .all(|r| !excluded.contains(&r.normalized_name())));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn empty_predicate_yield_falls_back_to_tokens() {
        let clubs = sample();
        let refs = refs(&clubs);
        let ranker = Ranker::new(&refs);

        // No club matches the business predicate; tokens take over.
        let results = ranker.rank(
            &[],
            Some("maybe volunteering business stuff"),
            Some(&Intent::Business),
            &HashSet::new(),
        );
        assert!(!results.is_empty());
        assert_eq!(results[0].club_name, "Key Club");
        assert_eq!(results[0].confidence, CONFIDENCE_HIGH);
        // The rest come through at medium confidence, catalog order kept.
        assert!(results[1..].iter().all(|r| r.confidence == CONFIDENCE_MEDIUM));
    }

    #[test]
    fn time_adjustment_filters_by_commitment() {
        let mut clubs = sample();
        clubs[2].time_commitment = TimeCommitment::Low;
        let refs = refs(&clubs);
        let ranker = Ranker::new(&refs);

        let results = ranker.rank(
            &[],
            Some("less time please"),
            Some(&Intent::TimeAdjustment(TimeCommitment::Low)),
            &HashSet::new(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].club_name, "Debate Team");
    }

    #[test]
    fn rank_is_idempotent() {
        let clubs = sample();
        let refs = refs(&clubs);
        let ranker = Ranker::new(&refs);
        let interests = vec!["debate".to_string(), "robots".to_string()];

        let first = ranker.rank(&interests, None, None, &HashSet::new());
        let second = ranker.rank(&interests, None, None, &HashSet::new());
        assert_eq!(first, second);
    }

    #[test]
    fn results_cap_at_five() {
        let clubs: Vec<ClubRecord> = (0..8)
            .map(|i| club(&format!("Club {}", i), "Arts", "painting and drawing"))
            .collect();
        let refs: Vec<&ClubRecord> = clubs.iter().collect();
        let ranker = Ranker::new(&refs);

        let results = ranker.rank(&["painting".to_string()], None, None, &HashSet::new());
        assert_eq!(results.len(), 5);
    }
}
