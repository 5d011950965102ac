use super::TimeCommitment;

/// Classification of a follow-up utterance.
///
/// Keyword-driven with a fixed priority order; the first matching category
/// wins regardless of how many keywords other categories would have hit.
/// Predictability is the point here, not linguistic sophistication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Business,
    Stem,
    Competitive,
    Creative,
    Social,
    Academic,
    Leadership,
    /// Carries the requested time-commitment target
    TimeAdjustment(TimeCommitment),
    DifferentClubs,
    General,
}

const BUSINESS_KEYWORDS: &[&str] = &["business", "entrepreneur", "startup", "finance", "marketing"];
const STEM_KEYWORDS: &[&str] = &[
    "stem",
    "science",
    "technology",
    "engineering",
    "math",
    "robotics",
    "coding",
    "programming",
];
const COMPETITIVE_KEYWORDS: &[&str] = &["compete", "competitive", "competition", "tournament", "win"];
const CREATIVE_KEYWORDS: &[&str] = &["creative", "art", "draw", "paint", "music", "write", "design"];
const SOCIAL_KEYWORDS: &[&str] = &["social", "friends", "people", "community", "fun", "hang out"];
const ACADEMIC_KEYWORDS: &[&str] = &["academic", "study", "learn", "grades", "college", "scholar"];
const LEADERSHIP_KEYWORDS: &[&str] = &["lead", "leader", "leadership", "organize", "president"];
const TIME_KEYWORDS: &[&str] = &["time", "hours", "commitment", "busy", "schedule"];
const DIFFERENT_KEYWORDS: &[&str] = &["different", "other", "else", "instead", "more options", "new"];

impl Intent {
    /// Classifies a follow-up utterance by case-insensitive substring
    /// matching, in fixed priority order.
    pub fn extract(text: &str) -> Intent {
        let lower = text.to_lowercase();

        if contains_any(&lower, BUSINESS_KEYWORDS) {
            Intent::Business
        } else if contains_any(&lower, STEM_KEYWORDS) {
            Intent::Stem
        } else if contains_any(&lower, COMPETITIVE_KEYWORDS) {
            Intent::Competitive
        } else if contains_any(&lower, CREATIVE_KEYWORDS) {
            Intent::Creative
        } else if contains_any(&lower, SOCIAL_KEYWORDS) {
            Intent::Social
        } else if contains_any(&lower, ACADEMIC_KEYWORDS) {
            Intent::Academic
        } else if contains_any(&lower, LEADERSHIP_KEYWORDS) {
            Intent::Leadership
        } else if contains_any(&lower, TIME_KEYWORDS) {
            // Defaults to Medium when no target is named in the utterance.
            Intent::TimeAdjustment(TimeCommitment::from_text(&lower))
        } else if contains_any(&lower, DIFFERENT_KEYWORDS) {
            Intent::DifferentClubs
        } else {
            Intent::General
        }
    }

    /// Stable wire label for the `followUpIntent` response field.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Business => "business",
            Intent::Stem => "stem",
            Intent::Competitive => "competitive",
            Intent::Creative => "creative",
            Intent::Social => "social",
            Intent::Academic => "academic",
            Intent::Leadership => "leadership",
            Intent::TimeAdjustment(_) => "time_adjustment",
            Intent::DifferentClubs => "different_clubs",
            Intent::General => "general",
        }
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}
