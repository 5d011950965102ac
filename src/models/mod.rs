use serde::{Deserialize, Serialize};

pub mod intent;
pub mod session;

pub use intent::Intent;
pub use session::SessionContext;

/// Broad experience category a club offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClubType {
    Academic,
    Creative,
    Competitive,
    Leadership,
    Social,
}

/// Weekly time demand of a club
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeCommitment {
    Low,
    Medium,
    High,
}

impl TimeCommitment {
    /// Case-insensitive substring detection in free commitment text,
    /// defaulting to `Medium` when neither extreme is mentioned.
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("low") {
            TimeCommitment::Low
        } else if lower.contains("high") {
            TimeCommitment::High
        } else {
            TimeCommitment::Medium
        }
    }
}

/// Normalized catalog entry describing one club at one school.
///
/// Immutable once produced by the catalog normalizer; the ranker and merger
/// only ever borrow these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClubRecord {
    pub name: String,
    pub school: String,
    pub category: String,
    #[serde(rename = "type")]
    pub club_type: ClubType,
    pub time_commitment: TimeCommitment,
    /// Derived search terms, non-unique, order relevant
    pub interests: Vec<String>,
    pub description: String,
    pub activities: Vec<String>,
    pub benefits: Vec<String>,
    pub grade_levels: Vec<String>,
}

impl ClubRecord {
    /// Concatenated lowercase text used for token matching.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name,
            self.category,
            self.description,
            self.interests.join(" ")
        )
        .to_lowercase()
    }
}

// ============================================================================
// Raw Catalog Source Types
// ============================================================================

/// One school's worth of raw catalog data, as supplied by the catalog source.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSchoolEntry {
    pub school: String,
    #[serde(default)]
    pub clubs: Vec<RawClub>,
}

/// Raw club object of heterogeneous shape; every field beyond the name may
/// be absent. Normalization degrades missing fields to defaults rather than
/// failing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClub {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub commitment: Option<String>,
    #[serde(default)]
    pub grade_levels: Vec<String>,
}

// ============================================================================
// Recommendations
// ============================================================================

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Heuristic,
    AiParsed,
    Merged,
}

/// Confidence assigned to heuristic matches
pub const CONFIDENCE_HIGH: f64 = 85.0;
/// Confidence assigned to AI-parsed candidates
pub const CONFIDENCE_AI: f64 = 75.0;
/// Confidence assigned to fallback / weak matches
pub const CONFIDENCE_MEDIUM: f64 = 60.0;

/// A single ranked club suggestion produced for one conversation turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub club_name: String,
    pub category: String,
    pub reasoning: String,
    /// Always finite, in [0, 100]
    pub confidence: f64,
    pub source: RecommendationSource,
}

impl Recommendation {
    /// Key used for dedup and follow-up exclusion: trimmed, lowercased name.
    pub fn normalized_name(&self) -> String {
        normalize_club_name(&self.club_name)
    }
}

/// Case-insensitive, whitespace-trimmed club name comparison key
pub fn normalize_club_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Qualitative estimate of overall response quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}
