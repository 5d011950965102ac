use serde::{Deserialize, Serialize};

/// Bounded-list invariants, enforced here and nowhere downstream.
const MAX_INTERESTS: usize = 10;
const MAX_CATEGORIES: usize = 5;
const MAX_CLUBS_VIEWED: usize = 20;
const MAX_QUERY_HISTORY: usize = 10;

/// Fixed category vocabulary; values outside it are silently dropped.
const CATEGORY_VOCABULARY: &[&str] = &[
    "STEM",
    "Arts",
    "Music",
    "Sports",
    "Debate",
    "Business",
    "Leadership",
    "Service",
    "Cultural",
    "Academic",
];

const ACTIVITY_TYPES: &[&str] = &["academic", "creative", "competitive", "leadership", "social"];
const TIME_COMMITMENTS: &[&str] = &["low", "medium", "high"];
const GOALS: &[&str] = &["learn", "compete", "socialize", "lead", "college_prep"];
const TEAMWORK: &[&str] = &["team", "solo", "either"];

/// Accumulated, validated preference state for one conversation.
///
/// Mutated additively each turn through [`SessionContext::apply`] and
/// [`SessionContext::record_viewed`]; both silently discard anything that
/// fails the allow-list or bound checks, so raw unvalidated input never
/// lands in a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub school: Option<String>,
    pub grade: Option<u8>,
    pub interests: Vec<String>,
    pub categories: Vec<String>,
    pub activity_type: Option<String>,
    pub time_commitment: Option<String>,
    pub goal: Option<String>,
    pub teamwork: Option<String>,
    pub clubs_viewed: Vec<String>,
    /// Insertion-ordered; only the last 3 entries are surfaced by the
    /// context builder, the wider retention is intentional.
    pub query_history: Vec<String>,
}

/// One turn's worth of candidate updates, pre-validation.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub school: Option<String>,
    pub grade: Option<u8>,
    pub interests: Vec<String>,
    pub activity_type: Option<String>,
    pub time_commitment: Option<String>,
    pub goal: Option<String>,
    pub teamwork: Option<String>,
    pub query: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field carries data; drives the context-builder sentinel.
    pub fn is_empty(&self) -> bool {
        self.school.is_none()
            && self.grade.is_none()
            && self.interests.is_empty()
            && self.categories.is_empty()
            && self.activity_type.is_none()
            && self.time_commitment.is_none()
            && self.goal.is_none()
            && self.teamwork.is_none()
            && self.clubs_viewed.is_empty()
            && self.query_history.is_empty()
    }

    /// Applies one turn's updates, validating every field and silently
    /// dropping anything invalid.
    pub fn apply(&mut self, update: SessionUpdate) {
        if let Some(school) = update.school {
            let trimmed = school.trim();
            if !trimmed.is_empty() {
                self.school = Some(trimmed.to_string());
            }
        }

        if let Some(grade) = update.grade {
            if (9..=12).contains(&grade) {
                self.grade = Some(grade);
            }
        }

        for interest in update.interests {
            let trimmed = interest.trim().to_string();
            if trimmed.is_empty() || self.interests.len() >= MAX_INTERESTS {
                continue;
            }
            if !self
                .interests
                .iter()
                .any(|i| i.eq_ignore_ascii_case(&trimmed))
            {
                self.interests.push(trimmed);
            }
        }

        if let Some(value) = validated(update.activity_type, ACTIVITY_TYPES) {
            self.activity_type = Some(value);
        }
        if let Some(value) = validated(update.time_commitment, TIME_COMMITMENTS) {
            self.time_commitment = Some(value);
        }
        if let Some(value) = validated(update.goal, GOALS) {
            self.goal = Some(value);
        }
        if let Some(value) = validated(update.teamwork, TEAMWORK) {
            self.teamwork = Some(value);
        }

        if let Some(query) = update.query {
            let trimmed = query.trim().to_string();
            if !trimmed.is_empty() {
                if self.query_history.len() >= MAX_QUERY_HISTORY {
                    self.query_history.remove(0);
                }
                self.query_history.push(trimmed);
            }
        }
    }

    /// Records clubs surfaced to the user this turn, updating viewed names
    /// and observed categories under their respective bounds.
    pub fn record_viewed<'a>(&mut self, clubs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (name, category) in clubs {
            let name = name.trim().to_string();
            if !name.is_empty()
                && !self
                    .clubs_viewed
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(&name))
            {
                if self.clubs_viewed.len() >= MAX_CLUBS_VIEWED {
                    self.clubs_viewed.remove(0);
                }
                self.clubs_viewed.push(name);
            }

            if let Some(canonical) = CATEGORY_VOCABULARY
                .iter()
                .find(|c| c.eq_ignore_ascii_case(category.trim()))
            {
                if self.categories.len() < MAX_CATEGORIES
                    && !self.categories.iter().any(|c| c == canonical)
                {
                    self.categories.push(canonical.to_string());
                }
            }
        }
    }
}

/// Allow-list check: returns the trimmed lowercase value only when it is in
/// the vocabulary.
fn validated(value: Option<String>, vocabulary: &[&str]) -> Option<String> {
    let value = value?;
    let lower = value.trim().to_lowercase();
    vocabulary.contains(&lower.as_str()).then_some(lower)
}
