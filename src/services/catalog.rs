use std::path::Path;

use crate::models::{ClubRecord, ClubType, RawClub, RawSchoolEntry, TimeCommitment};

/// Fixed category → club type lookup; unmapped categories become `Social`.
const CATEGORY_TYPES: &[(&str, ClubType)] = &[
    ("stem", ClubType::Academic),
    ("academic", ClubType::Academic),
    ("debate", ClubType::Competitive),
    ("sports", ClubType::Competitive),
    ("arts", ClubType::Creative),
    ("music", ClubType::Creative),
    ("business", ClubType::Leadership),
    ("leadership", ClubType::Leadership),
    ("service", ClubType::Social),
    ("cultural", ClubType::Social),
];

/// Immutable, normalized club catalog for all known schools.
///
/// Built once at startup and shared read-only across requests; the engine
/// never recommends across school partitions.
#[derive(Debug, Clone)]
pub struct Catalog {
    clubs: Vec<ClubRecord>,
}

impl Catalog {
    /// Normalizes raw per-school entries into a flat record set.
    pub fn from_raw(entries: Vec<RawSchoolEntry>) -> Self {
        let clubs = entries
            .into_iter()
            .flat_map(|entry| {
                let school = entry.school;
                entry
                    .clubs
                    .into_iter()
                    .map(move |club| normalize_club(club, school.clone()))
            })
            .collect();
        Self { clubs }
    }

    /// Loads and normalizes the catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let entries: Vec<RawSchoolEntry> = serde_json::from_str(&raw)?;
        let catalog = Self::from_raw(entries);
        tracing::info!(
            clubs = catalog.clubs.len(),
            schools = catalog.schools().len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// All clubs for one school, case-insensitively matched, in catalog
    /// order. Empty means the school is unknown.
    pub fn clubs_for(&self, school: &str) -> Vec<&ClubRecord> {
        let wanted = school.trim();
        self.clubs
            .iter()
            .filter(|c| c.school.eq_ignore_ascii_case(wanted))
            .collect()
    }

    /// Sorted, deduplicated school names.
    pub fn schools(&self) -> Vec<String> {
        let mut schools: Vec<String> = self.clubs.iter().map(|c| c.school.clone()).collect();
        schools.sort();
        schools.dedup();
        schools
    }
}

/// Normalizes one raw club; total and deterministic, malformed optional
/// fields degrade to defaults.
fn normalize_club(raw: RawClub, school: String) -> ClubRecord {
    let category = raw
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "General".to_string());

    let club_type = derive_type(&category);
    let time_commitment = raw
        .commitment
        .as_deref()
        .map(TimeCommitment::from_text)
        .unwrap_or(TimeCommitment::Medium);
    let interests = derive_interests(&category, &raw.activities, &raw.benefits);

    ClubRecord {
        name: raw.name.trim().to_string(),
        school,
        category,
        club_type,
        time_commitment,
        interests,
        description: raw.description.unwrap_or_default(),
        activities: raw.activities,
        benefits: raw.benefits,
        grade_levels: raw.grade_levels,
    }
}

/// `[category] + activities[..3] + benefits[..2]`, falling back to the
/// category alone when nothing else is present.
fn derive_interests(category: &str, activities: &[String], benefits: &[String]) -> Vec<String> {
    let mut interests = vec![category.to_string()];
    interests.extend(activities.iter().take(3).cloned());
    interests.extend(benefits.iter().take(2).cloned());
    interests.retain(|i| !i.trim().is_empty());
    if interests.is_empty() {
        interests.push("General".to_string());
    }
    interests
}

fn derive_type(category: &str) -> ClubType {
    let lower = category.to_lowercase();
    CATEGORY_TYPES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, ty)| *ty)
        .unwrap_or(ClubType::Social)
}
