use std::collections::HashSet;

use crate::models::{
    normalize_club_name, ClubRecord, Recommendation, RecommendationSource, CONFIDENCE_AI,
};

/// Builds the reproducible prompt sent to the AI suggestion source from the
/// free-text query, the context-builder summary, and the school's catalog.
pub fn build_prompt(query: &str, context_summary: &str, clubs: &[&ClubRecord]) -> String {
    let club_list: Vec<String> = clubs
        .iter()
        .map(|c| format!("- {} ({}): {}", c.name, c.category, c.description))
        .collect();

    format!(
        "You are a school club advisor. Suggest clubs for this student.\n\n\
         Student request: {}\n\n\
         Session context:\n{}\n\n\
         Available clubs:\n{}\n\n\
         Recommend up to 5 clubs from the list above, by exact name, with a \
         short reason for each.",
        query,
        context_summary,
        club_list.join("\n")
    )
}

/// Extracts provisional recommendations from the AI's free-form answer.
///
/// Scans for catalog club names by case-insensitive substring containment,
/// ordered by first occurrence in the text, deduplicated by normalized
/// name. An empty result is not an error; it means the AI gave an answer
/// we cannot act on and the heuristic list stands alone.
pub fn parse_recommendations(response: &str, clubs: &[&ClubRecord]) -> Vec<Recommendation> {
    let mut seen = HashSet::new();
    let mut found: Vec<(usize, Recommendation)> = Vec::new();

    for club in clubs {
        let Some(position) = find_case_insensitive(response, &club.name) else {
            continue;
        };
        if !seen.insert(normalize_club_name(&club.name)) {
            continue;
        }
        found.push((
            position,
            Recommendation {
                club_name: club.name.clone(),
                category: club.category.clone(),
                reasoning: surrounding_sentence(response, position)
                    .unwrap_or_else(|| "Suggested by the advisor".to_string()),
                confidence: CONFIDENCE_AI,
                source: RecommendationSource::AiParsed,
            },
        ));
    }

    found.sort_by_key(|(position, _)| *position);
    let recommendations: Vec<Recommendation> =
        found.into_iter().map(|(_, rec)| rec).collect();

    tracing::debug!(
        parsed = recommendations.len(),
        response_len = response.len(),
        "Parsed AI suggestion text"
    );
    recommendations
}

/// Byte offset of the first case-insensitive occurrence of `needle` in
/// `haystack`, against the original text rather than a lowercased copy.
/// Lowercasing the whole haystack can change byte lengths for non-ASCII
/// text and leave offsets pointing at the wrong place.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| starts_with_ignore_case(&haystack[i..], needle))
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut chars = text.chars();
    prefix.chars().all(|p| {
        chars
            .next()
            .is_some_and(|c| c.to_lowercase().eq(p.to_lowercase()))
    })
}

/// The sentence containing the mention, trimmed, as its reasoning.
fn surrounding_sentence(text: &str, position: usize) -> Option<String> {
    let start = text[..position]
        .rfind(['.', '!', '?', '\n'])
        .map_or(0, |i| i + 1);
    let end = text[position..]
        .find(['.', '!', '?', '\n'])
        .map_or(text.len(), |i| position + i);
    let sentence = text[start..end].trim();
    (!sentence.is_empty()).then(|| sentence.to_string())
}
