use crate::models::SessionContext;

/// Returned when nothing at all is known about the user.
pub const NO_SESSION_DATA: &str = "No previous session data available.";

/// How many recent queries surface in the summary. The store retains ten;
/// only the freshest three are worth prompt space.
const CONTEXT_QUERY_COUNT: usize = 3;

/// Renders the accumulated session as a compact multi-line summary, one
/// line per populated field. Consumed verbatim by both the heuristic
/// ranker's inputs and the AI prompt, so it must stay pure and stable.
pub fn build_context(session: &SessionContext) -> String {
    if session.is_empty() {
        return NO_SESSION_DATA.to_string();
    }

    let mut lines = Vec::new();

    if let Some(school) = &session.school {
        lines.push(format!("User attends {}", school));
    }
    if let Some(grade) = session.grade {
        lines.push(format!("User is in grade {}", grade));
    }
    if !session.interests.is_empty() {
        lines.push(format!("User interests: {}", session.interests.join(", ")));
    }
    if !session.categories.is_empty() {
        lines.push(format!(
            "Categories explored: {}",
            session.categories.join(", ")
        ));
    }
    if let Some(activity_type) = &session.activity_type {
        lines.push(format!("Preferred experience types: {}", activity_type));
    }
    if let Some(time) = &session.time_commitment {
        lines.push(format!("Preferred time commitment: {}", time));
    }
    if let Some(goal) = &session.goal {
        lines.push(format!("Primary goal: {}", goal));
    }
    if let Some(teamwork) = &session.teamwork {
        lines.push(format!("Teamwork preference: {}", teamwork));
    }
    if !session.clubs_viewed.is_empty() {
        lines.push(format!(
            "Previously viewed clubs: {}",
            session.clubs_viewed.join(", ")
        ));
    }
    if !session.query_history.is_empty() {
        let recent: Vec<&str> = session
            .query_history
            .iter()
            .rev()
            .take(CONTEXT_QUERY_COUNT)
            .rev()
            .map(String::as_str)
            .collect();
        lines.push(format!("Previous queries: {}", recent.join("; ")));
    }

    lines.join("\n")
}
