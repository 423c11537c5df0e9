//! Term-frequency keyword scoring

/// Occurrences in the title count this many times more than in the body
const TITLE_WEIGHT: usize = 3;

/// Score a record's title and body against a query
///
/// The query is case-folded and split on whitespace; each token contributes
/// its occurrence count in the lowercased body plus three times its count in
/// the lowercased title. A record matching no token scores zero, and the
/// keyword search path excludes it entirely rather than ranking it low.
pub fn keyword_score(query: &str, title: &str, content: &str) -> f32 {
    let title = title.to_lowercase();
    let content = content.to_lowercase();

    let mut score = 0usize;
    for token in query.to_lowercase().split_whitespace() {
        score += title.matches(token).count() * TITLE_WEIGHT;
        score += content.matches(token).count();
    }
    score as f32
}
