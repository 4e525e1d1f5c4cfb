//! Comparison keys for queries, titles and filter terms.

/// Normalize free text into a comparison key.
///
/// The text is lower-cased, every character that is not alphanumeric acts as a
/// separator, and runs of separators collapse into a single space. Queries,
/// scraped titles and title filter terms all go through this function so that
/// `"Movie.Name.2020"` and `"movie name (2020)"` compare equal.
pub fn normalize_query(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mapped: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}
