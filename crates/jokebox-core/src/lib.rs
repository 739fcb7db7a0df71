use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum JokeboxError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
}

/// One stored joke. Ids are assigned by the store and never reused while
/// the record exists; `joke` keeps the text exactly as submitted.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Joke {
    pub id: u64,
    pub joke: String,
    pub topics: Vec<String>,
}

/// An incoming joke before validation. This is also the create-request wire
/// shape: `{"joke": "...", "topics": ["..."]}`.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct JokeDraft {
    pub joke: String,
    pub topics: Vec<String>,
}

/// A draft that passed validation. The only way to obtain one is
/// [`JokeDraft::validate`], so holding a value means the invariants hold.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ValidJoke {
    joke: String,
    topics: Vec<String>,
}

impl JokeDraft {
    /// Check the draft invariants: text must be non-empty after trimming,
    /// and at least one topic is required. Topics are kept as given;
    /// duplicate or empty-string entries are accepted.
    ///
    /// # Errors
    /// Returns [`JokeboxError::Validation`] when an invariant is violated.
    pub fn validate(self) -> Result<ValidJoke, JokeboxError> {
        if self.joke.trim().is_empty() {
            return Err(JokeboxError::Validation("Joke text cannot be empty".to_string()));
        }
        if self.topics.is_empty() {
            return Err(JokeboxError::Validation("At least one topic is required".to_string()));
        }
        Ok(ValidJoke { joke: self.joke, topics: self.topics })
    }
}

impl ValidJoke {
    #[must_use]
    pub fn into_joke(self, id: u64) -> Joke {
        Joke { id, joke: self.joke, topics: self.topics }
    }
}

/// Id for the next created joke: one past the current maximum, or 1 when the
/// collection is empty. Deleting the highest id makes that id assignable again.
#[must_use]
pub fn next_joke_id(jokes: &[Joke]) -> u64 {
    jokes.iter().map(|joke| joke.id).max().map_or(1, |max| max + 1)
}

/// Uniform random pick over the whole collection.
///
/// # Errors
/// Returns [`JokeboxError::NotFound`] when the collection is empty.
pub fn random_joke(jokes: &[Joke]) -> Result<&Joke, JokeboxError> {
    jokes
        .choose(&mut rand::thread_rng())
        .ok_or_else(|| JokeboxError::NotFound("No jokes found".to_string()))
}

/// Case-insensitive substring search over joke text and topics, returning a
/// random sample of at most `limit` distinct matches in unspecified order.
/// A `limit` beyond the match count returns every match exactly once.
///
/// # Errors
/// Returns [`JokeboxError::NotFound`] when nothing matches.
pub fn search_jokes<'a>(
    jokes: &'a [Joke],
    query: &str,
    limit: usize,
) -> Result<Vec<&'a Joke>, JokeboxError> {
    let needle = query.to_lowercase();
    let matches = jokes
        .iter()
        .filter(|joke| {
            joke.joke.to_lowercase().contains(&needle)
                || joke.topics.iter().any(|topic| topic.to_lowercase().contains(&needle))
        })
        .collect::<Vec<_>>();

    if matches.is_empty() {
        return Err(JokeboxError::NotFound("No matching jokes found".to_string()));
    }

    let sample_size = limit.min(matches.len());
    Ok(matches.choose_multiple(&mut rand::thread_rng(), sample_size).copied().collect())
}
