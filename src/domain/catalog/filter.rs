//! Search and genre filtering for the movie list.

use super::Movie;

/// Filters movies by free-text search and genre.
///
/// `search_text` matches case-insensitively anywhere in the title or the
/// description; an empty string matches everything. `genre` must be one of
/// the movie's genres exactly; `None` matches everything. Both conditions
/// must hold. Input order is preserved.
pub fn filter_movies<'a>(movies: &'a [Movie], search_text: &str, genre: Option<&str>) -> Vec<&'a Movie> {
    let needle = search_text.to_lowercase();

    movies
        .iter()
        .filter(|movie| matches_search(movie, &needle))
        .filter(|movie| genre.map_or(true, |g| movie.has_genre(g)))
        .collect()
}

fn matches_search(movie: &Movie, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    movie.title.to_lowercase().contains(needle)
        || movie
            .description
            .as_deref()
            .map_or(false, |d| d.to_lowercase().contains(needle))
}

/// Returns every genre used in the catalog, deduplicated, in first-seen order.
pub fn distinct_genres(movies: &[Movie]) -> Vec<&str> {
    let mut genres: Vec<&str> = Vec::new();
    for genre in movies.iter().flat_map(|m| m.genre.iter()) {
        if !genres.contains(&genre.as_str()) {
            genres.push(genre);
        }
    }
    genres
}
