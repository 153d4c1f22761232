//! CatalogService - movie browsing and show listings.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::catalog::{
    distinct_genres, filter_movies, group_by_theater_then_date, Movie, MovieSort, ShowGrouping,
};
use crate::domain::foundation::{MovieId, StoreError};
use crate::ports::CatalogReader;

/// Errors returned by catalog queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Movie not found: {0}")]
    MovieNotFound(MovieId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Returns true if retrying may help.
    pub fn is_transient(&self) -> bool {
        matches!(self, CatalogError::Store(e) if e.is_transient())
    }
}

/// What the browse screen asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieQuery {
    /// Matched against title and description; empty matches everything.
    pub search: String,
    pub genre: Option<String>,
    pub sort: MovieSort,
}

impl MovieQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn sort(mut self, sort: MovieSort) -> Self {
        self.sort = sort;
        self
    }
}

/// Filtered movies plus the unfiltered count ("Showing N of M").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieListing {
    pub movies: Vec<Movie>,
    pub total: usize,
    /// Genres across the unfiltered list, for the genre picker.
    pub genres: Vec<String>,
}

pub struct CatalogService {
    reader: Arc<dyn CatalogReader>,
}

impl CatalogService {
    pub fn new(reader: Arc<dyn CatalogReader>) -> Self {
        Self { reader }
    }

    /// Fetches active movies in the requested order and filters them.
    pub async fn browse(&self, query: &MovieQuery) -> Result<MovieListing, CatalogError> {
        let all = self.reader.list_active_movies(query.sort).await?;
        let genres = distinct_genres(&all).into_iter().map(str::to_string).collect();
        let movies: Vec<Movie> = filter_movies(&all, &query.search, query.genre.as_deref())
            .into_iter()
            .cloned()
            .collect();

        tracing::debug!(shown = movies.len(), total = all.len(), "browse");
        Ok(MovieListing {
            movies,
            total: all.len(),
            genres,
        })
    }

    /// Returns one movie, or `MovieNotFound`.
    pub async fn movie(&self, movie_id: &MovieId) -> Result<Movie, CatalogError> {
        self.reader
            .get_movie(movie_id)
            .await?
            .ok_or_else(|| CatalogError::MovieNotFound(movie_id.clone()))
    }

    /// Groups the movie's shows from `today` on by theater, then date.
    pub async fn theater_listing(
        &self,
        movie_id: &MovieId,
        today: NaiveDate,
    ) -> Result<ShowGrouping, CatalogError> {
        let shows = self.reader.list_upcoming_shows(movie_id, today).await?;
        let grouping = group_by_theater_then_date(shows);

        if grouping.excluded_count() > 0 {
            tracing::warn!(
                movie_id = %movie_id,
                excluded = grouping.excluded_count(),
                "shows left out of listing"
            );
        }
        Ok(grouping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryCatalogStore;
    use crate::domain::catalog::{Show, Theater};
    use crate::domain::foundation::{ShowId, TheaterId};
    use crate::domain::subscription::TierLevel;

    fn movie(id: &str, title: &str, genres: &[&str]) -> Movie {
        Movie {
            id: MovieId::new(id).unwrap(),
            title: title.to_string(),
            description: None,
            genre: genres.iter().map(|g| g.to_string()).collect(),
            rating: None,
            release_date: None,
            duration_minutes: None,
            language: None,
            poster_url: None,
            video_url: None,
            required_level: TierLevel::FREE,
        }
    }

    fn show(id: &str, theater: Option<&str>, date: &str) -> Show {
        Show {
            id: ShowId::new(id).unwrap(),
            movie_id: MovieId::new("m1").unwrap(),
            theater: theater.map(|t| Theater {
                id: TheaterId::new(t).unwrap(),
                name: t.to_uppercase(),
                location: None,
                city: None,
                facilities: Vec::new(),
            }),
            screen: None,
            show_date: Some(date.to_string()),
            show_time: None,
            price: 180.0,
            available_seats: 10,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn browse_filters_but_reports_total() {
        let store = InMemoryCatalogStore::new()
            .with_movie(movie("m1", "Dune", &["Sci-Fi"]))
            .with_movie(movie("m2", "Arrival", &["Sci-Fi", "Drama"]))
            .with_movie(movie("m3", "Heat", &["Crime"]));
        let service = CatalogService::new(Arc::new(store));

        let listing = service
            .browse(&MovieQuery::new().genre("Sci-Fi").search("ar"))
            .await
            .unwrap();

        assert_eq!(listing.total, 3);
        assert_eq!(listing.movies.len(), 1);
        assert_eq!(listing.movies[0].title, "Arrival");
        assert_eq!(listing.genres, vec!["Sci-Fi", "Drama", "Crime"]);
    }

    #[tokio::test]
    async fn theater_listing_groups_and_counts_exclusions() {
        let store = InMemoryCatalogStore::new()
            .with_show(show("s1", Some("t1"), "2024-05-01"))
            .with_show(show("s2", Some("t1"), "2024-05-02"))
            .with_show(show("s3", None, "2024-05-02"));
        let service = CatalogService::new(Arc::new(store));

        let grouping = service
            .theater_listing(&MovieId::new("m1").unwrap(), today())
            .await
            .unwrap();

        assert_eq!(grouping.theaters.len(), 1);
        assert_eq!(grouping.theaters[0].dates.len(), 2);
        assert_eq!(grouping.excluded_count(), 1);
    }

    #[tokio::test]
    async fn store_errors_surface_as_catalog_errors() {
        let store = InMemoryCatalogStore::new().with_error(StoreError::unavailable("down"));
        let service = CatalogService::new(Arc::new(store));

        let err = service.browse(&MovieQuery::new()).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn unknown_movie_is_not_found() {
        let service = CatalogService::new(Arc::new(InMemoryCatalogStore::new()));
        let id = MovieId::new("missing").unwrap();
        assert_eq!(
            service.movie(&id).await,
            Err(CatalogError::MovieNotFound(id))
        );
    }
}
