//! In-memory catalog store for tests and local demos.
//!
//! Mirrors the ordering the hosted store applies: ascending by the sort
//! column with missing values last, shows by date then time.
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned.

use std::cmp::Ordering;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::catalog::{Movie, MovieSort, Show};
use crate::domain::foundation::{MovieId, StoreError};
use crate::ports::CatalogReader;

#[derive(Debug, Clone)]
struct Listed<T> {
    record: T,
    active: bool,
}

/// Catalog store backed by in-process vectors.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    movies: RwLock<Vec<Listed<Movie>>>,
    shows: RwLock<Vec<Listed<Show>>>,
    force_error: RwLock<Option<StoreError>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an active movie.
    pub fn with_movie(self, movie: Movie) -> Self {
        self.movies.write().unwrap().push(Listed {
            record: movie,
            active: true,
        });
        self
    }

    /// Adds a movie that has been taken off the catalog.
    pub fn with_inactive_movie(self, movie: Movie) -> Self {
        self.movies.write().unwrap().push(Listed {
            record: movie,
            active: false,
        });
        self
    }

    /// Adds an active show.
    pub fn with_show(self, show: Show) -> Self {
        self.shows.write().unwrap().push(Listed {
            record: show,
            active: true,
        });
        self
    }

    /// Adds a cancelled show.
    pub fn with_cancelled_show(self, show: Show) -> Self {
        self.shows.write().unwrap().push(Listed {
            record: show,
            active: false,
        });
        self
    }

    /// Forces all queries to return the specified error.
    pub fn with_error(self, error: StoreError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    fn check_error(&self) -> Result<(), StoreError> {
        match self.force_error.read().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Ascending with `None` last.
fn nulls_last<T: PartialOrd>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalogStore {
    async fn list_active_movies(&self, sort: MovieSort) -> Result<Vec<Movie>, StoreError> {
        self.check_error()?;

        let mut movies: Vec<Movie> = self
            .movies
            .read()
            .unwrap()
            .iter()
            .filter(|listed| listed.active)
            .map(|listed| listed.record.clone())
            .collect();

        match sort {
            MovieSort::Title => movies.sort_by(|a, b| a.title.cmp(&b.title)),
            MovieSort::Rating => movies.sort_by(|a, b| nulls_last(&a.rating, &b.rating)),
            MovieSort::ReleaseDate => {
                movies.sort_by(|a, b| nulls_last(&a.release_date, &b.release_date))
            }
        }
        Ok(movies)
    }

    async fn get_movie(&self, movie_id: &MovieId) -> Result<Option<Movie>, StoreError> {
        self.check_error()?;

        Ok(self
            .movies
            .read()
            .unwrap()
            .iter()
            .find(|listed| &listed.record.id == movie_id)
            .map(|listed| listed.record.clone()))
    }

    async fn list_upcoming_shows(
        &self,
        movie_id: &MovieId,
        from: NaiveDate,
    ) -> Result<Vec<Show>, StoreError> {
        self.check_error()?;

        let mut shows: Vec<Show> = self
            .shows
            .read()
            .unwrap()
            .iter()
            .filter(|listed| listed.active && &listed.record.movie_id == movie_id)
            .filter(|listed| listed.record.calendar_date().map_or(false, |d| d >= from))
            .map(|listed| listed.record.clone())
            .collect();

        shows.sort_by(|a, b| {
            a.calendar_date()
                .cmp(&b.calendar_date())
                .then_with(|| nulls_last(&a.show_time, &b.show_time))
        });
        Ok(shows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Theater;
    use crate::domain::foundation::{ShowId, TheaterId};
    use crate::domain::subscription::TierLevel;
    use chrono::NaiveTime;

    fn movie(id: &str, title: &str, rating: Option<f32>) -> Movie {
        Movie {
            id: MovieId::new(id).unwrap(),
            title: title.to_string(),
            description: None,
            genre: Vec::new(),
            rating,
            release_date: None,
            duration_minutes: None,
            language: None,
            poster_url: None,
            video_url: None,
            required_level: TierLevel::FREE,
        }
    }

    fn show(id: &str, movie_id: &str, date: &str, time: &str) -> Show {
        Show {
            id: ShowId::new(id).unwrap(),
            movie_id: MovieId::new(movie_id).unwrap(),
            theater: Some(Theater {
                id: TheaterId::new("t1").unwrap(),
                name: "Main".to_string(),
                location: None,
                city: None,
                facilities: Vec::new(),
            }),
            screen: None,
            show_date: Some(date.to_string()),
            show_time: NaiveTime::parse_from_str(time, "%H:%M").ok(),
            price: 150.0,
            available_seats: 20,
        }
    }

    #[tokio::test]
    async fn movies_sorted_by_rating_with_missing_last() {
        let store = InMemoryCatalogStore::new()
            .with_movie(movie("m1", "A", None))
            .with_movie(movie("m2", "B", Some(8.1)))
            .with_movie(movie("m3", "C", Some(6.5)))
            .with_inactive_movie(movie("m4", "D", Some(1.0)));

        let ids: Vec<String> = store
            .list_active_movies(MovieSort::Rating)
            .await
            .unwrap()
            .iter()
            .map(|m| m.id.to_string())
            .collect();
        assert_eq!(ids, vec!["m3", "m2", "m1"]);
    }

    #[tokio::test]
    async fn upcoming_shows_filter_past_and_sort_by_date_then_time() {
        let store = InMemoryCatalogStore::new()
            .with_show(show("late", "m1", "2024-05-02", "21:00"))
            .with_show(show("early", "m1", "2024-05-02", "10:00"))
            .with_show(show("past", "m1", "2024-04-30", "10:00"))
            .with_show(show("other", "m2", "2024-05-02", "10:00"))
            .with_cancelled_show(show("cancelled", "m1", "2024-05-03", "10:00"));

        let from = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let ids: Vec<String> = store
            .list_upcoming_shows(&MovieId::new("m1").unwrap(), from)
            .await
            .unwrap()
            .iter()
            .map(|s| s.id.to_string())
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn get_movie_finds_by_id() {
        let store = InMemoryCatalogStore::new().with_movie(movie("m1", "Dune", None));
        let found = store.get_movie(&MovieId::new("m1").unwrap()).await.unwrap();
        assert_eq!(found.map(|m| m.title), Some("Dune".to_string()));
        assert!(store
            .get_movie(&MovieId::new("nope").unwrap())
            .await
            .unwrap()
            .is_none());
    }
}
