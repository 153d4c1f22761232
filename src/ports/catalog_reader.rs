//! Catalog reader port (read-only queries for movies and shows).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::catalog::{Movie, MovieSort, Show};
use crate::domain::foundation::{MovieId, StoreError};

/// Reader port for the movie catalog and show listings.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Movies with status `active`, in the requested order.
    async fn list_active_movies(&self, sort: MovieSort) -> Result<Vec<Movie>, StoreError>;

    /// A single movie by id. Returns `None` if it does not exist.
    async fn get_movie(&self, movie_id: &MovieId) -> Result<Option<Movie>, StoreError>;

    /// Active shows for a movie on or after `from`, joined to their theater
    /// and screen, ordered by date then time.
    async fn list_upcoming_shows(
        &self,
        movie_id: &MovieId,
        from: NaiveDate,
    ) -> Result<Vec<Show>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn CatalogReader) {}
    }
}
