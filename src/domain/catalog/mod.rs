//! Catalog module - movies, shows and their display transforms.
//!
//! Everything here is pure data reshaping over records fetched elsewhere.

mod filter;
mod grouping;
mod movie;
mod show;

pub use filter::{distinct_genres, filter_movies};
pub use grouping::{
    group_by_theater_then_date, DateGroup, ExcludedShow, ExclusionReason, ShowGrouping,
    TheaterGroup,
};
pub use movie::{ContentItem, Movie, MovieSort};
pub use show::{Screen, Show, Theater};
