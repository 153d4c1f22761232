//! Movie records and the content items they gate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::MovieId;
use crate::domain::subscription::TierLevel;

/// A watchable item as seen by the entitlement resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: MovieId,

    pub title: String,

    /// Level needed to watch. Absent means freely watchable.
    #[serde(default)]
    pub required_level: TierLevel,
}

impl ContentItem {
    /// Creates a content item.
    pub fn new(id: MovieId, title: impl Into<String>, required_level: TierLevel) -> Self {
        Self {
            id,
            title: title.into(),
            required_level,
        }
    }
}

/// A row of the movie catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub genre: Vec<String>,

    #[serde(default)]
    pub rating: Option<f32>,

    #[serde(default)]
    pub release_date: Option<NaiveDate>,

    #[serde(default, alias = "duration")]
    pub duration_minutes: Option<u32>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub poster_url: Option<String>,

    #[serde(default)]
    pub video_url: Option<String>,

    #[serde(default, alias = "required_plan_level")]
    pub required_level: TierLevel,
}

impl Movie {
    /// Projects the movie onto the fields the entitlement check needs.
    pub fn content_item(&self) -> ContentItem {
        ContentItem::new(self.id.clone(), self.title.clone(), self.required_level)
    }

    /// Returns true if the movie is tagged with exactly this genre.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre.iter().any(|g| g == genre)
    }
}

/// Ordering requested from the catalog store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieSort {
    #[default]
    Title,
    Rating,
    ReleaseDate,
}

impl MovieSort {
    /// Column name used by the store.
    pub fn column(&self) -> &'static str {
        match self {
            MovieSort::Title => "title",
            MovieSort::Rating => "rating",
            MovieSort::ReleaseDate => "release_date",
        }
    }
}
