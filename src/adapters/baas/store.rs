//! PostgREST-backed data store for plans, subscriptions and the catalog.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::client::{BaasClient, PostgrestQuery};
use crate::domain::catalog::{Movie, MovieSort, Show};
use crate::domain::foundation::{MovieId, PlanId, StoreError, UserId};
use crate::domain::subscription::{SubscriptionPlan, UserSubscription};
use crate::ports::{CatalogReader, SubscriptionReader};

const SUBSCRIPTIONS: &str = "user_subscriptions";
const PLANS: &str = "subscription_plans";
const MOVIES: &str = "movies";
const SHOWS: &str = "shows";

const SUBSCRIPTION_SELECT: &str =
    "*,subscription_plans(name,price,video_quality,device_limit,simultaneous_streams,features)";
const SHOW_SELECT: &str =
    "*,theaters(id,name,location,city,facilities),screens(id,screen_number,screen_type)";

/// Reads every table the application needs through one [`BaasClient`].
#[derive(Clone)]
pub struct BaasDataStore {
    client: Arc<BaasClient>,
}

impl BaasDataStore {
    pub fn new(client: Arc<BaasClient>) -> Self {
        Self { client }
    }

    fn active_subscriptions_query(user_id: &UserId) -> PostgrestQuery {
        PostgrestQuery::new()
            .select(SUBSCRIPTION_SELECT)
            .eq("user_id", user_id)
            .eq("status", "active")
            .order("created_at", false)
    }

    fn active_plans_query() -> PostgrestQuery {
        PostgrestQuery::new()
            .select("*")
            .eq("is_active", true)
            .order("price", true)
    }

    fn active_movies_query(sort: MovieSort) -> PostgrestQuery {
        PostgrestQuery::new()
            .select("*")
            .eq("status", "active")
            .order(sort.column(), true)
    }

    fn upcoming_shows_query(movie_id: &MovieId, from: NaiveDate) -> PostgrestQuery {
        PostgrestQuery::new()
            .select(SHOW_SELECT)
            .eq("movie_id", movie_id)
            .eq("status", "active")
            .gte("show_date", from.format("%Y-%m-%d"))
            .order("show_date", true)
            .order("show_time", true)
    }
}

#[async_trait]
impl SubscriptionReader for BaasDataStore {
    async fn active_subscriptions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserSubscription>, StoreError> {
        self.client
            .select(SUBSCRIPTIONS, &Self::active_subscriptions_query(user_id))
            .await
    }

    async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>, StoreError> {
        self.client.select(PLANS, &Self::active_plans_query()).await
    }

    async fn get_plan(&self, plan_id: &PlanId) -> Result<Option<SubscriptionPlan>, StoreError> {
        let query = PostgrestQuery::new().select("*").eq("id", plan_id).limit(1);
        let rows: Vec<SubscriptionPlan> = self.client.select(PLANS, &query).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl CatalogReader for BaasDataStore {
    async fn list_active_movies(&self, sort: MovieSort) -> Result<Vec<Movie>, StoreError> {
        self.client.select(MOVIES, &Self::active_movies_query(sort)).await
    }

    async fn get_movie(&self, movie_id: &MovieId) -> Result<Option<Movie>, StoreError> {
        let query = PostgrestQuery::new().select("*").eq("id", movie_id).limit(1);
        let rows: Vec<Movie> = self.client.select(MOVIES, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_upcoming_shows(
        &self,
        movie_id: &MovieId,
        from: NaiveDate,
    ) -> Result<Vec<Show>, StoreError> {
        self.client
            .select(SHOWS, &Self::upcoming_shows_query(movie_id, from))
            .await
    }
}
