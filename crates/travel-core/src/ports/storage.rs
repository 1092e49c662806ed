//! Storage traits for persistence

use crate::Result;
use async_trait::async_trait;
use travel_types::{
    NewTravelPlan, PlanFilter, TravelPlan, TravelPlanPatch, UpdateOutcome, UserAccount,
};

/// Travel plan collection
///
/// Identifiers are assigned by the store. Lookups with an identifier the
/// store never issued behave like lookups of a deleted plan.
#[async_trait]
pub trait TravelPlanStore: Send + Sync {
    async fn insert_plan(&self, plan: NewTravelPlan) -> Result<TravelPlan>;
    async fn get_plan(&self, id: &str) -> Result<Option<TravelPlan>>;
    /// Plans matching every set filter field, in insertion order.
    async fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<TravelPlan>>;
    /// Merge `patch` into the plan atomically.
    async fn update_plan(&self, id: &str, patch: &TravelPlanPatch) -> Result<UpdateOutcome>;
    /// Returns the number of plans removed (0 or 1).
    async fn delete_plan(&self, id: &str) -> Result<u64>;
    async fn clear_plans(&self) -> Result<u64>;
}

/// User account collection
///
/// `create_account` must fail with [`TravelError::EmailTaken`](crate::TravelError::EmailTaken)
/// when the email is already registered, even under concurrent registrations.
#[async_trait]
pub trait UserAccountStore: Send + Sync {
    async fn email_exists(&self, email_id: &str) -> Result<bool>;
    async fn create_account(
        &self,
        email_id: &str,
        password_hash: &str,
        account_name: Option<&str>,
    ) -> Result<String>;
    async fn get_account_by_email(&self, email_id: &str) -> Result<Option<UserAccount>>;
}
