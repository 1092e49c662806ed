//! In-memory store using DashMap (for local runs and tests)

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use travel_core::ports::{TravelPlanStore, UserAccountStore};
use travel_core::{
    NewTravelPlan, PlanFilter, Result, TravelError, TravelPlan, TravelPlanPatch, UpdateOutcome,
    UserAccount,
};

/// Both collections held in process memory
///
/// Plans carry an insertion sequence number so listings come back in
/// insertion order. Accounts are keyed by email, which makes the
/// uniqueness check and the insert a single atomic entry operation.
pub struct MemoryStore {
    plans: DashMap<String, StoredPlan>,
    accounts: DashMap<String, UserAccount>,
    next_seq: AtomicU64,
}

struct StoredPlan {
    seq: u64,
    plan: TravelPlan,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            plans: DashMap::new(),
            accounts: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TravelPlanStore for MemoryStore {
    async fn insert_plan(&self, plan: NewTravelPlan) -> Result<TravelPlan> {
        let plan = TravelPlan::new(uuid::Uuid::new_v4().to_string(), plan);
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.plans.insert(
            plan.id.clone(),
            StoredPlan {
                seq,
                plan: plan.clone(),
            },
        );
        Ok(plan)
    }

    async fn get_plan(&self, id: &str) -> Result<Option<TravelPlan>> {
        Ok(self.plans.get(id).map(|entry| entry.plan.clone()))
    }

    async fn list_plans(&self, filter: &PlanFilter) -> Result<Vec<TravelPlan>> {
        let mut matched: Vec<(u64, TravelPlan)> = self
            .plans
            .iter()
            .filter(|entry| filter.matches(&entry.plan))
            .map(|entry| (entry.seq, entry.plan.clone()))
            .collect();
        matched.sort_by_key(|(seq, _)| *seq);

        Ok(matched.into_iter().map(|(_, plan)| plan).collect())
    }

    async fn update_plan(&self, id: &str, patch: &TravelPlanPatch) -> Result<UpdateOutcome> {
        // get_mut holds the shard lock for the whole read-compare-write
        let Some(mut entry) = self.plans.get_mut(id) else {
            return Ok(UpdateOutcome::NotFound);
        };

        if patch.apply(&mut entry.plan) {
            Ok(UpdateOutcome::Modified)
        } else {
            Ok(UpdateOutcome::Unchanged)
        }
    }

    async fn delete_plan(&self, id: &str) -> Result<u64> {
        Ok(self.plans.remove(id).map_or(0, |_| 1))
    }

    async fn clear_plans(&self) -> Result<u64> {
        let keys: Vec<String> = self.plans.iter().map(|entry| entry.key().clone()).collect();
        let removed = keys
            .iter()
            .filter(|key| self.plans.remove(*key).is_some())
            .count();

        Ok(removed as u64)
    }
}

#[async_trait]
impl UserAccountStore for MemoryStore {
    async fn email_exists(&self, email_id: &str) -> Result<bool> {
        Ok(self.accounts.contains_key(email_id))
    }

    async fn create_account(
        &self,
        email_id: &str,
        password_hash: &str,
        account_name: Option<&str>,
    ) -> Result<String> {
        match self.accounts.entry(email_id.to_string()) {
            Entry::Occupied(_) => Err(TravelError::EmailTaken(email_id.to_string())),
            Entry::Vacant(slot) => {
                let id = uuid::Uuid::new_v4().to_string();
                slot.insert(UserAccount {
                    id: id.clone(),
                    account_name: account_name.map(str::to_string),
                    email_id: email_id.to_string(),
                    password_hash: password_hash.to_string(),
                });
                Ok(id)
            }
        }
    }

    async fn get_account_by_email(&self, email_id: &str) -> Result<Option<UserAccount>> {
        Ok(self.accounts.get(email_id).map(|entry| entry.clone()))
    }
}
