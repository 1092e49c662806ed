//! Travel plan types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored travel plan document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    /// Store-assigned identifier, rendered as a display string
    #[serde(rename = "_id")]
    pub id: String,
    pub travel_date: String,
    pub leaving_time: String,
    pub arriving_time: String,
    pub departure_location: String,
    pub destination_location: String,
    pub travel_reason: String,
    pub description: Option<String>,
}

impl TravelPlan {
    pub fn new(id: String, plan: NewTravelPlan) -> Self {
        Self {
            id,
            travel_date: plan.travel_date,
            leaving_time: plan.leaving_time,
            arriving_time: plan.arriving_time,
            departure_location: plan.departure_location,
            destination_location: plan.destination_location,
            travel_reason: plan.travel_reason,
            description: plan.description,
        }
    }
}

/// A validated plan submission, not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTravelPlan {
    pub travel_date: String,
    pub leaving_time: String,
    pub arriving_time: String,
    pub departure_location: String,
    pub destination_location: String,
    pub travel_reason: String,
    pub description: Option<String>,
}

/// Raw plan submission as posted by the client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlanDraft {
    pub travel_date: Option<String>,
    pub leaving_time: Option<String>,
    pub arriving_time: Option<String>,
    pub departure_location: Option<String>,
    pub destination_location: Option<String>,
    pub travel_reason: Option<String>,
    pub description: Option<String>,
}

/// Required plan fields absent from a submission, by wire name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required fields: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<&'static str>);

impl TravelPlanDraft {
    /// Check that every required field is a non-empty string.
    pub fn validate(self) -> Result<NewTravelPlan, MissingFields> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str, value: Option<String>| match present(value) {
            Some(v) => v,
            None => {
                missing.push(name);
                String::new()
            }
        };

        let travel_date = require("travelDate", self.travel_date);
        let leaving_time = require("leavingTime", self.leaving_time);
        let arriving_time = require("arrivingTime", self.arriving_time);
        let departure_location = require("departureLocation", self.departure_location);
        let destination_location = require("destinationLocation", self.destination_location);
        let travel_reason = require("travelReason", self.travel_reason);

        if !missing.is_empty() {
            return Err(MissingFields(missing));
        }

        Ok(NewTravelPlan {
            travel_date,
            leaving_time,
            arriving_time,
            departure_location,
            destination_location,
            travel_reason,
            description: self.description,
        })
    }
}

/// Partial field replacement for an existing plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlanPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaving_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arriving_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TravelPlanPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the patch into `plan`, returning whether any field changed value.
    pub fn apply(&self, plan: &mut TravelPlan) -> bool {
        let mut changed = false;
        changed |= assign(&mut plan.travel_date, &self.travel_date);
        changed |= assign(&mut plan.leaving_time, &self.leaving_time);
        changed |= assign(&mut plan.arriving_time, &self.arriving_time);
        changed |= assign(&mut plan.departure_location, &self.departure_location);
        changed |= assign(&mut plan.destination_location, &self.destination_location);
        changed |= assign(&mut plan.travel_reason, &self.travel_reason);

        if let Some(description) = &self.description {
            if plan.description.as_ref() != Some(description) {
                plan.description = Some(description.clone());
                changed = true;
            }
        }

        changed
    }
}

fn assign(slot: &mut String, value: &Option<String>) -> bool {
    match value {
        Some(v) if slot != v => {
            slot.clone_from(v);
            true
        }
        _ => false,
    }
}

/// Result of applying a patch to a stored plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one field changed value
    Modified,
    /// The plan exists but the patch changed nothing
    Unchanged,
    NotFound,
}

/// Equality filters for listing plans
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlanFilter {
    pub departure_location: Option<String>,
    pub destination_location: Option<String>,
    pub travel_date: Option<String>,
}

impl PlanFilter {
    /// Drop empty query values so `?travel_date=` behaves like no filter.
    pub fn normalized(self) -> Self {
        Self {
            departure_location: present(self.departure_location),
            destination_location: present(self.destination_location),
            travel_date: present(self.travel_date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.departure_location.is_none()
            && self.destination_location.is_none()
            && self.travel_date.is_none()
    }

    pub fn matches(&self, plan: &TravelPlan) -> bool {
        fn eq(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().map_or(true, |f| f == value)
        }

        eq(&self.departure_location, &plan.departure_location)
            && eq(&self.destination_location, &plan.destination_location)
            && eq(&self.travel_date, &plan.travel_date)
    }
}

pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TravelPlanDraft {
        serde_json::from_value(serde_json::json!({
            "travelDate": "2024-03-01",
            "leavingTime": "08:00",
            "arrivingTime": "11:30",
            "departureLocation": "Belfast",
            "destinationLocation": "Dublin",
            "travelReason": "Conference",
        }))
        .unwrap()
    }

    #[test]
    fn test_validate_complete_draft() {
        let plan = draft().validate().unwrap();
        assert_eq!(plan.departure_location, "Belfast");
        assert_eq!(plan.description, None);
    }

    #[test]
    fn test_validate_reports_missing_and_empty_fields() {
        let mut d = draft();
        d.leaving_time = None;
        d.travel_reason = Some(String::new());

        let err = d.validate().unwrap_err();
        assert_eq!(err.0, vec!["leavingTime", "travelReason"]);
        assert_eq!(
            err.to_string(),
            "missing required fields: leavingTime, travelReason"
        );
    }

    #[test]
    fn test_plan_serializes_with_wire_names() {
        let plan = TravelPlan::new("abc".to_string(), draft().validate().unwrap());
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["_id"], "abc");
        assert_eq!(value["destinationLocation"], "Dublin");
        assert!(value["description"].is_null());
    }

    #[test]
    fn test_patch_reports_changes() {
        let mut plan = TravelPlan::new("abc".to_string(), draft().validate().unwrap());

        let same = TravelPlanPatch {
            departure_location: Some("Belfast".to_string()),
            ..Default::default()
        };
        assert!(!same.apply(&mut plan));

        let moved = TravelPlanPatch {
            departure_location: Some("Derry".to_string()),
            description: Some("Early train".to_string()),
            ..Default::default()
        };
        assert!(moved.apply(&mut plan));
        assert_eq!(plan.departure_location, "Derry");
        assert_eq!(plan.description.as_deref(), Some("Early train"));
        assert!(!moved.apply(&mut plan));
    }

    #[test]
    fn test_empty_patch() {
        let patch: TravelPlanPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_filter_matches() {
        let plan = TravelPlan::new("abc".to_string(), draft().validate().unwrap());

        let filter = PlanFilter {
            departure_location: Some("Belfast".to_string()),
            travel_date: Some(String::new()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(filter.travel_date, None);
        assert!(filter.matches(&plan));

        let other = PlanFilter {
            destination_location: Some("Cork".to_string()),
            ..Default::default()
        };
        assert!(!other.matches(&plan));
        assert!(PlanFilter::default().is_empty());
    }
}
