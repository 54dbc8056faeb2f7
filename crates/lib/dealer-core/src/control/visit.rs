use std::collections::HashMap;

use chrono::{Local, NaiveDate, TimeDelta};
use dealer_store::Visit;
use serde::{Deserialize, Serialize};

use super::DealerControlPlane;

pub const DEFAULT_UPCOMING_DAYS: i64 = 30;
pub const UNKNOWN_CUSTOMER_NAME: &str = "unknown";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Visit row returned by the visit history query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitSummary {
    pub id: String,
    pub visit_date: String,
    #[serde(rename = "type")]
    pub visit_type: String,
    pub vehicle_id: String,
    pub notes: String,
}

impl From<Visit> for VisitSummary {
    fn from(visit: Visit) -> Self {
        Self {
            id: visit.id,
            visit_date: visit.visit_date,
            visit_type: visit.visit_type,
            vehicle_id: visit.vehicle_id,
            notes: visit.notes.unwrap_or_default(),
        }
    }
}

/// Service due inside the requested window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpcomingService {
    pub customer_id: String,
    pub customer_name: String,
    pub scheduled_date: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub vehicle_id: String,
}

impl DealerControlPlane {
    /// Lists visits for an exact customer id.
    #[must_use]
    pub fn get_visit_history(&self, customer_id: &str) -> Vec<VisitSummary> {
        self.store
            .visits()
            .into_iter()
            .filter(|visit| visit.customer_id == customer_id)
            .map(VisitSummary::from)
            .collect()
    }

    /// Lists services due between today and `days` days from now, inclusive.
    #[must_use]
    pub fn get_upcoming_services(&self, days: i64) -> Vec<UpcomingService> {
        self.upcoming_services_on(Local::now().date_naive(), days)
    }

    /// Lists services due between `today` and `today + days`, inclusive,
    /// sorted by scheduled date. Visits without a parseable date are skipped.
    #[must_use]
    pub fn upcoming_services_on(&self, today: NaiveDate, days: i64) -> Vec<UpcomingService> {
        if days < 0 {
            return Vec::new();
        }
        let end = TimeDelta::try_days(days)
            .and_then(|delta| today.checked_add_signed(delta))
            .unwrap_or(NaiveDate::MAX);

        let customer_names: HashMap<String, String> = self
            .store
            .customers()
            .into_iter()
            .map(|customer| (customer.id, customer.name))
            .collect();

        let mut services: Vec<UpcomingService> = self
            .store
            .visits()
            .into_iter()
            .filter_map(|visit| {
                let scheduled = visit.scheduled_date()?;
                let date = NaiveDate::parse_from_str(scheduled, DATE_FORMAT).ok()?;
                if date < today || date > end {
                    return None;
                }
                let scheduled_date = scheduled.to_string();
                let customer_name = customer_names
                    .get(&visit.customer_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_CUSTOMER_NAME.to_string());
                Some(UpcomingService {
                    customer_id: visit.customer_id,
                    customer_name,
                    scheduled_date,
                    service_type: visit.visit_type,
                    vehicle_id: visit.vehicle_id,
                })
            })
            .collect();

        services.sort_by(|left, right| left.scheduled_date.cmp(&right.scheduled_date));
        services
    }
}
