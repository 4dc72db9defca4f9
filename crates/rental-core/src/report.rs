//! # Dashboard Indicators
//!
//! Aggregates the reservation table into the figures shown on the back-office
//! dashboard.
//!
//! ```text
//! ┌──────────────┬──────────────┬──────────────────────┬────────────────────┐
//! │ customers: 3 │ vehicles: 7  │ active reservations  │ revenue this month │
//! └──────────────┴──────────────┴──────────────────────┴────────────────────┘
//!  2024-06 ▏          count / revenue per month, 12 months, zero-filled
//!  ...
//!  2025-05 ▇▇▇▇
//!  top 5 customers by summed reservation totals
//! ```
//!
//! Revenue sums reservation totals regardless of status, keyed by start date.
//! Chart rendering and spreadsheet export belong to external collaborators.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customer, Reservation};
use crate::{REPORT_HISTORY_MONTHS, REPORT_TOP_CUSTOMERS};

// =============================================================================
// Report Types
// =============================================================================

/// One month of the history series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyBucket {
    /// `YYYY-MM`.
    pub month: String,
    pub reservations: u64,
    pub revenue: Money,
}

/// A row of the top-customers ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopCustomer {
    /// 1-based.
    pub rank: usize,
    pub customer_id: String,
    pub name: String,
    pub revenue: Money,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    #[ts(as = "String")]
    pub generated_on: NaiveDate,
    pub total_customers: u64,
    pub total_vehicles: u64,
    pub active_reservations: u64,
    /// Reservations starting on or after the first of the current month.
    pub current_month_revenue: Money,
    /// Oldest month first, current month last.
    pub monthly: Vec<MonthlyBucket>,
    pub top_customers: Vec<TopCustomer>,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Months since year 0, so month windows are plain integer ranges.
fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn month_label(index: i64) -> String {
    format!("{:04}-{:02}", index.div_euclid(12), index.rem_euclid(12) + 1)
}

/// Builds the dashboard figures as of `today`.
pub fn summarize(
    today: NaiveDate,
    customers: &[Customer],
    total_vehicles: u64,
    reservations: &[Reservation],
) -> DashboardSummary {
    let current = month_index(today);
    let first_month = current - i64::from(REPORT_HISTORY_MONTHS) + 1;

    let mut monthly: Vec<MonthlyBucket> = (first_month..=current)
        .map(|index| MonthlyBucket {
            month: month_label(index),
            reservations: 0,
            revenue: Money::zero(),
        })
        .collect();

    let mut current_month_revenue = Money::zero();
    let mut active_reservations = 0u64;
    let mut per_customer: HashMap<&str, Money> = HashMap::new();

    for reservation in reservations {
        let total = reservation.total();
        let index = month_index(reservation.start_date);

        if reservation.is_active() {
            active_reservations += 1;
        }
        if index >= current {
            current_month_revenue += total;
        }
        if (first_month..=current).contains(&index) {
            // In range, so the offset fits the vector.
            let bucket = &mut monthly[(index - first_month) as usize];
            bucket.reservations += 1;
            bucket.revenue += total;
        }
        *per_customer
            .entry(reservation.customer_id.as_str())
            .or_default() += total;
    }

    let names: HashMap<&str, &str> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut ranking: Vec<(&str, Money)> = per_customer.into_iter().collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let top_customers = ranking
        .into_iter()
        .take(REPORT_TOP_CUSTOMERS)
        .enumerate()
        .map(|(i, (id, revenue))| TopCustomer {
            rank: i + 1,
            customer_id: id.to_string(),
            name: names
                .get(id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("Customer {id}")),
            revenue,
        })
        .collect();

    DashboardSummary {
        generated_on: today,
        total_customers: customers.len() as u64,
        total_vehicles,
        active_reservations,
        current_month_revenue,
        monthly,
        top_customers,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
