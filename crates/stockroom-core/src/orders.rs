//! # Recent Orders
//!
//! The backend records one order per committed bill line. The recent
//! orders view shows them bucketed by the minute they were written, so the
//! lines of one bill usually land in the same group.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::money::Money;
use crate::types::Order;

/// Orders created within the same wall-clock minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderGroup {
    /// Start of the minute (seconds truncated).
    pub minute: DateTime<Utc>,

    /// Orders of this minute, newest first.
    pub orders: Vec<Order>,
}

impl OrderGroup {
    /// Sum of the line totals in this group.
    pub fn total(&self) -> Money {
        self.orders.iter().map(Order::line_total).sum()
    }

    /// Heading shown above the group.
    pub fn label(&self) -> String {
        self.minute.format("%Y-%m-%d %H:%M").to_string()
    }
}

fn truncate_to_minute(ts: DateTime<Utc>) -> DateTime<Utc> {
    // duration_trunc only fails for out-of-range timestamps
    ts.duration_trunc(TimeDelta::minutes(1)).unwrap_or(ts)
}

/// Groups orders by minute of `created_at`, newest group first.
pub fn group_orders_by_minute(orders: &[Order]) -> Vec<OrderGroup> {
    let mut buckets: BTreeMap<DateTime<Utc>, Vec<Order>> = BTreeMap::new();

    for order in orders {
        buckets
            .entry(truncate_to_minute(order.created_at))
            .or_default()
            .push(order.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|(minute, mut orders)| {
            orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            OrderGroup { minute, orders }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(id: &str, h: u32, m: u32, s: u32) -> Order {
        Order {
            id: id.to_string(),
            name: format!("Item {id}"),
            category: "General".to_string(),
            bill_quantity: 2,
            price: Money::from_cents(150),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, h, m, s).unwrap(),
        }
    }

    #[test]
    fn test_groups_by_minute_newest_first() {
        let orders = vec![
            order("1", 10, 0, 5),
            order("2", 10, 0, 40),
            order("3", 11, 15, 0),
            order("4", 9, 59, 59),
        ];

        let groups = group_orders_by_minute(&orders);
        let shape: Vec<(String, Vec<&str>)> = groups
            .iter()
            .map(|g| (g.label(), g.orders.iter().map(|o| o.id.as_str()).collect()))
            .collect();

        assert_eq!(
            shape,
            vec![
                ("2026-03-01 11:15".to_string(), vec!["3"]),
                ("2026-03-01 10:00".to_string(), vec!["2", "1"]),
                ("2026-03-01 09:59".to_string(), vec!["4"]),
            ]
        );
    }

    #[test]
    fn test_group_total() {
        let groups = group_orders_by_minute(&[order("1", 8, 30, 0), order("2", 8, 30, 9)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total(), Money::from_cents(600));
    }

    #[test]
    fn test_empty_input() {
        assert!(group_orders_by_minute(&[]).is_empty());
    }
}
