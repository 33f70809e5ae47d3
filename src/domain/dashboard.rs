// Dashboard domain model
use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer classification assigned by the analysis model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Premium,
    Regular,
    Normal,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Premium, Segment::Regular, Segment::Normal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Premium => "premium",
            Segment::Regular => "regular",
            Segment::Normal => "normal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// View projection over the customer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentFilter {
    #[default]
    All,
    Premium,
    Regular,
    Normal,
}

impl SegmentFilter {
    pub fn matches(&self, segment: Segment) -> bool {
        match self {
            SegmentFilter::All => true,
            SegmentFilter::Premium => segment == Segment::Premium,
            SegmentFilter::Regular => segment == Segment::Regular,
            SegmentFilter::Normal => segment == Segment::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerSegmentation {
    pub premium: u64,
    pub regular: u64,
    pub normal: u64,
}

impl CustomerSegmentation {
    /// Sum of the three counts, clamped at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.premium
            .saturating_add(self.regular)
            .saturating_add(self.normal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySale {
    pub day: String,
    pub sales: f64,
    pub purchases: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub id: String,
    pub name: String,
    pub total_spending: f64,
    pub frequency: u64,
    pub segment: Segment,
}

/// Aggregate produced by one analysis call. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub customer_segmentation: CustomerSegmentation,
    pub daily_sales: Vec<DailySale>,
    pub top_categories: Vec<TopCategory>,
    pub top_customers: Vec<TopCustomer>,
}

impl DashboardData {
    /// Customers visible under `filter`, in reply order.
    pub fn customers_matching(&self, filter: SegmentFilter) -> Vec<&TopCustomer> {
        self.top_customers
            .iter()
            .filter(|c| filter.matches(c.segment))
            .collect()
    }

    pub fn customer(&self, id: &str) -> Option<&TopCustomer> {
        self.top_customers.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn customer(id: &str, segment: Segment) -> TopCustomer {
        TopCustomer {
            id: id.to_string(),
            name: format!("Customer {}", id),
            total_spending: 100.0,
            frequency: 3,
            segment,
        }
    }

    pub(crate) fn sample_data() -> DashboardData {
        DashboardData {
            customer_segmentation: CustomerSegmentation {
                premium: 1,
                regular: 2,
                normal: 3,
            },
            daily_sales: vec![DailySale {
                day: "Mon".to_string(),
                sales: 1200.5,
                purchases: 800.0,
            }],
            top_categories: vec![TopCategory {
                name: "Dairy".to_string(),
                value: 540.0,
            }],
            top_customers: vec![
                customer("C1", Segment::Premium),
                customer("C2", Segment::Regular),
                customer("C3", Segment::Regular),
                customer("C4", Segment::Normal),
            ],
        }
    }

    #[test]
    fn test_filter_projection() {
        let data = sample_data();

        let ids = |f| {
            data.customers_matching(f)
                .into_iter()
                .map(|c| c.id.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(SegmentFilter::All), vec!["C1", "C2", "C3", "C4"]);
        assert_eq!(ids(SegmentFilter::Regular), vec!["C2", "C3"]);
        assert_eq!(ids(SegmentFilter::Premium), vec!["C1"]);
        assert_eq!(ids(SegmentFilter::Normal), vec!["C4"]);
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(sample_data()).unwrap();
        assert!(json.get("customerSegmentation").is_some());
        assert!(json.get("dailySales").is_some());
        assert_eq!(json["topCustomers"][0]["totalSpending"], 100.0);
        assert_eq!(json["topCustomers"][0]["segment"], "premium");
    }

    #[test]
    fn test_segment_parse() {
        assert_eq!(Segment::parse("regular"), Some(Segment::Regular));
        assert_eq!(Segment::parse("gold"), None);
        assert_eq!(CustomerSegmentation { premium: 1, regular: 2, normal: 3 }.total(), 6);
    }

    #[test]
    fn test_total_saturates_on_huge_counts() {
        let counts = CustomerSegmentation {
            premium: u64::MAX,
            regular: 1,
            normal: 1,
        };
        assert_eq!(counts.total(), u64::MAX);
    }
}
