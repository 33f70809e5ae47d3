// JSON view models rendered from a session snapshot
use crate::domain::dashboard::{DailySale, Segment, SegmentFilter, TopCategory, TopCustomer};
use crate::domain::offer::{Notice, OfferDialog};
use crate::domain::session::{DashboardSession, Phase};
use crate::domain::user::StoredUser;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub phase: Phase,
    pub error: Option<String>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub cards: Vec<SegmentCard>,
    pub daily_sales: Vec<DailySale>,
    pub top_categories: Vec<TopCategory>,
    pub customers: Vec<CustomerRow>,
    pub filter: SegmentFilter,
    pub selected_count: usize,
    pub all_selected: bool,
    pub offer: Option<OfferDialog>,
    pub notice: Option<Notice>,
}

/// One of the three segment total cards.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentCard {
    pub title: &'static str,
    pub segment: Segment,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerRow {
    #[serde(flatten)]
    pub customer: TopCustomer,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub name: String,
    pub email: String,
}

impl From<StoredUser> for UserSummary {
    fn from(user: StoredUser) -> Self {
        Self {
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthView {
    pub user: UserSummary,
    pub dashboard: DashboardView,
}

impl From<&DashboardSession> for DashboardView {
    fn from(session: &DashboardSession) -> Self {
        let data = session.data();

        let cards = data
            .map(|d| {
                let counts = d.customer_segmentation;
                vec![
                    SegmentCard {
                        title: "Premium Customers",
                        segment: Segment::Premium,
                        value: counts.premium,
                    },
                    SegmentCard {
                        title: "Regular Customers",
                        segment: Segment::Regular,
                        value: counts.regular,
                    },
                    SegmentCard {
                        title: "Normal Customers",
                        segment: Segment::Normal,
                        value: counts.normal,
                    },
                ]
            })
            .unwrap_or_default();

        let customers = session
            .visible_customers()
            .into_iter()
            .map(|c| CustomerRow {
                selected: session.selection().contains(&c.id),
                customer: c.clone(),
            })
            .collect();

        Self {
            phase: session.phase(),
            error: session.error().map(str::to_string),
            analyzed_at: session.analyzed_at(),
            cards,
            daily_sales: data.map(|d| d.daily_sales.clone()).unwrap_or_default(),
            top_categories: data.map(|d| d.top_categories.clone()).unwrap_or_default(),
            customers,
            filter: session.filter(),
            selected_count: session.selection().len(),
            all_selected: session.all_selected(),
            offer: session.offer().cloned(),
            notice: session.notice().cloned(),
        }
    }
}
