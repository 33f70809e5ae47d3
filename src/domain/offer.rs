// Promotional offer dispatch (mocked, no transport)
use super::dashboard::TopCustomer;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_OFFER_MESSAGE: &str =
    "Hello valued customer, here's a special 20% discount on your next purchase!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Sms,
    Whatsapp,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Sms => f.write_str("SMS"),
            Channel::Whatsapp => f.write_str("WHATSAPP"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    pub message: String,
    pub channel: Channel,
    #[serde(default)]
    pub mobile_number: Option<String>,
}

/// Customers an offer is being composed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDialog {
    pub recipients: Vec<TopCustomer>,
    pub default_message: &'static str,
}

impl OfferDialog {
    pub fn new(recipients: Vec<TopCustomer>) -> Self {
        Self {
            recipients,
            default_message: DEFAULT_OFFER_MESSAGE,
        }
    }

    pub fn is_single(&self) -> bool {
        self.recipients.len() == 1
    }

    /// Human description of who the offer went to. Only single sends may
    /// name a phone number.
    pub fn recipient_label(&self, mobile_number: Option<&str>) -> String {
        match mobile_number.map(str::trim).filter(|n| !n.is_empty()) {
            Some(number) if self.is_single() => format!("customer at {}", number),
            _ => format!("{} customer(s)", self.recipients.len()),
        }
    }
}

/// Transient confirmation shown after a send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub message: String,
}
