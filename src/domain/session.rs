// Dashboard session - Command/effect state machine, no IO
use super::dashboard::{DashboardData, SegmentFilter, TopCustomer};
use super::error::{CommandError, TransitionError, ValidationError};
use super::offer::{Notice, OfferDialog, OfferRequest};
use super::upload::UploadedFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// Prompt-level hints the model is asked to respect. Not enforced.
const EXPECTED_DAYS: usize = 7;
const EXPECTED_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase", tag = "name")]
pub enum Phase {
    #[default]
    Unauthenticated,
    AwaitingUpload,
    #[serde(rename_all = "camelCase")]
    Analyzing { request_id: u64 },
    Ready,
}

impl Phase {
    pub fn describe(&self) -> &'static str {
        match self {
            Phase::Unauthenticated => "unauthenticated",
            Phase::AwaitingUpload => "awaiting an upload",
            Phase::Analyzing { .. } => "an analysis is in flight",
            Phase::Ready => "the dashboard is ready",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Authenticate,
    SubmitUpload(UploadedFile),
    AnalysisSucceeded { request_id: u64, data: DashboardData },
    AnalysisFailed { request_id: u64, message: String },
    SetFilter(SegmentFilter),
    ToggleSelect(String),
    SelectAll,
    OpenBulkOffer,
    OpenSingleOffer(String),
    CloseOffer,
    SendOffer(OfferRequest),
    DismissNotice { id: u64 },
    Reset,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Authenticate => "authenticate",
            Command::SubmitUpload(_) => "submit upload",
            Command::AnalysisSucceeded { .. } => "analysis succeeded",
            Command::AnalysisFailed { .. } => "analysis failed",
            Command::SetFilter(_) => "set filter",
            Command::ToggleSelect(_) => "toggle select",
            Command::SelectAll => "select all",
            Command::OpenBulkOffer => "open bulk offer",
            Command::OpenSingleOffer(_) => "open single offer",
            Command::CloseOffer => "close offer",
            Command::SendOffer(_) => "send offer",
            Command::DismissNotice { .. } => "dismiss notice",
            Command::Reset => "reset",
        }
    }
}

/// Work the owner of the session must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Analyze { request_id: u64, content: String },
    ScheduleDismiss { notice_id: u64 },
    CancelDismiss,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    phase: Phase,
    data: Option<DashboardData>,
    analyzed_at: Option<DateTime<Utc>>,
    error: Option<String>,
    filter: SegmentFilter,
    selection: BTreeSet<String>,
    offer: Option<OfferDialog>,
    notice: Option<Notice>,
    last_request_id: u64,
    last_notice_id: u64,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn data(&self) -> Option<&DashboardData> {
        self.data.as_ref()
    }

    pub fn analyzed_at(&self) -> Option<DateTime<Utc>> {
        self.analyzed_at
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> SegmentFilter {
        self.filter
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn offer(&self) -> Option<&OfferDialog> {
        self.offer.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Customers shown in the table under the active filter.
    pub fn visible_customers(&self) -> Vec<&TopCustomer> {
        self.data
            .as_ref()
            .map(|d| d.customers_matching(self.filter))
            .unwrap_or_default()
    }

    fn visible_ids(&self) -> BTreeSet<String> {
        self.visible_customers()
            .into_iter()
            .map(|c| c.id.clone())
            .collect()
    }

    /// Phase check of `Authenticate` without applying it.
    pub fn check_authenticate(&self) -> Result<(), TransitionError> {
        self.require(Command::Authenticate.name(), |p| p == Phase::Unauthenticated)
    }

    pub fn all_selected(&self) -> bool {
        let visible = self.visible_ids().len();
        visible > 0 && self.selection.len() == visible
    }

    pub fn apply(&mut self, command: Command) -> Result<Vec<Effect>, CommandError> {
        let name = command.name();
        match command {
            Command::Authenticate => {
                self.check_authenticate()?;
                self.phase = Phase::AwaitingUpload;
                Ok(Vec::new())
            }
            Command::SubmitUpload(file) => self.submit_upload(name, file),
            Command::AnalysisSucceeded { request_id, data } => {
                if !self.is_current_request(request_id) {
                    tracing::warn!(request_id, "discarding stale analysis result");
                    return Ok(Vec::new());
                }
                warn_on_unexpected_lengths(&data);
                self.data = Some(data);
                self.analyzed_at = Some(Utc::now());
                self.error = None;
                self.filter = SegmentFilter::All;
                self.selection.clear();
                self.phase = Phase::Ready;
                Ok(Vec::new())
            }
            Command::AnalysisFailed { request_id, message } => {
                if !self.is_current_request(request_id) {
                    tracing::warn!(request_id, "discarding stale analysis failure");
                    return Ok(Vec::new());
                }
                self.error = Some(message);
                self.phase = Phase::AwaitingUpload;
                Ok(Vec::new())
            }
            Command::SetFilter(filter) => {
                self.require(name, |p| p == Phase::Ready)?;
                self.filter = filter;
                self.selection.clear();
                Ok(Vec::new())
            }
            Command::ToggleSelect(id) => {
                self.require(name, |p| p == Phase::Ready)?;
                if !self.visible_customers().iter().any(|c| c.id == id) {
                    return Err(ValidationError::UnknownCustomer(id).into());
                }
                if !self.selection.remove(&id) {
                    self.selection.insert(id);
                }
                Ok(Vec::new())
            }
            Command::SelectAll => {
                self.require(name, |p| p == Phase::Ready)?;
                let visible = self.visible_ids();
                if self.selection.len() == visible.len() {
                    self.selection.clear();
                } else {
                    self.selection = visible;
                }
                Ok(Vec::new())
            }
            Command::OpenBulkOffer => {
                self.require(name, |p| p == Phase::Ready)?;
                let recipients: Vec<TopCustomer> = self
                    .data
                    .iter()
                    .flat_map(|d| d.top_customers.iter())
                    .filter(|c| self.selection.contains(&c.id))
                    .cloned()
                    .collect();
                if recipients.is_empty() {
                    return Err(ValidationError::NoRecipients.into());
                }
                self.offer = Some(OfferDialog::new(recipients));
                Ok(Vec::new())
            }
            Command::OpenSingleOffer(id) => {
                self.require(name, |p| p == Phase::Ready)?;
                let customer = self
                    .data
                    .as_ref()
                    .and_then(|d| d.customer(&id))
                    .cloned()
                    .ok_or(ValidationError::UnknownCustomer(id))?;
                self.offer = Some(OfferDialog::new(vec![customer]));
                Ok(Vec::new())
            }
            Command::CloseOffer => {
                self.require_offer(name)?;
                self.offer = None;
                Ok(Vec::new())
            }
            Command::SendOffer(request) => self.send_offer(name, request),
            Command::DismissNotice { id } => {
                if self.notice.as_ref().is_some_and(|n| n.id == id) {
                    self.notice = None;
                }
                Ok(Vec::new())
            }
            Command::Reset => {
                let had_notice = self.notice.is_some();
                self.phase = Phase::Unauthenticated;
                self.data = None;
                self.analyzed_at = None;
                self.error = None;
                self.filter = SegmentFilter::All;
                self.selection.clear();
                self.offer = None;
                self.notice = None;
                Ok(if had_notice {
                    vec![Effect::CancelDismiss]
                } else {
                    Vec::new()
                })
            }
        }
    }

    fn submit_upload(
        &mut self,
        name: &'static str,
        file: UploadedFile,
    ) -> Result<Vec<Effect>, CommandError> {
        self.require(name, |p| p == Phase::AwaitingUpload)?;
        file.validate()?;

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.error = None;
        self.phase = Phase::Analyzing { request_id };

        tracing::info!(
            request_id,
            file = %file.file_name,
            content_type = %file.content_type,
            bytes = file.content.len(),
            "upload accepted for analysis"
        );

        Ok(vec![Effect::Analyze {
            request_id,
            content: file.content,
        }])
    }

    fn send_offer(
        &mut self,
        name: &'static str,
        request: OfferRequest,
    ) -> Result<Vec<Effect>, CommandError> {
        let dialog = self.require_offer(name)?;
        if request.message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let mobile_number = if dialog.is_single() {
            request.mobile_number.as_deref()
        } else {
            None
        };
        let recipient = dialog.recipient_label(mobile_number);
        tracing::info!(
            channel = %request.channel,
            recipients = dialog.recipients.len(),
            "Sending offer to {}: {}",
            recipient,
            request.message
        );

        self.last_notice_id += 1;
        let notice = Notice {
            id: self.last_notice_id,
            message: format!("Offer sent to {} via {}!", recipient, request.channel),
        };
        let notice_id = notice.id;

        self.notice = Some(notice);
        self.offer = None;
        self.selection.clear();

        Ok(vec![Effect::ScheduleDismiss { notice_id }])
    }

    fn is_current_request(&self, request_id: u64) -> bool {
        self.phase == Phase::Analyzing { request_id }
    }

    fn require(
        &self,
        command: &'static str,
        allowed: impl Fn(Phase) -> bool,
    ) -> Result<(), TransitionError> {
        if allowed(self.phase) {
            Ok(())
        } else {
            Err(TransitionError {
                command,
                phase: self.phase.describe(),
            })
        }
    }

    fn require_offer(&self, command: &'static str) -> Result<&OfferDialog, TransitionError> {
        self.offer.as_ref().ok_or(TransitionError {
            command,
            phase: "no offer dialog is open",
        })
    }
}

/// The reply is trusted verbatim; oversized arrays are only logged.
fn warn_on_unexpected_lengths(data: &DashboardData) {
    if data.daily_sales.len() > EXPECTED_DAYS {
        tracing::warn!(days = data.daily_sales.len(), "analysis returned more than 7 days of sales");
    }
    if data.top_categories.len() > EXPECTED_TOP_N {
        tracing::warn!(categories = data.top_categories.len(), "analysis returned more than 5 categories");
    }
    if data.top_customers.len() > EXPECTED_TOP_N {
        tracing::warn!(customers = data.top_customers.len(), "analysis returned more than 5 customers");
    }
}
