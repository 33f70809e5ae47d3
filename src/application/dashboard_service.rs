// Dashboard service - Single owner of the session state machine
use crate::application::sales_analyzer::SalesAnalyzer;
use crate::domain::error::{AnalysisError, CommandError};
use crate::domain::session::{Command, DashboardSession, Effect};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("{0}")]
    TaskFailed(String),
}

/// Owns the one in-memory session. The session lock is only held while a
/// command is applied, never across an await.
#[derive(Clone)]
pub struct DashboardService {
    inner: Arc<Inner>,
}

struct Inner {
    analyzer: Arc<dyn SalesAnalyzer>,
    session: Mutex<DashboardSession>,
    snapshots: watch::Sender<DashboardSession>,
    notice_timer: Mutex<Option<JoinHandle<()>>>,
    notice_ttl: Duration,
}

impl DashboardService {
    pub fn new(analyzer: Arc<dyn SalesAnalyzer>, notice_ttl: Duration) -> Self {
        let (snapshots, _) = watch::channel(DashboardSession::new());
        Self {
            inner: Arc::new(Inner {
                analyzer,
                session: Mutex::new(DashboardSession::new()),
                snapshots,
                notice_timer: Mutex::new(None),
                notice_ttl,
            }),
        }
    }

    pub fn snapshot(&self) -> DashboardSession {
        self.session().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSession> {
        self.inner.snapshots.subscribe()
    }

    /// Apply a command, run its effects, and return the resulting state.
    ///
    /// For uploads this waits for the analysis to finish. The analysis runs in
    /// its own task, so dropping this future does not cancel it.
    pub async fn dispatch(&self, command: Command) -> Result<DashboardSession, DashboardError> {
        for (request_id, content) in self.apply(command)? {
            self.run_analysis(request_id, content).await?;
        }
        Ok(self.snapshot())
    }

    /// Fail fast when the session would reject `Authenticate`.
    pub fn check_authenticate(&self) -> Result<(), DashboardError> {
        self.session()
            .check_authenticate()
            .map_err(|e| DashboardError::Command(e.into()))
    }

    /// Apply a command and return the analyses it requested.
    ///
    /// Timer effects are run before the session lock is released, so timers
    /// are swapped in the same order notices are issued.
    fn apply(&self, command: Command) -> Result<Vec<(u64, String)>, CommandError> {
        let mut session = self.session();
        let effects = session.apply(command)?;
        self.inner.snapshots.send_replace(session.clone());

        let mut analyses = Vec::new();
        for effect in effects {
            match effect {
                Effect::Analyze {
                    request_id,
                    content,
                } => analyses.push((request_id, content)),
                Effect::ScheduleDismiss { notice_id } => self.schedule_dismiss(notice_id),
                Effect::CancelDismiss => {
                    if let Some(timer) = self.notice_timer().take() {
                        timer.abort();
                    }
                }
            }
        }
        Ok(analyses)
    }

    async fn run_analysis(&self, request_id: u64, content: String) -> Result<(), DashboardError> {
        let service = self.clone();
        let task = tokio::spawn(async move { service.analyze(request_id, content).await });
        match task.await {
            Ok(result) => result.map_err(DashboardError::from),
            Err(e) => {
                tracing::error!(request_id, "analysis task failed: {}", e);
                let message = "Analysis could not be completed. Please try again.".to_string();
                if let Err(e) = self.apply(Command::AnalysisFailed {
                    request_id,
                    message: message.clone(),
                }) {
                    tracing::warn!(request_id, "analysis failure rejected: {}", e);
                }
                Err(DashboardError::TaskFailed(message))
            }
        }
    }

    async fn analyze(&self, request_id: u64, content: String) -> Result<(), AnalysisError> {
        let outcome = self.inner.analyzer.analyze(&content).await;
        let command = match &outcome {
            Ok(data) => {
                tracing::info!(
                    request_id,
                    segmented = data.customer_segmentation.total(),
                    customers = data.top_customers.len(),
                    days = data.daily_sales.len(),
                    "analysis completed"
                );
                Command::AnalysisSucceeded {
                    request_id,
                    data: data.clone(),
                }
            }
            Err(e) => {
                tracing::error!(request_id, "Error analyzing sales data: {}", e);
                Command::AnalysisFailed {
                    request_id,
                    message: e.to_string(),
                }
            }
        };

        // Result commands never fail; stale ones are dropped by the session.
        if let Err(e) = self.apply(command) {
            tracing::warn!(request_id, "analysis result rejected: {}", e);
        }
        outcome.map(|_| ())
    }

    fn schedule_dismiss(&self, notice_id: u64) {
        let service = self.clone();
        let ttl = self.inner.notice_ttl;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = service.apply(Command::DismissNotice { id: notice_id }) {
                tracing::warn!(notice_id, "failed to dismiss notice: {}", e);
            }
        });

        // Called under the session lock; a newer notice supersedes the previous timer.
        if let Some(previous) = self.notice_timer().replace(timer) {
            previous.abort();
        }
    }

    fn session(&self) -> MutexGuard<'_, DashboardSession> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notice_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .notice_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
