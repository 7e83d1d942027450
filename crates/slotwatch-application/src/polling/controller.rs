use super::events::ControllerEvent;
use super::snapshot::ControllerSnapshot;
use slotwatch_core::config::PollingConfig;
use slotwatch_core::{
    AppointmentQuery, AvailabilitySet, DEFAULT_HIGHLIGHT_TTL, DateKey, DateOracle,
    HighlightScheduler, OracleError, Phase, Result, ScanKind, ScanOutcome, SlotwatchError,
    StatusNarrator, TargetMonth,
};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Timing knobs for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Period of the alert timer.
    pub interval: Duration,
    /// How long newly found dates stay highlighted.
    pub highlight_ttl: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            interval: slotwatch_core::config::DEFAULT_POLL_INTERVAL,
            highlight_ttl: DEFAULT_HIGHLIGHT_TTL,
        }
    }
}

impl From<&PollingConfig> for ControllerSettings {
    fn from(config: &PollingConfig) -> Self {
        Self {
            interval: config.interval(),
            highlight_ttl: config.highlight_ttl(),
        }
    }
}

/// Drives availability scans for one query and month.
///
/// The controller is a state machine over [`Phase`]:
///
/// - `start_one_shot` rebuilds the availability set from a single oracle call.
/// - `enable_alerting` starts a periodic timer; every tick merges the oracle's
///   answer into the set and highlights what was not seen before.
/// - `disable_alerting`, `change_query` and `change_month` tear the session
///   down.
///
/// Every scan captures the epoch current when it started. Teardown bumps the
/// epoch, so a result arriving for an older epoch is dropped on the floor.
/// State sits behind a mutex that is never held across an oracle call.
///
/// The timer and the highlight expiry task hold weak references only;
/// dropping the controller stops them.
pub struct PollingController {
    inner: Arc<Inner>,
}

struct Inner {
    oracle: Arc<dyn DateOracle>,
    settings: ControllerSettings,
    events: Option<UnboundedSender<ControllerEvent>>,
    state: Mutex<ControllerState>,
}

struct ControllerState {
    query: AppointmentQuery,
    month: TargetMonth,
    availability: AvailabilitySet,
    highlights: HighlightScheduler,
    phase: Phase,
    outcome: ScanOutcome,
    epoch: u64,
    timer: Option<JoinHandle<()>>,
    expiry: Option<JoinHandle<()>>,
}

impl ControllerState {
    /// Cancels the alert timer and invalidates every outstanding scan.
    fn invalidate(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.epoch = self.epoch.wrapping_add(1);
        self.phase = Phase::Idle;
    }

    /// Invalidates and also drops all accumulated dates.
    fn reset(&mut self) {
        self.invalidate();
        if let Some(expiry) = self.expiry.take() {
            expiry.abort();
        }
        self.availability.reset();
        self.highlights.clear();
    }
}

impl PollingController {
    pub fn new(
        oracle: Arc<dyn DateOracle>,
        query: AppointmentQuery,
        month: TargetMonth,
        settings: ControllerSettings,
    ) -> Self {
        Self::build(oracle, query, month, settings, None)
    }

    /// Like [`PollingController::new`], publishing [`ControllerEvent`]s on `events`.
    pub fn with_events(
        oracle: Arc<dyn DateOracle>,
        query: AppointmentQuery,
        month: TargetMonth,
        settings: ControllerSettings,
        events: UnboundedSender<ControllerEvent>,
    ) -> Self {
        Self::build(oracle, query, month, settings, Some(events))
    }

    fn build(
        oracle: Arc<dyn DateOracle>,
        query: AppointmentQuery,
        month: TargetMonth,
        settings: ControllerSettings,
        events: Option<UnboundedSender<ControllerEvent>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                oracle,
                settings,
                events,
                state: Mutex::new(ControllerState {
                    query,
                    month,
                    availability: AvailabilitySet::new(),
                    highlights: HighlightScheduler::new(),
                    phase: Phase::Idle,
                    outcome: ScanOutcome::NotStarted,
                    epoch: 0,
                    timer: None,
                    expiry: None,
                }),
            }),
        }
    }

    pub fn settings(&self) -> ControllerSettings {
        self.inner.settings
    }

    /// Runs a single scan that replaces the availability set.
    ///
    /// An active alerting session is torn down first. Returns the outcome, or
    /// `None` when the scan was superseded (by another one-shot, a context
    /// change or shutdown) before its result arrived.
    pub async fn start_one_shot(&self) -> Option<ScanOutcome> {
        let (epoch, query, month) = {
            let mut state = self.inner.state.lock().await;
            if state.phase.is_alerting() {
                tracing::info!("Stopping alerts for a fresh search");
                self.inner.emit(ControllerEvent::AlertingDisabled);
            }
            state.reset();
            state.phase = Phase::ScanningInitial;
            (state.epoch, state.query.clone(), state.month)
        };

        tracing::info!(consulate = %query.consulate, month = %month, "Searching for appointments");
        self.inner.emit(ControllerEvent::ScanStarted {
            kind: ScanKind::Initial,
        });

        let result = self.inner.oracle.fetch(&query, month).await;

        let mut state = self.inner.state.lock().await;
        if state.epoch != epoch {
            tracing::debug!(epoch, current = state.epoch, "Discarding superseded search result");
            return None;
        }

        let outcome = match result {
            Ok(dates) => {
                state.availability.populate(dates);
                ScanOutcome::from_initial_count(state.availability.len())
            }
            Err(e) => {
                tracing::warn!("Search failed: {}", e);
                ScanOutcome::Failed
            }
        };

        state.phase = Phase::Idle;
        state.outcome = outcome.clone();
        tracing::info!(?outcome, "Search finished");
        self.inner.emit(ControllerEvent::ScanFinished {
            kind: ScanKind::Initial,
            outcome: outcome.clone(),
        });
        Some(outcome)
    }

    /// Starts an alerting session for the current query and month.
    ///
    /// The first scan happens one full interval from now. Already alerting is
    /// a no-op; a running one-shot search is an invalid state.
    pub async fn enable_alerting(&self) -> Result<()> {
        let mut state = self.inner.state.lock().await;
        match state.phase {
            Phase::Idle => {}
            Phase::AlertingIdle | Phase::AlertingInFlight => return Ok(()),
            Phase::ScanningInitial => {
                return Err(SlotwatchError::invalid_state(
                    "Cannot enable alerts while a search is in progress",
                ));
            }
        }

        state.epoch = state.epoch.wrapping_add(1);
        let epoch = state.epoch;
        state.timer = Some(Inner::spawn_timer(&self.inner, epoch));
        state.phase = Phase::AlertingIdle;
        state.outcome = ScanOutcome::AlertingStarted;

        tracing::info!(
            consulate = %state.query.consulate,
            month = %state.month,
            interval_ms = self.inner.settings.interval.as_millis() as u64,
            "Real-time alerts enabled"
        );
        self.inner.emit(ControllerEvent::AlertingEnabled {
            query: state.query.clone(),
            month: state.month,
        });
        Ok(())
    }

    /// Ends the alerting session. Returns `false` when alerts were not on.
    pub async fn disable_alerting(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        if !state.phase.is_alerting() {
            return false;
        }

        state.invalidate();
        state.outcome = ScanOutcome::AlertingStopped;
        tracing::info!("Real-time alerts disabled");
        self.inner.emit(ControllerEvent::AlertingDisabled);
        true
    }

    /// Switches to another query. Returns `false` if `query` is the current one.
    pub async fn change_query(&self, query: AppointmentQuery) -> bool {
        let mut state = self.inner.state.lock().await;
        if state.query == query {
            return false;
        }
        state.query = query;
        self.inner.apply_context_change(&mut state);
        true
    }

    /// Switches to another month. Returns `false` if `month` is the current one.
    pub async fn change_month(&self, month: TargetMonth) -> bool {
        let mut state = self.inner.state.lock().await;
        if state.month == month {
            return false;
        }
        state.month = month;
        self.inner.apply_context_change(&mut state);
        true
    }

    /// Stops everything and forgets all dates.
    pub async fn shutdown(&self) {
        let mut state = self.inner.state.lock().await;
        let was_alerting = state.phase.is_alerting();
        state.reset();
        if was_alerting {
            self.inner.emit(ControllerEvent::AlertingDisabled);
        }
        tracing::debug!("Polling controller shut down");
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let mut state = self.inner.state.lock().await;
        let now = Instant::now();
        state.highlights.tick(now);

        ControllerSnapshot {
            query: state.query.clone(),
            month: state.month,
            available_dates: state.availability.snapshot(),
            highlighted: state.highlights.highlighted_at(now),
            phase: state.phase,
            outcome: state.outcome.clone(),
            status_text: StatusNarrator::narrate(
                state.phase,
                &state.outcome,
                &state.query,
                state.month,
            ),
        }
    }

    pub async fn phase(&self) -> Phase {
        self.inner.state.lock().await.phase
    }

    pub async fn query(&self) -> AppointmentQuery {
        self.inner.state.lock().await.query.clone()
    }

    pub async fn month(&self) -> TargetMonth {
        self.inner.state.lock().await.month
    }

    pub async fn is_highlighted(&self, date: &DateKey) -> bool {
        self.inner.state.lock().await.highlights.is_highlighted(date)
    }
}

impl Inner {
    fn emit(&self, event: ControllerEvent) {
        if let Some(events) = &self.events {
            // A closed receiver only means nobody is listening any more.
            let _ = events.send(event);
        }
    }

    fn apply_context_change(&self, state: &mut ControllerState) {
        let was_alerting = state.phase.is_alerting();
        state.reset();
        state.outcome = if was_alerting {
            ScanOutcome::AlertingStopped
        } else {
            ScanOutcome::NotStarted
        };

        tracing::info!(
            consulate = %state.query.consulate,
            month = %state.month,
            "Search context changed"
        );
        if was_alerting {
            self.emit(ControllerEvent::AlertingDisabled);
        }
        self.emit(ControllerEvent::ContextChanged {
            query: state.query.clone(),
            month: state.month,
        });
    }

    fn spawn_timer(this: &Arc<Self>, epoch: u64) -> JoinHandle<()> {
        let weak = Arc::downgrade(this);
        let period = this.settings.interval.max(MIN_INTERVAL);
        let start = Instant::now() + period;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if !Inner::on_tick(&inner, epoch).await {
                    break;
                }
            }
            tracing::debug!(epoch, "Alert timer stopped");
        })
    }

    /// Returns `false` once the session this timer belongs to is over.
    async fn on_tick(this: &Arc<Self>, epoch: u64) -> bool {
        let (query, month) = {
            let mut state = this.state.lock().await;
            if state.epoch != epoch || !state.phase.is_alerting() {
                return false;
            }
            if state.phase == Phase::AlertingInFlight {
                tracing::debug!("Previous alert scan still running; skipping tick");
                return true;
            }
            state.phase = Phase::AlertingInFlight;
            (state.query.clone(), state.month)
        };

        this.emit(ControllerEvent::ScanStarted {
            kind: ScanKind::Alert,
        });

        let inner = Arc::clone(this);
        tokio::spawn(async move {
            let result = inner.oracle.fetch(&query, month).await;
            Inner::apply_alert_result(&inner, epoch, result).await;
        });
        true
    }

    async fn apply_alert_result(
        this: &Arc<Self>,
        epoch: u64,
        result: std::result::Result<Vec<DateKey>, OracleError>,
    ) {
        let mut state = this.state.lock().await;
        if state.epoch != epoch || state.phase != Phase::AlertingInFlight {
            tracing::debug!(epoch, current = state.epoch, "Discarding stale alert result");
            return;
        }
        state.phase = Phase::AlertingIdle;

        match result {
            Ok(batch) => {
                let added = state.availability.merge(batch);
                if added.is_empty() {
                    tracing::debug!("Alert scan found nothing new");
                } else {
                    let ttl = this.settings.highlight_ttl;
                    state.highlights.add(added.iter(), ttl);
                    state.outcome = ScanOutcome::NewDates {
                        dates: added.clone(),
                    };
                    tracing::info!(count = added.len(), "New appointment dates found");
                    this.emit(ControllerEvent::NewDatesFound { dates: added });
                    if state.expiry.is_none() {
                        state.expiry = Some(Inner::spawn_expiry(this));
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Alert scan failed: {}", e);
            }
        }

        this.emit(ControllerEvent::ScanFinished {
            kind: ScanKind::Alert,
            outcome: state.outcome.clone(),
        });
    }

    /// Wakes at each pending highlight expiry, prunes the due entries and
    /// reports them. Exits once nothing is highlighted.
    fn spawn_expiry(this: &Arc<Self>) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(this);
        tokio::spawn(async move {
            loop {
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let deadline = {
                    let mut state = inner.state.lock().await;
                    let expired = state.highlights.tick(Instant::now());
                    if !expired.is_empty() {
                        tracing::debug!(count = expired.len(), "Highlights expired");
                        inner.emit(ControllerEvent::HighlightsExpired { dates: expired });
                    }
                    match state.highlights.next_expiry() {
                        Some(deadline) => deadline,
                        None => {
                            state.expiry = None;
                            break;
                        }
                    }
                };
                drop(inner);
                tokio::time::sleep_until(deadline).await;
            }
        })
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for task in [state.timer.take(), state.expiry.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;
