#[cfg(test)]
mod tests {
    use crate::polling::{ControllerEvent, ControllerSettings, PollingController};
    use async_trait::async_trait;
    use slotwatch_core::{
        AppointmentQuery, DateKey, DateOracle, OracleError, Phase, ScanKind, ScanOutcome,
        TargetMonth,
    };
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::sleep;

    struct Step {
        delay: Duration,
        result: Result<Vec<DateKey>, OracleError>,
    }

    // Mock oracle replaying a fixed script; an exhausted script answers with no dates.
    struct ScriptedOracle {
        calls: AtomicUsize,
        script: Mutex<VecDeque<Step>>,
        requests: Mutex<Vec<(AppointmentQuery, TargetMonth)>>,
    }

    impl ScriptedOracle {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(steps.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn requests(&self) -> Vec<(AppointmentQuery, TargetMonth)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DateOracle for ScriptedOracle {
        async fn fetch(
            &self,
            query: &AppointmentQuery,
            month: TargetMonth,
        ) -> Result<Vec<DateKey>, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push((query.clone(), month));
            let step = self.script.lock().unwrap().pop_front();
            let Some(step) = step else {
                return Ok(Vec::new());
            };
            if !step.delay.is_zero() {
                sleep(step.delay).await;
            }
            step.result
        }
    }

    fn dates(raw: &[&str]) -> Vec<DateKey> {
        raw.iter().map(|d| DateKey::parse(d).unwrap()).collect()
    }

    fn ok(raw: &[&str]) -> Step {
        Step {
            delay: Duration::ZERO,
            result: Ok(dates(raw)),
        }
    }

    fn slow(secs: u64, raw: &[&str]) -> Step {
        Step {
            delay: Duration::from_secs(secs),
            result: Ok(dates(raw)),
        }
    }

    fn failing() -> Step {
        Step {
            delay: Duration::ZERO,
            result: Err(OracleError::Http {
                status: 503,
                message: "overloaded".to_string(),
                retryable: true,
            }),
        }
    }

    fn march() -> TargetMonth {
        TargetMonth::new(2024, 3).unwrap()
    }

    fn settings() -> ControllerSettings {
        ControllerSettings {
            interval: Duration::from_secs(15),
            highlight_ttl: Duration::from_secs(5),
        }
    }

    fn controller(oracle: &Arc<ScriptedOracle>) -> PollingController {
        PollingController::new(
            oracle.clone(),
            AppointmentQuery::default(),
            march(),
            settings(),
        )
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ControllerEvent>) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_populates_without_highlights() {
        let oracle = ScriptedOracle::new(vec![ok(&["2024-03-12", "2024-03-05"])]);
        let controller = controller(&oracle);

        let outcome = controller.start_one_shot().await;
        assert_eq!(outcome, Some(ScanOutcome::Found { count: 2 }));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.available_dates, dates(&["2024-03-05", "2024-03-12"]));
        assert!(snapshot.highlighted.is_empty());
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.status_text, "Found 2 available dates for March.");
        assert_eq!(oracle.requests(), vec![(AppointmentQuery::default(), march())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_empty_result_reports_no_results() {
        let oracle = ScriptedOracle::new(vec![ok(&[])]);
        let controller = controller(&oracle);

        assert_eq!(
            controller.start_one_shot().await,
            Some(ScanOutcome::NoResults)
        );
        assert_eq!(
            controller.snapshot().await.status_text,
            "No appointments found for March. Try another month."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_failure_leaves_empty_set() {
        let oracle = ScriptedOracle::new(vec![ok(&["2024-03-05"]), failing()]);
        let controller = controller(&oracle);

        controller.start_one_shot().await;
        assert_eq!(controller.snapshot().await.available_dates.len(), 1);

        let outcome = controller.start_one_shot().await;
        assert_eq!(outcome, Some(ScanOutcome::Failed));

        let snapshot = controller.snapshot().await;
        assert!(snapshot.available_dates.is_empty());
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.status_text, "An error occurred. Please try again.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_tick_merges_and_highlights_new_dates() {
        let oracle = ScriptedOracle::new(vec![
            ok(&["2024-03-01", "2024-03-05"]),
            ok(&["2024-03-01", "2024-03-07", "2024-03-08"]),
        ]);
        let controller = controller(&oracle);

        controller.start_one_shot().await;
        controller.enable_alerting().await.unwrap();

        // First tick is one full interval after enabling.
        sleep(Duration::from_secs(14)).await;
        assert_eq!(oracle.calls(), 1);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(oracle.calls(), 2);

        let snapshot = controller.snapshot().await;
        assert_eq!(
            snapshot.available_dates,
            dates(&["2024-03-01", "2024-03-05", "2024-03-07", "2024-03-08"])
        );
        assert_eq!(
            snapshot.highlighted.iter().cloned().collect::<Vec<_>>(),
            dates(&["2024-03-07", "2024-03-08"])
        );
        assert_eq!(snapshot.phase, Phase::AlertingIdle);
        assert_eq!(
            snapshot.status_text,
            "🎉 New appointment found on 2024-03-07, 2024-03-08!"
        );

        // Highlights lapse after the TTL; availability stays.
        sleep(Duration::from_secs(5)).await;
        let snapshot = controller.snapshot().await;
        assert!(snapshot.highlighted.is_empty());
        assert_eq!(snapshot.available_dates.len(), 4);
        assert!(
            !controller
                .is_highlighted(&DateKey::parse("2024-03-07").unwrap())
                .await
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_during_slow_scan_are_dropped() {
        let oracle = ScriptedOracle::new(vec![slow(40, &["2024-03-07"])]);
        let controller = controller(&oracle);

        controller.enable_alerting().await.unwrap();

        // Ticks at 15s, 30s: only the first reaches the oracle.
        sleep(Duration::from_secs(31)).await;
        assert_eq!(oracle.calls(), 1);
        assert_eq!(controller.phase().await, Phase::AlertingInFlight);

        // The slow scan lands at 55s; the next tick is due at 60s.
        sleep(Duration::from_secs(25)).await;
        assert_eq!(oracle.calls(), 1);
        assert_eq!(controller.phase().await, Phase::AlertingIdle);
        assert_eq!(
            controller.snapshot().await.available_dates,
            dates(&["2024-03-07"])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_after_disable_is_discarded() {
        let oracle = ScriptedOracle::new(vec![slow(10, &["2024-03-07"])]);
        let controller = controller(&oracle);

        controller.enable_alerting().await.unwrap();
        sleep(Duration::from_secs(16)).await;
        assert_eq!(controller.phase().await, Phase::AlertingInFlight);

        assert!(controller.disable_alerting().await);
        assert_eq!(controller.phase().await, Phase::Idle);

        sleep(Duration::from_secs(30)).await;
        let snapshot = controller.snapshot().await;
        assert!(snapshot.available_dates.is_empty());
        assert!(snapshot.highlighted.is_empty());
        assert_eq!(snapshot.outcome, ScanOutcome::AlertingStopped);
        assert_eq!(snapshot.status_text, "Real-time alerts disabled.");
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_alert_scan_keeps_session() {
        let oracle = ScriptedOracle::new(vec![failing(), ok(&["2024-03-07"])]);
        let controller = controller(&oracle);

        controller.enable_alerting().await.unwrap();
        sleep(Duration::from_secs(16)).await;

        assert_eq!(oracle.calls(), 1);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.phase, Phase::AlertingIdle);
        assert_eq!(snapshot.outcome, ScanOutcome::AlertingStarted);
        assert_eq!(
            snapshot.status_text,
            "Real-time alerts enabled for Toronto, Canada. Scanning for new appointments..."
        );

        sleep(Duration::from_secs(15)).await;
        assert_eq!(oracle.calls(), 2);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.available_dates, dates(&["2024-03-07"]));
        assert!(snapshot.is_highlighted(&DateKey::parse("2024-03-07").unwrap()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_change_resets_session() {
        let oracle = ScriptedOracle::new(vec![
            ok(&["2024-03-01"]),
            ok(&["2024-03-01", "2024-03-07"]),
        ]);
        let controller = controller(&oracle);

        controller.start_one_shot().await;
        controller.enable_alerting().await.unwrap();
        sleep(Duration::from_secs(16)).await;
        assert_eq!(controller.snapshot().await.available_dates.len(), 2);

        let india = AppointmentQuery::default().with_country("India");
        assert!(controller.change_query(india.clone()).await);

        let snapshot = controller.snapshot().await;
        assert!(snapshot.available_dates.is_empty());
        assert!(snapshot.highlighted.is_empty());
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.query, india);
        assert_eq!(snapshot.outcome, ScanOutcome::AlertingStopped);

        // The old session's timer is gone.
        sleep(Duration::from_secs(60)).await;
        assert_eq!(oracle.calls(), 2);

        assert!(!controller.change_query(india).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_month_change_resets_dates() {
        let oracle = ScriptedOracle::new(vec![ok(&["2024-03-01"]), ok(&["2024-04-02"])]);
        let controller = controller(&oracle);

        controller.start_one_shot().await;
        let april = march().next();
        assert!(controller.change_month(april).await);
        assert!(!controller.change_month(april).await);

        let snapshot = controller.snapshot().await;
        assert!(snapshot.available_dates.is_empty());
        assert_eq!(snapshot.month, april);
        assert_eq!(snapshot.outcome, ScanOutcome::NotStarted);
        assert_eq!(controller.query().await, AppointmentQuery::default());

        controller.start_one_shot().await;
        assert_eq!(oracle.requests()[1].1, april);
        assert_eq!(
            controller.snapshot().await.available_dates,
            dates(&["2024-04-02"])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_enable_and_disable_are_idempotent() {
        let oracle = ScriptedOracle::new(vec![]);
        let controller = controller(&oracle);

        controller.enable_alerting().await.unwrap();
        controller.enable_alerting().await.unwrap();

        sleep(Duration::from_secs(16)).await;
        assert_eq!(oracle.calls(), 1);

        assert!(controller.disable_alerting().await);
        assert!(!controller.disable_alerting().await);

        sleep(Duration::from_secs(60)).await;
        assert_eq!(oracle.calls(), 1);
        assert_eq!(controller.phase().await, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enable_rejected_while_searching() {
        let oracle = ScriptedOracle::new(vec![slow(5, &["2024-03-01"])]);
        let controller = Arc::new(controller(&oracle));

        let search = tokio::spawn({
            let controller = controller.clone();
            async move { controller.start_one_shot().await }
        });
        sleep(Duration::from_secs(1)).await;
        assert_eq!(controller.phase().await, Phase::ScanningInitial);
        assert_eq!(
            controller.snapshot().await.status_text,
            "Searching for appointments in Toronto, Canada..."
        );

        let err = controller.enable_alerting().await.unwrap_err();
        assert!(err.is_invalid_state());

        assert_eq!(
            search.await.unwrap(),
            Some(ScanOutcome::Found { count: 1 })
        );
        controller.enable_alerting().await.unwrap();
        assert_eq!(controller.phase().await, Phase::AlertingIdle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_one_shot_supersedes_older() {
        let oracle = ScriptedOracle::new(vec![
            slow(10, &["2024-03-01"]),
            ok(&["2024-03-05", "2024-03-06"]),
        ]);
        let controller = Arc::new(controller(&oracle));

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.start_one_shot().await }
        });
        sleep(Duration::from_secs(1)).await;

        let second = controller.start_one_shot().await;
        assert_eq!(second, Some(ScanOutcome::Found { count: 2 }));
        assert_eq!(first.await.unwrap(), None);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.available_dates, dates(&["2024-03-05", "2024-03-06"]));
        assert_eq!(snapshot.outcome, ScanOutcome::Found { count: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_while_alerting_ends_session() {
        let oracle = ScriptedOracle::new(vec![ok(&["2024-03-01"])]);
        let controller = controller(&oracle);

        controller.enable_alerting().await.unwrap();
        let outcome = controller.start_one_shot().await;
        assert_eq!(outcome, Some(ScanOutcome::Found { count: 1 }));
        assert_eq!(controller.phase().await, Phase::Idle);

        sleep(Duration::from_secs(60)).await;
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_follow_session() {
        let oracle = ScriptedOracle::new(vec![
            ok(&["2024-03-01"]),
            ok(&["2024-03-01", "2024-03-07"]),
        ]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = PollingController::with_events(
            oracle.clone(),
            AppointmentQuery::default(),
            march(),
            settings(),
            tx,
        );

        controller.start_one_shot().await;
        controller.enable_alerting().await.unwrap();
        sleep(Duration::from_secs(16)).await;

        let new_dates = dates(&["2024-03-07"]);
        assert_eq!(
            drain(&mut rx),
            vec![
                ControllerEvent::ScanStarted {
                    kind: ScanKind::Initial
                },
                ControllerEvent::ScanFinished {
                    kind: ScanKind::Initial,
                    outcome: ScanOutcome::Found { count: 1 },
                },
                ControllerEvent::AlertingEnabled {
                    query: AppointmentQuery::default(),
                    month: march(),
                },
                ControllerEvent::ScanStarted {
                    kind: ScanKind::Alert
                },
                ControllerEvent::NewDatesFound {
                    dates: new_dates.clone()
                },
                ControllerEvent::ScanFinished {
                    kind: ScanKind::Alert,
                    outcome: ScanOutcome::NewDates {
                        dates: new_dates.clone()
                    },
                },
            ]
        );

        // Expiry wake-up fires without anyone reading a snapshot.
        sleep(Duration::from_secs(5)).await;
        assert_eq!(
            drain(&mut rx),
            vec![ControllerEvent::HighlightsExpired { dates: new_dates }]
        );

        controller.disable_alerting().await;
        assert_eq!(drain(&mut rx), vec![ControllerEvent::AlertingDisabled]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_highlights_expire_independently() {
        let oracle = ScriptedOracle::new(vec![
            ok(&["2024-03-01"]),
            ok(&["2024-03-01", "2024-03-07"]),
            ok(&["2024-03-01", "2024-03-07", "2024-03-08"]),
        ]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = PollingController::with_events(
            oracle.clone(),
            AppointmentQuery::default(),
            march(),
            ControllerSettings {
                interval: Duration::from_secs(15),
                highlight_ttl: Duration::from_secs(20),
            },
            tx,
        );

        controller.start_one_shot().await;
        controller.enable_alerting().await.unwrap();

        // Ticks at t=15 and t=30; the first batch is still lit at t=31.
        sleep(Duration::from_secs(31)).await;
        let snapshot = controller.snapshot().await;
        assert_eq!(
            snapshot.highlighted.iter().cloned().collect::<Vec<_>>(),
            dates(&["2024-03-07", "2024-03-08"])
        );

        let expired = |events: Vec<ControllerEvent>| -> Vec<Vec<DateKey>> {
            events
                .into_iter()
                .filter_map(|event| match event {
                    ControllerEvent::HighlightsExpired { dates } => Some(dates),
                    _ => None,
                })
                .collect()
        };
        assert!(expired(drain(&mut rx)).is_empty());

        sleep(Duration::from_secs(5)).await;
        assert_eq!(expired(drain(&mut rx)), vec![dates(&["2024-03-07"])]);
        assert!(
            controller
                .is_highlighted(&DateKey::parse("2024-03-08").unwrap())
                .await
        );

        sleep(Duration::from_secs(15)).await;
        assert_eq!(expired(drain(&mut rx)), vec![dates(&["2024-03-08"])]);
        assert!(controller.snapshot().await.highlighted.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_and_drop_stop_timer() {
        let oracle = ScriptedOracle::new(vec![ok(&["2024-03-01"])]);
        let controller = controller(&oracle);

        controller.start_one_shot().await;
        controller.enable_alerting().await.unwrap();
        controller.shutdown().await;

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Idle);
        assert!(snapshot.available_dates.is_empty());

        controller.enable_alerting().await.unwrap();
        drop(controller);

        sleep(Duration::from_secs(60)).await;
        assert_eq!(oracle.calls(), 1);
    }
}
