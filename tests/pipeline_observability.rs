use std::sync::{Arc, Mutex};

use data_alchemy::observability::{
    CompositeObserver, LogObserver, PipelineContext, PipelineObserver, PipelineSeverity, PipelineStage,
    PipelineStats,
};
use data_alchemy::pipeline::{run_pipeline, PipelineOptions, PipelineSteps};
use data_alchemy::AlchemyError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<PipelineStats>>,
    failures: Mutex<Vec<(PipelineStage, PipelineSeverity)>>,
    alerts: Mutex<Vec<PipelineSeverity>>,
}

impl PipelineObserver for RecordingObserver {
    fn on_success(&self, _ctx: &PipelineContext, stats: PipelineStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, _error: &AlchemyError) {
        self.failures.lock().unwrap().push((ctx.stage, severity));
    }

    fn on_alert(&self, _ctx: &PipelineContext, severity: PipelineSeverity, _error: &AlchemyError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options(obs: &Arc<RecordingObserver>, alert_at_or_above: PipelineSeverity) -> PipelineOptions {
    PipelineOptions {
        observer: Some(obs.clone()),
        alert_at_or_above,
    }
}

#[test]
fn observer_receives_stats_on_success() {
    let obs = Arc::new(RecordingObserver::default());
    let steps = PipelineSteps {
        deduplicate: true,
        ..Default::default()
    };
    run_pipeline("data.csv", b"a,b\n1,2\n1,2\n,4\n", &steps, &options(&obs, PipelineSeverity::Critical)).unwrap();

    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![PipelineStats {
            rows_in: 3,
            rows_out: 2,
            columns_out: 2,
        }]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn empty_upload_is_a_warning_without_alert() {
    let obs = Arc::new(RecordingObserver::default());
    let _ = run_pipeline("data.csv", b"", &PipelineSteps::default(), &options(&obs, PipelineSeverity::Error))
        .unwrap_err();

    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![(PipelineStage::Read, PipelineSeverity::Warning)]
    );
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn failing_stage_is_reported_and_alerts_at_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let steps = PipelineSteps {
        columns: Some(vec!["missing".to_string()]),
        ..Default::default()
    };
    let _ = run_pipeline("data.csv", b"a\n1\n", &steps, &options(&obs, PipelineSeverity::Error)).unwrap_err();

    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![(PipelineStage::Project, PipelineSeverity::Error)]
    );
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![PipelineSeverity::Error]);
}

#[test]
fn composite_observer_fans_out() {
    let first = Arc::new(RecordingObserver::default());
    let second = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn PipelineObserver>> = vec![first.clone(), second.clone(), Arc::new(LogObserver)];
    let composite = CompositeObserver::new(observers);
    let opts = PipelineOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    let _ = run_pipeline("data.xml", b"<a/>", &PipelineSteps::default(), &opts).unwrap_err();

    for obs in [&first, &second] {
        assert_eq!(
            obs.failures.lock().unwrap().clone(),
            vec![(PipelineStage::Read, PipelineSeverity::Warning)]
        );
    }
}

#[test]
fn severity_classification() {
    assert_eq!(PipelineSeverity::for_error(&AlchemyError::EmptyFile), PipelineSeverity::Warning);
    assert_eq!(
        PipelineSeverity::for_error(&AlchemyError::UnknownColumn {
            column: "c".to_string()
        }),
        PipelineSeverity::Error
    );
    let io = csv::Error::from(std::io::Error::other("disk gone"));
    assert_eq!(PipelineSeverity::for_error(&AlchemyError::Csv(io)), PipelineSeverity::Critical);
    assert!(PipelineSeverity::Critical > PipelineSeverity::Warning);
}
