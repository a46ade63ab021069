// tests/hung_jobs.rs

use std::error::Error;

use gridpoll::config::{HungJobThresholds, PollConfig};
use gridpoll::poller::{HungJobDetector, HungVerdict, StatusPoller};
use gridpoll::scheduler::SchedulerCommand;
use gridpoll::status::CanonicalStatus;
use gridpoll::types::JobHandle;
use gridpoll_test_utils::capture_logs;
use gridpoll_test_utils::fake_scheduler::{FakeReply, FakeScheduler};

type TestResult = Result<(), Box<dyn Error>>;

const THRESHOLDS: HungJobThresholds = HungJobThresholds {
    cpu_hung_min_time: 30,
    cpu_hung_max_ratio: 0.1,
};

fn qacct_with_usage(usage: &str) -> String {
    format!("qname all.q\nfailed 0\nexit_status 0\n{usage}\n")
}

#[tokio::test]
async fn short_job_is_left_alone() -> TestResult {
    let fake = FakeScheduler::new();
    let detector = HungJobDetector::new(THRESHOLDS);

    let out = qacct_with_usage("usage 1: wallclock=00:29:59, cpu=00:00:00");
    let verdict = detector.check(&fake, 5, &out).await?;

    assert_eq!(verdict, HungVerdict::TooEarly);
    assert!(fake.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn idle_long_job_is_deleted() -> TestResult {
    let fake = FakeScheduler::new().qdel_always(FakeReply::stdout("deleted"));
    let detector = HungJobDetector::new(THRESHOLDS);

    let out = qacct_with_usage("usage 1: wallclock=1:00:00:00, cpu=00:10:00");
    let verdict = detector.check(&fake, 5, &out).await?;

    assert_eq!(verdict, HungVerdict::Hung);
    assert_eq!(fake.calls(), vec![SchedulerCommand::Delete(5)]);
    Ok(())
}

#[tokio::test]
async fn busy_job_is_left_alone() -> TestResult {
    let fake = FakeScheduler::new();
    let detector = HungJobDetector::new(THRESHOLDS);

    // Ratio exactly at the threshold.
    let out = qacct_with_usage("usage 1: wallclock=01:00:00, cpu=00:06:00");
    assert_eq!(detector.check(&fake, 5, &out).await?, HungVerdict::Healthy);
    assert_eq!(fake.count_qdel(), 0);
    Ok(())
}

#[tokio::test]
async fn failed_qdel_still_reports_hung() -> TestResult {
    let fake = FakeScheduler::new().qdel_always(FakeReply::exit(1, "denied: not owner"));
    let detector = HungJobDetector::new(THRESHOLDS);

    let (logs, _guard) = capture_logs();
    let out = qacct_with_usage("usage 1: wallclock=02:00:00");
    assert_eq!(detector.check(&fake, 5, &out).await?, HungVerdict::Hung);
    assert!(logs.contents().contains("denied: not owner"));
    Ok(())
}

#[tokio::test]
async fn qdel_launch_failure_does_not_hide_accounting_status() -> TestResult {
    let fake = FakeScheduler::new()
        .qacct_always(FakeReply::stdout(&qacct_with_usage(
            "usage 1: wallclock=02:00:00, cpu=00:00:01",
        )))
        .qdel_always(FakeReply::LaunchError("qdel: not found".into()));
    let poller = StatusPoller::new(JobHandle::new(5, "/nonexistent"), PollConfig::default(), fake.clone())
        .with_hung_detection(Some(THRESHOLDS));

    let (logs, _guard) = capture_logs();
    assert_eq!(poller.query_qacct().await?, Some(CanonicalStatus::Success));
    assert_eq!(fake.count_qdel(), 1);
    assert_eq!(logs.lines_containing("could not delete hung job"), 1);
    Ok(())
}
