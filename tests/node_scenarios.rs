// tests/node_scenarios.rs
// End-to-end runs of the motion node through the cooperative scheduler,
// with real CSV files in a temporary directory.

use approx::assert_relative_eq;
use motion_profiles::core::DispatchReport;
use motion_profiles::{
    CommandPublisher, Event, ImuSample, LoopState, MotionConfig, MotionNode, MotionProfile,
    NodeError, OdomSample, ScanSample, Scheduler, SensorKind, Stamp, VelocityCommand,
    open_session,
};
use rstest::{fixture, rstest};
use std::path::Path;
use tempfile::TempDir;

#[derive(Default)]
struct CollectingPublisher {
    sent: Vec<VelocityCommand>,
}

impl CommandPublisher for CollectingPublisher {
    fn publish(&mut self, command: &VelocityCommand) -> Result<(), NodeError> {
        self.sent.push(*command);
        Ok(())
    }
}

#[fixture]
fn log_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn config_for(dir: &Path) -> MotionConfig {
    let mut config = MotionConfig::default();
    config.logging.output_dir = dir.to_path_buf();
    config
}

fn start(selector: &str, dir: &Path) -> MotionNode<CollectingPublisher> {
    let config = config_for(dir);
    let (profile, loggers) = open_session(selector, &config).unwrap();
    MotionNode::new(
        profile,
        config.control.tick_period_secs,
        loggers,
        CollectingPublisher::default(),
    )
}

fn imu(sec: i32) -> Event {
    Event::Imu(ImuSample {
        linear_accel_x: 0.1,
        linear_accel_y: 0.2,
        angular_vel_z: 0.3,
        stamp: Some(Stamp::new(sec, 500)),
    })
}

fn odom(sec: i32) -> Event {
    Event::Odom(OdomSample {
        pos_x: 1.5,
        pos_y: -0.5,
        yaw: 0.25,
        stamp: Some(Stamp::new(sec, 0)),
    })
}

fn scan(sec: i32) -> Event {
    Event::Scan(ScanSample {
        ranges: vec![1.0, 2.0, 3.5],
        angle_increment: 0.5,
        stamp: Some(Stamp::new(sec, 0)),
    })
}

fn data_rows(path: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(path).unwrap();
    content.lines().skip(1).map(str::to_string).collect()
}

#[rstest]
fn spiral_run_emits_growing_commands(log_dir: TempDir) {
    let mut node = start("spiral", log_dir.path());
    let mut scheduler = Scheduler::new();

    scheduler.enqueue(imu(1));
    scheduler.enqueue(odom(1));
    scheduler.enqueue(scan(1));
    scheduler.dispatch_pending(&mut node);

    for _ in 0..3 {
        scheduler.enqueue(Event::Tick);
        scheduler.dispatch_pending(&mut node);
    }

    let sent = &node.publisher().sent;
    assert_eq!(sent.len(), 3);
    let expected = [0.0, 0.01, 0.02];
    for (cmd, linear) in sent.iter().zip(expected) {
        assert_relative_eq!(cmd.linear_x, linear, epsilon = 1e-12);
        assert_eq!(cmd.angular_z, 1.0);
    }
    assert_relative_eq!(node.control().elapsed(), 0.3, epsilon = 1e-12);
}

#[rstest]
fn ticks_before_readiness_emit_nothing(log_dir: TempDir) {
    let mut node = start("circle", log_dir.path());
    let mut scheduler = Scheduler::new();

    scheduler.enqueue(imu(1));
    scheduler.enqueue(Event::Tick);
    scheduler.enqueue(Event::Tick);
    let report = scheduler.dispatch_pending(&mut node);
    assert_eq!(report.commands, 0);
    assert_eq!(node.control().elapsed(), 0.0);

    scheduler.enqueue(scan(2));
    scheduler.enqueue(Event::Tick);
    scheduler.dispatch_pending(&mut node);
    assert!(node.publisher().sent.is_empty());
    assert_eq!(node.control().state(), LoopState::WaitingForSensors);

    // Sensor queues drain before ticks, so this tick already sees odom
    scheduler.enqueue(Event::Tick);
    scheduler.enqueue(odom(3));
    let report = scheduler.dispatch_pending(&mut node);
    assert_eq!(
        report,
        DispatchReport {
            sensor_events: 1,
            ticks: 1,
            commands: 1,
            failures: 0
        }
    );
    assert_eq!(node.publisher().sent, vec![VelocityCommand::new(1.0, 1.0)]);
}

#[rstest]
fn every_tick_after_readiness_emits_exactly_once(log_dir: TempDir) {
    let mut node = start("line", log_dir.path());
    let mut scheduler = Scheduler::new();
    scheduler.enqueue(imu(1));
    scheduler.enqueue(odom(1));
    scheduler.enqueue(scan(1));
    for _ in 0..10 {
        scheduler.enqueue(Event::Tick);
    }
    let report = scheduler.dispatch_pending(&mut node);

    assert_eq!(report.ticks, 10);
    assert_eq!(report.commands, 10);
    assert!(node
        .publisher()
        .sent
        .iter()
        .all(|cmd| *cmd == VelocityCommand::new(1.0, 0.0)));
    assert_eq!(node.control().ticks_emitted(), 10);
}

#[rstest]
fn log_rows_match_messages_received(log_dir: TempDir) {
    let mut node = start("circle", log_dir.path());
    let mut scheduler = Scheduler::new();

    // Out-of-order stamps and lopsided rates are fine
    for sec in [3, 1, 2, 5] {
        scheduler.enqueue(imu(sec));
    }
    scheduler.enqueue(odom(1));
    scheduler.enqueue(Event::Tick);
    scheduler.dispatch_pending(&mut node);
    for sec in 0..2 {
        scheduler.enqueue(scan(sec));
        scheduler.enqueue(Event::Tick);
    }
    scheduler.dispatch_pending(&mut node);

    assert_eq!(node.loggers().rows_written(SensorKind::Imu), 4);
    assert_eq!(node.loggers().rows_written(SensorKind::Odom), 1);
    assert_eq!(node.loggers().rows_written(SensorKind::Laser), 2);
    drop(node);

    let dir = log_dir.path();
    assert_eq!(data_rows(&dir.join("imu_content_circle.csv")).len(), 4);
    assert_eq!(data_rows(&dir.join("odom_content_circle.csv")).len(), 1);
    let laser = data_rows(&dir.join("laser_content_circle.csv"));
    assert_eq!(laser.len(), 2);
    assert_eq!(laser[0], "\"[1.0, 2.0, 3.5]\",0.5,0");
}

#[rstest]
fn rows_use_header_stamp_in_nanoseconds(log_dir: TempDir) {
    let mut node = start("spiral", log_dir.path());
    let mut scheduler = Scheduler::new();
    scheduler.enqueue(imu(7));
    scheduler.enqueue(odom(8));
    scheduler.dispatch_pending(&mut node);
    drop(node);

    let imu_log = std::fs::read_to_string(log_dir.path().join("imu_content_spiral.csv")).unwrap();
    assert_eq!(
        imu_log,
        "linear_accel_x,linear_accel_y,angular_vel_z,timestamp_ns\n0.1,0.2,0.3,7000000500\n"
    );
    let odom_rows = data_rows(&log_dir.path().join("odom_content_spiral.csv"));
    assert_eq!(odom_rows, vec!["1.5,-0.5,0.25,8000000000".to_string()]);
}

#[rstest]
fn missing_stamp_fails_only_that_message(log_dir: TempDir) {
    let mut node = start("circle", log_dir.path());
    let mut scheduler = Scheduler::new();

    scheduler.enqueue(Event::Odom(OdomSample::default()));
    scheduler.enqueue(imu(1));
    scheduler.enqueue(scan(1));
    scheduler.enqueue(Event::Tick);
    let report = scheduler.dispatch_pending(&mut node);

    assert_eq!(report.failures, 1);
    assert_eq!(report.commands, 1);
    assert_eq!(node.loggers().rows_written(SensorKind::Odom), 1);
    drop(node);

    let odom_rows = data_rows(&log_dir.path().join("odom_content_circle.csv"));
    assert_eq!(odom_rows, vec!["0.0,0.0,0.0,".to_string()]);
}

#[rstest]
#[case("bogus")]
#[case("circles")]
#[case("")]
fn unknown_selector_creates_nothing(log_dir: TempDir, #[case] selector: &str) {
    let out = log_dir.path().join("run");
    let err = open_session(selector, &config_for(&out)).unwrap_err();
    assert!(matches!(err, NodeError::UnknownMotion(_)));
    assert!(!out.exists());
}

#[rstest]
#[case("Circle", MotionProfile::Circle, "circle")]
#[case("SPIRAL", MotionProfile::Spiral, "spiral")]
#[case("line", MotionProfile::AcceleratedLine, "line")]
fn selector_names_the_log_files(
    log_dir: TempDir,
    #[case] selector: &str,
    #[case] profile: MotionProfile,
    #[case] label: &str,
) {
    let (parsed, _loggers) = open_session(selector, &config_for(log_dir.path())).unwrap();
    assert_eq!(parsed, profile);
    for kind in ["imu", "odom", "laser"] {
        let path = log_dir.path().join(format!("{}_content_{}.csv", kind, label));
        assert!(path.exists(), "{} missing", path.display());
    }
}

#[rstest]
fn shutdown_stops_dispatch(log_dir: TempDir) {
    let mut node = start("circle", log_dir.path());
    let mut scheduler = Scheduler::new();
    scheduler.enqueue(imu(1));
    scheduler.enqueue(odom(1));
    scheduler.enqueue(scan(1));
    scheduler.dispatch_pending(&mut node);

    scheduler.enqueue(Event::Tick);
    scheduler.shutdown();
    scheduler.enqueue(Event::Tick);
    let report = scheduler.dispatch_pending(&mut node);

    assert_eq!(report, DispatchReport::default());
    assert!(node.publisher().sent.is_empty());
}
