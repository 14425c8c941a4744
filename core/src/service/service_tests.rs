//! Tests for the input service loop

use chrono::Duration as ChronoDuration;
use quill_types::Action;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use super::{InputService, ServiceHandle};
use crate::actions::{ActionSignalHandler, RecordingDispatcher};
use crate::context::AppConfig;
use crate::input::{
    CharClass, DeviceId, InputEvent, KeyTransition, LogicalButton, SourceEvent, Timestamp, now,
};
use crate::status::{MemoryStatusPublisher, StatusRecord, StatusSignalHandler};

struct Harness {
    handle: ServiceHandle,
    recorder: Arc<RecordingDispatcher>,
    status: Arc<MemoryStatusPublisher>,
    task: tokio::task::JoinHandle<()>,
}

fn start() -> Harness {
    let config = AppConfig {
        poll_interval_ms: 20,
        ..Default::default()
    };
    let (mut service, handle) = InputService::new(&config, Arc::new(AtomicBool::new(false)));

    let recorder = Arc::new(RecordingDispatcher::default());
    service.add_signal_handler(Box::new(ActionSignalHandler::new(recorder.clone())));

    let status = Arc::new(MemoryStatusPublisher::new());
    service.set_status_handler(StatusSignalHandler::new(status.clone()));

    let task = tokio::spawn(service.run());
    Harness {
        handle,
        recorder,
        status,
        task,
    }
}

fn key(timestamp: Timestamp) -> SourceEvent {
    SourceEvent {
        device: DeviceId(2),
        event: InputEvent::Keystroke {
            timestamp,
            class: CharClass::Alphanumeric,
        },
    }
}

fn button(
    device: usize,
    button: LogicalButton,
    transition: KeyTransition,
    timestamp: Timestamp,
) -> SourceEvent {
    SourceEvent {
        device: DeviceId(device),
        event: InputEvent::Button {
            timestamp,
            button,
            transition,
        },
    }
}

#[test]
fn test_service_loop_can_be_spawned() {
    fn assert_send<T: Send>(_: &T) {}

    let (mut service, _handle) =
        InputService::new(&AppConfig::default(), Arc::new(AtomicBool::new(false)));
    service.add_signal_handler(Box::new(ActionSignalHandler::new(Arc::new(
        RecordingDispatcher::default(),
    ))));
    let run = service.run();
    assert_send(&run);
}

#[tokio::test]
async fn test_keystrokes_reach_snapshot_and_report() {
    let h = start();
    let base = now() - ChronoDuration::seconds(30);
    for i in 0..13 {
        h.handle
            .send_event(key(base + ChronoDuration::milliseconds(i * 200)))
            .await
            .unwrap();
    }
    h.handle.sync().await.unwrap();

    let stats = h.handle.snapshot().await;
    assert_eq!(stats.keystrokes_total, 13);
    assert_eq!(stats.words_total, 2);
    assert_eq!(stats.sessions_total, 1);
    assert!(stats.session_active);

    let report = h.handle.report().await;
    assert_eq!(report.pages, 0);
    assert_eq!(report.achievement.unwrap().current.title, "Apprentice Scribe");

    h.handle.shutdown().await;
    h.task.await.unwrap();
}

#[tokio::test]
async fn test_watchdog_fires_long_press_while_held() {
    let h = start();
    h.handle
        .send_event(button(
            0,
            LogicalButton::Power,
            KeyTransition::Down,
            now() - ChronoDuration::seconds(3),
        ))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    h.handle.sync().await.unwrap();

    assert_eq!(h.recorder.actions(), vec![Action::Sleep]);
    assert!(h.handle.buttons().await.pressed.is_empty());
    assert_eq!(
        h.status.get(StatusRecord::Button(LogicalButton::Power)).as_deref(),
        Some("released")
    );
    assert_eq!(h.status.get(StatusRecord::LastAction).as_deref(), Some("sleep"));

    h.handle.shutdown().await;
    h.task.await.unwrap();
}

#[tokio::test]
async fn test_buttons_from_different_devices_form_combination() {
    let h = start();
    let t = now();
    h.handle
        .send_event(button(1, LogicalButton::PageLeft, KeyTransition::Down, t))
        .await
        .unwrap();
    h.handle
        .send_event(button(
            2,
            LogicalButton::PageRight,
            KeyTransition::Down,
            t + ChronoDuration::milliseconds(40),
        ))
        .await
        .unwrap();
    h.handle.sync().await.unwrap();

    assert_eq!(
        h.recorder.actions(),
        vec![Action::PageUp, Action::PageDown, Action::ToggleWritingMode]
    );
    assert!(h.handle.buttons().await.writing_mode);
    assert_eq!(h.status.get(StatusRecord::WritingMode).as_deref(), Some("on"));

    h.handle.shutdown().await;
    h.task.await.unwrap();
}

#[tokio::test]
async fn test_stats_record_published_on_tick() {
    let h = start();
    h.handle.send_event(key(now())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let json = h.status.get(StatusRecord::Stats).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["stats"]["keystrokes_total"], 1);

    h.handle.shutdown().await;
    h.task.await.unwrap();
}

#[tokio::test]
async fn test_shutdown_flag_stops_loop() {
    let h = start();
    assert!(h.handle.is_running());

    h.handle
        .shared
        .shutdown
        .store(true, std::sync::atomic::Ordering::SeqCst);
    tokio::time::timeout(Duration::from_secs(1), h.task)
        .await
        .expect("service should stop within a few ticks")
        .unwrap();
    assert!(!h.handle.is_running());
}
