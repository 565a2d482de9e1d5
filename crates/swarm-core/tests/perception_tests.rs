mod common;

use common::{face_result, hand_result, MockDetector};
use swarm_core::config::PerceptionConfig;
use swarm_core::perception::{DetectorSlot, MountTicket, PerceptionAdapter, ThrottledDetector};

#[test]
fn test_throttle_runs_once_per_interval() {
    let mock = MockDetector::returning(hand_result(0.5, 0.5, false));
    let mut throttled = ThrottledDetector::new(60.0);
    let ticket = throttled.mount();
    assert!(throttled.attach(ticket, mock.clone()));

    // 240 Hz render loop for half a second
    let mut fresh = 0;
    for frame in 0..120 {
        let now = frame as f64 * 1000.0 / 240.0;
        if let Some(poll) = throttled.poll(&(), now) {
            if poll.is_fresh() {
                fresh += 1;
            }
        }
    }
    assert_eq!(mock.calls.get(), fresh);
    assert!(fresh >= 7 && fresh <= 9, "detector ran {} times in 500ms", fresh);
}

#[test]
fn test_throttle_returns_cache_between_runs() {
    let mock = MockDetector::returning(hand_result(0.2, 0.2, false));
    let mut throttled = ThrottledDetector::new(60.0);
    let ticket = throttled.mount();
    throttled.attach(ticket, mock.clone());

    assert!(throttled.poll(&(), 0.0).unwrap().is_fresh());
    let cached = throttled.poll(&(), 30.0).unwrap();
    assert!(!cached.is_fresh());
    assert_eq!(cached.result().landmarks.len(), 1);
    assert!(throttled.poll(&(), 61.0).unwrap().is_fresh());
    assert_eq!(mock.calls.get(), 2);
}

#[test]
fn test_no_detector_yields_nothing() {
    let mut throttled: ThrottledDetector<MockDetector> = ThrottledDetector::new(60.0);
    throttled.mount();
    assert!(throttled.poll(&(), 0.0).is_none());
    assert!(!throttled.is_ready());
}

#[test]
fn test_failure_returns_none_and_retries_next_interval() {
    let mock = MockDetector::returning(hand_result(0.5, 0.5, false));
    let mut throttled = ThrottledDetector::new(60.0);
    let ticket = throttled.mount();
    throttled.attach(ticket, mock.clone());

    mock.fail.set(true);
    assert!(throttled.poll(&(), 0.0).is_none());
    assert!(throttled.poll(&(), 10.0).is_none(), "nothing cached yet");
    assert_eq!(mock.calls.get(), 1, "retry must wait for the interval");

    mock.fail.set(false);
    assert!(throttled.poll(&(), 70.0).unwrap().is_fresh());
}

#[test]
fn test_attach_after_unmount_closes_handle() {
    let mut slot = DetectorSlot::new();
    assert!(!slot.is_mounted());
    let ticket = slot.mount();
    assert!(slot.is_mounted());
    slot.unmount();
    assert!(!slot.is_mounted());

    let late = MockDetector::default();
    assert!(!slot.attach(ticket, late.clone()));
    assert_eq!(late.closed.get(), 1);
    assert!(!slot.is_ready());
}

#[test]
fn test_stale_ticket_rejected_after_remount() {
    let mut slot = DetectorSlot::new();
    let old = slot.mount();
    let current = slot.mount();
    assert_ne!(old, current);

    let stale = MockDetector::default();
    assert!(!slot.attach(old, stale.clone()));
    assert_eq!(stale.closed.get(), 1);

    let live = MockDetector::default();
    assert!(slot.attach(current, live.clone()));
    assert_eq!(live.closed.get(), 0);
    assert!(slot.is_ready());
}

#[test]
fn test_forged_ticket_rejected() {
    let mut slot = DetectorSlot::new();
    let ticket = slot.mount();
    let forged = MountTicket::from_id(ticket.id() + 7);
    let mock = MockDetector::default();
    assert!(!slot.attach(forged, mock.clone()));
    assert_eq!(mock.closed.get(), 1);
}

#[test]
fn test_unmount_and_drop_release_handles() {
    let first = MockDetector::default();
    let second = MockDetector::default();
    {
        let mut slot = DetectorSlot::new();
        let ticket = slot.mount();
        slot.attach(ticket, first.clone());
        slot.unmount();
        assert_eq!(first.closed.get(), 1);

        let ticket = slot.mount();
        slot.attach(ticket, second.clone());
    }
    assert_eq!(second.closed.get(), 1, "drop must close the live handle");
    assert_eq!(first.closed.get(), 1, "handles are closed exactly once");
}

#[test]
fn test_adapter_updates_control_only_on_fresh_results() {
    let hand = MockDetector::returning(hand_result(0.25, 0.5, false));
    let face = MockDetector::returning(face_result(&[("jawOpen", 1.0), ("eyeLookUpLeft", 1.0)]));
    let mut adapter = PerceptionAdapter::new(PerceptionConfig::default(), 1000.0, 500.0);
    let ticket = adapter.mount();
    assert!(adapter.attach_hand(ticket, hand.clone()));
    assert!(adapter.attach_face(ticket, face.clone()));
    assert!(adapter.is_ready());

    adapter.poll(&(), 0.0);
    let after_first = adapter.control.cursor;
    assert!(adapter.control.hand_present);
    assert!((adapter.control.mouth_open - 0.3).abs() < 1e-6);
    assert!((adapter.control.gaze.offset.y - 60.0).abs() < 1e-4);

    // cached frame: no further smoothing
    adapter.poll(&(), 20.0);
    assert_eq!(adapter.control.cursor, after_first);
    assert!((adapter.control.mouth_open - 0.3).abs() < 1e-6);

    adapter.poll(&(), 80.0);
    assert_ne!(adapter.control.cursor, after_first);
    assert_eq!(adapter.control.last_detection_ms, Some(80.0));
}

#[test]
fn test_adapter_failure_keeps_previous_control() {
    let hand = MockDetector::returning(hand_result(0.1, 0.1, false));
    let face = MockDetector::default();
    let mut adapter = PerceptionAdapter::new(PerceptionConfig::default(), 800.0, 600.0);
    let ticket = adapter.mount();
    adapter.attach_hand(ticket, hand.clone());
    adapter.attach_face(ticket, face);

    adapter.poll(&(), 0.0);
    let control = adapter.control.clone();

    hand.fail.set(true);
    adapter.poll(&(), 100.0);
    assert_eq!(adapter.control.cursor, control.cursor);
    assert!(adapter.control.hand_present);
}

#[test]
fn test_fist_edge_through_adapter() {
    let hand = MockDetector::returning(hand_result(0.5, 0.5, false));
    let mut adapter = PerceptionAdapter::new(PerceptionConfig::default(), 800.0, 600.0);
    let ticket = adapter.mount();
    adapter.attach_hand(ticket, hand.clone());

    let script = [false, false, true, true, true, false, true];
    let mut pressed = Vec::new();
    for (i, &fist) in script.iter().enumerate() {
        *hand.result.borrow_mut() = hand_result(0.5, 0.5, fist);
        adapter.poll(&(), i as f64 * 100.0);
        if adapter.control.fist_pressed {
            pressed.push(i);
        }
    }
    assert_eq!(pressed, vec![2, 6]);
}

#[test]
fn test_mouse_fallback_only_without_hand() {
    let hand = MockDetector::returning(hand_result(0.5, 0.5, false));
    let mut adapter = PerceptionAdapter::new(PerceptionConfig::default(), 800.0, 600.0);
    assert!(adapter.pointer_moved(100.0, 100.0));

    let ticket = adapter.mount();
    adapter.attach_hand(ticket, hand.clone());
    adapter.poll(&(), 0.0);
    assert!(!adapter.pointer_moved(5.0, 5.0));

    *hand.result.borrow_mut() = Default::default();
    adapter.poll(&(), 100.0);
    assert!(!adapter.control.hand_present);
    assert!(adapter.pointer_moved(5.0, 5.0));
}
