//! Reactive UI preferences

use crate::test_utils::*;
use boxcache::{BoxReconciliationOverlay, QrReaderOverlay};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn subscribers_see_new_value_before_set_returns() {
    let session = session();
    let prefs = session.preferences();
    let seen: Arc<Mutex<Option<BoxReconciliationOverlay>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    prefs
        .box_reconciliation_overlay
        .subscribe(move |v: &BoxReconciliationOverlay| *sink.lock() = Some(v.clone()));

    prefs.open_box_reconciliation("L100", "12");
    let seen = seen.lock().clone().unwrap();
    assert!(seen.is_open);
    assert_eq!(seen.label_identifier.as_deref(), Some("L100"));
    assert_eq!(seen.shipment_id.as_deref(), Some("12"));
}

#[test]
fn unsubscribe_stops_delivery() {
    let session = session();
    let prefs = session.preferences();
    let hits = Arc::new(Mutex::new(0u32));
    let sink = Arc::clone(&hits);
    let sub = prefs
        .qr_reader_overlay
        .subscribe(move |_: &QrReaderOverlay| *sink.lock() += 1);

    prefs.open_qr_reader(false);
    assert!(sub.unsubscribe());
    prefs.close_qr_reader();
    assert_eq!(*hits.lock(), 1);
}

#[test]
fn injected_clones_share_state() {
    let session = session();
    let for_screen = session.clone();
    for_screen
        .preferences()
        .selected_base_id
        .set(Some("5".to_string()));
    assert_eq!(
        session.preferences().selected_base_id.get().as_deref(),
        Some("5")
    );
}

#[test]
fn whole_value_read_modify_write() {
    let session = session();
    let overlay = &session.preferences().qr_reader_overlay;
    overlay.update(|current| QrReaderOverlay {
        selected_shipment_id: Some("9".into()),
        ..current.clone()
    });
    overlay.update(|current| QrReaderOverlay {
        is_open: true,
        ..current.clone()
    });
    let state = overlay.get();
    assert!(state.is_open);
    assert_eq!(state.selected_shipment_id.as_deref(), Some("9"));
}
