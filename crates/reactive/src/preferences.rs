//! UI preference state shared across screens
//!
//! `Preferences` is built once by the application and handed to every
//! consumer that needs it. Each field is an independent [`ReactiveVar`];
//! values are replaced wholesale.

use crate::var::ReactiveVar;

/// State of the box reconciliation overlay
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoxReconciliationOverlay {
    /// Whether the overlay is shown
    pub is_open: bool,
    /// Label of the box being reconciled
    pub label_identifier: Option<String>,
    /// Shipment the box arrived in
    pub shipment_id: Option<String>,
}

/// State of the QR reader overlay
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QrReaderOverlay {
    /// Whether the reader is shown
    pub is_open: bool,
    /// Scanning several boxes in one session
    pub is_multi_box: bool,
    /// Shipment scanned boxes are assigned to
    pub selected_shipment_id: Option<String>,
}

/// Cross-screen preference cells
#[derive(Debug, Clone)]
pub struct Preferences {
    /// Box reconciliation overlay
    pub box_reconciliation_overlay: ReactiveVar<BoxReconciliationOverlay>,
    /// QR reader overlay
    pub qr_reader_overlay: ReactiveVar<QrReaderOverlay>,
    /// Base the user is working in
    pub selected_base_id: ReactiveVar<Option<String>>,
}

impl Preferences {
    /// Create preferences with every value at its default
    pub fn new() -> Self {
        Self {
            box_reconciliation_overlay: ReactiveVar::new(
                "boxReconciliationOverlay",
                BoxReconciliationOverlay::default(),
            ),
            qr_reader_overlay: ReactiveVar::new("qrReaderOverlay", QrReaderOverlay::default()),
            selected_base_id: ReactiveVar::new("selectedBaseId", None),
        }
    }

    /// Open the reconciliation overlay for a box of a shipment
    pub fn open_box_reconciliation(
        &self,
        label_identifier: impl Into<String>,
        shipment_id: impl Into<String>,
    ) {
        self.box_reconciliation_overlay.set(BoxReconciliationOverlay {
            is_open: true,
            label_identifier: Some(label_identifier.into()),
            shipment_id: Some(shipment_id.into()),
        });
    }

    /// Close the reconciliation overlay
    pub fn close_box_reconciliation(&self) {
        self.box_reconciliation_overlay.reset();
    }

    /// Open the QR reader
    pub fn open_qr_reader(&self, is_multi_box: bool) {
        self.qr_reader_overlay.update(|current| QrReaderOverlay {
            is_open: true,
            is_multi_box,
            selected_shipment_id: current.selected_shipment_id.clone(),
        });
    }

    /// Close the QR reader, keeping the selected shipment
    pub fn close_qr_reader(&self) {
        self.qr_reader_overlay.update(|current| QrReaderOverlay {
            is_open: false,
            ..current.clone()
        });
    }

    /// Reset every value to its default
    pub fn reset_all(&self) {
        self.box_reconciliation_overlay.reset();
        self.qr_reader_overlay.reset();
        self.selected_base_id.reset();
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}
