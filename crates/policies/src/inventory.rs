//! Policies for the inventory and distribution schema
//!
//! | Type / field | Policy |
//! |--------------|--------|
//! | `Box` | keyed by `labelIdentifier` |
//! | `QrCode` | keyed by `code` |
//! | dimension info types | keyed by `id` + `name` |
//! | `Query.boxes` | scoped by `baseId`, paginated over `elements` |
//! | `Query.box` | redirect to `Box` by `labelIdentifier` |
//! | `Query.qrCode` | redirect to `QrCode` by `code` |
//! | `Query.scannedBoxes` | client-only, starts empty |

use crate::field::{FieldPolicy, KeyArgs, MergeStrategy, ReadStrategy};
use crate::keys::KeyStrategy;
use crate::local::LocalField;
use crate::registry::{TypePolicies, QUERY_TYPE};

/// Type name of inventory boxes
pub const BOX_TYPE: &str = "Box";

/// Type name of printed QR codes
pub const QR_CODE_TYPE: &str = "QrCode";

/// Client-only list of boxes scanned in this session
pub const SCANNED_BOXES_FIELD: &str = "scannedBoxes";

/// Statistics reference types whose ids are only unique together with their name
pub const DIMENSION_TYPES: &[&str] = &[
    "DimensionInfo",
    "ProductDimensionInfo",
    "TagDimensionInfo",
    "LocationDimensionInfo",
    "SizeDimensionInfo",
    "TargetDimensionInfo",
];

/// Policy set used by the inventory client
pub fn inventory_policies() -> TypePolicies {
    let mut policies = TypePolicies::new()
        .key(BOX_TYPE, KeyStrategy::fields(["labelIdentifier"]))
        .key(QR_CODE_TYPE, KeyStrategy::fields(["code"]));

    for typename in DIMENSION_TYPES {
        policies = policies.key(*typename, KeyStrategy::fields(["id", "name"]));
    }

    policies
        .field(
            QUERY_TYPE,
            "boxes",
            FieldPolicy::new()
                .key_args(KeyArgs::only(["baseId"]))
                .merge(MergeStrategy::paginated("elements")),
        )
        .field(
            QUERY_TYPE,
            "box",
            FieldPolicy::new().read(ReadStrategy::to_reference(BOX_TYPE, ["labelIdentifier"])),
        )
        .field(
            QUERY_TYPE,
            "qrCode",
            FieldPolicy::new().read(ReadStrategy::to_reference(QR_CODE_TYPE, ["code"])),
        )
        .local_field(LocalField::empty_list(SCANNED_BOXES_FIELD))
}
