//! The message model and approval-key derivation (spec.md §3.6, §4.6).
//!
//! Every rule check returns `Vec<Message>`. A message's `approval_key` is a
//! UUIDv5 derived from a canonical S-expression-like encoding of the
//! violation's semantic identity — the entities involved, by uuid, never by
//! pointer or index — so a host can persist "this violation is approved"
//! across runs (spec.md §9, "Message approval identity").

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Path;
use crate::layer::Layer;

/// Fixed namespace every approval-key UUIDv5 is derived under. Never change
/// this — doing so would silently invalidate every host's persisted
/// approvals (mirrors the `maxArcTolerance` bit-compatibility constraint in
/// spec.md §9).
pub const NAMESPACE_DRC: Uuid = Uuid::from_bytes([
    0x6f, 0x1d, 0xe0, 0xd3, 0x6b, 0x0b, 0x4a, 0x2e, 0x9f, 0x3a, 0x2e, 0x7c, 0x8b, 0x1a, 0x9d, 0x4e,
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// The kind of board entity a message refers to, carrying only identity
/// fields (uuids, layer, net) rather than any pointer or index into the
/// snapshot that produced it — see spec.md §9, "Polymorphic object variants".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ObjectKind {
    Pad { pad: Uuid, device: Option<Uuid> },
    Via { via: Uuid },
    Trace { trace: Uuid },
    Plane { plane: Uuid },
    Polygon { polygon: Uuid },
    Circle { circle: Uuid },
    StrokeText { stroke_text: Uuid },
    Device { device: Uuid },
    Zone { zone: Uuid },
    Segment { segment: Uuid },
    Junction { junction: Uuid },
}

/// A reference to an object on a board, carrying the layer and net it was
/// found on at the time the check ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object {
    pub kind: ObjectKind,
    pub layer: Option<Layer>,
    pub net: Option<Uuid>,
}

/// A reference to a hole, which may belong to the board, a device, a pad, or
/// a via — kept separate from [`ObjectKind`] because holes are addressed
/// differently depending on owner (spec.md §3.3's `Hole`/`Pad`/`Via`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DrcHoleRef {
    Board { hole: Uuid },
    Device { device: Uuid, hole: Uuid },
    Pad { pad: Uuid, hole: Uuid },
    Via { via: Uuid },
}

/// One field of a message's canonical identity tree.
#[derive(Debug, Clone)]
pub struct IdentityField {
    pub name: &'static str,
    pub value: IdentityValue,
}

#[derive(Debug, Clone)]
pub enum IdentityValue {
    Uuid(Uuid),
    OptUuid(Option<Uuid>),
    Layer(Layer),
    Int(i64),
    Str(String),
}

impl IdentityValue {
    fn token(&self) -> String {
        match self {
            Self::Uuid(u) => u.to_string(),
            Self::OptUuid(Some(u)) => u.to_string(),
            Self::OptUuid(None) => "none".to_string(),
            Self::Layer(l) => match l {
                Layer::Copper { ordinal, stack_depth } => format!("copper:{ordinal}:{stack_depth}"),
                other => other.as_str().to_string(),
            },
            Self::Int(i) => i.to_string(),
            Self::Str(s) => format!("\"{s}\""),
        }
    }
}

/// Builds the canonical byte form `(violation_kind (field value) ...)` with
/// fields sorted by name, and derives the UUIDv5 `approval_key` from it
/// (spec.md §4.6, §6.3).
#[must_use]
pub fn approval_key(violation_kind: &str, mut fields: Vec<IdentityField>) -> Uuid {
    fields.sort_by(|a, b| a.name.cmp(b.name));
    let mut text = format!("({violation_kind}");
    for field in &fields {
        text.push_str(&format!(" ({} {})", field.name, field.value.token()));
    }
    text.push(')');
    Uuid::new_v5(&NAMESPACE_DRC, text.as_bytes())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    pub message: String,
    pub description: String,
    pub locations: Vec<Path>,
    pub approval_key: Uuid,
}

impl Message {
    #[must_use]
    pub fn new(
        violation_kind: &str,
        fields: Vec<IdentityField>,
        severity: Severity,
        message: impl Into<String>,
        description: impl Into<String>,
        locations: Vec<Path>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            description: description.into(),
            locations,
            approval_key: approval_key(violation_kind, fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(a: Uuid, b: Uuid) -> Vec<IdentityField> {
        vec![
            IdentityField { name: "b", value: IdentityValue::Uuid(b) },
            IdentityField { name: "a", value: IdentityValue::Uuid(a) },
        ]
    }

    #[test]
    fn same_fields_same_key_regardless_of_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let key1 = approval_key("copper_copper_clearance", fields(a, b));
        let key2 = approval_key(
            "copper_copper_clearance",
            vec![
                IdentityField { name: "a", value: IdentityValue::Uuid(a) },
                IdentityField { name: "b", value: IdentityValue::Uuid(b) },
            ],
        );
        assert_eq!(key1, key2);
    }

    #[test]
    fn different_fields_different_key() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let key1 = approval_key("copper_copper_clearance", fields(a, b));
        let key2 = approval_key("copper_copper_clearance", fields(b, a));
        assert_ne!(key1, key2);
    }

    #[test]
    fn different_violation_kind_different_key() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let key1 = approval_key("copper_copper_clearance", fields(a, b));
        let key2 = approval_key("copper_hole_clearance", fields(a, b));
        assert_ne!(key1, key2);
    }

    #[test]
    fn deterministic_across_calls() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let key1 = approval_key("x", fields(a, b));
        let key2 = approval_key("x", fields(a, b));
        assert_eq!(key1, key2);
    }
}
