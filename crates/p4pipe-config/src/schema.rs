//! Raw serde schema for the compiler-emitted pipeline JSON.
//!
//! These structs mirror the document shape only; cross-linking and
//! validation happen in the ingestor. Every top-level section defaults
//! to empty when absent, and unknown keys are ignored throughout; the
//! compiler emits far more than this crate consumes.

use serde::Deserialize;
use serde_json::Value;

/// The whole pipeline document, sections as emitted by the compiler.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub actions: Vec<RawAction>,
    #[serde(default)]
    pub pipelines: Vec<RawPipeline>,
    #[serde(default)]
    pub headers: Vec<RawHeader>,
    #[serde(default)]
    pub header_types: Vec<RawHeaderType>,
    #[serde(default)]
    pub meter_arrays: Vec<RawMeterArray>,
    #[serde(default)]
    pub counter_arrays: Vec<RawCounterArray>,
    #[serde(default)]
    pub register_arrays: Vec<RawRegisterArray>,
    #[serde(default)]
    pub calculations: Vec<RawCalculation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAction {
    pub name: String,
    pub id: u32,
    #[serde(default)]
    pub runtime_data: Vec<RawActionParam>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawActionParam {
    pub name: String,
    pub bitwidth: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPipeline {
    #[serde(default)]
    pub action_profiles: Vec<RawActionProfile>,
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawActionProfile {
    pub name: String,
    pub id: u32,
    /// Presence alone flags selector-based profiles; the selector body
    /// is not consumed here.
    #[serde(default)]
    pub selector: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTable {
    pub name: String,
    pub id: u32,
    pub match_type: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub support_timeout: bool,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub key: Vec<RawKey>,
    /// Explicit action-profile reference (current format).
    #[serde(default)]
    pub action_profile: Option<String>,
    /// Legacy inline profile name (pre-profile-section format).
    #[serde(default)]
    pub act_prof_name: Option<String>,
    /// Presence flags selector-based selection on the legacy path.
    #[serde(default)]
    pub selector: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawKey {
    pub match_type: String,
    pub target: RawKeyTarget,
}

/// Key target: the current form is a `[header, field]` path; the legacy
/// valid-match form is a bare header name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawKeyTarget {
    Path(Vec<String>),
    Header(String),
}

impl RawKeyTarget {
    /// The target's path components, regardless of source form.
    pub fn parts(&self) -> &[String] {
        match self {
            RawKeyTarget::Path(parts) => parts,
            RawKeyTarget::Header(name) => std::slice::from_ref(name),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHeader {
    pub name: String,
    pub header_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHeaderType {
    pub name: String,
    /// Positional `[name, bitwidth]` tuples, optionally with a trailing
    /// signedness flag.
    #[serde(default)]
    pub fields: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMeterArray {
    pub name: String,
    pub id: u32,
    #[serde(rename = "type")]
    pub unit: String,
    pub rate_count: u32,
    #[serde(default)]
    pub is_direct: bool,
    #[serde(default)]
    pub binding: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCounterArray {
    pub name: String,
    pub id: u32,
    pub is_direct: bool,
    #[serde(default)]
    pub binding: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRegisterArray {
    pub name: String,
    pub id: u32,
    pub bitwidth: u32,
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCalculation {
    pub name: String,
    pub algo: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absent_sections_default_empty() {
        let doc: RawDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.actions.is_empty());
        assert!(doc.pipelines.is_empty());
        assert!(doc.headers.is_empty());
        assert!(doc.meter_arrays.is_empty());
        assert!(doc.calculations.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let doc: RawDocument = serde_json::from_str(
            r#"{"__meta__": {"version": [2, 18]}, "enums": [], "actions": []}"#,
        )
        .unwrap();
        assert!(doc.actions.is_empty());
    }

    #[test]
    fn test_key_target_forms() {
        let path: RawKeyTarget = serde_json::from_str(r#"["ipv4", "dstAddr"]"#).unwrap();
        assert_eq!(path.parts(), ["ipv4".to_string(), "dstAddr".to_string()]);

        let bare: RawKeyTarget = serde_json::from_str(r#""ipv4""#).unwrap();
        assert_eq!(bare.parts(), ["ipv4".to_string()]);
    }

    #[test]
    fn test_table_optional_profile_keys() {
        let table: RawTable = serde_json::from_str(
            r#"{
                "name": "ingress.ecmp",
                "id": 2,
                "match_type": "exact",
                "type": "indirect_ws",
                "support_timeout": false,
                "actions": ["ingress.set_nhop"],
                "key": [],
                "selector": {"algo": "crc16"}
            }"#,
        )
        .unwrap();
        assert_eq!(table.action_profile, None);
        assert_eq!(table.act_prof_name, None);
        assert!(table.selector.is_some());
    }

    #[test]
    fn test_meter_is_direct_defaults_false() {
        let meter: RawMeterArray = serde_json::from_str(
            r#"{"name": "m", "id": 0, "type": "bytes", "rate_count": 2, "size": 16}"#,
        )
        .unwrap();
        assert!(!meter.is_direct);
        assert_eq!(meter.size, Some(16));
    }
}
