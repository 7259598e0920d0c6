//! Header-field bit-width resolution.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{RawHeader, RawHeaderType};
use serde_json::Value;
use std::collections::HashMap;

/// Field-width catalog built from the document's `headers` and
/// `header_types` sections.
///
/// Lookup is two-stage: header instance name to header type name, then a
/// scan of that type's field list. A miss at either stage means the
/// document is self-inconsistent and is fatal to the ingest.
#[derive(Debug, Default)]
pub(crate) struct HeaderCatalog {
    /// header instance name -> header type name
    instances: HashMap<String, String>,
    /// header type name -> ordered (field name, bit width)
    types: HashMap<String, Vec<(String, u32)>>,
}

impl HeaderCatalog {
    pub fn new(headers: &[RawHeader], header_types: &[RawHeaderType]) -> Self {
        let instances = headers
            .iter()
            .map(|h| (h.name.clone(), h.header_type.clone()))
            .collect();

        let mut types = HashMap::with_capacity(header_types.len());
        for ht in header_types {
            let mut fields = Vec::with_capacity(ht.fields.len());
            for decl in &ht.fields {
                // Positional [name, bitwidth] tuple; a trailing
                // signedness flag may follow, and varbit fields carry a
                // non-numeric width. Neither participates in key layout.
                let (Some(name), Some(width)) = (
                    decl.first().and_then(Value::as_str),
                    decl.get(1).and_then(Value::as_u64),
                ) else {
                    continue;
                };
                fields.push((name.to_string(), width as u32));
            }
            types.insert(ht.name.clone(), fields);
        }

        Self { instances, types }
    }

    /// Declared header type of a header instance.
    pub fn header_type(&self, header: &str) -> ConfigResult<&str> {
        self.instances
            .get(header)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::unknown_header(header))
    }

    /// Declared bit width of `field` on the header instance `header`.
    pub fn field_width(&self, header: &str, field: &str) -> ConfigResult<u32> {
        let header_type = self.header_type(header)?;
        self.types
            .get(header_type)
            .and_then(|fields| {
                fields
                    .iter()
                    .find(|(name, _)| name == field)
                    .map(|(_, width)| *width)
            })
            .ok_or_else(|| ConfigError::unknown_field(header_type, field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_catalog() -> HeaderCatalog {
        let headers: Vec<RawHeader> = serde_json::from_str(
            r#"[
                {"name": "ipv4", "header_type": "ipv4_t"},
                {"name": "ethernet", "header_type": "ethernet_t"}
            ]"#,
        )
        .unwrap();
        let header_types: Vec<RawHeaderType> = serde_json::from_str(
            r#"[
                {"name": "ipv4_t", "fields": [["ttl", 8], ["dstAddr", 32, false], ["options", "*"]]},
                {"name": "ethernet_t", "fields": [["dstAddr", 48], ["srcAddr", 48], ["etherType", 16]]}
            ]"#,
        )
        .unwrap();
        HeaderCatalog::new(&headers, &header_types)
    }

    #[test]
    fn test_field_width_two_stage_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.field_width("ipv4", "ttl").unwrap(), 8);
        assert_eq!(catalog.field_width("ipv4", "dstAddr").unwrap(), 32);
        assert_eq!(catalog.field_width("ethernet", "dstAddr").unwrap(), 48);
    }

    #[test]
    fn test_unknown_header_is_fatal() {
        let catalog = sample_catalog();
        let err = catalog.field_width("vlan", "vid").unwrap_err();
        assert_eq!(err.to_string(), "unknown header instance 'vlan'");
    }

    #[test]
    fn test_unknown_field_is_fatal() {
        let catalog = sample_catalog();
        let err = catalog.field_width("ipv4", "flags").unwrap_err();
        assert_eq!(err.to_string(), "header type 'ipv4_t' has no field 'flags'");
    }

    #[test]
    fn test_varbit_fields_are_skipped() {
        let catalog = sample_catalog();
        let err = catalog.field_width("ipv4", "options").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownField { .. }));
    }

    #[test]
    fn test_instance_to_type_mapping() {
        let catalog = sample_catalog();
        assert_eq!(catalog.header_type("ipv4").unwrap(), "ipv4_t");
    }
}
