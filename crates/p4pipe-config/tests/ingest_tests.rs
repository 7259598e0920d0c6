//! Integration tests for the pipeline-configuration resolver.
//!
//! Drives the public API end to end with complete compiler-style
//! documents: ingestion, cross-linking, suffix resolution, reloads and
//! the reload-vs-query concurrency contract.

use p4pipe_config::{
    ArrayBacking, CrcWidth, PipelineConfig, QueryError, SharedPipelineConfig,
};
use p4pipe_types::{MatchKind, ResourceKind, TableKind};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;

/// A two-pipeline document exercising every section the resolver
/// consumes.
const FULL_DOC: &str = r#"{
    "header_types": [
        {"name": "ethernet_t",
         "fields": [["dstAddr", 48], ["srcAddr", 48], ["etherType", 16]]},
        {"name": "ipv4_t",
         "fields": [["ttl", 8], ["dstAddr", 32, false]]}
    ],
    "headers": [
        {"name": "ethernet", "header_type": "ethernet_t"},
        {"name": "ipv4", "header_type": "ipv4_t"}
    ],
    "actions": [
        {"name": "ingress.set_nhop", "id": 0,
         "runtime_data": [{"name": "nhop", "bitwidth": 32},
                          {"name": "port", "bitwidth": 9}]},
        {"name": "ingress.drop", "id": 1, "runtime_data": []},
        {"name": "egress.mark", "id": 2,
         "runtime_data": [{"name": "dscp", "bitwidth": 6}]}
    ],
    "pipelines": [
        {
            "name": "ingress",
            "action_profiles": [
                {"name": "ingress.ecmp_profile", "id": 7,
                 "selector": {"algo": "crc16", "input": []}}
            ],
            "tables": [
                {"name": "ingress.fwd", "id": 0,
                 "match_type": "lpm", "type": "simple",
                 "support_timeout": true,
                 "actions": ["ingress.set_nhop", "ingress.drop"],
                 "key": [{"match_type": "lpm",
                          "target": ["ipv4", "dstAddr"]},
                         {"match_type": "exact",
                          "target": ["ipv4", "$valid$"]}]},
                {"name": "ingress.ecmp", "id": 1,
                 "match_type": "exact", "type": "indirect_ws",
                 "support_timeout": false,
                 "actions": ["ingress.set_nhop"],
                 "key": [{"match_type": "exact",
                          "target": ["ethernet", "dstAddr"]}],
                 "action_profile": "ingress.ecmp_profile"}
            ]
        },
        {
            "name": "egress",
            "tables": [
                {"name": "egress.qos", "id": 2,
                 "match_type": "exact", "type": "simple",
                 "support_timeout": false,
                 "actions": ["egress.mark"],
                 "key": [{"match_type": "valid", "target": ["ipv4"]}]}
            ]
        }
    ],
    "meter_arrays": [
        {"name": "ingress.rate_limit", "id": 0, "type": "bytes",
         "rate_count": 2, "is_direct": true, "binding": "ingress.fwd"},
        {"name": "egress.policer", "id": 1, "type": "packets",
         "rate_count": 2, "size": 64}
    ],
    "counter_arrays": [
        {"name": "ingress.hits", "id": 0, "is_direct": true,
         "binding": "ingress.fwd"},
        {"name": "egress.drops", "id": 1, "is_direct": false, "size": 256}
    ],
    "register_arrays": [
        {"name": "egress.sketch", "id": 0, "bitwidth": 32, "size": 4096}
    ],
    "calculations": [
        {"name": "calc_ipv4", "algo": "csum16"},
        {"name": "calc_flow", "algo": "crc16_custom"},
        {"name": "calc_wide", "algo": "crc32_custom"}
    ]
}"#;

#[test]
fn full_name_round_trip_for_every_resource() {
    let cfg = PipelineConfig::from_json_str(FULL_DOC).unwrap();

    assert_eq!(cfg.table("ingress.fwd").unwrap().name, "ingress.fwd");
    assert_eq!(cfg.table("ingress.ecmp").unwrap().name, "ingress.ecmp");
    assert_eq!(cfg.table("egress.qos").unwrap().name, "egress.qos");
    assert_eq!(
        cfg.action_profile("ingress.ecmp_profile").unwrap().name,
        "ingress.ecmp_profile"
    );
    assert_eq!(cfg.action("ingress.set_nhop").unwrap().name, "ingress.set_nhop");
    assert_eq!(cfg.action("ingress.drop").unwrap().name, "ingress.drop");
    assert_eq!(cfg.action("egress.mark").unwrap().name, "egress.mark");
    assert_eq!(
        cfg.meter_array("ingress.rate_limit").unwrap().name,
        "ingress.rate_limit"
    );
    assert_eq!(cfg.counter_array("egress.drops").unwrap().name, "egress.drops");
    assert_eq!(
        cfg.register_array("egress.sketch").unwrap().name,
        "egress.sketch"
    );
}

#[test]
fn unique_suffixes_resolve_to_the_same_resource() {
    let cfg = PipelineConfig::from_json_str(FULL_DOC).unwrap();

    let by_suffix = cfg.table("fwd").unwrap();
    let by_full = cfg.table("ingress.fwd").unwrap();
    assert_eq!(by_suffix.name, by_full.name);
    assert_eq!(by_suffix.id, by_full.id);

    assert_eq!(cfg.meter_array("policer").unwrap().name, "egress.policer");
    assert_eq!(cfg.register_array("sketch").unwrap().name, "egress.sketch");
}

#[test]
fn table_attributes_are_cross_linked() {
    let cfg = PipelineConfig::from_json_str(FULL_DOC).unwrap();

    let fwd = cfg.table("fwd").unwrap();
    assert_eq!(fwd.match_kind, MatchKind::Lpm);
    assert_eq!(fwd.kind, TableKind::Simple);
    assert!(fwd.support_timeout);
    assert_eq!(fwd.actions, ["ingress.set_nhop", "ingress.drop"]);
    assert_eq!(fwd.action_profile, None);

    let ecmp = cfg.table("ecmp").unwrap();
    assert_eq!(ecmp.kind, TableKind::IndirectWithSelector);
    assert_eq!(ecmp.action_profile.as_deref(), Some("ingress.ecmp_profile"));

    let profile = cfg.action_profile("ecmp_profile").unwrap();
    assert!(profile.with_selection);
    assert_eq!(profile.id, 7);
    assert_eq!(profile.ref_count, 1);
    assert!(profile.has_action("ingress.set_nhop"));
    assert!(!profile.has_action("ingress.drop"));
}

#[test]
fn key_fields_resolve_widths_in_declaration_order() {
    let cfg = PipelineConfig::from_json_str(FULL_DOC).unwrap();

    let fwd = cfg.table("fwd").unwrap();
    assert_eq!(fwd.num_key_fields(), 2);

    assert_eq!(fwd.key[0].name, "ipv4.dstAddr");
    assert_eq!(fwd.key[0].match_kind, MatchKind::Lpm);
    assert_eq!(fwd.key[0].bit_width, 32);

    // $valid$ component: synthetic one-bit field, declared match kind
    // preserved.
    assert_eq!(fwd.key[1].name, "ipv4_valid");
    assert_eq!(fwd.key[1].match_kind, MatchKind::Exact);
    assert_eq!(fwd.key[1].bit_width, 1);

    // Valid match kind on a bare header target.
    let qos = cfg.table("qos").unwrap();
    assert_eq!(qos.key[0].name, "ipv4_valid");
    assert_eq!(qos.key[0].match_kind, MatchKind::Valid);
    assert_eq!(qos.key[0].bit_width, 1);
}

#[test]
fn meter_and_counter_backing_is_exclusive() {
    let cfg = PipelineConfig::from_json_str(FULL_DOC).unwrap();

    let direct = cfg.meter_array("rate_limit").unwrap();
    assert!(direct.backing.is_direct());
    assert_eq!(direct.backing.binding(), Some("ingress.fwd"));
    assert_eq!(direct.backing.size(), None);

    let indirect = cfg.meter_array("policer").unwrap();
    assert!(!indirect.backing.is_direct());
    assert_eq!(indirect.backing.binding(), None);
    assert_eq!(indirect.backing.size(), Some(64));

    let hits = cfg.counter_array("hits").unwrap();
    assert_eq!(
        hits.backing,
        ArrayBacking::Direct {
            table: "ingress.fwd".to_string()
        }
    );
    let drops = cfg.counter_array("drops").unwrap();
    assert_eq!(drops.backing, ArrayBacking::Indirect { size: 256 });
}

#[test]
fn only_custom_crc_calculations_are_retained() {
    let cfg = PipelineConfig::from_json_str(FULL_DOC).unwrap();
    let calcs = cfg.custom_crc_calcs();
    assert_eq!(
        calcs,
        [("calc_flow", CrcWidth::Crc16), ("calc_wide", CrcWidth::Crc32)]
    );
}

#[test]
fn ambiguous_suffix_is_not_found_while_full_names_resolve() {
    let doc = r#"{
        "register_arrays": [
            {"name": "ingress.x", "id": 0, "bitwidth": 8, "size": 16},
            {"name": "egress.x", "id": 1, "bitwidth": 8, "size": 16}
        ]
    }"#;
    let cfg = PipelineConfig::from_json_str(doc).unwrap();

    let err = cfg.register_array("x").unwrap_err();
    assert_eq!(err, QueryError::not_found(ResourceKind::RegisterArray, "x"));

    assert_eq!(cfg.register_array("ingress.x").unwrap().id, 0);
    assert_eq!(cfg.register_array("egress.x").unwrap().id, 1);
}

#[test]
fn suffix_collisions_are_scoped_per_kind() {
    let doc = r#"{
        "actions": [{"name": "ingress.stats", "id": 0, "runtime_data": []}],
        "register_arrays": [
            {"name": "egress.stats", "id": 0, "bitwidth": 32, "size": 8}
        ]
    }"#;
    let cfg = PipelineConfig::from_json_str(doc).unwrap();
    assert_eq!(cfg.action("stats").unwrap().name, "ingress.stats");
    assert_eq!(cfg.register_array("stats").unwrap().name, "egress.stats");
}

#[test]
fn implicit_profile_takes_table_name_and_id() {
    let doc = r#"{
        "actions": [{"name": "ingress.set_nhop", "id": 0, "runtime_data": []}],
        "pipelines": [{"tables": [
            {"name": "ingress.ecmp", "id": 11,
             "match_type": "exact", "type": "indirect",
             "support_timeout": false,
             "actions": ["ingress.set_nhop"],
             "key": []}
        ]}]
    }"#;
    let cfg = PipelineConfig::from_json_str(doc).unwrap();

    let profile = cfg.action_profile("ingress.ecmp").unwrap();
    assert_eq!(profile.name, "ingress.ecmp");
    assert_eq!(profile.id, 11);
    assert_eq!(profile.ref_count, 1);
    assert!(!profile.with_selection);
    assert!(profile.has_action("ingress.set_nhop"));

    let table = cfg.table("ecmp").unwrap();
    assert_eq!(table.action_profile.as_deref(), Some("ingress.ecmp"));
}

#[test]
fn legacy_act_prof_name_wins_over_table_name() {
    let doc = r#"{
        "actions": [{"name": "ingress.set_nhop", "id": 0, "runtime_data": []}],
        "pipelines": [{"tables": [
            {"name": "ingress.ecmp", "id": 3,
             "match_type": "exact", "type": "indirect_ws",
             "support_timeout": false,
             "actions": ["ingress.set_nhop"],
             "key": [],
             "act_prof_name": "ingress.ecmp_ap",
             "selector": {"algo": "crc16"}}
        ]}]
    }"#;
    let cfg = PipelineConfig::from_json_str(doc).unwrap();

    let profile = cfg.action_profile("ecmp_ap").unwrap();
    assert_eq!(profile.name, "ingress.ecmp_ap");
    assert_eq!(profile.id, 3);
    assert!(profile.with_selection);
    assert_eq!(profile.ref_count, 1);
}

#[test]
fn shared_profile_accumulates_references_and_actions() {
    let doc = r#"{
        "actions": [
            {"name": "ingress.a1", "id": 0, "runtime_data": []},
            {"name": "ingress.a2", "id": 1, "runtime_data": []}
        ],
        "pipelines": [{
            "action_profiles": [{"name": "ingress.shared", "id": 9}],
            "tables": [
                {"name": "ingress.t1", "id": 0,
                 "match_type": "exact", "type": "indirect",
                 "support_timeout": false,
                 "actions": ["ingress.a1"], "key": [],
                 "action_profile": "ingress.shared"},
                {"name": "ingress.t2", "id": 1,
                 "match_type": "exact", "type": "indirect",
                 "support_timeout": false,
                 "actions": ["ingress.a2"], "key": [],
                 "action_profile": "ingress.shared"}
            ]
        }]
    }"#;
    let cfg = PipelineConfig::from_json_str(doc).unwrap();

    let profile = cfg.action_profile("shared").unwrap();
    assert_eq!(profile.ref_count, 2);
    assert!(!profile.with_selection);
    assert!(profile.has_action("ingress.a1"));
    assert!(profile.has_action("ingress.a2"));

    // Scoped lookups respect each table's own action set.
    let t1 = cfg.table("t1").unwrap();
    assert!(cfg.table_action(t1, "a1").is_ok());
    assert!(cfg.table_action(t1, "a2").is_err());
    assert!(cfg.profile_action(profile, "a2").is_ok());
}

#[test]
fn end_to_end_minimal_document() {
    let doc = r#"{
        "header_types": [{"name": "T", "fields": [["f", 8]]}],
        "headers": [{"name": "h", "header_type": "T"}],
        "actions": [{"name": "noop", "id": 0, "runtime_data": []}],
        "pipelines": [{"tables": [
            {"name": "t1", "id": 0,
             "match_type": "exact", "type": "simple",
             "support_timeout": false,
             "actions": ["noop"],
             "key": [{"match_type": "exact", "target": ["h", "f"]}]}
        ]}]
    }"#;
    let cfg = PipelineConfig::from_json_str(doc).unwrap();

    let table = cfg.table("t1").unwrap();
    assert_eq!(table.key.len(), 1);
    assert_eq!(table.key[0].name, "h.f");
    assert_eq!(table.key[0].match_kind, MatchKind::Exact);
    assert_eq!(table.key[0].bit_width, 8);

    let action = cfg.action("noop").unwrap();
    assert_eq!(action.num_params(), 0);
}

#[test]
fn key_referencing_undeclared_header_fails_ingestion() {
    let doc = r#"{
        "header_types": [{"name": "T", "fields": [["f", 8]]}],
        "headers": [{"name": "h", "header_type": "T"}],
        "actions": [{"name": "noop", "id": 0, "runtime_data": []}],
        "pipelines": [{"tables": [
            {"name": "t1", "id": 0,
             "match_type": "exact", "type": "simple",
             "support_timeout": false,
             "actions": ["noop"],
             "key": [{"match_type": "exact", "target": ["ghost", "f"]}]}
        ]}]
    }"#;
    let err = PipelineConfig::from_json_str(doc).unwrap_err();
    assert_eq!(err.to_string(), "unknown header instance 'ghost'");
}

#[test]
fn reload_fully_replaces_prior_resources() {
    let shared = SharedPipelineConfig::new();
    shared.load_json_str(FULL_DOC).unwrap();
    assert!(shared.snapshot().unwrap().table("fwd").is_ok());

    let second = r#"{
        "actions": [{"name": "ingress.only", "id": 0, "runtime_data": []}]
    }"#;
    shared.load_json_str(second).unwrap();

    let cfg = shared.snapshot().unwrap();
    assert_eq!(
        cfg.table("fwd").unwrap_err(),
        QueryError::not_found(ResourceKind::Table, "fwd")
    );
    assert!(cfg.action("only").is_ok());
}

#[test]
fn documents_load_from_files_too() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL_DOC.as_bytes()).unwrap();
    file.flush().unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let shared = SharedPipelineConfig::new();
    shared.load_json_str(&text).unwrap();
    assert!(shared.snapshot().unwrap().table("fwd").is_ok());
}

#[test]
fn concurrent_queries_see_complete_configurations() {
    let shared = SharedPipelineConfig::new();
    shared.load_json_str(FULL_DOC).unwrap();
    let shared = Arc::new(shared);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let cfg = shared.snapshot().unwrap();
                    // Within one snapshot the registry is always
                    // complete: either the table resolves with all its
                    // cross-links, or the snapshot predates it entirely.
                    if let Ok(table) = cfg.table("ingress.ecmp") {
                        let profile_name = table.action_profile.as_deref().unwrap();
                        assert!(cfg.action_profile(profile_name).is_ok());
                    }
                }
            })
        })
        .collect();

    for _ in 0..20 {
        shared.load_json_str(FULL_DOC).unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
}
