//! Pipeline document ingestion.
//!
//! Converts the raw schema structs into the cross-linked resource model,
//! section by section, in dependency order: actions first, then per
//! pipeline the action profiles and tables, then the stateful arrays and
//! custom checksum calculations, and finally the suffix index over
//! everything registered. Each step may reference objects created by an
//! earlier step, never a later one.

use crate::config::PipelineConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::headers::HeaderCatalog;
use crate::model::{
    Action, ActionParam, ActionProfile, ArrayBacking, CounterArray, CrcWidth, KeyField,
    MeterArray, RegisterArray, Table,
};
use crate::schema::{RawDocument, RawKey, RawTable};
use crate::suffix::SuffixIndex;
use p4pipe_types::{MatchKind, ResourceKind, TableKind};
use std::collections::HashMap;
use tracing::{debug, warn};

pub(crate) fn load(text: &str) -> ConfigResult<PipelineConfig> {
    let doc: RawDocument = serde_json::from_str(text)?;
    let catalog = HeaderCatalog::new(&doc.headers, &doc.header_types);
    let mut cfg = PipelineConfig::default();

    for raw in &doc.actions {
        let action = Action {
            name: raw.name.clone(),
            id: raw.id,
            runtime_data: raw
                .runtime_data
                .iter()
                .map(|p| ActionParam {
                    name: p.name.clone(),
                    bit_width: p.bitwidth,
                })
                .collect(),
        };
        register(&mut cfg.actions, ResourceKind::Action, action.name.clone(), action);
    }

    // Tables and profiles from every pipeline land in the same global
    // registries.
    for pipeline in &doc.pipelines {
        for raw in &pipeline.action_profiles {
            let profile = ActionProfile::new(&raw.name, raw.id, raw.selector.is_some());
            register(
                &mut cfg.action_profiles,
                ResourceKind::ActionProf,
                profile.name.clone(),
                profile,
            );
        }

        for raw in &pipeline.tables {
            let table = build_table(raw, &catalog, &mut cfg)?;
            register(&mut cfg.tables, ResourceKind::Table, table.name.clone(), table);
        }
    }

    for raw in &doc.meter_arrays {
        let meter = MeterArray {
            name: raw.name.clone(),
            id: raw.id,
            unit: raw.unit.parse()?,
            backing: array_backing(
                ResourceKind::MeterArray,
                &raw.name,
                raw.is_direct,
                raw.binding.as_deref(),
                raw.size,
            )?,
            rate_count: raw.rate_count,
        };
        register(
            &mut cfg.meter_arrays,
            ResourceKind::MeterArray,
            meter.name.clone(),
            meter,
        );
    }

    for raw in &doc.counter_arrays {
        let counter = CounterArray {
            name: raw.name.clone(),
            id: raw.id,
            backing: array_backing(
                ResourceKind::CounterArray,
                &raw.name,
                raw.is_direct,
                raw.binding.as_deref(),
                raw.size,
            )?,
        };
        register(
            &mut cfg.counter_arrays,
            ResourceKind::CounterArray,
            counter.name.clone(),
            counter,
        );
    }

    for raw in &doc.register_arrays {
        let register_array = RegisterArray {
            name: raw.name.clone(),
            id: raw.id,
            bit_width: raw.bitwidth,
            size: raw.size,
        };
        register(
            &mut cfg.register_arrays,
            ResourceKind::RegisterArray,
            register_array.name.clone(),
            register_array,
        );
    }

    for raw in &doc.calculations {
        match CrcWidth::from_algo(&raw.algo) {
            Some(width) => {
                cfg.custom_crcs.insert(raw.name.clone(), width);
            }
            None => debug!(
                "ignoring calculation '{}' with non-custom algorithm '{}'",
                raw.name, raw.algo
            ),
        }
    }

    let suffixes = build_suffix_index(&cfg);
    cfg.suffixes = suffixes;

    debug!(
        tables = cfg.tables.len(),
        action_profiles = cfg.action_profiles.len(),
        actions = cfg.actions.len(),
        meter_arrays = cfg.meter_arrays.len(),
        counter_arrays = cfg.counter_arrays.len(),
        register_arrays = cfg.register_arrays.len(),
        suffixes = cfg.suffixes.len(),
        "pipeline configuration loaded"
    );

    Ok(cfg)
}

/// Registers `value` under `name`. Name collisions within one kind are
/// last-write-wins, kept from the reference toolchain's behavior but
/// made observable.
fn register<T>(map: &mut HashMap<String, T>, kind: ResourceKind, name: String, value: T) {
    if map.insert(name.clone(), value).is_some() {
        warn!("duplicate {} '{}', keeping the later definition", kind, name);
    }
}

fn build_table(
    raw: &RawTable,
    catalog: &HeaderCatalog,
    cfg: &mut PipelineConfig,
) -> ConfigResult<Table> {
    let match_kind: MatchKind = raw.match_type.parse()?;
    let kind: TableKind = raw.kind.parse()?;

    for action in &raw.actions {
        if !cfg.actions.contains_key(action) {
            return Err(ConfigError::unknown_action(&raw.name, action));
        }
    }

    let mut key = Vec::with_capacity(raw.key.len());
    for entry in &raw.key {
        key.push(resolve_key_field(&raw.name, entry, catalog)?);
    }

    let action_profile = if kind.is_indirect() {
        Some(bind_action_profile(raw, cfg)?)
    } else {
        None
    };

    Ok(Table {
        name: raw.name.clone(),
        id: raw.id,
        match_kind,
        kind,
        support_timeout: raw.support_timeout,
        actions: raw.actions.clone(),
        key,
        default_action: None,
        action_profile,
    })
}

/// Binds an indirect table to its action profile, synthesizing a
/// backward-compatible profile when the table declares none.
///
/// Precedence: an explicit `action_profile` reference must already be
/// registered from its pipeline's profile section. Otherwise a profile
/// is synthesized under the legacy `act_prof_name` (when present) or the
/// table's own name, reusing the table's id and the table-level selector
/// inference. The bound profile absorbs the table's action set and gains
/// one reference either way.
fn bind_action_profile(raw: &RawTable, cfg: &mut PipelineConfig) -> ConfigResult<String> {
    let name = match &raw.action_profile {
        Some(explicit) => {
            if !cfg.action_profiles.contains_key(explicit) {
                return Err(ConfigError::unknown_action_profile(&raw.name, explicit));
            }
            explicit.clone()
        }
        None => {
            let name = raw.act_prof_name.clone().unwrap_or_else(|| raw.name.clone());
            let profile = ActionProfile::new(&name, raw.id, raw.selector.is_some());
            register(
                &mut cfg.action_profiles,
                ResourceKind::ActionProf,
                name.clone(),
                profile,
            );
            name
        }
    };

    let profile = match cfg.action_profiles.get_mut(&name) {
        Some(profile) => profile,
        None => return Err(ConfigError::unknown_action_profile(&raw.name, &name)),
    };
    profile.actions.extend(raw.actions.iter().cloned());
    profile.ref_count += 1;
    Ok(name)
}

/// Resolves one key entry to its field name and width.
///
/// Validity matches never consult the header catalog: match kind `valid`
/// on a target, or a `$valid$` field component, produces the synthetic
/// one-bit `<header>_valid` field regardless of header-type contents.
fn resolve_key_field(
    table: &str,
    entry: &RawKey,
    catalog: &HeaderCatalog,
) -> ConfigResult<KeyField> {
    let match_kind: MatchKind = entry.match_type.parse()?;
    let parts = entry.target.parts();

    let Some(header) = parts.first() else {
        return Err(ConfigError::key_target(table, "empty target"));
    };

    if match_kind == MatchKind::Valid || parts.get(1).map(String::as_str) == Some("$valid$") {
        return Ok(KeyField {
            name: format!("{}_valid", header),
            match_kind,
            bit_width: 1,
        });
    }

    let Some(field) = parts.get(1) else {
        return Err(ConfigError::key_target(
            table,
            format!("expected [header, field], got '{}'", parts.join(".")),
        ));
    };

    Ok(KeyField {
        name: parts.join("."),
        match_kind,
        bit_width: catalog.field_width(header, field)?,
    })
}

/// Direct arrays must carry a binding table, indirect ones a size.
/// The sum type cannot represent both at once.
fn array_backing(
    kind: ResourceKind,
    name: &str,
    is_direct: bool,
    binding: Option<&str>,
    size: Option<u64>,
) -> ConfigResult<ArrayBacking> {
    if is_direct {
        match binding {
            Some(table) => Ok(ArrayBacking::Direct {
                table: table.to_string(),
            }),
            None => Err(ConfigError::MissingBinding {
                kind,
                name: name.to_string(),
            }),
        }
    } else {
        match size {
            Some(size) => Ok(ArrayBacking::Indirect { size }),
            None => Err(ConfigError::MissingSize {
                kind,
                name: name.to_string(),
            }),
        }
    }
}

fn build_suffix_index(cfg: &PipelineConfig) -> SuffixIndex {
    let mut names: Vec<(ResourceKind, &str)> = Vec::new();
    names.extend(cfg.tables.keys().map(|n| (ResourceKind::Table, n.as_str())));
    names.extend(
        cfg.action_profiles
            .keys()
            .map(|n| (ResourceKind::ActionProf, n.as_str())),
    );
    names.extend(cfg.actions.keys().map(|n| (ResourceKind::Action, n.as_str())));
    names.extend(
        cfg.meter_arrays
            .keys()
            .map(|n| (ResourceKind::MeterArray, n.as_str())),
    );
    names.extend(
        cfg.counter_arrays
            .keys()
            .map(|n| (ResourceKind::CounterArray, n.as_str())),
    );
    names.extend(
        cfg.register_arrays
            .keys()
            .map(|n| (ResourceKind::RegisterArray, n.as_str())),
    );
    SuffixIndex::build(names)
}
