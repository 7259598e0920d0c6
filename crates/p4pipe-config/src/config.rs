//! The loaded pipeline configuration: resource registry and query facade.

use crate::error::{ConfigResult, QueryError, QueryResult};
use crate::ingest;
use crate::model::{
    Action, ActionProfile, CounterArray, CrcWidth, MeterArray, RegisterArray, Table,
};
use crate::suffix::SuffixIndex;
use p4pipe_types::ResourceKind;
use std::collections::HashMap;
use std::fmt;

/// A borrowed reference to any registered resource, kind-erased for
/// enumeration and display.
#[derive(Debug, Clone, Copy)]
pub enum ResourceRef<'a> {
    Table(&'a Table),
    ActionProfile(&'a ActionProfile),
    Action(&'a Action),
    MeterArray(&'a MeterArray),
    CounterArray(&'a CounterArray),
    RegisterArray(&'a RegisterArray),
}

impl<'a> ResourceRef<'a> {
    /// The referenced resource's kind.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::Table(_) => ResourceKind::Table,
            ResourceRef::ActionProfile(_) => ResourceKind::ActionProf,
            ResourceRef::Action(_) => ResourceKind::Action,
            ResourceRef::MeterArray(_) => ResourceKind::MeterArray,
            ResourceRef::CounterArray(_) => ResourceKind::CounterArray,
            ResourceRef::RegisterArray(_) => ResourceKind::RegisterArray,
        }
    }

    /// The referenced resource's fully-qualified name.
    pub fn name(&self) -> &'a str {
        match self {
            ResourceRef::Table(t) => &t.name,
            ResourceRef::ActionProfile(p) => &p.name,
            ResourceRef::Action(a) => &a.name,
            ResourceRef::MeterArray(m) => &m.name,
            ResourceRef::CounterArray(c) => &c.name,
            ResourceRef::RegisterArray(r) => &r.name,
        }
    }
}

impl fmt::Display for ResourceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Table(t) => t.fmt(f),
            ResourceRef::ActionProfile(p) => p.fmt(f),
            ResourceRef::Action(a) => a.fmt(f),
            ResourceRef::MeterArray(m) => m.fmt(f),
            ResourceRef::CounterArray(c) => c.fmt(f),
            ResourceRef::RegisterArray(r) => r.fmt(f),
        }
    }
}

/// One fully-loaded pipeline configuration.
///
/// Owns every resource parsed from a single compiler-emitted JSON
/// document, keyed by fully-qualified name, plus the suffix index built
/// over all of them. Rebuilt from scratch on every load and never
/// mutated afterwards; sharing is done by handing out snapshots (see
/// [`crate::SharedPipelineConfig`]).
#[derive(Debug, Default)]
pub struct PipelineConfig {
    pub(crate) tables: HashMap<String, Table>,
    pub(crate) action_profiles: HashMap<String, ActionProfile>,
    pub(crate) actions: HashMap<String, Action>,
    pub(crate) meter_arrays: HashMap<String, MeterArray>,
    pub(crate) counter_arrays: HashMap<String, CounterArray>,
    pub(crate) register_arrays: HashMap<String, RegisterArray>,
    pub(crate) custom_crcs: HashMap<String, CrcWidth>,
    pub(crate) suffixes: SuffixIndex,
}

impl PipelineConfig {
    /// Parses and cross-links a compiler-emitted pipeline JSON document.
    ///
    /// Returns a complete configuration or the first fatal error; there
    /// is no partially-built success state.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        ingest::load(text)
    }

    /// Resolves a suffix or fully-qualified name to the fully-qualified
    /// name of the matching resource.
    pub fn resolve(&self, kind: ResourceKind, name: &str) -> QueryResult<&str> {
        self.suffixes
            .resolve(kind, name)
            .ok_or_else(|| QueryError::not_found(kind, name))
    }

    /// Looks up any resource by kind and suffix.
    pub fn lookup(&self, kind: ResourceKind, name: &str) -> QueryResult<ResourceRef<'_>> {
        let full = self.resolve(kind, name)?;
        let resource = match kind {
            ResourceKind::Table => self.tables.get(full).map(ResourceRef::Table),
            ResourceKind::ActionProf => {
                self.action_profiles.get(full).map(ResourceRef::ActionProfile)
            }
            ResourceKind::Action => self.actions.get(full).map(ResourceRef::Action),
            ResourceKind::MeterArray => self.meter_arrays.get(full).map(ResourceRef::MeterArray),
            ResourceKind::CounterArray => {
                self.counter_arrays.get(full).map(ResourceRef::CounterArray)
            }
            ResourceKind::RegisterArray => {
                self.register_arrays.get(full).map(ResourceRef::RegisterArray)
            }
        };
        // Index entries always point at a registered resource; a miss
        // here can only mean the caller raced a stale snapshot, which
        // snapshots rule out.
        resource.ok_or_else(|| QueryError::not_found(kind, name))
    }

    /// Table by suffix or full name.
    pub fn table(&self, name: &str) -> QueryResult<&Table> {
        let full = self.resolve(ResourceKind::Table, name)?;
        self.tables
            .get(full)
            .ok_or_else(|| QueryError::not_found(ResourceKind::Table, name))
    }

    /// Action profile by suffix or full name.
    pub fn action_profile(&self, name: &str) -> QueryResult<&ActionProfile> {
        let full = self.resolve(ResourceKind::ActionProf, name)?;
        self.action_profiles
            .get(full)
            .ok_or_else(|| QueryError::not_found(ResourceKind::ActionProf, name))
    }

    /// Action by suffix or full name.
    pub fn action(&self, name: &str) -> QueryResult<&Action> {
        let full = self.resolve(ResourceKind::Action, name)?;
        self.actions
            .get(full)
            .ok_or_else(|| QueryError::not_found(ResourceKind::Action, name))
    }

    /// Meter array by suffix or full name.
    pub fn meter_array(&self, name: &str) -> QueryResult<&MeterArray> {
        let full = self.resolve(ResourceKind::MeterArray, name)?;
        self.meter_arrays
            .get(full)
            .ok_or_else(|| QueryError::not_found(ResourceKind::MeterArray, name))
    }

    /// Counter array by suffix or full name.
    pub fn counter_array(&self, name: &str) -> QueryResult<&CounterArray> {
        let full = self.resolve(ResourceKind::CounterArray, name)?;
        self.counter_arrays
            .get(full)
            .ok_or_else(|| QueryError::not_found(ResourceKind::CounterArray, name))
    }

    /// Register array by suffix or full name.
    pub fn register_array(&self, name: &str) -> QueryResult<&RegisterArray> {
        let full = self.resolve(ResourceKind::RegisterArray, name)?;
        self.register_arrays
            .get(full)
            .ok_or_else(|| QueryError::not_found(ResourceKind::RegisterArray, name))
    }

    /// Action resolvable through `table`'s declared action set.
    ///
    /// Suffix resolution first, then membership: an action that exists
    /// globally but is not usable from the table is reported as not
    /// found.
    pub fn table_action(&self, table: &Table, name: &str) -> QueryResult<&Action> {
        let action = self.action(name)?;
        if !table.has_action(&action.name) {
            return Err(QueryError::not_found(ResourceKind::Action, name));
        }
        Ok(action)
    }

    /// Action resolvable through `profile`'s merged action set.
    pub fn profile_action(&self, profile: &ActionProfile, name: &str) -> QueryResult<&Action> {
        let action = self.action(name)?;
        if !profile.has_action(&action.name) {
            return Err(QueryError::not_found(ResourceKind::Action, name));
        }
        Ok(action)
    }

    /// All tables, sorted by name for deterministic display.
    pub fn tables(&self) -> Vec<&Table> {
        sorted_by_name(self.tables.values(), |t| t.name.as_str())
    }

    /// All action profiles, sorted by name.
    pub fn action_profiles(&self) -> Vec<&ActionProfile> {
        sorted_by_name(self.action_profiles.values(), |p| p.name.as_str())
    }

    /// All actions, sorted by name.
    pub fn actions(&self) -> Vec<&Action> {
        sorted_by_name(self.actions.values(), |a| a.name.as_str())
    }

    /// All meter arrays, sorted by name.
    pub fn meter_arrays(&self) -> Vec<&MeterArray> {
        sorted_by_name(self.meter_arrays.values(), |m| m.name.as_str())
    }

    /// All counter arrays, sorted by name.
    pub fn counter_arrays(&self) -> Vec<&CounterArray> {
        sorted_by_name(self.counter_arrays.values(), |c| c.name.as_str())
    }

    /// All register arrays, sorted by name.
    pub fn register_arrays(&self) -> Vec<&RegisterArray> {
        sorted_by_name(self.register_arrays.values(), |r| r.name.as_str())
    }

    /// All resources of one kind, sorted by name.
    pub fn resources(&self, kind: ResourceKind) -> Vec<ResourceRef<'_>> {
        match kind {
            ResourceKind::Table => self.tables().into_iter().map(ResourceRef::Table).collect(),
            ResourceKind::ActionProf => self
                .action_profiles()
                .into_iter()
                .map(ResourceRef::ActionProfile)
                .collect(),
            ResourceKind::Action => {
                self.actions().into_iter().map(ResourceRef::Action).collect()
            }
            ResourceKind::MeterArray => self
                .meter_arrays()
                .into_iter()
                .map(ResourceRef::MeterArray)
                .collect(),
            ResourceKind::CounterArray => self
                .counter_arrays()
                .into_iter()
                .map(ResourceRef::CounterArray)
                .collect(),
            ResourceKind::RegisterArray => self
                .register_arrays()
                .into_iter()
                .map(ResourceRef::RegisterArray)
                .collect(),
        }
    }

    /// Custom CRC calculations as (name, width) pairs, sorted by name.
    pub fn custom_crc_calcs(&self) -> Vec<(&str, CrcWidth)> {
        let mut calcs: Vec<(&str, CrcWidth)> = self
            .custom_crcs
            .iter()
            .map(|(name, width)| (name.as_str(), *width))
            .collect();
        calcs.sort_by_key(|(name, _)| *name);
        calcs
    }

    /// The suffix index built over this configuration.
    pub fn suffix_index(&self) -> &SuffixIndex {
        &self.suffixes
    }
}

fn sorted_by_name<'a, T, F>(values: impl Iterator<Item = &'a T>, name: F) -> Vec<&'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut v: Vec<&T> = values.collect();
    v.sort_by(|a, b| name(*a).cmp(name(*b)));
    v
}
