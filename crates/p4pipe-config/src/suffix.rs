//! Suffix-based name disambiguation index.

use p4pipe_types::ResourceKind;
use std::collections::HashMap;

/// Maps (resource kind, dot-delimited name suffix) to the fully-qualified
/// resource name.
///
/// P4_16 object names are fully qualified and can get long, so unique
/// suffixes are accepted as identifiers wherever a resource name is
/// expected. A suffix claimed by more than one resource of the same kind
/// is deleted outright: ambiguous names are not resolvable at all, there
/// is no first-match fallback. Resources of different kinds never
/// collide, the kind is part of the key.
///
/// The index stores names, not resource references, so the registry
/// remains the sole owner of every entity.
#[derive(Debug, Default, Clone)]
pub struct SuffixIndex {
    map: HashMap<(ResourceKind, String), String>,
}

impl SuffixIndex {
    /// Builds the index over all (kind, fully-qualified-name) pairs of a
    /// freshly-populated registry.
    pub(crate) fn build<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = (ResourceKind, &'a str)>,
    {
        let mut map = HashMap::new();
        let mut claims: HashMap<(ResourceKind, String), u32> = HashMap::new();

        for (kind, name) in names {
            let mut suffix = String::new();
            for part in name.rsplit('.') {
                suffix = if suffix.is_empty() {
                    part.to_string()
                } else {
                    format!("{}.{}", part, suffix)
                };
                let key = (kind, suffix.clone());
                *claims.entry(key.clone()).or_insert(0) += 1;
                map.insert(key, name.to_string());
            }
        }

        for (key, count) in claims {
            if count > 1 {
                map.remove(&key);
            }
        }

        Self { map }
    }

    /// Fully-qualified name for a (kind, suffix) pair.
    ///
    /// `None` means the suffix never existed or was dropped for
    /// ambiguity; the two cases are indistinguishable on purpose.
    pub fn resolve(&self, kind: ResourceKind, suffix: &str) -> Option<&str> {
        self.map
            .get(&(kind, suffix.to_string()))
            .map(String::as_str)
    }

    /// Number of resolvable (kind, suffix) entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
