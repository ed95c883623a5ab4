//! Carrier logo resolution.

use std::collections::BTreeMap;

use crate::icons::IconId;
use crate::presentation::CarrierCandidates;

/// Source of themed carrier logos.
pub trait CarrierIconLookup {
    /// Icon for `key`, or `None` when the theme has no such logo.
    fn lookup_carrier(&self, key: &str) -> Option<IconId>;
}

/// Logos configured under `[carrier_icons]`, keyed case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierIconTable {
    icons: BTreeMap<String, IconId>,
}

impl CarrierIconTable {
    pub fn insert(&mut self, key: &str, icon: IconId) {
        self.icons.insert(key.trim().to_lowercase(), icon);
    }

    pub fn get(&self, key: &str) -> Option<IconId> {
        self.icons.get(&key.trim().to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl CarrierIconLookup for CarrierIconTable {
    fn lookup_carrier(&self, key: &str) -> Option<IconId> {
        self.get(key).filter(|id| !id.is_none())
    }
}

/// Normalize a carrier name into a logo key: drop spaces and `-*@`, map
/// `.` and `&` to `_`, lower-case, and keep at most four characters.
/// Names shorter than three characters are kept whole.
pub fn filter_network_name(name: &str) -> String {
    let filtered: String = name
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '*' | '@'))
        .map(|c| if c == '.' || c == '&' { '_' } else { c })
        .collect();
    filtered.chars().take(4).collect::<String>().to_lowercase()
}

/// Remembers the last resolved logo so that a miss keeps it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarrierResolver {
    current: IconId,
}

impl CarrierResolver {
    pub fn current(&self) -> IconId {
        self.current
    }

    /// Try the numeric code first, then the normalized name.
    pub fn resolve(
        &mut self,
        candidates: &CarrierCandidates,
        lookup: &dyn CarrierIconLookup,
    ) -> IconId {
        let by_number = candidates
            .number
            .as_deref()
            .filter(|n| !n.is_empty())
            .and_then(|n| lookup.lookup_carrier(n));
        let found = by_number.or_else(|| {
            candidates
                .name
                .as_deref()
                .map(filter_network_name)
                .filter(|key| !key.is_empty())
                .and_then(|key| lookup.lookup_carrier(&key))
        });
        if let Some(icon) = found {
            self.current = icon;
        }
        self.current
    }
}
