//! Matching changed file paths against the indexed release graphs.
//!
//! A diff line matches a [`ValuesFileRef`] when the indexed file path ends
//! with the changed path. Suffix matching absorbs the prefix differences
//! between what the diff tool reports (paths relative to the repository
//! root) and what the renderer resolved (absolute or `./`-relative paths).
//!
//! Matches collapse into a set of distinct [`Change`] records. The set is
//! returned sorted so output never depends on hash iteration order.

use std::collections::HashSet;

use crate::graph::ReleaseGraph;

/// One affected release: "this release, in this environment, is touched by
/// the current diff".
///
/// `name` and `tenant` are optional to model environment-level matches, but
/// every change the matcher produces carries both. Equality is over all
/// three fields, and the derived ordering (environment, then name, then
/// tenant) is the output ordering within an environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Change {
    /// Environment the matched release lives in
    pub environment: String,
    /// Name of the matched release
    pub name: Option<String>,
    /// Tenant label of the matched release
    pub tenant: Option<String>,
}

impl Change {
    /// Render this change as one CLI selector token.
    ///
    /// Present fields become `key=value` pairs joined by commas inside a
    /// single-quoted `--selector` argument, e.g.
    /// `--selector 'name=checkout,tenant=core'`.
    pub fn render(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(name) = &self.name {
            pairs.push(format!("name={name}"));
        }
        if let Some(tenant) = &self.tenant {
            pairs.push(format!("tenant={tenant}"));
        }
        format!("--selector '{}'", pairs.join(","))
    }
}

/// Match changed file paths against every environment's release graph.
///
/// Each line is trimmed of surrounding whitespace; blank lines match
/// nothing. Duplicate lines and overlapping file references collapse to one
/// [`Change`] per distinct (environment, name, tenant) triple. The result is
/// sorted by that triple, so the same diff against the same graphs always
/// yields the same vector.
pub fn match_changed_paths<'a, I>(lines: I, graphs: &[ReleaseGraph]) -> Vec<Change>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();

    for line in lines {
        let changed = line.trim();
        if changed.is_empty() {
            continue;
        }

        for graph in graphs {
            for values_file in &graph.values_files {
                if values_file.file.ends_with(changed) {
                    seen.insert(Change {
                        environment: graph.environment.clone(),
                        name: Some(values_file.name.clone()),
                        tenant: Some(values_file.tenant.clone()),
                    });
                }
            }
        }
    }

    let mut changes: Vec<Change> = seen.into_iter().collect();
    changes.sort();

    tracing::debug!(target: "matcher", "Matched {} distinct changes", changes.len());

    changes
}
