//! The override engine: merges overrides and schema defaults into one
//! resolved configuration
//!
//! Candidates for each option are ranked by priority; the highest tier wins,
//! and unequal values inside that tier are a conflict. Schema defaults join
//! the merge at their declared priority but never conflict with a real
//! override of the same tier: a default only wins when it stands alone.
//! Guards and value thunks are evaluated in dependency order over the option
//! paths they read, so a guarded default can inspect sibling values that were
//! themselves just resolved.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};

use crate::path::OptionPath;
use crate::schema::{OptionSet, TypeSpec};
use crate::value::Value;

use super::config::ResolvedConfig;
use super::error::ResolutionError;
use super::overrides::{Guard, Override, OverrideValue, Priority, ResolvedView};

/// Merge `overrides` against `set` into a configuration tagged with `kind`.
///
/// Aborts on the first error; no partial configuration escapes. Resolution is
/// pure and deterministic: identical inputs give identical output.
pub fn resolve(
    set: &OptionSet,
    overrides: &[Override],
    kind: &str,
) -> Result<ResolvedConfig, ResolutionError> {
    debug!(
        "resolving {} override(s) against `{}` ({} options)",
        overrides.len(),
        kind,
        set.len()
    );
    let values = resolve_set(set, overrides, &OptionPath::root())?;
    Ok(ResolvedConfig::new(kind, values))
}

struct Candidate {
    value: OverrideValue,
    priority: Priority,
    guard: Option<Guard>,
    /// Synthesized from the option's schema default
    from_default: bool,
}

fn resolve_set(
    set: &OptionSet,
    overrides: &[Override],
    prefix: &OptionPath,
) -> Result<BTreeMap<String, Value>, ResolutionError> {
    // Step 1: group candidates by option name
    let mut candidates: BTreeMap<String, Vec<Candidate>> = BTreeMap::new();
    for ovr in overrides {
        let name = match ovr.path().head() {
            Some(head) if ovr.path().segments().len() == 1 => head,
            _ => {
                return Err(ResolutionError::UnknownOption {
                    path: prefix.join(ovr.path()),
                })
            }
        };
        if !set.contains(name) {
            return Err(ResolutionError::UnknownOption {
                path: prefix.join(ovr.path()),
            });
        }
        candidates.entry(name.to_string()).or_default().push(Candidate {
            value: ovr.value.clone(),
            priority: ovr.priority,
            guard: ovr.guard.clone(),
            from_default: false,
        });
    }

    // Schema defaults join the merge at their declared priority
    for decl in set.iter() {
        if let Some(default) = decl.default() {
            candidates
                .entry(decl.name().to_string())
                .or_default()
                .push(Candidate {
                    value: OverrideValue::Literal(default.clone()),
                    priority: decl.default_priority(),
                    guard: None,
                    from_default: true,
                });
        }
    }

    let order = dependency_order(set, &candidates, prefix)?;

    let mut resolved: BTreeMap<String, Value> = BTreeMap::new();
    for name in order {
        let Some(decl) = set.get(&name) else { continue };
        let full_path = prefix.child(&name);
        let all = candidates.get(&name).map(Vec::as_slice).unwrap_or(&[]);

        // Step 2: drop candidates whose guard evaluates false
        let view = ResolvedView::new(&resolved);
        let active: Vec<&Candidate> = all
            .iter()
            .filter(|cand| match &cand.guard {
                Some(guard) => {
                    let keep = (guard.predicate)(&view);
                    if !keep {
                        trace!("guard on `{}` is inactive", full_path);
                    }
                    keep
                }
                None => true,
            })
            .collect();

        // Steps 3-4: highest priority wins; a lone schema default is the
        // fallback, but it is shadowed by any real override in its tier
        let Some(top) = active.iter().map(|c| c.priority).max() else {
            return Err(ResolutionError::MissingRequiredOption { path: full_path });
        };
        let tier: Vec<&Candidate> = active.iter().filter(|c| c.priority == top).copied().collect();
        let winners: Vec<&Candidate> = if tier.iter().any(|c| !c.from_default) {
            tier.into_iter().filter(|c| !c.from_default).collect()
        } else {
            tier
        };

        let mut evaluated = winners.iter().map(|cand| match &cand.value {
            OverrideValue::Literal(v) => v.clone(),
            OverrideValue::Computed { compute, .. } => compute(&view),
        });
        // winners is non-empty: the tier came from at least one candidate
        let Some(value) = evaluated.next() else {
            return Err(ResolutionError::MissingRequiredOption { path: full_path });
        };
        for other in evaluated {
            if other != value {
                return Err(ResolutionError::ConflictingOverrides {
                    path: full_path,
                    priority: top,
                });
            }
        }
        drop(view);

        // Step 5: recurse into nested option sets
        let filled = fill_nested(decl.spec(), value, &full_path, top)?;
        resolved.insert(name, filled);
    }

    // Step 6: validate every resolved leaf against its declared type
    for decl in set.iter() {
        if let Some(value) = resolved.get(decl.name()) {
            decl.spec().validate(value, &prefix.child(decl.name()))?;
        }
    }

    Ok(resolved)
}

/// Topological order of option names over guard/thunk dependencies.
///
/// Names with no dependencies come out in lexicographic order, which keeps
/// error surfacing deterministic. A cycle, or a dependency on a path that
/// names no declared option, is an `UnresolvableGuard`.
fn dependency_order(
    set: &OptionSet,
    candidates: &BTreeMap<String, Vec<Candidate>>,
    prefix: &OptionPath,
) -> Result<Vec<String>, ResolutionError> {
    let mut deps: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for decl in set.iter() {
        deps.insert(decl.name(), BTreeSet::new());
    }
    for (name, cands) in candidates {
        let entry = deps.entry(name.as_str()).or_default();
        for cand in cands {
            let mut read_paths: Vec<&OptionPath> = Vec::new();
            if let Some(guard) = &cand.guard {
                read_paths.extend(guard.depends_on.iter());
            }
            if let OverrideValue::Computed { depends_on, .. } = &cand.value {
                read_paths.extend(depends_on.iter());
            }
            for path in read_paths {
                let head = path.head().filter(|h| set.contains(h)).ok_or_else(|| {
                    ResolutionError::UnresolvableGuard {
                        path: prefix.child(name),
                    }
                })?;
                entry.insert(head);
            }
        }
    }

    let mut indegree: BTreeMap<&str, usize> = deps.keys().map(|k| (*k, 0)).collect();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (&name, dep_set) in &deps {
        for &dep in dep_set {
            dependents.entry(dep).or_default().push(name);
            *indegree.entry(name).or_default() += 1;
        }
    }

    let mut ready: BTreeSet<&str> = indegree
        .iter()
        .filter(|(_, n)| **n == 0)
        .map(|(k, _)| *k)
        .collect();
    let mut order = Vec::with_capacity(deps.len());
    while let Some(&next) = ready.iter().next() {
        ready.remove(next);
        order.push(next.to_string());
        if let Some(children) = dependents.get(next) {
            for &child in children {
                let n = indegree.entry(child).or_default();
                *n -= 1;
                if *n == 0 {
                    ready.insert(child);
                }
            }
        }
    }

    if order.len() != deps.len() {
        // Deterministic report: the lexicographically first name in a cycle
        let stuck = indegree
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(k, _)| *k)
            .next()
            .unwrap_or_default();
        return Err(ResolutionError::UnresolvableGuard {
            path: prefix.child(stuck),
        });
    }
    Ok(order)
}

/// Recurse into nested option sets, seeding each sub-map's entries as
/// overrides at the parent candidate's priority.
///
/// Values that do not have the shape the spec expects are passed through
/// untouched; the post-pass type validation reports the mismatch with the
/// proper expected/got pair.
fn fill_nested(
    spec: &TypeSpec,
    value: Value,
    path: &OptionPath,
    priority: Priority,
) -> Result<Value, ResolutionError> {
    match spec {
        TypeSpec::OptionSetOf(sub) => {
            let map = match value {
                Value::Attrs(map) => map,
                other => return Ok(other),
            };
            let seed: Vec<Override> = map
                .into_iter()
                .map(|(k, v)| Override::literal(OptionPath::root().child(k), v, priority))
                .collect();
            let values = resolve_set(sub, &seed, path)?;
            Ok(Value::Attrs(values))
        }
        TypeSpec::AttrsOf(inner) => {
            let map = match value {
                Value::Attrs(map) => map,
                other => return Ok(other),
            };
            let mut filled = BTreeMap::new();
            for (key, item) in map {
                let item = fill_nested(inner, item, &path.child(&key), priority)?;
                filled.insert(key, item);
            }
            Ok(Value::Attrs(filled))
        }
        TypeSpec::ListOf(inner) => {
            let items = match value {
                Value::List(items) => items,
                other => return Ok(other),
            };
            let mut filled = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                filled.push(fill_nested(inner, item, &path.child(i.to_string()), priority)?);
            }
            Ok(Value::List(filled))
        }
        TypeSpec::NullableOf(inner) => {
            if value.is_null() {
                Ok(value)
            } else {
                fill_nested(inner, value, path, priority)
            }
        }
        TypeSpec::EitherOf(left, right) => {
            if left.validate(&value, path).is_ok() {
                fill_nested(left, value, path, priority)
            } else if right.validate(&value, path).is_ok() {
                fill_nested(right, value, path, priority)
            } else {
                Ok(value)
            }
        }
        _ => Ok(value),
    }
}
