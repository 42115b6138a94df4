//! Variable resolution - schema defaults overlaid by caller values

use super::value::VariableSet;

/// Merge `supplied` over `defaults`.
///
/// Every key present in `supplied` wins, even when its value is empty, `false`,
/// `0` or `null`. Keys unknown to the schema are carried through unchanged.
pub fn resolve(defaults: &VariableSet, supplied: &VariableSet) -> VariableSet {
    let mut merged = VariableSet::new();

    for (name, value) in defaults {
        merged.insert(name.clone(), value.clone());
    }
    for (name, value) in supplied {
        merged.insert(name.clone(), value.clone());
    }

    merged
}
