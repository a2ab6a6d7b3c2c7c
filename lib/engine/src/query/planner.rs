use crate::query::{QueryAtom, QueryTerm};
use std::cmp::Reverse;

/// Computes a join order for `atoms`.
///
/// The planner greedily picks the atom with the most bound positions (constants or variables
/// bound by earlier atoms). Ties are broken by the number of variables the atom would newly bind
/// (fewer first) and then by the canonical position of the atom.
pub(super) fn plan(atoms: &[QueryAtom]) -> Vec<usize> {
    let mut bound = 0_u64;
    let mut remaining = (0..atoms.len()).collect::<Vec<_>>();
    let mut order = Vec::with_capacity(atoms.len());

    while !remaining.is_empty() {
        let Some((slot, _)) = remaining.iter().enumerate().max_by_key(|(_, index)| {
            let atom = &atoms[**index];
            (
                bound_positions(atom, bound),
                Reverse(new_variables(atom, bound)),
                Reverse(**index),
            )
        }) else {
            break;
        };
        let next = remaining.remove(slot);
        for var in atoms[next].variables() {
            bound |= 1 << var;
        }
        order.push(next);
    }

    order
}

fn is_bound(term: &QueryTerm, bound: u64) -> bool {
    match term {
        QueryTerm::Constant(_) => true,
        QueryTerm::Variable(var) => bound & (1 << var) != 0,
    }
}

fn bound_positions(atom: &QueryAtom, bound: u64) -> usize {
    usize::from(is_bound(&atom.subject, bound)) + usize::from(is_bound(&atom.object, bound))
}

fn new_variables(atom: &QueryAtom, bound: u64) -> usize {
    atom.variables()
        .filter(|var| bound & (1 << var) == 0)
        .count()
}
