use itertools::Itertools;
use varisat::{Lit, Var};

// Pairwise CNF encodings; fine at the variable counts mini-game boards reach.

/// No two of `vars` are true: (!A + !B) * (!A + !C) * ...
pub(crate) fn at_most_one(vars: &[Var]) -> Vec<Vec<Lit>> {
    vars.iter()
        .tuple_combinations()
        .map(|(a, b)| vec![a.negative(), b.negative()])
        .collect_vec()
}

/// Exactly one of `vars` is true: pairwise exclusion plus one "at least one" clause.
pub(crate) fn exactly_one(vars: &[Var]) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::with_capacity(vars.len() * (vars.len() + 1) / 2 + 1);
    clauses.extend(at_most_one(vars));
    clauses.push(vars.iter().map(|v| v.positive()).collect_vec());
    clauses
}

/// `antecedent` being true forces at least one of `options`: !A + B + C + ...
pub(crate) fn implies_any(antecedent: Var, options: impl IntoIterator<Item = Var>) -> Vec<Lit> {
    let mut clause = vec![antecedent.negative()];
    clause.extend(options.into_iter().map(|v| v.positive()));
    clause
}
