//! Constraint satisfaction by chronological backtracking.
//!
//! Every assignment attempt, accepted or not, is recorded as a [`CspStep`]
//! so the search can be replayed with a [`StepPlayer`].

use crate::error::{Result, SearchError};
use crate::player::StepPlayer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub domain: Vec<String>,
}

impl Variable {
    pub fn new(name: &str, domain: &[&str]) -> Self {
        Variable {
            name: name.to_string(),
            domain: domain.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Binary constraint `a != b`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotEqual {
    pub a: String,
    pub b: String,
}

impl NotEqual {
    pub fn new(a: &str, b: &str) -> Self {
        NotEqual {
            a: a.to_string(),
            b: b.to_string(),
        }
    }
}

impl fmt::Display for NotEqual {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ≠ {}", self.a, self.b)
    }
}

pub type Assignment = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CspStep {
    pub index: usize,
    /// Assignments including the value being tried
    pub assignments: Assignment,
    pub variable: String,
    pub value: String,
    pub consistent: bool,
    /// Constraints broken by this value
    pub violated: Vec<String>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CspTrace {
    pub steps: Vec<CspStep>,
    pub solution: Option<Assignment>,
}

impl CspTrace {
    pub fn player(&self) -> Result<StepPlayer<'_, CspStep>> {
        StepPlayer::new(&self.steps)
    }
}

#[derive(Debug, Clone)]
pub struct Csp {
    variables: Vec<Variable>,
    constraints: Vec<NotEqual>,
    // (a, b) variable indices, parallel to `constraints`
    arcs: Vec<(usize, usize)>,
}

impl Csp {
    /// Variables are assigned in the order given
    pub fn new(variables: Vec<Variable>, constraints: Vec<NotEqual>) -> Result<Self> {
        let mut seen = HashSet::new();
        for v in &variables {
            if !seen.insert(v.name.as_str()) {
                return Err(SearchError::InvalidProblem(format!("duplicate variable {}", v.name)));
            }
        }
        let index_of = |name: &str| {
            variables
                .iter()
                .position(|v| v.name == name)
                .ok_or_else(|| SearchError::InvalidProblem(format!("unknown variable {}", name)))
        };
        let arcs = constraints
            .iter()
            .map(|c| Ok((index_of(&c.a)?, index_of(&c.b)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Csp {
            variables,
            constraints,
            arcs,
        })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[NotEqual] {
        &self.constraints
    }

    /// Backtracking search, optionally pruning future domains after each assignment
    pub fn solve(&self, forward_checking: bool) -> CspTrace {
        let domains: Vec<Vec<String>> = self.variables.iter().map(|v| v.domain.clone()).collect();
        let mut values: Vec<Option<String>> = vec![None; self.variables.len()];
        let mut steps = Vec::new();
        let solved = self.backtrack(0, &mut values, &domains, forward_checking, &mut steps);
        debug!(
            "CSP with {} variables {} after {} attempts",
            self.variables.len(),
            if solved { "solved" } else { "has no solution" },
            steps.len()
        );
        CspTrace {
            solution: solved.then(|| self.assignment(&values)),
            steps,
        }
    }

    fn assignment(&self, values: &[Option<String>]) -> Assignment {
        self.variables
            .iter()
            .zip(values)
            .filter_map(|(var, value)| value.clone().map(|v| (var.name.clone(), v)))
            .collect()
    }

    fn backtrack(
        &self,
        depth: usize,
        values: &mut Vec<Option<String>>,
        domains: &[Vec<String>],
        forward_checking: bool,
        steps: &mut Vec<CspStep>,
    ) -> bool {
        if depth == self.variables.len() {
            return true;
        }
        let name = &self.variables[depth].name;

        for value in &domains[depth] {
            values[depth] = Some(value.clone());

            let mut checked = Vec::new();
            let mut violated = Vec::new();
            for (c, &(a, b)) in self.constraints.iter().zip(&self.arcs) {
                if a != depth && b != depth {
                    continue;
                }
                match (&values[a], &values[b]) {
                    (Some(x), Some(y)) if x == y => violated.push(c.to_string()),
                    (Some(_), Some(_)) => checked.push(c.to_string()),
                    _ => {}
                }
            }

            let mut pruned = None;
            let mut wiped_out = None;
            if violated.is_empty() && forward_checking {
                let next = self.prune(depth, value, domains);
                wiped_out = (depth + 1..self.variables.len()).find(|&j| next[j].is_empty());
                pruned = Some(next);
            }

            let consistent = violated.is_empty() && wiped_out.is_none();
            let explanation = if !violated.is_empty() {
                format!("Try {} = {} (violates {})", name, value, violated.join(", "))
            } else if let Some(j) = wiped_out {
                format!("Try {} = {} (leaves no value for {})", name, value, self.variables[j].name)
            } else if depth + 1 == self.variables.len() {
                format!("Assign {} = {} (all constraints satisfied)", name, value)
            } else if checked.is_empty() {
                format!("Assign {} = {}", name, value)
            } else {
                format!("Assign {} = {} ({} satisfied)", name, value, checked.join(", "))
            };
            trace!("{}", explanation);

            steps.push(CspStep {
                index: steps.len(),
                assignments: self.assignment(values),
                variable: name.clone(),
                value: value.clone(),
                consistent,
                violated,
                explanation,
            });

            if consistent {
                let next = pruned.unwrap_or_else(|| domains.to_vec());
                if self.backtrack(depth + 1, values, &next, forward_checking, steps) {
                    return true;
                }
            }
            values[depth] = None;
        }
        false
    }

    /// Remove `value` from the domains of later variables constrained against `depth`
    fn prune(&self, depth: usize, value: &str, domains: &[Vec<String>]) -> Vec<Vec<String>> {
        let mut next = domains.to_vec();
        for &(a, b) in &self.arcs {
            let other = match (a == depth, b == depth) {
                (true, false) => b,
                (false, true) => a,
                _ => continue,
            };
            if other > depth {
                next[other].retain(|v| v != value);
            }
        }
        next
    }
}

/// Three regions A, B, C over Red, Green, Blue, pairwise different
pub fn map_coloring() -> Csp {
    let colors = ["Red", "Green", "Blue"];
    Csp {
        variables: vec![
            Variable::new("A", &colors),
            Variable::new("B", &colors),
            Variable::new("C", &colors),
        ],
        constraints: vec![NotEqual::new("A", "B"), NotEqual::new("B", "C"), NotEqual::new("A", "C")],
        arcs: vec![(0, 1), (1, 2), (0, 2)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_coloring_backtracking() {
        let trace = map_coloring().solve(false);
        let explanations: Vec<&str> = trace.steps.iter().map(|s| s.explanation.as_str()).collect();
        assert_eq!(
            explanations,
            vec![
                "Assign A = Red",
                "Try B = Red (violates A ≠ B)",
                "Assign B = Green (A ≠ B satisfied)",
                "Try C = Red (violates A ≠ C)",
                "Try C = Green (violates B ≠ C)",
                "Assign C = Blue (all constraints satisfied)",
            ]
        );
        let solution = trace.solution.unwrap();
        assert_eq!(solution["A"], "Red");
        assert_eq!(solution["B"], "Green");
        assert_eq!(solution["C"], "Blue");
    }

    #[test]
    fn test_rejected_value_is_visible_in_step() {
        let trace = map_coloring().solve(false);
        let step = &trace.steps[1];
        assert!(!step.consistent);
        assert_eq!(step.assignments["B"], "Red");
        assert_eq!(step.violated, vec!["A ≠ B".to_string()]);
        // and withdrawn on the next attempt
        assert_eq!(trace.steps[2].assignments["B"], "Green");
    }

    #[test]
    fn test_forward_checking_skips_dead_values() {
        let trace = map_coloring().solve(true);
        assert_eq!(trace.steps.len(), 3);
        assert!(trace.steps.iter().all(|s| s.consistent));
        assert_eq!(trace.solution, map_coloring().solve(false).solution);
    }

    #[test]
    fn test_unsatisfiable() {
        // Two colors, three mutually adjacent regions
        let colors = ["Red", "Green"];
        let csp = Csp::new(
            vec![Variable::new("A", &colors), Variable::new("B", &colors), Variable::new("C", &colors)],
            vec![NotEqual::new("A", "B"), NotEqual::new("B", "C"), NotEqual::new("A", "C")],
        )
        .unwrap();
        for fc in [false, true] {
            let trace = csp.solve(fc);
            assert!(trace.solution.is_none());
            assert!(!trace.steps.is_empty());
        }
        // forward checking notices the wipe-out one level earlier
        assert!(csp.solve(true).steps.len() < csp.solve(false).steps.len());
    }

    #[test]
    fn test_unknown_variable_in_constraint() {
        let result = Csp::new(vec![Variable::new("A", &["x"])], vec![NotEqual::new("A", "Z")]);
        assert!(matches!(result, Err(SearchError::InvalidProblem(_))));
    }
}
