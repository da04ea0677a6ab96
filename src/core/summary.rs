use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Float;

/// A struct that holds the results of a [`PSO`](crate::algorithms::particles::PSO) run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PSOSummary {
    /// The names of the parameters. This is `None` if no names were set.
    pub parameter_names: Option<Vec<String>>,
    /// A message describing why the run stopped.
    pub message: String,
    /// The best position found during the run.
    pub x: Vec<Float>,
    /// The value of the objective function at [`PSOSummary::x`].
    pub fx: Float,
    /// The index of the particle which found [`PSOSummary::x`].
    pub best_particle: usize,
    /// The lower wall of the search box in the last iteration.
    pub x_min: Float,
    /// The upper wall of the search box in the last iteration.
    pub x_max: Float,
    /// The number of objective evaluations spent moving particles.
    pub cost_evals: usize,
    /// The number of objective evaluations spent initializing the swarm (not counted against
    /// the evaluation budget).
    pub init_evals: usize,
    /// The evaluation count at which the stop criterion was first met, if it was met.
    pub criteria_evals: Option<usize>,
    /// The number of completed iterations.
    pub iterations: usize,
    /// Flag that says whether or not the stop criterion was met.
    pub converged: bool,
}

impl PSOSummary {
    /// Set the names associated with each parameter.
    pub fn with_parameter_names<I, S>(mut self, parameter_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parameter_names = Some(
            parameter_names
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
        );
        self
    }
}

impl Display for PSOSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "╒══════════════════════════════════════════════════════════════════════════╕"
        )?;
        writeln!(f, "│{:^74}│", "SWARM RESULTS")?;
        writeln!(
            f,
            "╞════════════════════════════════════╤═════════════════════════════════════╡"
        )?;
        writeln!(
            f,
            "│ Status: {:<26} │ f(x): {:<+29.5E} │",
            if self.converged {
                "Converged"
            } else {
                "Criterion not met"
            },
            self.fx
        )?;
        writeln!(
            f,
            "│ #f(x): {:<27} │ #f(x) at criterion: {:<15} │",
            self.cost_evals,
            self.criteria_evals
                .map_or_else(|| "-".to_string(), |n| n.to_string())
        )?;
        writeln!(
            f,
            "│ Iterations: {:<22} │ Best particle: {:<20} │",
            self.iterations, self.best_particle
        )?;
        writeln!(
            f,
            "├────────────────────────────────────┴─────────────────────────────────────┤"
        )?;
        writeln!(f, "│ Message: {:<63} │", self.message)?;
        writeln!(
            f,
            "├────────────┬────────────────────────┬──────────────────────┬─────────────┤"
        )?;
        writeln!(
            f,
            "│ Parameter  │ Value                  │ Bounds               │ At Limit?   │"
        )?;
        writeln!(
            f,
            "├────────────┼────────────────────────┼──────────────────────┼─────────────┤"
        )?;
        for (i, xi) in self.x.iter().enumerate() {
            let name = self
                .parameter_names
                .as_ref()
                .and_then(|names| names.get(i).cloned())
                .unwrap_or_else(|| format!("x_{}", i));
            let at_limit = *xi <= self.x_min || *xi >= self.x_max;
            writeln!(
                f,
                "│ {:<10} │ {:<+22.8E} │ [{:>+8.2E}, {:>+8.2E}] │ {:<11} │",
                name,
                xi,
                self.x_min,
                self.x_max,
                if at_limit { "Yes" } else { "No" }
            )?;
        }
        write!(
            f,
            "└────────────┴────────────────────────┴──────────────────────┴─────────────┘"
        )
    }
}
