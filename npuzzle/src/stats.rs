use std::fmt;

/// Diagnostics counters maintained by the solver during search.
#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
pub struct SearchStats {
    /// Number of neighbor states ever admitted to the frontier.
    pub total_states: u64,
    /// Historical maximum of live states (frontier plus visited), sampled after each step.
    pub max_states: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} states opened, at most {} in memory", self.total_states, self.max_states)
    }
}
