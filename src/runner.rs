use crate::{Config, console::Console, scenario::Scenario, session::Connector};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub scenario: Scenario,
    pub passed: bool,
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        self.scenario.name()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub outcomes: Vec<Outcome>,
}

impl Summary {
    pub fn passed(&self, scenario: Scenario) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.scenario == scenario && outcome.passed)
    }

    pub fn all_passed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|outcome| outcome.passed)
    }
}

/// Runs scenarios one after another. A failing scenario never stops the
/// ones after it.
pub struct Runner<'a, C> {
    connector: &'a C,
    config: &'a Config,
    scenarios: Vec<Scenario>,
}

impl<'a, C: Connector> Runner<'a, C> {
    pub fn new(connector: &'a C, config: &'a Config) -> Self {
        Self {
            connector,
            config,
            scenarios: Scenario::ALL.to_vec(),
        }
    }

    pub fn with_scenarios(mut self, scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        self.scenarios = scenarios.into_iter().collect();
        self
    }

    pub async fn run<W: Write>(&self, console: &mut Console<W>) -> Summary {
        let mut summary = Summary::default();
        for &scenario in &self.scenarios {
            tracing::info!(scenario = scenario.name(), "running scenario");
            let passed = scenario.run(self.connector, self.config, console).await;
            tracing::info!(scenario = scenario.name(), passed, "scenario finished");
            summary.outcomes.push(Outcome { scenario, passed });
        }
        summary
    }
}
