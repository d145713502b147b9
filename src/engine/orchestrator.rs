// src/engine/orchestrator.rs

use tracing::{error, info};

use crate::engine::lifecycle::BuildLifecycle;
use crate::types::Behaviour;

/// Front end that holds the active [`BuildLifecycle`] and maps a requested
/// [`Behaviour`] onto it.
#[derive(Debug, Default)]
pub struct Orchestrator {
    lifecycle: Option<BuildLifecycle>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(&mut self, lifecycle: BuildLifecycle) {
        self.lifecycle = Some(lifecycle);
    }

    pub fn lifecycle(&self) -> Option<&BuildLifecycle> {
        self.lifecycle.as_ref()
    }

    pub fn generate_solution(&mut self) -> bool {
        match self.lifecycle.as_mut() {
            Some(lifecycle) => lifecycle.generate(),
            None => {
                error!("no build lifecycle; call initialize first");
                false
            }
        }
    }

    pub fn build_solution(&mut self, config: &str) -> bool {
        match self.lifecycle.as_mut() {
            Some(lifecycle) => lifecycle.build(config),
            None => {
                error!("no build lifecycle; call initialize first");
                false
            }
        }
    }

    pub fn clean(&mut self) -> bool {
        match self.lifecycle.as_mut() {
            Some(lifecycle) => lifecycle.clean(),
            None => {
                error!("no build lifecycle; nothing to clean");
                false
            }
        }
    }

    /// Run `behaviour` and return whether it succeeded.
    pub fn perform(&mut self, behaviour: Behaviour) -> bool {
        info!(?behaviour, "performing");
        match behaviour {
            Behaviour::Generate => self.generate_solution(),
            Behaviour::BuildDebug => self.generate_solution() && self.build_solution("debug"),
            Behaviour::BuildRelease => {
                self.generate_solution() && self.build_solution("release")
            }
            Behaviour::Clean => self.clean(),
        }
    }
}
