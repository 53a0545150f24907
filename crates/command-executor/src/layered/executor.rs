//! Layered executor implementation for runtime command composition.

use super::ExecutionLayer;
use crate::{Command, error::Result, launcher::Launcher, process::ExitResult};

/// Executor that applies a series of execution layers before launching commands
pub struct LayeredExecutor<L: Launcher> {
    /// The underlying launcher that will execute the final command
    launcher: L,
    /// Stack of execution layers to apply, innermost first
    layers: Vec<Box<dyn ExecutionLayer>>,
}

impl<L: Launcher> LayeredExecutor<L> {
    /// Create a new layered executor with the given launcher
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            layers: Vec::new(),
        }
    }

    /// Add an execution layer to the stack
    pub fn with_layer<Layer: ExecutionLayer + 'static>(mut self, layer: Layer) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Get the number of layers in the stack
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Get descriptions of all layers for debugging
    pub fn layer_descriptions(&self) -> Vec<String> {
        self.layers.iter().map(|layer| layer.description()).collect()
    }

    /// Apply every layer to `command` without running it
    pub fn wrap(&self, command: Command) -> Result<Command> {
        self.layers
            .iter()
            .try_fold(command, |cmd, layer| layer.wrap_command(cmd))
    }

    /// Execute a command by applying all layers and then launching
    pub async fn execute(&self, command: Command) -> Result<ExitResult> {
        let final_command = self.wrap(command)?;
        self.launcher.execute(final_command).await
    }

    /// Get a reference to the launcher
    pub fn launcher(&self) -> &L {
        &self.launcher
    }
}

impl<L: Launcher> std::fmt::Debug for LayeredExecutor<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredExecutor")
            .field("layers", &self.layer_descriptions())
            .finish()
    }
}
