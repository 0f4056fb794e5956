//! Configuration bootstrap command.

use breeze_config::Config;

/// Strategy for the Init command: write the config template.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, (): Self::Input) -> anyhow::Result<()> {
        Config::create_config()
    }
}
