pub mod chat;
pub mod playground;
pub mod resume;
pub mod status;
pub mod stories;

mod run;

use crate::{cli::globals::GlobalArgs, shell::playground::PlaygroundRequest};
use url::Url;

#[derive(Debug)]
pub enum Action {
    Resume(resume::Args),
    Stories { url: Url },
    Chat,
    Playground(PlaygroundRequest),
    Status { watch: bool },
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}
