use crate::cli::{
    actions::{chat, playground, resume, status, stories, Action},
    globals::GlobalArgs,
};
use anyhow::Result;

/// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Resume(args) => resume::execute(args, globals).await,
        Action::Stories { url } => stories::execute(url).await,
        Action::Chat => chat::execute().await,
        Action::Playground(request) => playground::execute(&request).await,
        Action::Status { watch } => status::execute(globals, watch).await,
    }
}
