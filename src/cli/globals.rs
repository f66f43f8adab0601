use std::path::PathBuf;

pub const DEFAULT_STATE_FILE: &str = ".folio-state.json";

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub state_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(state_file: impl Into<PathBuf>) -> Self {
        Self {
            state_file: state_file.into(),
        }
    }
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}
