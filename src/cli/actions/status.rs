use crate::{
    cli::globals::GlobalArgs,
    counters::{Counters, FileStore},
    shell::theme::{self, Theme},
};
use anyhow::Result;
use chrono::Utc;

/// Records a visit and prints the theme pill with the counters. With
/// `watch`, keeps printing the pill whenever the theme flips until Ctrl-C.
/// # Errors
/// Returns an error if the state file cannot be read or written.
pub async fn execute(globals: &GlobalArgs, watch: bool) -> Result<()> {
    let mut counters = Counters::new(FileStore::open(&globals.state_file)?);
    let views = counters.record_view()?;
    let current = Theme::at(Utc::now());

    println!("{}", current.pill_label());
    println!("Views: {views}");
    println!("Resume clicks: {}", counters.resume_clicks());
    println!(
        "Sidebar: {}",
        if counters.sidebar_collapsed() {
            "collapsed"
        } else {
            "expanded"
        }
    );

    if !watch {
        return Ok(());
    }

    let mut shown = current;
    let mut themes = theme::watch(Utc::now);
    loop {
        tokio::select! {
            next = themes.recv() => match next {
                Some(next) if next != shown => {
                    println!("{}", next.pill_label());
                    shown = next;
                }
                Some(_) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
