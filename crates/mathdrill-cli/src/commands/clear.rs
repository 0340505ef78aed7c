//! The `mathdrill clear` command: wipe the match history.

use std::path::Path;

use anyhow::Result;

use mathdrill_core::store::MatchStore;

pub fn execute(data_dir: &Path, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("this deletes all match history; pass --yes to confirm");
    }
    let store = MatchStore::open(super::matches_path(data_dir));
    store.clear()?;
    println!("Match history cleared.");
    Ok(())
}
