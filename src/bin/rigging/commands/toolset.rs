//! `rigging toolset` command

use std::path::Path;

use anyhow::Result;

use crate::cli::ToolsetArgs;
use rigging::builder::options_for;
use rigging::core::{current_toolset, ToolsetProbe};
use rigging::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest_path: Option<&Path>, _args: ToolsetArgs) -> Result<()> {
    // The toolset does not depend on the workspace, only on its config.
    let root = ctx
        .manifest_path(manifest_path)
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let config = match &root {
        Some(root) => ctx.load_config(root),
        None => ctx.load_config(ctx.cwd()),
    };

    let toolset = current_toolset(&ToolsetProbe::from_env(config.toolset.name))?;
    let options = options_for(&toolset.id);

    println!("toolset: {}", toolset.id);
    println!("origin: {}", toolset.origin);
    if options.is_empty() {
        println!("global options: (none)");
    } else {
        println!("global options:");
        for option in options.iter() {
            println!("  {}", option.render(&toolset.id));
        }
    }

    Ok(())
}
