//! `rigging plan` command

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::PlanArgs;
use rigging::ops::compose_workspace;
use rigging::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest_path: Option<&Path>, args: PlanArgs) -> Result<()> {
    let (ws, composition) = compose_workspace(ctx, manifest_path)?;
    let plan = composition.plan(ws.root())?;
    let json = plan.to_json()?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write build plan: {}", path.display()))?;
            tracing::info!("wrote build plan to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
