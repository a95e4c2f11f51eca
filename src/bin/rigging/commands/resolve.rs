//! `rigging resolve` command

use std::path::Path;

use anyhow::Result;

use crate::cli::ResolveArgs;
use rigging::ops::compose_workspace;
use rigging::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest_path: Option<&Path>, args: ResolveArgs) -> Result<()> {
    let (ws, composition) = compose_workspace(ctx, manifest_path)?;
    let graph = &composition.graph;
    let brief = args.brief || ctx.load_config(ws.root()).build.brief();

    println!("root: {}", ws.name());
    println!("toolset: {}", composition.toolset.id);
    if composition.policy.is_overridden() {
        println!("policy: override-defined");
    } else {
        println!(
            "policy: {} (objects under {})",
            composition.policy.effective_runtime_mode(),
            ws.target_dir().display()
        );
    }
    println!("projects: {}", graph.len());

    if !brief {
        for name in graph.build_order() {
            let Some(node) = graph.node(name.as_str()) else {
                continue;
            };
            let incoming = graph.dependents(name.as_str()).len();
            println!(
                "  {} [{} {}] <- {} requirer(s)",
                name,
                node.kind(),
                node.target().name,
                incoming
            );
        }
    }

    if args.waves {
        for (i, wave) in graph.waves().iter().enumerate() {
            let names: Vec<_> = wave.iter().map(|n| n.as_str()).collect();
            println!("wave {}: {}", i, names.join(" "));
        }
    }

    Ok(())
}
