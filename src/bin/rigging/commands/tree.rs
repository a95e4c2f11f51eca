//! `rigging tree` command

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use crate::cli::TreeArgs;
use rigging::core::Workspace;
use rigging::ops::compose_workspace;
use rigging::resolver::BuildGraph;
use rigging::util::GlobalContext;
use rigging::ProjectName;

pub fn execute(ctx: &GlobalContext, manifest_path: Option<&Path>, args: TreeArgs) -> Result<()> {
    if args.discovered {
        return list_discovered(ctx, manifest_path);
    }

    let (ws, composition) = compose_workspace(ctx, manifest_path)?;
    let graph = &composition.graph;

    println!("{}", ws.name());
    let mut seen = HashSet::new();
    for name in graph.top_level() {
        print_tree(
            graph,
            name,
            1,
            args.depth.unwrap_or(usize::MAX),
            &mut seen,
            args.duplicates,
        );
    }

    Ok(())
}

fn list_discovered(ctx: &GlobalContext, manifest_path: Option<&Path>) -> Result<()> {
    let manifest_path = ctx.manifest_path(manifest_path)?;
    let root = manifest_path.parent().unwrap_or(ctx.cwd());
    let config = ctx.load_config(root);
    let ws = Workspace::load(&manifest_path, config.build.target_dir)?;

    for name in ws.registry().names() {
        if let Some(entry) = ws.registry().get(name) {
            println!("{} [{} {}]", name, entry.target.kind, entry.target.name);
        }
    }
    Ok(())
}

fn print_tree(
    graph: &BuildGraph,
    name: &ProjectName,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<ProjectName>,
    show_duplicates: bool,
) {
    if depth > max_depth {
        return;
    }

    let is_duplicate = !seen.insert(name.clone());
    let prefix = format!("{}├── ", "│   ".repeat(depth - 1));
    let dup_marker = if is_duplicate && !show_duplicates {
        " (*)"
    } else {
        ""
    };

    let kind = graph
        .node(name.as_str())
        .map(|n| n.kind().to_string())
        .unwrap_or_default();
    println!("{}{} ({}){}", prefix, name, kind, dup_marker);

    if is_duplicate && !show_duplicates {
        return;
    }

    for dep in graph.deps(name.as_str()) {
        print_tree(graph, &dep, depth + 1, max_depth, seen, show_duplicates);
    }
}
