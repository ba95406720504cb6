use std::fmt::Write;
use std::path::Path;

use atlas_core::types::ProjectState;

/// Edge labels longer than this are cut and suffixed with `..`.
const MAX_LABEL_CHARS: usize = 30;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let survey = super::open_survey(root)?;
    print!("{}", render_mermaid(survey.state()));
    Ok(())
}

// ── Mermaid ──────────────────────────────────────────────────────────

fn render_mermaid(state: &ProjectState) -> String {
    let mut out = String::new();
    writeln!(out, "```mermaid").unwrap();
    writeln!(out, "graph TD").unwrap();

    for name in state.systems.keys() {
        writeln!(out, "  {}[\"{name}\"]", sanitize_id(name)).unwrap();
    }

    for (name, system) in &state.systems {
        let source = sanitize_id(name);
        for dep in &system.dependencies {
            let target = sanitize_id(&dep.system);
            writeln!(out, "  {source} -->|{}| {target}", edge_label(&dep.reason)).unwrap();
        }
    }

    writeln!(out, "```").unwrap();
    out
}

/// Replace every non-word character with `_`.
fn sanitize_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn edge_label(reason: &str) -> String {
    if reason.chars().count() > MAX_LABEL_CHARS {
        let cut: String = reason.chars().take(MAX_LABEL_CHARS).collect();
        format!("{cut}..")
    } else {
        reason.to_string()
    }
}
