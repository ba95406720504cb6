use std::path::Path;

/// Label a repository by its marker files. Informational only.
pub fn detect_project_type(root: &Path) -> &'static str {
    let has = |name: &str| root.join(name).exists();

    if has("manage.py") || has("wsgi.py") {
        return "Django Web Application";
    }
    if has("app.py") && has("requirements.txt") {
        return "Flask Web Application";
    }
    if has("package.json") {
        return if uses_express(&root.join("package.json")) {
            "Node.js/Express Application"
        } else {
            "Node.js Application"
        };
    }
    if has("Cargo.toml") {
        return "Rust Project";
    }
    if has("go.mod") {
        return "Go Project";
    }
    if has("setup.py") || has("pyproject.toml") {
        return "Python Package/Library";
    }
    if has("Dockerfile") {
        return "Containerized Application";
    }
    "Unknown"
}

fn uses_express(package_json: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(package_json) else {
        return false;
    };
    serde_json::from_str::<serde_json::Value>(&content)
        .ok()
        .and_then(|json| json.get("dependencies").cloned())
        .and_then(|deps| deps.get("express").cloned())
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect_with(files: &[(&str, &str)]) -> &'static str {
        let tmp = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(tmp.path().join(name), content).unwrap();
        }
        detect_project_type(tmp.path())
    }

    #[test]
    fn detects_by_marker() {
        assert_eq!(detect_with(&[("Cargo.toml", "")]), "Rust Project");
        assert_eq!(detect_with(&[("go.mod", "")]), "Go Project");
        assert_eq!(detect_with(&[("setup.py", "")]), "Python Package/Library");
        assert_eq!(detect_with(&[("Dockerfile", "")]), "Containerized Application");
        assert_eq!(detect_with(&[("manage.py", "")]), "Django Web Application");
        assert_eq!(detect_with(&[]), "Unknown");
    }

    #[test]
    fn flask_needs_both_markers() {
        assert_eq!(
            detect_with(&[("app.py", ""), ("requirements.txt", "")]),
            "Flask Web Application"
        );
        assert_eq!(detect_with(&[("app.py", "")]), "Unknown");
    }

    #[test]
    fn express_from_dependencies() {
        assert_eq!(
            detect_with(&[("package.json", r#"{"dependencies": {"express": "^4"}}"#)]),
            "Node.js/Express Application"
        );
        assert_eq!(
            detect_with(&[("package.json", "not json")]),
            "Node.js Application"
        );
    }

    #[test]
    fn django_wins_over_rust() {
        assert_eq!(
            detect_with(&[("Cargo.toml", ""), ("wsgi.py", "")]),
            "Django Web Application"
        );
    }
}
