//! Action plan files
//!
//! The inbound planner boundary: an ordered list of actions, serialized as
//! YAML (or JSON, which the YAML parser accepts).

use std::path::Path;

use anyhow::Context;

use webpilot_core_types::Action;

/// Load an ordered action plan from disk
pub fn load_plan(path: &Path) -> anyhow::Result<Vec<Action>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading plan file {}", path.display()))?;
    let actions: Vec<Action> = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing plan file {}", path.display()))?;
    if actions.is_empty() {
        anyhow::bail!("plan file {} contains no actions", path.display());
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml_plan() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "- action: navigate\n  url: https://www.amazon.in\n- action: type\n  selector: \"#twotabsearchtextbox\"\n  text: laptop\n  submit: true\n- action: extract\n  schema:\n    fields:\n      - name: name\n        selector: h2\n      - name: price\n        selector: .a-price\n  limit: 5\n"
        )
        .unwrap();
        let actions = load_plan(file.path()).unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[2].kind(), "extract");
    }

    #[test]
    fn test_empty_plan_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(load_plan(file.path()).is_err());
    }

    #[test]
    fn test_json_plan_parses_too() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"action": "wait_for", "selector": ".results", "timeout_ms": 2000}}]"#
        )
        .unwrap();
        let actions = load_plan(file.path()).unwrap();
        assert_eq!(actions[0].kind(), "wait_for");
    }
}
