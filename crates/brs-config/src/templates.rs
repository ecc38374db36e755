//! Configuration templates for `brs init`.
//!
//! The local template spells out every setting with its default value, so a fresh
//! `.brs.toml` behaves exactly like no config at all until it is edited. The global
//! template is written with its settings commented out: a global file should only
//! change behavior once the user opts in.

/// Local configuration template (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template (valid TOML).
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the contents written by `brs init`.
pub fn local_template() -> String {
    LOCAL_TEMPLATE.to_string()
}

/// Returns the contents written by `brs init --global`.
pub fn global_template() -> String {
    disable_settings(GLOBAL_TEMPLATE)
}

/// Comments out every setting and section header, keeping comments and blank lines.
fn disable_settings(template: &str) -> String {
    template
        .lines()
        .map(|line| match line.trim_start() {
            "" => String::new(),
            text if text.starts_with('#') => line.to_string(),
            _ => format!("# {line}"),
        })
        .map(|line| line + "\n")
        .collect()
}
