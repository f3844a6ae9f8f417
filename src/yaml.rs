//! YAML chain parser.

use crate::chain::Chain;
use crate::step::RequestKind;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Parse a chain from a YAML string.
///
/// # Example
///
/// ```rust
/// use api_chain::parse_yaml;
///
/// let yaml = r#"
/// name: post-and-comments
/// steps:
///   - kind: get
///     url: https://jsonplaceholder.typicode.com/posts/1
///   - kind: get_comments
///     related_id: "1"
/// "#;
///
/// let chain = parse_yaml(yaml).unwrap();
/// assert_eq!(chain.name, "post-and-comments");
/// assert_eq!(chain.len(), 2);
/// ```
pub fn parse_yaml(yaml: &str) -> Result<Chain> {
    let chain: Chain = serde_yaml::from_str(yaml).context("Failed to parse chain YAML")?;
    validate(&chain)?;
    Ok(chain)
}

/// Load a chain from a YAML file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Chain> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read chain file: {}", path.display()))?;
    parse_yaml(&contents)
}

/// Validate chain shape beyond what deserialization enforces.
///
/// An empty step list is legal; the executor treats it as an immediate
/// completion.
fn validate(chain: &Chain) -> Result<()> {
    if chain.name.is_empty() {
        bail!("Chain name cannot be empty");
    }

    for (index, step) in chain.steps.iter().enumerate() {
        match &step.request {
            RequestKind::Get { url } | RequestKind::Post { url, .. } => {
                if url.is_empty() {
                    bail!("Step {} has an empty url", index);
                }
            }
            RequestKind::GetComments { related_id } => {
                if related_id.is_empty() {
                    bail!("Step {} has an empty related_id", index);
                }
            }
        }
    }

    Ok(())
}
