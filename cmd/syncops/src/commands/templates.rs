//! Templates command implementation.

use anyhow::{Context, Result};
use lifecycle_policy::{templates, to_yaml};

/// Runs the templates command.
pub fn run(id: Option<&str>) -> Result<()> {
    let library = templates();

    let Some(id) = id else {
        for template in &library {
            println!(
                "{:<30} priority {:>4}  {}",
                template.id, template.policy.priority, template.summary
            );
        }
        return Ok(());
    };

    let template = library
        .into_iter()
        .find(|t| t.id == id)
        .with_context(|| format!("Unknown template: {id}"))?;
    print!("{}", to_yaml(std::slice::from_ref(&template.policy))?);
    Ok(())
}
