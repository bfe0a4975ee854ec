use crate::print_json;
use artiscope_api::{ArtifactClassLoader, ClassLoader, ResourceLocator};
use artiscope_jar::inspect_class;
use artiscope_runtime::IsolatedArtifact;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct ClassView<'a> {
    name: &'a str,
    artifact_id: &'a str,
    defining_loader: String,
    source: &'a ResourceLocator,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

pub fn load_class(
    artifact: &IsolatedArtifact,
    name: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let class = artifact.loader().load_class(name)?;
    let kind = match inspect_class(&class) {
        Ok(kind) => Some(kind.to_string()),
        Err(e) => {
            debug!("Could not inspect {}: {}", name, e);
            None
        }
    };

    let view = ClassView {
        name: &class.name,
        artifact_id: &class.artifact_id,
        defining_loader: format!("{:x}", class.defining_loader),
        source: &class.source,
        size: class.bytes.len(),
        kind,
    };

    if json {
        return print_json(&view);
    }

    println!("{} {}", view.kind.as_deref().unwrap_or("class"), view.name);
    println!("  Artifact: {}", view.artifact_id);
    println!("  Loader:   {}", view.defining_loader);
    println!("  Source:   {}", view.source);
    println!("  Size:     {} bytes", view.size);
    Ok(())
}

pub fn resource(
    artifact: &IsolatedArtifact,
    name: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    print_locators(name, artifact.loader().get_resource(name).into_iter().collect(), json)
}

pub fn resources(
    artifact: &IsolatedArtifact,
    name: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    print_locators(name, artifact.loader().get_resources(name)?, json)
}

pub fn find_resource(
    artifact: &IsolatedArtifact,
    name: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    print_locators(name, artifact.loader().find_resource(name).into_iter().collect(), json)
}

fn print_locators(
    name: &str,
    locators: Vec<ResourceLocator>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        return print_json(&locators);
    }

    if locators.is_empty() {
        println!("No visible resource named '{}'.", name);
    }
    for locator in &locators {
        println!("{}", locator);
    }
    Ok(())
}
