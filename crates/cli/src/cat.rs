use artiscope_api::ClassLoader;
use artiscope_runtime::IsolatedArtifact;
use std::io::Write;

pub fn run(artifact: &IsolatedArtifact, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(locator) = artifact.loader().get_resource(name) else {
        return Err(format!("No visible resource named '{}'", name).into());
    };

    let bytes = artifact.read(&locator)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}
