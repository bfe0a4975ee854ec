use crate::print_json;
use artiscope_api::ClassLoaderFilter;
use artiscope_runtime::IsolatedArtifact;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Tabled, Serialize)]
struct EntryRow {
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Exported")]
    exported: bool,
}

fn row(filter: &dyn ClassLoaderFilter, entry: String) -> EntryRow {
    let (kind, exported) = match entry.strip_suffix(".class") {
        Some(class_path) => ("class", filter.exports_class(&class_path.replace('/', "."))),
        None => ("resource", filter.exports_resource(&entry)),
    };
    EntryRow {
        entry,
        kind,
        exported,
    }
}

pub fn run(
    artifact: &IsolatedArtifact,
    exported_only: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = artifact.loader().filter().as_ref();
    let rows: Vec<EntryRow> = artifact
        .backing()
        .entries()
        .into_iter()
        .map(|entry| row(filter, entry))
        .filter(|row| row.exported || !exported_only)
        .collect();

    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No entries.");
    } else {
        println!("{}", Table::new(rows));
    }

    let services = artifact.loader().exported_services();
    if !services.is_empty() {
        println!();
        println!("Exported services:");
        for provider in services.iter() {
            println!("  {} -> {}", provider.service_interface(), provider.resource());
        }
    }
    Ok(())
}
