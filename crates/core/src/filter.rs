//! Package and resource based visibility filter.

use artiscope_api::{ClassLoaderFilter, package_of};
use std::collections::BTreeSet;

/// Exports classes by package and resources by path.
///
/// A resource is exported when it is listed verbatim, when it lives under a
/// listed directory entry (an entry ending with `/`), or when its directory
/// maps onto an exported package (`com/x/app.xml` for package `com.x`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactClassLoaderFilter {
    exported_packages: BTreeSet<String>,
    exported_resources: BTreeSet<String>,
}

impl ArtifactClassLoaderFilter {
    pub fn new(
        exported_packages: impl IntoIterator<Item = impl Into<String>>,
        exported_resources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            exported_packages: exported_packages.into_iter().map(Into::into).collect(),
            exported_resources: exported_resources
                .into_iter()
                .map(|resource| {
                    let resource: String = resource.into();
                    normalize_resource(&resource).to_string()
                })
                .collect(),
        }
    }

    /// A filter that exports nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn exported_packages(&self) -> impl Iterator<Item = &str> {
        self.exported_packages.iter().map(String::as_str)
    }

    pub fn exported_resources(&self) -> impl Iterator<Item = &str> {
        self.exported_resources.iter().map(String::as_str)
    }
}

impl ClassLoaderFilter for ArtifactClassLoaderFilter {
    fn exports_class(&self, name: &str) -> bool {
        self.exported_packages.contains(package_of(name))
    }

    fn exports_resource(&self, name: &str) -> bool {
        let resource = normalize_resource(name);

        if self.exported_resources.contains(resource) {
            return true;
        }

        if self
            .exported_resources
            .iter()
            .any(|entry| entry.ends_with('/') && resource.starts_with(entry.as_str()))
        {
            return true;
        }

        match resource.rfind('/') {
            Some(idx) => self
                .exported_packages
                .contains(&resource[..idx].replace('/', ".")),
            None => false,
        }
    }
}

fn normalize_resource(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

/// Builds filters from comma-separated configuration values.
pub struct ClassLoaderFilterFactory;

impl ClassLoaderFilterFactory {
    pub fn create(exported_packages: &str, exported_resources: &str) -> ArtifactClassLoaderFilter {
        ArtifactClassLoaderFilter::new(split_list(exported_packages), split_list(exported_resources))
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> ArtifactClassLoaderFilter {
        ArtifactClassLoaderFilter::new(
            ["com.x", "org.api"],
            ["cfg/app.xml", "/static/", "META-INF/app.properties"],
        )
    }

    #[test]
    fn test_exports_class_by_exact_package() {
        let filter = filter();
        assert!(filter.exports_class("com.x.Foo"));
        assert!(filter.exports_class("com.x.Foo$Inner"));
        assert!(!filter.exports_class("com.x.internal.Hidden"));
        assert!(!filter.exports_class("com.Foo"));
        assert!(!filter.exports_class("Foo"));
    }

    #[test]
    fn test_exports_listed_resources() {
        let filter = filter();
        assert!(filter.exports_resource("cfg/app.xml"));
        assert!(filter.exports_resource("/cfg/app.xml"));
        assert!(!filter.exports_resource("cfg/other.xml"));
        assert!(filter.exports_resource("META-INF/app.properties"));
    }

    #[test]
    fn test_exports_directory_entries() {
        let filter = filter();
        assert!(filter.exports_resource("static/css/site.css"));
        assert!(!filter.exports_resource("staticfile"));
    }

    #[test]
    fn test_exports_resources_in_exported_packages() {
        let filter = filter();
        assert!(filter.exports_resource("com/x/messages.properties"));
        assert!(filter.exports_resource("org/api/Api.class"));
        assert!(!filter.exports_resource("com/x/deep/messages.properties"));
        assert!(!filter.exports_resource("META-INF/services/com.svc.Driver"));
    }

    #[test]
    fn test_empty_filter_exports_nothing() {
        let filter = ArtifactClassLoaderFilter::empty();
        assert!(!filter.exports_class("com.x.Foo"));
        assert!(!filter.exports_resource("cfg/app.xml"));
    }

    #[test]
    fn test_factory_parses_comma_separated_lists() {
        let filter = ClassLoaderFilterFactory::create(" com.x , org.api,, ", "cfg/app.xml, ");
        assert_eq!(
            filter.exported_packages().collect::<Vec<_>>(),
            vec!["com.x", "org.api"]
        );
        assert_eq!(filter.exported_resources().collect::<Vec<_>>(), vec!["cfg/app.xml"]);
    }

    #[test]
    fn test_debug_describes_policy() {
        let rendered = format!("{:?}", filter());
        assert!(rendered.contains("com.x"));
        assert!(rendered.contains("cfg/app.xml"));
    }
}
