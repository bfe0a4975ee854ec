//! Parent-delegation policy owned by backing loaders.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Order in which a loader consults its parent and its own classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    #[default]
    ParentFirst,
    ChildFirst,
    ChildOnly,
}

/// Default strategy plus per-package overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassLoaderLookupPolicy {
    #[serde(default)]
    pub default: LookupStrategy,
    #[serde(default)]
    pub packages: BTreeMap<String, LookupStrategy>,
}

impl ClassLoaderLookupPolicy {
    pub fn new(default: LookupStrategy) -> Self {
        Self {
            default,
            packages: BTreeMap::new(),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>, strategy: LookupStrategy) -> Self {
        self.packages.insert(package.into(), strategy);
        self
    }

    /// Strategy for a fully-qualified class name.
    ///
    /// The longest configured package that is either the class's package or
    /// an ancestor of it wins; otherwise the default applies.
    pub fn strategy_for(&self, class_name: &str) -> LookupStrategy {
        let package = super::class::package_of(class_name);

        let mut best_match: Option<(&str, LookupStrategy)> = None;
        for (prefix, strategy) in &self.packages {
            if let Some(remainder) = package.strip_prefix(prefix.as_str()) {
                if remainder.is_empty() || remainder.starts_with('.') {
                    match &best_match {
                        Some((best, _)) if best.len() >= prefix.len() => {}
                        _ => best_match = Some((prefix, *strategy)),
                    }
                }
            }
        }

        best_match
            .map(|(_, strategy)| strategy)
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_applies_without_overrides() {
        let policy = ClassLoaderLookupPolicy::new(LookupStrategy::ChildFirst);
        assert_eq!(policy.strategy_for("com.x.Foo"), LookupStrategy::ChildFirst);
        assert_eq!(policy.strategy_for("Foo"), LookupStrategy::ChildFirst);
    }

    #[test]
    fn test_longest_package_wins() {
        let policy = ClassLoaderLookupPolicy::default()
            .with_package("com", LookupStrategy::ChildFirst)
            .with_package("com.x", LookupStrategy::ChildOnly);

        assert_eq!(policy.strategy_for("com.x.Foo"), LookupStrategy::ChildOnly);
        assert_eq!(policy.strategy_for("com.x.y.Foo"), LookupStrategy::ChildOnly);
        assert_eq!(policy.strategy_for("com.y.Foo"), LookupStrategy::ChildFirst);
        assert_eq!(policy.strategy_for("org.y.Foo"), LookupStrategy::ParentFirst);
    }

    #[test]
    fn test_prefix_must_end_on_package_boundary() {
        let policy =
            ClassLoaderLookupPolicy::default().with_package("java", LookupStrategy::ChildOnly);
        assert_eq!(
            policy.strategy_for("javax.sql.DataSource"),
            LookupStrategy::ParentFirst
        );
        assert_eq!(
            policy.strategy_for("java.lang.String"),
            LookupStrategy::ChildOnly
        );
    }

    #[test]
    fn test_policy_deserializes_from_json_shape() {
        let policy: ClassLoaderLookupPolicy = serde_json::from_str(
            r#"{"default":"child_first","packages":{"org.slf4j":"parent_first"}}"#,
        )
        .unwrap();
        assert_eq!(policy.default, LookupStrategy::ChildFirst);
        assert_eq!(
            policy.strategy_for("org.slf4j.Logger"),
            LookupStrategy::ParentFirst
        );
    }
}
