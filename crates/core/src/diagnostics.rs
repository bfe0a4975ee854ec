//! Structured diagnostics for class-loading decisions.

use std::fmt;
use tracing::{info, trace};

const TARGET: &str = "artiscope::classloading";

/// Kind of lookup a decision was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Class,
    Resource,
    Resources,
    ServiceDescriptor,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LookupKind::Class => "class",
            LookupKind::Resource => "resource",
            LookupKind::Resources => "resources",
            LookupKind::ServiceDescriptor => "service",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Exported,
    Filtered,
    ServiceHit,
    ServiceMiss,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Exported => "exported",
            Decision::Filtered => "filtered",
            Decision::ServiceHit => "exported service found",
            Decision::ServiceMiss => "exported service not found, using standard lookup",
        })
    }
}

/// Emits filter decisions at `info` when verbose, otherwise at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassLoadingTracer {
    verbose: bool,
}

impl ClassLoadingTracer {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn decision(&self, artifact: &str, kind: LookupKind, name: &str, decision: Decision) {
        if self.verbose {
            info!(target: TARGET, artifact, %kind, name, %decision, "classloading decision");
        } else {
            trace!(target: TARGET, artifact, %kind, name, %decision, "classloading decision");
        }
    }

    /// Decision that also reports what the lookup produced.
    pub fn outcome(
        &self,
        artifact: &str,
        kind: LookupKind,
        name: &str,
        decision: Decision,
        found: &dyn fmt::Debug,
    ) {
        if self.verbose {
            info!(target: TARGET, artifact, %kind, name, %decision, ?found, "classloading decision");
        } else {
            trace!(target: TARGET, artifact, %kind, name, %decision, ?found, "classloading decision");
        }
    }
}
