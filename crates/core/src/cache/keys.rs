use std::fmt;

use serde::Serialize;

use crate::subject::{SubjectId, ValidationError};

/// A family of snapshots sharing one cache key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DashboardNamespace {
    UserDashboard,
    PipelineAutomation,
}

impl DashboardNamespace {
    pub const ALL: [DashboardNamespace; 2] = [
        DashboardNamespace::UserDashboard,
        DashboardNamespace::PipelineAutomation,
    ];

    /// Key prefix, e.g. `dashboard:user`.
    pub fn prefix(&self) -> &'static str {
        match self {
            DashboardNamespace::UserDashboard => "dashboard:user",
            DashboardNamespace::PipelineAutomation => "pipeline:automation",
        }
    }

    /// URL-friendly name, e.g. `user-dashboard`.
    pub fn slug(&self) -> &'static str {
        match self {
            DashboardNamespace::UserDashboard => "user-dashboard",
            DashboardNamespace::PipelineAutomation => "pipeline-automation",
        }
    }

    /// Returns the cache key for one subject's snapshot.
    pub fn key(&self, subject: SubjectId) -> String {
        format!("{}:{}", self.prefix(), subject)
    }

    /// Resolves a namespace from either its prefix or its slug.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|ns| ns.prefix() == raw || ns.slug() == raw)
            .ok_or_else(|| ValidationError::UnknownNamespace(raw.to_string()))
    }
}

impl fmt::Display for DashboardNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Pattern matching every key of a namespace.
pub fn namespace_pattern(namespace: DashboardNamespace) -> String {
    format!("{}:*", namespace.prefix())
}

/// Pattern matching one subject's key in every namespace.
pub fn subject_pattern(subject: SubjectId) -> String {
    format!("*:{}", subject)
}
