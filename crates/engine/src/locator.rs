use crate::fs::SourceFs;
use serde::{Deserialize, Serialize};
use signal_protocol::is_identifier;
use std::path::{Path, PathBuf};

const COMPONENT_DIRS: &[&str] = &[
    "components",
    "src/components",
    // Conventional homes of layer and signal helpers
    "src/signals",
    "src/signal-layers",
];

const COMPONENT_EXTENSIONS: &[&str] = &["jsx", "js", "tsx", "ts"];

/// One `<root>/<dir>/<Component>.<extension>` candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub dir: String,
    pub extension: String,
}

impl Probe {
    pub fn new(dir: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn path_for(&self, root: &Path, component_name: &str) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in self.dir.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{component_name}.{}", self.extension));
        path
    }
}

/// Directory-major probe order: every extension of a directory before the next directory
pub fn default_probes() -> Vec<Probe> {
    COMPONENT_DIRS
        .iter()
        .flat_map(|dir| COMPONENT_EXTENSIONS.iter().map(move |ext| Probe::new(*dir, *ext)))
        .collect()
}

/// Which component to find, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLookupRequest {
    pub component_name: String,
    pub search_roots: Vec<PathBuf>,
}

impl ComponentLookupRequest {
    pub fn new(component_name: impl Into<String>, search_roots: Vec<PathBuf>) -> Self {
        Self {
            component_name: component_name.into(),
            search_roots,
        }
    }
}

/// Resolves a component name to its most plausible source file
#[derive(Debug, Clone)]
pub struct ComponentLocator {
    probes: Vec<Probe>,
}

impl Default for ComponentLocator {
    fn default() -> Self {
        Self::new(default_probes())
    }
}

impl ComponentLocator {
    pub fn new(probes: Vec<Probe>) -> Self {
        Self { probes }
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// Every path `locate` would try, in probe order
    pub fn candidates(&self, request: &ComponentLookupRequest) -> Vec<PathBuf> {
        if !is_identifier(&request.component_name) {
            return Vec::new();
        }
        request
            .search_roots
            .iter()
            .flat_map(|root| {
                self.probes
                    .iter()
                    .map(move |probe| probe.path_for(root, &request.component_name))
            })
            .collect()
    }

    /// First candidate that exists, or `None`
    pub async fn locate(
        &self,
        fs: &dyn SourceFs,
        request: &ComponentLookupRequest,
    ) -> Option<PathBuf> {
        for candidate in self.candidates(request) {
            if fs.exists(&candidate).await {
                log::debug!("Found component at: {}", candidate.display());
                return Some(candidate);
            }
        }
        log::debug!(
            "Component file not found for {} in {} root(s)",
            request.component_name,
            request.search_roots.len()
        );
        None
    }
}
