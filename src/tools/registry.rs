//! Tool registry: path → implementation catalog.
//!
//! Built once at startup through [`RegistryBuilder`], then sealed into an
//! immutable [`Registry`]. The sealed registry has no mutating methods, so
//! any number of threads can read it without synchronisation.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::contract::{Tool, ToolMetadata};
use super::params::ParamSpec;
use crate::types::{Error, Result};

// =============================================================================
// Path validation
// =============================================================================

/// Check that `path` is a well-formed slash-delimited tool path.
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::invalid_path("tool path cannot be empty"));
    }
    if path.starts_with('/') || path.ends_with('/') {
        return Err(Error::invalid_path(format!(
            "'{}' must not start or end with '/'",
            path
        )));
    }
    if path.split('/').any(|segment| segment.trim().is_empty()) {
        return Err(Error::invalid_path(format!(
            "'{}' contains an empty segment",
            path
        )));
    }
    Ok(())
}

// =============================================================================
// Entries
// =============================================================================

/// One registered tool.
#[derive(Clone)]
pub struct RegistryEntry {
    path: String,
    tool: Arc<dyn Tool>,
    metadata: ToolMetadata,
}

impl RegistryEntry {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn tool(&self) -> &Arc<dyn Tool> {
        &self.tool
    }

    pub fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Serializable listing of one tool for menus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolListing {
    pub path: String,
    pub category: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "ParamSpec::is_empty")]
    pub params: ParamSpec,
}

// =============================================================================
// Navigation tree
// =============================================================================

/// A tool leaf in the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLeaf {
    /// Last path segment.
    pub name: String,
    /// Full tool path.
    pub path: String,
}

/// Interior node of the navigation tree. Children keep registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavNode {
    pub segment: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<NavLeaf>,
}

impl NavNode {
    fn child_mut(&mut self, segment: &str) -> &mut NavNode {
        let idx = match self.children.iter().position(|c| c.segment == segment) {
            Some(idx) => idx,
            None => {
                self.children.push(NavNode {
                    segment: segment.to_string(),
                    ..NavNode::default()
                });
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Find a child node by segment.
    pub fn child(&self, segment: &str) -> Option<&NavNode> {
        self.children.iter().find(|c| c.segment == segment)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Startup-time registration surface. Consumed by [`RegistryBuilder::build`].
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under `path`.
    ///
    /// Fails on a malformed path or if `path` is already taken; the existing
    /// registration is never replaced.
    pub fn register(&mut self, path: &str, tool: impl Tool + 'static) -> Result<&mut Self> {
        self.register_shared(path, Arc::new(tool))
    }

    /// Register a shared tool under `path`.
    pub fn register_shared(&mut self, path: &str, tool: Arc<dyn Tool>) -> Result<&mut Self> {
        validate_path(path)?;
        if self.index.contains_key(path) {
            return Err(Error::duplicate_path(format!(
                "'{}' is already registered",
                path
            )));
        }

        let metadata = tool.metadata();
        self.index.insert(path.to_string(), self.entries.len());
        self.entries.push(RegistryEntry {
            path: path.to_string(),
            tool,
            metadata,
        });

        tracing::debug!(tool_path = path, "tool registered");
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seal the registry. No entry can be added, removed or changed afterwards.
    pub fn build(self) -> Registry {
        tracing::info!(tools = self.entries.len(), "tool registry sealed");
        Registry {
            entries: self.entries,
            index: self.index,
        }
    }
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("paths", &self.entries.iter().map(|e| &e.path).collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// Sealed registry
// =============================================================================

/// Immutable path → tool mapping.
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolve a path to its implementation.
    pub fn lookup(&self, path: &str) -> Result<&Arc<dyn Tool>> {
        self.entry(path)
            .map(RegistryEntry::tool)
            .ok_or_else(|| Error::not_found(format!("no tool registered at '{}'", path)))
    }

    pub fn entry(&self, path: &str) -> Option<&RegistryEntry> {
        self.index.get(path).map(|&idx| &self.entries[idx])
    }

    pub fn metadata(&self, path: &str) -> Option<&ToolMetadata> {
        self.entry(path).map(RegistryEntry::metadata)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// All paths in registration order.
    pub fn list_paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Snapshot of every tool's path and metadata, in registration order.
    pub fn catalog(&self) -> Vec<ToolListing> {
        self.entries
            .iter()
            .map(|e| ToolListing {
                path: e.path.clone(),
                category: e.metadata.category.clone(),
                name: e.metadata.name.clone(),
                description: e.metadata.description.clone(),
                params: e.metadata.params.clone(),
            })
            .collect()
    }

    /// Distinct top-level path segments in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            let top = entry.path.split('/').next().unwrap_or_default();
            if !seen.contains(&top) {
                seen.push(top);
            }
        }
        seen
    }

    /// Nested tree of path segments with tools at the leaves.
    pub fn navigation(&self) -> NavNode {
        let mut root = NavNode::default();
        for entry in &self.entries {
            let mut segments: Vec<&str> = entry.path.split('/').collect();
            let Some(leaf) = segments.pop() else {
                continue;
            };
            let mut node = &mut root;
            for segment in segments {
                node = node.child_mut(segment);
            }
            node.tools.push(NavLeaf {
                name: leaf.to_string(),
                path: entry.path.clone(),
            });
        }
        root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("paths", &self.list_paths())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
