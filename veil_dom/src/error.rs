// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for structural document edits.

use thiserror::Error;

use crate::NodeId;

/// A structural edit that the document refused.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    /// The node was destroyed (or never existed).
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),
    /// Inserting `child` under `parent` would make a node its own ancestor.
    #[error("cannot insert {child:?} under its own descendant {parent:?}")]
    HierarchyRequest {
        /// Requested parent.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
    },
    /// The reference node for an insertion is not a child of the parent.
    #[error("{0:?} is not a child of the insertion parent")]
    NotAChild(NodeId),
}
