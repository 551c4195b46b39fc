// src/editor/core.rs

use std::sync::Arc;

use log::{error, info};
use parking_lot::RwLock;

use crate::editor::history::History;
use crate::editor::ops::EditOp;
use crate::ingest::ModelSource;
use crate::model::SpatialModel;

/// One editing session over a spatial model.
///
/// The session holds the model twice over: the shared `Arc<RwLock<_>>` handle
/// the map surface reads from, and the history of committed snapshots every
/// user mutation flows through. `apply`, `undo`, `redo` and `load_source`
/// keep the two in step.
pub struct Editor {
    model: Arc<RwLock<SpatialModel>>,
    history: History<SpatialModel>,

    /// Messages or status for UI.
    pub status_message: String,
    pub error_message: Option<String>,

    saved_checksum: u32,
}

impl Editor {
    /// Starts a session on the given model.
    pub fn new(model: SpatialModel) -> Self {
        let saved_checksum = model.checksum();
        Editor {
            model: Arc::new(RwLock::new(model.clone())),
            history: History::new(model),
            status_message: String::new(),
            error_message: None,
            saved_checksum,
        }
    }

    /// The shared model handle for the rendering layer.
    pub fn model(&self) -> Arc<RwLock<SpatialModel>> {
        Arc::clone(&self.model)
    }

    /// A clone of the present snapshot.
    pub fn snapshot(&self) -> SpatialModel {
        self.history.present().clone()
    }

    /// Applies an op to a working clone of the present snapshot and commits
    /// the clone on success. A failing op leaves the committed model
    /// untouched and records the error for the UI.
    pub fn apply(&mut self, op: EditOp) -> bool {
        let mut working = self.history.present().clone();
        match op.apply(&mut working) {
            Ok(()) => {
                if self.history.set(working) {
                    self.publish();
                }
                self.error_message = None;
                true
            }
            Err(err) => {
                error!("edit failed: {}", err);
                self.error_message = Some(format!("Error applying edit: {}", err));
                false
            }
        }
    }

    /// Steps back one committed snapshot, if any.
    pub fn undo(&mut self) {
        if self.history.undo() {
            self.publish();
            self.status_message = "Undid last edit.".to_string();
        }
    }

    /// Steps forward one undone snapshot, if any.
    pub fn redo(&mut self) {
        if self.history.redo() {
            self.publish();
            self.status_message = "Redid last undone edit.".to_string();
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replaces the session contents with a freshly built model from any
    /// source, clearing the undo history.
    pub fn load_source(&mut self, source: &dyn ModelSource) {
        let model = source.build();
        info!(
            "loaded {}: {} blocks, {} lots",
            source.label(),
            model.blocks.len(),
            model.lot_count()
        );
        self.saved_checksum = model.checksum();
        *self.model.write() = model.clone();
        self.history.reset(model);
        self.status_message = format!("Loaded {}.", source.label());
        self.error_message = None;
    }

    /// True when the present snapshot differs from the last saved one.
    pub fn has_unsaved_changes(&self) -> bool {
        self.history.present().checksum() != self.saved_checksum
    }

    /// Marks the present snapshot as saved.
    pub fn mark_saved(&mut self) {
        self.saved_checksum = self.history.present().checksum();
    }

    /// Pushes the present snapshot into the shared handle.
    fn publish(&mut self) {
        *self.model.write() = self.history.present().clone();
    }
}
