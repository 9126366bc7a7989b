use bevy::prelude::*;

use crate::engine::assets::model_slot::ModelSlot;
use crate::engine::core::app_state::AppState;
use crate::error::LoadError;

/// Lifecycle of the one-shot camera fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FitStatus {
    #[default]
    NotRequested,
    /// All three models attached; waiting for their instances and bounds.
    Requested,
    Applied,
    /// Requested but the scene could not be framed.
    Skipped,
}

/// Sequential load pipeline: which stage is in flight, what has been
/// attached (in order), whether a stage failed and where the fit stands.
///
/// A stage may only begin once every earlier stage has been attached,
/// and the fit is requested exactly once, on the third attach.
#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub manifest_resolved: bool,
    in_flight: Option<ModelSlot>,
    attached: Vec<ModelSlot>,
    failure: Option<LoadError>,
    fit: FitStatus,
}

impl LoadingProgress {
    /// Next slot the pipeline will accept, or `None` once done or failed.
    pub fn expected_slot(&self) -> Option<ModelSlot> {
        if self.failure.is_some() {
            return None;
        }
        ModelSlot::LOAD_ORDER.get(self.attached.len()).copied()
    }

    /// Mark `slot` as requested. Refused out of order or while another
    /// stage is still in flight.
    pub fn begin(&mut self, slot: ModelSlot) -> bool {
        if self.in_flight.is_some() || self.expected_slot() != Some(slot) {
            return false;
        }
        self.in_flight = Some(slot);
        true
    }

    pub fn in_flight(&self) -> Option<ModelSlot> {
        self.in_flight
    }

    /// Record that `slot` was attached to the scene and return the state to
    /// move to. `None` if `slot` was not the stage in flight.
    pub fn complete(&mut self, slot: ModelSlot) -> Option<AppState> {
        if self.in_flight != Some(slot) {
            return None;
        }
        self.in_flight = None;
        self.attached.push(slot);

        if self.all_attached() {
            self.fit = FitStatus::Requested;
            return Some(AppState::Ready);
        }
        slot.next().map(AppState::loading)
    }

    /// Record a failed stage. The pipeline accepts nothing afterwards.
    pub fn fail(&mut self, error: LoadError) -> AppState {
        self.in_flight = None;
        self.failure = Some(error);
        AppState::LoadFailed
    }

    pub fn attached(&self) -> &[ModelSlot] {
        &self.attached
    }

    pub fn is_attached(&self, slot: ModelSlot) -> bool {
        self.attached.contains(&slot)
    }

    pub fn all_attached(&self) -> bool {
        self.attached.len() == ModelSlot::LOAD_ORDER.len()
    }

    pub fn failure(&self) -> Option<&LoadError> {
        self.failure.as_ref()
    }

    pub fn fit_status(&self) -> FitStatus {
        self.fit
    }

    pub fn fit_pending(&self) -> bool {
        self.fit == FitStatus::Requested
    }

    /// Close out the requested fit. Ignored unless a fit is pending.
    pub fn finish_fit(&mut self, outcome: FitStatus) {
        if self.fit_pending() && matches!(outcome, FitStatus::Applied | FitStatus::Skipped) {
            self.fit = outcome;
        }
    }
}
