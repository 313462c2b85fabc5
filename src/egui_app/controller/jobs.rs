//! Background request plumbing for the controller.
//!
//! Each request kind runs on its own spawned thread and reports back through
//! one mpsc channel the controller drains every frame. An in-progress flag
//! per kind prevents overlapping requests; there is no cancellation.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

use crate::api::{
    self, ApiError, FeatureRecord, HealthReport, ModelReport, PredictionOutcome, SampleBundle,
};

pub(crate) enum JobMessage {
    SamplesFetched(Result<SampleBundle, ApiError>),
    PredictionFinished(Result<PredictionOutcome, ApiError>),
    HealthChecked(Result<HealthReport, ApiError>),
    ModelInfoFetched(Result<ModelReport, ApiError>),
}

pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    samples_fetch_in_progress: bool,
    prediction_in_progress: bool,
    health_check_in_progress: bool,
    model_info_in_progress: bool,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            samples_fetch_in_progress: false,
            prediction_in_progress: false,
            health_check_in_progress: false,
            model_info_in_progress: false,
        }
    }

    pub(super) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    /// True while any request thread has not reported back yet.
    pub(super) fn any_in_progress(&self) -> bool {
        self.samples_fetch_in_progress
            || self.prediction_in_progress
            || self.health_check_in_progress
            || self.model_info_in_progress
    }

    pub(super) fn prediction_in_progress(&self) -> bool {
        self.prediction_in_progress
    }

    pub(super) fn begin_samples_fetch(&mut self, base_url: String) {
        if self.samples_fetch_in_progress {
            return;
        }
        self.samples_fetch_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = api::fetch_samples(&base_url);
            let _ = tx.send(JobMessage::SamplesFetched(result));
        });
    }

    pub(super) fn clear_samples_fetch(&mut self) {
        self.samples_fetch_in_progress = false;
    }

    pub(super) fn begin_prediction(&mut self, base_url: String, record: FeatureRecord) {
        if self.prediction_in_progress {
            return;
        }
        self.prediction_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = api::predict(&base_url, &record);
            let _ = tx.send(JobMessage::PredictionFinished(result));
        });
    }

    pub(super) fn clear_prediction(&mut self) {
        self.prediction_in_progress = false;
    }

    pub(super) fn begin_health_check(&mut self, base_url: String) {
        if self.health_check_in_progress {
            return;
        }
        self.health_check_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = api::check_health(&base_url);
            let _ = tx.send(JobMessage::HealthChecked(result));
        });
    }

    pub(super) fn clear_health_check(&mut self) {
        self.health_check_in_progress = false;
    }

    pub(super) fn begin_model_info(&mut self, base_url: String) {
        if self.model_info_in_progress {
            return;
        }
        self.model_info_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = api::fetch_model_info(&base_url);
            let _ = tx.send(JobMessage::ModelInfoFetched(result));
        });
    }

    pub(super) fn clear_model_info(&mut self) {
        self.model_info_in_progress = false;
    }
}
