//! Write-once result slots shared between the launcher, the adapter tasks and
//! the joiner.
//!
//! A [`ResultSlotSet`] is allocated per request together with one
//! [`SlotWriter`] per slot. Writers are not cloneable and are consumed by
//! their single write, so no slot can have a second writer and no lock is
//! needed around the cells.

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::errors::AnalysisError;

/// Label (or landmark) text to confidence score, in response order.
pub type LabelScores = IndexMap<String, f32>;

/// Identity of each slot. Declaration order is the caller-facing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotId {
    /// AutoML classification scores.
    Classification,
    /// Label detection scores.
    Labels,
    /// Landmark detection scores.
    Landmarks,
    /// Detected text.
    Text,
    /// Visually similar image URLs.
    SimilarImages,
    /// Web detection summary.
    WebDescription,
}

impl SlotId {
    /// Every slot in the order the outcome presents them.
    pub const ORDER: [Self; 6] = [
        Self::Classification,
        Self::Labels,
        Self::Landmarks,
        Self::Text,
        Self::SimilarImages,
        Self::WebDescription,
    ];

    /// Stable name used in logs and JSON.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Classification => "classification",
            Self::Labels => "labels",
            Self::Landmarks => "landmarks",
            Self::Text => "text",
            Self::SimilarImages => "similar_images",
            Self::WebDescription => "web_description",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a slot as seen by the joiner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum SlotState<V> {
    /// Nothing was written (the task died before writing).
    Unset,
    /// The adapter succeeded; the value may still be empty.
    #[serde(rename = "ok")]
    Value(V),
    /// The adapter failed.
    Failed(AnalysisError),
}

impl<V> SlotState<V> {
    /// True when the slot holds a value.
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// True when no outcome was ever written.
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Value if the adapter succeeded.
    pub const fn value(&self) -> Option<&V> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Error if the adapter failed.
    pub const fn error(&self) -> Option<&AnalysisError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

type Cell<V> = Arc<OnceLock<Result<V, AnalysisError>>>;

/// Read side of one slot.
#[derive(Debug)]
pub struct ResultSlot<V> {
    cell: Cell<V>,
}

impl<V: Clone> ResultSlot<V> {
    fn allocate() -> (Self, SlotWriter<V>) {
        let cell: Cell<V> = Arc::new(OnceLock::new());
        (
            Self {
                cell: Arc::clone(&cell),
            },
            SlotWriter { cell },
        )
    }

    /// Current state of the slot.
    pub fn state(&self) -> SlotState<V> {
        match self.cell.get() {
            None => SlotState::Unset,
            Some(Ok(value)) => SlotState::Value(value.clone()),
            Some(Err(err)) => SlotState::Failed(err.clone()),
        }
    }
}

/// The single write handle of one slot.
#[derive(Debug)]
pub struct SlotWriter<V> {
    cell: Cell<V>,
}

impl<V> SlotWriter<V> {
    /// Store the adapter outcome. Consumes the writer.
    pub fn write(self, outcome: Result<V, AnalysisError>) {
        // Only this writer can reach the cell, and it is consumed here.
        let _ = self.cell.set(outcome);
    }
}

/// Something an adapter task can deliver its outcome into.
pub trait SlotSink<V>: Send + 'static {
    /// Store the outcome, consuming the sink.
    fn deliver(self, outcome: Result<V, AnalysisError>);
}

impl<V: Send + Sync + 'static> SlotSink<V> for SlotWriter<V> {
    fn deliver(self, outcome: Result<V, AnalysisError>) {
        self.write(outcome);
    }
}

/// Web detection output, split across two slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebFindings {
    /// Visually similar image URLs with an http(s) scheme.
    pub similar_images: Vec<String>,
    /// Multi-line human readable summary.
    pub description: String,
}

/// Writers owned by the web adapter.
#[derive(Debug)]
pub struct WebSlotWriters {
    /// Writer of the similar-images slot.
    pub similar_images: SlotWriter<Vec<String>>,
    /// Writer of the web-description slot.
    pub description: SlotWriter<String>,
}

impl SlotSink<WebFindings> for WebSlotWriters {
    fn deliver(self, outcome: Result<WebFindings, AnalysisError>) {
        match outcome {
            Ok(findings) => {
                self.similar_images.write(Ok(findings.similar_images));
                self.description.write(Ok(findings.description));
            }
            Err(err) => {
                self.similar_images.write(Err(err.clone()));
                self.description.write(Err(err));
            }
        }
    }
}

/// One writer per slot, handed out to the adapter tasks.
#[derive(Debug)]
pub struct SlotWriters {
    /// Writer of the classification slot.
    pub classification: SlotWriter<LabelScores>,
    /// Writer of the labels slot.
    pub labels: SlotWriter<LabelScores>,
    /// Writer of the landmarks slot.
    pub landmarks: SlotWriter<LabelScores>,
    /// Writer of the text slot.
    pub text: SlotWriter<String>,
    /// Both web slots, filled by one task.
    pub web: WebSlotWriters,
}

/// Named slots for one request.
#[derive(Debug)]
pub struct ResultSlotSet {
    /// Classification scores.
    pub classification: ResultSlot<LabelScores>,
    /// Label scores.
    pub labels: ResultSlot<LabelScores>,
    /// Landmark scores.
    pub landmarks: ResultSlot<LabelScores>,
    /// Detected text.
    pub text: ResultSlot<String>,
    /// Similar image URLs.
    pub similar_images: ResultSlot<Vec<String>>,
    /// Web detection summary.
    pub web_description: ResultSlot<String>,
}

impl ResultSlotSet {
    /// Allocate every slot in the `Unset` state, with its writer.
    pub fn allocate() -> (Self, SlotWriters) {
        let (classification, classification_w) = ResultSlot::allocate();
        let (labels, labels_w) = ResultSlot::allocate();
        let (landmarks, landmarks_w) = ResultSlot::allocate();
        let (text, text_w) = ResultSlot::allocate();
        let (similar_images, similar_w) = ResultSlot::allocate();
        let (web_description, description_w) = ResultSlot::allocate();

        (
            Self {
                classification,
                labels,
                landmarks,
                text,
                similar_images,
                web_description,
            },
            SlotWriters {
                classification: classification_w,
                labels: labels_w,
                landmarks: landmarks_w,
                text: text_w,
                web: WebSlotWriters {
                    similar_images: similar_w,
                    description: description_w,
                },
            },
        )
    }

    /// Always six.
    pub const fn len(&self) -> usize {
        SlotId::ORDER.len()
    }

    /// Never true.
    pub const fn is_empty(&self) -> bool {
        false
    }
}
