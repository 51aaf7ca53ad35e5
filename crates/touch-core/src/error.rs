use crate::finger::FingerId;
use crate::selectable::SelectableId;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TouchError {
    #[error("mouse button mask {0} is outside 0..=7")]
    InvalidMouseButtons(u8),
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    #[error("viewport {width}x{height} has no area")]
    InvalidViewport { width: f32, height: f32 },
    #[error("selectable {0:?} is not registered")]
    UnknownSelectable(SelectableId),
    #[error("finger {0:?} is already pressed")]
    DuplicateFinger(FingerId),
    #[error("finger {0:?} is not tracked")]
    UnknownFinger(FingerId),
}

pub type Result<T> = std::result::Result<T, TouchError>;
