use thiserror::Error;

/// Errors raised by the camera-control layer.
///
/// None of these are fatal for the frame loop: callers log them and carry on
/// with the next frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// A gamepad snapshot did not carry the axis or button index the layout
    /// asked for.
    #[error("gamepad {index} snapshot is missing {needed}")]
    MalformedGamepad { index: u32, needed: String },

    /// The overlay was used before the host attached it.
    #[error("overlay is not attached; attach it before toggling control modes")]
    OverlayDetached,

    /// Camera and look target coincide, so no direction can be derived.
    #[error("look target coincides with the camera position")]
    DegenerateLookDirection,

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}
