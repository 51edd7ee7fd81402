use foundation::ScreenPoint;

/// The closed set of events the viewer reacts to.
///
/// The host UI's callbacks (surface load, pointer click, slider input) are
/// translated into these and routed by [`crate::Viewer::handle`], keeping the
/// control flow inspectable and testable without a live rendering engine.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewerEvent {
    /// The rendering surface finished loading its style.
    SurfaceReady,
    /// Pointer click at a surface position.
    FeatureClicked(ScreenPoint),
    /// The height slider moved (also fired once at mount with value 0).
    HeightChanged(u32),
}
