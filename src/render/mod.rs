//! Everything that talks to the rendering surface.

mod compositor;
mod reconciler;
mod recording;
mod surface;
mod volume;

pub use compositor::compose_markers;
pub use reconciler::{OverlayReconciler, ReconcileReport};
pub use recording::{RecordingSurface, SurfaceCall};
pub use surface::{RenderingSurface, SeriesHandle, SurfaceOptions, VolumeBar};
pub use volume::build_volume_bars;
