//! A surface that paints nothing and remembers everything. Used by the
//! headless binary and by tests.

use std::collections::BTreeMap;

use crate::config::OverlayStyle;
use crate::domain::{Candle, IndicatorPoint, OverlayKey};
use crate::models::Marker;
use crate::render::{RenderingSurface, SeriesHandle, SurfaceOptions, VolumeBar};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Initialize { width: u32, height: u32 },
    Resize { width: u32, height: u32 },
    SetCandles { count: usize },
    SetVolume { count: usize },
    AddOverlay { key: OverlayKey, handle: SeriesHandle },
    RemoveOverlay { handle: SeriesHandle },
    SetOverlayData { handle: SeriesHandle, count: usize },
    SetMarkers { count: usize },
    FitContent,
    Dispose,
}

#[derive(Debug, Clone)]
struct RecordedSeries {
    key: OverlayKey,
    style: OverlayStyle,
    points: Vec<IndicatorPoint>,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    options: Option<SurfaceOptions>,
    size: (u32, u32),
    candles: Vec<Candle>,
    volume: Vec<VolumeBar>,
    series: BTreeMap<SeriesHandle, RecordedSeries>,
    markers: Vec<Marker>,
    next_handle: u64,
    disposed: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn options(&self) -> Option<&SurfaceOptions> {
        self.options.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn volume(&self) -> &[VolumeBar] {
        &self.volume
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Keys of the live overlay series, in creation order.
    pub fn overlay_keys(&self) -> Vec<OverlayKey> {
        self.series.values().map(|s| s.key).collect()
    }

    pub fn overlay_points(&self, handle: SeriesHandle) -> Option<&[IndicatorPoint]> {
        self.series.get(&handle).map(|s| s.points.as_slice())
    }

    pub fn style_of(&self, handle: SeriesHandle) -> Option<&OverlayStyle> {
        self.series.get(&handle).map(|s| &s.style)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl RenderingSurface for RecordingSurface {
    fn initialize(&mut self, options: &SurfaceOptions) {
        self.size = (options.width, options.height);
        self.options = Some(options.clone());
        self.disposed = false;
        self.calls.push(SurfaceCall::Initialize {
            width: options.width,
            height: options.height,
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.calls.push(SurfaceCall::Resize { width, height });
    }

    fn set_candle_data(&mut self, candles: &[Candle]) {
        self.candles = candles.to_vec();
        self.calls.push(SurfaceCall::SetCandles {
            count: candles.len(),
        });
    }

    fn set_volume_data(&mut self, bars: &[VolumeBar]) {
        self.volume = bars.to_vec();
        self.calls.push(SurfaceCall::SetVolume { count: bars.len() });
    }

    fn add_overlay_series(&mut self, key: OverlayKey, style: &OverlayStyle) -> SeriesHandle {
        self.next_handle += 1;
        let handle = SeriesHandle(self.next_handle);
        self.series.insert(
            handle,
            RecordedSeries {
                key,
                style: style.clone(),
                points: Vec::new(),
            },
        );
        self.calls.push(SurfaceCall::AddOverlay { key, handle });
        handle
    }

    fn remove_overlay_series(&mut self, handle: SeriesHandle) {
        self.series.remove(&handle);
        self.calls.push(SurfaceCall::RemoveOverlay { handle });
    }

    fn set_overlay_data(&mut self, handle: SeriesHandle, points: &[IndicatorPoint]) {
        if let Some(series) = self.series.get_mut(&handle) {
            series.points = points.to_vec();
        }
        self.calls.push(SurfaceCall::SetOverlayData {
            handle,
            count: points.len(),
        });
    }

    fn set_markers(&mut self, markers: &[Marker]) {
        self.markers = markers.to_vec();
        self.calls.push(SurfaceCall::SetMarkers {
            count: markers.len(),
        });
    }

    fn fit_content(&mut self) {
        self.calls.push(SurfaceCall::FitContent);
    }

    fn dispose(&mut self) {
        self.series.clear();
        self.markers.clear();
        self.candles.clear();
        self.volume.clear();
        self.disposed = true;
        self.calls.push(SurfaceCall::Dispose);
    }
}
