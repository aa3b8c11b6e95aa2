//! Keeps the overlay series attached to a surface in line with the
//! indicator toggles and the indicators the current dataset carries.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::overlay_style;
use crate::domain::{IndicatorBundle, IndicatorKind, IndicatorSeries, OverlayKey};
use crate::models::TogglesState;
use crate::render::{RenderingSurface, SeriesHandle};

/// What a reconcile or refit pass changed on the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: Vec<OverlayKey>,
    pub removed: Vec<OverlayKey>,
    pub refreshed: Vec<OverlayKey>,
    /// Desired kinds the dataset does not carry
    pub unavailable: Vec<IndicatorKind>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.refreshed.is_empty()
    }
}

/// Owns the `OverlayKey -> SeriesHandle` map for one surface.
/// A kind is attached with all of its keys or not at all.
#[derive(Debug, Default)]
pub struct OverlayReconciler {
    attached: BTreeMap<OverlayKey, SeriesHandle>,
}

impl OverlayReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached_keys(&self) -> impl Iterator<Item = OverlayKey> + '_ {
        self.attached.keys().copied()
    }

    pub fn attached_kinds(&self) -> BTreeSet<IndicatorKind> {
        self.attached.keys().map(|k| k.kind()).collect()
    }

    pub fn handle(&self, key: OverlayKey) -> Option<SeriesHandle> {
        self.attached.get(&key).copied()
    }

    /// Bring the attached set to `desired ∩ available`.
    ///
    /// Kinds attached but no longer desired are removed. Kinds desired and
    /// present in `bundle` but not attached are created and filled. Already
    /// attached kinds are left untouched, so a second call with the same
    /// inputs issues no surface calls.
    pub fn reconcile<S: RenderingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        toggles: &TogglesState,
        bundle: Option<&IndicatorBundle>,
    ) -> ReconcileReport {
        let desired = toggles.desired_indicators();
        let mut report = ReconcileReport::default();

        // 1. Remove what is attached but no longer wanted
        for kind in self.attached_kinds() {
            if !desired.contains(&kind) {
                self.detach_kind(surface, kind, &mut report);
            }
        }

        // 2. Add what is wanted, available and missing
        let attached = self.attached_kinds();
        for kind in desired {
            if attached.contains(&kind) {
                continue;
            }
            match bundle.and_then(|b| kind_series(b, kind)) {
                Some(series) => {
                    let period = Some(toggles.period(kind));
                    for (key, points) in series {
                        let handle = surface.add_overlay_series(key, &overlay_style(key, period));
                        surface.set_overlay_data(handle, &points.points);
                        self.attached.insert(key, handle);
                        report.added.push(key);
                    }
                }
                None => report.unavailable.push(kind),
            }
        }

        #[cfg(debug_assertions)]
        if crate::config::DEBUG_FLAGS.log_reconciler && !report.is_noop() {
            log::info!(
                "Overlay reconcile: +{:?} -{:?} (unavailable {:?})",
                report.added,
                report.removed,
                report.unavailable
            );
        }

        report
    }

    /// A new dataset arrived: push fresh data into attached series, drop the
    /// ones the new bundle no longer carries, then reconcile.
    pub fn refit<S: RenderingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        toggles: &TogglesState,
        bundle: &IndicatorBundle,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for kind in self.attached_kinds() {
            match kind_series(bundle, kind) {
                Some(series) => {
                    for (key, points) in series {
                        if let Some(handle) = self.attached.get(&key).copied() {
                            surface.set_overlay_data(handle, &points.points);
                            report.refreshed.push(key);
                        }
                    }
                }
                None => self.detach_kind(surface, kind, &mut report),
            }
        }

        let rest = self.reconcile(surface, toggles, Some(bundle));
        report.added = rest.added;
        report.removed.extend(rest.removed);
        report.unavailable = rest.unavailable;
        report
    }

    /// Remove every attached series, e.g. on dispose.
    pub fn detach_all<S: RenderingSurface + ?Sized>(&mut self, surface: &mut S) {
        for (_, handle) in std::mem::take(&mut self.attached) {
            surface.remove_overlay_series(handle);
        }
    }

    /// Forget handles without touching the surface, for a surface that was
    /// already disposed.
    pub fn forget(&mut self) {
        self.attached.clear();
    }

    fn detach_kind<S: RenderingSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        kind: IndicatorKind,
        report: &mut ReconcileReport,
    ) {
        for key in kind.overlay_keys() {
            if let Some(handle) = self.attached.remove(key) {
                surface.remove_overlay_series(handle);
                report.removed.push(*key);
            }
        }
    }
}

/// Every series of `kind`, or `None` if any of them is missing.
fn kind_series(bundle: &IndicatorBundle, kind: IndicatorKind) -> Option<Vec<(OverlayKey, &IndicatorSeries)>> {
    kind.overlay_keys()
        .iter()
        .map(|key| bundle.series_for(*key).map(|s| (*key, s)))
        .collect()
}
