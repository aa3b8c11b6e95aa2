//! Debugging feature flags.

pub struct LogFlags {
    /// Selection changes, fetch dispatch, result application and stale discards.
    pub log_engine: bool,

    /// Every add/remove/set-data the overlay reconciler issues.
    pub log_reconciler: bool,

    /// Marker composition counts.
    pub log_markers: bool,

    /// Preference load/save.
    pub log_preferences: bool,
}

pub const DEBUG_FLAGS: LogFlags = LogFlags {
    log_engine: true,
    log_reconciler: false,
    log_markers: false,
    log_preferences: true,
};
