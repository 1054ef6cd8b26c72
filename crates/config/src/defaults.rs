// Defaults and constants for settings

// Picker defaults
pub(crate) const HIGHLIGHT_OUTLINE: &str = "2px solid #4CAF50";
pub(crate) const HIGHLIGHT_OFFSET: &str = "2px";
pub(crate) const HINT_ID: &str = "webkeybind-selector-tip";
pub(crate) const HINT_TEXT: &str = "Click an element to select it, press ESC to cancel";
pub(crate) const CURSOR: &str = "crosshair";
pub(crate) const CLIMB_DEPTH: usize = 5;

// Selector defaults
pub(crate) const SELECTOR_MAX_DEPTH: usize = 5;

// Notification defaults
pub(crate) const NOTICE_DURATION_MS: u64 = 3000;

// Storage defaults
pub(crate) const BINDINGS_KEY: &str = "bindings";
pub(crate) const PENDING_SELECTION_KEY: &str = "pendingSelection";
pub(crate) const SYNC_QUOTA_BYTES: usize = 8192;

// Serde default functions
pub(crate) fn default_highlight_outline() -> String {
    HIGHLIGHT_OUTLINE.to_string()
}
pub(crate) fn default_highlight_offset() -> String {
    HIGHLIGHT_OFFSET.to_string()
}
pub(crate) fn default_hint_id() -> String {
    HINT_ID.to_string()
}
pub(crate) fn default_hint_text() -> String {
    HINT_TEXT.to_string()
}
pub(crate) fn default_cursor() -> String {
    CURSOR.to_string()
}
pub(crate) const fn default_climb_depth() -> usize {
    CLIMB_DEPTH
}
pub(crate) const fn default_selector_max_depth() -> usize {
    SELECTOR_MAX_DEPTH
}
pub(crate) const fn default_notice_duration_ms() -> u64 {
    NOTICE_DURATION_MS
}
pub(crate) fn default_bindings_key() -> String {
    BINDINGS_KEY.to_string()
}
pub(crate) fn default_pending_selection_key() -> String {
    PENDING_SELECTION_KEY.to_string()
}
pub(crate) const fn default_sync_quota_bytes() -> Option<usize> {
    Some(SYNC_QUOTA_BYTES)
}
