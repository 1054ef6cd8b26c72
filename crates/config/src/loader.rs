//! Parse and load settings.

use std::{ffi::OsStr, fs, path::Path};

use tracing::debug;

use crate::{Error, Settings, excerpt_at};

/// Parse settings from RON text and validate them.
pub fn from_ron(source: &str) -> Result<Settings, Error> {
    let settings: Settings = ron::from_str(source).map_err(|e| {
        let (line, col) = (e.span.start.line, e.span.start.col);
        Error::Parse {
            path: None,
            line,
            col,
            excerpt: excerpt_at(source, line, col),
            message: e.code.to_string(),
        }
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from a `.ron` file at `path`.
pub fn load_from_path(path: &Path) -> Result<Settings, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported settings format (expected a .ron file)".to_string(),
        });
    }
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let settings = from_ron(&source).map_err(|e| e.with_path(path))?;
    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use super::*;

    #[test]
    fn empty_settings_are_defaults() {
        let s = from_ron("()").expect("parse");
        assert_eq!(s, Settings::default());
        assert_eq!(s.picker.hint_id, "webkeybind-selector-tip");
        assert_eq!(s.picker.cursor, "crosshair");
        assert_eq!(s.selector.max_depth, 5);
        assert_eq!(s.storage.bindings_key, "bindings");
        assert_eq!(s.storage.sync_quota_bytes, Some(8192));
        assert_eq!(s.notifications.duration().as_millis(), 3000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let s = from_ron(
            "(picker: (climb_depth: 3, cursor: \"pointer\"), storage: (sync_quota_bytes: None))",
        )
        .expect("parse");
        assert_eq!(s.picker.climb_depth, 3);
        assert_eq!(s.picker.cursor, "pointer");
        assert_eq!(s.picker.highlight_outline, "2px solid #4CAF50");
        assert_eq!(s.storage.sync_quota_bytes, None);
        assert_eq!(s.storage.pending_selection_key, "pendingSelection");
    }

    #[test]
    fn unknown_field_is_a_located_parse_error() {
        let src = "(\n  picker: (\n    colour: \"red\",\n  ),\n)";
        match from_ron(src) {
            Err(Error::Parse { line, excerpt, .. }) => {
                assert_eq!(line, 3);
                assert!(excerpt.contains("    3 |     colour"), "{excerpt}");
                assert!(excerpt.contains('^'));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn syntax_error_location_comes_from_the_span() {
        let src = "(\n  selector: (\n\n    max_depth: ],\n  ),\n)";
        match from_ron(src) {
            Err(Error::Parse { line, col, .. }) => {
                assert_eq!(line, 4);
                assert!(col > 1, "col {col}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn validation_rejects_zero_depth() {
        assert!(matches!(
            from_ron("(selector: (max_depth: 0))"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            from_ron("(storage: (bindings_key: \"x\", pending_selection_key: \"x\"))"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn load_checks_extension_and_reads_file() {
        let dir = env::temp_dir().join(format!("wkb-config-{}", process::id()));
        fs::create_dir_all(&dir).expect("mkdir");
        let good = dir.join("settings.ron");
        fs::write(&good, "(notifications: (duration_ms: 1500))").expect("write");
        let s = load_from_path(&good).expect("load");
        assert_eq!(s.notifications.duration_ms, 1500);

        let wrong = dir.join("settings.json");
        assert!(matches!(load_from_path(&wrong), Err(Error::Read { .. })));

        let missing = dir.join("missing.ron");
        let err = load_from_path(&missing).expect_err("missing");
        assert_eq!(err.path(), Some(missing.as_path()));
        let _ignored = fs::remove_dir_all(&dir);
    }
}
