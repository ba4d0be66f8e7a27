//! On-disk assertion logs and the structured record format.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{AssertInfo, Result};

/// File name of the human-readable assertion log.
pub const ASSERT_LOG: &str = "Asserts.log";

/// File name of the line-delimited structured assertion log.
pub const ASSERT_JSON_LOG: &str = "AssertsJson.log";

/// One structured assertion record, as appended to [`ASSERT_JSON_LOG`].
///
/// Keys for absent optional fields are omitted from the encoded object
/// rather than written as empty strings. `line`, `assert_key` and
/// `callstack_key` are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertRecord {
    /// Source file of the failed check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Enclosing function.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Source line of the failed check.
    pub line: u32,
    /// Source text of the failed expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
    /// Context message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Script-side call trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub py_trace: Option<String>,
    /// Native call trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dll_trace: Option<String>,
    /// Site fingerprint, see [`AssertInfo::assert_key`].
    pub assert_key: String,
    /// Trace fingerprint, see [`AssertInfo::callstack_key`].
    pub callstack_key: String,
}

impl AssertRecord {
    /// Build the structured record for an assertion event.
    pub fn from_info(info: &AssertInfo<'_>) -> Self {
        Self {
            file: present(info.file),
            function: present(info.function),
            line: info.line,
            expr: present(info.expr),
            msg: present(&info.message),
            py_trace: present(&info.script_trace),
            dll_trace: present(&info.native_trace),
            assert_key: info.assert_key(),
            callstack_key: info.callstack_key(),
        }
    }
}

fn present(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Format the fixed seven-field human-readable log entry.
pub(crate) fn plain_line(info: &AssertInfo<'_>) -> String {
    format!(
        "{} {} ({}): {},  {}\n{}\n{}",
        info.file,
        info.function,
        info.line,
        info.expr,
        info.message,
        info.script_trace,
        info.native_trace
    )
}

/// Append-only sink pair backing the logged operating mode.
///
/// Both files share one lock so a record's plain and structured entries
/// land together. Writes go straight to the file descriptors, so entries
/// survive an abort on the very next line.
pub(crate) struct LogSinks {
    files: Mutex<SinkFiles>,
}

struct SinkFiles {
    plain: File,
    json: File,
}

impl LogSinks {
    /// Open both log files under `dir`, creating the directory and the
    /// files as needed. Existing logs are appended to, never truncated.
    pub(crate) fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let plain = open_append(&dir.join(ASSERT_LOG))?;
        let json = open_append(&dir.join(ASSERT_JSON_LOG))?;
        Ok(Self {
            files: Mutex::new(SinkFiles { plain, json }),
        })
    }

    /// Append the plain entry and the structured record for `info`.
    ///
    /// Sink failures are absorbed and surfaced as log warnings; a failed
    /// assertion report must never fault the asserting caller.
    pub(crate) fn append(&self, info: &AssertInfo<'_>) {
        let record = AssertRecord::from_info(info);
        let mut files = self.files.lock();
        if let Err(err) = writeln!(files.plain, "{}", plain_line(info)) {
            log::warn!("failed to append to {}: {}", ASSERT_LOG, err);
        }
        match serde_json::to_string(&record) {
            Ok(line) => {
                if let Err(err) = writeln!(files.json, "{}", line) {
                    log::warn!("failed to append to {}: {}", ASSERT_JSON_LOG, err);
                }
            }
            Err(err) => log::warn!("failed to encode assert record: {}", err),
        }
    }
}

fn open_append(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssertInfo;

    #[test]
    fn test_plain_line_format() {
        let info = AssertInfo::new("a.cpp", "f", 42, "x>0")
            .with_message("x was -3")
            .with_script_trace("script.py:10")
            .with_native_trace("frame 0");
        assert_eq!(
            plain_line(&info),
            "a.cpp f (42): x>0,  x was -3\nscript.py:10\nframe 0"
        );
    }

    #[test]
    fn test_plain_line_keeps_slots_for_absent_fields() {
        let info = AssertInfo::new("a.cpp", "f", 42, "x>0");
        assert_eq!(plain_line(&info), "a.cpp f (42): x>0,  \n\n");
    }

    #[test]
    fn test_record_omits_absent_keys() {
        let info = AssertInfo::new("a.cpp", "f", 42, "x>0");
        let record = AssertRecord::from_info(&info);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"file\":\"a.cpp\""));
        assert!(json.contains("\"line\":42"));
        assert!(json.contains("\"assert_key\":\"a.cpp f (42): x>0\""));
        assert!(json.contains("\"callstack_key\""));
        assert!(!json.contains("\"msg\""));
        assert!(!json.contains("\"py_trace\""));
        assert!(!json.contains("\"dll_trace\""));
    }

    #[test]
    fn test_record_keeps_present_keys() {
        let info = AssertInfo::new("a.cpp", "f", 42, "x>0")
            .with_message("x was -3")
            .with_script_trace("script.py:10")
            .with_native_trace("frame 0");
        let record = AssertRecord::from_info(&info);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"msg\":\"x was -3\""));
        assert!(json.contains("\"py_trace\":\"script.py:10\""));
        assert!(json.contains("\"dll_trace\":\"frame 0\""));
    }

    #[test]
    fn test_record_round_trips_without_optional_keys() {
        let json = r#"{"line":7,"assert_key":"nofile nofunc (7): noexpr","callstack_key":"0"}"#;
        let record: AssertRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.line, 7);
        assert!(record.file.is_none());
        assert!(record.msg.is_none());
    }
}
