//! Call-site capture for caller reporting
//!
//! Every public logging entry point is `#[track_caller]`, and the
//! [`Location`] is resolved once at that boundary and handed down as a
//! plain argument. Internal helpers never look at the stack themselves, so
//! adding a chaining layer cannot shift the reported frame.
//!
//! The macros know the calling function at compile time. Plain method calls
//! only have a `Location`, so the function is looked up in the stack by file
//! and line once per call site and cached.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

/// A resolved call site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Fully qualified function path, empty when unknown
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl Frame {
    /// Build a frame from a captured location and an optional function path
    pub fn from_location(location: &Location<'_>, function: Option<&str>) -> Self {
        Self {
            function: function.unwrap_or_default().to_string(),
            file: location.file().to_string(),
            line: location.line(),
        }
    }

    /// `file:line`
    pub fn file_line(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }

    /// Last path segment of the function, e.g. `handler` for `app::api::handler`
    pub fn short_function(&self) -> &str {
        self.function
            .rsplit("::")
            .next()
            .unwrap_or(self.function.as_str())
    }

    /// File name without its directories
    pub fn file_name(&self) -> &str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file.as_str())
    }
}

/// Maps a frame to the `(function, file)` pair a formatter displays
///
/// The returned strings are used verbatim: no line number is appended.
pub type CallerPrettifier = Arc<dyn Fn(&Frame) -> (String, String) + Send + Sync>;

/// Strip the helper item and closure segments from a `type_name` path
#[doc(hidden)]
pub fn trim_function_name(name: &str) -> &str {
    let mut name = name.strip_suffix("::__logger_callsite").unwrap_or(name);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    name
}

/// Drop the `::h<16 hex>` disambiguator of a legacy-mangled symbol
fn strip_symbol_hash(name: &str) -> &str {
    match name.rsplit_once("::h") {
        Some((path, hash))
            if hash.len() == 16 && hash.chars().all(|ch| ch.is_ascii_hexdigit()) =>
        {
            path
        }
        _ => name,
    }
}

/// Function path of the innermost stack frame at `location`
///
/// Symbols are matched on file and line. When no symbol carries the exact
/// line (a call spread over several lines) the first frame in the same file
/// at or below that line is used. Without debug info nothing matches and
/// `None` is returned.
pub(crate) fn resolve_function(location: &Location<'_>) -> Option<String> {
    let file = Path::new(location.file());
    let mut exact = None;
    let mut nearby = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if exact.is_some() {
                return;
            }
            let in_file = symbol
                .filename()
                .is_some_and(|path| path.ends_with(file));
            let (Some(lineno), Some(name), true) = (symbol.lineno(), symbol.name(), in_file) else {
                return;
            };
            let name = format!("{:#}", name);
            let name = trim_function_name(strip_symbol_hash(&name)).to_string();
            if lineno == location.line() {
                exact = Some(name);
            } else if nearby.is_none() && lineno > location.line() {
                nearby = Some(name);
            }
        });
        exact.is_none()
    });

    exact.or(nearby)
}

/// Call-site to function cache for [`resolve_function`]
#[derive(Debug, Default)]
pub(crate) struct FunctionCache {
    entries: Mutex<HashMap<(&'static str, u32, u32), Option<Arc<str>>>>,
}

impl FunctionCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Resolve the function at `location`, walking the stack on first use only
    pub(crate) fn function_at(&self, location: &'static Location<'static>) -> Option<Arc<str>> {
        let key = (location.file(), location.line(), location.column());
        if let Some(cached) = self.entries.lock().get(&key) {
            return cached.clone();
        }

        // resolved without the lock held; a racing thread computes the same value
        let resolved: Option<Arc<str>> = resolve_function(location).map(Arc::from);
        self.entries.lock().insert(key, resolved.clone());
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_through_track_caller_helper() {
        #[track_caller]
        fn helper() -> Frame {
            Frame::from_location(Location::caller(), Some("outer::helper"))
        }

        let frame = helper();
        let expected_line = line!() - 1;
        assert_eq!(frame.file, file!());
        assert_eq!(frame.line, expected_line);
        assert_eq!(frame.function, "outer::helper");
    }

    #[test]
    fn test_resolve_function_from_location() {
        #[track_caller]
        fn resolve_here() -> Option<String> {
            resolve_function(Location::caller())
        }

        let function = resolve_here().expect("tests carry debug info");
        assert!(
            function.ends_with("caller::tests::test_resolve_function_from_location"),
            "{}",
            function
        );
    }

    #[test]
    fn test_function_cache_reuses_result() {
        #[track_caller]
        fn lookup(cache: &FunctionCache) -> Option<Arc<str>> {
            cache.function_at(Location::caller())
        }

        let cache = FunctionCache::new();
        let mut results = Vec::new();
        for _ in 0..2 {
            results.push(lookup(&cache));
        }
        assert_eq!(cache.entries.lock().len(), 1);
        assert_eq!(results[0], results[1]);
        assert!(results[0]
            .as_deref()
            .is_some_and(|name| name.ends_with("test_function_cache_reuses_result")));
    }

    #[test]
    fn test_strip_symbol_hash() {
        assert_eq!(strip_symbol_hash("app::run::h0123456789abcdef"), "app::run");
        assert_eq!(strip_symbol_hash("app::run"), "app::run");
        assert_eq!(strip_symbol_hash("app::hash_map"), "app::hash_map");
    }

    #[test]
    fn test_display_helpers() {
        let frame = Frame {
            function: "app::api::handler".to_string(),
            file: "src/api/handler.rs".to_string(),
            line: 42,
        };
        assert_eq!(frame.file_line(), "src/api/handler.rs:42");
        assert_eq!(frame.short_function(), "handler");
        assert_eq!(frame.file_name(), "handler.rs");
    }

    #[test]
    fn test_trim_function_name() {
        assert_eq!(
            trim_function_name("app::run::__logger_callsite"),
            "app::run"
        );
        assert_eq!(
            trim_function_name("app::run::{{closure}}::{{closure}}::__logger_callsite"),
            "app::run"
        );
    }

    #[test]
    fn test_function_name_macro() {
        let name = crate::function_name!();
        assert!(name.ends_with("caller::tests::test_function_name_macro"), "{}", name);
    }
}
