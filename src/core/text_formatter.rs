//! Human-readable text formatter
//!
//! Two layouts are produced:
//! - colored (terminal or `force_colors`):
//!   `INFO[0001] message                                       key=value`
//! - plain logfmt otherwise: `time="..." level=info msg=message key=value`

use super::caller::CallerPrettifier;
use super::error::Result;
use super::fields::Fields;
use super::formatter::{caller_pair, prefix_field_clashes, FieldMap, FormatContext, Formatter};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Width the message is padded to in the colored layout
const MESSAGE_COLUMN_WIDTH: usize = 44;

/// Custom key ordering; receives every key that will be written
pub type SortingFn = Arc<dyn Fn(&mut Vec<String>) + Send + Sync>;

/// Text formatter configuration
///
/// # Examples
///
/// ```
/// use rust_structured_log::core::TextFormatter;
///
/// let formatter = TextFormatter::new()
///     .with_disable_colors(true)
///     .with_disable_timestamp(true);
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFormatter {
    /// Use the colored layout even when the output is not a terminal
    pub force_colors: bool,
    /// Never use the colored layout
    pub disable_colors: bool,
    /// Quote every value
    pub force_quote: bool,
    /// Never quote values
    pub disable_quote: bool,
    /// Quote empty values
    pub quote_empty_fields: bool,
    /// Omit the timestamp entirely
    pub disable_timestamp: bool,
    /// Colored layout shows the wall-clock timestamp instead of the elapsed counter
    pub full_timestamp: bool,
    pub timestamp_format: TimestampFormat,
    /// Keep fields in insertion order
    pub disable_sorting: bool,
    #[serde(skip)]
    pub sorting_fn: Option<SortingFn>,
    /// Show the full uppercase level name instead of the four letter tag
    pub disable_level_truncation: bool,
    /// Pad the full level name to the widest level
    pub pad_level_text: bool,
    pub field_map: FieldMap,
    #[serde(skip)]
    pub caller_prettifier: Option<CallerPrettifier>,
}

impl fmt::Debug for TextFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFormatter")
            .field("force_colors", &self.force_colors)
            .field("disable_colors", &self.disable_colors)
            .field("force_quote", &self.force_quote)
            .field("disable_quote", &self.disable_quote)
            .field("quote_empty_fields", &self.quote_empty_fields)
            .field("disable_timestamp", &self.disable_timestamp)
            .field("full_timestamp", &self.full_timestamp)
            .field("timestamp_format", &self.timestamp_format)
            .field("disable_sorting", &self.disable_sorting)
            .field("sorting_fn", &self.sorting_fn.is_some())
            .field("disable_level_truncation", &self.disable_level_truncation)
            .field("pad_level_text", &self.pad_level_text)
            .field("field_map", &self.field_map)
            .field("caller_prettifier", &self.caller_prettifier.is_some())
            .finish()
    }
}

impl TextFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_force_colors(mut self, force: bool) -> Self {
        self.force_colors = force;
        self
    }

    #[must_use]
    pub fn with_disable_colors(mut self, disable: bool) -> Self {
        self.disable_colors = disable;
        self
    }

    #[must_use]
    pub fn with_force_quote(mut self, force: bool) -> Self {
        self.force_quote = force;
        self
    }

    #[must_use]
    pub fn with_disable_quote(mut self, disable: bool) -> Self {
        self.disable_quote = disable;
        self
    }

    #[must_use]
    pub fn with_quote_empty_fields(mut self, quote: bool) -> Self {
        self.quote_empty_fields = quote;
        self
    }

    #[must_use]
    pub fn with_disable_timestamp(mut self, disable: bool) -> Self {
        self.disable_timestamp = disable;
        self
    }

    #[must_use]
    pub fn with_full_timestamp(mut self, full: bool) -> Self {
        self.full_timestamp = full;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_disable_sorting(mut self, disable: bool) -> Self {
        self.disable_sorting = disable;
        self
    }

    #[must_use]
    pub fn with_sorting_fn(mut self, sort: SortingFn) -> Self {
        self.sorting_fn = Some(sort);
        self
    }

    #[must_use]
    pub fn with_disable_level_truncation(mut self, disable: bool) -> Self {
        self.disable_level_truncation = disable;
        self
    }

    #[must_use]
    pub fn with_pad_level_text(mut self, pad: bool) -> Self {
        self.pad_level_text = pad;
        self
    }

    #[must_use]
    pub fn with_field_map(mut self, field_map: FieldMap) -> Self {
        self.field_map = field_map;
        self
    }

    #[must_use]
    pub fn with_caller_prettifier(mut self, prettifier: CallerPrettifier) -> Self {
        self.caller_prettifier = Some(prettifier);
        self
    }

    fn is_colored(&self, ctx: &FormatContext) -> bool {
        (self.force_colors || ctx.terminal) && !self.disable_colors
    }

    fn level_text(&self, level: LogLevel) -> String {
        if self.pad_level_text {
            format!("{:<width$}", level.upper(), width = LogLevel::max_name_len())
        } else if self.disable_level_truncation {
            level.upper().to_string()
        } else {
            level.abbreviation().to_string()
        }
    }

    fn needs_quoting(&self, text: &str) -> bool {
        if self.force_quote {
            return true;
        }
        if self.quote_empty_fields && text.is_empty() {
            return true;
        }
        if self.disable_quote {
            return false;
        }
        !text.chars().all(|ch| {
            ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '/' | '@' | '^' | '+')
        })
    }

    fn render_value(&self, text: &str) -> String {
        if self.needs_quoting(text) {
            quote(text)
        } else {
            text.to_string()
        }
    }

    fn write_colored(
        &self,
        out: &mut String,
        entry: &LogEntry,
        keys: &[String],
        data: &Fields,
        ctx: &FormatContext,
    ) {
        let color = entry.level.color_code().to_fg_str();
        let message = sanitize_message(entry.message.strip_suffix('\n').unwrap_or(&entry.message));

        let caller = match &entry.caller {
            Some(frame) => {
                let (function, file) =
                    caller_pair(frame, self.caller_prettifier.as_ref(), |frame| {
                        let function = if frame.function.is_empty() {
                            String::new()
                        } else {
                            format!("{}()", frame.function)
                        };
                        (function, frame.file_line())
                    });
                match (function.is_empty(), file.is_empty()) {
                    (_, true) => function,
                    (true, false) => file,
                    (false, false) => format!("{} {}", file, function),
                }
            }
            None => String::new(),
        };

        out.push_str(&format!(
            "\x1b[{}m{}\x1b[0m",
            color,
            self.level_text(entry.level)
        ));
        if !self.disable_timestamp {
            if self.full_timestamp {
                out.push_str(&format!("[{}]", self.timestamp_format.format(&entry.timestamp)));
            } else {
                let elapsed = (entry.timestamp - ctx.base_timestamp).num_seconds();
                out.push_str(&format!("[{:04}]", elapsed));
            }
        }
        out.push_str(&format!(
            "{} {:<width$} ",
            caller,
            message,
            width = MESSAGE_COLUMN_WIDTH
        ));

        for key in keys {
            let value = data.get(key).map(|v| v.to_string()).unwrap_or_default();
            out.push_str(&format!(
                " \x1b[{}m{}\x1b[0m={}",
                color,
                key,
                self.render_value(&value)
            ));
        }
    }

    fn write_plain(&self, out: &mut String, entry: &LogEntry, data_keys: Vec<String>, data: &Fields) {
        let map = &self.field_map;
        let mut fixed: Vec<(String, String)> = Vec::with_capacity(5);

        if !self.disable_timestamp {
            fixed.push((map.time.clone(), self.timestamp_format.format(&entry.timestamp)));
        }
        fixed.push((map.level.clone(), entry.level.as_str().to_string()));
        if !entry.message.is_empty() {
            fixed.push((map.msg.clone(), entry.message.clone()));
        }
        if let Some(frame) = &entry.caller {
            let (function, file) = caller_pair(frame, self.caller_prettifier.as_ref(), |frame| {
                (frame.function.clone(), frame.file_line())
            });
            if !function.is_empty() {
                fixed.push((map.func.clone(), function));
            }
            if !file.is_empty() {
                fixed.push((map.file.clone(), file));
            }
        }

        let mut keys: Vec<String> = fixed.iter().map(|(key, _)| key.clone()).collect();
        keys.extend(data_keys);
        if let (false, Some(sort)) = (self.disable_sorting, &self.sorting_fn) {
            sort(&mut keys);
        }

        for key in &keys {
            let value = match fixed.iter().find(|(fixed_key, _)| fixed_key == key) {
                Some((_, value)) => value.clone(),
                None => data.get(key).map(|v| v.to_string()).unwrap_or_default(),
            };
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(&self.render_value(&value));
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, entry: &LogEntry, ctx: &mut FormatContext) -> Result<Vec<u8>> {
        let data = prefix_field_clashes(
            &entry.fields,
            &self.field_map,
            entry.has_caller(),
            self.name(),
            ctx,
        );

        let mut keys: Vec<String> = data.keys().map(str::to_string).collect();
        if !self.disable_sorting && self.sorting_fn.is_none() {
            keys.sort();
        }

        let mut out = String::with_capacity(128);
        if self.is_colored(ctx) {
            if let (false, Some(sort)) = (self.disable_sorting, &self.sorting_fn) {
                sort(&mut keys);
            }
            self.write_colored(&mut out, entry, &keys, &data, ctx);
        } else {
            self.write_plain(&mut out, entry, keys, &data);
        }
        out.push('\n');

        Ok(out.into_bytes())
    }

    fn name(&self) -> &str {
        "text"
    }
}

/// Keep a colored record on one line
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Double-quote `text`, escaping quotes, backslashes and control characters
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{07}' => quoted.push_str("\\a"),
            '\u{08}' => quoted.push_str("\\b"),
            '\u{0b}' => quoted.push_str("\\v"),
            '\u{0c}' => quoted.push_str("\\f"),
            c if c.is_control() => {
                let code = u32::from(c);
                if code < 0x80 {
                    quoted.push_str(&format!("\\x{:02x}", code));
                } else {
                    quoted.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::caller::Frame;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn ts(seconds: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2019, 3, 11, 23, 23, seconds)
            .single()
            .expect("valid datetime")
    }

    fn render(formatter: &TextFormatter, entry: &LogEntry, terminal: bool) -> String {
        let mut ctx = FormatContext::new(terminal, ts(40));
        String::from_utf8(formatter.format(entry, &mut ctx).unwrap()).unwrap()
    }

    fn walrus_entry() -> LogEntry {
        LogEntry::new(LogLevel::Warn, "foo")
            .with_timestamp(ts(44))
            .with_fields(Fields::new().with("number", 0).with("animal", "walrus"))
    }

    #[test]
    fn test_plain_layout_with_timestamp() {
        let out = render(&TextFormatter::new(), &walrus_entry(), false);
        assert_eq!(
            out,
            "time=\"2019-03-11T23:23:44+09:00\" level=warning msg=foo animal=walrus number=0\n"
        );
    }

    #[test]
    fn test_plain_layout_without_timestamp() {
        let formatter = TextFormatter::new().with_disable_timestamp(true);
        let out = render(&formatter, &walrus_entry(), false);
        assert_eq!(out, "level=warning msg=foo animal=walrus number=0\n");
        assert!(!out.contains("time="));
    }

    #[test]
    fn test_plain_layout_quotes_message() {
        let formatter = TextFormatter::new().with_disable_timestamp(true);
        let entry = LogEntry::new(LogLevel::Info, "Went to the beach")
            .with_fields(Fields::new().with("temperature", -4));
        assert_eq!(
            render(&formatter, &entry, false),
            "level=info msg=\"Went to the beach\" temperature=-4\n"
        );
    }

    #[test]
    fn test_plain_layout_omits_empty_message() {
        let formatter = TextFormatter::new().with_disable_timestamp(true);
        let entry = LogEntry::new(LogLevel::Info, "").with_fields(Fields::new().with("k", "v"));
        assert_eq!(render(&formatter, &entry, false), "level=info k=v\n");
    }

    #[test]
    fn test_disable_sorting_keeps_insertion_order() {
        let formatter = TextFormatter::new()
            .with_disable_timestamp(true)
            .with_disable_sorting(true);
        assert_eq!(
            render(&formatter, &walrus_entry(), false),
            "level=warning msg=foo number=0 animal=walrus\n"
        );
    }

    #[test]
    fn test_sorting_fn_sees_all_keys_in_plain_layout() {
        let formatter = TextFormatter::new()
            .with_disable_timestamp(true)
            .with_sorting_fn(Arc::new(|keys: &mut Vec<String>| keys.reverse()));
        assert_eq!(
            render(&formatter, &walrus_entry(), false),
            "animal=walrus number=0 msg=foo level=warning\n"
        );
    }

    #[test]
    fn test_quoting_rules() {
        let formatter = TextFormatter::new();
        assert!(!formatter.needs_quoting("walrus"));
        assert!(!formatter.needs_quoting("-4"));
        assert!(!formatter.needs_quoting("a.b/c@d^e+f_g"));
        assert!(!formatter.needs_quoting(""));
        assert!(formatter.needs_quoting("two words"));
        assert!(formatter.needs_quoting("k=v"));
        assert!(formatter.needs_quoting("say \"hi\""));

        assert!(TextFormatter::new().with_force_quote(true).needs_quoting("walrus"));
        assert!(TextFormatter::new().with_quote_empty_fields(true).needs_quoting(""));
        assert!(!TextFormatter::new().with_disable_quote(true).needs_quoting("two words"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("It's over 9000!"), "\"It's over 9000!\"");
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(quote("line\nbreak\u{1}"), "\"line\\nbreak\\x01\"");
    }

    #[test]
    fn test_colored_layout_uses_elapsed_counter() {
        let entry = LogEntry::new(LogLevel::Info, "foo").with_timestamp(ts(41));
        let out = render(&TextFormatter::new(), &entry, true);
        assert_eq!(out, format!("\x1b[36mINFO\x1b[0m[0001] {:<44} \n", "foo"));
    }

    #[test]
    fn test_force_colors_without_terminal() {
        let formatter = TextFormatter::new().with_force_colors(true);
        let out = render(&formatter, &walrus_entry(), false);
        assert_eq!(
            out,
            format!(
                "\x1b[33mWARN\x1b[0m[0004] {:<44}  \x1b[33manimal\x1b[0m=walrus \x1b[33mnumber\x1b[0m=0\n",
                "foo"
            )
        );
    }

    #[test]
    fn test_disable_colors_wins_over_terminal() {
        let formatter = TextFormatter::new()
            .with_disable_colors(true)
            .with_disable_timestamp(true);
        let out = render(&formatter, &walrus_entry(), true);
        assert_eq!(out, "level=warning msg=foo animal=walrus number=0\n");
    }

    #[test]
    fn test_colored_full_timestamp() {
        let formatter = TextFormatter::new()
            .with_force_colors(true)
            .with_full_timestamp(true);
        let entry = LogEntry::new(LogLevel::Error, "boom").with_timestamp(ts(44));
        let out = render(&formatter, &entry, false);
        assert!(out.starts_with("\x1b[31mERRO\x1b[0m[2019-03-11T23:23:44+09:00] boom"));
    }

    #[test]
    fn test_colored_disable_timestamp_leaves_no_separator() {
        let formatter = TextFormatter::new()
            .with_force_colors(true)
            .with_disable_timestamp(true);
        let entry = LogEntry::new(LogLevel::Debug, "foo");
        let out = render(&formatter, &entry, false);
        assert!(out.starts_with("\x1b[37mDEBU\x1b[0m foo"));
    }

    #[test]
    fn test_level_text_variants() {
        let formatter = TextFormatter::new();
        assert_eq!(formatter.level_text(LogLevel::Warn), "WARN");
        let formatter = TextFormatter::new().with_disable_level_truncation(true);
        assert_eq!(formatter.level_text(LogLevel::Warn), "WARNING");
        let formatter = TextFormatter::new().with_pad_level_text(true);
        assert_eq!(formatter.level_text(LogLevel::Info), "INFO   ");
    }

    #[test]
    fn test_colored_caller_segment() {
        let frame = Frame {
            function: "app::run".to_string(),
            file: "src/app.rs".to_string(),
            line: 35,
        };
        let entry = LogEntry::new(LogLevel::Info, "foo").with_caller(frame);
        let formatter = TextFormatter::new()
            .with_force_colors(true)
            .with_disable_timestamp(true);

        let out = render(&formatter, &entry, false);
        assert!(out.starts_with("\x1b[36mINFO\x1b[0msrc/app.rs:35 app::run() foo"), "{:?}", out);

        let formatter = formatter.with_caller_prettifier(Arc::new(|_frame: &Frame| {
            ("++bar++".to_string(), "--baz--".to_string())
        }));
        let out = render(&formatter, &entry, false);
        assert!(out.starts_with("\x1b[36mINFO\x1b[0m--baz-- ++bar++ foo"), "{:?}", out);
    }

    #[test]
    fn test_prettifier_output_is_not_extended_with_line() {
        let frame = Frame {
            function: "app::run".to_string(),
            file: "src/app.rs".to_string(),
            line: 35,
        };
        let entry = LogEntry::new(LogLevel::Info, "foo").with_caller(frame);
        let formatter = TextFormatter::new()
            .with_disable_timestamp(true)
            .with_caller_prettifier(Arc::new(|frame: &Frame| {
                (frame.short_function().to_string(), frame.file_name().to_string())
            }));

        assert_eq!(
            render(&formatter, &entry, false),
            "level=info msg=foo func=run file=app.rs\n"
        );
    }

    #[test]
    fn test_plain_caller_keys() {
        let frame = Frame {
            function: String::new(),
            file: "src/app.rs".to_string(),
            line: 9,
        };
        let entry = LogEntry::new(LogLevel::Info, "foo").with_caller(frame);
        let formatter = TextFormatter::new().with_disable_timestamp(true);
        assert_eq!(
            render(&formatter, &entry, false),
            "level=info msg=foo file=\"src/app.rs:9\"\n"
        );
    }

    #[test]
    fn test_reserved_key_is_prefixed() {
        let formatter = TextFormatter::new().with_disable_timestamp(true);
        let entry = LogEntry::new(LogLevel::Info, "foo")
            .with_fields(Fields::new().with("level", "shadow"));
        let mut ctx = FormatContext::new(false, ts(40));
        let out = String::from_utf8(formatter.format(&entry, &mut ctx).unwrap()).unwrap();

        assert_eq!(out, "level=info msg=foo fields.level=shadow\n");
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn test_colored_message_stays_on_one_line() {
        let formatter = TextFormatter::new()
            .with_force_colors(true)
            .with_disable_timestamp(true);
        let entry = LogEntry::new(LogLevel::Info, "first\nsecond\n");
        let out = render(&formatter, &entry, false);
        assert_eq!(out.matches('\n').count(), 1);
        assert!(out.contains("first\\nsecond "));
    }
}
