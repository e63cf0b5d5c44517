//! Property-based tests for rust_structured_log using proptest

use proptest::prelude::*;
use rust_structured_log::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

fn field_key() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn field_set() -> impl Strategy<Value = Fields> {
    prop::collection::vec((field_key(), any::<i64>()), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect::<Fields>())
}

fn memory_logger(output: &MemoryAppender, threshold: LogLevel) -> Logger {
    Logger::builder()
        .level(threshold)
        .appender(output.clone())
        .formatter(TextFormatter::new().with_disable_timestamp(true))
        .exit_handler(std::sync::Arc::new(|_: i32| {}))
        .build()
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Canonical names parse back to the same level
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.as_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Ordering follows the ordinal
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
    }

    /// Arbitrary strings either parse to a level or yield InvalidLevel
    #[test]
    fn test_log_level_parse_never_panics(name in "\\PC{0,12}") {
        match name.parse::<LogLevel>() {
            Ok(level) => prop_assert!(LogLevel::ALL.contains(&level)),
            Err(err) => prop_assert!(
                matches!(err, LoggerError::InvalidLevel { .. }),
                "expected InvalidLevel, got {}",
                err
            ),
        }
    }
}

// ============================================================================
// Filtering Tests
// ============================================================================

proptest! {
    /// A record is written iff its level is at least as severe as the threshold
    #[test]
    fn test_threshold_filtering(
        threshold in any_level(),
        level in any_level().prop_filter("panic unwinds", |l| *l != LogLevel::Panic)
    ) {
        let output = MemoryAppender::new();
        let logger = memory_logger(&output, threshold);

        logger.log(level, "probe");

        let expected = usize::from(level <= threshold);
        prop_assert_eq!(output.lines().len(), expected);
    }
}

// ============================================================================
// Field Set Tests
// ============================================================================

proptest! {
    /// Merging is associative
    #[test]
    fn test_merge_associative(a in field_set(), b in field_set(), c in field_set()) {
        let left = Fields::merge(&Fields::merge(&a, &b), &c);
        let right = Fields::merge(&a, &Fields::merge(&b, &c));
        prop_assert_eq!(left, right);
    }

    /// The later set wins on every shared key
    #[test]
    fn test_merge_right_biased(a in field_set(), b in field_set()) {
        let merged = Fields::merge(&a, &b);

        for (key, value) in b.iter() {
            prop_assert_eq!(merged.get(key), Some(value));
        }
        for (key, value) in a.iter() {
            if !b.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    /// Sorted keys are sorted and complete
    #[test]
    fn test_keys_sorted(fields in field_set()) {
        let sorted = fields.keys_sorted();
        prop_assert_eq!(sorted.len(), fields.len());
        prop_assert!(sorted.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// With the timestamp disabled no record contains `time=`
    #[test]
    fn test_disable_timestamp_has_no_time_key(
        message in "[a-zA-Z0-9 \"]{0,20}",
        fields in field_set().prop_filter("key ending in time", |f| !f.keys().any(|k| k.ends_with("time")))
    ) {
        let output = MemoryAppender::new();
        let logger = memory_logger(&output, LogLevel::Info);

        logger.with_fields(fields).info(message);

        prop_assert!(!output.contents().contains("time="));
    }

    /// JSON records decode to exactly the original fields plus level and msg
    #[test]
    fn test_json_round_trip(
        message in "\\PC{0,20}",
        s in "\\PC{0,10}",
        i in any::<i64>(),
        f in (-4_000_000i32..4_000_000).prop_map(|n| f64::from(n) / 4.0),
        b in any::<bool>()
    ) {
        let output = MemoryAppender::new();
        let logger = Logger::builder()
            .appender(output.clone())
            .formatter(JsonFormatter::new().with_disable_timestamp(true))
            .build();

        logger
            .with_field("s", s.as_str())
            .with_field("i", i)
            .with_field("f", f)
            .with_field("b", b)
            .info(message.as_str());

        let record = output.contents();
        prop_assert!(record.ends_with('\n'));
        prop_assert_eq!(record.matches('\n').count(), 1);

        let parsed: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&record).unwrap();
        prop_assert_eq!(parsed.len(), 6);
        prop_assert_eq!(parsed["level"].as_str(), Some("info"));
        prop_assert_eq!(parsed["msg"].as_str(), Some(message.as_str()));
        prop_assert_eq!(parsed["s"].as_str(), Some(s.as_str()));
        prop_assert_eq!(parsed["i"].as_i64(), Some(i));
        prop_assert_eq!(parsed["f"].as_f64(), Some(f));
        prop_assert_eq!(parsed["b"].as_bool(), Some(b));
    }

    /// Text records are always a single newline-terminated line
    #[test]
    fn test_text_record_is_one_line(message in "\\PC{0,30}", value in "\\PC{0,30}") {
        let output = MemoryAppender::new();
        let logger = memory_logger(&output, LogLevel::Info);

        logger.with_field("value", value).info(message);

        let record = output.contents();
        prop_assert!(record.ends_with('\n'));
        prop_assert_eq!(record.matches('\n').count(), 1);
    }
}
