use super::ServiceMessageEncoder;
use crate::events::{Formatter, TestEvent, TestEventKind};
use crate::sink::MemorySink;
use crate::throwable::{Throwable, ThrowableKind};
use svcmsg_core::{parse_service_message_line, TimestampZone};

const TS: i64 = 1_220_436_154_287;

fn encoder() -> ServiceMessageEncoder {
    ServiceMessageEncoder::new(TimestampZone::Utc)
}

fn render(event: TestEvent) -> Vec<String> {
    encoder()
        .encode(&event)
        .iter()
        .map(|line| line.render())
        .collect()
}

fn event(kind: TestEventKind) -> TestEvent {
    TestEvent::new(TS, kind)
}

fn failed(throwable: Option<Throwable>, duration: Option<u64>) -> TestEvent {
    event(TestEventKind::TestFailed {
        test_name: "t".to_string(),
        suite_name: None,
        message: "boom".to_string(),
        duration,
        throwable,
    })
}

#[test]
fn run_starting_has_no_leading_blank_line() {
    let lines = render(event(TestEventKind::RunStarting { test_count: 3 }));
    assert_eq!(lines, ["##teamcity[testCount count='3']"]);
}

#[test]
fn test_starting_captures_standard_output() {
    let lines = render(event(TestEventKind::TestStarting {
        test_name: "a b".to_string(),
        suite_name: Some("Spec".to_string()),
    }));
    assert_eq!(
        lines,
        ["\n##teamcity[testStarted name='a b' captureStandardOutput='true']"]
    );
}

#[test]
fn test_succeeded_without_duration_reports_zero() {
    let lines = render(event(TestEventKind::TestSucceeded {
        test_name: "works".to_string(),
        suite_name: None,
        duration: None,
        formatter: None,
    }));
    assert_eq!(lines, ["\n##teamcity[testFinished name='works' duration='0']"]);
}

#[test]
fn test_succeeded_with_indented_text_emits_info_message_first() {
    let lines = render(event(TestEventKind::TestSucceeded {
        test_name: "works".to_string(),
        suite_name: None,
        duration: Some(17),
        formatter: Some(Formatter::indented_text("- works")),
    }));
    assert_eq!(
        lines,
        [
            "\n##teamcity[message text='- works|n' status='INFO']",
            "\n##teamcity[testFinished name='works' duration='17']",
        ]
    );
}

#[test]
fn test_succeeded_ignores_other_formatter_shapes() {
    let lines = render(event(TestEventKind::TestSucceeded {
        test_name: "works".to_string(),
        suite_name: None,
        duration: Some(1),
        formatter: Some(Formatter::MotionToSuppress),
    }));
    assert_eq!(lines, ["\n##teamcity[testFinished name='works' duration='1']"]);
}

#[test]
fn test_failed_with_plain_assertion_is_soft_failure() {
    let lines = render(failed(Some(Throwable::assertion("boom")), Some(42)));
    assert_eq!(
        lines,
        [
            "\n##teamcity[testFailed name='t' message='boom' details='java.lang.AssertionError: boom' timestamp='2008-09-03T10:02:34.287+0000']",
            "\n##teamcity[testFinished name='t' duration='42']",
        ]
    );
}

#[test]
fn test_failed_with_other_error_is_hard_error() {
    let throwable = Throwable::new("java.lang.NullPointerException").with_frame("a.B.c(B.scala:1)");
    let encoded = encoder().encode(&failed(Some(throwable), None));
    assert_eq!(encoded.len(), 2);
    let failed_line = &encoded[0].message;
    assert_eq!(failed_line.name(), "testFailed");
    let keys = failed_line
        .attributes()
        .iter()
        .map(|(key, _)| key.as_str())
        .collect::<Vec<_>>();
    assert_eq!(keys, ["name", "message", "details", "error", "timestamp"]);
    assert_eq!(failed_line.attribute("error").as_deref(), Some("true"));
    assert_eq!(
        failed_line.attribute("details").as_deref(),
        Some("java.lang.NullPointerException\n\tat a.B.c(B.scala:1)")
    );
    assert_eq!(
        encoded[1].render(),
        "\n##teamcity[testFinished name='t' duration='0']"
    );
}

#[test]
fn test_failed_without_throwable_is_hard_error_with_empty_details() {
    let encoded = encoder().encode(&failed(None, Some(5)));
    let failed_line = &encoded[0].message;
    assert_eq!(failed_line.attribute("details").as_deref(), Some(""));
    assert_eq!(failed_line.attribute("error").as_deref(), Some("true"));
}

#[test]
fn test_failed_explicit_assertion_kind_is_soft() {
    let throwable = Throwable::new("org.scalatest.Custom").with_kind(ThrowableKind::AssertionFailure);
    let encoded = encoder().encode(&failed(Some(throwable), None));
    assert!(!encoded[0].message.has_attribute("error"));
}

#[test]
fn test_failed_escapes_name_and_message() {
    let encoded = encoder().encode(&event(TestEventKind::TestFailed {
        test_name: "it's [x]".to_string(),
        suite_name: None,
        message: "line1\nline2|".to_string(),
        duration: None,
        throwable: None,
    }));
    let rendered = encoded[0].render();
    assert!(rendered.contains("name='it|'s |[x|]'"));
    assert!(rendered.contains("message='line1|nline2||'"));
}

#[test]
fn test_ignored_has_empty_message() {
    let lines = render(event(TestEventKind::TestIgnored {
        test_name: "later".to_string(),
        suite_name: None,
    }));
    assert_eq!(lines, ["\n##teamcity[testIgnored name='later' message='']"]);
}

#[test]
fn test_pending_forces_zero_duration() {
    let lines = render(event(TestEventKind::TestPending {
        test_name: "todo".to_string(),
        suite_name: None,
        duration: Some(999),
    }));
    assert_eq!(lines, ["\n##teamcity[testFinished name='todo' duration='0']"]);
}

#[test]
fn suite_start_and_completion() {
    assert_eq!(
        render(event(TestEventKind::SuiteStarting {
            suite_name: "MathSpec".to_string()
        })),
        ["\n##teamcity[testSuiteStarted name='MathSpec']"]
    );
    assert_eq!(
        render(event(TestEventKind::SuiteCompleted {
            suite_name: "MathSpec".to_string(),
            duration: Some(10),
        })),
        ["\n##teamcity[testSuiteFinished name='MathSpec']"]
    );
}

#[test]
fn suite_aborted_reports_error_with_details() {
    let lines = render(event(TestEventKind::SuiteAborted {
        message: "setup failed".to_string(),
        suite_name: Some("DbSpec".to_string()),
        throwable: Some(Throwable::new("java.sql.SQLException").with_message("no db")),
    }));
    assert_eq!(
        lines,
        ["\n##teamcity[message text='setup failed' status='ERROR' errorDetails='java.sql.SQLException: no db']"]
    );
}

#[test]
fn suite_aborted_without_throwable_has_no_details() {
    let lines = render(event(TestEventKind::SuiteAborted {
        message: "gone".to_string(),
        suite_name: None,
        throwable: None,
    }));
    assert_eq!(lines, ["\n##teamcity[message text='gone' status='ERROR']"]);
}

#[test]
fn aborts_with_empty_message_emit_nothing_even_with_throwable() {
    let throwable = Some(Throwable::new("java.lang.Error"));
    assert!(render(event(TestEventKind::SuiteAborted {
        message: String::new(),
        suite_name: None,
        throwable: throwable.clone(),
    }))
    .is_empty());
    assert!(render(event(TestEventKind::RunAborted {
        message: String::new(),
        throwable,
    }))
    .is_empty());
}

#[test]
fn run_aborted_reports_error() {
    let lines = render(event(TestEventKind::RunAborted {
        message: "out of memory".to_string(),
        throwable: Some(Throwable::new("java.lang.OutOfMemoryError")),
    }));
    assert_eq!(
        lines,
        ["\n##teamcity[message text='out of memory' status='ERROR' errorDetails='java.lang.OutOfMemoryError']"]
    );
}

#[test]
fn info_provided_appends_protocol_line_break() {
    let lines = render(event(TestEventKind::InfoProvided {
        message: "Given a stack  \n".to_string(),
        formatter: None,
    }));
    assert_eq!(
        lines,
        ["\n##teamcity[message text='Given a stack:|n' status='INFO']"]
    );
}

#[test]
fn info_provided_prefers_indented_text() {
    let lines = render(event(TestEventKind::InfoProvided {
        message: "raw".to_string(),
        formatter: Some(Formatter::indented_text("  + formatted 'note'")),
    }));
    assert_eq!(
        lines,
        ["\n##teamcity[message text='  + formatted |'note|':|n' status='INFO']"]
    );
}

#[test]
fn info_provided_blank_text_emits_nothing() {
    assert!(render(event(TestEventKind::InfoProvided {
        message: " \t\n".to_string(),
        formatter: None,
    }))
    .is_empty());
    assert!(render(event(TestEventKind::InfoProvided {
        message: "raw is ignored".to_string(),
        formatter: Some(Formatter::indented_text("   ")),
    }))
    .is_empty());
}

#[test]
fn info_provided_strips_only_ascii_trailing_whitespace() {
    let lines = render(event(TestEventKind::InfoProvided {
        message: "done\u{00A0}\t\u{0B}\u{0C}\r\n ".to_string(),
        formatter: None,
    }));
    assert_eq!(
        lines,
        ["\n##teamcity[message text='done\u{00A0}:|n' status='INFO']"]
    );

    let lines = render(event(TestEventKind::InfoProvided {
        message: "\u{2028}".to_string(),
        formatter: None,
    }));
    assert_eq!(lines, ["\n##teamcity[message text='|l:|n' status='INFO']"]);
}

#[test]
fn terminal_run_events_emit_nothing() {
    assert!(render(event(TestEventKind::RunStopped)).is_empty());
    assert!(render(event(TestEventKind::RunCompleted)).is_empty());
}

#[test]
fn every_line_parses_back() {
    let events = [
        event(TestEventKind::RunStarting { test_count: 1 }),
        event(TestEventKind::TestStarting {
            test_name: "weird 'name' [1]".to_string(),
            suite_name: None,
        }),
        failed(Some(Throwable::new("x.Y").with_message("multi\nline")), Some(3)),
    ];
    for item in &events {
        for line in encoder().encode(item) {
            let parsed = parse_service_message_line(line.render().as_str()).expect("must parse");
            assert_eq!(parsed, line.message);
        }
    }
}

#[test]
fn report_writes_lines_in_order() {
    let mut sink = MemorySink::new();
    let encoder = encoder();
    let written = encoder
        .report(&failed(None, Some(7)), &mut sink)
        .expect("must write");
    assert_eq!(written, 2);
    assert!(sink.lines()[0].starts_with("\n##teamcity[testFailed "));
    assert_eq!(sink.lines()[1], "\n##teamcity[testFinished name='t' duration='7']");
}

#[test]
fn interleaved_events_keep_input_order() {
    let mut sink = MemorySink::new();
    let encoder = encoder();
    let sequence = [
        event(TestEventKind::TestStarting {
            test_name: "a".to_string(),
            suite_name: None,
        }),
        event(TestEventKind::TestStarting {
            test_name: "b".to_string(),
            suite_name: None,
        }),
        event(TestEventKind::TestPending {
            test_name: "a".to_string(),
            suite_name: None,
            duration: None,
        }),
        event(TestEventKind::TestIgnored {
            test_name: "b".to_string(),
            suite_name: None,
        }),
    ];
    for item in &sequence {
        encoder.report(item, &mut sink).expect("must write");
    }
    let names = sink
        .lines()
        .iter()
        .map(|line| {
            let message = parse_service_message_line(line).expect("must parse");
            format!("{}:{}", message.name(), message.attribute("name").unwrap_or_default())
        })
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        ["testStarted:a", "testStarted:b", "testFinished:a", "testIgnored:b"]
    );
}
