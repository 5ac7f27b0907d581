//! Tests for the error system.

use agenda::error::unified::*;
use agenda::error::*;

#[test]
fn error_api_creation() {
    let err = AgendaError::api(404, "Not found");
    assert!(matches!(&err, AgendaError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "API error (status 404): Not found");
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: AgendaError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
        expected_recovery: RecoverySuggestion,
    }

    let network_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: AgendaError::Authentication("bad-key".to_string()),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: AgendaError::RateLimited {
                retry_after_ms: Some(1000),
            },
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: AgendaError::Timeout(5000),
            expected_category: ErrorCategory::Timeout,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: AgendaError::Configuration("bad-config".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: AgendaError::Network(network_error),
            expected_category: ErrorCategory::Network,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: AgendaError::Serialization(serde_error),
            expected_category: ErrorCategory::Serialization,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: AgendaError::ToolValidation {
                tool_name: "create_calendar_event".to_string(),
                message: "missing required field 'summary'".to_string(),
            },
            expected_category: ErrorCategory::ToolValidation,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::LetModelRetry,
        },
        Case {
            error: AgendaError::ToolExecution {
                tool_name: "create_calendar_event".to_string(),
                message: "failed".to_string(),
            },
            expected_category: ErrorCategory::ToolExecution,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::LetModelRetry,
        },
        Case {
            error: AgendaError::api(401, "Unauthorized"),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: AgendaError::api(429, "Rate limited"),
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: AgendaError::api(503, "Server unavailable"),
            expected_category: ErrorCategory::Server,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: AgendaError::api(418, "Teapot"),
            expected_category: ErrorCategory::Api,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: AgendaError::Io(io_error),
            expected_category: ErrorCategory::Storage,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckStorage,
        },
        Case {
            error: AgendaError::Storage("corrupt".to_string()),
            expected_category: ErrorCategory::Storage,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckStorage,
        },
        Case {
            error: AgendaError::IterationLimit { max_iterations: 25 },
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: AgendaError::InvalidArgument("bad-arg".to_string()),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category);
        assert_eq!(case.error.is_retryable(), case.expected_retryable);
        assert_eq!(case.error.recovery_suggestion(), case.expected_recovery);
    }
}

#[test]
fn model_unavailable_inherits_inner_category() {
    let err = AgendaError::model_unavailable(AgendaError::api(503, "down"));
    assert_eq!(err.category(), ErrorCategory::Server);
    assert!(err.is_retryable());
    assert_eq!(err.to_string(), "Model unavailable: API error (status 503): down");
}

#[test]
fn model_unavailable_is_not_wrapped_twice() {
    let once = AgendaError::model_unavailable(AgendaError::Timeout(10));
    let twice = AgendaError::model_unavailable(once);
    match twice {
        AgendaError::ModelUnavailable(inner) => {
            assert!(matches!(*inner, AgendaError::Timeout(10)))
        }
        other => panic!("expected model unavailable, got {other:?}"),
    }
}

#[test]
fn model_unavailable_exposes_its_source() {
    use std::error::Error;
    let err = AgendaError::model_unavailable(AgendaError::Authentication("nope".into()));
    let source = err.source().expect("source");
    assert_eq!(source.to_string(), "Authentication error: nope");
}
