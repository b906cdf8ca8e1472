//! Events emitted while matching, captured through the global logging service

use abnf_stream::config::runtime::{init_engine_preferences, EnginePreferences};
use abnf_stream::logging::{self, codes, LogLevel, LoggingService, MemoryLogger};
use abnf_stream::syntax::match_source;
use std::sync::Arc;

// One test per binary: the global service and preferences can only be set once
#[test]
fn test_matching_emits_structured_events() {
    let memory = Arc::new(MemoryLogger::new());
    let service = LoggingService::new(memory.clone(), LogLevel::Debug);
    logging::init_global_logging_with_service(Arc::new(service)).unwrap();
    init_engine_preferences(EnginePreferences {
        trace_matches: true,
        log_nested_clones: true,
    })
    .unwrap();

    match_source("type grid array[array[int]]", "declaration").unwrap();

    let traced = memory
        .get_events()
        .iter()
        .filter(|event| event.message == "Token matched")
        .count();
    assert_eq!(traced, 10);
    assert!(!memory
        .get_events_with_code(codes::success::NESTED_INSTANCE_CREATED)
        .is_empty());
    assert!(!memory
        .get_events_with_code(codes::success::MATCH_COMPLETE)
        .is_empty());
    assert!(memory.get_errors().is_empty());

    memory.clear();
    assert!(match_source("var = 1", "var").is_err());

    let errors = memory.get_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, codes::syntax::UNEXPECTED_TOKEN);
    assert!(memory.has_error_with_code(codes::syntax::UNEXPECTED_TOKEN));
    assert!(errors[0].format_detailed().contains("Recommended action"));
}
