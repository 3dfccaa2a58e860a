//! Tests for dispatch module

use super::*;
use chorus_llm::{MockAdapter, Vendor, VendorConfig, FAILURE_SENTINEL};
use std::sync::atomic::Ordering;
use std::time::Duration;

const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

fn arc(adapter: MockAdapter) -> Arc<dyn ChatAdapter> {
    Arc::new(adapter)
}

#[tokio::test]
async fn test_all_fail_returns_every_failure() {
    let dispatcher = Dispatcher::with_adapters(vec![
        arc(MockAdapter::failing(Vendor::OpenAi, "gpt-4o-mini", "OpenAI Error: boom")),
        arc(MockAdapter::failing(Vendor::Claude, "claude-3-5-sonnet-20241022", "Claude Error: boom")),
        arc(MockAdapter::failing(Vendor::Gemini, "gemini-1.5-pro", "Gemini Error: boom")),
    ]);

    let report = dispatcher.dispatch("hello").await.unwrap();
    let wire = report.to_wire_map();

    assert_eq!(wire.len(), 3);
    assert!(wire.values().all(|v| v.starts_with(FAILURE_SENTINEL)));
    assert_eq!(report.successes().count(), 0);
    assert_eq!(report.cycle_cost(), 0.0);
    assert!(report.results.iter().all(|r| r.cost == 0.0 && r.input_tokens == 0));
}

#[tokio::test]
async fn test_partial_success_is_attributed() {
    let dispatcher = Dispatcher::with_adapters(vec![
        arc(MockAdapter::answering(Vendor::OpenAi, "gpt-4o", "answer from openai")),
        arc(MockAdapter::failing(Vendor::Claude, "claude-3-5-sonnet-20241022", "Claude Error: overloaded")),
        arc(MockAdapter::answering(Vendor::Ollama, "llama3.2", "answer from ollama")),
        arc(MockAdapter::failing(Vendor::Gemini, "gemini-1.5-pro", "Gemini Error: quota")),
    ]);

    let report = dispatcher.dispatch("question").await.unwrap();
    let wire = report.to_wire_map();

    assert_eq!(wire.len(), 4);
    assert_eq!(wire["OpenAI"], "answer from openai");
    assert_eq!(wire["Ollama"], "answer from ollama");
    assert_eq!(wire["Claude"], "❌ Claude Error: overloaded");
    assert_eq!(wire["Gemini"], "❌ Gemini Error: quota");

    assert_eq!(report.successes().count(), 2);
    assert_eq!(report.failures().count(), 2);

    let openai = report.get("openai").unwrap();
    assert!(openai.input_tokens > 0);
    assert!(openai.cost > 0.0);
    assert_eq!(report.get("Ollama").unwrap().cost, 0.0);
}

#[tokio::test]
async fn test_unconfigured_adapters_are_never_invoked() {
    let skipped = MockAdapter::unconfigured(Vendor::Claude, "claude-3-5-sonnet-20241022");
    let skipped_calls = skipped.call_counter();
    let used = MockAdapter::answering(Vendor::OpenAi, "gpt-4o-mini", "hi");
    let used_calls = used.call_counter();

    let dispatcher = Dispatcher::with_adapters(vec![arc(skipped), arc(used)]);
    let report = dispatcher.dispatch("hello").await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(skipped_calls.load(Ordering::SeqCst), 0);
    assert_eq!(used_calls.load(Ordering::SeqCst), 1);
    assert!(report.get("Claude").is_none());
}

#[tokio::test]
async fn test_no_available_adapters_is_an_error() {
    let dispatcher = Dispatcher::with_adapters(vec![
        arc(MockAdapter::unconfigured(Vendor::OpenAi, "gpt-4o-mini")),
        arc(MockAdapter::unconfigured(Vendor::Ollama, "llama3.2")),
    ]);
    assert!(matches!(dispatcher.dispatch("hello").await, Err(Error::NoProviders)));

    let empty = Dispatcher::with_adapters(Vec::new());
    assert!(matches!(empty.dispatch("hello").await, Err(Error::NoProviders)));
}

#[tokio::test]
async fn test_adapters_run_concurrently() {
    let delay = Duration::from_millis(300);
    let dispatcher = Dispatcher::with_adapters(vec![
        arc(MockAdapter::answering(Vendor::OpenAi, "gpt-4o-mini", "a").with_delay(delay)),
        arc(MockAdapter::answering(Vendor::Claude, "claude-3-5-sonnet-20241022", "b").with_delay(delay)),
        arc(MockAdapter::answering(Vendor::Gemini, "gemini-1.5-pro", "c").with_delay(delay)),
    ]);

    let start = std::time::Instant::now();
    let report = dispatcher.dispatch("hello").await.unwrap();

    assert_eq!(report.successes().count(), 3);
    assert!(start.elapsed() < Duration::from_millis(800));
}

#[tokio::test]
async fn test_slow_vendor_does_not_swap_results() {
    let dispatcher = Dispatcher::with_adapters(vec![
        arc(MockAdapter::answering(Vendor::OpenAi, "gpt-4o-mini", "slow").with_delay(Duration::from_millis(150))),
        arc(MockAdapter::answering(Vendor::Claude, "claude-3-5-sonnet-20241022", "fast")),
    ]);

    let wire = dispatcher.dispatch("hello").await.unwrap().to_wire_map();
    assert_eq!(wire["OpenAI"], "slow");
    assert_eq!(wire["Claude"], "fast");
}

#[tokio::test]
async fn test_transport_faults_beside_a_success() {
    let config = DispatchConfig::new()
        .with_local_daemon(false)
        .with_vendor("openai", VendorConfig::with_key("sk-test").base_url(UNREACHABLE_URL))
        .with_vendor("claude", VendorConfig::with_key("sk-ant-test").base_url(UNREACHABLE_URL));
    let mut adapters = Dispatcher::from_config(&config).unwrap().adapters().to_vec();
    adapters.push(arc(MockAdapter::answering(Vendor::Gemini, "gemini-1.5-pro", "It works.")));

    let report = Dispatcher::with_adapters(adapters).dispatch("Does it work?").await.unwrap();
    let wire = report.to_wire_map();

    assert_eq!(wire.len(), 3);
    assert!(wire["OpenAI"].starts_with("❌ OpenAI Error:"));
    assert!(wire["Claude"].starts_with("❌ Claude Error:"));
    assert_eq!(wire["Gemini"], "It works.");
    assert!(report.cycle_cost() > 0.0);
}

#[tokio::test]
async fn test_duplicate_vendor_keys_in_wire_map() {
    let dispatcher = Dispatcher::with_adapters(vec![
        arc(MockAdapter::answering(Vendor::OpenAi, "gpt-4o", "big")),
        arc(MockAdapter::answering(Vendor::OpenAi, "gpt-4o-mini", "small")),
    ]);

    let wire = dispatcher.dispatch("hello").await.unwrap().to_wire_map();
    assert_eq!(wire["OpenAI"], "big");
    assert_eq!(wire["OpenAI (gpt-4o-mini)"], "small");
}

#[test]
fn test_resolve_adds_local_daemon() {
    let config = DispatchConfig::new().with_vendor("OpenAI", VendorConfig::with_key("k"));
    let resolved = config.resolve().unwrap();

    let vendors: Vec<_> = resolved.iter().map(|(v, _)| *v).collect();
    assert_eq!(vendors, vec![Vendor::OpenAi, Vendor::Ollama]);

    let without = config.with_local_daemon(false).resolve().unwrap();
    assert_eq!(without.len(), 1);
}

#[test]
fn test_resolve_keeps_explicit_local_settings() {
    let config = DispatchConfig::new().with_vendor("ollama", VendorConfig::default().model("mistral"));
    let resolved = config.resolve().unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].1.model.as_deref(), Some("mistral"));
}

#[test]
fn test_resolve_rejects_unknown_vendor() {
    let config = DispatchConfig::new().with_vendor("acme", VendorConfig::with_key("k"));
    let err = config.resolve().unwrap_err();

    assert!(matches!(err, Error::InvalidConfig { ref field, .. } if field == "dispatch.vendors.acme"));
    assert!(Dispatcher::from_config(&config).is_err());
}

#[test]
fn test_resolve_rejects_aliased_duplicates() {
    let config = DispatchConfig::new()
        .with_vendor("anthropic", VendorConfig::with_key("a"))
        .with_vendor("claude", VendorConfig::with_key("b"));

    assert!(matches!(config.resolve(), Err(Error::InvalidConfig { .. })));
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: DispatchConfig = serde_json::from_str(
        r#"{ "vendors": { "gemini": { "api_key": "AIza-test", "model": "gemini-1.5-flash" } } }"#,
    )
    .unwrap();

    assert!(config.local_daemon);
    assert_eq!(config.vendors["gemini"].model.as_deref(), Some("gemini-1.5-flash"));
}

#[test]
fn test_debug_lists_adapters() {
    let dispatcher = Dispatcher::with_adapters(vec![
        arc(MockAdapter::answering(Vendor::OpenAi, "gpt-4o", "a")),
        arc(MockAdapter::unconfigured(Vendor::Ollama, "llama3.2")),
    ]);

    let debug_str = format!("{dispatcher:?}");
    assert!(debug_str.contains("openai/gpt-4o"));
    assert!(debug_str.contains("ollama/llama3.2"));
}

#[tokio::test]
async fn test_long_gpt_answers_do_not_serialize_the_fan_out() {
    let delay = Duration::from_millis(300);
    let long_answer = "Ownership and borrowing keep memory safe. ".repeat(100);
    let dispatcher = Dispatcher::with_adapters(vec![
        arc(MockAdapter::answering(Vendor::OpenAi, "gpt-4o", long_answer.clone()).with_delay(delay)),
        arc(MockAdapter::answering(Vendor::OpenAi, "gpt-3.5-turbo", long_answer).with_delay(delay)),
        arc(MockAdapter::answering(Vendor::Gemini, "gemini-1.5-pro", "short").with_delay(delay)),
    ]);

    let start = std::time::Instant::now();
    let report = dispatcher.dispatch("Explain ownership.").await.unwrap();

    assert_eq!(report.successes().count(), 3);
    assert!(report.results.iter().all(|r| r.output_tokens > 0));
    assert!(start.elapsed() < Duration::from_millis(800));
}
