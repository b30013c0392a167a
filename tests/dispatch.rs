use serde_json::{json, Value};
use toolcall::config::Config;
use toolcall::{Dispatcher, ToolcallError};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(model_server: &MockServer, weather_base_url: &str) -> Config {
    Config {
        api_key: "test-key".to_string(),
        api_endpoint: format!("{}/v1/chat/completions", model_server.uri()),
        model: "test-model".to_string(),
        temperature: Some(0.0),
        system_prompt: None,
        timeout_secs: 5,
        weather_base_url: weather_base_url.to_string(),
        follow_up: false,
        max_rounds: 5,
        verbose: false,
    }
}

fn tool_call(id: &str, name: &str, arguments: Value) -> Value {
    json!({
        "id": id,
        "type": "function",
        "function": { "name": name, "arguments": arguments.to_string() }
    })
}

fn completion(content: Option<&str>, tool_calls: Vec<Value>) -> Value {
    let mut message = json!({ "role": "assistant", "content": content });
    if !tool_calls.is_empty() {
        message["tool_calls"] = Value::Array(tool_calls);
    }
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{ "index": 0, "message": message, "finish_reason": "tool_calls" }]
    })
}

#[tokio::test]
async fn test_multiply_prompt_dispatches_tool() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "test-model", "temperature": 0.0 })))
        .and(body_string_contains("\"name\":\"multiply\""))
        .and(body_string_contains("\"name\":\"getWeatherFromCoords\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            None,
            vec![tool_call("call_1", "multiply", json!({ "a": 15, "b": 23 }))],
        )))
        .expect(1)
        .mount(&model)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&model, "http://127.0.0.1:1")).unwrap();
    let outcome = dispatcher.run("What is 15 multiplied by 23?").await.unwrap();

    assert_eq!(outcome.rounds, 1);
    assert_eq!(outcome.tool_outcomes.len(), 1);
    let first = &outcome.tool_outcomes[0];
    assert_eq!(first.call_id, "call_1");
    assert_eq!(first.name, "multiply");
    assert!(first.result.as_ref().unwrap().contains("345"));
}

#[tokio::test]
async fn test_weather_prompt_dispatches_tool() {
    let model = MockServer::start().await;
    let weather = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            None,
            vec![tool_call(
                "call_w",
                "getWeatherFromCoords",
                json!({ "latitude": 36.9741, "longitude": 122.0288 }),
            )],
        )))
        .mount(&model)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current_weather": { "temperature": 68.5, "windspeed": 5.2 }
        })))
        .expect(1)
        .mount(&weather)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&model, &weather.uri())).unwrap();
    let outcome = dispatcher
        .run("What is the current weather at 36.9741, 122.0288?")
        .await
        .unwrap();

    let text = outcome.tool_outcomes[0].result.as_ref().unwrap();
    assert!(text.contains("68.5°F"));
    assert!(text.contains("5.2 mph"));
}

#[tokio::test]
async fn test_failing_call_does_not_stop_the_others() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            None,
            vec![
                tool_call("call_1", "divide", json!({ "a": 1, "b": 2 })),
                tool_call("call_2", "multiply", json!({ "a": "x", "b": 2 })),
                tool_call("call_3", "multiply", json!({ "a": 6, "b": 7 })),
            ],
        )))
        .mount(&model)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&model, "http://127.0.0.1:1")).unwrap();
    let outcome = dispatcher.run("mixed").await.unwrap();

    let names: Vec<&str> = outcome
        .tool_outcomes
        .iter()
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(names, vec!["divide", "multiply", "multiply"]);

    assert!(matches!(
        outcome.tool_outcomes[0].result,
        Err(ToolcallError::UnknownTool(ref name)) if name == "divide"
    ));
    assert!(matches!(
        outcome.tool_outcomes[1].result,
        Err(ToolcallError::SchemaValidation { .. })
    ));
    assert!(outcome.tool_outcomes[2]
        .result
        .as_ref()
        .unwrap()
        .contains("42"));
}

#[tokio::test]
async fn test_unparseable_arguments_are_schema_errors() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            None,
            vec![json!({
                "id": "call_1",
                "type": "function",
                "function": { "name": "multiply", "arguments": "{not json" }
            })],
        )))
        .mount(&model)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&model, "http://127.0.0.1:1")).unwrap();
    let outcome = dispatcher.run("broken").await.unwrap();

    assert!(matches!(
        outcome.tool_outcomes[0].result,
        Err(ToolcallError::SchemaValidation { .. })
    ));
}

#[tokio::test]
async fn test_text_response_without_tool_calls() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(Some("I can only multiply numbers."), vec![])),
        )
        .mount(&model)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&model, "http://127.0.0.1:1")).unwrap();
    let outcome = dispatcher.run("Tell me a joke").await.unwrap();

    assert!(!outcome.has_tool_calls());
    assert_eq!(
        outcome.content.as_deref(),
        Some("I can only multiply numbers.")
    );
}

#[tokio::test]
async fn test_model_http_error_is_model_request_error() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&model)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&model, "http://127.0.0.1:1")).unwrap();
    let err = dispatcher.run("What is 15 multiplied by 23?").await.unwrap_err();

    match err {
        ToolcallError::ModelRequest { status, message } => {
            assert_eq!(status, Some(401));
            assert!(message.contains("invalid api key"));
        }
        other => panic!("expected ModelRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_follow_up_sends_tool_results_back() {
    let model = MockServer::start().await;

    // Second round: the request carries the tool result
    Mock::given(method("POST"))
        .and(body_string_contains("\"role\":\"tool\""))
        .and(body_string_contains("\"tool_call_id\":\"call_1\""))
        .and(body_string_contains("The value of 15 x 23 is: 345"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(Some("15 times 23 is 345."), vec![])),
        )
        .expect(1)
        .mount(&model)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            None,
            vec![tool_call("call_1", "multiply", json!({ "a": 15, "b": 23 }))],
        )))
        .expect(1)
        .mount(&model)
        .await;

    let mut config = test_config(&model, "http://127.0.0.1:1");
    config.follow_up = true;
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    let outcome = dispatcher.run("What is 15 multiplied by 23?").await.unwrap();

    assert_eq!(outcome.rounds, 2);
    assert_eq!(outcome.tool_outcomes.len(), 1);
    assert_eq!(outcome.content.as_deref(), Some("15 times 23 is 345."));
}

#[tokio::test]
async fn test_follow_up_stops_at_round_limit() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            None,
            vec![tool_call("call_1", "multiply", json!({ "a": 2, "b": 2 }))],
        )))
        .expect(3)
        .mount(&model)
        .await;

    let mut config = test_config(&model, "http://127.0.0.1:1");
    config.follow_up = true;
    config.max_rounds = 3;
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    let outcome = dispatcher.run("loop forever").await.unwrap();

    assert_eq!(outcome.rounds, 3);
    assert_eq!(outcome.tool_outcomes.len(), 3);
}

#[tokio::test]
async fn test_malformed_entry_does_not_drop_valid_calls() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            None,
            vec![
                tool_call("call_1", "multiply", json!({ "a": 6, "b": 7 })),
                json!({ "id": "call_2", "type": "function", "function": { "arguments": "{}" } }),
            ],
        )))
        .mount(&model)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&model, "http://127.0.0.1:1")).unwrap();
    let outcome = dispatcher.run("two calls, one broken").await.unwrap();

    assert_eq!(outcome.tool_outcomes.len(), 2);
    assert!(outcome.tool_outcomes[0]
        .result
        .as_ref()
        .unwrap()
        .contains("42"));

    let broken = &outcome.tool_outcomes[1];
    assert_eq!(broken.call_id, "call_2");
    assert!(matches!(broken.result, Err(ToolcallError::UnknownTool(_))));
}

#[tokio::test]
async fn test_malformed_entry_for_known_tool_is_schema_error() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            None,
            vec![json!({
                "id": "call_1",
                "type": 42,
                "function": { "name": "multiply", "arguments": "{\"a\":1,\"b\":1}" }
            })],
        )))
        .mount(&model)
        .await;

    let dispatcher = Dispatcher::from_config(&test_config(&model, "http://127.0.0.1:1")).unwrap();
    let outcome = dispatcher.run("bad type field").await.unwrap();

    assert_eq!(outcome.tool_outcomes.len(), 1);
    match &outcome.tool_outcomes[0].result {
        Err(ToolcallError::SchemaValidation { tool, message }) => {
            assert_eq!(tool, "multiply");
            assert!(message.contains("malformed tool call"));
        }
        other => panic!("expected SchemaValidation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_follow_up_re_encodes_inline_arguments() {
    let model = MockServer::start().await;

    // Second round: the echoed assistant call must carry string arguments
    Mock::given(method("POST"))
        .and(body_string_contains("\"role\":\"tool\""))
        .and(body_string_contains(r#""arguments":"{\"a\":6,\"b\":7}""#))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(Some("6 times 7 is 42."), vec![])),
        )
        .expect(1)
        .mount(&model)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            None,
            vec![json!({
                "id": "call_1",
                "type": "function",
                "function": { "name": "multiply", "arguments": { "a": 6, "b": 7 } }
            })],
        )))
        .expect(1)
        .mount(&model)
        .await;

    let mut config = test_config(&model, "http://127.0.0.1:1");
    config.follow_up = true;
    let dispatcher = Dispatcher::from_config(&config).unwrap();
    let outcome = dispatcher.run("What is 6 multiplied by 7?").await.unwrap();

    assert_eq!(outcome.rounds, 2);
    assert!(outcome.tool_outcomes[0]
        .result
        .as_ref()
        .unwrap()
        .contains("42"));
    assert_eq!(outcome.content.as_deref(), Some("6 times 7 is 42."));
}
