use std::sync::Arc;

use phyquest::core::action::{Action, Effect, update};
use phyquest::core::message::Role;
use phyquest::core::state::App;
use phyquest::inference::{
    CONNECTIVITY_ERROR_REPLY, EMPTY_GENERATION_REPLY, GeminiProvider, GenerationRequest,
    OpenRouterProvider, ProviderError, TUTOR_SAMPLING, TutorClient, TutorProvider, Turn, TurnRole,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

const GEMINI_PATH: &str = "/models/test-model:generateContent";

// ============================================================================
// Helper Functions
// ============================================================================

fn test_turns() -> Vec<Turn> {
    vec![
        Turn {
            role: TurnRole::User,
            text: "What is $F=ma$?".to_string(),
        },
        Turn {
            role: TurnRole::Model,
            text: "Newton's second law.".to_string(),
        },
        Turn {
            role: TurnRole::User,
            text: "And momentum?".to_string(),
        },
    ]
}

fn request(turns: &[Turn]) -> GenerationRequest<'_> {
    GenerationRequest {
        model: "test-model",
        system_instruction: "You are a physics tutor.",
        turns,
        sampling: TUTOR_SAMPLING,
    }
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

fn gemini_client(server: &MockServer) -> TutorClient {
    let provider = GeminiProvider::new("test-key".to_string(), Some(server.uri()));
    TutorClient::new(Arc::new(provider), "test-model".to_string())
}

// ============================================================================
// Gemini Provider Tests
// ============================================================================

#[tokio::test]
async fn test_gemini_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "You are a physics tutor." }] },
            "contents": [
                { "role": "user", "parts": [{ "text": "What is $F=ma$?" }] },
                { "role": "model", "parts": [{ "text": "Newton's second law." }] },
                { "role": "user", "parts": [{ "text": "And momentum?" }] }
            ],
            "generationConfig": {
                "temperature": 0.7,
                "topP": 0.95,
                "thinkingConfig": { "thinkingBudget": 4000 }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("p = mv")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("test-key".to_string(), Some(mock_server.uri()));
    let turns = test_turns();
    let result = provider.generate(request(&turns)).await;

    assert_eq!(result.unwrap(), Some("p = mv".to_string()));
}

#[tokio::test]
async fn test_gemini_joins_parts_and_skips_thoughts() {
    let mock_server = MockServer::start().await;

    let body = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "Let me consider the units.", "thought": true },
                    { "text": "Momentum is " },
                    { "text": "**p = mv**." }
                ]
            }
        }]
    });
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("test-key".to_string(), Some(mock_server.uri()));
    let turns = test_turns();
    let result = provider.generate(request(&turns)).await.unwrap();

    assert_eq!(result, Some("Momentum is **p = mv**.".to_string()));
}

#[tokio::test]
async fn test_gemini_no_candidates_is_empty_generation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("test-key".to_string(), Some(mock_server.uri()));
    let turns = test_turns();
    let result = provider.generate(request(&turns)).await.unwrap();

    assert_eq!(result, None);
}

#[tokio::test]
async fn test_gemini_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("API key not valid"))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("bad-key".to_string(), Some(mock_server.uri()));
    let turns = test_turns();
    let result = provider.generate(request(&turns)).await;

    match result {
        Err(ProviderError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert!(message.contains("API key not valid"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_gemini_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new("test-key".to_string(), Some(mock_server.uri()));
    let turns = test_turns();
    let result = provider.generate(request(&turns)).await;

    assert!(matches!(result, Err(ProviderError::Parse(_))));
}

// ============================================================================
// OpenRouter Provider Tests
// ============================================================================

#[tokio::test]
async fn test_openrouter_success() {
    let mock_server = MockServer::start().await;

    let body = json!({
        "output": [
            { "type": "reasoning", "content": [] },
            {
                "type": "message",
                "content": [{ "type": "output_text", "text": "Momentum is conserved." }]
            }
        ]
    });
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": false,
            "temperature": 0.7,
            "top_p": 0.95,
            "reasoning": { "max_tokens": 4000 },
            "input": [
                { "type": "message", "role": "system", "content": "You are a physics tutor." },
                { "type": "message", "role": "user", "content": "What is $F=ma$?" },
                { "type": "message", "role": "assistant", "content": "Newton's second law." },
                { "type": "message", "role": "user", "content": "And momentum?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenRouterProvider::new("test-key".to_string(), Some(mock_server.uri()));
    let turns = test_turns();
    let result = provider.generate(request(&turns)).await.unwrap();

    assert_eq!(result, Some("Momentum is conserved.".to_string()));
}

#[tokio::test]
async fn test_openrouter_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let provider = OpenRouterProvider::new("test-key".to_string(), Some(mock_server.uri()));
    let turns = test_turns();
    let result = provider.generate(request(&turns)).await;

    assert!(matches!(result, Err(ProviderError::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_openrouter_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"output\": [oops"))
        .mount(&mock_server)
        .await;

    let provider = OpenRouterProvider::new("test-key".to_string(), Some(mock_server.uri()));
    let turns = test_turns();
    let result = provider.generate(request(&turns)).await;

    assert!(matches!(result, Err(ProviderError::Parse(_))));
}

// ============================================================================
// Tutor Client Tests
// ============================================================================

#[tokio::test]
async fn test_tutor_empty_generation_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("   \n ")))
        .mount(&mock_server)
        .await;

    let mut app = App::new(Arc::new(gemini_client(&mock_server)));
    let Effect::SpawnRequest(req) = update(&mut app, Action::Submit(Some("Hi".into()))) else {
        panic!("Expected a tutor request");
    };
    let reply = app.tutor.get_tutor_response(&req.history).await;

    assert_eq!(reply, EMPTY_GENERATION_REPLY);
}

#[tokio::test]
async fn test_tutor_error_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let mut app = App::new(Arc::new(gemini_client(&mock_server)));
    let Effect::SpawnRequest(req) = update(&mut app, Action::Submit(Some("Hi".into()))) else {
        panic!("Expected a tutor request");
    };
    let reply = app.tutor.get_tutor_response(&req.history).await;

    assert_eq!(reply, CONNECTIVITY_ERROR_REPLY);
}

#[tokio::test]
async fn test_submit_round_trip_returns_to_idle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Explain Newton's First Law" }] }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_reply("An object at rest stays at rest.")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut app = App::new(Arc::new(gemini_client(&mock_server)));
    let effect = update(
        &mut app,
        Action::Submit(Some("Explain Newton's First Law".into())),
    );
    let Effect::SpawnRequest(req) = effect else {
        panic!("Expected a tutor request, got {:?}", effect);
    };
    assert!(app.conversation.is_awaiting());

    let text = app.tutor.get_tutor_response(&req.history).await;
    update(
        &mut app,
        Action::ResponseReceived {
            generation: req.generation,
            text,
        },
    );

    assert!(!app.conversation.is_awaiting());
    let messages = app.conversation.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "An object at rest stays at rest.");
}

#[tokio::test]
async fn test_reply_after_clear_is_dropped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Late reply")))
        .mount(&mock_server)
        .await;

    let mut app = App::new(Arc::new(gemini_client(&mock_server)));
    let Effect::SpawnRequest(req) = update(&mut app, Action::Submit(Some("Hi".into()))) else {
        panic!("Expected a tutor request");
    };
    update(&mut app, Action::RequestClear);
    update(&mut app, Action::ConfirmClear);

    let text = app.tutor.get_tutor_response(&req.history).await;
    update(
        &mut app,
        Action::ResponseReceived {
            generation: req.generation,
            text,
        },
    );

    assert!(app.conversation.is_empty());
    assert!(!app.conversation.is_awaiting());
}
