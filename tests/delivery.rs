//! End-to-end delivery tests against a local mock of the Flowdock API.

use flowdock_notify::{
    BuildOutcome, BuildResult, ChatMessage, DeliveryConfig, DeliveryError, EnvVars,
    FlowdockClient, InboxMessage,
};
use mockito::Matcher;
use tracing_subscriber::EnvFilter;

/// Capture client tracing output in test runs; later calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config(api_url: &str) -> DeliveryConfig {
    DeliveryConfig {
        api_url: api_url.to_string(),
        flow_token: "f10wt0k3n".to_string(),
        proxy_host: None,
        proxy_port: None,
        proxy_username: None,
        proxy_password: None,
    }
}

fn outcome() -> BuildOutcome {
    BuildOutcome {
        project_name: "app".into(),
        parent_name: None,
        display_number: "#8".into(),
        result: BuildResult::Failure,
        build_url: Some("http://ci.example.com/job/app/8/".into()),
    }
}

#[tokio::test]
async fn chat_push_posts_form_encoded_fields() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/messages/chat/f10wt0k3n")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "content".into(),
                ":x:app build 8 failed\nhttp://ci.example.com/job/app/8/".into(),
            ),
            Matcher::UrlEncoded("external_user_name".into(), "Jenkins".into()),
            Matcher::UrlEncoded("tags".into(), "".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;

    let client = FlowdockClient::new(&config(&server.url())).unwrap();
    let msg = ChatMessage::from_build(&outcome());
    client.push_chat_message(&msg).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn inbox_push_posts_form_encoded_fields() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/messages/team_inbox/f10wt0k3n")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("subject".into(), "app build 8 failed".into()),
            Matcher::UrlEncoded("from_address".into(), "build+fail@flowdock.com".into()),
            Matcher::UrlEncoded("from_name".into(), "CI".into()),
            Matcher::UrlEncoded("source".into(), "Jenkins".into()),
            Matcher::UrlEncoded("project".into(), "app".into()),
            Matcher::UrlEncoded("link".into(), "http://ci.example.com/job/app/8/".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;

    let client = FlowdockClient::new(&config(&server.url())).unwrap();
    let msg = InboxMessage::from_build(&outcome(), &[], &EnvVars::new());
    client.push_inbox_message(&msg).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn whitespace_in_flow_token_is_stripped_from_the_path() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/messages/chat/abc123")
        .with_status(200)
        .create_async()
        .await;

    let mut cfg = config(&server.url());
    cfg.flow_token = " abc 123 ".to_string();
    let client = FlowdockClient::new(&cfg).unwrap();
    client
        .push_chat_message(&ChatMessage::from_build(&outcome()))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn non_200_response_surfaces_status_body_and_url() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/messages/chat/f10wt0k3n")
        .with_status(400)
        .with_body("Flow not found")
        .create_async()
        .await;

    let client = FlowdockClient::new(&config(&server.url())).unwrap();
    let err = client
        .push_chat_message(&ChatMessage::from_build(&outcome()))
        .await
        .unwrap_err();

    match err {
        DeliveryError::Response { status, body, url, .. } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Flow not found");
            assert!(url.ends_with("/messages/chat/f10wt0k3n"));
        }
        other => panic!("expected Response error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refusal_is_a_transport_error() {
    init_tracing();
    // Nothing listens on the discard port.
    let client = FlowdockClient::new(&config("http://127.0.0.1:9")).unwrap();
    let err = client
        .push_chat_message(&ChatMessage::from_build(&outcome()))
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn malformed_api_url_is_an_endpoint_error() {
    init_tracing();
    let client = FlowdockClient::new(&config("not a url")).unwrap();
    let err = client
        .push_chat_message(&ChatMessage::from_build(&outcome()))
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Endpoint(_)), "got {err:?}");
}
