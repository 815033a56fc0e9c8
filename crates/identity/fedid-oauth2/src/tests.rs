//! Integration tests for the full authorization-code flow.

#[cfg(test)]
mod integration_tests {
    use crate::{EndpointConfig, OAuth2Authenticator};
    use fedid_core::{
        AuthRequest, AuthenticationContext, ClaimSet, ClientCredentials, FederatedAuthenticator,
        RedirectCapture, SimpleContext,
    };
    use std::sync::Arc;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DIALECT: &str = "http://fedid.dev/linkedin/claims";

    async fn setup_mock_provider() -> (MockServer, OAuth2Authenticator) {
        let mock_server = MockServer::start().await;

        let config = EndpointConfig::new("LinkedIn", "linkedin")
            .with_friendly_name("LinkedIn Authenticator")
            .with_authorization_endpoint(format!("{}/authorize", mock_server.uri()))
            .with_token_endpoint(format!("{}/token", mock_server.uri()))
            .with_userinfo_endpoint(format!("{}/userinfo", mock_server.uri()))
            .with_scope("scope=r_basicprofile%20r_emailaddress")
            .with_claim_dialect(DIALECT);

        (mock_server, OAuth2Authenticator::new(config))
    }

    fn credentials() -> ClientCredentials {
        ClientCredentials {
            client_id: "mock_client_id".to_string(),
            client_secret: "mock_secret".to_string(),
            callback_url: "http://localhost:3000/callback".to_string(),
        }
    }

    fn callback_request() -> AuthRequest {
        AuthRequest::from_params([("code", "mock_auth_code"), ("state", "abc123,linkedin")])
    }

    async fn mount_token_success(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("client_id=mock_client_id"))
            .and(body_string_contains("code=mock_auth_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "mock_access_token",
                "expires_in": 3600
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn full_flow_resolves_subject_and_claims() {
        let (mock_server, authenticator) = setup_mock_provider().await;

        mount_token_success(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(query_param("oauth2_access_token", "mock_access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "u1",
                "first-name": "Ada"
            })))
            .mount(&mock_server)
            .await;

        // First leg: redirect issued.
        let mut sink = RedirectCapture::default();
        let mut context = SimpleContext::new("abc123").with_credentials(credentials());

        authenticator
            .initiate(&AuthRequest::new(), &mut sink, &mut context)
            .await
            .unwrap();

        let location = sink.location.expect("redirect was not issued");
        assert!(location.contains("/authorize?"));
        assert!(location.contains("response_type=code"));
        assert!(location.ends_with("&scope=r_basicprofile%20r_emailaddress"));

        // Callback leg.
        let request = callback_request();
        assert!(authenticator.can_handle(&request));

        authenticator.process(&request, &mut context).await.unwrap();

        let identity = context.subject().expect("identity was not attached");
        assert_eq!(identity.subject, "u1");
        assert_eq!(identity.claims.len(), 2);
        assert_eq!(
            identity.claims.get(&format!("{DIALECT}/id")),
            Some(&"u1".to_string())
        );
        assert_eq!(
            identity.claims.get(&format!("{DIALECT}/first-name")),
            Some(&"Ada".to_string())
        );
    }

    #[tokio::test]
    async fn host_subject_resolver_wins_over_id_claim() {
        let (mock_server, authenticator) = setup_mock_provider().await;

        mount_token_success(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "u1",
                "email-address": "ada@example.com"
            })))
            .mount(&mock_server)
            .await;

        let mut context = SimpleContext::new("abc123")
            .with_credentials(credentials())
            .with_subject_resolver(Arc::new(|claims: &ClaimSet| {
                claims
                    .get("http://fedid.dev/linkedin/claims/email-address")
                    .cloned()
            }));

        authenticator
            .process(&callback_request(), &mut context)
            .await
            .unwrap();

        assert_eq!(context.subject().unwrap().subject, "ada@example.com");
    }

    #[tokio::test]
    async fn missing_access_token_fails_without_context_mutation() {
        let (mock_server, authenticator) = setup_mock_provider().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "expires_in": 3600
            })))
            .mount(&mock_server)
            .await;

        let mut context = SimpleContext::new("abc123").with_credentials(credentials());

        let result = authenticator.process(&callback_request(), &mut context).await;
        assert!(result.is_err());
        assert!(context.subject().is_none());
    }

    #[tokio::test]
    async fn rejected_code_fails_the_attempt() {
        let (mock_server, authenticator) = setup_mock_provider().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "The provided authorization code is invalid"
            })))
            .mount(&mock_server)
            .await;

        let mut context = SimpleContext::new("abc123").with_credentials(credentials());

        let result = authenticator.process(&callback_request(), &mut context).await;
        assert!(result.is_err());
        assert!(context.subject().is_none());
    }

    #[tokio::test]
    async fn malformed_token_response_fails_the_attempt() {
        let (mock_server, authenticator) = setup_mock_provider().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let mut context = SimpleContext::new("abc123").with_credentials(credentials());

        let result = authenticator.process(&callback_request(), &mut context).await;
        assert!(result.is_err());
        assert!(context.subject().is_none());
    }

    #[tokio::test]
    async fn empty_profile_is_a_fatal_attempt() {
        let (mock_server, authenticator) = setup_mock_provider().await;

        mount_token_success(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let mut context = SimpleContext::new("abc123").with_credentials(credentials());

        let result = authenticator.process(&callback_request(), &mut context).await;
        assert!(result.is_err());
        assert!(context.subject().is_none());
    }

    #[tokio::test]
    async fn non_object_profile_fails_the_fetch() {
        let (mock_server, authenticator) = setup_mock_provider().await;

        mount_token_success(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!(["not", "an", "object"])),
            )
            .mount(&mock_server)
            .await;

        let mut context = SimpleContext::new("abc123").with_credentials(credentials());

        let result = authenticator.process(&callback_request(), &mut context).await;
        assert!(result.is_err());
        assert!(context.subject().is_none());
    }

    #[tokio::test]
    async fn userinfo_server_error_fails_the_fetch() {
        let (mock_server, authenticator) = setup_mock_provider().await;

        mount_token_success(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let mut context = SimpleContext::new("abc123").with_credentials(credentials());

        let result = authenticator.process(&callback_request(), &mut context).await;
        assert!(result.is_err());
        assert!(context.subject().is_none());
    }

    #[tokio::test]
    async fn non_string_attributes_survive_coerced() {
        let (mock_server, authenticator) = setup_mock_provider().await;

        mount_token_success(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "u1",
                "num-connections": 42,
                "verified": true
            })))
            .mount(&mock_server)
            .await;

        let mut context = SimpleContext::new("abc123").with_credentials(credentials());

        authenticator
            .process(&callback_request(), &mut context)
            .await
            .unwrap();

        let claims = &context.subject().unwrap().claims;
        assert_eq!(
            claims.get(&format!("{DIALECT}/num-connections")),
            Some(&"42".to_string())
        );
        assert_eq!(
            claims.get(&format!("{DIALECT}/verified")),
            Some(&"true".to_string())
        );
    }
}
