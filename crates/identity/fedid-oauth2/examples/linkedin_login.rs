//! Example showing how to wire the LinkedIn connector into a host flow
//!
//! This example demonstrates:
//! 1. Building the LinkedIn authenticator from its preset
//! 2. Supplying relying-party credentials through the authentication context
//! 3. Issuing the authorization redirect
//! 4. Routing and processing the provider callback

use fedid_core::{
    AuthRequest, AuthenticationContext, ClientCredentials, FederatedAuthenticator,
    RedirectCapture, SimpleContext,
};
use fedid_oauth2::linkedin;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let authenticator = linkedin::authenticator();

    let credentials = ClientCredentials {
        client_id: std::env::var("LINKEDIN_CLIENT_ID")
            .unwrap_or_else(|_| "your-linkedin-client-id".to_string()),
        client_secret: std::env::var("LINKEDIN_CLIENT_SECRET")
            .unwrap_or_else(|_| "your-linkedin-client-secret".to_string()),
        callback_url: "http://localhost:3000/auth/linkedin/callback".to_string(),
    };

    let mut context = SimpleContext::new("demo-context-1").with_credentials(credentials);

    println!("LinkedIn Connector Example");
    println!("==========================");

    println!("\nConfiguration surface exposed to the host registry:");
    for property in authenticator.configuration_properties() {
        println!(
            "  [{}] {} (required: {}, confidential: {})",
            property.display_order, property.display_name, property.required, property.confidential
        );
    }

    // Step 1: issue the authorization redirect.
    println!("\n1. Issuing authorization redirect...");
    let mut sink = RedirectCapture::default();
    authenticator
        .initiate(&AuthRequest::new(), &mut sink, &mut context)
        .await?;
    println!(
        "Redirect location: {}",
        sink.location.as_deref().unwrap_or("<none>")
    );

    // Step 2: simulate the provider callback. In a real application the
    // code and state come back on the relying party's callback URL.
    println!("\n2. Simulating provider callback...");
    let callback = AuthRequest::from_params([
        ("code", "simulated_authorization_code"),
        ("state", "demo-context-1,linkedin"),
    ]);

    if !authenticator.can_handle(&callback) {
        println!("Callback was not recognized as a LinkedIn callback");
        return Ok(());
    }

    match authenticator.process(&callback, &mut context).await {
        Ok(()) => {
            let identity = context.subject().expect("identity attached on success");
            println!("✅ Authentication succeeded!");
            println!("Subject: {}", identity.subject);
            println!("Claims:");
            for (claim_uri, value) in &identity.claims {
                println!("  {claim_uri} = {value}");
            }
        }
        Err(e) => {
            println!("❌ Authentication failed: {e}");
            println!(
                "Note: This is expected in the simulation as we're not using a real authorization code"
            );
        }
    }

    Ok(())
}
