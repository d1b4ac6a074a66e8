use casting_auth::Authorizer;
use std::env;
use std::time::Duration;

/// Verifies a token against a live identity provider and checks one permission.
///
/// Usage: AUTH_ISSUER=https://tenant.auth0.com/ AUTH_AUDIENCE=casting \
///        cargo run --example verify_token -- <token> <permission>
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let issuer = env::var("AUTH_ISSUER")?;
    let audience = env::var("AUTH_AUDIENCE")?;
    let mut args = env::args().skip(1);
    let token = args.next().ok_or("missing <token> argument")?;
    let permission = args.next().ok_or("missing <permission> argument")?;

    let authorizer = Authorizer::builder()
        .with_issuer(issuer)
        .with_audience(audience)
        .with_issuer_jwks()?
        .with_fetch_timeout(Duration::from_secs(10))
        .build()?;

    let mut headers = http::HeaderMap::new();
    headers.insert("authorization", format!("Bearer {token}").parse()?);

    match authorizer.authorize(&headers, &permission).await {
        Ok(claims) => println!("Granted: {}", serde_json::to_string_pretty(&claims)?),
        Err(e) => println!("Denied ({} {}): {}", e.status().as_u16(), e.code(), e),
    }
    Ok(())
}
