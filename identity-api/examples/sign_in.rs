use identity_api::{Client, IdentityApiError, Request};
use secrecy::SecretString;

#[tokio::main]
pub async fn main() -> Result<(), IdentityApiError> {
    let client = Client::identity_toolkit();

    let req = Request::accounts()
        .with_api_key("api_key")
        .sign_in_with_password("ada@example.com", SecretString::from("password".to_string()))
        .return_secure_token(true);

    let res = client.send(req).await?;
    println!("signed in as {}", res.local_id);
    Ok(())
}
