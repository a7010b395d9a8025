//! Sign an IAM ListUsers request and print the header values to attach.
//!
//! Credentials are read from `BYTEPLUS_ACCESS_KEY_ID` and
//! `BYTEPLUS_SECRET_ACCESS_KEY`. Transmission is left to whatever HTTP
//! client the application already uses.

use anyhow::Result;
use bpsign_byteplus::{DefaultCredentialProvider, RequestSigner};
use bpsign_core::{Context, OsEnv, Signer};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new().with_env(OsEnv);
    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        RequestSigner::new("iam", "ap-singapore-1"),
    );

    let req = http::Request::get(
        "https://open.byteplusapi.com/?Action=ListUsers&Version=2018-01-01&Limit=100&Offset=0",
    )
    .body(())?;

    let (mut parts, _) = req.into_parts();
    signer.sign(&mut parts, b"").await?;

    println!("{} {}", parts.method, parts.uri);
    for (name, value) in parts.headers.iter() {
        println!("{}: {}", name, value.to_str().unwrap_or("<opaque>"));
    }

    Ok(())
}
