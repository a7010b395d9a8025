use crate::{Context, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
#[derive(Clone, Debug)]
pub struct Signer<C: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = C>>,
    signer: Arc<dyn SignRequest<Credential = C>>,
    credential: Arc<Mutex<Option<C>>>,
}

impl<C: SigningCredential> Signer<C> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = C>,
        signer: impl SignRequest<Credential = C>,
    ) -> Self {
        Self {
            ctx,

            provider: Arc::new(provider),
            signer: Arc::new(signer),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Sign the request parts with the given body.
    ///
    /// The credential is loaded on first use and cached until it stops
    /// being valid.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        let credential = self.credential.lock().expect("lock poisoned").clone();
        let credential = if credential.is_valid() {
            credential
        } else {
            let loaded = self.provider.provide_credential(&self.ctx).await?;
            *self.credential.lock().expect("lock poisoned") = loaded.clone();
            loaded
        };

        self.signer
            .sign_request(&self.ctx, req, body, credential.as_ref())
            .await
    }
}
