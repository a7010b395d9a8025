//! BytePlus Open API service signer
//!
//! Signs top-level BytePlus Open API calls (IAM, ECS, ...) with the
//! HMAC-SHA256 header scheme: a canonical request is hashed into a string
//! to sign, which is signed with a key derived from the secret key and the
//! `date/region/service/request` credential scope.

mod constants;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::DefaultCredentialProvider;
pub use provide_credential::EnvCredentialProvider;
pub use provide_credential::StaticCredentialProvider;

mod sign_request;
pub use sign_request::RequestSigner;
