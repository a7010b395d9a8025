use crate::constants::{
    BYTEPLUS_QUERY_ENCODE_SET, DEFAULT_CONTENT_TYPE, SIGNED_HEADERS, X_CONTENT_SHA_256, X_DATE,
};
use crate::Credential;
use async_trait::async_trait;
use bpsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use bpsign_core::time::{format_date, format_iso8601, now, parse_iso8601, DateTime};
use bpsign_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::utf8_percent_encode;
use std::fmt::Write;

/// RequestSigner that implements the BytePlus Open API HMAC-SHA256 scheme.
///
/// - [Signature Method](https://docs.byteplus.com/en/docs/byteplus-platform/docs-signature-method)
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred =
            credential.ok_or_else(|| Error::credential_invalid("missing signing credential"))?;

        let mut signed_req = SigningRequest::build(req)?;

        // An x-date set by the caller wins over the clock so the transmitted
        // header and the signed value cannot diverge.
        let now = match signed_req.headers.get(X_DATE) {
            Some(v) => parse_iso8601(v.to_str()?)?,
            None => self.time.unwrap_or_else(now),
        };

        // canonicalize context
        canonicalize_header(&mut signed_req, body, now)?;
        canonicalize_query(&mut signed_req);

        // build canonical request and string to sign.
        let creq = canonical_request_string(&signed_req)?;
        debug!("calculated canonical request:\n{creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        // Scope: "20230101/<region>/<service>/request"
        let scope = format!(
            "{}/{}/{}/request",
            format_date(now),
            self.region,
            self.service
        );
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // HMAC-SHA256
        // 20230101T000000Z
        // 20230101/<region>/<service>/request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "HMAC-SHA256")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{scope}")?;
            write!(f, "{encoded_req}")?;
            f
        };
        debug!("calculated string to sign:\n{string_to_sign}");

        let signing_key = generate_signing_key(
            &cred.secret_access_key,
            now,
            &self.region,
            &self.service,
        );
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization: HeaderValue = format!(
            "HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id,
            scope,
            SIGNED_HEADERS.join(";"),
            signature
        )
        .parse()?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)
    }
}

fn canonicalize_header(ctx: &mut SigningRequest, body: &[u8], now: DateTime) -> Result<()> {
    // Header values must be normalized before they enter the canonical form.
    for (_, value) in ctx.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Insert HOST header if not present.
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers
            .insert(header::HOST, ctx.authority.as_str().parse()?);
    }

    // Insert X_DATE header if not present.
    if ctx.headers.get(X_DATE).is_none() {
        ctx.headers
            .insert(X_DATE, HeaderValue::try_from(format_iso8601(now))?);
    }

    // The payload hash is always recomputed from the body we were handed; a
    // stale digest set by the caller would invalidate the signature server
    // side.
    ctx.headers
        .insert(X_CONTENT_SHA_256, HeaderValue::try_from(hex_sha256(body))?);

    // Insert CONTENT_TYPE header if not present.
    if ctx.headers.get(header::CONTENT_TYPE).is_none() {
        ctx.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
        );
    }

    Ok(())
}

fn canonicalize_query(ctx: &mut SigningRequest) {
    if ctx.query.is_empty() {
        return;
    }

    // Sort by param name, ties broken by value.
    ctx.query.sort();

    ctx.query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &BYTEPLUS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &BYTEPLUS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
}

fn canonical_request_string(ctx: &SigningRequest) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", ctx.method)?;
    // Insert path
    writeln!(f, "{}", ctx.path)?;
    // Insert query
    writeln!(
        f,
        "{}",
        ctx.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert signed headers, host always from the request authority.
    for name in SIGNED_HEADERS.iter() {
        if *name == "host" {
            writeln!(f, "host:{}", ctx.authority)?;
        } else {
            writeln!(f, "{}:{}", name, ctx.header_get_or_default(name)?)?;
        }
    }
    writeln!(f)?;
    writeln!(f, "{}", SIGNED_HEADERS.join(";"))?;
    write!(f, "{}", ctx.header_get_or_default(X_CONTENT_SHA_256)?)?;

    Ok(f)
}

/// Derive the per-request signing key.
///
/// The chain scopes the key to its date/region/service/request context: a
/// leaked stage output cannot be replayed outside that context. Each stage
/// consumes the raw bytes of the previous HMAC output, never its hex form.
fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "request".as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use http::Request;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const FIXTURE_AUTHORIZATION: &str = "HMAC-SHA256 \
         Credential=AKTEST/20230101/ap-singapore-1/iam/request, \
         SignedHeaders=host;x-date;x-content-sha256;content-type, \
         Signature=dee64bbb0fd4a2c873c49e3950b246ccd9cd58ff0a92368051429d58743b5519";

    const EMPTY_BODY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn test_credential() -> Credential {
        Credential {
            access_key_id: "AKTEST".to_string(),
            secret_access_key: "SKTEST".to_string(),
        }
    }

    fn fixture_time() -> DateTime {
        parse_iso8601("20230101T000000Z").expect("fixture time must parse")
    }

    fn list_users_request() -> Request<()> {
        Request::builder()
            .method(Method::GET)
            .uri("https://open.byteplusapi.com/?Action=ListUsers&Version=2018-01-01")
            .body(())
            .expect("request must be valid")
    }

    fn signing_request_with_query(pairs: Vec<(&str, &str)>) -> SigningRequest {
        SigningRequest {
            method: Method::GET,
            scheme: "https".parse().expect("scheme must be valid"),
            authority: "open.byteplusapi.com"
                .parse()
                .expect("authority must be valid"),
            path: "/".to_string(),
            query: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: http::HeaderMap::new(),
        }
    }

    fn canonical_query(ctx: &SigningRequest) -> String {
        ctx.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    #[tokio::test]
    async fn test_list_users_get_fixture() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let (mut parts, _) = list_users_request().into_parts();

        let signer = RequestSigner::new("iam", "ap-singapore-1").with_time(fixture_time());
        signer
            .sign_request(&Context::new(), &mut parts, b"", Some(&test_credential()))
            .await?;

        assert_eq!(
            parts.headers[header::AUTHORIZATION].to_str()?,
            FIXTURE_AUTHORIZATION
        );
        assert_eq!(parts.headers[X_DATE].to_str()?, "20230101T000000Z");
        assert_eq!(parts.headers[X_CONTENT_SHA_256].to_str()?, EMPTY_BODY_SHA256);
        assert_eq!(
            parts.headers[header::CONTENT_TYPE].to_str()?,
            DEFAULT_CONTENT_TYPE
        );
        assert_eq!(parts.headers[header::HOST].to_str()?, "open.byteplusapi.com");
        assert_eq!(parts.uri.query(), Some("Action=ListUsers&Version=2018-01-01"));

        Ok(())
    }

    #[tokio::test]
    async fn test_scope_system_post_fixture() -> anyhow::Result<()> {
        let (mut parts, _) = Request::builder()
            .method(Method::POST)
            .uri("https://open.byteplusapi.com/?Action=ListUsers&Version=2018-01-01")
            .body(())
            .expect("request must be valid")
            .into_parts();

        let signer = RequestSigner::new("iam", "ap-singapore-1").with_time(fixture_time());
        signer
            .sign_request(
                &Context::new(),
                &mut parts,
                b"Scope=System",
                Some(&test_credential()),
            )
            .await?;

        assert_eq!(
            parts.headers[X_CONTENT_SHA_256].to_str()?,
            "fd3a0930b9ddb4d0a0557f4107f00a714f0ced5b316ed5925467e573de401c66"
        );
        assert!(parts.headers[header::AUTHORIZATION].to_str()?.ends_with(
            "Signature=03fb2c0c6af8df94888deaf728afc5989d84e8622ca6d3de35097f0cc4ea7aaa"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_is_deterministic() -> anyhow::Result<()> {
        let signer = RequestSigner::new("iam", "ap-singapore-1").with_time(fixture_time());

        let mut outputs = Vec::new();
        for _ in 0..2 {
            let (mut parts, _) = list_users_request().into_parts();
            signer
                .sign_request(&Context::new(), &mut parts, b"", Some(&test_credential()))
                .await?;
            outputs.push(parts.headers[header::AUTHORIZATION].clone());
        }

        assert_eq!(outputs[0], outputs[1]);

        Ok(())
    }

    #[tokio::test]
    async fn test_signed_headers_ignore_extra_headers() -> anyhow::Result<()> {
        let (mut parts, _) = Request::builder()
            .method(Method::GET)
            .uri("https://open.byteplusapi.com/?Action=ListUsers&Version=2018-01-01")
            .header("x-top-account-id", "2100000001")
            .header("user-agent", "bpsign-test")
            .body(())
            .expect("request must be valid")
            .into_parts();

        let signer = RequestSigner::new("iam", "ap-singapore-1").with_time(fixture_time());
        signer
            .sign_request(&Context::new(), &mut parts, b"", Some(&test_credential()))
            .await?;

        // Unsigned headers change neither the SignedHeaders set nor the
        // signature itself.
        assert_eq!(
            parts.headers[header::AUTHORIZATION].to_str()?,
            FIXTURE_AUTHORIZATION
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_caller_supplied_x_date_is_honored() -> anyhow::Result<()> {
        let (mut parts, _) = Request::builder()
            .method(Method::GET)
            .uri("https://open.byteplusapi.com/?Action=ListUsers&Version=2018-01-01")
            .header(X_DATE, "20230101T000000Z")
            .body(())
            .expect("request must be valid")
            .into_parts();

        // No time injected: the signer must pick up the header value.
        let signer = RequestSigner::new("iam", "ap-singapore-1");
        signer
            .sign_request(&Context::new(), &mut parts, b"", Some(&test_credential()))
            .await?;

        assert_eq!(
            parts.headers[header::AUTHORIZATION].to_str()?,
            FIXTURE_AUTHORIZATION
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_x_date_is_rejected() {
        let (mut parts, _) = Request::builder()
            .method(Method::GET)
            .uri("https://open.byteplusapi.com/")
            .header(X_DATE, "01/01/2023 00:00")
            .body(())
            .expect("request must be valid")
            .into_parts();

        let signer = RequestSigner::new("iam", "ap-singapore-1");
        let err = signer
            .sign_request(&Context::new(), &mut parts, b"", Some(&test_credential()))
            .await
            .expect_err("malformed x-date must abort signing");

        assert_eq!(err.kind(), bpsign_core::ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_missing_credential_is_rejected() {
        let (mut parts, _) = list_users_request().into_parts();

        let signer = RequestSigner::new("iam", "ap-singapore-1").with_time(fixture_time());
        let err = signer
            .sign_request(&Context::new(), &mut parts, b"", None)
            .await
            .expect_err("signing without credential must fail");

        assert_eq!(err.kind(), bpsign_core::ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_signing_key_derivation() {
        let key = generate_signing_key("SKTEST", fixture_time(), "ap-singapore-1", "iam");
        assert_eq!(
            hex::encode(&key),
            "715af69aa0c825cccb15c915430c51043c4551b01977421423372c7bf8a4d35a"
        );

        // Each scope component feeds the chain: changing any one of them
        // produces a different key.
        let other_date = parse_iso8601("20230102T000000Z").expect("must parse");
        assert_ne!(
            key,
            generate_signing_key("SKTEST", other_date, "ap-singapore-1", "iam")
        );
        assert_ne!(
            key,
            generate_signing_key("SKTEST", fixture_time(), "ap-southeast-1", "iam")
        );
        assert_ne!(
            key,
            generate_signing_key("SKTEST", fixture_time(), "ap-singapore-1", "ecs")
        );
        assert_ne!(
            key,
            generate_signing_key("SKOTHER", fixture_time(), "ap-singapore-1", "iam")
        );
    }

    #[test_case(vec![("b", "2"), ("a", "1")], "a=1&b=2" ; "sorts by key")]
    #[test_case(vec![("a", "1"), ("b", "2")], "a=1&b=2" ; "already sorted is unchanged")]
    #[test_case(vec![("a", "2"), ("a", "1")], "a=1&a=2" ; "ties break by value")]
    #[test_case(vec![("q", "hello world")], "q=hello%20world" ; "space encodes to percent 20")]
    #[test_case(vec![("k", "a+b")], "k=a%2Bb" ; "plus is a literal")]
    #[test_case(vec![("path", "a/b")], "path=a%2Fb" ; "slash is encoded")]
    #[test_case(vec![("my key", "v")], "my%20key=v" ; "keys are encoded too")]
    #[test_case(vec![("keep", "a-b_c.d~e")], "keep=a-b_c.d~e" ; "unreserved stay literal")]
    fn test_canonicalize_query(pairs: Vec<(&str, &str)>, expected: &str) {
        let mut ctx = signing_request_with_query(pairs);
        canonicalize_query(&mut ctx);
        assert_eq!(canonical_query(&ctx), expected);
    }

    #[test]
    fn test_canonicalize_query_roundtrips_canonical_input() {
        // A query that is already in canonical form survives a full
        // decode-on-build / encode-on-canonicalize cycle unchanged.
        let canonical = "Name=hello%20world&Path=a%2Fb";
        let mut parts = Request::builder()
            .method(Method::GET)
            .uri(format!("https://open.byteplusapi.com/?{canonical}"))
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0;

        let mut ctx = SigningRequest::build(&mut parts).expect("build must succeed");
        canonicalize_query(&mut ctx);

        assert_eq!(canonical_query(&ctx), canonical);
    }

    #[test]
    fn test_canonical_request_layout() -> anyhow::Result<()> {
        let mut ctx = signing_request_with_query(vec![("Action", "ListUsers")]);
        canonicalize_header(&mut ctx, b"", fixture_time())?;
        canonicalize_query(&mut ctx);

        let creq = canonical_request_string(&ctx)?;
        let expected = format!(
            "GET\n\
             /\n\
             Action=ListUsers\n\
             host:open.byteplusapi.com\n\
             x-date:20230101T000000Z\n\
             x-content-sha256:{EMPTY_BODY_SHA256}\n\
             content-type:application/x-www-form-urlencoded\n\
             \n\
             host;x-date;x-content-sha256;content-type\n\
             {EMPTY_BODY_SHA256}"
        );
        assert_eq!(creq, expected);

        Ok(())
    }

    #[test]
    fn test_canonical_request_empty_query_line() -> anyhow::Result<()> {
        let mut ctx = signing_request_with_query(vec![]);
        canonicalize_header(&mut ctx, b"", fixture_time())?;
        canonicalize_query(&mut ctx);

        let creq = canonical_request_string(&ctx)?;
        // The query line stays present even when empty.
        assert!(creq.starts_with("GET\n/\n\nhost:"));

        Ok(())
    }
}
