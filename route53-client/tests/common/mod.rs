//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::VecDeque;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use route53_client::{
    AUTHORIZATION_HEADER, ClientConfig, CredentialProvider, CredentialSource, Credentials,
    HttpRequest, HttpResponse, Result, Route53Client, Route53Error, Transport,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

// ============ Fixtures ============

pub const CHANGE_PENDING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ChangeResourceRecordSetsResponse xmlns="https://route53.amazonaws.com/doc/2012-12-12/">
  <ChangeInfo>
    <Id>/change/C2682N5HXP0BZ4</Id>
    <Status>PENDING</Status>
    <SubmittedAt>2017-03-07T19:30:03.548Z</SubmittedAt>
  </ChangeInfo>
</ChangeResourceRecordSetsResponse>"#;

pub const CHANGE_INSYNC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GetChangeResponse xmlns="https://route53.amazonaws.com/doc/2012-12-12/">
  <ChangeInfo>
    <Id>/change/C2682N5HXP0BZ4</Id>
    <Status>INSYNC</Status>
    <SubmittedAt>2017-03-07T19:30:03.548Z</SubmittedAt>
  </ChangeInfo>
</GetChangeResponse>"#;

pub const SIGNATURE_DOES_NOT_MATCH: &str = r#"<?xml version="1.0"?>
<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2012-12-12/">
  <Error>
    <Type>Sender</Type>
    <Code>SignatureDoesNotMatch</Code>
    <Message>The request signature we calculated does not match the signature you provided.</Message>
  </Error>
  <RequestId>7ac2f3b0-0b7a-11e7-8d3b-77c8a4b8c3d2</RequestId>
</ErrorResponse>"#;

pub fn ok(body: &str) -> Result<HttpResponse> {
    status(200, body)
}

pub fn status(status: u16, body: &str) -> Result<HttpResponse> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

// ============ Transports ============

/// 按顺序返回预设响应，并记录所有发出的请求。
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<HttpResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedTransport: no response left"))
    }
}

/// 用 `stale_key` 签名的请求返回 403，其余返回 `body`。
pub struct KeyCheckingTransport {
    stale_key: String,
    body: String,
    sent: AtomicUsize,
}

impl KeyCheckingTransport {
    pub fn new(stale_key: &str, body: &str) -> Arc<Self> {
        Arc::new(Self {
            stale_key: stale_key.to_string(),
            body: body.to_string(),
            sent: AtomicUsize::new(0),
        })
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for KeyCheckingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        let auth = request.header(AUTHORIZATION_HEADER).unwrap_or_default();
        if auth.contains(&format!("AWSAccessKeyId={},", self.stale_key)) {
            status(403, SIGNATURE_DOES_NOT_MATCH)
        } else {
            ok(&self.body)
        }
    }
}

/// 每次发送前等待一段时间。
pub struct SlowTransport {
    pub delay: Duration,
}

#[async_trait]
impl Transport for SlowTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse> {
        tokio::time::sleep(self.delay).await;
        ok(CHANGE_INSYNC)
    }
}

// ============ Credential sources ============

/// 记录 fetch 次数；第 n 次返回 `AKID-n`。
pub struct CountingSource {
    fetches: AtomicUsize,
    fail: bool,
    delay: Duration,
}

impl CountingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fetches: AtomicUsize::new(0),
            fail: false,
            delay: Duration::ZERO,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fetches: AtomicUsize::new(0),
            fail: true,
            delay: Duration::ZERO,
        })
    }

    /// Fetch 时让出执行权，使并发调用者在刷新期间排队。
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            fetches: AtomicUsize::new(0),
            fail: false,
            delay,
        })
    }

    /// 等待 `delay` 后失败。
    pub fn failing_slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            fetches: AtomicUsize::new(0),
            fail: true,
            delay,
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialSource for CountingSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn fetch(&self) -> Result<Credentials> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(Route53Error::Transport {
                detail: "metadata service unreachable".to_string(),
            });
        }
        Ok(Credentials::new(format!("AKID-{n}"), format!("secret-{n}")))
    }
}

// ============ Client construction ============

/// 以 `AKID-0` 作为初始凭证（不触发 fetch）构造客户端。
pub fn client_with(
    transport: Arc<dyn Transport>,
    source: Arc<dyn CredentialSource>,
    config: ClientConfig,
) -> Route53Client {
    let credentials = Arc::new(CredentialProvider::with_credentials(
        source,
        Credentials::new("AKID-0", "secret-0"),
    ));
    Route53Client::builder(credentials)
        .config(config)
        .transport(transport)
        .build()
        .expect("valid test config")
}

pub fn client(transport: Arc<dyn Transport>) -> Route53Client {
    client_with(transport, CountingSource::new(), ClientConfig::default())
}

// ============ Live environment ============

/// 生成唯一的测试记录名称
pub fn generate_test_record_name(zone_name: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}.{}", &uuid.to_string()[..8], zone_name)
}

/// 真实 Route 53 环境的测试上下文
pub struct LiveContext {
    pub client: Route53Client,
    pub zone_id: String,
}

impl LiveContext {
    pub async fn from_env() -> Option<Self> {
        let zone_id = env::var("TEST_HOSTED_ZONE_ID").ok()?;
        let client = Route53Client::from_env().await.ok()?;
        Some(Self { client, zone_id })
    }
}
