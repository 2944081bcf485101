//! 传输层集成测试 - 用本机 TcpListener 模拟 HTTP 代理
//!
//! 验证 CONNECT 隧道的请求格式、认证头与失败隔离：代理拒绝时
//! 不会再发生 TLS 握手或 POST。

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use task_notify::TransportClient;

/// 逐字节读请求头直到空行
async fn read_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = stream.read(&mut byte).await.unwrap();
        if n == 0 {
            break;
        }
        buf.push(byte[0]);
        if buf.ends_with(b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn connect_rejection_resolves_false_without_tls() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let proxy_url = format!("http://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let head = read_head(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 407 Proxy Authentication Required\r\n\r\n")
            .await
            .unwrap();

        // 客户端应当直接放弃：连接关闭前不会再发任何字节（没有 TLS ClientHello）
        let mut rest = [0u8; 1];
        let n = stream.read(&mut rest).await.unwrap_or(0);
        (head, n)
    });

    let transport = TransportClient::new();
    let result = transport
        .post_json(
            "https://api.telegram.org/bot123/sendMessage",
            Some(&proxy_url),
            &json!({"chat_id": "1", "text": "hi"}),
        )
        .await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("407"), "error should carry CONNECT status: {err}");

    let (head, bytes_after_reject) = server.await.unwrap();
    assert!(
        head.starts_with("CONNECT api.telegram.org:443 HTTP/1.1\r\n"),
        "unexpected CONNECT request: {head}"
    );
    assert_eq!(bytes_after_reject, 0, "no TLS handshake after CONNECT rejection");
}

#[tokio::test]
async fn connect_success_is_followed_by_tls_client_hello() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let proxy_url = format!("http://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_head(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 200 Connection established\r\n\r\n")
            .await
            .unwrap();

        // 隧道建立后客户端立刻开始 TLS 握手，首字节是 handshake 记录类型 0x16
        let mut first = [0u8; 1];
        stream.read_exact(&mut first).await.unwrap();
        first[0]
    });

    let transport = TransportClient::new();
    let result = transport
        .post_json(
            "https://api.telegram.org/bot123/sendMessage",
            Some(&proxy_url),
            &json!({}),
        )
        .await;

    // 假代理无法完成握手，发送必然失败，但 TLS 必须已经开始
    assert!(result.is_err());
    assert_eq!(server.await.unwrap(), 0x16);
}

#[tokio::test]
async fn connect_carries_decoded_basic_auth() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // 百分号编码的 user-info 在认证头里应当是解码后的明文
    let proxy_url = format!("http://us%40er:p%3Ass@{addr}");

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let head = read_head(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 403 Forbidden\r\n\r\n")
            .await
            .unwrap();
        head
    });

    let transport = TransportClient::new();
    let result = transport
        .post_json("https://open.feishu.cn/hook/x", Some(&proxy_url), &json!({}))
        .await;
    assert!(result.is_err());

    let head = server.await.unwrap();
    let expected = format!("Proxy-Authorization: Basic {}", BASE64.encode("us@er:p:ss"));
    assert!(head.contains(&expected), "missing auth header: {head}");
}

#[tokio::test]
async fn unreachable_proxy_resolves_to_error() {
    // 拿到一个刚释放的端口，确保连接被拒绝
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = TransportClient::new();
    let result = transport
        .post_json(
            "https://open.feishu.cn/hook/x",
            Some(&format!("http://{addr}")),
            &json!({}),
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn invalid_urls_fail_before_any_io() {
    let transport = TransportClient::new();

    assert!(transport
        .post_json("not a url", None, &json!({}))
        .await
        .is_err());
    assert!(transport
        .post_json("http://insecure.example/hook", None, &json!({}))
        .await
        .is_err());
    assert!(transport
        .post_json(
            "https://open.feishu.cn/hook",
            Some("::bad proxy::"),
            &json!({}),
        )
        .await
        .is_err());
}
