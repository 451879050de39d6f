use std::time::Duration;

use formcheck::adapters::SmtpVerifier;
use formcheck::config::{SmtpConfig, SmtpTls};
use formcheck::diagnostics::{MailTransport, ProbeError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

const EHLO_REPLY: &str = "250-mail.example.com\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME\r\n";

fn relay_config(port: u16, greeting_timeout: Duration) -> SmtpConfig {
    SmtpConfig {
        host: "127.0.0.1".to_string(),
        port,
        user: "forms@example.com".to_string(),
        password: "hunter2".to_string(),
        tls: SmtpTls::None,
        greeting_timeout,
    }
}

/// Serves one plaintext SMTP session, answering AUTH with `auth_reply`, and returns the
/// commands it saw.
async fn fake_relay(
    greeting: &'static str,
    auth_reply: &'static str,
) -> (u16, tokio::task::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind relay");
    let port = listener.local_addr().expect("local addr").port();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut commands = Vec::new();

        writer.write_all(greeting.as_bytes()).await.expect("greet");
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                break;
            }
            let command = line.trim_end().to_string();
            let reply: &[u8] = if command.starts_with("EHLO") {
                EHLO_REPLY.as_bytes()
            } else if command.starts_with("AUTH") {
                auth_reply.as_bytes()
            } else if command == "NOOP" {
                b"250 ok\r\n"
            } else if command == "QUIT" {
                b"221 bye\r\n"
            } else {
                b"502 not implemented\r\n"
            };
            commands.push(command.clone());
            if writer.write_all(reply).await.is_err() || command == "QUIT" {
                break;
            }
        }
        commands
    });
    (port, handle)
}

#[tokio::test]
async fn logs_in_to_a_cooperative_relay() {
    let (port, relay) = fake_relay(
        "220 mail.example.com ESMTP\r\n",
        "235 2.7.0 authentication successful\r\n",
    )
    .await;
    let verifier = SmtpVerifier::new(Some(relay_config(port, Duration::from_secs(5))));

    assert_eq!(verifier.verify().await, Ok(()));

    let commands = relay.await.expect("relay finished");
    assert_eq!(commands[0], "EHLO formcheck.localhost");
    assert!(commands[1].starts_with("AUTH PLAIN "), "{commands:?}");
    assert_eq!(commands.last().map(String::as_str), Some("QUIT"));
}

#[tokio::test]
async fn refused_credentials_are_rejected() {
    let (port, _relay) = fake_relay(
        "220 mail.example.com ESMTP\r\n",
        "535 5.7.8 authentication credentials invalid\r\n",
    )
    .await;
    let verifier = SmtpVerifier::new(Some(relay_config(port, Duration::from_secs(5))));

    match verifier.verify().await {
        Err(ProbeError::Rejected(message)) => {
            assert!(message.contains("authentication failed"), "{message}")
        }
        other => panic!("expected rejected credentials, got {other:?}"),
    }
}

#[tokio::test]
async fn refusing_greeting_is_a_protocol_failure() {
    let (port, _relay) = fake_relay("554 no service\r\n", "235 ok\r\n").await;
    let verifier = SmtpVerifier::new(Some(relay_config(port, Duration::from_secs(5))));

    match verifier.verify().await {
        Err(ProbeError::Protocol(message)) => assert!(message.contains("554"), "{message}"),
        other => panic!("expected protocol failure, got {other:?}"),
    }
}

#[tokio::test]
async fn silent_relay_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind relay");
    let port = listener.local_addr().expect("local addr").port();
    let _silent = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(stream);
    });

    let verifier = SmtpVerifier::new(Some(relay_config(port, Duration::from_millis(200))));
    assert!(matches!(
        verifier.verify().await,
        Err(ProbeError::Transport(_))
    ));
}
