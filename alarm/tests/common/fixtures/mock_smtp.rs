//! Minimal SMTP server for exercising the SMTP backend end to end
//!
//! Speaks just enough ESMTP for lettre over a plaintext connection and
//! records every line the client sends.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use super::test_data::{RECEIVER_EMAIL, SENDER_EMAIL};
use web_alarm::config::{SmtpSecurity, SmtpSettings};

pub const SMTP_PASSWORD: &str = "smtp-app-password";

pub struct MockSmtpServer {
    pub port: u16,
    transcript: Arc<Mutex<Vec<String>>>,
}

impl MockSmtpServer {
    /// Accepts every command
    pub async fn start() -> Self {
        Self::spawn(false).await
    }

    /// Answers `RCPT TO` with 550
    pub async fn start_rejecting_recipients() -> Self {
        Self::spawn(true).await
    }

    async fn spawn(reject_recipients: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock SMTP listener");
        let port = listener.local_addr().expect("No local addr").port();
        let transcript = Arc::new(Mutex::new(Vec::new()));

        let log = transcript.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = serve_session(stream, log, reject_recipients).await;
                });
            }
        });

        Self { port, transcript }
    }

    /// Plaintext settings pointing at this server
    pub fn settings(&self) -> SmtpSettings {
        SmtpSettings {
            server: "127.0.0.1".to_string(),
            port: self.port,
            username: SENDER_EMAIL.to_string(),
            password: SMTP_PASSWORD.to_string(),
            security: SmtpSecurity::None,
            sender_email: SENDER_EMAIL.to_string(),
            receiver_email: RECEIVER_EMAIL.to_string(),
        }
    }

    /// Every line received so far, message data included
    pub async fn transcript(&self) -> Vec<String> {
        self.transcript.lock().await.clone()
    }

    pub async fn has_line_starting_with(&self, prefix: &str) -> bool {
        self.transcript
            .lock()
            .await
            .iter()
            .any(|line| line.starts_with(prefix))
    }
}

async fn serve_session(
    stream: TcpStream,
    log: Arc<Mutex<Vec<String>>>,
    reject_recipients: bool,
) -> std::io::Result<()> {
    let (read_half, mut writer) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    writer.write_all(b"220 localhost ESMTP ready\r\n").await?;

    let mut in_data = false;
    while let Some(line) = lines.next_line().await? {
        log.lock().await.push(line.clone());

        if in_data {
            if line == "." {
                in_data = false;
                writer.write_all(b"250 2.0.0 Queued\r\n").await?;
            }
            continue;
        }

        let verb = line
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        let reply: &[u8] = match verb.as_str() {
            "EHLO" => b"250-localhost\r\n250 AUTH PLAIN LOGIN\r\n",
            "AUTH" => b"235 2.7.0 Authentication successful\r\n",
            "RCPT" if reject_recipients => b"550 5.1.1 Mailbox unavailable\r\n",
            "DATA" => {
                in_data = true;
                b"354 End data with <CR><LF>.<CR><LF>\r\n"
            }
            "QUIT" => {
                writer.write_all(b"221 2.0.0 Bye\r\n").await?;
                return Ok(());
            }
            _ => b"250 2.0.0 OK\r\n",
        };
        writer.write_all(reply).await?;
    }

    Ok(())
}
