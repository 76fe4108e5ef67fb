//! Mail fixtures and a scripted IMAP server for the extractor tests.

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use lettre::message::{header::ContentType, Mailbox, MultiPart};
use lettre::Message;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Once;
use std::thread;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

/// A click-tracking link that decodes to `target`.
pub fn tracking_url(target: &str) -> String {
    format!(
        "https://link.apnews.com/click/38291045.112233/{}/5e8c0d1f",
        URL_SAFE_NO_PAD.encode(target)
    )
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

pub struct TestEmail {
    pub from: &'static str,
    pub subject: String,
    pub message_id: String,
    pub date: DateTime<Utc>,
    pub html: Option<String>,
}

impl TestEmail {
    pub fn html(from: &'static str, subject: &str, message_id: &str, date: DateTime<Utc>, html: String) -> Self {
        Self {
            from,
            subject: subject.to_string(),
            message_id: message_id.to_string(),
            date,
            html: Some(html),
        }
    }

    pub fn plain(from: &'static str, subject: &str, message_id: &str, date: DateTime<Utc>) -> Self {
        Self {
            from,
            subject: subject.to_string(),
            message_id: message_id.to_string(),
            date,
            html: None,
        }
    }

    /// RFC 822 bytes as a mail server would hand them over.
    pub fn to_rfc822(&self) -> Vec<u8> {
        let from: Mailbox = format!("AP News <{}>", self.from).parse().unwrap();
        let to: Mailbox = "reader@example.com".parse().unwrap();
        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.clone())
            .date(self.date.into())
            .message_id(Some(format!("<{}>", self.message_id)));

        let message = match &self.html {
            Some(html) => builder
                .multipart(MultiPart::alternative_plain_html(
                    "View this email in your browser.".to_string(),
                    html.clone(),
                ))
                .unwrap(),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body("Plain text only.".to_string())
                .unwrap(),
        };
        message.formatted()
    }
}

pub fn alert_html(target: &str) -> String {
    format!(
        r#"<html><body><table>
<tr><td style="font-size: 14px">BREAKING NEWS</td></tr>
<tr><td><p style="font-size: 18px; line-height: 26px; color: #121212">NASA says the four Artemis astronauts splashed down safely in the Pacific on Tuesday after their lunar flyby.</p></td></tr>
<tr><td><a href="{}">Read the full story</a></td></tr>
</table></body></html>"#,
        tracking_url(target)
    )
}

pub fn digest_html(lead: &str, related: &str, other: &str) -> String {
    format!(
        r#"<html><body><table>
<tr><td><strong>UP FIRST</strong></td></tr>
<tr><td style="font-size: 24px; font-family: Georgia"><strong>Senate reaches deal on spending package</strong></td></tr>
<tr><td><a href="{lead}"><img src="https://storage.example.com/lead.jpg"></a></td></tr>
<tr><td><p style="font-size: 18px; line-height: 27px">Lawmakers agreed late Monday on a plan to keep the government open. Read more.</p></td></tr>
<tr><td><strong>RELATED COVERAGE ➤</strong><ul><li><a href="{related}">House leaders react to the Senate spending agreement</a></li></ul></td></tr>
<tr><td><div class="divider_block"></div></td></tr>
<tr><td><strong>IN OTHER NEWS</strong></td></tr>
<tr><td><p><strong>Weather:</strong> <a href="{other}">Storms expected across the Midwest this weekend</a></p></td></tr>
<tr><td><p><strong>LISTEN:</strong> <a href="{other}">The AP news minute podcast episode</a></p></td></tr>
</table></body></html>"#,
        lead = tracking_url(lead),
        related = tracking_url(related),
        other = tracking_url(other),
    )
}

/// How the scripted server answers `LOGIN`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Login {
    Accept,
    Reject,
}

/// Serve `messages` over plaintext IMAP on a loopback port for one session.
///
/// Understands just enough of LOGIN, EXAMINE, SEARCH, FETCH and LOGOUT for
/// the ingester. Returns the port.
pub fn serve_mailbox(messages: Vec<TestEmail>, login: Login) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let mailbox: Vec<(&'static str, Vec<u8>)> =
        messages.iter().map(|m| (m.from, m.to_rfc822())).collect();

    thread::spawn(move || {
        let Ok((stream, _)) = listener.accept() else {
            return;
        };
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);
        writer.write_all(b"* OK Fake IMAP4rev1 ready\r\n").unwrap();

        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                break;
            }
            let mut parts = line.trim_end().splitn(3, ' ');
            let tag = parts.next().unwrap_or_default().to_string();
            let command = parts.next().unwrap_or_default().to_uppercase();
            let args = parts.next().unwrap_or_default().to_string();

            let mut reply: Vec<u8> = Vec::new();
            match command.as_str() {
                "LOGIN" if login == Login::Reject => {
                    reply.extend(format!("{tag} NO [AUTHENTICATIONFAILED] Invalid credentials\r\n").bytes());
                }
                "LOGIN" => reply.extend(format!("{tag} OK LOGIN completed\r\n").bytes()),
                "EXAMINE" => {
                    reply.extend(b"* FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n");
                    reply.extend(format!("* {} EXISTS\r\n", mailbox.len()).bytes());
                    reply.extend(b"* 0 RECENT\r\n");
                    reply.extend(format!("{tag} OK [READ-ONLY] EXAMINE completed\r\n").bytes());
                }
                "SEARCH" => {
                    let sender = args.split('"').nth(1).unwrap_or_default().to_string();
                    let hits: Vec<String> = mailbox
                        .iter()
                        .enumerate()
                        .filter(|(_, (from, _))| *from == sender)
                        .map(|(i, _)| (i + 1).to_string())
                        .collect();
                    if !hits.is_empty() {
                        reply.extend(format!("* SEARCH {}\r\n", hits.join(" ")).bytes());
                    }
                    reply.extend(format!("{tag} OK SEARCH completed\r\n").bytes());
                }
                "FETCH" => {
                    let seq: usize = args.split(' ').next().unwrap_or_default().parse().unwrap_or(0);
                    if let Some((_, raw)) = seq.checked_sub(1).and_then(|i| mailbox.get(i)) {
                        reply.extend(format!("* {seq} FETCH (RFC822 {{{}}}\r\n", raw.len()).bytes());
                        reply.extend(raw);
                        reply.extend(b")\r\n");
                    }
                    reply.extend(format!("{tag} OK FETCH completed\r\n").bytes());
                }
                "LOGOUT" => {
                    reply.extend(b"* BYE Logging out\r\n");
                    reply.extend(format!("{tag} OK LOGOUT completed\r\n").bytes());
                }
                _ => reply.extend(format!("{tag} BAD Unknown command\r\n").bytes()),
            }

            if writer.write_all(&reply).is_err() || command == "LOGOUT" {
                break;
            }
        }
    });

    port
}

pub fn plaintext_uri(port: u16) -> String {
    format!("email://test@127.0.0.1:{port}/INBOX?tls=false")
}
