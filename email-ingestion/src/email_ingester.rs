use std::collections::{BTreeSet, HashSet};
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use interfaces::dedup::is_duplicate_of_any;
use interfaces::defs::{Article, LookbackWindow};
use interfaces::state::{LedgerStore, ProcessedLedger};
use mail_parser::{Message, MessageParser, PartType};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::alert::parse_alert;
use crate::digest::parse_digest;
use crate::error::{IngestError, Result};
use crate::senders::{sender_kind, Publisher, SenderKind, ALLOWED_SENDERS};

pub const DEFAULT_MAILBOX_URI: &str = "email://imap.gmail.com:993/INBOX";

/// Producer tag written into batches from this crate.
pub const BATCH_SOURCE_TAG: &str = "ap_email_parser";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ImapCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct EmailIngesterConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub mailbox: String,
    pub use_tls: bool,
    pub accept_invalid_certs: bool,
    pub accept_invalid_hostnames: bool,
    pub connect_timeout: Duration,
    pub io_timeout: Duration,
}

impl EmailIngesterConfig {
    /// Parse email configuration from URI and credentials
    /// Expected URI format: email://[username@]server[:port]/mailbox?tls=true
    pub fn from_uri_and_credentials(uri: &str, credentials: &ImapCredentials) -> Result<Self> {
        let invalid = |reason: String| IngestError::InvalidUri {
            uri: uri.to_string(),
            reason,
        };

        let parsed_uri = Url::parse(uri).map_err(|e| invalid(e.to_string()))?;

        if parsed_uri.scheme() != "email" {
            return Err(invalid(format!(
                "URI must use 'email://' scheme, got: {}",
                parsed_uri.scheme()
            )));
        }

        let server = parsed_uri
            .host_str()
            .ok_or_else(|| invalid("no server specified".to_string()))?
            .to_string();

        let use_tls = query_flag(&parsed_uri, "tls").unwrap_or(true);
        let port = parsed_uri.port().unwrap_or(if use_tls { 993 } else { 143 });

        // Username in the URI wins over the one passed alongside it
        let username = {
            let user = parsed_uri.username();
            if !user.is_empty() {
                user.to_string()
            } else {
                credentials.username.clone()
            }
        };

        let mailbox = {
            let path = parsed_uri.path().trim_start_matches('/');
            if path.is_empty() {
                "INBOX".to_string()
            } else {
                path.to_string()
            }
        };

        // Only for local test servers
        let accept_invalid_certs = query_flag(&parsed_uri, "accept_invalid_certs").unwrap_or(false);
        let accept_invalid_hostnames =
            query_flag(&parsed_uri, "accept_invalid_hostnames").unwrap_or(false);

        Ok(Self {
            server,
            port,
            username,
            password: credentials.password.clone(),
            mailbox,
            use_tls,
            accept_invalid_certs,
            accept_invalid_hostnames,
            connect_timeout: DEFAULT_TIMEOUT,
            io_timeout: DEFAULT_TIMEOUT,
        })
    }
}

fn query_flag(uri: &Url, key: &str) -> Option<bool> {
    uri.query_pairs()
        .find(|(k, _)| k == key)
        .and_then(|(_, value)| value.parse().ok())
}

/// IMAP `SINCE` takes a bare date such as `06-Mar-2025`.
pub fn imap_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string()
}

/// One fetched message as raw RFC 822 bytes.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub seq: u32,
    pub bytes: Vec<u8>,
}

pub struct EmailIngester {
    config: EmailIngesterConfig,
    publisher: Publisher,
}

impl EmailIngester {
    pub fn new(config: EmailIngesterConfig) -> Self {
        Self {
            config,
            publisher: Publisher::associated_press(),
        }
    }

    /// Full run: load the ledger, read the mailbox, extract, save the ledger.
    ///
    /// A mailbox that cannot be reached yields no articles and leaves the
    /// ledger untouched.
    pub fn run(&self, window: &LookbackWindow, store: &dyn LedgerStore) -> Vec<Article> {
        let mut ledger = match ProcessedLedger::load_from(store) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!("Could not load processed ids, starting fresh: {:#}", e);
                ProcessedLedger::default()
            }
        };

        let messages = match self.fetch_messages(window) {
            Ok(messages) => messages,
            Err(e) => {
                error!("Mailbox unavailable: {}", e);
                return Vec::new();
            }
        };

        if messages.is_empty() {
            info!("No matching emails found in timeframe");
        } else {
            info!("Processing {} emails", messages.len());
        }

        let articles = extract_articles(&messages, window, &mut ledger, &self.publisher);

        if let Err(e) = ledger.save_to(store) {
            warn!("Failed to save processed ids: {:#}", e);
        }
        info!("{} unique stories extracted", articles.len());
        articles
    }

    /// Every allow-listed message since the window's cutoff date.
    pub fn fetch_messages(&self, window: &LookbackWindow) -> Result<Vec<RawMessage>> {
        let config = &self.config;
        info!("Connecting to {}:{}", config.server, config.port);
        let tcp = connect_tcp(config)?;

        if config.use_tls {
            let tls_error = |reason: String| IngestError::Tls {
                server: config.server.clone(),
                reason,
            };
            let tls = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(config.accept_invalid_certs)
                .danger_accept_invalid_hostnames(config.accept_invalid_hostnames)
                .build()
                .map_err(|e| tls_error(e.to_string()))?;
            let stream = tls
                .connect(&config.server, tcp)
                .map_err(|e| tls_error(e.to_string()))?;
            self.fetch_over(imap::Client::new(stream), window)
        } else {
            self.fetch_over(imap::Client::new(tcp), window)
        }
    }

    fn fetch_over<T: Read + Write>(
        &self,
        mut client: imap::Client<T>,
        window: &LookbackWindow,
    ) -> Result<Vec<RawMessage>> {
        let config = &self.config;
        client.read_greeting().map_err(|e| IngestError::Connect {
            server: config.server.clone(),
            reason: e.to_string(),
        })?;

        let mut session = client
            .login(&config.username, &config.password)
            .map_err(|(e, _)| IngestError::Login {
                user: config.username.clone(),
                reason: e.to_string(),
            })?;

        let result = self.fetch_allowed(&mut session, window);

        if let Err(e) = session.logout() {
            warn!("IMAP logout failed: {}", e);
        }
        result
    }

    fn fetch_allowed<T: Read + Write>(
        &self,
        session: &mut imap::Session<T>,
        window: &LookbackWindow,
    ) -> Result<Vec<RawMessage>> {
        // Read-only: never touch \Seen flags
        session
            .examine(&self.config.mailbox)
            .map_err(|e| IngestError::Mailbox {
                mailbox: self.config.mailbox.clone(),
                reason: e.to_string(),
            })?;

        let since = imap_date(window.cutoff_date());
        let mut sequence_numbers = BTreeSet::new();
        for (sender, _) in ALLOWED_SENDERS {
            let query = format!("FROM \"{}\" SINCE {}", sender, since);
            let found = session.search(&query)?;
            info!("{}: {} emails found", sender, found.len());
            sequence_numbers.extend(found);
        }

        let mut messages = Vec::new();
        for seq in sequence_numbers {
            match session.fetch(seq.to_string(), "RFC822") {
                Ok(fetches) => {
                    for fetch in fetches.iter() {
                        if let Some(body) = fetch.body() {
                            messages.push(RawMessage {
                                seq,
                                bytes: body.to_vec(),
                            });
                        }
                    }
                }
                Err(e) => warn!("Failed to fetch message {}: {}", seq, e),
            }
        }
        Ok(messages)
    }
}

fn connect_tcp(config: &EmailIngesterConfig) -> Result<TcpStream> {
    let connect_error = |reason: String| IngestError::Connect {
        server: format!("{}:{}", config.server, config.port),
        reason,
    };

    let addrs = (config.server.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|e| connect_error(e.to_string()))?;

    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, config.connect_timeout) {
            Ok(stream) => {
                stream
                    .set_read_timeout(Some(config.io_timeout))
                    .and_then(|_| stream.set_write_timeout(Some(config.io_timeout)))
                    .map_err(|e| connect_error(e.to_string()))?;
                return Ok(stream);
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(connect_error(
        last_error.map_or_else(|| "no addresses resolved".to_string(), |e| e.to_string()),
    ))
}

/// What happened to one message.
#[derive(Debug)]
pub enum MessageOutcome {
    Skipped(&'static str),
    Extracted {
        message_id: Option<String>,
        subject: String,
        primary: Vec<Article>,
        related: Vec<Article>,
    },
}

fn html_body(message: &Message<'_>) -> Option<String> {
    message
        .html_body
        .iter()
        .filter_map(|id| message.parts.get(*id as usize))
        .find_map(|part| match &part.body {
            PartType::Html(html) if !html.trim().is_empty() => Some(html.to_string()),
            _ => None,
        })
}

pub fn process_message(
    raw: &RawMessage,
    window: &LookbackWindow,
    ledger: &ProcessedLedger,
    publisher: &Publisher,
) -> Result<MessageOutcome> {
    let message = MessageParser::default()
        .parse(raw.bytes.as_slice())
        .ok_or_else(|| IngestError::MalformedMessage(format!("message {} is not valid RFC 822", raw.seq)))?;

    let message_id = message
        .message_id()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    if message_id.as_deref().is_some_and(|id| ledger.contains(id)) {
        return Ok(MessageOutcome::Skipped("already processed"));
    }

    let from = message
        .from()
        .and_then(|addrs| addrs.first())
        .and_then(|addr| addr.address.as_deref())
        .unwrap_or_default();
    let Some(kind) = sender_kind(from) else {
        return Ok(MessageOutcome::Skipped("sender not on allow-list"));
    };

    let published = message
        .date()
        .and_then(|date| DateTime::<Utc>::from_timestamp(date.to_timestamp(), 0));
    if !window.admits(published) {
        return Ok(MessageOutcome::Skipped("older than window"));
    }

    let Some(html) = html_body(&message) else {
        return Ok(MessageOutcome::Skipped("no HTML body"));
    };

    let subject = message.subject().unwrap_or_default().to_string();
    let (primary, related) = match kind {
        SenderKind::Alert => (
            parse_alert(&subject, &html, published, publisher).into_iter().collect(),
            Vec::new(),
        ),
        SenderKind::Digest => {
            let extraction = parse_digest(&html, published, publisher);
            (extraction.primary, extraction.related)
        }
    };

    Ok(MessageOutcome::Extracted {
        message_id,
        subject,
        primary,
        related,
    })
}

/// Turn fetched messages into deduplicated records, recording each handled
/// message in `ledger`.
pub fn extract_articles(
    messages: &[RawMessage],
    window: &LookbackWindow,
    ledger: &mut ProcessedLedger,
    publisher: &Publisher,
) -> Vec<Article> {
    let mut articles: Vec<Article> = Vec::new();
    let mut fingerprints: HashSet<String> = HashSet::new();

    for raw in messages {
        match process_message(raw, window, ledger, publisher) {
            Ok(MessageOutcome::Skipped(reason)) => {
                debug!("Skipping message {}: {}", raw.seq, reason);
            }
            Ok(MessageOutcome::Extracted {
                message_id,
                subject,
                primary,
                related,
            }) => {
                let stories = primary.len() + related.len();
                for article in primary {
                    if fingerprints.insert(article.fingerprint.clone()) {
                        articles.push(article);
                    }
                }
                for article in related {
                    if !is_duplicate_of_any(&article, &articles) {
                        fingerprints.insert(article.fingerprint.clone());
                        articles.push(article);
                    }
                }
                if let Some(id) = message_id {
                    ledger.record(id);
                }
                let short_subject: String = subject.chars().take(60).collect();
                info!("Message {}: {} ({} stories)", raw.seq, short_subject, stories);
            }
            Err(e) => warn!("Error processing message {}: {}", raw.seq, e),
        }
    }
    articles
}
