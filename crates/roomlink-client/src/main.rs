//! roomlink chat CLI.
//!
//! Bridges one chat room to the terminal: lines typed on stdin are sent as
//! TEXT messages, inbound envelopes are printed. This is the same flow the
//! web front end's chat widget drives through the session facade, with the
//! availability gate consulted up front the way the composer does.

use std::env;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use roomlink_client::config;
use roomlink_client::session::ChatSession;

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut args = env::args().skip(1);
    let room = args
        .next()
        .expect("usage: roomlink-client <room-id> [application-status]");
    let status = args.next();

    if let Some(status) = &status {
        if !ChatSession::is_chat_available(Some(status)) {
            eprintln!("chat is not available while the application is {status}");
            return;
        }
    }

    let cfg = config::load_from_file("roomlink.yaml").expect("config load failed");

    let mut session = ChatSession::new(&cfg);
    session.start(room.as_str()).await.expect("connect failed");
    let mut messages = session.messages().expect("session has no message stream");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            maybe_msg = messages.recv() => {
                match maybe_msg {
                    Some(msg) => println!("[{}] {}", msg.event_type, msg.content),
                    None => {
                        tracing::info!("chat transport closed");
                        break;
                    }
                }
            }
            maybe_line = lines.next_line() => {
                match maybe_line {
                    Ok(Some(line)) if !line.is_empty() => session.send(&line),
                    Ok(Some(_)) => {}
                    _ => break,
                }
            }
        }
    }

    session.close().await;
}
