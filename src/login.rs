// src/login.rs
//! Sign-in stage: the user logs in by hand and the profile keeps the session.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent};

use crate::config::{BrowserSettings, SIGN_IN_URL};
use crate::error::Result;
use crate::events::{Event, EventSink};
use crate::page::Page;
use crate::session::with_session;

/// Block until a key event arrives or `limit` runs out. True if a key was seen.
fn wait_for_keypress(limit: Duration) -> io::Result<bool> {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if event::poll(Duration::from_millis(250))? {
            if let TermEvent::Key(_) = event::read()? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Open the sign-in page on the persistent profile and wait for the user.
pub async fn login(browser: &BrowserSettings, window: Duration, sink: &dyn EventSink) -> Result<()> {
    with_session(browser, |page| async move {
        page.goto(SIGN_IN_URL).await?;
        sink.emit(Event::LoginWaiting);

        let by_keypress = tokio::task::spawn_blocking(move || wait_for_keypress(window))
            .await
            .map_err(io::Error::other)??;

        sink.emit(Event::LoginFinished { by_keypress });
        Ok(())
    })
    .await
}
