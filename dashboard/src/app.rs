//! Dashboard application.
//!
//! Reads operator commands from stdin, forwards connection commands to the
//! session, prints notifications and redraws the dashboard when the
//! session publishes new state.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use skinwatch_sdk::ws::{now_ms, ConnectionSession};
use skinwatch_sdk::{Notification, SessionHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::auth::{login_success, AuthSession, LoginGate};
use crate::command::{Command, CommandError, HELP};
use crate::config::DashboardConfig;
use crate::render::DashboardView;
use crate::view::{unique_stickers, ViewState};

/// Minimum delay between automatic redraws.
const REDRAW_INTERVAL: Duration = Duration::from_secs(1);

/// What the command loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands.
    Continue,
    /// Exit.
    Quit,
}

/// The dashboard: login state, view state and the feed session.
pub struct DashboardApp {
    config: DashboardConfig,
    gate: LoginGate,
    auth: AuthSession,
    view: ViewState,
    session: SessionHandle,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

impl DashboardApp {
    /// Creates the app and starts its session.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        config.validate().context("invalid dashboard configuration")?;

        let (session, notifications) = ConnectionSession::spawn(config.session_config())
            .context("failed to start session")?;

        Ok(Self {
            gate: LoginGate::new(config.login_secret.clone()),
            config,
            auth: AuthSession::new(),
            view: ViewState::new(),
            session,
            notifications,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Returns the login state.
    #[must_use]
    pub const fn auth(&self) -> &AuthSession {
        &self.auth
    }

    /// Returns the view state.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Returns the session handle.
    #[must_use]
    pub const fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Writes the dashboard, or a login prompt when logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn render(&self, out: &mut impl Write) -> std::io::Result<()> {
        if !self.auth.is_authenticated() {
            return writeln!(out, "Log in with `login <password>` to view the dashboard.");
        }

        let snapshot = self.session.snapshot();
        let view = DashboardView::new(&snapshot, &self.view, self.config.websocket_url(), now_ms());
        writeln!(out, "{}", "=".repeat(72))?;
        write!(out, "{view}")
    }

    /// Executes one command.
    ///
    /// Everything except `login`, `help` and `quit` requires a login.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or the session has stopped.
    pub async fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        debug!(?command, "executing command");

        match command {
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Login(password) => match self.gate.attempt(&mut self.auth, &password) {
                Ok(()) => {
                    writeln!(out, "{}", login_success())?;
                    self.render(out)?;
                }
                Err(e) => writeln!(out, "{}", e.notification())?,
            },
            command => {
                if let Err(e) = self.auth.require() {
                    writeln!(out, "{}", e.notification())?;
                    return Ok(Flow::Continue);
                }
                self.execute_authenticated(command, out).await?;
            }
        }

        Ok(Flow::Continue)
    }

    async fn execute_authenticated(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Logout => {
                self.session.disconnect().await?;
                self.auth.logout();
                writeln!(out, "Logged out.")?;
            }
            Command::Connect(url) => {
                let url = url.unwrap_or_else(|| self.config.websocket_url().to_string());
                info!(%url, "connect requested");
                self.session.connect(url).await?;
            }
            Command::Disconnect => {
                info!("disconnect requested");
                self.session.disconnect().await?;
            }
            Command::Filter(text) => {
                self.view.set_sticker_filter(text);
                self.render(out)?;
            }
            Command::Price(range) => {
                self.view.set_price_range(range);
                self.render(out)?;
            }
            Command::Sort(key) => {
                self.view.sort_by(key);
                self.render(out)?;
            }
            Command::Stickers => {
                let stickers = unique_stickers(&self.session.snapshot().listings);
                if stickers.is_empty() {
                    writeln!(out, "No stickers yet.")?;
                }
                for sticker in stickers {
                    writeln!(out, "  {sticker}")?;
                }
            }
            Command::Show => self.render(out)?,
            Command::Login(_) | Command::Help | Command::Quit => {}
        }
        Ok(())
    }

    /// Runs the command loop until `quit`, end of input or Ctrl-C, then
    /// stops the session.
    ///
    /// # Errors
    ///
    /// Returns an error if reading stdin or writing stdout fails.
    pub async fn run(mut self) -> Result<()> {
        let mut out = std::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut snapshots = self.session.subscribe();
        let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
        redraw.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut dirty = false;

        writeln!(out, "{HELP}")?;
        self.render(&mut out)?;
        out.flush()?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read stdin")? else {
                        debug!("stdin closed");
                        break;
                    };
                    match line.parse::<Command>() {
                        Ok(command) => {
                            if self.execute(command, &mut out).await? == Flow::Quit {
                                break;
                            }
                        }
                        Err(CommandError::Empty) => {}
                        Err(e) => writeln!(out, "{e}")?,
                    }
                }
                Some(notification) = self.notifications.recv() => {
                    writeln!(out, "{notification}")?;
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    dirty = true;
                }
                _ = redraw.tick() => {
                    if dirty && self.auth.is_authenticated() {
                        self.render(&mut out)?;
                    }
                    dirty = false;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted");
                    break;
                }
            }
            out.flush()?;
        }

        let metrics = self.session.metrics().snapshot();
        self.session.shutdown().await.context("session did not stop cleanly")?;
        info!(
            frames_received = metrics.frames_received,
            frames_dropped = metrics.frames_dropped,
            listings_inserted = metrics.listings_inserted,
            listings_updated = metrics.listings_updated,
            liveness_timeouts = metrics.liveness_timeouts,
            uptime_secs = metrics.uptime.as_secs(),
            "dashboard stopped"
        );
        Ok(())
    }
}
