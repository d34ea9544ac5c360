use std::io::{self, IsTerminal};
#[cfg(unix)]
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::{Frame, Terminal, TerminalOptions, Viewport};
use tracing::{debug, warn};

use crate::error::UnforgetError;

/// Smallest usable viewport: the query line plus one result row.
const MIN_VIEWPORT_HEIGHT: u16 = 2;

/// Exit status used when a termination signal tears the session down.
const SIGNAL_EXIT_CODE: i32 = 130;

/// Where the picker draws. On unix this is the controlling terminal, so the picker
/// still works when stdout is captured (`cmd=$(unforget --print)`); see
/// [`CrosstermMode`] for the cursor query that would otherwise go to stdout.
#[cfg(unix)]
pub type TtyWriter = std::fs::File;
#[cfg(not(unix))]
pub type TtyWriter = io::Stdout;

#[cfg(unix)]
fn open_tty() -> io::Result<TtyWriter> {
    std::fs::File::options().read(true).write(true).open("/dev/tty")
}

#[cfg(not(unix))]
fn open_tty() -> io::Result<TtyWriter> {
    Ok(io::stdout())
}

/// Switches the terminal in and out of raw mode.
pub trait TerminalMode {
    fn enter(&mut self) -> io::Result<()>;
    fn leave(&mut self) -> io::Result<()>;
}

/// Raw mode through crossterm.
///
/// crossterm writes its cursor-position query to stdout, and the inline viewport
/// cannot be placed without the reply. When stdout is not a terminal, fd 1 is pointed
/// at `/dev/tty` for as long as raw mode is on.
#[derive(Debug, Default)]
pub struct CrosstermMode {
    #[cfg(unix)]
    stdout: Option<FdRedirect>,
}

impl TerminalMode for CrosstermMode {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        if let Err(err) = self.redirect_stdout() {
            let _ = disable_raw_mode();
            return Err(err);
        }
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        let restored = self.restore_stdout();
        disable_raw_mode().and(restored)
    }
}

#[cfg(unix)]
impl CrosstermMode {
    fn redirect_stdout(&mut self) -> io::Result<()> {
        if io::stdout().is_terminal() {
            return Ok(());
        }
        let tty = open_tty()?;
        self.stdout = Some(FdRedirect::new(libc::STDOUT_FILENO, &tty)?);
        debug!("stdout is not a terminal, pointed it at /dev/tty");
        Ok(())
    }

    fn restore_stdout(&mut self) -> io::Result<()> {
        self.stdout.take().map_or(Ok(()), FdRedirect::restore)
    }
}

#[cfg(not(unix))]
impl CrosstermMode {
    fn redirect_stdout(&mut self) -> io::Result<()> {
        if !io::stdout().is_terminal() {
            debug!("stdout is not a terminal, cursor queries may time out");
        }
        Ok(())
    }

    fn restore_stdout(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Points descriptor `fd` at another open file until [`FdRedirect::restore`].
#[cfg(unix)]
#[derive(Debug)]
pub(crate) struct FdRedirect {
    fd: RawFd,
    saved: OwnedFd,
}

#[cfg(unix)]
impl FdRedirect {
    pub(crate) fn new(fd: RawFd, target: &impl AsRawFd) -> io::Result<Self> {
        // SAFETY: only borrowed for the duplicate below; the caller keeps `fd` open
        let saved = unsafe { BorrowedFd::borrow_raw(fd) }.try_clone_to_owned()?;
        if unsafe { libc::dup2(target.as_raw_fd(), fd) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd, saved })
    }

    pub(crate) fn restore(self) -> io::Result<()> {
        if unsafe { libc::dup2(self.saved.as_raw_fd(), self.fd) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// One-shot flag shared by every path that may tear the session down.
///
/// Whoever claims it first restores the terminal; everyone else does nothing.
#[derive(Debug, Clone, Default)]
pub struct ReleaseLatch(Arc<AtomicBool>);

impl ReleaseLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true exactly once across all clones.
    pub fn claim(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Exclusive raw-mode access to the terminal for the lifetime of the picker.
///
/// Raw mode is entered on construction and left exactly once, by whichever comes
/// first: [`TerminalSession::release`], `Drop`, or an emergency hook holding the
/// session's [`ReleaseLatch`].
pub struct TerminalSession<B: Backend, M: TerminalMode> {
    terminal: Terminal<B>,
    mode: M,
    latch: ReleaseLatch,
}

impl TerminalSession<CrosstermBackend<TtyWriter>, CrosstermMode> {
    /// Enter raw mode and open an inline viewport of up to `height` rows below the
    /// cursor. Scrollback above the viewport is left alone.
    pub fn acquire(height: u16) -> Result<Self, UnforgetError> {
        let mut mode = CrosstermMode::default();
        mode.enter().map_err(UnforgetError::TerminalAcquisitionFailure)?;

        match inline_terminal(height) {
            Ok(terminal) => {
                debug!(requested_height = height, "terminal acquired");
                Ok(Self { terminal, mode, latch: ReleaseLatch::new() })
            }
            Err(err) => {
                if let Err(leave_err) = mode.leave() {
                    warn!("failed to leave raw mode after setup error: {leave_err}");
                }
                Err(UnforgetError::TerminalAcquisitionFailure(err))
            }
        }
    }
}

fn inline_terminal(height: u16) -> io::Result<Terminal<CrosstermBackend<TtyWriter>>> {
    let (_, rows) = terminal::size()?;
    let height = height.min(rows).max(MIN_VIEWPORT_HEIGHT);
    let backend = CrosstermBackend::new(open_tty()?);
    Terminal::with_options(backend, TerminalOptions { viewport: Viewport::Inline(height) })
}

impl<B: Backend, M: TerminalMode> TerminalSession<B, M> {
    /// Enter raw mode through `mode` and take ownership of an existing terminal.
    pub fn with_parts(terminal: Terminal<B>, mut mode: M) -> Result<Self, UnforgetError> {
        mode.enter().map_err(UnforgetError::TerminalAcquisitionFailure)?;
        Ok(Self { terminal, mode, latch: ReleaseLatch::new() })
    }

    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Handle for emergency teardown paths (panic hook, signal handler).
    pub fn latch(&self) -> ReleaseLatch {
        self.latch.clone()
    }

    pub fn is_released(&self) -> bool {
        self.latch.is_released()
    }

    /// Clear the viewport, show the cursor and leave raw mode. Idempotent.
    ///
    /// Raw mode is left even when clearing fails; the first error is returned.
    pub fn release(&mut self) -> io::Result<()> {
        if !self.latch.claim() {
            return Ok(());
        }
        let cleared = self.terminal.clear().and_then(|()| self.terminal.show_cursor());
        let left = self.mode.leave();
        debug!("terminal released");
        cleared.and(left)
    }
}

// Ensure cleanup happens even if dropped (panic, early return, etc.)
impl<B: Backend, M: TerminalMode> Drop for TerminalSession<B, M> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("failed to restore terminal: {err}");
        }
    }
}

/// Run `body` with the session, then release it unconditionally.
///
/// The body's error wins over a release error, but the terminal is always restored
/// before either is returned.
pub fn scoped<B, M, T, F>(mut session: TerminalSession<B, M>, body: F) -> Result<T>
where
    B: Backend,
    M: TerminalMode,
    F: FnOnce(&mut TerminalSession<B, M>) -> Result<T>,
{
    let outcome = body(&mut session);
    let released = session.release();
    let value = outcome?;
    released.context("failed to restore the terminal")?;
    Ok(value)
}

/// Leave raw mode if nobody else has. Safe to call from any thread.
fn emergency_restore(latch: &ReleaseLatch) {
    if latch.claim() {
        let _ = disable_raw_mode();
        let mut stderr = io::stderr();
        let _ = execute!(stderr, Show);
    }
}

/// Restore the terminal on panic and on SIGTERM/SIGHUP.
///
/// Ctrl-C does not need a handler: in raw mode it arrives as a key event.
pub fn install_restore_hooks(latch: &ReleaseLatch) {
    let panic_latch = latch.clone();
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        emergency_restore(&panic_latch);
        previous(info);
    }));

    let signal_latch = latch.clone();
    let installed = ctrlc::set_handler(move || {
        emergency_restore(&signal_latch);
        std::process::exit(SIGNAL_EXIT_CODE);
    });
    if let Err(err) = installed {
        warn!("could not install signal handler: {err}");
    }
}
