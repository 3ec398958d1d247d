//! Signal delivery to child processes
//!
//! Wraps `kill(2)`. Signal `0` is used as an existence probe: it performs
//! the permission and pid checks without delivering anything.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

/// POSIX signals that can be sent to a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessSignal {
    /// Existence probe, delivers nothing
    Check,
    Hangup,
    Interrupt,
    Quit,
    Illegal,
    Trace,
    Abort,
    Bus,
    FloatingPoint,
    Kill,
    User1,
    Segmentation,
    User2,
    BrokenPipe,
    Alarm,
    Termination,
    ChildExited,
    Continue,
    /// Stop (cannot be caught or ignored)
    Stop,
    TerminalStop,
    BackgroundRead,
    BackgroundWrite,
    Urgent,
    CpuLimit,
    FileSizeLimit,
    VirtualAlarm,
    Profiling,
    WindowChange,
    IoPossible,
    BadSystemCall,
}

impl ProcessSignal {
    /// The OS signal, or `None` for the existence probe
    pub fn as_nix(self) -> Option<Signal> {
        let signal = match self {
            ProcessSignal::Check => return None,
            ProcessSignal::Hangup => Signal::SIGHUP,
            ProcessSignal::Interrupt => Signal::SIGINT,
            ProcessSignal::Quit => Signal::SIGQUIT,
            ProcessSignal::Illegal => Signal::SIGILL,
            ProcessSignal::Trace => Signal::SIGTRAP,
            ProcessSignal::Abort => Signal::SIGABRT,
            ProcessSignal::Bus => Signal::SIGBUS,
            ProcessSignal::FloatingPoint => Signal::SIGFPE,
            ProcessSignal::Kill => Signal::SIGKILL,
            ProcessSignal::User1 => Signal::SIGUSR1,
            ProcessSignal::Segmentation => Signal::SIGSEGV,
            ProcessSignal::User2 => Signal::SIGUSR2,
            ProcessSignal::BrokenPipe => Signal::SIGPIPE,
            ProcessSignal::Alarm => Signal::SIGALRM,
            ProcessSignal::Termination => Signal::SIGTERM,
            ProcessSignal::ChildExited => Signal::SIGCHLD,
            ProcessSignal::Continue => Signal::SIGCONT,
            ProcessSignal::Stop => Signal::SIGSTOP,
            ProcessSignal::TerminalStop => Signal::SIGTSTP,
            ProcessSignal::BackgroundRead => Signal::SIGTTIN,
            ProcessSignal::BackgroundWrite => Signal::SIGTTOU,
            ProcessSignal::Urgent => Signal::SIGURG,
            ProcessSignal::CpuLimit => Signal::SIGXCPU,
            ProcessSignal::FileSizeLimit => Signal::SIGXFSZ,
            ProcessSignal::VirtualAlarm => Signal::SIGVTALRM,
            ProcessSignal::Profiling => Signal::SIGPROF,
            ProcessSignal::WindowChange => Signal::SIGWINCH,
            ProcessSignal::IoPossible => Signal::SIGIO,
            ProcessSignal::BadSystemCall => Signal::SIGSYS,
        };
        Some(signal)
    }

    /// Raw signal number as understood by `kill(2)`
    pub fn number(self) -> i32 {
        self.as_nix().map(|s| s as i32).unwrap_or(0)
    }
}

/// Delivers signals to a process id
#[cfg_attr(test, mockall::automock)]
pub trait SignalSender: Send + Sync {
    /// Send `signal` to `pid`, returning whether delivery succeeded.
    ///
    /// A failure usually means the process no longer exists.
    fn send(&self, pid: u32, signal: ProcessSignal) -> bool;
}

/// [`SignalSender`] backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSignalSender;

impl SignalSender for OsSignalSender {
    fn send(&self, pid: u32, signal: ProcessSignal) -> bool {
        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };
        // pid 0 would address our own process group
        if raw <= 0 {
            return false;
        }
        match kill(Pid::from_raw(raw), signal.as_nix()) {
            Ok(()) => true,
            Err(errno) => {
                tracing::trace!(
                    pid,
                    ?signal,
                    number = signal.number(),
                    %errno,
                    "signal delivery failed"
                );
                false
            }
        }
    }
}
