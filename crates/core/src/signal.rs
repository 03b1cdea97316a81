//! Delivery of external reopen requests (SIGHUP, SIGUSR1) to the writer.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::io;

/// Start listening for reopen signals. Each signal becomes one message on the
/// returned channel; signals arriving while a request is still pending are
/// folded into it.
pub fn reopen_triggers() -> io::Result<Receiver<()>> {
    let (sx, rx) = bounded(1);
    listen(sx)?;
    Ok(rx)
}

#[cfg(unix)]
fn listen(sx: Sender<()>) -> io::Result<()> {
    use signal_hook::{
        consts::{SIGHUP, SIGUSR1},
        iterator::Signals,
    };

    let mut signals = Signals::new([SIGHUP, SIGUSR1])?;
    std::thread::spawn(move || {
        for signal in signals.forever() {
            tracing::debug!(signal, "received reopen signal");
            if !forward(&sx) {
                break;
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn listen(sx: Sender<()>) -> io::Result<()> {
    drop(sx);
    tracing::warn!("reopen signals are not supported on this platform");
    Ok(())
}

/// Queue a reopen request unless one is already pending. Returns `false` once
/// nobody is listening anymore.
pub fn forward(sx: &Sender<()>) -> bool {
    match sx.try_send(()) {
        Ok(()) | Err(TrySendError::Full(())) => true,
        Err(TrySendError::Disconnected(())) => false,
    }
}

#[cfg(test)]
mod test {
    use super::forward;
    use crossbeam_channel::bounded;

    #[test]
    fn pending_requests_coalesce() {
        let (sx, rx) = bounded(1);
        assert!(forward(&sx));
        assert!(forward(&sx));
        assert!(forward(&sx));
        assert_eq!(rx.len(), 1);

        rx.recv().unwrap();
        assert!(rx.is_empty());

        drop(rx);
        assert!(!forward(&sx));
    }

    #[cfg(unix)]
    #[test]
    fn signal_becomes_trigger() {
        use signal_hook::{consts::SIGUSR1, low_level::raise};
        use std::time::Duration;

        let triggers = super::reopen_triggers().unwrap();
        raise(SIGUSR1).unwrap();
        assert!(triggers.recv_timeout(Duration::from_secs(5)).is_ok());
    }
}
