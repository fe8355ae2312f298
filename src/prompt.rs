//! # Verification Code Prompts
//!
//! A challenged login stops after the server has texted a one-time code and
//! waits for someone to type it back. That wait is the only suspension point
//! in the client, and it is modelled as the [`CodePrompt`] trait so callers
//! decide where the code comes from:
//!
//! - [`TerminalPrompt`] asks on the controlling terminal and waits as long as
//!   it takes.
//! - [`ChannelPrompt`] receives the code from another thread. Dropping the
//!   sender, or configuring a timeout, abandons the wait.
//! - Any `Fn(&CodeDelivery) -> Res<String>` closure, which is what tests use.

use std::{
    sync::mpsc::{Receiver, RecvTimeoutError},
    time::Duration,
};

use dialoguer::Input;

use crate::{Res, error::Error, info, types::CodeDelivery, warning};

/// Supplies the one-time code for a challenged login. Blocking.
pub trait CodePrompt {
    fn request_code(&self, delivery: &CodeDelivery) -> Res<String>;
}

impl<F> CodePrompt for F
where
    F: Fn(&CodeDelivery) -> Res<String>,
{
    fn request_code(&self, delivery: &CodeDelivery) -> Res<String> {
        self(delivery)
    }
}

/// Reads the code from the terminal. No timeout.
#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    label: String,
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self {
            label: "SMS code received".to_string(),
        }
    }
}

impl TerminalPrompt {
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl CodePrompt for TerminalPrompt {
    fn request_code(&self, delivery: &CodeDelivery) -> Res<String> {
        match delivery.status.as_deref() {
            Some("sent") | None => info!("Verification code sent via {}", delivery.channel),
            Some(status) => warning!(
                "Verification code delivery via {} reported status '{}'",
                delivery.channel,
                status
            ),
        }

        let code: String = Input::new().with_prompt(&self.label).interact_text()?;
        Ok(code)
    }
}

/// Waits for a code sent over a channel.
///
/// Returns [`Error::PromptCancelled`] when every sender is dropped, or when
/// the optional timeout elapses first.
#[derive(Debug)]
pub struct ChannelPrompt {
    receiver: Receiver<String>,
    timeout: Option<Duration>,
}

impl ChannelPrompt {
    pub fn new(receiver: Receiver<String>) -> Self {
        Self {
            receiver,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl CodePrompt for ChannelPrompt {
    fn request_code(&self, _delivery: &CodeDelivery) -> Res<String> {
        match self.timeout {
            None => self.receiver.recv().map_err(|_| Error::PromptCancelled),
            Some(timeout) => self.receiver.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected => {
                    Error::PromptCancelled
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, thread};

    use super::*;
    use crate::types::OtpChannel;

    fn delivery() -> CodeDelivery {
        CodeDelivery {
            channel: OtpChannel::Sms,
            status: Some("sent".to_string()),
        }
    }

    #[test]
    fn test_closure_prompt() {
        let prompt = |d: &CodeDelivery| -> Res<String> {
            assert_eq!(d.channel, OtpChannel::Sms);
            Ok("123456".to_string())
        };
        assert_eq!(prompt.request_code(&delivery()).unwrap(), "123456");
    }

    #[test]
    fn test_channel_prompt_receives_from_other_thread() {
        let (tx, rx) = mpsc::channel();
        let prompt = ChannelPrompt::new(rx);

        let handle = thread::spawn(move || tx.send("654321".to_string()).unwrap());
        let code = prompt.request_code(&delivery()).unwrap();
        handle.join().unwrap();

        assert_eq!(code, "654321");
    }

    #[test]
    fn test_channel_prompt_cancelled_when_sender_dropped() {
        let (tx, rx) = mpsc::channel::<String>();
        drop(tx);

        let result = ChannelPrompt::new(rx).request_code(&delivery());
        assert!(matches!(result, Err(Error::PromptCancelled)));
    }

    #[test]
    fn test_channel_prompt_times_out() {
        let (_tx, rx) = mpsc::channel::<String>();
        let prompt = ChannelPrompt::new(rx).with_timeout(Duration::from_millis(10));

        assert!(matches!(
            prompt.request_code(&delivery()),
            Err(Error::PromptCancelled)
        ));
    }
}
