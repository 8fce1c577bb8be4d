//! EULA consent gate.
//!
//! Installing Bedrock Dedicated Server requires agreeing to the Minecraft
//! EULA and the Microsoft Privacy Policy. The gate asks once per run and
//! aborts the whole update unless the answer is affirmative. It runs before
//! anything on disk is touched.

use anyhow::Result;
use colored::Colorize;
use std::future::Future;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::constants::{EULA_URL, PRIVACY_URL};
use crate::core::UpdateError;

/// Source of the operator's answer to the EULA question.
pub trait ConsentPrompt: Send + Sync {
    /// Present the legal terms and wait for one answer.
    ///
    /// Returns `Ok(None)` when input ended without an answer.
    fn ask(&self) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Answers the question interactively on stdin/stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl ConsentPrompt for TerminalPrompt {
    async fn ask(&self) -> Result<Option<String>> {
        println!("Before installing Bedrock Dedicated Server, you must agree to:");
        println!(" - Minecraft End User License Agreement");
        println!(" - Privacy Policy");
        println!();
        println!("EULA: {}", EULA_URL.cyan());
        println!("Privacy Policy: {}", PRIVACY_URL.cyan());
        println!();

        print!("{} ", "Do you agree? (y/n):".green());
        io::stdout().flush()?;

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut response = String::new();
        let read = reader.read_line(&mut response).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(response))
    }
}

/// Answers with a fixed string, e.g. `yes` for `--accept-eula`.
#[derive(Debug, Clone)]
pub struct PresetAnswer(pub String);

impl PresetAnswer {
    /// The answer given by `--accept-eula`.
    #[must_use]
    pub fn accept() -> Self {
        Self("yes".to_string())
    }
}

impl ConsentPrompt for PresetAnswer {
    async fn ask(&self) -> Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

/// `true` for `y`/`yes` in any case, surrounding whitespace ignored.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let normalized = answer.trim().to_lowercase();
    normalized == "y" || normalized == "yes"
}

/// Blocks the update until consent is given.
pub struct ConsentGate<P> {
    prompt: P,
}

impl<P: ConsentPrompt> ConsentGate<P> {
    pub fn new(prompt: P) -> Self {
        Self {
            prompt,
        }
    }

    /// Ask once; anything but an affirmative answer aborts.
    ///
    /// A prompt that fails to read counts as "no answer": the run is
    /// aborted, never continued.
    ///
    /// # Errors
    ///
    /// [`UpdateError::ConsentDeclined`] unless the answer was `y` or `yes`.
    pub async fn require_consent(&self) -> Result<(), UpdateError> {
        let answer = match self.prompt.ask().await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Failed to read EULA answer: {e:#}");
                None
            }
        };

        match answer {
            Some(answer) if is_affirmative(&answer) => {
                debug!("EULA consent given");
                Ok(())
            }
            other => {
                debug!("EULA consent not given: {:?}", other.as_deref().map(str::trim));
                Err(UpdateError::ConsentDeclined)
            }
        }
    }
}
