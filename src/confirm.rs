//! Two-step operator confirmation for destructive actions
//!
//! The gate walks `Prompt -> Signature -> Execute`. Any answer that does not
//! match sends it to `Cancelled` and nothing destructive happens:
//!
//! 1. The yes/no question accepts only `Y` (either case).
//! 2. The signature must be exactly `Proceed`.

use crate::error::{ConnectError, Result};
use std::io::{BufRead, Write};

/// Literal the operator must type at the second prompt
pub const SIGNATURE: &str = "Proceed";

const QUESTION: &str = "Are you sure you want to delete all the Connected Apps? (Y/n): ";
const SIGNATURE_PROMPT: &str = "Please type Proceed to delete all the Connected Apps: ";

/// State of the confirmation gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for the yes/no answer
    Prompt,
    /// Waiting for the signature
    Signature,
    /// Both answers matched
    Execute,
    /// An answer did not match
    Cancelled(CancelReason),
}

/// Why the gate was cancelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// The yes/no question was not answered with `Y`
    Declined,
    /// The signature did not match, carrying what was typed
    SignatureMismatch(String),
}

impl GateState {
    /// Advance the gate with one line of operator input
    ///
    /// Terminal states ignore further input.
    pub fn advance(self, answer: &str) -> GateState {
        match self {
            GateState::Prompt => {
                if answer.eq_ignore_ascii_case("Y") {
                    GateState::Signature
                } else {
                    GateState::Cancelled(CancelReason::Declined)
                }
            }
            GateState::Signature => {
                if answer == SIGNATURE {
                    GateState::Execute
                } else {
                    GateState::Cancelled(CancelReason::SignatureMismatch(answer.to_string()))
                }
            }
            terminal => terminal,
        }
    }
}

/// Ask both questions on `output` and read the answers from `input`
///
/// Line terminators are stripped; no other trimming happens, so
/// `" Proceed"` does not match. End of input counts as an empty answer.
///
/// # Returns
///
/// Either [`GateState::Execute`] or [`GateState::Cancelled`]
pub fn confirm_deletion<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<GateState> {
    let mut state = GateState::Prompt;

    while matches!(state, GateState::Prompt | GateState::Signature) {
        let prompt = match state {
            GateState::Prompt => QUESTION,
            _ => SIGNATURE_PROMPT,
        };
        write!(output, "{}", prompt)
            .and_then(|_| output.flush())
            .map_err(|e| ConnectError::Prompt(format!("failed to write prompt: {e}")))?;

        let mut line = String::new();
        input
            .read_line(&mut line)
            .map_err(|e| ConnectError::Prompt(format!("failed to read answer: {e}")))?;
        let answer = line.trim_end_matches(['\r', '\n']);

        state = state.advance(answer);
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (GateState, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let state = confirm_deletion(&mut reader, &mut out).unwrap();
        (state, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_upper_and_lower_y_then_proceed_execute() {
        assert_eq!(run("Y\nProceed\n").0, GateState::Execute);
        assert_eq!(run("y\r\nProceed\r\n").0, GateState::Execute);
    }

    #[test]
    fn test_both_prompts_are_shown() {
        let (_, out) = run("Y\nProceed\n");
        assert!(out.contains("(Y/n)"));
        assert!(out.contains("Please type Proceed"));
    }

    #[test]
    fn test_declined_stops_after_first_prompt() {
        let (state, out) = run("n\nProceed\n");
        assert_eq!(state, GateState::Cancelled(CancelReason::Declined));
        assert!(!out.contains("Please type Proceed"));
    }

    #[test]
    fn test_yes_spelled_out_is_declined() {
        assert_eq!(
            run("yes\nProceed\n").0,
            GateState::Cancelled(CancelReason::Declined)
        );
    }

    #[test]
    fn test_signature_must_match_exactly() {
        for signature in ["proceed", "PROCEED", " Proceed", "Proceed ", ""] {
            let (state, _) = run(&format!("Y\n{}\n", signature));
            assert_eq!(
                state,
                GateState::Cancelled(CancelReason::SignatureMismatch(signature.to_string())),
                "signature {:?} must not pass",
                signature
            );
        }
    }

    #[test]
    fn test_end_of_input_cancels() {
        assert_eq!(run("").0, GateState::Cancelled(CancelReason::Declined));
        assert!(matches!(
            run("Y\n").0,
            GateState::Cancelled(CancelReason::SignatureMismatch(_))
        ));
    }

    #[test]
    fn test_terminal_states_ignore_input() {
        assert_eq!(GateState::Execute.advance("n"), GateState::Execute);
        let cancelled = GateState::Cancelled(CancelReason::Declined);
        assert_eq!(cancelled.clone().advance("Y"), cancelled);
    }
}
