use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    Declined,
}

/// Yes/no gate in front of destructive commands.
///
/// Returning `None` means the answer arrives later (a modal is now showing)
/// and will be fed back as `Command::ResolveDelete`.
pub trait Confirmer {
    fn request(&mut self, message: &str) -> Option<ConfirmOutcome>;
}

/// The view shows a modal for the pending target and reports back.
pub struct ModalConfirm;

impl Confirmer for ModalConfirm {
    fn request(&mut self, _message: &str) -> Option<ConfirmOutcome> {
        None
    }
}

/// Always says yes (`--yes` on the command line).
pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
    fn request(&mut self, _message: &str) -> Option<ConfirmOutcome> {
        Some(ConfirmOutcome::Confirmed)
    }
}

/// Blocking `[y/N]` prompt. Anything but `y`/`yes` declines, including I/O errors.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        PromptConfirm { input, output }
    }
}

impl PromptConfirm<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        PromptConfirm::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirmer for PromptConfirm<R, W> {
    fn request(&mut self, message: &str) -> Option<ConfirmOutcome> {
        if write!(self.output, "{message} [y/N] ").is_err() || self.output.flush().is_err() {
            return Some(ConfirmOutcome::Declined);
        }
        let mut line = String::new();
        if self.input.read_line(&mut line).is_err() {
            return Some(ConfirmOutcome::Declined);
        }
        let answer = line.trim().to_lowercase();
        if answer == "y" || answer == "yes" {
            Some(ConfirmOutcome::Confirmed)
        } else {
            Some(ConfirmOutcome::Declined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(input: &str) -> (Option<ConfirmOutcome>, String) {
        let mut out = Vec::new();
        let outcome = PromptConfirm::new(Cursor::new(input.as_bytes()), &mut out)
            .request("Delete this task?");
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prompt_accepts_yes() {
        assert_eq!(ask("y\n").0, Some(ConfirmOutcome::Confirmed));
        assert_eq!(ask("YES\n").0, Some(ConfirmOutcome::Confirmed));
    }

    #[test]
    fn prompt_defaults_to_no() {
        assert_eq!(ask("\n").0, Some(ConfirmOutcome::Declined));
        assert_eq!(ask("nope\n").0, Some(ConfirmOutcome::Declined));
        assert_eq!(ask("").0, Some(ConfirmOutcome::Declined));
    }

    #[test]
    fn prompt_writes_message() {
        assert_eq!(ask("n\n").1, "Delete this task? [y/N] ");
    }

    #[test]
    fn modal_defers() {
        assert_eq!(ModalConfirm.request("x"), None);
    }

    #[test]
    fn auto_confirms() {
        assert_eq!(AutoConfirm.request("x"), Some(ConfirmOutcome::Confirmed));
    }
}
