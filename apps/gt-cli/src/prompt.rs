// prompt.rs — Terminal ConfirmationChannel.
//
// Prints the prompt and reads one line; only "y" or "yes" (any case)
// counts as confirmation. End of input is reported as a closed channel.

use std::io::{BufRead, BufReader, Read, Write};
use std::sync::Mutex;

use gt_goal::{ConfirmError, ConfirmPrompt, ConfirmationChannel};

pub struct TerminalConfirm {
    reader: Mutex<BufReader<Box<dyn Read + Send>>>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TerminalConfirm {
    /// Use `TerminalConfirm::stdio()` for a real terminal, or pass mock I/O for tests.
    pub fn new(reader: Box<dyn Read + Send>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            reader: Mutex::new(BufReader::new(reader)),
            writer: Mutex::new(writer),
        }
    }

    pub fn stdio() -> Self {
        Self::new(Box::new(std::io::stdin()), Box::new(std::io::stderr()))
    }
}

impl ConfirmationChannel for TerminalConfirm {
    fn confirm(&self, prompt: &ConfirmPrompt) -> Result<bool, ConfirmError> {
        {
            let mut writer = self.writer.lock().map_err(|_| ConfirmError::ChannelClosed)?;
            write!(writer, "{}\n{} [y/N] ", prompt.title, prompt.message)?;
            writer.flush()?;
        }

        let mut line = String::new();
        let read = self
            .reader
            .lock()
            .map_err(|_| ConfirmError::ChannelClosed)?
            .read_line(&mut line)?;
        if read == 0 {
            return Err(ConfirmError::ChannelClosed);
        }

        let answer = line.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
