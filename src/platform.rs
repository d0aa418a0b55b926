//! # Platform-specific utilities
//!
//! Questo modulo centralizza la gestione cross-platform dei comandi
//! esterni (ffmpeg, exiftool): nomi dei binari e check di disponibilità.

use std::collections::HashMap;
use std::process::Command;
use std::sync::OnceLock;

/// Platform-specific command manager
pub struct PlatformCommands {
    commands: HashMap<&'static str, &'static str>,
    which_command: &'static str,
}

impl PlatformCommands {
    /// Get the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<PlatformCommands> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    /// Initialize platform-specific commands
    fn new() -> Self {
        let (commands, which_command) = if cfg!(windows) {
            let mut commands = HashMap::new();
            commands.insert("ffmpeg", "ffmpeg.exe");
            commands.insert("exiftool", "exiftool.exe");
            (commands, "where")
        } else {
            let mut commands = HashMap::new();
            commands.insert("ffmpeg", "ffmpeg");
            commands.insert("exiftool", "exiftool");
            (commands, "which")
        };

        Self {
            commands,
            which_command,
        }
    }

    /// Get the platform-specific command name
    pub fn get_command<'a>(&self, base_name: &'a str) -> &'a str {
        self.commands.get(base_name).unwrap_or(&base_name)
    }

    /// Get the command used to check if a program exists
    pub fn which_command(&self) -> &str {
        self.which_command
    }

    /// Check if a command is available on the system
    pub fn is_command_available(&self, base_name: &str) -> bool {
        let command_name = self.get_command(base_name);

        match Command::new(self.which_command).arg(command_name).output() {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_commands() {
        let platform = PlatformCommands::instance();

        let ffmpeg = platform.get_command("ffmpeg");
        assert!(!ffmpeg.is_empty());

        let which = platform.which_command();
        assert!(!which.is_empty());
    }

    #[test]
    fn test_unknown_command_passthrough() {
        let platform = PlatformCommands::instance();
        assert_eq!(platform.get_command("sox"), "sox");
    }

    #[test]
    fn test_command_availability_does_not_panic() {
        let platform = PlatformCommands::instance();
        // Might legitimately be false in minimal environments; just ensure no panic
        let _ = platform.is_command_available("echo");
    }
}
