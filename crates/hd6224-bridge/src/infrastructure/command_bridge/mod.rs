//! Line-oriented command bridge standing in for the automation host.
//!
//! In headless mode the binary reads one command per line from stdin and
//! drives the [`DeviceRegistry`] exactly as a host would: through
//! `set_active`, `select_input`, `is_powered`, and `current_input`.
//!
//! ```text
//! on <device>            power on   (open the serial port)
//! off <device>           power off  (close the serial port)
//! input <device> <n>     select input n
//! status [<device>]      show power state and active input
//! list                   show configured devices
//! help                   show this table
//! quit | exit            stop the bridge
//! ```
//!
//! `<device>` is a device name without whitespace or its 1-based position.
//!
//! Every line produces an [`Outcome`]: reply text for the operator, or a
//! request to stop.  Parse failures become reply text; they never end the loop.

use std::str::{FromStr, SplitWhitespace};

use hd6224_core::{InputId, ParseInputIdError};
use thiserror::Error;

use crate::application::device_controller::DeviceController;
use crate::application::device_registry::DeviceRegistry;

pub const HELP_TEXT: &str = "\
commands:
  on <device>            power on (open the serial port)
  off <device>           power off (close the serial port)
  input <device> <n>     select input n
  status [<device>]      show power state and active input
  list                   show configured devices
  help                   show this text
  quit | exit            stop the bridge";

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    On(String),
    Off(String),
    Input { device: String, input: InputId },
    Status(Option<String>),
    List,
    Help,
    Quit,
}

/// Error returned when a line is not a valid [`HostCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command {0:?}; type `help` for a list")]
    UnknownCommand(String),

    #[error("`{command}` needs a <{argument}> argument")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),

    #[error(transparent)]
    InvalidInput(#[from] ParseInputIdError),
}

impl FromStr for HostCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandParseError::Empty)?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "on" => HostCommand::On(require(&mut words, "on", "device")?),
            "off" => HostCommand::Off(require(&mut words, "off", "device")?),
            "input" => {
                let device = require(&mut words, "input", "device")?;
                let input = require(&mut words, "input", "n")?.parse::<InputId>()?;
                HostCommand::Input { device, input }
            }
            "status" => HostCommand::Status(words.next().map(str::to_string)),
            "list" => HostCommand::List,
            "help" | "?" => HostCommand::Help,
            "quit" | "exit" => HostCommand::Quit,
            other => return Err(CommandParseError::UnknownCommand(other.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandParseError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn require(
    words: &mut SplitWhitespace<'_>,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandParseError> {
    words
        .next()
        .map(str::to_string)
        .ok_or(CommandParseError::MissingArgument { command, argument })
}

/// What the caller should do after a line has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print these lines and keep reading.
    Reply(Vec<String>),
    /// Stop the bridge.
    Quit,
}

impl Outcome {
    fn line(text: impl Into<String>) -> Self {
        Outcome::Reply(vec![text.into()])
    }
}

/// Parses and executes one line.  Blank lines produce an empty reply.
pub fn handle_line(registry: &mut DeviceRegistry, line: &str) -> Outcome {
    if line.trim().is_empty() {
        return Outcome::Reply(Vec::new());
    }
    match line.parse::<HostCommand>() {
        Ok(command) => execute(registry, command),
        Err(e) => Outcome::line(format!("error: {e}")),
    }
}

/// Executes a parsed command against the registry.
pub fn execute(registry: &mut DeviceRegistry, command: HostCommand) -> Outcome {
    match command {
        HostCommand::On(device) => with_device(registry, &device, |d| {
            d.set_active(true);
            power_line(d)
        }),
        HostCommand::Off(device) => with_device(registry, &device, |d| {
            d.set_active(false);
            power_line(d)
        }),
        HostCommand::Input { device, input } => with_device(registry, &device, |d| {
            d.select_input(input);
            format!("{}: {}", d.name(), input_text(d))
        }),
        HostCommand::Status(Some(device)) => match registry.get(&device) {
            Some(d) => Outcome::line(status_line(d)),
            None => unknown_device(&device),
        },
        HostCommand::Status(None) => {
            if registry.is_empty() {
                return Outcome::line("no devices configured");
            }
            Outcome::Reply(registry.iter().map(status_line).collect())
        }
        HostCommand::List => {
            if registry.is_empty() {
                return Outcome::line("no devices configured");
            }
            let mut lines = Vec::new();
            for (i, d) in registry.iter().enumerate() {
                let info = d.accessory();
                lines.push(format!(
                    "{}. {} ({} {} fw {}, {}, id {})",
                    i + 1,
                    info.name,
                    info.manufacturer,
                    info.model,
                    info.firmware_revision,
                    info.serial_number,
                    info.id
                ));
                for slot in d.inputs() {
                    lines.push(format!("   {} {}: {}", slot.name, slot.id, slot.label));
                }
            }
            Outcome::Reply(lines)
        }
        HostCommand::Help => Outcome::Reply(HELP_TEXT.lines().map(str::to_string).collect()),
        HostCommand::Quit => Outcome::Quit,
    }
}

fn with_device<F>(registry: &mut DeviceRegistry, reference: &str, f: F) -> Outcome
where
    F: FnOnce(&mut DeviceController) -> String,
{
    match registry.get_mut(reference) {
        Some(device) => Outcome::line(f(device)),
        None => unknown_device(reference),
    }
}

fn unknown_device(reference: &str) -> Outcome {
    Outcome::line(format!("error: unknown device {reference:?}"))
}

fn power_text(device: &DeviceController) -> &'static str {
    if device.is_powered() {
        "power on"
    } else {
        "power off"
    }
}

fn power_line(device: &DeviceController) -> String {
    format!("{}: {}", device.name(), power_text(device))
}

fn input_text(device: &DeviceController) -> String {
    let input = device.current_input();
    match device.input_label(input) {
        Some(label) => format!("input {input} ({label})"),
        None => format!("input {input}"),
    }
}

fn status_line(device: &DeviceController) -> String {
    format!("{}: {}, {}", device.name(), power_text(device), input_text(device))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::device_controller::DeviceProfile;
    use crate::application::host::HostCapabilities;
    use crate::infrastructure::serial::RecordingTransport;
    use hd6224_core::SerialSettings;

    fn registry_with(name: &str) -> (DeviceRegistry, RecordingTransport) {
        let transport = RecordingTransport::new("/dev/ttyTEST");
        let profile = DeviceProfile {
            name: name.to_string(),
            serial: SerialSettings::new("/dev/ttyTEST", 9600),
            input_labels: [
                "Workstation".to_string(),
                "Laptop".to_string(),
                "Media PC".to_string(),
                "Lab".to_string(),
            ],
        };
        let mut registry = DeviceRegistry::new();
        registry.add(DeviceController::new(
            profile,
            Box::new(transport.clone()),
            HostCapabilities::detached(),
        ));
        (registry, transport)
    }

    // ── Parsing ──────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_power_commands() {
        assert_eq!("on office".parse(), Ok(HostCommand::On("office".to_string())));
        assert_eq!("OFF 1".parse(), Ok(HostCommand::Off("1".to_string())));
    }

    #[test]
    fn test_parse_input_command() {
        assert_eq!(
            "input office 3".parse(),
            Ok(HostCommand::Input {
                device: "office".to_string(),
                input: InputId::new(3)
            })
        );
    }

    #[test]
    fn test_parse_input_accepts_out_of_range_number() {
        let cmd: HostCommand = "input office 8".parse().unwrap();
        assert!(matches!(cmd, HostCommand::Input { input, .. } if input.get() == 8));
    }

    #[test]
    fn test_parse_status_with_and_without_device() {
        assert_eq!("status".parse(), Ok(HostCommand::Status(None)));
        assert_eq!(
            "status lab".parse(),
            Ok(HostCommand::Status(Some("lab".to_string())))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<HostCommand>(), Err(CommandParseError::Empty));
        assert_eq!(
            "dance".parse::<HostCommand>(),
            Err(CommandParseError::UnknownCommand("dance".to_string()))
        );
        assert_eq!(
            "input office".parse::<HostCommand>(),
            Err(CommandParseError::MissingArgument {
                command: "input",
                argument: "n"
            })
        );
        assert!(matches!(
            "input office two".parse::<HostCommand>(),
            Err(CommandParseError::InvalidInput(_))
        ));
        assert_eq!(
            "list now".parse::<HostCommand>(),
            Err(CommandParseError::UnexpectedArgument("now".to_string()))
        );
    }

    // ── Execution ────────────────────────────────────────────────────────────

    #[test]
    fn test_input_command_writes_and_reports_label() {
        // Arrange
        let (mut registry, transport) = registry_with("office");

        // Act
        let outcome = handle_line(&mut registry, "input office 2");

        // Assert
        assert_eq!(outcome, Outcome::line("office: input 2 (Laptop)"));
        assert_eq!(transport.written_text(), vec!["//m2\r\n".to_string()]);
    }

    #[test]
    fn test_off_then_status_reports_power_off_and_cached_input() {
        let (mut registry, _) = registry_with("office");
        handle_line(&mut registry, "input 1 4");

        assert_eq!(handle_line(&mut registry, "off office"), Outcome::line("office: power off"));
        assert_eq!(
            handle_line(&mut registry, "status office"),
            Outcome::line("office: power off, input 4 (Lab)")
        );
    }

    #[test]
    fn test_on_reports_power_on() {
        let (mut registry, _) = registry_with("office");
        handle_line(&mut registry, "off office");
        assert_eq!(handle_line(&mut registry, "on office"), Outcome::line("office: power on"));
    }

    #[test]
    fn test_unknown_device_is_reported() {
        let (mut registry, transport) = registry_with("office");
        let outcome = handle_line(&mut registry, "input garage 1");
        assert_eq!(outcome, Outcome::line("error: unknown device \"garage\""));
        assert!(transport.writes().is_empty());
    }

    #[test]
    fn test_parse_error_becomes_reply() {
        let (mut registry, _) = registry_with("office");
        let outcome = handle_line(&mut registry, "input office x");
        match outcome {
            Outcome::Reply(lines) => assert!(lines[0].starts_with("error: invalid input identifier")),
            Outcome::Quit => panic!("parse errors must not quit"),
        }
    }

    #[test]
    fn test_status_without_device_lists_every_device() {
        let (mut registry, _) = registry_with("office");
        assert_eq!(
            handle_line(&mut registry, "status"),
            Outcome::line("office: power on, input 1 (Workstation)")
        );
    }

    #[test]
    fn test_list_shows_accessory_and_inputs() {
        let (mut registry, _) = registry_with("office");
        match handle_line(&mut registry, "list") {
            Outcome::Reply(lines) => {
                assert_eq!(lines.len(), 5);
                assert!(lines[0].starts_with("1. office (BlackBox HD6224A fw V2, /dev/ttyTEST"));
                assert_eq!(lines[3], "   input3 3: Media PC");
            }
            Outcome::Quit => panic!("list must not quit"),
        }
    }

    #[test]
    fn test_empty_registry_status_and_list() {
        let mut registry = DeviceRegistry::new();
        assert_eq!(handle_line(&mut registry, "status"), Outcome::line("no devices configured"));
        assert_eq!(handle_line(&mut registry, "list"), Outcome::line("no devices configured"));
    }

    #[test]
    fn test_blank_line_and_quit() {
        let mut registry = DeviceRegistry::new();
        assert_eq!(handle_line(&mut registry, "   "), Outcome::Reply(Vec::new()));
        assert_eq!(handle_line(&mut registry, "quit"), Outcome::Quit);
        assert_eq!(handle_line(&mut registry, "exit"), Outcome::Quit);
    }

    #[test]
    fn test_help_lists_commands() {
        let mut registry = DeviceRegistry::new();
        match handle_line(&mut registry, "help") {
            Outcome::Reply(lines) => assert!(lines.iter().any(|l| l.contains("input <device> <n>"))),
            Outcome::Quit => panic!("help must not quit"),
        }
    }
}
