//! Radio event scripts for the simulator
//!
//! One step per line:
//!
//! ```text
//! scan 0x18        # advertising byte observed
//! special 0xA9     # special-op characteristic written
//! connect
//! disconnect
//! timeout          # advertising timed out
//! sleep 200        # milliseconds
//! ```

use dimmer_mcu::RadioEvent;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Event(RadioEvent),
    Sleep(Duration),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` needs an argument")]
    MissingArgument { line: usize, command: String },
    #[error("line {line}: invalid byte `{value}`")]
    InvalidByte { line: usize, value: String },
    #[error("line {line}: invalid duration `{value}`")]
    InvalidDuration { line: usize, value: String },
}

/// Parse `0x18`, `0X18` or decimal `24`
pub fn parse_byte(s: &str) -> Option<u8> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

/// clap value parser for byte arguments
pub fn byte_arg(s: &str) -> Result<u8, String> {
    parse_byte(s).ok_or_else(|| format!("`{s}` is not a byte (use 0x18 or 24)"))
}

pub fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }

        let mut words = text.split_whitespace();
        let command = words.next().unwrap_or_default();
        let arg = words.next();

        let byte_of = |arg: Option<&str>| -> Result<u8, ScriptError> {
            let value = arg.ok_or_else(|| ScriptError::MissingArgument {
                line,
                command: command.to_string(),
            })?;
            parse_byte(value).ok_or_else(|| ScriptError::InvalidByte {
                line,
                value: value.to_string(),
            })
        };

        let step = match command {
            "scan" => Step::Event(RadioEvent::Scan(byte_of(arg)?)),
            "special" => Step::Event(RadioEvent::SpecialOp(byte_of(arg)?)),
            "connect" => Step::Event(RadioEvent::Connected),
            "disconnect" => Step::Event(RadioEvent::Disconnected),
            "timeout" => Step::Event(RadioEvent::AdvertisingTimeout),
            "sleep" => {
                let value = arg.ok_or_else(|| ScriptError::MissingArgument {
                    line,
                    command: command.to_string(),
                })?;
                let ms: u64 = value.parse().map_err(|_| ScriptError::InvalidDuration {
                    line,
                    value: value.to_string(),
                })?;
                Step::Sleep(Duration::from_millis(ms))
            }
            other => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    command: other.to_string(),
                });
            }
        };
        steps.push(step);
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes() {
        assert_eq!(parse_byte("0x18"), Some(0x18));
        assert_eq!(parse_byte("0XA9"), Some(0xA9));
        assert_eq!(parse_byte("25"), Some(25));
        assert_eq!(parse_byte("0x100"), None);
        assert_eq!(parse_byte("ten"), None);
    }

    #[test]
    fn full_script() {
        let steps = parse(
            "# wake up\n\
             scan 0x18\n\
             \n\
             sleep 20   # let the loop tick\n\
             timeout\n\
             connect\n\
             disconnect\n\
             special 169\n",
        )
        .unwrap();

        assert_eq!(
            steps,
            vec![
                Step::Event(RadioEvent::Scan(0x18)),
                Step::Sleep(Duration::from_millis(20)),
                Step::Event(RadioEvent::AdvertisingTimeout),
                Step::Event(RadioEvent::Connected),
                Step::Event(RadioEvent::Disconnected),
                Step::Event(RadioEvent::SpecialOp(0xA9)),
            ]
        );
    }

    #[test]
    fn errors_carry_line_numbers() {
        assert_eq!(
            parse("connect\nblink"),
            Err(ScriptError::UnknownCommand { line: 2, command: "blink".to_string() })
        );
        assert_eq!(
            parse("scan"),
            Err(ScriptError::MissingArgument { line: 1, command: "scan".to_string() })
        );
        assert_eq!(
            parse("\nspecial 0xZZ"),
            Err(ScriptError::InvalidByte { line: 2, value: "0xZZ".to_string() })
        );
        assert_eq!(
            parse("sleep soon").unwrap_err().to_string(),
            "line 1: invalid duration `soon`"
        );
    }
}
