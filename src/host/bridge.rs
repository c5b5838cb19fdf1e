use crate::error::{Result, VariationError};
use std::process::Command;

/// String-in, string-out channel into the host application's scripting engine.
pub trait HostBridge {
    fn eval_script(&self, script: &str) -> Result<String>;
}

impl<B: HostBridge + ?Sized> HostBridge for &B {
    fn eval_script(&self, script: &str) -> Result<String> {
        (**self).eval_script(script)
    }
}

impl<B: HostBridge + ?Sized> HostBridge for Box<B> {
    fn eval_script(&self, script: &str) -> Result<String> {
        (**self).eval_script(script)
    }
}

/// Runs an external command with the script as its final argument and
/// returns its trimmed stdout.
#[derive(Debug, Clone)]
pub struct ProcessBridge {
    program: String,
    args: Vec<String>,
}

impl ProcessBridge {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Split a command line such as `osascript -l JavaScript` with shell
    /// quoting rules, so `"C:/Program Files/Host/run.exe" -s` keeps its path.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let parts = shell_words::split(command_line).map_err(|e| {
            VariationError::ConfigError(format!("invalid host bridge command: {}", e))
        })?;
        let mut parts = parts.into_iter();
        let program = parts.next().ok_or_else(|| {
            VariationError::ConfigError("host bridge command is empty".into())
        })?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl HostBridge for ProcessBridge {
    fn eval_script(&self, script: &str) -> Result<String> {
        log::debug!("Host bridge: {} {:?} <{} byte script>", self.program, self.args, script.len());

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(script)
            .output()
            .map_err(|e| {
                VariationError::ImportError(format!("could not run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VariationError::ImportError(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn echoes_through_process() {
        let bridge = ProcessBridge::from_command_line("echo").unwrap();
        assert_eq!(bridge.eval_script("success").unwrap(), "success");
    }

    #[test]
    fn passes_leading_arguments() {
        let bridge = ProcessBridge::new("echo").with_arg("-n").with_arg("reply:");
        assert_eq!(bridge.eval_script("ok").unwrap(), "reply: ok");
    }

    #[test]
    fn missing_program_is_an_import_error() {
        let bridge = ProcessBridge::new("vargen-no-such-binary-here");
        assert!(matches!(
            bridge.eval_script("x"),
            Err(VariationError::ImportError(_))
        ));
    }

    #[test]
    fn nonzero_exit_is_an_import_error() {
        let bridge = ProcessBridge::new("false");
        assert!(matches!(
            bridge.eval_script("x"),
            Err(VariationError::ImportError(_))
        ));
    }

    #[test]
    fn quoted_program_path_keeps_its_spaces() {
        let bridge =
            ProcessBridge::from_command_line(r#""/opt/Host App/run script" -s 'two words'"#)
                .unwrap();
        assert_eq!(bridge.program, "/opt/Host App/run script");
        assert_eq!(bridge.args, vec!["-s".to_string(), "two words".to_string()]);
    }

    #[test]
    fn unbalanced_quote_is_rejected() {
        assert!(matches!(
            ProcessBridge::from_command_line(r#""/opt/Host App/run"#),
            Err(VariationError::ConfigError(_))
        ));
    }

    #[test]
    fn empty_command_line_is_rejected() {
        assert!(matches!(
            ProcessBridge::from_command_line("   "),
            Err(VariationError::ConfigError(_))
        ));
    }
}
