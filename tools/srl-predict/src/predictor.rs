//! Prediction backends.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use serde_json::Value;
use tracing::debug;

use crate::archive::SRL_TASK;
use crate::error::{Result, SrlError};

/// A model that turns JSON inputs into JSON predictions.
pub trait Predictor {
    /// Predict a batch; one output per input, in input order.
    fn predict_batch_json(&self, inputs: &[Value]) -> Result<Vec<Value>>;

    fn predict_json(&self, input: &Value) -> Result<Value> {
        let outputs = self.predict_batch_json(std::slice::from_ref(input))?;
        let got = outputs.len();
        match (outputs.into_iter().next(), got) {
            (Some(output), 1) => Ok(output),
            _ => Err(SrlError::PredictionCount { expected: 1, got }),
        }
    }

    /// Serialize one prediction as an output line.
    fn dump_line(&self, output: &Value) -> Result<String> {
        Ok(serde_json::to_string(output)? + "\n")
    }
}

/// Runs an external inference program once per batch.
///
/// The program reads one JSON object per line on stdin and writes one JSON
/// prediction per line on stdout. The model is passed through the
/// environment:
///
/// | Variable | Value |
/// |---|---|
/// | `SRL_ARCHIVE` | archive path |
/// | `SRL_TASK` | `semantic-role-labeling` |
/// | `SRL_CUDA_DEVICE` | GPU id, `-1` for CPU |
#[derive(Debug, Clone)]
pub struct CommandPredictor {
    program: String,
    args: Vec<String>,
    archive: PathBuf,
    cuda_device: i32,
}

impl CommandPredictor {
    /// `command` is split on whitespace into program and arguments.
    pub fn new(command: &str, archive: impl Into<PathBuf>) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(SrlError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
            archive: archive.into(),
            cuda_device: -1,
        })
    }

    pub fn with_cuda_device(mut self, device: i32) -> Self {
        self.cuda_device = device;
        self
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }
}

impl Predictor for CommandPredictor {
    fn predict_batch_json(&self, inputs: &[Value]) -> Result<Vec<Value>> {
        let mut payload = String::new();
        for input in inputs {
            payload.push_str(&serde_json::to_string(input)?);
            payload.push('\n');
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("SRL_ARCHIVE", &self.archive)
            .env("SRL_TASK", SRL_TASK)
            .env("SRL_CUDA_DEVICE", self.cuda_device.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            SrlError::Io(std::io::Error::other("predictor stdin not captured"))
        })?;
        let writer = thread::spawn(move || stdin.write_all(payload.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| std::io::Error::other("stdin writer panicked"))?;

        if !output.status.success() {
            return Err(SrlError::PredictorFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        // A predictor may stop reading early; that only matters if it also
        // came back short, which the count check below reports.
        if let Err(e) = written {
            debug!(error = %e, "predictor closed stdin early");
        }

        let predictions = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str::<Value>(line))
            .collect::<std::result::Result<Vec<Value>, _>>()?;

        if predictions.len() != inputs.len() {
            return Err(SrlError::PredictionCount {
                expected: inputs.len(),
                got: predictions.len(),
            });
        }
        debug!(batch = inputs.len(), "batch predicted");
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_command() {
        let err = CommandPredictor::new("   ", "model").unwrap_err();
        assert!(matches!(err, SrlError::EmptyCommand));
    }

    #[test]
    fn test_command_is_split() {
        let predictor = CommandPredictor::new("python3 -m srl.serve", "model").unwrap();
        assert_eq!(predictor.program, "python3");
        assert_eq!(predictor.args, vec!["-m", "srl.serve"]);
        assert_eq!(predictor.cuda_device, -1);
        assert_eq!(predictor.with_cuda_device(0).cuda_device, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_echo_predictor_round_trip() {
        let predictor = CommandPredictor::new("cat", "model").unwrap();
        let inputs = vec![json!({"sentence": "a"}), json!({"sentence": "b"})];
        assert_eq!(predictor.predict_batch_json(&inputs).unwrap(), inputs);
        assert_eq!(predictor.predict_json(&inputs[0]).unwrap(), inputs[0]);
    }

    #[cfg(unix)]
    #[test]
    fn test_environment_is_passed() {
        let mut predictor = CommandPredictor::new("sh", "/models/srl")
            .unwrap()
            .with_cuda_device(2);
        predictor.args = vec![
            "-c".into(),
            r#"read line; printf '{"archive":"%s","task":"%s","cuda":"%s"}\n' "$SRL_ARCHIVE" "$SRL_TASK" "$SRL_CUDA_DEVICE""#.into(),
        ];

        let out = predictor.predict_json(&json!({"sentence": "x"})).unwrap();
        assert_eq!(out["archive"], "/models/srl");
        assert_eq!(out["task"], SRL_TASK);
        assert_eq!(out["cuda"], "2");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        let predictor = CommandPredictor::new("false", "model").unwrap();
        let err = predictor.predict_json(&json!({"sentence": "x"})).unwrap_err();
        assert!(matches!(err, SrlError::PredictorFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_short_output_is_error() {
        let predictor = CommandPredictor::new("true", "model").unwrap();
        let err = predictor
            .predict_batch_json(&[json!({"sentence": "x"})])
            .unwrap_err();
        assert!(matches!(err, SrlError::PredictionCount { expected: 1, got: 0 }));
    }
}
