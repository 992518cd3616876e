//! Batched prediction over newline-delimited sentences.

use std::io::{BufRead, Write};

use serde_json::{json, Value};
use tracing::info;

use crate::error::{Result, SrlError};
use crate::predictor::Predictor;

/// Where predictions go.
pub enum Sink<W: Write> {
    /// One JSON line per prediction.
    File(W),
    /// `input: ...` / `prediction: ...` pairs for reading on a terminal.
    Console(W),
}

impl<W: Write> Sink<W> {
    fn emit(&mut self, input: &Value, line: &str) -> Result<()> {
        match self {
            Sink::File(out) => out.write_all(line.as_bytes())?,
            Sink::Console(out) => {
                writeln!(out, "input: {input}")?;
                writeln!(out, "prediction: {}", line.trim_end())?;
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        match self {
            Sink::File(out) | Sink::Console(out) => out,
        }
    }
}

/// Predict every non-blank line of `input`, `batch_size` lines at a time.
///
/// Returns the number of sentences predicted. Output order matches input
/// order regardless of batch size.
pub fn run<P, R, W>(predictor: &P, input: R, sink: &mut Sink<W>, batch_size: usize) -> Result<usize>
where
    P: Predictor + ?Sized,
    R: BufRead,
    W: Write,
{
    if batch_size == 0 {
        return Err(SrlError::InvalidBatchSize);
    }

    let mut batch: Vec<Value> = Vec::with_capacity(batch_size);
    let mut predicted = 0;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        batch.push(json!({ "sentence": line.trim() }));
        if batch.len() == batch_size {
            predicted += run_batch(predictor, &batch, sink)?;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        predicted += run_batch(predictor, &batch, sink)?;
    }

    info!(sentences = predicted, batch_size, "prediction finished");
    Ok(predicted)
}

fn run_batch<P, W>(predictor: &P, batch: &[Value], sink: &mut Sink<W>) -> Result<usize>
where
    P: Predictor + ?Sized,
    W: Write,
{
    let results = if let [single] = batch {
        vec![predictor.predict_json(single)?]
    } else {
        predictor.predict_batch_json(batch)?
    };

    for (input, output) in batch.iter().zip(&results) {
        let line = predictor.dump_line(output)?;
        sink.emit(input, &line)?;
    }
    Ok(batch.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Tags every sentence with its length and records the calls made.
    #[derive(Default)]
    struct MockPredictor {
        calls: RefCell<Vec<(&'static str, usize)>>,
    }

    impl MockPredictor {
        fn label(input: &Value) -> Value {
            let sentence = input["sentence"].as_str().unwrap_or_default();
            json!({ "verbs": [], "words": sentence.split(' ').collect::<Vec<_>>() })
        }
    }

    impl Predictor for MockPredictor {
        fn predict_batch_json(&self, inputs: &[Value]) -> Result<Vec<Value>> {
            self.calls.borrow_mut().push(("batch", inputs.len()));
            Ok(inputs.iter().map(Self::label).collect())
        }

        fn predict_json(&self, input: &Value) -> Result<Value> {
            self.calls.borrow_mut().push(("single", 1));
            Ok(Self::label(input))
        }
    }

    const INPUT: &str = "Who won ?\n\n   \nThe Broncos won .\nA\nB\nC\n";

    fn lines(sink: Sink<Vec<u8>>) -> Vec<String> {
        String::from_utf8(sink.into_inner())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_batches_and_trailing_flush() {
        let predictor = MockPredictor::default();
        let mut sink = Sink::File(Vec::new());
        let n = run(&predictor, INPUT.as_bytes(), &mut sink, 2).unwrap();

        assert_eq!(n, 5);
        assert_eq!(
            *predictor.calls.borrow(),
            vec![("batch", 2), ("batch", 2), ("single", 1)]
        );
        let out = lines(sink);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], r#"{"verbs":[],"words":["Who","won","?"]}"#);
        assert!(out[4].contains(r#"["C"]"#));
    }

    #[test]
    fn test_batch_of_one_uses_single_prediction() {
        let predictor = MockPredictor::default();
        let mut sink = Sink::File(Vec::new());
        run(&predictor, INPUT.as_bytes(), &mut sink, 1).unwrap();
        assert!(predictor.calls.borrow().iter().all(|(kind, _)| *kind == "single"));
        assert_eq!(predictor.calls.borrow().len(), 5);
    }

    #[test]
    fn test_console_format() {
        let predictor = MockPredictor::default();
        let mut sink = Sink::Console(Vec::new());
        run(&predictor, "  Hi there  \n".as_bytes(), &mut sink, 4).unwrap();
        assert_eq!(
            lines(sink),
            vec![
                r#"input: {"sentence":"Hi there"}"#.to_string(),
                r#"prediction: {"verbs":[],"words":["Hi","there"]}"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let predictor = MockPredictor::default();
        let mut sink = Sink::File(Vec::new());
        let err = run(&predictor, INPUT.as_bytes(), &mut sink, 0).unwrap_err();
        assert!(matches!(err, SrlError::InvalidBatchSize));
        assert!(predictor.calls.borrow().is_empty());
    }

    #[test]
    fn test_empty_input() {
        let predictor = MockPredictor::default();
        let mut sink = Sink::File(Vec::new());
        assert_eq!(run(&predictor, "\n\n".as_bytes(), &mut sink, 3).unwrap(), 0);
        assert!(sink.into_inner().is_empty());
    }
}
