//! Prometheus text exposition
//!
//! Writes one metric family at a time: the `# HELP` and `# TYPE` headers
//! followed by a line per sample. Families without samples are skipped
//! entirely, headers included.

use super::catalog::MetricDefinition;
use super::labels::LabelSet;

/// Format a sample value
///
/// Finite values use the shortest representation that parses back to the
/// same `f64`. Non-finite values use the exposition spellings.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

/// Append a metric family to `out`
///
/// Returns the number of sample lines written. Nothing is written when
/// `samples` is empty.
pub fn write_family<'a, I>(out: &mut String, definition: &MetricDefinition, samples: I) -> usize
where
    I: IntoIterator<Item = (&'a LabelSet, f64)>,
{
    let mut samples = samples.into_iter().peekable();
    if samples.peek().is_none() {
        return 0;
    }

    let name = &definition.name;
    out.push_str(&format!("# HELP {} {}\n", name, definition.help));
    out.push_str(&format!("# TYPE {} {}\n", name, definition.datatype));

    let mut written = 0;
    for (labels, value) in samples {
        out.push_str(&format!("{}{} {}\n", name, labels, format_value(value)));
        written += 1;
    }
    written
}
