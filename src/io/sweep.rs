//! Voltage sweep reconstruction.
//!
//! CV and IV files do not store the bias voltage per sample. Line 15 holds
//! `start step n_negative n_total` and the sweep is rebuilt from those:
//!
//! ```text
//! start, start - step, ..., start - step·n_negative     (n_negative + 1 points)
//! start, start + step, ..., start + step·(n_pos - 1)     (n_pos points, half-open)
//! ```
//!
//! The result is not sorted. Readers pair it with their samples first and
//! sort the pairs by voltage afterwards.

use log::debug;

use crate::domain::SweepHeader;
use crate::error::AppError;
use crate::io::schema::{FieldSpec, LineSchema};
use crate::io::source::TextSource;

/// Sweep line shared by CV and IV files.
pub const SWEEP_LINE: LineSchema = LineSchema {
    line: 15,
    label: "sweep",
    fields: &[
        FieldSpec::float("start"),
        FieldSpec::float("step"),
        FieldSpec::count("negative_steps"),
        FieldSpec::count("total_steps"),
    ],
};

/// First data line (1-indexed) in CV and IV files.
pub const SWEEP_DATA_START: usize = SWEEP_LINE.line + 1;

/// Read and validate the sweep header.
pub fn read_sweep_header(source: &TextSource) -> Result<SweepHeader, AppError> {
    let values = SWEEP_LINE.parse(source)?;
    let header = SweepHeader {
        start: values.float("start")?,
        step: values.float("step")?,
        negative_steps: values.count("negative_steps")?,
        total_steps: values.count("total_steps")?,
    };

    if header.total_steps < header.negative_steps {
        return Err(AppError::malformed_header(format!(
            "{}: total steps ({}) is smaller than negative steps ({}).",
            values.location(),
            header.total_steps,
            header.negative_steps
        )));
    }

    debug!(
        "{}: sweep start={} step={} negative={} total={}",
        source.name(),
        header.start,
        header.step,
        header.negative_steps,
        header.total_steps
    );
    Ok(header)
}

/// Rebuild the voltage sequence described by `header`.
pub fn reconstruct_sweep(header: &SweepHeader) -> Vec<f64> {
    let n_neg = header.negative_steps;
    let n_pos = header.positive_steps();
    let mut voltage = Vec::with_capacity(header.point_count());

    // Descending run, endpoint included.
    if n_neg == 0 {
        voltage.push(header.start);
    } else {
        let stop = header.start - header.step * n_neg as f64;
        let delta = (stop - header.start) / n_neg as f64;
        voltage.extend((0..=n_neg).map(|i| header.start + delta * i as f64));
    }

    // Ascending run, endpoint excluded.
    if n_pos > 0 {
        let stop = header.start + header.step * n_pos as f64;
        let delta = (stop - header.start) / n_pos as f64;
        voltage.extend((0..n_pos).map(|i| header.start + delta * i as f64));
    }

    voltage
}

/// Stable sort of rows by voltage; ties keep their file order.
pub fn sort_by_voltage<T>(rows: &mut [T], voltage: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| voltage(a).total_cmp(&voltage(b)));
}

/// Fail unless the number of data samples matches the sweep length.
pub fn ensure_sample_count(source: &TextSource, samples: usize, sweep: usize) -> Result<(), AppError> {
    if samples != sweep {
        return Err(AppError::malformed_record(format!(
            "{}: {samples} data samples but the sweep header describes {sweep} points.",
            source.name()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(start: f64, step: f64, negative_steps: usize, total_steps: usize) -> SweepHeader {
        SweepHeader {
            start,
            step,
            negative_steps,
            total_steps,
        }
    }

    fn assert_close(got: &[f64], want: &[f64]) {
        assert_eq!(got.len(), want.len(), "got {got:?}");
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < 1e-9, "got {got:?}, want {want:?}");
        }
    }

    #[test]
    fn descending_then_ascending() {
        let v = reconstruct_sweep(&header(-1.0, 0.5, 2, 5));
        assert_close(&v, &[-1.0, -1.5, -2.0, -1.0, -0.5, 0.0]);
    }

    #[test]
    fn length_matches_header_for_many_shapes() {
        for n_neg in 0..6 {
            for extra in 0..6 {
                let h = header(0.3, 0.008, n_neg, n_neg + extra);
                let v = reconstruct_sweep(&h);
                assert_eq!(v.len(), n_neg + 1 + extra);
                assert_eq!(v.len(), h.point_count());
            }
        }
    }

    #[test]
    fn edge_shapes() {
        assert_close(&reconstruct_sweep(&header(0.2, 0.1, 0, 0)), &[0.2]);
        assert_close(&reconstruct_sweep(&header(0.2, 0.1, 0, 2)), &[0.2, 0.2, 0.3]);
        assert_close(&reconstruct_sweep(&header(0.2, 0.1, 2, 2)), &[0.2, 0.1, 0.0]);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut rows = vec![(-1.0, 'a'), (-2.0, 'b'), (-1.0, 'c'), (0.0, 'd')];
        sort_by_voltage(&mut rows, |r| r.0);
        assert_eq!(rows.iter().map(|r| r.1).collect::<String>(), "bacd");
    }

    #[test]
    fn header_requires_total_not_below_negative() {
        let mut text = "\n".repeat(14);
        text.push_str("-1.0 0.1 5 3\n");
        let src = TextSource::from_text("mem", &text);
        let err = read_sweep_header(&src).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedHeader);
    }

    #[test]
    fn header_accepts_float_counts() {
        let mut text = "\n".repeat(14);
        text.push_str("-0.64142 0.008 19.0 100\n");
        let src = TextSource::from_text("mem", &text);
        let h = read_sweep_header(&src).unwrap();
        assert_eq!(h.negative_steps, 19);
        assert_eq!(h.total_steps, 100);
        assert_eq!(reconstruct_sweep(&h).len(), 101);
    }

    #[test]
    fn header_rejects_counts_beyond_u32() {
        let mut text = "\n".repeat(14);
        text.push_str("0.0 0.1 0 18446744073709551615\n");
        let src = TextSource::from_text("mem", &text);
        let err = read_sweep_header(&src).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedHeader);
    }
}
