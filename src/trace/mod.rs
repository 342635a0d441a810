//! Trace sinks for the per-iteration record stream.
//!
//! Workers hand every [`TraceRecord`] to a [`TraceSink`] from many threads
//! at once. Each sink serializes its own appends, one critical section per
//! record, so lines never interleave.
//!
//! # Sinks
//!
//! - [`MemorySink`]: Keeps records in memory (tests, post-processing)
//! - [`NullSink`]: Discards everything
//! - [`CsvTraceWriter`]: Writes `Iteration,ParticleID,City0..,Fitness` rows
//!
//! The [`export`] submodule writes location and route files.

pub mod export;

use std::io::{self, Write};

use parking_lot::Mutex;

use crate::pso::TraceRecord;

/// Receiver for trace records.
///
/// Called concurrently from worker threads.
pub trait TraceSink: Send + Sync {
    /// Persists one record.
    fn record(&self, record: &TraceRecord) -> io::Result<()>;
}

/// Discards all records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&self, _record: &TraceRecord) -> io::Result<()> {
        Ok(())
    }
}

/// Collects records in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<TraceRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Copy of the records collected so far.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }

    /// Consumes the sink, returning records sorted by
    /// `(iteration, particle_id)`.
    pub fn into_sorted(self) -> Vec<TraceRecord> {
        let mut records = self.records.into_inner();
        records.sort_by_key(|r| (r.iteration, r.particle_id));
        records
    }
}

impl TraceSink for MemorySink {
    fn record(&self, record: &TraceRecord) -> io::Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// Writes records as CSV rows to any writer.
///
/// Row order within an iteration follows worker completion order.
///
/// # Examples
///
/// ```
/// use u_pso_tsp::pso::TraceRecord;
/// use u_pso_tsp::trace::{CsvTraceWriter, TraceSink};
///
/// let writer = CsvTraceWriter::new(Vec::new(), 3).unwrap();
/// writer
///     .record(&TraceRecord { iteration: 0, particle_id: 1, order: vec![2, 0, 1], cost: 4.5 })
///     .unwrap();
/// let text = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(text, "Iteration,ParticleID,City0,City1,City2,Fitness\n0,1,2,0,1,4.5\n");
/// ```
#[derive(Debug)]
pub struct CsvTraceWriter<W: Write + Send> {
    inner: Mutex<W>,
}

impl<W: Write + Send> CsvTraceWriter<W> {
    /// Wraps `writer` and writes the header row for `n_locations` columns.
    pub fn new(mut writer: W, n_locations: usize) -> io::Result<Self> {
        write!(writer, "Iteration,ParticleID")?;
        for i in 0..n_locations {
            write!(writer, ",City{i}")?;
        }
        writeln!(writer, ",Fitness")?;
        Ok(Self {
            inner: Mutex::new(writer),
        })
    }

    pub fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write + Send> TraceSink for CsvTraceWriter<W> {
    fn record(&self, record: &TraceRecord) -> io::Result<()> {
        let mut line = format!("{},{}", record.iteration, record.particle_id);
        for id in &record.order {
            line.push(',');
            line.push_str(&id.to_string());
        }
        line.push(',');
        line.push_str(&record.cost.to_string());
        line.push('\n');

        self.inner.lock().write_all(line.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    fn rec(iteration: usize, particle_id: usize) -> TraceRecord {
        TraceRecord {
            iteration,
            particle_id,
            order: vec![0, 1, 2, 3],
            cost: 1.25,
        }
    }

    #[test]
    fn test_memory_sink_sorted() {
        let sink = MemorySink::new();
        sink.record(&rec(1, 0)).unwrap();
        sink.record(&rec(0, 2)).unwrap();
        sink.record(&rec(0, 1)).unwrap();
        assert_eq!(sink.len(), 3);

        let keys: Vec<_> = sink
            .into_sorted()
            .iter()
            .map(|r| (r.iteration, r.particle_id))
            .collect();
        assert_eq!(keys, vec![(0, 1), (0, 2), (1, 0)]);
    }

    #[test]
    fn test_null_sink() {
        assert!(NullSink.record(&rec(0, 0)).is_ok());
    }

    #[test]
    fn test_csv_concurrent_lines_intact() {
        let writer = CsvTraceWriter::new(Vec::new(), 4).unwrap();
        (0..200usize).into_par_iter().for_each(|k| {
            writer.record(&rec(k / 10, k % 10)).unwrap();
        });

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Iteration,ParticleID,City0,City1,City2,City3,Fitness");
        assert_eq!(lines.len(), 201);
        for line in &lines[1..] {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 7, "malformed line {line}");
            assert_eq!(&fields[2..], &["0", "1", "2", "3", "1.25"]);
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_csv_header_error_propagates() {
        assert!(CsvTraceWriter::new(FailingWriter, 2).is_err());
    }
}
