//! # Line Ingestion
//!
//! Feeds text lines into the record batcher, one record per non-empty line.
//! Whatever is left in the batch at end of input is flushed.

use dl_03_record_batcher::{BatcherError, LogRecord, LogSink, RecordBatcher, KIND_STDIN};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// Read `reader` to the end. Returns the number of records ingested.
pub async fn ingest_lines<R, S>(
    reader: R,
    batcher: &RecordBatcher<S>,
    source: &str,
    port: Option<u16>,
) -> Result<usize, BatcherError>
where
    R: AsyncBufRead + Unpin,
    S: LogSink,
{
    let mut lines = reader.lines();
    let mut count = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                info!("[node] Input closed: {}", e);
                break;
            }
        };
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let mut record = LogRecord::new(KIND_STDIN, source, line);
        record.port = port;
        debug!("[node] Record {} bytes from {}", line.len(), source);
        batcher.push(record)?;
        count += 1;
    }

    batcher.flush()?;
    info!("[node] Ingested {} records", count);
    Ok(count)
}
