//! Asynchronous transition-script reader with batch interface
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - the csv_format module for turning rows into script steps
//! - batch reading, so a replay task can consume many steps per wakeup
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of Result<ScriptStep, String>
//!                  ↓
//!           csv_format module
//!           (ScriptRecord, convert_script_record)
//! ```

use crate::io::csv_format::{convert_script_record, ScriptRecord, ScriptStep};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous script reader
///
/// Rows that fail to parse are kept in the batch as `Err` with their line
/// number, in script order, so the consumer sees exactly what the
/// synchronous reader would.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create an AsyncReader over any async byte source
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing the script CSV, header row first
    ///
    /// # Returns
    ///
    /// A new AsyncReader positioned before the first data row
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
        }
    }

    /// Read up to `batch_size` script rows
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Maximum number of rows to read
    ///
    /// # Returns
    ///
    /// The rows in script order, each either a step or an error carrying its
    /// line number. Returns an empty vector once the end of the script is
    /// reached.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use trade_workflow::io::AsyncReader;
    /// use tokio_util::compat::TokioAsyncReadCompatExt;
    ///
    /// # async fn run() -> std::io::Result<()> {
    /// let file = tokio::fs::File::open("script.csv").await?;
    /// let mut reader = AsyncReader::new(file.compat());
    ///
    /// loop {
    ///     let batch = reader.read_batch(100).await;
    ///     if batch.is_empty() {
    ///         break;
    ///     }
    ///     println!("read {} rows", batch.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Result<ScriptStep, String>> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<ScriptRecord>();

        while batch.len() < batch_size {
            let Some(next) = records.next().await else {
                break;
            };
            self.line_num += 1;

            // +1 for the header row
            let line = self.line_num + 1;
            batch.push(match next {
                Ok(record) => {
                    convert_script_record(record).map_err(|e| format!("Line {}: {}", line, e))
                }
                Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
            });
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;

    const SCRIPT: &str = "org,issuer,function,args\n\
        ,,init,\n\
        ImporterOrgMSP,ca.importerorg.trade.com,requestTrade,T1|50000|Wood for Toys\n\
        ExporterOrgMSP,ca.exporterorg.trade.com,acceptTrade,T1\n\
        ImporterOrgMSP,ca.importerorg.trade.com,requestLC,T1\n\
        ImporterOrgMSP,ca.importerorg.trade.com,getTradeStatus,T1\n";

    #[tokio::test]
    async fn test_async_reader_multiple_batches() {
        let mut reader = AsyncReader::new(Cursor::new(SCRIPT.as_bytes()));

        let batch1 = reader.read_batch(2).await;
        assert_eq!(batch1.len(), 2);
        assert_eq!(batch1[0], Ok(ScriptStep::Init(Vec::new())));

        let batch2 = reader.read_batch(2).await;
        assert_eq!(batch2.len(), 2);

        let batch3 = reader.read_batch(2).await;
        assert_eq!(batch3.len(), 1);

        assert!(reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_script() {
        let mut reader = AsyncReader::new(Cursor::new("org,issuer,function,args\n".as_bytes()));
        assert!(reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_keeps_invalid_rows_in_order() {
        let script = "org,issuer,function,args\n\
            ExporterOrgMSP,ca.exporterorg.trade.com,shipIt,T1\n\
            ExporterOrgMSP,ca.exporterorg.trade.com,acceptTrade,T1\n";
        let mut reader = AsyncReader::new(Cursor::new(script.as_bytes()));

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.len(), 2);
        let error = batch[0].as_ref().unwrap_err();
        assert!(error.starts_with("Line 2:"), "unexpected error: {}", error);
        assert!(batch[1].is_ok());
    }

    #[tokio::test]
    async fn test_async_reader_line_numbers_span_batches() {
        let script = "org,issuer,function,args\n\
            ExporterOrgMSP,ca.exporterorg.trade.com,acceptTrade,T1\n\
            ExporterOrgMSP,ca.exporterorg.trade.com,acceptTrade,\n";
        let mut reader = AsyncReader::new(Cursor::new(script.as_bytes()));

        assert!(reader.read_batch(1).await[0].is_ok());
        let second = reader.read_batch(1).await;
        assert!(second[0].as_ref().unwrap_err().starts_with("Line 3:"));
    }
}
