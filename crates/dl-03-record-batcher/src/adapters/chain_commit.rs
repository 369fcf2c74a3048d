//! Commit pipeline sink.

use dl_02_chain_commit::ChainCommitService;

use crate::ports::LogSink;

impl LogSink for ChainCommitService {
    fn enqueue(&self, payload: String) {
        ChainCommitService::enqueue(self, payload);
    }

    fn is_busy(&self) -> bool {
        ChainCommitService::is_busy(self)
    }
}
