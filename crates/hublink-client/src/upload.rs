use std::ops::Range;

use hublink_transport::Transport;
use tracing::{debug, trace};

use crate::client::HubClient;
use crate::error::{HubError, Result};

/// CRC32 of `data` zero-padded to a multiple of 4 bytes, continuing from `seed`.
///
/// The padding only feeds the checksum; it is never transmitted. A seed of 0
/// starts a fresh checksum, and feeding a previous result back in continues
/// it (zlib `crc32(seed, ...)` semantics).
pub fn crc32_with_alignment(data: &[u8], seed: u32) -> u32 {
    let mut hasher = crc32fast::Hasher::new_with_initial(seed);
    hasher.update(data);
    let padding = (4 - data.len() % 4) % 4;
    hasher.update(&[0u8; 4][..padding]);
    hasher.finalize()
}

/// One block of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedChunk {
    pub index: usize,
    pub offset: usize,
    pub len: usize,
    /// Running CRC after this block, seeded with the previous block's value.
    pub running_crc: u32,
}

impl PlannedChunk {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Block boundaries and checksums for uploading one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPlan {
    total_len: usize,
    chunk_size: usize,
    crc: u32,
    chunks: Vec<PlannedChunk>,
}

impl UploadPlan {
    /// Plan `data` in blocks of at most `chunk_size` bytes.
    pub fn new(data: &[u8], chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(HubError::InvalidChunkSize(chunk_size));
        }

        let mut running_crc = 0;
        let chunks = data
            .chunks(chunk_size)
            .enumerate()
            .map(|(index, block)| {
                running_crc = crc32_with_alignment(block, running_crc);
                PlannedChunk {
                    index,
                    offset: index * chunk_size,
                    len: block.len(),
                    running_crc,
                }
            })
            .collect();

        Ok(Self {
            total_len: data.len(),
            chunk_size,
            crc: crc32_with_alignment(data, 0),
            chunks,
        })
    }

    pub fn total_len(&self) -> usize {
        self.total_len
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Whole-payload CRC announced when the upload starts.
    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub fn chunks(&self) -> &[PlannedChunk] {
        &self.chunks
    }

    /// Fraction of the upload each acknowledged chunk represents.
    pub fn increment(&self) -> f64 {
        if self.chunks.is_empty() {
            0.0
        } else {
            1.0 / self.chunks.len() as f64
        }
    }
}

impl<T: Transport> HubClient<T> {
    /// Upload `data` as `file_name` into `slot`.
    ///
    /// Uses the negotiated chunk size. `progress` receives the fraction
    /// completed by each acknowledged chunk. The first refused or failed
    /// chunk aborts the upload; nothing after it is sent.
    pub async fn upload_file(
        &self,
        file_name: &str,
        slot: u8,
        data: &[u8],
        mut progress: impl FnMut(f64),
    ) -> Result<()> {
        let chunk_size = self.max_chunk_size().ok_or(HubError::NotNegotiated)?;
        let plan = UploadPlan::new(data, usize::from(chunk_size))?;

        debug!(
            file_name,
            slot,
            len = data.len(),
            chunks = plan.chunks().len(),
            crc = plan.crc(),
            "starting upload"
        );
        self.start_file_upload(file_name, slot, plan.crc()).await?;

        for chunk in plan.chunks() {
            trace!(chunk = chunk.index, offset = chunk.offset, len = chunk.len, "sending chunk");
            match self.transfer_chunk(&data[chunk.range()], chunk.running_crc).await {
                Ok(()) => progress(plan.increment()),
                Err(HubError::Nack { status, .. }) => {
                    return Err(HubError::ChunkRejected {
                        index: chunk.index,
                        offset: chunk.offset,
                        status,
                    })
                }
                Err(err) => return Err(err),
            }
        }

        debug!(file_name, slot, "upload complete");
        Ok(())
    }
}
