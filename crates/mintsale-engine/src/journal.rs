//! Append-only, hash-chained event journal.
//!
//! Each record's digest covers the previous digest, its own sequence
//! number and timestamp, and a fixed-order encoding of the event:
//!
//! ```text
//! digest[n] = SHA-256(domain ‖ digest[n-1] ‖ seq ‖ recorded_at ‖ event)
//! digest[-1] = [0; 32]
//! ```
//!
//! Draining hands records to the caller but keeps the chain head, so the
//! next record still links to the last drained one.

use chrono::{DateTime, Utc};
use mintsale_types::constants::JOURNAL_DOMAIN;
use mintsale_types::SaleEvent;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One committed event with its position in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// 0-based position since genesis. Never reused.
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub event: SaleEvent,
    /// Digest of the preceding record (zeroes for the first).
    pub prev_digest: [u8; 32],
    pub digest: [u8; 32],
}

impl EventRecord {
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// The engine's event log.
pub struct Journal {
    records: Vec<EventRecord>,
    next_sequence: u64,
    /// Digest of the last record ever appended.
    head: [u8; 32],
    /// Digest preceding the first retained record.
    base: [u8; 32],
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_sequence: 0,
            head: [0u8; 32],
            base: [0u8; 32],
        }
    }

    /// Append `event` and return its record.
    pub fn append(&mut self, event: SaleEvent) -> &EventRecord {
        let recorded_at = Utc::now();
        let sequence = self.next_sequence;
        let digest = compute_digest(&self.head, sequence, &recorded_at, &event);
        self.records.push(EventRecord {
            sequence,
            recorded_at,
            event,
            prev_digest: self.head,
            digest,
        });
        self.head = digest;
        self.next_sequence += 1;
        let idx = self.records.len() - 1;
        &self.records[idx]
    }

    /// Records not yet drained, oldest first.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Remove and return every retained record.
    pub fn drain(&mut self) -> Vec<EventRecord> {
        self.base = self.head;
        std::mem::take(&mut self.records)
    }

    /// Digest of the most recent record (zeroes before the first append).
    #[must_use]
    pub fn head(&self) -> [u8; 32] {
        self.head
    }

    #[must_use]
    pub fn head_hex(&self) -> String {
        hex::encode(self.head)
    }

    /// Total records ever appended, including drained ones.
    #[must_use]
    pub fn total_appended(&self) -> u64 {
        self.next_sequence
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute every retained digest and check the links up to the head.
    #[must_use]
    pub fn verify_chain(&self) -> bool {
        verify_records(&self.base, &self.records)
            && self.records.last().map_or(self.base, |r| r.digest) == self.head
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify a run of records that should follow `base`.
///
/// Works on drained batches too: pass the `prev_digest` of the first
/// record (or the digest of the batch before it).
#[must_use]
pub fn verify_records(base: &[u8; 32], records: &[EventRecord]) -> bool {
    let mut prev = *base;
    let mut expected_seq = None;
    for record in records {
        if record.prev_digest != prev {
            return false;
        }
        if let Some(seq) = expected_seq {
            if record.sequence != seq {
                return false;
            }
        }
        let digest = compute_digest(&prev, record.sequence, &record.recorded_at, &record.event);
        if digest != record.digest {
            return false;
        }
        prev = digest;
        expected_seq = record.sequence.checked_add(1);
    }
    true
}

fn compute_digest(
    prev: &[u8; 32],
    sequence: u64,
    recorded_at: &DateTime<Utc>,
    event: &SaleEvent,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(JOURNAL_DOMAIN);
    hasher.update(prev);
    hasher.update(sequence.to_le_bytes());
    hasher.update(recorded_at.timestamp_micros().to_le_bytes());
    hash_event(&mut hasher, event);

    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

fn hash_event(hasher: &mut Sha256, event: &SaleEvent) {
    hasher.update(event.kind().as_bytes());
    match event {
        SaleEvent::PhaseChanged { from, to, cause } => {
            hasher.update([from.code(), to.code()]);
            hasher.update(format!("{cause:?}").as_bytes());
        }
        SaleEvent::TokensMinted {
            channel,
            recipient,
            first_id,
            count,
            paid,
        } => {
            hasher.update(channel.to_string().as_bytes());
            hasher.update(recipient.0.as_bytes());
            hasher.update(first_id.0.to_le_bytes());
            hasher.update(count.to_le_bytes());
            hasher.update(paid.to_string().as_bytes());
        }
        SaleEvent::FundsWithdrawn { recipient, amount } => {
            hasher.update(recipient.0.as_bytes());
            hasher.update(amount.to_string().as_bytes());
        }
        SaleEvent::MetadataUpdated { field, value } => {
            hasher.update(field.to_string().as_bytes());
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }
    }
}
