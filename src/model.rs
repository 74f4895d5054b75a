//! Core data model: `Read`, `ReadPair`, and the pipeline's compile-time constants.

/// Length of the random Thruplex UMI at each fragment terminus.
pub const UMT_LEN: usize = 6;
/// Length of the fixed Thruplex adapter stem that follows the UMI.
pub const STEM_LEN: usize = 11;
/// Phred gap above which the higher-quality base wins an overlap mismatch outright.
pub const SIGNIFICANT_PHRED_DIFFERENCE: u8 = 10;
/// Minimum non-N bases a read must retain to avoid the N-only filter.
pub const MINIMUM_NON_N_BASES: usize = 50;
/// Minimum R1/R2 overlap length considered during overlap detection.
pub const MIN_OVERLAP: usize = 70;
/// Bins at or above this size use the offset-bucket clustering scheme.
pub const LARGE_BIN_THRESHOLD: usize = 2000;
/// Width, in bases, of each offset-bucket pass's sort key window.
pub const OFFSET_STRIDE: usize = 6;
/// First base offset probed by the offset-bucket scheme (skips the UMI-adjacent region).
pub const OFFSET_BASE: usize = 10;
/// Default allowed mismatches for overlap detection and family clustering.
pub const DEFAULT_ALLOWED: usize = 3;
/// Phred+33 byte used for zero-quality (N) bases.
pub const ZERO_QUAL: u8 = b'!';

/// Index of the forward read within a `ReadPair`.
pub const R1: usize = 0;
/// Index of the reverse read within a `ReadPair`.
pub const R2: usize = 1;

/// One sequenced fragment end: a name, sequence, and parallel Phred quality string.
///
/// `nonoverlapping_len` is only meaningful on `reads[R1]`: the number of
/// leading R1 bases not covered by the R2 overlap. It starts out equal to
/// `seq.len()` and is narrowed once the overlap detector runs.
#[derive(Debug, Clone)]
pub struct Read {
    pub name: String,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
    pub nonoverlapping_len: usize,
    /// The extracted Thruplex UMI bytes, if trimmed. Captured as owned bytes
    /// rather than an offset into `seq`, since trimming removes the UMI
    /// bytes from `seq` entirely instead of merely shifting a pointer past
    /// them (see [`crate::sizer`]).
    pub umi: Option<Vec<u8>>,
}

impl Read {
    pub fn new(name: String, seq: Vec<u8>, qual: Vec<u8>) -> Self {
        let len = seq.len();
        Read {
            name,
            seq,
            qual,
            nonoverlapping_len: len,
            umi: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn umi_slice(&self) -> Option<&[u8]> {
        self.umi.as_deref()
    }
}

/// A paired forward/reverse read, the primary unit the pipeline operates on.
///
/// `family == 0` means unassigned. `prevfamily` is scratch space used only by
/// the offset-bucket clustering pass within [`crate::family`].
#[derive(Debug, Clone)]
pub struct ReadPair {
    pub reads: [Read; 2],
    pub fragment_size: u32,
    pub copy_number: u32,
    pub family: i64,
    pub prevfamily: i64,
}

impl ReadPair {
    pub fn new(r1: Read, r2: Read) -> Self {
        ReadPair {
            reads: [r1, r2],
            fragment_size: 0,
            copy_number: 1,
            family: 0,
            prevfamily: 0,
        }
    }
}
