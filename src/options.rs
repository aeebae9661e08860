/// Ceilings applied while reading and writing. Exceeding either one fails
/// with [`ErrorKind::ObjectTooLarge`][`crate::error::ErrorKind::ObjectTooLarge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of bytes of variable length data (names, strings and
    /// arrays) accepted by a read, or total bytes produced by a write.
    pub max_bytes: usize,
    /// Maximum nesting of lists and compounds.
    pub max_depth: usize,
}

impl Limits {
    pub const DEFAULT_MAX_BYTES: usize = 64 * 1024 * 1024;

    // Matches the nesting limit Minecraft itself applies.
    pub const DEFAULT_MAX_DEPTH: usize = 512;
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_bytes: Self::DEFAULT_MAX_BYTES,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Options for [`from_bytes`][`crate::from_bytes`] and
/// [`from_reader`][`crate::from_reader`].
///
/// Decoded trees are always owned by the caller, so they can be modified
/// regardless of `mutable_containers` and `mutable_leaves`. The two flags are
/// carried so an options word exchanged with other tools survives
/// [`bits`][`ReadOptions::bits`] and [`from_bits`][`ReadOptions::from_bits`]
/// unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Produce maps and lists the caller intends to modify.
    pub mutable_containers: bool,
    /// Produce strings and byte buffers the caller intends to modify.
    pub mutable_leaves: bool,
    /// Accept a root tag that is not a compound.
    pub allow_fragments: bool,
    pub limits: Limits,
}

impl ReadOptions {
    pub const MUTABLE_CONTAINERS: u32 = 0x0001;
    pub const MUTABLE_LEAVES: u32 = 0x0002;
    pub const ALLOW_FRAGMENTS: u32 = 0x0004;

    /// Options from a flag word, with default limits. Unknown bits are
    /// ignored.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            mutable_containers: bits & Self::MUTABLE_CONTAINERS != 0,
            mutable_leaves: bits & Self::MUTABLE_LEAVES != 0,
            allow_fragments: bits & Self::ALLOW_FRAGMENTS != 0,
            limits: Limits::default(),
        }
    }

    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.mutable_containers {
            bits |= Self::MUTABLE_CONTAINERS;
        }
        if self.mutable_leaves {
            bits |= Self::MUTABLE_LEAVES;
        }
        if self.allow_fragments {
            bits |= Self::ALLOW_FRAGMENTS;
        }
        bits
    }
}

/// Options for [`to_bytes`][`crate::to_bytes`] and
/// [`to_writer`][`crate::to_writer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Accept a root value that is not a compound.
    pub allow_fragments: bool,
    pub limits: Limits,
}
