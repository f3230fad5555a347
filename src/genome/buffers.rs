/// A flat byte matrix addressed by `(gene, copy)`.
///
/// Row-major with the copy axis innermost: the byte for gene `g`, copy `c`
/// lives at `g * copies + c`. The copy count is fixed per buffer; sex-linked
/// buffers use `ploidy` copies for the homogametic sex and `ploidy / 2` for
/// the heterogametic sex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteMatrix {
    data: Vec<u8>,
    copies: usize,
}

impl ByteMatrix {
    /// Create a zeroed matrix for `genes` loci with `copies` copies each.
    pub fn new(genes: usize, copies: usize) -> Self {
        Self {
            data: vec![0; genes * copies],
            copies,
        }
    }

    /// Rebuild a matrix from raw bytes, zero-extending to at least
    /// `genes * copies` bytes. Oversized input is kept as-is.
    pub fn from_bytes(mut data: Vec<u8>, genes: usize, copies: usize) -> Self {
        let wanted = genes * copies;
        if data.len() < wanted {
            data.resize(wanted, 0);
        }
        Self { data, copies }
    }

    /// Number of copies per gene.
    #[inline]
    pub fn copies(&self) -> usize {
        self.copies
    }

    /// Number of genes (rows).
    #[inline]
    pub fn genes(&self) -> usize {
        if self.copies == 0 {
            0
        } else {
            self.data.len() / self.copies
        }
    }

    /// Get the byte at `(gene, copy)`.
    #[inline]
    pub fn get(&self, gene: usize, copy: usize) -> u8 {
        debug_assert!(copy < self.copies);
        self.data[gene * self.copies + copy]
    }

    /// Set the byte at `(gene, copy)`.
    #[inline]
    pub fn set(&mut self, gene: usize, copy: usize, value: u8) {
        debug_assert!(copy < self.copies);
        self.data[gene * self.copies + copy] = value;
    }

    /// Borrow all copies of one gene as a slice.
    #[inline]
    pub fn row(&self, gene: usize) -> &[u8] {
        let start = gene * self.copies;
        &self.data[start..start + self.copies]
    }

    /// Borrow the raw backing bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutably borrow the raw backing bytes.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Check if the buffer holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A packed bit buffer for two-state loci, one bit per copy per locus.
///
/// Bit index for locus `g`, copy `c` is `copies * g + c`. Bits are packed
/// low-to-high within each byte: index 0 is the least significant bit of
/// byte 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer {
    data: Vec<u8>,
    copies: usize,
}

impl BitBuffer {
    /// Create a cleared buffer for `loci` two-state loci with `copies`
    /// copies each.
    pub fn new(loci: usize, copies: usize) -> Self {
        Self {
            data: vec![0; (loci * copies).div_ceil(8)],
            copies,
        }
    }

    /// Rebuild a buffer from raw bytes, zero-extending to hold at least
    /// `loci * copies` bits.
    pub fn from_bytes(mut data: Vec<u8>, loci: usize, copies: usize) -> Self {
        let wanted = (loci * copies).div_ceil(8);
        if data.len() < wanted {
            data.resize(wanted, 0);
        }
        Self { data, copies }
    }

    /// Number of copies per locus.
    #[inline]
    pub fn copies(&self) -> usize {
        self.copies
    }

    /// Get the bit at `(locus, copy)`.
    #[inline]
    pub fn get(&self, locus: usize, copy: usize) -> bool {
        let index = self.copies * locus + copy;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set or clear the bit at `(locus, copy)`.
    #[inline]
    pub fn set(&mut self, locus: usize, copy: usize, value: bool) {
        let index = self.copies * locus + copy;
        if value {
            self.data[index / 8] |= 1 << (index % 8);
        } else {
            self.data[index / 8] &= !(1 << (index % 8));
        }
    }

    /// Flip the bit at `(locus, copy)`.
    #[inline]
    pub fn flip(&mut self, locus: usize, copy: usize) {
        let index = self.copies * locus + copy;
        self.data[index / 8] ^= 1 << (index % 8);
    }

    /// Borrow the raw backing bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Check if the buffer holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
