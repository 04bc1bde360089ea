//! Block headers that may carry an auxpow.

use auxpow_primitives::{
    Buf32, ChainId, VersionError, VersionFields, VersionLayout, compute_block_hash,
};
use bitcoin::{
    block::{Header, Version},
    consensus::{Decodable, Encodable, encode},
    io::{self, BufRead, Cursor, Write},
};

use crate::auxpow::AuxPow;

/// An 80-byte block header plus the auxpow it owns, if any.
///
/// The block hash covers the 80 header bytes only. Attaching or detaching the
/// auxpow leaves it untouched, flipping the version flag does not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuxBlockHeader {
    pub header: Header,
    auxpow: Option<Box<AuxPow>>,
}

impl AuxBlockHeader {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            auxpow: None,
        }
    }

    pub fn block_hash(&self) -> Buf32 {
        compute_block_hash(&self.header)
    }

    pub fn auxpow(&self) -> Option<&AuxPow> {
        self.auxpow.as_deref()
    }

    pub fn version_fields(&self, layout: &VersionLayout) -> VersionFields {
        layout.decode(self.header.version.to_consensus())
    }

    /// Resets the version to `base_version` on chain `chain_id`, clearing the
    /// auxpow flag.
    pub fn set_base_version(
        &mut self,
        layout: &VersionLayout,
        base_version: u32,
        chain_id: ChainId,
    ) -> Result<(), VersionError> {
        let version = layout.with_base_version(base_version, chain_id)?;
        self.header.version = Version::from_consensus(version);
        Ok(())
    }

    pub fn set_chain_id(
        &mut self,
        layout: &VersionLayout,
        chain_id: ChainId,
    ) -> Result<(), VersionError> {
        let version = layout.with_chain_id(self.header.version.to_consensus(), chain_id)?;
        self.header.version = Version::from_consensus(version);
        Ok(())
    }

    pub fn set_auxpow_flag(&mut self, layout: &VersionLayout, auxpow: bool) {
        let version = layout.with_auxpow_flag(self.header.version.to_consensus(), auxpow);
        self.header.version = Version::from_consensus(version);
    }

    /// Attaches `auxpow`, setting the version flag to match. Any previously
    /// attached proof is dropped.
    pub fn set_auxpow(&mut self, layout: &VersionLayout, auxpow: AuxPow) {
        self.auxpow = Some(Box::new(auxpow));
        self.set_auxpow_flag(layout, true);
    }

    /// Detaches the auxpow, leaving the version untouched.
    pub fn take_auxpow(&mut self) -> Option<AuxPow> {
        self.auxpow.take().map(|auxpow| *auxpow)
    }

    /// Decodes a header, reading an auxpow after it iff its version carries
    /// the flag under `layout`.
    pub fn consensus_decode_with_layout<R: BufRead + ?Sized>(
        reader: &mut R,
        layout: &VersionLayout,
    ) -> Result<Self, encode::Error> {
        let header = Header::consensus_decode_from_finite_reader(reader)?;
        let auxpow = if layout.is_auxpow(header.version.to_consensus()) {
            Some(Box::new(AuxPow::consensus_decode_from_finite_reader(
                reader,
            )?))
        } else {
            None
        };
        Ok(Self { header, auxpow })
    }

    /// Decodes a header from `data`, which must be consumed entirely.
    pub fn deserialize_with_layout(
        data: &[u8],
        layout: &VersionLayout,
    ) -> Result<Self, encode::Error> {
        let mut cursor = Cursor::new(data);
        let decoded = Self::consensus_decode_with_layout(&mut cursor, layout)?;
        if cursor.position() as usize != data.len() {
            return Err(encode::Error::ParseFailed(
                "data not consumed entirely when explicitly deserializing",
            ));
        }
        Ok(decoded)
    }
}

impl From<Header> for AuxBlockHeader {
    fn from(header: Header) -> Self {
        Self::new(header)
    }
}

impl Encodable for AuxBlockHeader {
    fn consensus_encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize, io::Error> {
        let mut len = self.header.consensus_encode(writer)?;
        if let Some(auxpow) = &self.auxpow {
            len += auxpow.consensus_encode(writer)?;
        }
        Ok(len)
    }
}
