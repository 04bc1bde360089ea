//! Fixed-size byte buffer used for all 32-byte hash values.

use std::{fmt, io};

use arbitrary::{Arbitrary, Unstructured};
use bitcoin::{BlockHash, TxMerkleNode, Txid, hashes::Hash as _};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A 32-byte buffer, kept in internal (hash output) byte order.
///
/// Merkle arithmetic operates on these directly. Bitcoin's hash newtypes
/// convert in and out without touching the byte order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Buf32(pub [u8; 32]);

impl Buf32 {
    pub const LEN: usize = 32;

    pub const fn new(data: [u8; 32]) -> Self {
        Self(data)
    }

    /// Returns a copy with the byte order reversed.
    ///
    /// Coinbase commitments store the chain merkle root in the opposite
    /// order from the one the proof tree produces.
    pub fn reversed(&self) -> Self {
        let mut bytes = self.0;
        bytes.reverse();
        Self(bytes)
    }
}

impl AsRef<[u8]> for Buf32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8; 32]> for Buf32 {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Buf32 {
    fn from(data: [u8; 32]) -> Self {
        Self(data)
    }
}

impl From<Buf32> for [u8; 32] {
    fn from(buf: Buf32) -> Self {
        buf.0
    }
}

impl<'a> TryFrom<&'a [u8]> for Buf32 {
    type Error = &'a [u8];

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        <[u8; 32]>::try_from(value).map(Self).map_err(|_| value)
    }
}

impl From<BlockHash> for Buf32 {
    fn from(hash: BlockHash) -> Self {
        Self(hash.to_byte_array())
    }
}

impl From<Buf32> for BlockHash {
    fn from(buf: Buf32) -> Self {
        BlockHash::from_byte_array(buf.0)
    }
}

impl From<Txid> for Buf32 {
    fn from(txid: Txid) -> Self {
        Self(txid.to_byte_array())
    }
}

impl From<TxMerkleNode> for Buf32 {
    fn from(node: TxMerkleNode) -> Self {
        Self(node.to_byte_array())
    }
}

impl From<Buf32> for TxMerkleNode {
    fn from(buf: Buf32) -> Self {
        TxMerkleNode::from_byte_array(buf.0)
    }
}

impl fmt::Debug for Buf32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Display for Buf32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // fmt only first and last bits of data.
        f.write_str(&hex::encode(&self.0[..3]))?;
        f.write_str("..")?;
        f.write_str(&hex::encode(&self.0[Self::LEN - 3..]))
    }
}

impl BorshSerialize for Buf32 {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.0)
    }
}

impl BorshDeserialize for Buf32 {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let mut array = [0u8; 32];
        reader.read_exact(&mut array)?;
        Ok(array.into())
    }
}

impl<'a> Arbitrary<'a> for Buf32 {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut array = [0u8; 32];
        u.fill_buffer(&mut array)?;
        Ok(array.into())
    }
}

impl Serialize for Buf32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Buf32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let mut array = [0u8; 32];
        hex::decode_to_slice(s, &mut array).map_err(de::Error::custom)?;
        Ok(array.into())
    }
}
