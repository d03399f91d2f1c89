//! Decoder adapter: streams typed elements from an encoded source.
use std::io::{BufReader, Read};

use osmpbf::{BlobDecode, BlobReader, BlobType, Element, RelMemberType};
use osmtab_core::MemberKind;
use thiserror::Error;

/// A relation member as exposed by a decoder, borrowing its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMember<'a> {
    /// Kind of the referenced entity.
    pub kind: MemberKind,
    /// Identifier of the referenced entity.
    pub id: i64,
    /// Role string; may be empty.
    pub role: &'a str,
}

/// Receives decoded elements one at a time.
///
/// Borrowed arguments are only valid for the duration of the call.
pub trait ElementSink {
    /// Receive a node.
    fn node<'a, T>(&mut self, id: i64, lat: f64, lon: f64, tags: T)
    where
        T: IntoIterator<Item = (&'a str, &'a str)>;

    /// Receive a way with its node references in path order.
    fn way<'a, R, T>(&mut self, id: i64, node_ids: R, tags: T)
    where
        R: IntoIterator<Item = i64>,
        T: IntoIterator<Item = (&'a str, &'a str)>;

    /// Receive a relation with its members in source order.
    fn relation<'a, M, T>(&mut self, id: i64, members: M, tags: T)
    where
        M: IntoIterator<Item = RawMember<'a>>,
        T: IntoIterator<Item = (&'a str, &'a str)>;
}

/// A finite stream of decoded elements.
///
/// Implementations push every element they can decode into the sink, in
/// source order. An `Err` means decoding stopped early; elements already
/// delivered remain valid.
pub trait ElementSource {
    /// Error describing why decoding stopped.
    type Error: std::error::Error + 'static;

    /// Push all decodable elements into `sink`.
    fn drain_into<S: ElementSink>(self, sink: &mut S) -> Result<(), Self::Error>;
}

/// Reasons a byte stream cannot be treated as an OSM PBF file at all.
#[derive(Debug, Error)]
pub enum PbfHeaderError {
    /// The stream holds no blobs.
    #[error("input is empty")]
    Empty,
    /// The first blob is not an `OSMHeader` blob.
    #[error("first blob is {found:?}, expected OSMHeader")]
    NotHeader {
        /// Type string of the first blob.
        found: String,
    },
    /// The first blob or its header block could not be decoded.
    #[error("failed to read the file header: {0}")]
    Decode(#[from] osmpbf::Error),
}

/// Sequential OSM PBF decoder backed by `osmpbf`.
///
/// Construction reads and validates the leading `OSMHeader` blob; data blobs
/// are decoded one at a time by [`ElementSource::drain_into`].
pub struct PbfSource<R: Read + Send> {
    blobs: BlobReader<BufReader<R>>,
}

impl<R: Read + Send> PbfSource<R> {
    /// Wrap an opened PBF byte stream, consuming its header blob.
    ///
    /// # Errors
    /// Returns [`PbfHeaderError`] when the stream is empty or does not start
    /// with a decodable `OSMHeader` blob.
    pub fn new(input: R) -> Result<Self, PbfHeaderError> {
        let mut blobs = BlobReader::new(BufReader::new(input));
        let first = blobs.next().ok_or(PbfHeaderError::Empty)??;
        match first.get_type() {
            BlobType::OsmHeader => {
                first.to_headerblock()?;
                Ok(Self { blobs })
            }
            BlobType::OsmData => Err(PbfHeaderError::NotHeader {
                found: "OSMData".to_owned(),
            }),
            BlobType::Unknown(found) => Err(PbfHeaderError::NotHeader {
                found: found.to_owned(),
            }),
        }
    }
}

impl<R: Read + Send> std::fmt::Debug for PbfSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PbfSource").finish_non_exhaustive()
    }
}

const fn member_kind(member_type: &RelMemberType) -> MemberKind {
    match member_type {
        RelMemberType::Node => MemberKind::Node,
        RelMemberType::Way => MemberKind::Way,
        RelMemberType::Relation => MemberKind::Relation,
    }
}

fn relation_members<'a>(
    relation: &osmpbf::Relation<'a>,
) -> Result<Vec<RawMember<'a>>, osmpbf::Error> {
    relation
        .members()
        .map(|member| {
            Ok(RawMember {
                kind: member_kind(&member.member_type),
                id: member.member_id,
                role: member.role()?,
            })
        })
        .collect()
}

fn push_element<S: ElementSink>(element: Element<'_>, sink: &mut S) -> Result<(), osmpbf::Error> {
    match element {
        Element::Node(node) => sink.node(node.id(), node.lat(), node.lon(), node.tags()),
        Element::DenseNode(node) => sink.node(node.id(), node.lat(), node.lon(), node.tags()),
        Element::Way(way) => sink.way(way.id(), way.refs(), way.tags()),
        Element::Relation(relation) => {
            let members = relation_members(&relation)?;
            sink.relation(relation.id(), members, relation.tags());
        }
    }
    Ok(())
}

impl<R: Read + Send> ElementSource for PbfSource<R> {
    type Error = osmpbf::Error;

    fn drain_into<S: ElementSink>(self, sink: &mut S) -> Result<(), Self::Error> {
        // The first failure ends the pass; later blobs are never decompressed.
        for next in self.blobs {
            if let BlobDecode::OsmData(block) = next?.decode()? {
                for element in block.elements() {
                    push_element(element, sink)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// A single blob declared as `OSMData` with an empty raw payload.
    const DATA_BLOB_FIRST: &[u8] = &[
        0x00, 0x00, 0x00, 0x0b, 0x0a, 0x07, b'O', b'S', b'M', b'D', b'a', b't', b'a', 0x18, 0x02,
        0x0a, 0x00,
    ];

    #[rstest]
    fn empty_input_has_no_header() {
        let err = PbfSource::new(&b""[..]).expect_err("empty input");
        assert!(matches!(err, PbfHeaderError::Empty), "unexpected {err:?}");
    }

    #[rstest]
    fn text_input_fails_to_decode() {
        let err = PbfSource::new(&b"this is not a pbf file"[..]).expect_err("text input");
        assert!(matches!(err, PbfHeaderError::Decode(_)), "unexpected {err:?}");
    }

    #[rstest]
    fn data_blob_cannot_open_the_file() {
        let err = PbfSource::new(DATA_BLOB_FIRST).expect_err("no header blob");
        match err {
            PbfHeaderError::NotHeader { found } => assert_eq!(found, "OSMData"),
            other => panic!("expected NotHeader, got {other:?}"),
        }
    }
}
