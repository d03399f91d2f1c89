//! Typed OpenStreetMap entities held in memory between decoding and
//! projection.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Free-form OpenStreetMap key/value annotations.
///
/// An ordered map keeps tag-row output stable across runs.
pub type Tags = BTreeMap<String, String>;

/// The three identifier namespaces of OpenStreetMap data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Point features.
    Node,
    /// Ordered node sequences (lines and polygons).
    Way,
    /// Ordered groups of other entities.
    Relation,
}

impl EntityKind {
    /// File name of the entity table for this kind.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Node => "nodes.csv",
            Self::Way => "ways.csv",
            Self::Relation => "relations.csv",
        }
    }

    /// File name of the tag table for this kind.
    #[must_use]
    pub const fn tag_table_name(self) -> &'static str {
        match self {
            Self::Node => "nodes_tags.csv",
            Self::Way => "ways_tags.csv",
            Self::Relation => "relations_tags.csv",
        }
    }

    /// Column naming the owning entity in the tag table.
    #[must_use]
    pub const fn owner_column(self) -> &'static str {
        match self {
            Self::Node => "node_id",
            Self::Way => "way_id",
            Self::Relation => "relation_id",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        };
        f.write_str(label)
    }
}

/// Uniform `(identifier, tags)` view over any entity kind.
///
/// Tag-table generation is written once against this trait.
///
/// # Examples
/// ```
/// use osmtab_core::{EntityKind, Node, TaggedEntity, Tags};
///
/// let node = Node::new(7, 55.75, 37.6, Tags::new());
/// assert_eq!(node.id(), 7);
/// assert_eq!(Node::KIND, EntityKind::Node);
/// ```
pub trait TaggedEntity {
    /// Namespace the implementing type belongs to.
    const KIND: EntityKind;

    /// Identifier assigned by the source data.
    fn id(&self) -> i64;

    /// Tags attached to the entity.
    fn tags(&self) -> &Tags;
}

/// A point with WGS84 coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Identifier, unique within the node namespace.
    pub id: i64,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Tags attached to the node.
    pub tags: Tags,
}

impl Node {
    /// Construct a node.
    #[must_use]
    pub const fn new(id: i64, lat: f64, lon: f64, tags: Tags) -> Self {
        Self { id, lat, lon, tags }
    }
}

impl TaggedEntity for Node {
    const KIND: EntityKind = EntityKind::Node;

    fn id(&self) -> i64 {
        self.id
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// An ordered path through node references.
///
/// The order of `node_ids` defines the geometry and is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Way {
    /// Identifier, unique within the way namespace.
    pub id: i64,
    /// Referenced node identifiers in path order.
    pub node_ids: Vec<i64>,
    /// Tags attached to the way.
    pub tags: Tags,
}

impl Way {
    /// Construct a way.
    #[must_use]
    pub const fn new(id: i64, node_ids: Vec<i64>, tags: Tags) -> Self {
        Self { id, node_ids, tags }
    }
}

impl TaggedEntity for Way {
    const KIND: EntityKind = EntityKind::Way;

    fn id(&self) -> i64 {
        self.id
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// An ordered group of member references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Identifier, unique within the relation namespace.
    pub id: i64,
    /// Members in source order.
    pub members: Vec<Member>,
    /// Tags attached to the relation.
    pub tags: Tags,
}

impl Relation {
    /// Construct a relation.
    #[must_use]
    pub const fn new(id: i64, members: Vec<Member>, tags: Tags) -> Self {
        Self { id, members, tags }
    }
}

impl TaggedEntity for Relation {
    const KIND: EntityKind = EntityKind::Relation;

    fn id(&self) -> i64 {
        self.id
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// Kind of entity a relation member points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Member is a node (`n`).
    Node,
    /// Member is a way (`w`).
    Way,
    /// Member is a relation (`r`).
    Relation,
}

impl MemberKind {
    /// Single-letter code used in the `members` column.
    ///
    /// # Examples
    /// ```
    /// use osmtab_core::MemberKind;
    ///
    /// assert_eq!(MemberKind::Way.code(), 'w');
    /// ```
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Node => 'n',
            Self::Way => 'w',
            Self::Relation => 'r',
        }
    }

    /// Resolve a single-letter code back to a member kind.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'n' => Some(Self::Node),
            'w' => Some(Self::Way),
            'r' => Some(Self::Relation),
            _ => None,
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A typed reference from a relation to another entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Kind of the referenced entity.
    pub kind: MemberKind,
    /// Identifier of the referenced entity.
    pub id: i64,
    /// Free-text role; may be empty.
    pub role: String,
}

impl Member {
    /// Construct a member reference.
    pub fn new(kind: MemberKind, id: i64, role: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            role: role.into(),
        }
    }
}

/// Errors raised when parsing a `<kind><id>:<role>` member token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMemberError {
    /// The token had no `:` separating the reference from the role.
    #[error("member token {token:?} has no role separator")]
    MissingRoleSeparator {
        /// Offending token.
        token: String,
    },
    /// The leading kind letter was not `n`, `w` or `r`.
    #[error("member token {token:?} has an unknown kind")]
    UnknownKind {
        /// Offending token.
        token: String,
    },
    /// The identifier was not a decimal integer.
    #[error("member token {token:?} has an invalid identifier")]
    InvalidId {
        /// Offending token.
        token: String,
        /// Integer parse failure.
        #[source]
        source: std::num::ParseIntError,
    },
}

impl FromStr for Member {
    type Err = ParseMemberError;

    /// Parse a token of the form `<kind><id>:<role>`.
    ///
    /// The role is everything after the first `:`, so roles may contain
    /// further colons.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (reference, role) =
            token
                .split_once(':')
                .ok_or_else(|| ParseMemberError::MissingRoleSeparator {
                    token: token.to_owned(),
                })?;
        let mut chars = reference.chars();
        let kind = chars
            .next()
            .and_then(MemberKind::from_code)
            .ok_or_else(|| ParseMemberError::UnknownKind {
                token: token.to_owned(),
            })?;
        let id = chars
            .as_str()
            .parse()
            .map_err(|source| ParseMemberError::InvalidId {
                token: token.to_owned(),
                source,
            })?;
        Ok(Self::new(kind, id, role))
    }
}
