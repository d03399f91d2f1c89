//! Relational projection of entities into flat three-column tables.
//!
//! Rows are produced lazily from the borrowed dataset so that projecting a
//! large extract does not duplicate it in memory.

use std::borrow::Cow;
use std::fmt;

use crate::dataset::OsmDataset;
use crate::entity::{EntityKind, Member, Node, Relation, TaggedEntity, Way};

/// Delimiter joining multi-valued fields inside a single column.
pub const LIST_DELIMITER: char = ';';

/// Header of the nodes table.
pub const NODES_HEADER: Header = ["id", "latitude", "longitude"];
/// Header of the ways table.
pub const WAYS_HEADER: Header = ["id", "node_ids", "nodes_count"];
/// Header of the relations table.
pub const RELATIONS_HEADER: Header = ["id", "members", "members_count"];

/// Column names of a table.
pub type Header = [&'static str; 3];

/// One output row. Tag keys and values are borrowed from the dataset.
pub type Record<'a> = [Cow<'a, str>; 3];

/// A `(owner, key, value)` triple derived from a non-empty tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRow<'a> {
    /// Identifier of the entity carrying the tag.
    pub owner_id: i64,
    /// Tag key.
    pub key: &'a str,
    /// Tag value; never empty.
    pub value: &'a str,
}

impl<'a> TagRow<'a> {
    fn into_record(self) -> Record<'a> {
        [
            Cow::Owned(self.owner_id.to_string()),
            Cow::Borrowed(self.key),
            Cow::Borrowed(self.value),
        ]
    }
}

/// Iterate the tag rows of any entity kind.
///
/// Tags with empty values are skipped. Rows follow entity order, then
/// ascending key order within an entity.
///
/// # Examples
/// ```
/// use osmtab_core::{Node, Tags, tag_rows};
///
/// let tags = Tags::from([
///     ("name".to_owned(), "X".to_owned()),
///     ("note".to_owned(), String::new()),
/// ]);
/// let nodes = [Node::new(1, 0.0, 0.0, tags)];
/// let rows: Vec<_> = tag_rows(&nodes).collect();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].key, "name");
/// ```
pub fn tag_rows<E: TaggedEntity>(entities: &[E]) -> impl Iterator<Item = TagRow<'_>> {
    entities.iter().flat_map(|entity| {
        let owner_id = entity.id();
        entity
            .tags()
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(move |(key, value)| TagRow {
                owner_id,
                key,
                value,
            })
    })
}

/// Format a coordinate with seven fractional digits.
#[must_use]
pub fn format_coordinate(degrees: f64) -> String {
    format!("{degrees:.7}")
}

/// Join node identifiers with [`LIST_DELIMITER`].
///
/// # Examples
/// ```
/// use osmtab_core::join_node_ids;
///
/// assert_eq!(join_node_ids(&[3, -1, 7]), "3;-1;7");
/// assert_eq!(join_node_ids(&[]), "");
/// ```
#[must_use]
pub fn join_node_ids(node_ids: &[i64]) -> String {
    let mut joined = String::new();
    for (index, node_id) in node_ids.iter().enumerate() {
        if index > 0 {
            joined.push(LIST_DELIMITER);
        }
        joined.push_str(&node_id.to_string());
    }
    joined
}

/// Render a member as `<kind><id>:<role>`.
#[must_use]
pub fn member_token(member: &Member) -> String {
    format!("{}{}:{}", member.kind.code(), member.id, member.role)
}

/// Join member tokens with [`LIST_DELIMITER`].
#[must_use]
pub fn join_members(members: &[Member]) -> String {
    members
        .iter()
        .map(member_token)
        .collect::<Vec<_>>()
        .join(&LIST_DELIMITER.to_string())
}

fn node_record(node: &Node) -> Record<'_> {
    [
        Cow::Owned(node.id.to_string()),
        Cow::Owned(format_coordinate(node.lat)),
        Cow::Owned(format_coordinate(node.lon)),
    ]
}

fn way_record(way: &Way) -> Record<'_> {
    [
        Cow::Owned(way.id.to_string()),
        Cow::Owned(join_node_ids(&way.node_ids)),
        Cow::Owned(way.node_ids.len().to_string()),
    ]
}

fn relation_record(relation: &Relation) -> Record<'_> {
    [
        Cow::Owned(relation.id.to_string()),
        Cow::Owned(join_members(&relation.members)),
        Cow::Owned(relation.members.len().to_string()),
    ]
}

/// Type-erased access to the tag rows of one entity kind.
trait TagRowSource<'a>: fmt::Debug {
    fn rows(&self) -> Box<dyn Iterator<Item = TagRow<'a>> + 'a>;
}

#[derive(Debug)]
struct TaggedSlice<'a, E>(&'a [E]);

impl<'a, E: TaggedEntity + fmt::Debug> TagRowSource<'a> for TaggedSlice<'a, E> {
    fn rows(&self) -> Box<dyn Iterator<Item = TagRow<'a>> + 'a> {
        Box::new(tag_rows(self.0))
    }
}

#[derive(Debug)]
enum RowSource<'a> {
    Nodes(&'a [Node]),
    Ways(&'a [Way]),
    Relations(&'a [Relation]),
    Tags(Box<dyn TagRowSource<'a> + 'a>),
}

/// A named table whose rows are derived on demand from the dataset.
#[derive(Debug)]
pub struct Table<'a> {
    name: &'static str,
    header: Header,
    source: RowSource<'a>,
}

impl<'a> Table<'a> {
    /// File name of the table inside the output directory.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Column names, written as the first line.
    #[must_use]
    pub const fn header(&self) -> Header {
        self.header
    }

    /// Iterate the table's rows in output order.
    #[must_use]
    pub fn records(&self) -> Box<dyn Iterator<Item = Record<'a>> + 'a> {
        match self.source {
            RowSource::Nodes(nodes) => Box::new(nodes.iter().map(node_record)),
            RowSource::Ways(ways) => Box::new(ways.iter().map(way_record)),
            RowSource::Relations(relations) => Box::new(relations.iter().map(relation_record)),
            RowSource::Tags(ref tags) => Box::new(tags.rows().map(TagRow::into_record)),
        }
    }

    /// Number of data rows, excluding the header.
    #[must_use]
    pub fn row_count(&self) -> usize {
        match self.source {
            RowSource::Nodes(nodes) => nodes.len(),
            RowSource::Ways(ways) => ways.len(),
            RowSource::Relations(relations) => relations.len(),
            RowSource::Tags(ref tags) => tags.rows().count(),
        }
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().next().is_none()
    }
}

/// Entity table for nodes, or `None` when there are none.
#[must_use]
pub fn project_nodes(nodes: &[Node]) -> Option<Table<'_>> {
    (!nodes.is_empty()).then_some(Table {
        name: EntityKind::Node.table_name(),
        header: NODES_HEADER,
        source: RowSource::Nodes(nodes),
    })
}

/// Entity table for ways, or `None` when there are none.
#[must_use]
pub fn project_ways(ways: &[Way]) -> Option<Table<'_>> {
    (!ways.is_empty()).then_some(Table {
        name: EntityKind::Way.table_name(),
        header: WAYS_HEADER,
        source: RowSource::Ways(ways),
    })
}

/// Entity table for relations, or `None` when there are none.
#[must_use]
pub fn project_relations(relations: &[Relation]) -> Option<Table<'_>> {
    (!relations.is_empty()).then_some(Table {
        name: EntityKind::Relation.table_name(),
        header: RELATIONS_HEADER,
        source: RowSource::Relations(relations),
    })
}

/// Tag table for one entity kind, or `None` when no entity carries a
/// non-empty tag value.
///
/// # Examples
/// ```
/// use osmtab_core::{Tags, Way, project_tags};
///
/// let ways = [Way::new(2, vec![1], Tags::from([("k".to_owned(), String::new())]))];
/// assert!(project_tags(&ways).is_none());
/// ```
#[must_use]
pub fn project_tags<E: TaggedEntity + fmt::Debug>(entities: &[E]) -> Option<Table<'_>> {
    let table = Table {
        name: E::KIND.tag_table_name(),
        header: [E::KIND.owner_column(), "key", "value"],
        source: RowSource::Tags(Box::new(TaggedSlice(entities))),
    };
    (!table.is_empty()).then_some(table)
}

/// Project every non-empty table of the dataset.
///
/// Tables come back in a fixed order: nodes, ways, relations, then the
/// node, way and relation tag tables.
#[must_use]
pub fn project_dataset(dataset: &OsmDataset) -> Vec<Table<'_>> {
    [
        project_nodes(dataset.nodes()),
        project_ways(dataset.ways()),
        project_relations(dataset.relations()),
        project_tags(dataset.nodes()),
        project_tags(dataset.ways()),
        project_tags(dataset.relations()),
    ]
    .into_iter()
    .flatten()
    .collect()
}
