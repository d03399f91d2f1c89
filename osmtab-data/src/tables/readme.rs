//! Human-readable description of the table files.
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;

use super::TableWriteError;

/// File name of the schema description.
pub const README_FILE_NAME: &str = "README.txt";

const README: &str = "\
# OSM CSV export

The files in this directory hold the contents of an OSM PBF file as
comma-separated tables. A file is only present when its entity kind
appeared in the input (or, for tag tables, when at least one tag had a
non-empty value).

## Files

1. nodes.csv - nodes (points)
   - id: node identifier
   - latitude: WGS84 latitude, 7 decimal places
   - longitude: WGS84 longitude, 7 decimal places

2. ways.csv - ways (lines and polygons)
   - id: way identifier
   - node_ids: node identifiers in path order, separated by ';'
   - nodes_count: number of node identifiers

3. relations.csv - relations (groups of entities)
   - id: relation identifier
   - members: members separated by ';', each as '<type><id>:<role>'
     where type is n (node), w (way) or r (relation)
   - members_count: number of members

4. nodes_tags.csv - node tags
   - node_id: node identifier
   - key: tag key
   - value: tag value

5. ways_tags.csv - way tags
   - way_id: way identifier
   - key: tag key
   - value: tag value

6. relations_tags.csv - relation tags
   - relation_id: relation identifier
   - key: tag key
   - value: tag value

## Notes

- Identifiers are unique within their own entity kind.
- Coordinates use WGS84 (standard GPS coordinates).
- Tags with empty values are not exported.
- Tag rows are ordered by entity, then by key.
- Roles inside 'members' are not escaped: a role containing ';' splits
  into extra tokens when the field is read back.
";

/// Write the schema description into `dir`, returning its path.
///
/// The description is plain UTF-8 regardless of the table encoding.
pub fn write_readme(dir: &Utf8Path) -> Result<Utf8PathBuf, TableWriteError> {
    let path = dir.join(README_FILE_NAME);
    let write_err = |source| TableWriteError::WriteReadme {
        path: path.clone(),
        source,
    };
    let mut file = osmtab_fs::create_utf8_file(&path).map_err(write_err)?;
    file.write_all(README.as_bytes()).map_err(write_err)?;
    Ok(path)
}
