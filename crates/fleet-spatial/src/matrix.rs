//! CSV distance-matrix loader.
//!
//! # CSV format
//!
//! A square matrix with two label columns.  The header row repeats the
//! location names (from the third cell on) as column labels; every data row
//! starts with a location's name and address followed by one distance cell
//! per column:
//!
//! ```csv
//! Location,Address,Hub,Depot Park,Library
//! Hub,HUB,0,,
//! Depot Park,1060 Dalton Ave S,7.2,0,
//! Library,1330 2100 S,3.8,7.1,0
//! ```
//!
//! Blank cells mean "no edge".  Because the graph is undirected, a lower (or
//! upper) triangular matrix is enough; if both triangles are filled the later
//! cell wins.  Diagonal cells are ignored.
//!
//! Addresses pass through [`normalize_address`] so they match package
//! addresses normalised the same way.

use std::io::Read;
use std::path::Path;

use crate::{normalize_address, Graph, GraphError, GraphResult, Location};

/// Load a [`Graph`] from a distance-matrix CSV file.
pub fn load_distance_matrix_csv(path: &Path) -> GraphResult<Graph> {
    let file = std::fs::File::open(path)?;
    load_distance_matrix_reader(file)
}

/// Like [`load_distance_matrix_csv`] but accepts any `Read` source.
pub fn load_distance_matrix_reader<R: Read>(reader: R) -> GraphResult<Graph> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let header = match records.next() {
        Some(row) => row?,
        None => return Ok(Graph::new()),
    };
    let columns: Vec<String> = header.iter().skip(2).map(str::to_string).collect();

    let rows: Vec<csv::StringRecord> = records.collect::<Result<_, _>>()?;

    // ── Nodes first, so column labels can resolve to any row ──────────────
    let mut graph = Graph::new();
    let mut row_ids = Vec::with_capacity(rows.len());
    for (line, row) in rows.iter().enumerate() {
        let (Some(name), Some(address)) = (row.get(0), row.get(1)) else {
            return Err(GraphError::Matrix(format!(
                "row {} needs a name and an address",
                line + 2
            )));
        };
        let id = graph.add_node(Location::new(name, normalize_address(address)))?;
        row_ids.push(id);
    }

    let column_ids = columns
        .iter()
        .map(|name| graph.get_node(Some(name), None))
        .collect::<GraphResult<Vec<_>>>()?;

    // ── Edges ─────────────────────────────────────────────────────────────
    for (row, &from) in rows.iter().zip(&row_ids) {
        for (cell, &to) in row.iter().skip(2).zip(&column_ids) {
            if cell.is_empty() || from == to {
                continue;
            }
            let miles: f64 = cell.parse().map_err(|_| {
                GraphError::Matrix(format!("invalid distance {cell:?} in row {:?}", &row[0]))
            })?;
            graph.connect(from, to, miles)?;
        }
    }

    Ok(graph)
}
