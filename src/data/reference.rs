use std::collections::BTreeMap;
use std::path::Path;

use arrow::datatypes::DataType;

use crate::error::LoadError;

use super::columns::{attr_value, binary_col, i64_col, read_batches};
use super::model::{BasinTable, HexGridCell, ReferenceDataset};

const OUTLINE_FILE: &str = "gdfGreenland.parquet";
const BASINS_FILE: &str = "t_greenland_basins.parquet";
const HEXGRID_FILE: &str = "t_greenland_hexagons.parquet";

/// Load the three fixed reference stores. Called once per process through
/// the [`DataStore`](super::store::DataStore) memo table.
pub(crate) fn load(root: &Path) -> Result<ReferenceDataset, LoadError> {
    let outline = load_outline(&root.join(OUTLINE_FILE))?;
    let basins = load_basins(&root.join(BASINS_FILE))?;
    let hexgrid = load_hexgrid(&root.join(HEXGRID_FILE))?;
    log::info!(
        "reference data: {} outline polygons, {} basins, {} grid cells",
        outline.len(),
        basins.len(),
        hexgrid.len()
    );
    Ok(ReferenceDataset {
        outline,
        basins,
        hexgrid,
    })
}

fn load_outline(path: &Path) -> Result<Vec<Vec<u8>>, LoadError> {
    let mut polygons = Vec::new();
    for batch in read_batches(path)? {
        polygons.extend(binary_col(&batch, "geometry").map_err(|e| LoadError::storage(path, e))?);
    }
    Ok(polygons)
}

/// Basin attributes are whatever columns the upstream product shipped;
/// geometry columns are skipped, everything else becomes an [`AttrValue`]
/// cell.
///
/// [`AttrValue`]: super::model::AttrValue
fn load_basins(path: &Path) -> Result<BasinTable, LoadError> {
    let mut table = BasinTable::default();
    for batch in read_batches(path)? {
        let schema = batch.schema();
        let attr_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| {
                !matches!(f.data_type(), DataType::Binary | DataType::LargeBinary)
            })
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        if table.column_names.is_empty() {
            table.column_names = attr_cols.iter().map(|(_, n)| n.clone()).collect();
        }

        for row in 0..batch.num_rows() {
            let mut attrs = BTreeMap::new();
            for (col_idx, col_name) in &attr_cols {
                attrs.insert(col_name.clone(), attr_value(batch.column(*col_idx), row));
            }
            table.rows.push(attrs);
        }
    }
    Ok(table)
}

fn load_hexgrid(path: &Path) -> Result<Vec<HexGridCell>, LoadError> {
    let mut cells = Vec::new();
    for batch in read_batches(path)? {
        let ids = i64_col(&batch, "hex_id").map_err(|e| LoadError::storage(path, e))?;
        let wkbs = binary_col(&batch, "geometry").map_err(|e| LoadError::storage(path, e))?;
        cells.extend(
            ids.into_iter()
                .zip(wkbs)
                .map(|(hex_id, wkb)| HexGridCell { hex_id, wkb }),
        );
    }
    Ok(cells)
}
