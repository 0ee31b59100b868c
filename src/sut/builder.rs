//! Row composer & linker (C9) and emit (C10).
//!
//! Drives one linear, single-transaction build: mint the root, allocate
//! paired `VariantID`s per brush, insert every row in input order, patch
//! up the `Node` sibling chain and the `Manager` cross-reference in a
//! second pass, commit, and serialize the scratch database to bytes.

use super::effector::{default_curve, default_pressure_graph, encode_effector};
use super::material::build_material_file_data;
use super::pattern_array::{encode_empty, encode_with_image};
use super::schema::install_schema;
use super::uuidgen::{Minter, RandomSource, NIL_UUID};
use crate::domain::PackageRequest;
use crate::error::ForgeResult;
use rusqlite::{params, Connection};

/// The Manager row's constant `CommonVariantID` when a package has no
/// brushes at all (spec.md §4.9 step 6).
const EMPTY_PACKAGE_COMMON_VARIANT_ID: i64 = 1001;
const VARIANT_COUNTER_START: u32 = 1000;
const SCHEMA_VERSION: i64 = 126;

/// Builds a `.sut` package from a [`PackageRequest`], returning the
/// complete byte sequence of the emitted SQLite database.
pub struct SutBuilder {
    random_source: RandomSource,
}

impl SutBuilder {
    pub fn new() -> Self {
        Self {
            random_source: RandomSource::NonDeterministic,
        }
    }

    /// A builder whose randomness and `CLYA` mtime are pinned to `seed`,
    /// so that two builds with identical inputs produce byte-identical
    /// output (spec.md §8 "Determinism").
    pub fn with_seed(seed: u64) -> Self {
        Self {
            random_source: RandomSource::Seeded(seed),
        }
    }

    pub fn build(&self, request: &PackageRequest) -> ForgeResult<Vec<u8>> {
        let mut minter = Minter::new(self.random_source);
        let scratch = tempfile::Builder::new().suffix(".sut").tempfile()?;

        {
            let mut conn = Connection::open(scratch.path())?;
            install_schema(&conn)?;
            let tx = conn.transaction()?;
            run_build(&tx, request, &mut minter)?;
            tx.commit()?;
        }

        Ok(std::fs::read(scratch.path())?)
    }
}

impl Default for SutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn run_build(
    tx: &rusqlite::Transaction<'_>,
    request: &PackageRequest,
    minter: &mut Minter,
) -> ForgeResult<()> {
    tx.execute("INSERT INTO Manager DEFAULT VALUES", [])?;

    let root_uuid = minter.mint_binary_uuid();
    tx.execute(
        "INSERT INTO Node (NodeUuid, NodeName, NodeLock, NodeHidden, NodeNextUuid)
         VALUES (?1, ?2, 0, 0, ?3)",
        params![root_uuid.as_slice(), request.package_name, NIL_UUID.as_slice()],
    )?;

    let mut variant_counter = VARIANT_COUNTER_START;
    let mut max_variant_id = VARIANT_COUNTER_START;
    let mut first_brush: Option<([u8; 16], i64)> = None;
    let mut previous_node_row: Option<i64> = None;

    for brush in &request.brushes {
        variant_counter += 1;
        let current_variant_id = variant_counter;
        variant_counter += 1;
        let initial_variant_id = variant_counter;
        max_variant_id = max_variant_id.max(initial_variant_id);

        let node_uuid = minter.mint_binary_uuid();
        if first_brush.is_none() {
            first_brush = Some((node_uuid, current_variant_id as i64));
        }

        let has_image = !brush.png.is_empty();
        let pattern_blob = if has_image {
            let material_uuid = minter.mint_material_uuid_string();
            let file_data = build_material_file_data(
                &brush.png,
                &material_uuid,
                &brush.name,
                minter.mtime(),
            )?;
            tx.execute(
                "INSERT INTO MaterialFile
                    (InstallFolder, OriginalPath, CatalogPath, FileData, MaterialUuid, OldMaterial)
                 VALUES (0, ?1, ?2, ?3, NULL, NULL)",
                params![
                    format!(".:{material_uuid}:data:material_0.layer"),
                    format!(".:{material_uuid}"),
                    file_data,
                ],
            )?;
            encode_with_image(&material_uuid, &brush.name, &brush.png)
        } else {
            encode_empty()
        };

        let size_effector = encode_effector(request.options.size_pressure, &default_curve());
        let flow_effector = encode_effector(request.options.opacity_pressure, &default_curve());

        for variant_id in [current_variant_id, initial_variant_id] {
            tx.execute(
                "INSERT INTO Variant
                    (VariantID, Opacity, AntiAlias, CompositeMode,
                     BrushSize, BrushSizeUnit, BrushSizeEffector,
                     BrushFlow, BrushFlowEffector,
                     BrushHardness, BrushInterval, BrushThickness, BrushRotation,
                     BrushUsePatternImage, BrushPatternImageArray)
                 VALUES
                    (?1, ?2, 1, 0,
                     ?3, 0, ?4,
                     ?5, ?6,
                     ?7, ?8, 100, ?9,
                     ?10, ?11)",
                params![
                    variant_id as i64,
                    request.options.opacity as i64,
                    request.options.size as f64,
                    size_effector,
                    request.options.opacity as i64,
                    flow_effector,
                    request.options.hardness as i64,
                    request.options.spacing as f64,
                    request.options.angle as f64,
                    has_image as i64,
                    pattern_blob,
                ],
            )?;
        }

        tx.execute(
            "INSERT INTO Node
                (NodeUuid, NodeName, NodeLock, NodeHidden, NodeNextUuid,
                 NodeInputOp, NodeOutputOp, NodeRangeOp, NodeIcon, NodeIconColor,
                 NodeVariantID, NodeInitVariantID)
             VALUES (?1, ?2, 0, 0, ?3, 10, 10, 0, 128, 0, ?4, ?5)",
            params![
                node_uuid.as_slice(),
                brush.name,
                NIL_UUID.as_slice(),
                current_variant_id as i64,
                initial_variant_id as i64,
            ],
        )?;
        let brush_row_id = tx.last_insert_rowid();

        if let Some(previous_row_id) = previous_node_row {
            tx.execute(
                "UPDATE Node SET NodeNextUuid = ?1 WHERE _PW_ID = ?2",
                params![node_uuid.as_slice(), previous_row_id],
            )?;
        }
        previous_node_row = Some(brush_row_id);
    }

    if let Some((first_uuid, _)) = first_brush {
        tx.execute(
            "UPDATE Node SET NodeFirstChildUuid = ?1 WHERE _PW_ID = 1",
            params![first_uuid.as_slice()],
        )?;
    }

    let (current_node_uuid, common_variant_id): (Vec<u8>, i64) = match first_brush {
        Some((uuid, variant_id)) => (uuid.to_vec(), variant_id),
        None => (NIL_UUID.to_vec(), EMPTY_PACKAGE_COMMON_VARIANT_ID),
    };

    tx.execute(
        "UPDATE Manager
            SET ToolType = 0,
                Version = ?1,
                RootUuid = ?2,
                CurrentNodeUuid = ?3,
                MaxVariantID = ?4,
                CommonVariantID = ?5,
                ObjectNodeUuid = ?2,
                PressureGraph = ?6,
                SavedCount = 0
          WHERE _PW_ID = 1",
        params![
            SCHEMA_VERSION,
            root_uuid.as_slice(),
            current_node_uuid,
            max_variant_id as i64,
            common_variant_id,
            default_pressure_graph(),
        ],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BrushInput, PackageOptions, PackageRequest};
    use rusqlite::Connection;
    use std::io::Cursor;

    fn solid_png(size: u32) -> Vec<u8> {
        let img = image::GrayImage::from_pixel(size, size, image::Luma([0u8]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn request(brushes: Vec<BrushInput>) -> PackageRequest {
        PackageRequest {
            package_name: "Test Pack".to_string(),
            author_name: "Tester".to_string(),
            options: PackageOptions::default(),
            brushes,
        }
    }

    fn open_built(bytes: &[u8]) -> Connection {
        let tmp = tempfile::Builder::new().suffix(".sut").tempfile().unwrap();
        std::fs::write(tmp.path(), bytes).unwrap();
        Connection::open(tmp.path()).unwrap()
    }

    #[test]
    fn empty_package_has_root_node_only() {
        let bytes = SutBuilder::with_seed(1).build(&request(vec![])).unwrap();
        let conn = open_built(&bytes);

        let node_count: i64 = conn.query_row("SELECT COUNT(*) FROM Node", [], |r| r.get(0)).unwrap();
        assert_eq!(node_count, 1);
        let variant_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Variant", [], |r| r.get(0))
            .unwrap();
        assert_eq!(variant_count, 0);
        let material_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM MaterialFile", [], |r| r.get(0))
            .unwrap();
        assert_eq!(material_count, 0);
        let max_variant_id: i64 = conn
            .query_row("SELECT MaxVariantID FROM Manager", [], |r| r.get(0))
            .unwrap();
        assert_eq!(max_variant_id, 1000);
        let common_variant_id: i64 = conn
            .query_row("SELECT CommonVariantID FROM Manager", [], |r| r.get(0))
            .unwrap();
        assert_eq!(common_variant_id, 1001);
    }

    #[test]
    fn single_brush_wires_root_and_node_correctly() {
        let png = solid_png(64);
        let bytes = SutBuilder::with_seed(2)
            .build(&request(vec![BrushInput::new("Dot", 64, 64, png.clone())]))
            .unwrap();
        let conn = open_built(&bytes);

        let node_count: i64 = conn.query_row("SELECT COUNT(*) FROM Node", [], |r| r.get(0)).unwrap();
        assert_eq!(node_count, 2);

        let (variant_id, init_variant_id): (i64, i64) = conn
            .query_row(
                "SELECT NodeVariantID, NodeInitVariantID FROM Node WHERE _PW_ID = 2",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(variant_id, 1001);
        assert_eq!(init_variant_id, 1002);

        let root_first_child: Vec<u8> = conn
            .query_row("SELECT NodeFirstChildUuid FROM Node WHERE _PW_ID = 1", [], |r| r.get(0))
            .unwrap();
        let brush_uuid: Vec<u8> = conn
            .query_row("SELECT NodeUuid FROM Node WHERE _PW_ID = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(root_first_child, brush_uuid);

        let brush_next: Vec<u8> = conn
            .query_row("SELECT NodeNextUuid FROM Node WHERE _PW_ID = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(brush_next, NIL_UUID.to_vec());

        let material_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM MaterialFile", [], |r| r.get(0))
            .unwrap();
        assert_eq!(material_count, 1);

        let max_variant_id: i64 = conn
            .query_row("SELECT MaxVariantID FROM Manager", [], |r| r.get(0))
            .unwrap();
        assert_eq!(max_variant_id, 1002);
    }

    #[test]
    fn three_brushes_form_an_acyclic_chain() {
        let names = ["A", "B", "C"];
        let brushes = names
            .iter()
            .map(|n| BrushInput::new(*n, 128, 128, solid_png(128)))
            .collect();
        let bytes = SutBuilder::with_seed(3).build(&request(brushes)).unwrap();
        let conn = open_built(&bytes);

        let mut stmt = conn
            .prepare("SELECT NodeUuid, NodeNextUuid FROM Node WHERE _PW_ID > 1 ORDER BY _PW_ID")
            .unwrap();
        let rows: Vec<(Vec<u8>, Vec<u8>)> = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].1, rows[1].0, "A.NodeNextUuid should equal B.NodeUuid");
        assert_eq!(rows[1].1, rows[2].0, "B.NodeNextUuid should equal C.NodeUuid");
        assert_eq!(rows[2].1, NIL_UUID.to_vec(), "C is terminal");

        let mut uuids: Vec<Vec<u8>> = rows.iter().map(|(u, _)| u.clone()).collect();
        uuids.sort();
        uuids.dedup();
        assert_eq!(uuids.len(), 3, "chain must visit every brush exactly once");

        let variant_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Variant", [], |r| r.get(0))
            .unwrap();
        assert_eq!(variant_count, 6);
    }

    #[test]
    fn build_is_deterministic_for_a_fixed_seed() {
        let brushes = || vec![BrushInput::new("Dot", 64, 64, solid_png(64))];
        let a = SutBuilder::with_seed(99).build(&request(brushes())).unwrap();
        let b = SutBuilder::with_seed(99).build(&request(brushes())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn name_with_xml_special_characters_is_escaped_only_in_material_xml() {
        let png = solid_png(32);
        let bytes = SutBuilder::with_seed(4)
            .build(&request(vec![BrushInput::new(
                "R&D <test>",
                32,
                32,
                png,
            )]))
            .unwrap();
        let conn = open_built(&bytes);

        let node_name: String = conn
            .query_row("SELECT NodeName FROM Node WHERE _PW_ID = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(node_name, "R&D <test>");

        let file_data: Vec<u8> = conn
            .query_row("SELECT FileData FROM MaterialFile WHERE _PW_ID = 1", [], |r| r.get(0))
            .unwrap();
        let needle = b"R&amp;D &lt;test&gt;";
        assert!(file_data.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn pattern_image_array_contains_the_exact_png_bytes() {
        let png = solid_png(128);
        let bytes = SutBuilder::with_seed(5)
            .build(&request(vec![BrushInput::new("Dot", 128, 128, png.clone())]))
            .unwrap();
        let conn = open_built(&bytes);

        let blob: Vec<u8> = conn
            .query_row("SELECT BrushPatternImageArray FROM Variant WHERE VariantID = 1001", [], |r| r.get(0))
            .unwrap();
        assert!(blob.windows(png.len()).any(|w| w == png.as_slice()));
    }
}
