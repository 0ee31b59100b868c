//! Schema installer (C8).
//!
//! Sets the exact pragmas CSP expects and creates the four interrelated
//! tables. `Variant` carries a superset of columns beyond the ones this
//! builder actually populates (spec.md §4.8) so that the editor never
//! hits an unknown-column error when it reads back a brush this tool
//! produced.

use rusqlite::Connection;

pub fn install_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        PRAGMA page_size = 1024;
        PRAGMA encoding = 'UTF-8';
        PRAGMA foreign_keys = OFF;

        CREATE TABLE Manager (
            _PW_ID           INTEGER PRIMARY KEY AUTOINCREMENT,
            ToolType         INTEGER,
            Version          INTEGER,
            RootUuid         BLOB,
            CurrentNodeUuid  BLOB,
            MaxVariantID     INTEGER,
            CommonVariantID  INTEGER,
            ObjectNodeUuid   BLOB,
            PressureGraph    BLOB,
            SavedCount       INTEGER
        );

        CREATE TABLE Node (
            _PW_ID             INTEGER PRIMARY KEY AUTOINCREMENT,
            NodeUuid           BLOB,
            NodeName           TEXT,
            NodeLock           INTEGER,
            NodeHidden         INTEGER,
            NodeFirstChildUuid BLOB DEFAULT NULL,
            NodeNextUuid       BLOB,
            NodeInputOp        INTEGER DEFAULT NULL,
            NodeOutputOp       INTEGER DEFAULT NULL,
            NodeRangeOp        INTEGER DEFAULT NULL,
            NodeIcon           INTEGER DEFAULT NULL,
            NodeIconColor      INTEGER DEFAULT NULL,
            NodeVariantID      INTEGER DEFAULT NULL,
            NodeInitVariantID  INTEGER DEFAULT NULL
        );

        CREATE TABLE MaterialFile (
            _PW_ID        INTEGER PRIMARY KEY AUTOINCREMENT,
            InstallFolder INTEGER,
            OriginalPath  TEXT,
            CatalogPath   TEXT,
            FileData      BLOB,
            MaterialUuid  BLOB DEFAULT NULL,
            OldMaterial   BLOB DEFAULT NULL
        );

        CREATE TABLE Variant (
            _PW_ID                  INTEGER PRIMARY KEY AUTOINCREMENT,
            VariantID               INTEGER,
            Opacity                 INTEGER,
            AntiAlias               INTEGER,
            CompositeMode           INTEGER,
            BrushSize               REAL,
            BrushSizeUnit           INTEGER,
            BrushSizeEffector       BLOB DEFAULT NULL,
            BrushFlow               INTEGER,
            BrushFlowEffector       BLOB DEFAULT NULL,
            BrushHardness           INTEGER,
            BrushInterval           REAL,
            BrushThickness          INTEGER,
            BrushRotation           REAL,
            BrushUsePatternImage    INTEGER,
            BrushPatternImageArray  BLOB DEFAULT NULL,
            -- Superset columns the editor may probe for; left NULL here.
            BrushAntiAliasLevel     INTEGER DEFAULT NULL,
            BrushEdgeHardness       INTEGER DEFAULT NULL,
            BrushDensity            INTEGER DEFAULT NULL,
            BrushColorJitter        INTEGER DEFAULT NULL,
            BrushWetEdge            INTEGER DEFAULT NULL,
            BrushBuildup            INTEGER DEFAULT NULL,
            BrushRotationEffector   BLOB DEFAULT NULL,
            BrushScatterEffector    BLOB DEFAULT NULL,
            BrushMinimumSize        INTEGER DEFAULT NULL,
            BrushBlendMode          INTEGER DEFAULT NULL
        );
        ",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pragmas_and_tables_are_installed() {
        let conn = Connection::open_in_memory().unwrap();
        install_schema(&conn).unwrap();

        let page_size: i64 = conn.query_row("PRAGMA page_size", [], |r| r.get(0)).unwrap();
        assert_eq!(page_size, 1024);

        let encoding: String = conn.query_row("PRAGMA encoding", [], |r| r.get(0)).unwrap();
        assert_eq!(encoding, "UTF-8");

        for table in ["Manager", "Node", "Variant", "MaterialFile"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }
}
