//! # ngcseam tool library conversion
//!
//! Turns a Fusion 360 tool library export (`Library.json`) into a LinuxCNC
//! tool table (`tool.tbl`):
//!
//! - **Library model**: lenient parsing of numbers with units
//! - **Pockets**: explicit map, fixed pocket, offset or identity
//! - **Z lengths**: zero, assembly gauge length or a constant
//! - **Table**: fixed-width rows with a descriptive comment per tool

pub mod error;
pub mod library;
pub mod pocket;
pub mod table;

pub use error::{ToolTableError, ToolTableResult};
pub use library::{parse_number, parse_tool_number, LibraryEntry, ToolLibrary};
pub use pocket::{parse_pocket_map, PocketPolicy};
pub use table::{
    convert_file, load_library, ConvertOptions, SortKey, ToolTable, ToolTableRow, ZSource,
    ZSourceKind, DEFAULT_TOOL_TABLE,
};
