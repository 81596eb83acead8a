//! Pocket assignment
//!
//! Precedence: explicit map entry, fixed pocket, tool number plus offset,
//! and finally the tool number itself.

use crate::error::{ToolTableError, ToolTableResult};
use crate::library::parse_int;
use std::collections::BTreeMap;

/// How tool numbers are mapped to carousel pockets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PocketPolicy {
    /// Explicit tool to pocket assignments
    pub map: BTreeMap<i64, i64>,
    /// Same pocket for every unmapped tool
    pub fixed: Option<i64>,
    /// Pocket = tool + offset for every unmapped tool
    pub offset: Option<i64>,
}

impl PocketPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(mut self, map: BTreeMap<i64, i64>) -> Self {
        self.map = map;
        self
    }

    pub fn with_fixed(mut self, fixed: Option<i64>) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_offset(mut self, offset: Option<i64>) -> Self {
        self.offset = offset;
        self
    }

    pub fn pocket_for(&self, tool: i64) -> i64 {
        if let Some(pocket) = self.map.get(&tool) {
            return *pocket;
        }
        if let Some(fixed) = self.fixed {
            return fixed;
        }
        if let Some(offset) = self.offset {
            return tool + offset;
        }
        tool
    }
}

/// Parse a pocket map such as `T1:5,T2:3,T40:1`.
///
/// Blank items are skipped. Keys are case-insensitive; a later item for the
/// same tool replaces an earlier one.
pub fn parse_pocket_map(mapping: &str) -> ToolTableResult<BTreeMap<i64, i64>> {
    let mut map = BTreeMap::new();

    for part in mapping.split(',') {
        if part.trim().is_empty() {
            continue;
        }

        let Some((left, right)) = part.split_once(':') else {
            return Err(ToolTableError::InvalidPocketMapItem(part.to_string()));
        };

        let key = left.trim().to_uppercase();
        let Some(tool) = key.strip_prefix('T') else {
            return Err(ToolTableError::InvalidPocketKey(key));
        };

        match (parse_int(tool), parse_int(right)) {
            (Some(tool), Some(pocket)) => {
                map.insert(tool, pocket);
            }
            _ => return Err(ToolTableError::InvalidPocketMapping(part.to_string())),
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pocket_map() {
        let map = parse_pocket_map("T1:5, t2:3,,T40: 1 ").unwrap();
        assert_eq!(map.get(&1), Some(&5));
        assert_eq!(map.get(&2), Some(&3));
        assert_eq!(map.get(&40), Some(&1));
        assert_eq!(map.len(), 3);
        assert!(parse_pocket_map("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_pocket_map_errors() {
        assert!(matches!(
            parse_pocket_map("T1=5"),
            Err(ToolTableError::InvalidPocketMapItem(item)) if item == "T1=5"
        ));
        assert!(matches!(
            parse_pocket_map("x1:5"),
            Err(ToolTableError::InvalidPocketKey(key)) if key == "X1"
        ));
        assert!(matches!(
            parse_pocket_map("T1:five"),
            Err(ToolTableError::InvalidPocketMapping(_))
        ));
        assert!(matches!(
            parse_pocket_map("T:5"),
            Err(ToolTableError::InvalidPocketMapping(_))
        ));
    }

    #[test]
    fn test_pocket_precedence() {
        let map = parse_pocket_map("T1:7").unwrap();
        let policy = PocketPolicy::new()
            .with_map(map)
            .with_fixed(Some(2))
            .with_offset(Some(100));
        assert_eq!(policy.pocket_for(1), 7);
        assert_eq!(policy.pocket_for(5), 2);

        let policy = PocketPolicy::new().with_offset(Some(100));
        assert_eq!(policy.pocket_for(5), 105);

        assert_eq!(PocketPolicy::new().pocket_for(5), 5);
    }
}
